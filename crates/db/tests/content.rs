//! Integration tests for pages, sections, media, and templates.

use lp_core::sections::PAGE_STATUS_PUBLISHED;
use lp_db::models::media::{CreateMediaImage, SOURCE_UPLOAD};
use lp_db::models::page::{CreatePageSection, UpdatePage};
use lp_db::models::template::{CreateLpTemplate, TemplateSectionSeed};
use lp_db::repositories::page_repo::NewPage;
use lp_db::repositories::{MediaRepo, PageRepo, PageSectionRepo, TemplateRepo};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_page<'a>(user_id: Uuid, title: &'a str, slug: &'a str) -> NewPage<'a> {
    NewPage {
        user_id,
        title,
        slug,
        description: None,
        template_id: None,
        metadata: json!({}),
    }
}

fn section(section_type: &str) -> CreatePageSection {
    CreatePageSection {
        section_type: section_type.to_string(),
        config: Some(json!({"heading": section_type})),
        image_url: None,
        order: None,
    }
}

// ---------------------------------------------------------------------------
// Pages and sections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sections_append_in_order(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let page = PageRepo::create(&pool, &new_page(user_id, "Launch", "launch"), &[])
        .await
        .unwrap();

    let hero = PageSectionRepo::create(&pool, page.id, &section("hero"))
        .await
        .unwrap();
    let faq = PageSectionRepo::create(&pool, page.id, &section("faq"))
        .await
        .unwrap();
    assert_eq!(hero.sort_order, 0);
    assert_eq!(faq.sort_order, 1);

    let listed = PageSectionRepo::list_for_page(&pool, page.id)
        .await
        .unwrap();
    let types: Vec<&str> = listed.iter().map(|s| s.section_type.as_str()).collect();
    assert_eq!(types, ["hero", "faq"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_rewrites_dense_orders(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let page = PageRepo::create(&pool, &new_page(user_id, "Reorder", "reorder"), &[])
        .await
        .unwrap();
    let a = PageSectionRepo::create(&pool, page.id, &section("hero"))
        .await
        .unwrap();
    let b = PageSectionRepo::create(&pool, page.id, &section("features"))
        .await
        .unwrap();
    let c = PageSectionRepo::create(&pool, page.id, &section("cta"))
        .await
        .unwrap();

    let reordered = PageSectionRepo::reorder(&pool, page.id, &[c.id, a.id, b.id])
        .await
        .unwrap();

    let ids: Vec<i64> = reordered.iter().map(|s| s.id).collect();
    let orders: Vec<i32> = reordered.iter().map(|s| s.sort_order).collect();
    assert_eq!(ids, [c.id, a.id, b.id]);
    assert_eq!(orders, [0, 1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn template_seeds_become_sections(pool: PgPool) {
    let seeds = vec![
        TemplateSectionSeed {
            section_type: "hero".into(),
            config: json!({"heading": "Hi"}),
            image_url: None,
        },
        TemplateSectionSeed {
            section_type: "footer".into(),
            config: json!({}),
            image_url: None,
        },
    ];
    let template = TemplateRepo::create(
        &pool,
        &CreateLpTemplate {
            name: "Starter".into(),
            category: None,
            description: None,
            sections: seeds.clone(),
            thumbnail_url: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(template.category, "general");

    let mut new = new_page(Uuid::new_v4(), "From template", "from-template");
    new.template_id = Some(template.id);
    let page = PageRepo::create(&pool, &new, &seeds).await.unwrap();

    let sections = PageSectionRepo::list_for_page(&pool, page.id)
        .await
        .unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].section_type, "hero");
    assert_eq!(sections[0].config["heading"], "Hi");
    assert_eq!(sections[1].sort_order, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_sets_status_and_timestamp(pool: PgPool) {
    let page = PageRepo::create(&pool, &new_page(Uuid::new_v4(), "Pub", "pub"), &[])
        .await
        .unwrap();
    let before = PageRepo::find_published_by_slug(&pool, "pub")
        .await
        .unwrap();
    assert!(before.is_none());

    let published = PageRepo::set_published(&pool, page.id, true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(published.status, PAGE_STATUS_PUBLISHED);
    let first_published_at = published.published_at.expect("timestamp set");

    let found = PageRepo::find_published_by_slug(&pool, "pub")
        .await
        .unwrap();
    assert_eq!(found.map(|p| p.id), Some(page.id));

    let draft = PageRepo::set_published(&pool, page.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(draft.status, "draft");
    assert_eq!(draft.published_at, Some(first_published_at));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_page_cascades_sections(pool: PgPool) {
    let page = PageRepo::create(&pool, &new_page(Uuid::new_v4(), "Gone", "gone"), &[])
        .await
        .unwrap();
    PageSectionRepo::create(&pool, page.id, &section("hero"))
        .await
        .unwrap();

    assert!(PageRepo::delete(&pool, page.id).await.unwrap());
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM page_sections WHERE page_id = $1")
        .bind(page.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_keeps_other_fields(pool: PgPool) {
    let page = PageRepo::create(&pool, &new_page(Uuid::new_v4(), "Old", "old"), &[])
        .await
        .unwrap();
    let updated = PageRepo::update(
        &pool,
        page.id,
        &UpdatePage {
            title: Some("New".into()),
            slug: None,
            description: None,
            metadata: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.slug, "old");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn explicit_null_clears_description(pool: PgPool) {
    let mut draft = new_page(Uuid::new_v4(), "Described", "described");
    draft.description = Some("Spring campaign");
    let page = PageRepo::create(&pool, &draft, &[]).await.unwrap();
    assert_eq!(page.description.as_deref(), Some("Spring campaign"));

    let untouched = PageRepo::update(
        &pool,
        page.id,
        &UpdatePage {
            title: Some("Renamed".into()),
            slug: None,
            description: None,
            metadata: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(untouched.description.as_deref(), Some("Spring campaign"));

    let cleared = PageRepo::update(
        &pool,
        page.id,
        &UpdatePage {
            title: None,
            slug: None,
            description: Some(None),
            metadata: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cleared.description.is_none());
    assert_eq!(cleared.title, "Renamed");
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn uploaded_media_belongs_to_uploader(pool: PgPool) {
    let uploader = Uuid::new_v4();
    let other = Uuid::new_v4();
    let image = MediaRepo::create(
        &pool,
        &CreateMediaImage {
            user_id: uploader,
            storage_path: format!("{uploader}/hero.png"),
            public_url: "https://example.supabase.co/storage/v1/object/public/media/hero.png"
                .into(),
            file_name: "hero.png".into(),
            mime_type: "image/png".into(),
            size_bytes: 1024,
            source: SOURCE_UPLOAD.into(),
            prompt: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(image.user_id, uploader);
    let mine = MediaRepo::list_for_user(&pool, uploader, None, 10, 0)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    let theirs = MediaRepo::list_for_user(&pool, other, None, 10, 0)
        .await
        .unwrap();
    assert!(theirs.is_empty());
    let generated = MediaRepo::list_for_user(&pool, uploader, Some("generated"), 10, 0)
        .await
        .unwrap();
    assert!(generated.is_empty());
}
