//! Grant a plan to a user from the command line.
//!
//! ```text
//! lp-grant-plan <user_id> [free|pro]
//! ```
//!
//! Runs the same transaction as `PUT /api/v1/admin/users/{user_id}/plan`.
//! The plan defaults to `pro`. Reads `DATABASE_URL` (and `.env`).

use anyhow::{bail, Context, Result};
use lp_core::plans::Plan;
use lp_core::types::UserId;
use lp_db::repositories::AccountRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lp_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(user_arg) = args.next() else {
        bail!("usage: lp-grant-plan <user_id> [free|pro]");
    };
    let user_id: UserId = user_arg
        .parse()
        .with_context(|| format!("'{user_arg}' is not a valid user id (UUID)"))?;
    let plan = match args.next() {
        Some(name) => Plan::parse(&name)?,
        None => Plan::Pro,
    };

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = lp_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;

    let account = AccountRepo::grant_plan(&pool, user_id, plan)
        .await
        .context("Failed to grant plan")?;

    println!(
        "user {user_id}: plan={} status={} credits={}",
        account.settings.plan, account.subscription.status, account.credits.balance
    );
    Ok(())
}
