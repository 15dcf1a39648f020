//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod banner_repo;
pub mod credit_repo;
pub mod global_config_repo;
pub mod inquiry_repo;
pub mod media_repo;
pub mod page_repo;
pub mod page_section_repo;
pub mod subscription_repo;
pub mod template_repo;
pub mod thumbnail_repo;
pub mod user_settings_repo;

pub use account_repo::AccountRepo;
pub use banner_repo::BannerRepo;
pub use credit_repo::CreditRepo;
pub use global_config_repo::GlobalConfigRepo;
pub use inquiry_repo::InquiryRepo;
pub use media_repo::MediaRepo;
pub use page_repo::PageRepo;
pub use page_section_repo::PageSectionRepo;
pub use subscription_repo::SubscriptionRepo;
pub use template_repo::TemplateRepo;
pub use thumbnail_repo::ThumbnailRepo;
pub use user_settings_repo::UserSettingsRepo;
