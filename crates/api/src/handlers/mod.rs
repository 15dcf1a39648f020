pub mod admin_users;
pub mod ai;
pub mod banners;
pub mod billing;
pub mod config;
pub mod creatives;
pub mod credits;
pub mod inquiries;
pub mod me;
pub mod media;
pub mod pages;
pub mod sections;
pub mod templates;
pub mod thumbnails;
