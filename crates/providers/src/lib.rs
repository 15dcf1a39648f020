//! Outbound HTTP clients for the managed services behind LP Builder:
//! Google Gemini, Stripe, and Supabase Storage.

pub mod error;
pub mod gemini;
pub mod storage;
pub mod stripe;

pub use error::ProviderError;
pub use gemini::GeminiClient;
pub use storage::StorageClient;
pub use stripe::StripeClient;
