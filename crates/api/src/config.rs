use crate::auth::jwt::JwtConfig;

/// Default Supabase Storage bucket for media.
pub const DEFAULT_STORAGE_BUCKET: &str = "media";

/// Server configuration loaded from environment variables.
///
/// All server fields have defaults suitable for local development. External
/// services are optional; endpoints that need a missing one answer 503.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Hard cap on request bodies for uploads, independent of plan limits.
    pub max_upload_bytes: usize,
    /// Public URL of the frontend, used for Stripe redirect URLs.
    pub app_url: String,
    pub jwt: JwtConfig,
    pub storage: Option<StorageConfig>,
    pub stripe: StripeConfig,
    pub gemini: GeminiConfig,
    /// 64 hex chars; enables storing user API keys.
    pub encryption_key: Option<String>,
}

/// Supabase Storage access. Present only when both URL and key are set.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub service_role_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub pro_price_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GeminiConfig {
    /// Platform key used when a user has not stored their own.
    pub platform_api_key: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                  |
    /// |--------------------------------|--------------------------|
    /// | `HOST`                         | `0.0.0.0`                |
    /// | `PORT`                         | `3001`                   |
    /// | `CORS_ORIGINS`                 | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`         | `60`                     |
    /// | `MAX_UPLOAD_BYTES`             | `20971520` (20 MiB)      |
    /// | `APP_URL`                      | `http://localhost:3000`  |
    /// | `SUPABASE_URL`                 | unset                    |
    /// | `SUPABASE_SERVICE_ROLE_KEY`    | unset                    |
    /// | `SUPABASE_STORAGE_BUCKET`      | `media`                  |
    /// | `STRIPE_SECRET_KEY`            | unset                    |
    /// | `STRIPE_WEBHOOK_SECRET`        | unset                    |
    /// | `STRIPE_PRO_PRICE_ID`          | unset                    |
    /// | `GOOGLE_GENERATIVE_AI_API_KEY` | unset                    |
    /// | `GEMINI_TEXT_MODEL`            | client default           |
    /// | `GEMINI_IMAGE_MODEL`           | client default           |
    /// | `ENCRYPTION_KEY`               | unset                    |
    ///
    /// JWT settings come from [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let storage = match (env_opt("SUPABASE_URL"), env_opt("SUPABASE_SERVICE_ROLE_KEY")) {
            (Some(url), Some(service_role_key)) => Some(StorageConfig {
                url,
                service_role_key,
                bucket: env_opt("SUPABASE_STORAGE_BUCKET")
                    .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.into()),
            }),
            _ => None,
        };

        let stripe = StripeConfig {
            secret_key: env_opt("STRIPE_SECRET_KEY"),
            webhook_secret: env_opt("STRIPE_WEBHOOK_SECRET"),
            pro_price_id: env_opt("STRIPE_PRO_PRICE_ID"),
        };

        let gemini = GeminiConfig {
            platform_api_key: env_opt("GOOGLE_GENERATIVE_AI_API_KEY"),
            text_model: env_opt("GEMINI_TEXT_MODEL"),
            image_model: env_opt("GEMINI_IMAGE_MODEL"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            app_url,
            jwt: JwtConfig::from_env(),
            storage,
            stripe,
            gemini,
            encryption_key: env_opt("ENCRYPTION_KEY"),
        }
    }
}

/// Read an env var, treating empty values as unset.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
