use std::sync::Arc;

use lp_core::encryption::Encryptor;
use lp_core::error::CoreError;
use lp_providers::{GeminiClient, StorageClient, StripeClient};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. Optional clients are `None` when their service is not
/// configured; the accessors below turn that into a 503.
#[derive(Clone)]
pub struct AppState {
    pub pool: lp_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub storage: Option<Arc<StorageClient>>,
    pub stripe: Option<Arc<StripeClient>>,
    pub gemini: Arc<GeminiClient>,
    pub encryptor: Option<Encryptor>,
}

impl AppState {
    /// Build state and outbound clients from configuration.
    ///
    /// Fails if `ENCRYPTION_KEY` is set but malformed.
    pub fn new(pool: lp_db::DbPool, config: ServerConfig) -> Result<Self, CoreError> {
        let storage = config
            .storage
            .as_ref()
            .map(|s| Arc::new(StorageClient::new(&s.url, &s.service_role_key)));
        let stripe = config
            .stripe
            .secret_key
            .as_ref()
            .map(|key| Arc::new(StripeClient::new(key)));
        let gemini = Arc::new(GeminiClient::new(
            config.gemini.text_model.clone(),
            config.gemini.image_model.clone(),
        ));
        let encryptor = config
            .encryption_key
            .as_deref()
            .map(Encryptor::from_hex_key)
            .transpose()?;

        Ok(Self {
            pool,
            config: Arc::new(config),
            storage,
            stripe,
            gemini,
            encryptor,
        })
    }

    /// Storage client and bucket name.
    pub fn storage(&self) -> Result<(&StorageClient, &str), CoreError> {
        match (&self.storage, &self.config.storage) {
            (Some(client), Some(cfg)) => Ok((client.as_ref(), cfg.bucket.as_str())),
            _ => Err(CoreError::Unavailable(
                "Media storage is not configured".into(),
            )),
        }
    }

    pub fn stripe(&self) -> Result<&StripeClient, CoreError> {
        self.stripe
            .as_deref()
            .ok_or_else(|| CoreError::Unavailable("Billing is not configured".into()))
    }

    pub fn encryptor(&self) -> Result<&Encryptor, CoreError> {
        self.encryptor
            .as_ref()
            .ok_or_else(|| CoreError::Unavailable("Encryption is not configured".into()))
    }
}
