//! Supabase session-token validation.
//!
//! Supabase Auth issues HS256-signed JWTs whose `sub` is the user's UUID and
//! whose `aud` is `authenticated`. The app role is not taken from the token;
//! it lives in `user_settings`.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lp_core::types::UserId;
use serde::{Deserialize, Serialize};

/// Audience Supabase puts on tokens of signed-in users.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Claims read from a Supabase access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Supabase user id.
    pub sub: UserId,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// The project's JWT secret (HS256).
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default         |
    /// |-------------------------|----------|-----------------|
    /// | `SUPABASE_JWT_SECRET`   | **yes**  | --              |
    /// | `SUPABASE_JWT_AUDIENCE` | no       | `authenticated` |
    ///
    /// # Panics
    ///
    /// Panics if `SUPABASE_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("SUPABASE_JWT_SECRET")
            .expect("SUPABASE_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SUPABASE_JWT_SECRET must not be empty");

        let audience =
            std::env::var("SUPABASE_JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.into());

        Self { secret, audience }
    }
}

/// Validate a session token, returning its [`Claims`].
///
/// Checks the HS256 signature, expiry, and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign a token the way Supabase does. Used by tests and local tooling.
pub fn generate_access_token(
    user_id: UserId,
    email: Option<&str>,
    expiry_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        aud: config.audience.clone(),
        email: email.map(str::to_string),
        exp: now + expiry_secs,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
