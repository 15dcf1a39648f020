//! Minimal Stripe REST client: customers, Checkout, and the billing portal.
//!
//! Stripe takes `application/x-www-form-urlencoded` bodies with bracketed
//! keys for nested fields (`metadata[user_id]`).

use lp_core::types::UserId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ensure_success, ProviderError};

const SERVICE: &str = "Stripe";

pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Metadata key carrying the Supabase user id on Stripe objects.
pub const USER_ID_METADATA_KEY: &str = "user_id";

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

/// Inputs for a subscription-mode Checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutParams<'a> {
    pub user_id: UserId,
    pub customer_id: &'a str,
    pub price_id: &'a str,
    pub success_url: &'a str,
    pub cancel_url: &'a str,
}

#[derive(Debug, Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            secret_key: secret_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create a customer tagged with the user id.
    pub async fn create_customer(
        &self,
        user_id: UserId,
        email: Option<&str>,
    ) -> Result<Customer, ProviderError> {
        let mut form = vec![(
            format!("metadata[{USER_ID_METADATA_KEY}]"),
            user_id.to_string(),
        )];
        if let Some(email) = email {
            form.push(("email".to_string(), email.to_string()));
        }
        self.post_form("/v1/customers", &form).await
    }

    /// Create a hosted Checkout session for a subscription.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams<'_>,
    ) -> Result<CheckoutSession, ProviderError> {
        let session: CheckoutSession = self
            .post_form("/v1/checkout/sessions", &checkout_form(params))
            .await?;
        if session.url.is_none() {
            return Err(ProviderError::InvalidResponse {
                service: SERVICE,
                message: "checkout session has no url".into(),
            });
        }
        Ok(session)
    }

    /// Create a customer-portal session returning to `return_url`.
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, ProviderError> {
        let form = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("return_url".to_string(), return_url.to_string()),
        ];
        self.post_form("/v1/billing_portal/sessions", &form).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        Ok(response.json::<T>().await?)
    }
}

fn checkout_form(params: &CheckoutParams<'_>) -> Vec<(String, String)> {
    let user_id = params.user_id.to_string();
    vec![
        ("mode".to_string(), "subscription".to_string()),
        ("customer".to_string(), params.customer_id.to_string()),
        ("line_items[0][price]".to_string(), params.price_id.to_string()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("success_url".to_string(), params.success_url.to_string()),
        ("cancel_url".to_string(), params.cancel_url.to_string()),
        ("client_reference_id".to_string(), user_id.clone()),
        (format!("metadata[{USER_ID_METADATA_KEY}]"), user_id.clone()),
        (
            format!("subscription_data[metadata][{USER_ID_METADATA_KEY}]"),
            user_id,
        ),
        ("allow_promotion_codes".to_string(), "true".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn checkout_form_tags_user_everywhere() {
        let user_id = Uuid::new_v4();
        let form = checkout_form(&CheckoutParams {
            user_id,
            customer_id: "cus_123",
            price_id: "price_pro",
            success_url: "http://localhost:3000/billing?success=1",
            cancel_url: "http://localhost:3000/billing",
        });

        let get = |key: &str| form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        let id = user_id.to_string();
        assert_eq!(get("mode"), Some("subscription"));
        assert_eq!(get("customer"), Some("cus_123"));
        assert_eq!(get("line_items[0][price]"), Some("price_pro"));
        assert_eq!(get("client_reference_id"), Some(id.as_str()));
        assert_eq!(get("metadata[user_id]"), Some(id.as_str()));
        assert_eq!(
            get("subscription_data[metadata][user_id]"),
            Some(id.as_str())
        );
    }
}
