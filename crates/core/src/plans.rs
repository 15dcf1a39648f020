//! Subscription plans and the usage limits they gate.
//!
//! Plan names must match the `ck_user_settings_plan` and
//! `ck_subscriptions_plan` check constraints.

use serde::Serialize;

use crate::error::CoreError;

pub const PLAN_FREE: &str = "free";
pub const PLAN_PRO: &str = "pro";

/// A subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

/// Usage limits attached to a [`Plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    /// Credits granted at the start of each billing period.
    pub monthly_credits: i64,
    /// Maximum number of pages a user may own. `None` means unlimited.
    pub max_pages: Option<i64>,
    /// Maximum size of a single media upload.
    pub max_upload_bytes: usize,
}

const FREE_LIMITS: PlanLimits = PlanLimits {
    monthly_credits: 30,
    max_pages: Some(3),
    max_upload_bytes: 5 * 1024 * 1024,
};

const PRO_LIMITS: PlanLimits = PlanLimits {
    monthly_credits: 500,
    max_pages: None,
    max_upload_bytes: 20 * 1024 * 1024,
};

impl Plan {
    /// Parse a plan name as stored in the database.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        match name {
            PLAN_FREE => Ok(Plan::Free),
            PLAN_PRO => Ok(Plan::Pro),
            other => Err(CoreError::Validation(format!(
                "Unknown plan '{other}'. Must be one of: {PLAN_FREE}, {PLAN_PRO}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => PLAN_FREE,
            Plan::Pro => PLAN_PRO,
        }
    }

    pub fn limits(self) -> PlanLimits {
        match self {
            Plan::Free => FREE_LIMITS,
            Plan::Pro => PRO_LIMITS,
        }
    }

    /// Whether this plan is paid for through Stripe.
    pub fn is_paid(self) -> bool {
        matches!(self, Plan::Pro)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject page creation once a user already owns `current_pages` pages and
/// the plan caps the total.
pub fn check_page_quota(plan: Plan, current_pages: i64) -> Result<(), CoreError> {
    match plan.limits().max_pages {
        Some(max) if current_pages >= max => Err(CoreError::Forbidden(format!(
            "The {plan} plan allows at most {max} pages. Upgrade to create more."
        ))),
        _ => Ok(()),
    }
}

/// Reject uploads larger than the plan allows.
pub fn check_upload_size(plan: Plan, size: usize) -> Result<(), CoreError> {
    let max = plan.limits().max_upload_bytes;
    if size > max {
        return Err(CoreError::Validation(format!(
            "File is {size} bytes; the {plan} plan allows at most {max} bytes per upload"
        )));
    }
    Ok(())
}
