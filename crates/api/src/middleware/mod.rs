//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in Supabase user plus their app role and plan.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireAuth`] -- requires any signed-in user.

pub mod auth;
pub mod rbac;
