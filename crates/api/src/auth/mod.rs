//! Authentication primitives.
//!
//! - [`jwt`] -- validation of Supabase session tokens.

pub mod jwt;
