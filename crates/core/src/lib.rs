//! Pure domain logic for the LP Builder backend.
//!
//! Nothing in this crate talks to the database or to external services;
//! the only I/O is the sleep between attempts in [`retry`].

pub mod billing;
pub mod credits;
pub mod encryption;
pub mod error;
pub mod export;
pub mod inquiry;
pub mod pagination;
pub mod plans;
pub mod retry;
pub mod roles;
pub mod sections;
pub mod types;
