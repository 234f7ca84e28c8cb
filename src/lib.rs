//! Profile onboarding — form state and submission controller.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod onboarding;
