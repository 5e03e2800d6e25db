//! HTTP inbound adapter exposing the pull routes and health checks.

pub mod error;
pub mod function_key;
pub mod health;
pub mod notifications;
pub mod state;
mod validation;
