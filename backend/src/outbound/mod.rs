//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed user repository and notification
//!   source using Diesel ORM
//! - **memory**: in-memory user repository and notification source
//! - **deny_list**: in-memory deny list with per-entry TTL
//! - **validation**: bearer-secret request validator
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no pull pipeline logic.

pub mod deny_list;
pub mod memory;
pub mod persistence;
pub mod validation;
