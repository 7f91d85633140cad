//! # Taskboard Shared Library
//!
//! This crate contains the domain types and business logic used by the
//! Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and organization-scoped CRUD operations
//! - `auth`: Session token validation and the capability guard
//! - `billing`: Subscription events, entitlement policy, limit synchronizer
//! - `webhook`: Webhook signature verification and ingress
//! - `clerk`: Clerk backend API client (member limit updates)
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod billing;
pub mod clerk;
pub mod db;
pub mod models;
pub mod webhook;

/// Current version of the taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
