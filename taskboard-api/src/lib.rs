//! # Taskboard API Server Library
//!
//! B2B task board backend: organization-scoped task CRUD behind a capability
//! guard, plus a Clerk webhook that keeps organization member limits in sync
//! with the subscription tier.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
