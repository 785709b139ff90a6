//! Core library for the job board service.
//!
//! The crate is organized around four areas: identities and role profiles,
//! the job catalog, applications, and notifications. Each area exposes plain
//! domain types, a repository trait for persistence, a service struct holding
//! the behavior, and an `axum` router. [`portal::Portal`] wires the areas
//! together over a shared store and mail transport; the `services/api` binary
//! and the integration tests both build on it.

pub mod admin;
pub mod applications;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod notifications;
pub mod portal;
pub mod store;
pub mod telemetry;

pub use error::AppError;
pub use portal::{api_router, Portal, PortalStores};
pub use store::{memory::MemoryStore, StoreError};
