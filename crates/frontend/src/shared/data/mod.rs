//! Data Access Layer over the BaaS REST surface.
//!
//! Views only see [`Repository`]; the app injects a [`BaasClient`] through
//! context and tests use the in-memory double.

pub mod baas;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod reference;
pub mod repository;
pub mod services;

pub use baas::BaasClient;
pub use error::DataError;
pub use reference::ReferenceData;
pub use repository::{use_repository, Repository, SharedRepository};
pub use services::SaveError;
