//! Shared domain model of the cooperative application.
//!
//! Everything in this crate is plain data plus pure functions, so the same
//! types travel between the BaaS wire format, the views and the exporters.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
