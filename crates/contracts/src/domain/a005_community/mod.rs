pub mod aggregate;

pub use aggregate::{of_municipality, Community};
