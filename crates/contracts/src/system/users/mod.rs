pub mod aggregate;

pub use aggregate::{UserAccount, UserAccountPatch, UserRole};
