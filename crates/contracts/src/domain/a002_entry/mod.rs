pub mod aggregate;
pub mod form;

pub use aggregate::{Entry, EntryPatch, NewEntry};
pub use form::EntryForm;
