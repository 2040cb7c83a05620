pub mod form_fields;
pub mod intake;
pub mod list;
