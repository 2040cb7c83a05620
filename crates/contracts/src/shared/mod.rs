pub mod format;
pub mod indicators;
pub mod validation;
