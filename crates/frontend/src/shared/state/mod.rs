pub mod load_state;
pub mod persist;
pub mod tables;

pub use load_state::{LoadState, LoadStateSignal};
pub use tables::{use_shared_tables, SharedTables};
