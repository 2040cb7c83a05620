pub mod a001_producer;
pub mod a002_entry;
