pub mod a001_producer;
pub mod a002_entry;
pub mod a003_municipality;
pub mod a004_color;
pub mod a005_community;
pub mod common;
