pub mod d400_production_report;
pub mod d401_overview;
