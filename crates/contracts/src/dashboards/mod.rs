pub mod d400_production_report;
