mod filter_panel;
mod page;

pub use page::ProductionReportPage;
