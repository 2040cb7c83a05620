//! Client-side production reports.
//!
//! Full tables are pulled into memory, filtered here and grouped into one of
//! five shapes. Everything in this module is pure.

pub mod aggregation;
pub mod filter;
pub mod summary;
pub mod table;

pub use aggregation::{
    build_report, ColorRow, LocationRow, PeriodRow, ProducerRow, ReportRows, ReportType,
};
pub use filter::{ReferenceSet, ReportFilter};
pub use summary::ReportSummary;
pub use table::{ReportCell, ReportTable};

/// Text shown in place of an empty report
pub const EMPTY_REPORT_MESSAGE: &str = "Nenhum dado disponível";
