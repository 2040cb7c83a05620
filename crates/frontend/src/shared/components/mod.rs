pub mod bar_chart;
pub mod date_range_picker;
pub mod form_field;
pub mod page_header;
pub mod pagination_controls;
pub mod stat_card;
pub mod table_totals_row;
