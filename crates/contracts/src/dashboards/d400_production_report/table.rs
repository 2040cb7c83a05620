//! Tabular form of a report, shared by the HTML table and the exporters

use super::aggregation::{ReportRows, ReportType};
use super::summary::ReportSummary;
use crate::domain::a001_producer::Producer;
use crate::domain::a002_entry::Entry;
use crate::domain::a004_color::{aggregate::find_by_code, Color};
use crate::shared::format::{
    format_date_br, format_decimal, format_integer, format_money, format_percent, format_weight,
};
use serde::{Deserialize, Serialize};

/// Typed cell; exporters keep numbers numeric, the UI formats them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportCell {
    Text(String),
    /// kg
    Weight(f64),
    Money(f64),
    /// 0..=100
    Percent(f64),
    Count(usize),
    Decimal(f64),
    Empty,
}

impl ReportCell {
    pub fn text(value: impl Into<String>) -> Self {
        ReportCell::Text(value.into())
    }

    /// Display text, pt-BR formatted
    pub fn display(&self) -> String {
        if let Some(v) = self.number() {
            if !v.is_finite() {
                return "-".to_string();
            }
        }
        match self {
            ReportCell::Text(s) => s.clone(),
            ReportCell::Weight(v) => format_weight(*v),
            ReportCell::Money(v) => format_money(*v),
            ReportCell::Percent(v) => format_percent(*v),
            ReportCell::Count(n) => format_integer(*n as f64),
            ReportCell::Decimal(v) => format_decimal(*v, 2),
            ReportCell::Empty => String::new(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.number().is_some()
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            ReportCell::Weight(v)
            | ReportCell::Money(v)
            | ReportCell::Percent(v)
            | ReportCell::Decimal(v) => Some(*v),
            ReportCell::Count(n) => Some(*n as f64),
            ReportCell::Text(_) | ReportCell::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
    pub totals: Option<Vec<ReportCell>>,
    /// Applied filters, already human readable
    pub filters: Vec<String>,
}

impl ReportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

fn headers(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ReportRows {
    /// Table with a totals row. `filters` comes from `ReportFilter::describe`.
    pub fn to_table(&self, filters: Vec<String>) -> ReportTable {
        let title = self.report_type().title().to_string();
        match self {
            ReportRows::Period(rows) => ReportTable {
                title,
                headers: headers(&["Período", "Produção (kg)", "Valor total"]),
                rows: rows
                    .iter()
                    .map(|r| {
                        vec![
                            ReportCell::text(&r.label),
                            ReportCell::Weight(r.production),
                            ReportCell::Money(r.total_value),
                        ]
                    })
                    .collect(),
                totals: Some(vec![
                    ReportCell::text("Total"),
                    ReportCell::Weight(rows.iter().map(|r| r.production).sum()),
                    ReportCell::Money(rows.iter().map(|r| r.total_value).sum()),
                ]),
                filters,
            },
            ReportRows::Municipality(rows) | ReportRows::Community(rows) => {
                let first = if matches!(self.report_type(), ReportType::Community) {
                    "Comunidade"
                } else {
                    "Município"
                };
                ReportTable {
                    title,
                    headers: headers(&[
                        first,
                        "Produção (kg)",
                        "Produtores",
                        "Média por produtor (kg)",
                    ]),
                    rows: rows
                        .iter()
                        .map(|r| {
                            vec![
                                ReportCell::text(&r.name),
                                ReportCell::Weight(r.production),
                                ReportCell::Count(r.producer_count),
                                ReportCell::Weight(r.average),
                            ]
                        })
                        .collect(),
                    totals: Some(vec![
                        ReportCell::text("Total"),
                        ReportCell::Weight(rows.iter().map(|r| r.production).sum()),
                        ReportCell::Empty,
                        ReportCell::Empty,
                    ]),
                    filters,
                }
            }
            ReportRows::Producer(rows) => ReportTable {
                title,
                headers: headers(&["Produtor", "Município", "Produção (kg)", "Valor total"]),
                rows: rows
                    .iter()
                    .map(|r| {
                        vec![
                            ReportCell::text(&r.name),
                            ReportCell::text(&r.municipality),
                            ReportCell::Weight(r.production),
                            ReportCell::Money(r.total_value),
                        ]
                    })
                    .collect(),
                totals: Some(vec![
                    ReportCell::text("Total"),
                    ReportCell::Empty,
                    ReportCell::Weight(rows.iter().map(|r| r.production).sum()),
                    ReportCell::Money(rows.iter().map(|r| r.total_value).sum()),
                ]),
                filters,
            },
            ReportRows::Color(rows) => ReportTable {
                title,
                headers: headers(&["Código", "Cor", "Produção (kg)", "Percentual"]),
                rows: rows
                    .iter()
                    .map(|r| {
                        vec![
                            ReportCell::text(r.code.to_string()),
                            ReportCell::text(&r.name),
                            ReportCell::Weight(r.production),
                            ReportCell::Percent(r.percentage),
                        ]
                    })
                    .collect(),
                totals: Some(vec![
                    ReportCell::text("Total"),
                    ReportCell::Empty,
                    ReportCell::Weight(rows.iter().map(|r| r.production).sum()),
                    ReportCell::Percent(rows.iter().map(|r| r.percentage).sum()),
                ]),
                filters,
            },
        }
    }
}

/// Raw producer list report
pub fn producer_list_table(producers: &[Producer], filters: Vec<String>) -> ReportTable {
    let hive_total: u32 = producers.iter().filter_map(|p| p.hive_count).sum();
    ReportTable {
        title: "Relação de Produtores".to_string(),
        headers: headers(&[
            "Código",
            "Nome",
            "CPF",
            "Município",
            "Comunidade",
            "Situação",
            "Colmeias",
        ]),
        rows: producers
            .iter()
            .map(|p| {
                vec![
                    ReportCell::text(&p.code),
                    ReportCell::text(&p.name),
                    ReportCell::text(&p.cpf),
                    ReportCell::text(&p.municipality),
                    ReportCell::text(p.community.clone().unwrap_or_default()),
                    ReportCell::text(p.status.label()),
                    p.hive_count
                        .map(|n| ReportCell::Count(n as usize))
                        .unwrap_or(ReportCell::Empty),
                ]
            })
            .collect(),
        totals: Some(vec![
            ReportCell::text(format!("{} produtores", producers.len())),
            ReportCell::Empty,
            ReportCell::Empty,
            ReportCell::Empty,
            ReportCell::Empty,
            ReportCell::Empty,
            ReportCell::Count(hive_total as usize),
        ]),
        filters,
    }
}

/// Raw entry list report
pub fn entry_list_table(entries: &[Entry], colors: &[Color], filters: Vec<String>) -> ReportTable {
    let summary = ReportSummary::from_entries(entries);
    ReportTable {
        title: "Relação de Entradas".to_string(),
        headers: headers(&[
            "Data",
            "Produtor",
            "Município",
            "Cor",
            "Peso líquido (kg)",
            "Valor unitário",
            "Valor total",
        ]),
        rows: entries
            .iter()
            .map(|e| {
                let color = find_by_code(colors, e.color_code)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| format!("Cor {}", e.color_code));
                vec![
                    ReportCell::text(format_date_br(&e.date)),
                    ReportCell::text(&e.producer_name),
                    ReportCell::text(&e.municipality),
                    ReportCell::text(color),
                    ReportCell::Weight(e.net_weight),
                    ReportCell::Money(e.unit_value),
                    ReportCell::Money(e.total_value),
                ]
            })
            .collect(),
        totals: Some(vec![
            ReportCell::text(format!("{} entradas", summary.entry_count)),
            ReportCell::Empty,
            ReportCell::Empty,
            ReportCell::Empty,
            ReportCell::Weight(summary.total_production),
            ReportCell::Money(summary.average_unit_price),
            ReportCell::Money(summary.total_value),
        ]),
        filters,
    }
}
