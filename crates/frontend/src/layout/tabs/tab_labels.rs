//! Tab titles. Aggregate lists take their label from the contracts metadata.

use contracts::domain::a001_producer::Producer;
use contracts::domain::a002_entry::Entry;
use contracts::domain::common::AggregateRoot;

pub const PRODUCER_DETAIL_PREFIX: &str = "a001_producer_detail_";

pub fn producer_detail_key(id: i64) -> String {
    format!("{}{}", PRODUCER_DETAIL_PREFIX, id)
}

/// «<entity> · <identifier>»
pub fn detail_tab_label(entity_label: &str, identifier: &str) -> String {
    format!("{} · {}", entity_label, identifier)
}

/// Readable title for a tab key; unknown keys fall back to the key itself
pub fn tab_label_for_key(key: &str) -> String {
    match key {
        "d401_overview" => "Painel".to_string(),
        "d400_production_report" => "Relatórios de produção".to_string(),
        "a001_producer" => Producer::list_name().to_string(),
        "a001_producer_new" => format!("Novo {}", Producer::element_name().to_lowercase()),
        "a002_entry" => Entry::list_name().to_string(),
        "a002_entry_new" => "Registrar entrada".to_string(),
        "sys_users" => "Usuários".to_string(),
        k if k.starts_with(PRODUCER_DETAIL_PREFIX) => {
            detail_tab_label(Producer::element_name(), &k[PRODUCER_DETAIL_PREFIX.len()..])
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(tab_label_for_key("d401_overview"), "Painel");
        assert_eq!(tab_label_for_key(&producer_detail_key(42)), "Produtor · 42");
        assert_eq!(tab_label_for_key("desconhecido"), "desconhecido");
    }
}
