use super::AggregateId;

/// A record type that lives in one BaaS table.
///
/// Static metadata (table name, UI labels) sits next to the instance id so the
/// data layer and the tab registry can be generic over the aggregate.
pub trait AggregateRoot {
    /// Primary key type
    type Id: AggregateId;

    /// Primary key of this row
    fn id(&self) -> Self::Id;

    /// Aggregate index in the application (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// BaaS table name (e.g. "produtores")
    fn collection_name() -> &'static str;

    /// Singular UI label (e.g. "Produtor")
    fn element_name() -> &'static str;

    /// Plural UI label (e.g. "Produtores")
    fn list_name() -> &'static str;

    /// Tab key, e.g. "a001_producer"
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::tab_suffix())
    }

    /// English suffix used in tab keys and DOM ids
    fn tab_suffix() -> &'static str;
}
