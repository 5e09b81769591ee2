//! Case-insensitive substring search over selected record fields

use crate::models::ContentRecord;

/// Extracts one searchable field from a record
pub type FieldSelector<T> = fn(&T) -> Option<&str>;

/// A lowercased search needle; `None` when the query is blank.
///
/// Whitespace only decides blankness: a non-blank needle keeps its spaces,
/// so `"aep "` does not match `"AEPX"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(Option<String>);

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        if query.trim().is_empty() {
            SearchQuery(None)
        } else {
            SearchQuery(Some(query.to_lowercase()))
        }
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_none()
    }

    /// True when any selected field contains the needle
    pub fn matches<T>(&self, record: &T, fields: &[FieldSelector<T>]) -> bool {
        let needle = match &self.0 {
            Some(needle) => needle,
            None => return true,
        };
        fields
            .iter()
            .filter_map(|field| field(record))
            .any(|value| value.to_lowercase().contains(needle.as_str()))
    }
}

/// Records where at least one field contains `query`, in input order
pub fn search<'a, T, I>(records: I, query: &str, fields: &[FieldSelector<T>]) -> Vec<&'a T>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
{
    let query = SearchQuery::new(query);
    records
        .into_iter()
        .filter(|record| query.matches(*record, fields))
        .collect()
}

/// [`search`] over the record type's default fields
pub fn search_records<'a, T, I>(records: I, query: &str) -> Vec<&'a T>
where
    T: ContentRecord,
    I: IntoIterator<Item = &'a T>,
{
    search(records, query, T::search_fields())
}
