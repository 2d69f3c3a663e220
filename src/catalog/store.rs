use anyhow::Result;

use super::column::Column;
use super::record::{ExoplanetRecord, SearchHit};

/// Equality filters for a catalog search. `None` fields are not part of
/// the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub name: Option<String>,
    pub year: Option<i64>,
    pub method: Option<String>,
    pub host: Option<String>,
    pub facility: Option<String>,
}

impl SearchFilter {
    /// Returns `true` when no field is set. Callers must reject empty
    /// filters before searching; an unconstrained query is almost always
    /// a UI mistake, not an intent to dump the catalog.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.method.is_none()
            && self.host.is_none()
            && self.facility.is_none()
    }
}

/// Abstraction over the tabular source of exoplanet records.
pub trait CatalogStore {
    /// Inserts records, returning how many were written.
    fn insert_records(&mut self, records: &[ExoplanetRecord]) -> Result<usize>;

    /// Distinct non-null values of a column, sorted ascending. Used to
    /// populate pickers and completers.
    fn distinct_values(&self, column: Column) -> Result<Vec<String>>;

    /// Records matching every filter field that is set.
    fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchHit>>;

    /// `(x, y)` pairs from rows where both numeric columns are present.
    /// The caller receives clean, equal-length input ready for the trend
    /// aggregator.
    fn sample_pairs(&self, x: Column, y: Column) -> Result<Vec<(f64, f64)>>;

    /// Total number of records in the catalog.
    fn record_count(&self) -> Result<u64>;
}
