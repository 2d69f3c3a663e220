use anyhow::{Context, Result, bail};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ToSql, params};
use std::path::Path;
use tracing::debug;

use super::column::Column;
use super::record::{ExoplanetRecord, SearchHit};
use super::store::{CatalogStore, SearchFilter};

/// SQLite-backed catalog store. One flat `exoplanets` table keyed by an
/// autoincrementing id.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Opens (or creates) the catalog database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(&path).with_context(|| {
            format!("failed to open catalog database {}", path.as_ref().display())
        })?;
        let catalog = Self { conn };
        catalog.init_schema()?;
        Ok(catalog)
    }

    /// Creates an in-memory catalog, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        let catalog = Self { conn };
        catalog.init_schema()?;
        Ok(catalog)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS exoplanets (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    pl_name TEXT,
                    disc_year INTEGER,
                    discoverymethod TEXT,
                    hostname TEXT,
                    disc_facility TEXT,
                    sy_dist REAL,
                    pl_rade REAL,
                    pl_masse REAL,
                    pl_orbper REAL,
                    st_rad REAL,
                    pl_eqt REAL
                );
                "#,
            )
            .context("failed to create exoplanets table")?;
        Ok(())
    }
}

impl CatalogStore for SqliteCatalog {
    fn insert_records(&mut self, records: &[ExoplanetRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO exoplanets \
                 (pl_name, disc_year, discoverymethod, hostname, disc_facility, \
                  sy_dist, pl_rade, pl_masse, pl_orbper, st_rad, pl_eqt) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.pl_name,
                    record.disc_year,
                    record.discoverymethod,
                    record.hostname,
                    record.disc_facility,
                    record.sy_dist,
                    record.pl_rade,
                    record.pl_masse,
                    record.pl_orbper,
                    record.st_rad,
                    record.pl_eqt,
                ])?;
            }
        }
        tx.commit()?;
        debug!(inserted = records.len(), "Catalog insert committed");
        Ok(records.len())
    }

    fn distinct_values(&self, column: Column) -> Result<Vec<String>> {
        let name = column.sql_name();
        let sql = format!(
            "SELECT DISTINCT {name} FROM exoplanets WHERE {name} IS NOT NULL ORDER BY {name} ASC"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            match row.get_ref(0)? {
                ValueRef::Integer(i) => values.push(i.to_string()),
                ValueRef::Real(r) => values.push(r.to_string()),
                ValueRef::Text(t) => values.push(String::from_utf8_lossy(t).into_owned()),
                ValueRef::Null | ValueRef::Blob(_) => {}
            }
        }
        Ok(values)
    }

    fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchHit>> {
        let mut sql = String::from(
            "SELECT pl_name, disc_year, discoverymethod, hostname, disc_facility \
             FROM exoplanets WHERE 1=1",
        );
        let mut bindings: Vec<&dyn ToSql> = Vec::new();

        if let Some(name) = &filter.name {
            sql.push_str(" AND pl_name = ?");
            bindings.push(name);
        }
        if let Some(year) = &filter.year {
            sql.push_str(" AND disc_year = ?");
            bindings.push(year);
        }
        if let Some(method) = &filter.method {
            sql.push_str(" AND discoverymethod = ?");
            bindings.push(method);
        }
        if let Some(host) = &filter.host {
            sql.push_str(" AND hostname = ?");
            bindings.push(host);
        }
        if let Some(facility) = &filter.facility {
            sql.push_str(" AND disc_facility = ?");
            bindings.push(facility);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let hits = stmt
            .query_map(&bindings[..], |row| {
                Ok(SearchHit {
                    pl_name: row.get(0)?,
                    disc_year: row.get(1)?,
                    discoverymethod: row.get(2)?,
                    hostname: row.get(3)?,
                    disc_facility: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(hits)
    }

    fn sample_pairs(&self, x: Column, y: Column) -> Result<Vec<(f64, f64)>> {
        if !x.is_numeric() || !y.is_numeric() {
            bail!(
                "both plot columns must be numeric (got {} and {})",
                x.sql_name(),
                y.sql_name()
            );
        }

        let sql = format!(
            "SELECT {x}, {y} FROM exoplanets WHERE {x} IS NOT NULL AND {y} IS NOT NULL",
            x = x.sql_name(),
            y = y.sql_name()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(pairs)
    }

    fn record_count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM exoplanets", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, year: i64, method: &str, host: &str, facility: &str) -> ExoplanetRecord {
        ExoplanetRecord {
            pl_name: Some(name.to_string()),
            disc_year: Some(year),
            discoverymethod: Some(method.to_string()),
            hostname: Some(host.to_string()),
            disc_facility: Some(facility.to_string()),
            ..Default::default()
        }
    }

    fn seeded_catalog() -> SqliteCatalog {
        let mut catalog = SqliteCatalog::in_memory().unwrap();
        let mut kepler_7b = record("Kepler-7 b", 2009, "Transit", "Kepler-7", "Kepler");
        kepler_7b.pl_rade = Some(18.0);
        kepler_7b.pl_masse = Some(140.0);

        let mut proxima = record(
            "Proxima Cen b",
            2016,
            "Radial Velocity",
            "Proxima Cen",
            "La Silla Observatory",
        );
        proxima.pl_rade = Some(1.03);

        let mut trappist = record("TRAPPIST-1 d", 2016, "Transit", "TRAPPIST-1", "TRAPPIST");
        trappist.pl_rade = Some(0.788);
        trappist.pl_masse = Some(0.388);

        catalog
            .insert_records(&[kepler_7b, proxima, trappist])
            .unwrap();
        catalog
    }

    #[test]
    fn test_insert_and_count() {
        let catalog = seeded_catalog();
        assert_eq!(catalog.record_count().unwrap(), 3);
    }

    #[test]
    fn test_distinct_values_sorted() {
        let catalog = seeded_catalog();

        let methods = catalog.distinct_values(Column::Discoverymethod).unwrap();
        assert_eq!(methods, vec!["Radial Velocity", "Transit"]);

        let years = catalog.distinct_values(Column::DiscYear).unwrap();
        assert_eq!(years, vec!["2009", "2016"]);
    }

    #[test]
    fn test_search_by_single_field() {
        let catalog = seeded_catalog();

        let filter = SearchFilter {
            method: Some("Transit".to_string()),
            ..Default::default()
        };
        let hits = catalog.search(&filter).unwrap();

        assert_eq!(hits.len(), 2);
        assert!(
            hits.iter()
                .all(|h| h.discoverymethod.as_deref() == Some("Transit"))
        );
    }

    #[test]
    fn test_search_combines_filters() {
        let catalog = seeded_catalog();

        let filter = SearchFilter {
            year: Some(2016),
            method: Some("Transit".to_string()),
            ..Default::default()
        };
        let hits = catalog.search(&filter).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].pl_name.as_deref(), Some("TRAPPIST-1 d"));
    }

    #[test]
    fn test_search_no_match() {
        let catalog = seeded_catalog();

        let filter = SearchFilter {
            host: Some("Vega".to_string()),
            ..Default::default()
        };
        assert!(catalog.search(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_sample_pairs_skips_missing_values() {
        let catalog = seeded_catalog();

        // Proxima Cen b has a radius but no mass, so only two rows qualify.
        let pairs = catalog
            .sample_pairs(Column::PlRade, Column::PlMasse)
            .unwrap();

        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&(18.0, 140.0)));
        assert!(pairs.contains(&(0.788, 0.388)));
    }

    #[test]
    fn test_sample_pairs_rejects_text_column() {
        let catalog = seeded_catalog();
        assert!(
            catalog
                .sample_pairs(Column::PlName, Column::PlMasse)
                .is_err()
        );
    }

    #[test]
    fn test_empty_filter_flag() {
        assert!(SearchFilter::default().is_empty());
        let filter = SearchFilter {
            year: Some(2016),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
