use serde::{Deserialize, Serialize};

/// One row of the archive's `ps` table as ingested into the local catalog.
///
/// Every field is optional: the archive leaves most measurements blank for
/// most planets, and blank CSV fields deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExoplanetRecord {
    pub pl_name: Option<String>,
    pub disc_year: Option<i64>,
    pub discoverymethod: Option<String>,
    pub hostname: Option<String>,
    pub disc_facility: Option<String>,
    pub sy_dist: Option<f64>,
    pub pl_rade: Option<f64>,
    pub pl_masse: Option<f64>,
    pub pl_orbper: Option<f64>,
    pub st_rad: Option<f64>,
    pub pl_eqt: Option<f64>,
}

/// The identity columns returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub pl_name: Option<String>,
    pub disc_year: Option<i64>,
    pub discoverymethod: Option<String>,
    pub hostname: Option<String>,
    pub disc_facility: Option<String>,
}
