//! Client for the NASA Exoplanet Archive TAP sync service.
//!
//! The archive serves the Planetary Systems (`ps`) table over a synchronous
//! TAP endpoint; we request the catalog columns as CSV and hand the bytes
//! to the parser.

use anyhow::Result;
use tracing::info;

use crate::fetch::{HttpClient, fetch_bytes};

/// Production TAP endpoint.
pub const TAP_BASE_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";

/// ADQL selecting the catalog columns from the `ps` table.
const CATALOG_QUERY: &str = "select pl_name, disc_year, discoverymethod, hostname, \
                             disc_facility, sy_dist, pl_rade, pl_masse, pl_orbper, \
                             st_rad, pl_eqt from ps";

pub struct ArchiveClient<C> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> ArchiveClient<C> {
    pub fn new(http: C) -> Self {
        Self::with_base_url(http, TAP_BASE_URL)
    }

    /// Points the client at a different TAP endpoint (mirrors, tests).
    pub fn with_base_url(http: C, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// Full sync URL for the catalog query. Spaces in the ADQL are
    /// percent-encoded by the URL parser at request time.
    pub fn catalog_url(&self) -> String {
        format!("{}?query={}&format=csv", self.base_url, CATALOG_QUERY)
    }

    /// Downloads the current catalog as CSV bytes.
    pub async fn fetch_catalog_csv(&self) -> Result<Vec<u8>> {
        let url = self.catalog_url();
        info!(url = %self.base_url, "Fetching exoplanet catalog from TAP service");
        let bytes = fetch_bytes(&self.http, &url).await?;
        info!(bytes = bytes.len(), "Catalog download complete");
        Ok(bytes)
    }
}
