//! CSV decoding for the TAP catalog download.

use anyhow::{Context, Result};

use crate::catalog::ExoplanetRecord;

/// Decodes TAP CSV bytes (header row included) into catalog records.
/// Blank fields become `None`.
///
/// # Errors
///
/// Returns an error if a row fails to deserialize; the archive emits
/// clean CSV, so a malformed row means a truncated or non-CSV response.
pub fn parse_catalog_csv(bytes: &[u8]) -> Result<Vec<ExoplanetRecord>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut records = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let record: ExoplanetRecord =
            result.with_context(|| format!("malformed catalog CSV row {}", i + 1))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "pl_name,disc_year,discoverymethod,hostname,disc_facility,sy_dist,pl_rade,pl_masse,pl_orbper,st_rad,pl_eqt";

    #[test]
    fn test_parse_header_only() {
        let records = parse_catalog_csv(HEADER.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_full_row() {
        let csv = format!(
            "{HEADER}\nKepler-22 b,2011,Transit,Kepler-22,Kepler,190.26,2.38,9.1,289.86,0.87,262\n"
        );
        let records = parse_catalog_csv(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.pl_name.as_deref(), Some("Kepler-22 b"));
        assert_eq!(r.disc_year, Some(2011));
        assert_eq!(r.pl_rade, Some(2.38));
        assert_eq!(r.pl_eqt, Some(262.0));
    }

    #[test]
    fn test_parse_blank_fields_become_none() {
        let csv = format!(
            "{HEADER}\nPSR B1257+12 b,1994,Pulsar Timing,PSR B1257+12,Arecibo Observatory,710.0,,,25.262,,\n"
        );
        let records = parse_catalog_csv(csv.as_bytes()).unwrap();

        let r = &records[0];
        assert_eq!(r.pl_rade, None);
        assert_eq!(r.pl_masse, None);
        assert_eq!(r.st_rad, None);
        assert_eq!(r.pl_eqt, None);
        assert_eq!(r.pl_orbper, Some(25.262));
    }

    #[test]
    fn test_parse_rejects_garbage_row() {
        let csv = format!("{HEADER}\nKepler-22 b,not-a-year,Transit,Kepler-22,Kepler,,,,,,\n");
        assert!(parse_catalog_csv(csv.as_bytes()).is_err());
    }
}
