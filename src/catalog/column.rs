use clap::ValueEnum;
use std::fmt;

/// A column of the exoplanets table. Carries the SQL identifier so user
/// input never reaches a query string directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Column {
    PlName,
    DiscYear,
    Discoverymethod,
    Hostname,
    DiscFacility,
    SyDist,
    PlRade,
    PlMasse,
    PlOrbper,
    StRad,
    PlEqt,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::PlName,
        Column::DiscYear,
        Column::Discoverymethod,
        Column::Hostname,
        Column::DiscFacility,
        Column::SyDist,
        Column::PlRade,
        Column::PlMasse,
        Column::PlOrbper,
        Column::StRad,
        Column::PlEqt,
    ];

    /// Identifier of the column in the exoplanets table, matching the
    /// NASA Exoplanet Archive `ps` table naming.
    pub fn sql_name(self) -> &'static str {
        match self {
            Column::PlName => "pl_name",
            Column::DiscYear => "disc_year",
            Column::Discoverymethod => "discoverymethod",
            Column::Hostname => "hostname",
            Column::DiscFacility => "disc_facility",
            Column::SyDist => "sy_dist",
            Column::PlRade => "pl_rade",
            Column::PlMasse => "pl_masse",
            Column::PlOrbper => "pl_orbper",
            Column::StRad => "st_rad",
            Column::PlEqt => "pl_eqt",
        }
    }

    /// Human-readable axis/table label.
    pub fn label(self) -> &'static str {
        match self {
            Column::PlName => "Planet Name",
            Column::DiscYear => "Discovery Year",
            Column::Discoverymethod => "Discovery Method",
            Column::Hostname => "Host Name",
            Column::DiscFacility => "Discovery Facility",
            Column::SyDist => "Distance from Earth (pc)",
            Column::PlRade => "Radius (Earth radii)",
            Column::PlMasse => "Mass (Earth masses)",
            Column::PlOrbper => "Orbital Period (days)",
            Column::StRad => "Star Radius (solar radii)",
            Column::PlEqt => "Equilibrium Temperature (K)",
        }
    }

    /// Whether the column holds numbers and can be plotted.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Column::PlName | Column::Discoverymethod | Column::Hostname | Column::DiscFacility
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}
