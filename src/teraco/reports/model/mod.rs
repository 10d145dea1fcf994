use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::teraco::reports::rules::{CAR_RENTAL_CONSOLIDATED, WATER_CONSOLIDATED};

/// Canonical name prefixes of the energy reports subject to row trimming.
pub const ENERGY_FILE_PREFIXES: [&str; 5] = ["Electricity_Mains_", "Diesel_", "Solar_", "PUE_", "IT_"];

/// Report family a canonical file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportCategory {
    Electricity,
    Diesel,
    Solar,
    Pue,
    It,
    Refrigerant,
    Water,
    CarRental,
}

impl ReportCategory {
    /// Infers the category from a canonical filename.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.eq_ignore_ascii_case(WATER_CONSOLIDATED) {
            return Some(Self::Water);
        }
        if file_name.eq_ignore_ascii_case(CAR_RENTAL_CONSOLIDATED) {
            return Some(Self::CarRental);
        }
        let lowered = file_name.to_ascii_lowercase();
        [
            ("electricity_mains_", Self::Electricity),
            ("diesel_", Self::Diesel),
            ("solar_", Self::Solar),
            ("pue_", Self::Pue),
            ("it_", Self::It),
            ("refrigerants_", Self::Refrigerant),
        ]
        .into_iter()
        .find_map(|(prefix, category)| lowered.starts_with(prefix).then_some(category))
    }
}

/// Whether the filename starts with an energy prefix, underscore included,
/// ignoring case.
pub fn is_energy_file(file_name: &str) -> bool {
    let lowered = file_name.to_ascii_lowercase();
    ENERGY_FILE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(&prefix.to_ascii_lowercase()))
}

/// A workbook that carries its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalFile {
    pub path: PathBuf,
    pub category: Option<ReportCategory>,
    /// Site code such as `CT1` or `JB-E`, when the name carries one.
    pub site: Option<String>,
}

impl CanonicalFile {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let category = ReportCategory::from_file_name(&file_name);
        let site = match category {
            Some(ReportCategory::Water | ReportCategory::CarRental) | None => None,
            Some(_) => site_code(&file_name),
        };
        Self {
            path: path.to_path_buf(),
            category,
            site,
        }
    }
}

fn site_code(file_name: &str) -> Option<String> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    stem.rsplit('_')
        .next()
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_canonical_prefixes() {
        assert_eq!(
            ReportCategory::from_file_name("Electricity_Mains_CT1.xlsx"),
            Some(ReportCategory::Electricity)
        );
        assert_eq!(
            ReportCategory::from_file_name("IT_Loads_JB4.xlsx"),
            Some(ReportCategory::It)
        );
        assert_eq!(
            ReportCategory::from_file_name("water_consolidated.xlsx"),
            Some(ReportCategory::Water)
        );
        assert_eq!(ReportCategory::from_file_name("CT Random.xlsx"), None);
    }

    #[test]
    fn site_codes_come_from_the_last_segment() {
        let file = CanonicalFile::from_path(Path::new("/tmp/Diesel_JB-E.xlsx"));
        assert_eq!(file.category, Some(ReportCategory::Diesel));
        assert_eq!(file.site.as_deref(), Some("JB-E"));

        let file = CanonicalFile::from_path(Path::new("CarRental_Consolidated.xlsx"));
        assert_eq!(file.site, None);
    }

    #[test]
    fn energy_prefixes_keep_their_underscore() {
        assert!(is_energy_file("IT_CT1.xlsx"));
        assert!(is_energy_file("electricity_mains_CT2.xlsx"));
        assert!(is_energy_file("PUE_JB4.xlsx"));
        assert!(!is_energy_file("electricity mains CT2.xlsx"));
        assert!(!is_energy_file("Itinerary.xlsx"));
        assert!(!is_energy_file("Solarwinds licences.xlsx"));
        assert!(!is_energy_file("Pueblo.xlsx"));
        assert!(!is_energy_file("Refrigerants_CT1.xlsx"));
        assert!(!is_energy_file("Water_Consolidated.xlsx"));
    }
}
