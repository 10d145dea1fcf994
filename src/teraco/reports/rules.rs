//! Rename rules mapping raw report filenames to their canonical names.
//!
//! A [`RuleSet`] holds two tiers of rules. Exact rules are keyed by the
//! [`normalize_name`] form of their source name, so spacing, punctuation,
//! and case differences in downloaded files still match. Pattern rules are
//! regular expressions evaluated in declaration order against the raw
//! filename and only consulted when no exact rule applies.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::teraco::reports::error::Result;
use crate::teraco::reports::names::normalize_name;

/// Canonical name of the consolidated water workbook.
pub const WATER_CONSOLIDATED: &str = "Water_Consolidated.xlsx";
/// Canonical name of the consolidated car-rental workbook.
pub const CAR_RENTAL_CONSOLIDATED: &str = "CarRental_Consolidated.xlsx";

/// Source → target pairs for the known report exports, in declaration order.
pub const STANDARD_EXACT_RULES: &[(&str, &str)] = &[
    ("CT1 IT.xlsx", "IT_CT1.xlsx"),
    ("CT1 Mains.xlsx", "Electricity_Mains_CT1.xlsx"),
    ("CT1 Diesel.xlsx", "Diesel_CT1.xlsx"),
    ("CT1 Solar.xlsx", "Solar_CT1.xlsx"),
    ("CT1 PUE report.xlsx", "PUE_CT1.xlsx"),
    ("CT IT loads.xls", "IT_Loads_CT1.xlsx"),
    ("CT2 IT.xlsx", "IT_CT2.xlsx"),
    ("CT2 Mains.xlsx", "Electricity_Mains_CT2.xlsx"),
    ("CT2 Diesel.xlsx", "Diesel_CT2.xlsx"),
    ("CT2 Solar.xlsx", "Solar_CT2.xlsx"),
    ("CT2 PUE report.xlsx", "PUE_CT2.xlsx"),
    ("ct2 IT load.xls", "IT_Loads_CT2.xlsx"),
    ("CT2 IT loads.xls", "IT_Loads_CT2.xlsx"),
    ("DB1 IT.xlsx", "IT_DB1.xlsx"),
    ("DB1 Mains.xlsx", "Electricity_Mains_DB1.xlsx"),
    ("DB1 Diesel.xlsx", "Diesel_DB1.xlsx"),
    ("DB1 Solar.xlsx", "Solar_DB1.xlsx"),
    ("DB1 PUE report.xlsx", "PUE_DB1.xlsx"),
    ("DB1 IT load.xls", "IT_Loads_DB1.xlsx"),
    ("JB-E IT.xlsx", "IT_JB-E.xlsx"),
    ("JB-E Mains.xlsx", "Electricity_Mains_JB-E.xlsx"),
    ("JB-E Diesel.xlsx", "Diesel_JB-E.xlsx"),
    ("JB-E Solar.xlsx", "Solar_JB-E.xlsx"),
    ("JB-E PUE report.xlsx", "PUE_JB-E.xlsx"),
    ("JBE IT load.xls", "IT_Loads_JB-E.xlsx"),
    ("JB-W IT.xlsx", "IT_JB-W.xlsx"),
    ("JB-W Mains.xlsx", "Electricity_Mains_JB-W.xlsx"),
    ("JB-W Diesel.xlsx", "Diesel_JB-W.xlsx"),
    ("JB-W Solar.xlsx", "Solar_JB-W.xlsx"),
    ("JB-W PUE report.xlsx", "PUE_JB-W.xlsx"),
    ("JB-W PUE Report.xlsx", "PUE_JB-W.xlsx"),
    ("JBW IT load.xls", "IT_Loads_JB-W.xlsx"),
    ("JBW IT total.xls", "IT_Loads_JB-W.xlsx"),
    ("JB2 IT.xlsx", "IT_JB2.xlsx"),
    ("JB2 Mains.xlsx", "Electricity_Mains_JB2.xlsx"),
    ("JB2 Diesel.xlsx", "Diesel_JB2.xlsx"),
    ("JB2 Solar.xlsx", "Solar_JB2.xlsx"),
    ("JB2 PUE report.xlsx", "PUE_JB2.xlsx"),
    ("JB2 IT loads.xls", "IT_Loads_JB2.xlsx"),
    ("JB3 IT.xlsx", "IT_JB3.xlsx"),
    ("JB3 Mains.xlsx", "Electricity_Mains_JB3.xlsx"),
    ("JB3 Diesel.xlsx", "Diesel_JB3.xlsx"),
    ("JB3 Solar.xlsx", "Solar_JB3.xlsx"),
    ("JB3 PUE report.xlsx", "PUE_JB3.xlsx"),
    ("JB3 IT loads.xls", "IT_Loads_JB3.xlsx"),
    ("JB4 IT.xlsx", "IT_JB4.xlsx"),
    ("JB4 Mains.xlsx", "Electricity_Mains_JB4.xlsx"),
    ("JB4 Diesel.xlsx", "Diesel_JB4.xlsx"),
    ("JB4 Solar.xlsx", "Solar_JB4.xlsx"),
    ("JB4 PUE report.xlsx", "PUE_JB4.xlsx"),
    ("JB4 PUE.xlsx", "PUE_JB4.xlsx"),
    ("JB4 IT Total (3).xls", "IT_Loads_JB4.xlsx"),
    ("JB4 IT loads.xls", "IT_Loads_JB4.xlsx"),
    ("TDE-IM-FT-028 - CT1 Refrigerant Use.xlsx", "Refrigerants_CT1.xlsx"),
    ("TDE-IM-FT-028 - CT2 Refrigerant Use.xlsx", "Refrigerants_CT2.xlsx"),
    ("TDE-IM-FT-028 - DB1 Refrigerant Use.xlsx", "Refrigerants_DB1.xlsx"),
    ("TDE-IM-FT-028 - JB1 Refrigerant Use.xlsx", "Refrigerants_JB1.xlsx"),
    ("TDE-IM-FT-028 - JB2 Refrigerant Use.xlsx", "Refrigerants_JB2.xlsx"),
    ("TDE-IM-FT-028 - JB3 Refrigerant Use.xlsx", "Refrigerants_JB3.xlsx"),
    ("TDE-IM-FT-028 - JB4 Refrigerant Use.xlsx", "Refrigerants_JB4.xlsx"),
    ("MIS REPORT - TERACO.xlsx", CAR_RENTAL_CONSOLIDATED),
];

/// Pattern rules as `(label, regex, target)`, evaluated in this order.
pub const STANDARD_PATTERN_RULES: &[(&str, &str, &str)] = &[
    (
        "water",
        r"^.*WaterMeterRecon_Construction.*\.xlsx$",
        WATER_CONSOLIDATED,
    ),
    (
        "carrental",
        r"^.*MIS REPORT - TERACO.*\.xlsx$",
        CAR_RENTAL_CONSOLIDATED,
    ),
];

/// A regular-expression rule producing a fixed canonical name.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Short tag used in logs, e.g. `water`.
    pub label: String,
    pattern: Regex,
    target: String,
}

impl PatternRule {
    /// Compiles a case-insensitive pattern rule.
    pub fn new(label: impl Into<String>, pattern: &str, target: impl Into<String>) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            label: label.into(),
            pattern,
            target: target.into(),
        })
    }

    /// Returns the canonical name when the raw filename matches.
    pub fn apply(&self, file_name: &str) -> Option<&str> {
        self.pattern
            .is_match(file_name)
            .then_some(self.target.as_str())
    }
}

/// How a filename was matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum MatchKind {
    /// Matched an exact rule after normalisation.
    Exact,
    /// Matched the pattern rule with the given label.
    Pattern(String),
}

/// Outcome of resolving a filename against a [`RuleSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub target: String,
    pub matched_by: MatchKind,
}

/// Immutable collection of rename rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    exact: HashMap<String, String>,
    patterns: Vec<PatternRule>,
}

impl RuleSet {
    /// Builds a rule set. Exact sources that normalise to the same key keep
    /// the last declared target.
    pub fn new<'a, I>(exact: I, patterns: Vec<PatternRule>) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = HashMap::new();
        for (source, target) in exact {
            map.insert(normalize_name(source), target.to_string());
        }
        Self {
            exact: map,
            patterns,
        }
    }

    /// The rule set covering every known report export.
    pub fn standard() -> Result<Self> {
        let patterns = STANDARD_PATTERN_RULES
            .iter()
            .map(|(label, pattern, target)| PatternRule::new(*label, pattern, *target))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(STANDARD_EXACT_RULES.iter().copied(), patterns))
    }

    /// Decides the canonical name for `file_name`, or `None` when no rule
    /// applies. Performs no I/O.
    pub fn resolve(&self, file_name: &str) -> Option<Resolution> {
        if let Some(target) = self.exact.get(&normalize_name(file_name)) {
            return Some(Resolution {
                target: target.clone(),
                matched_by: MatchKind::Exact,
            });
        }

        self.patterns.iter().find_map(|rule| {
            rule.apply(file_name).map(|target| Resolution {
                target: target.to_string(),
                matched_by: MatchKind::Pattern(rule.label.clone()),
            })
        })
    }
}
