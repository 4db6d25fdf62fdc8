use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Keys every pageload record must carry.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "os",
    "country",
    "normalized_pageloads",
    "ratio",
    "reporting_ratio",
];

/// Leading output column.
pub const DATE_FIELD: &str = "date";

/// An issuance timeline row must have the date plus all four counts.
pub const MIN_ISSUANCE_FIELDS: usize = 5;

/// One (os, country) slice of secure-pageload telemetry for a single day.
///
/// Numeric fields are kept as read; they are parsed when a ratio is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageloadRecord {
    pub os: String,
    pub country: String,
    pub normalized_pageloads: String,
    pub ratio: String,
    pub reporting_ratio: String,
}

/// Which records a named filter selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    All,
    Country(String),
    Os(String),
}

impl Dimension {
    pub fn matches(&self, record: &PageloadRecord) -> bool {
        match self {
            Self::All => true,
            Self::Country(country) => record.country == *country,
            Self::Os(os) => record.os == *os,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFilter {
    pub name: String,
    #[serde(rename = "match")]
    pub dimension: Dimension,
}

impl NamedFilter {
    pub fn new(name: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSetError {
    DuplicateName(String),
    Reserved(String),
}

impl fmt::Display for FilterSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "duplicate filter name: {}", name),
            Self::Reserved(name) => write!(f, "filter name collides with output column: {}", name),
        }
    }
}

impl std::error::Error for FilterSetError {}

/// Ordered, immutable set of named filters. Order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<NamedFilter>,
}

impl FilterSet {
    pub fn new(filters: Vec<NamedFilter>) -> Result<Self, FilterSetError> {
        let mut seen = HashSet::new();
        for filter in &filters {
            let name = filter.name.as_str();
            if name == DATE_FIELD || ISSUANCE_FIELDS.iter().any(|field| field.name == name) {
                return Err(FilterSetError::Reserved(filter.name.clone()));
            }
            if !seen.insert(name) {
                return Err(FilterSetError::DuplicateName(filter.name.clone()));
            }
        }
        Ok(Self { filters })
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedFilter> {
        self.filters.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|filter| filter.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            filters: default_filters(),
        }
    }
}

pub fn default_filters() -> Vec<NamedFilter> {
    let country = |name: &str, code: &str| {
        NamedFilter::new(name, Dimension::Country(code.to_string()))
    };
    vec![
        NamedFilter::new("secure_pageloads_all", Dimension::All),
        country("secure_pageloads_USA", "US"),
        country("secure_pageloads_Germany", "DE"),
        country("secure_pageloads_Japan", "JP"),
        country("secure_pageloads_India", "IN"),
        country("secure_pageloads_France", "FR"),
        country("secure_pageloads_Egypt", "EG"),
        NamedFilter::new("secure_pageloads_MacOS", Dimension::Os("Darwin".to_string())),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuanceField {
    pub name: &'static str,
    pub position: usize,
}

pub const ISSUANCE_FIELDS: [IssuanceField; 4] = [
    IssuanceField {
        name: "daily_certs_issued",
        position: 1,
    },
    IssuanceField {
        name: "total_certs_active",
        position: 2,
    },
    IssuanceField {
        name: "total_fqdns_active",
        position: 3,
    },
    IssuanceField {
        name: "total_registered_domains_active",
        position: 4,
    },
];

/// Raw positional issuance row; field 0 is the date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuanceEntry {
    fields: Vec<String>,
}

impl IssuanceEntry {
    /// Returns `None` unless the row carries the date and all four counts.
    pub fn from_fields(fields: Vec<String>) -> Option<Self> {
        if fields.len() < MIN_ISSUANCE_FIELDS {
            return None;
        }
        Some(Self { fields })
    }

    pub fn date(&self) -> &str {
        &self.fields[0]
    }

    pub fn value(&self, field: IssuanceField) -> &str {
        &self.fields[field.position]
    }

    pub fn counts(&self) -> [String; 4] {
        ISSUANCE_FIELDS.map(|field| self.value(field).to_string())
    }
}

/// One synthesized output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub date: String,
    /// Weighted ratio per filter, in filter declaration order. `None` means no
    /// matching pageloads that day.
    pub ratios: Vec<(String, Option<f64>)>,
    /// Issuance counts in [`ISSUANCE_FIELDS`] order, absent when the timeline
    /// has no entry for the date.
    pub issuance: Option<[String; 4]>,
}

impl OutputRow {
    /// Cell values in header order; absent values become empty strings.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(1 + self.ratios.len() + ISSUANCE_FIELDS.len());
        cells.push(self.date.clone());
        for (_, ratio) in &self.ratios {
            cells.push(ratio.map(format_ratio).unwrap_or_default());
        }
        match &self.issuance {
            Some(counts) => cells.extend(counts.iter().cloned()),
            None => cells.extend(ISSUANCE_FIELDS.iter().map(|_| String::new())),
        }
        cells
    }
}

/// Column names: date, each filter, then the issuance fields.
pub fn output_header(filters: &FilterSet) -> Vec<String> {
    std::iter::once(DATE_FIELD)
        .chain(filters.names())
        .chain(ISSUANCE_FIELDS.iter().map(|field| field.name))
        .map(str::to_string)
        .collect()
}

/// Shortest round-trip form that keeps a fractional part, writes exponents
/// signed and at least two digits wide, and spells non-finite values in lower
/// case: `0.7`, `1.0`, `5e-05`, `1e+16`, `nan`, `-inf`.
pub fn format_ratio(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}
