use std::collections::HashMap;

use adoption_core::{PageloadRecord, REQUIRED_FIELDS};

use crate::types::{IngestError, Result};

/// Candidate record as read from the source: column name to raw value.
pub type RawRecord = HashMap<String, String>;

/// Checks that all required keys are present and builds the typed record.
/// Values are not type-checked here.
pub fn validate_record(fields: &RawRecord) -> Result<PageloadRecord> {
    if let Some(field) = REQUIRED_FIELDS
        .iter()
        .find(|field| !fields.contains_key(**field))
    {
        return Err(IngestError::MissingField { field: *field });
    }
    let take = |key: &str| fields.get(key).cloned().unwrap_or_default();
    Ok(PageloadRecord {
        os: take("os"),
        country: take("country"),
        normalized_pageloads: take("normalized_pageloads"),
        ratio: take("ratio"),
        reporting_ratio: take("reporting_ratio"),
    })
}
