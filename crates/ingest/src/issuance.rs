use std::collections::HashMap;

use adoption_core::IssuanceEntry;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    Stored,
    /// An earlier entry for the same date was overwritten.
    Replaced,
    SkippedEmpty,
    SkippedShort,
}

impl LogOutcome {
    pub fn is_stored(self) -> bool {
        matches!(self, Self::Stored | Self::Replaced)
    }
}

/// Date-keyed certificate issuance counts. Last write for a date wins.
#[derive(Debug, Clone, Default)]
pub struct IssuanceTimeline {
    entries: HashMap<String, IssuanceEntry>,
}

impl IssuanceTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, fields: Vec<String>) -> LogOutcome {
        if fields.is_empty() {
            debug!("skipping empty issuance row");
            return LogOutcome::SkippedEmpty;
        }
        let field_count = fields.len();
        let Some(entry) = IssuanceEntry::from_fields(fields) else {
            warn!(field_count, "skipping issuance row with too few fields");
            return LogOutcome::SkippedShort;
        };
        match self.entries.insert(entry.date().to_string(), entry) {
            Some(previous) => {
                debug!(date = previous.date(), "replacing issuance entry");
                LogOutcome::Replaced
            }
            None => LogOutcome::Stored,
        }
    }

    pub fn for_day(&self, date: &str) -> Option<&IssuanceEntry> {
        self.entries.get(date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
