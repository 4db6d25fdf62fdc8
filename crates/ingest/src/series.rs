use std::collections::BTreeMap;

use crate::daily::DailyPageloads;

/// Date-keyed arena of [`DailyPageloads`].
///
/// Keys are ISO `YYYY-MM-DD` strings, so lexicographic order is chronological
/// order.
#[derive(Debug, Clone, Default)]
pub struct PageloadSeries {
    days: BTreeMap<String, DailyPageloads>,
}

impl PageloadSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the aggregator for `date`, creating an empty one on first use.
    pub fn for_day(&mut self, date: &str) -> &mut DailyPageloads {
        self.days.entry(date.to_string()).or_default()
    }

    pub fn get(&self, date: &str) -> Option<&DailyPageloads> {
        self.days.get(date)
    }

    /// Every observed date in ascending order. Can be called repeatedly.
    pub fn all_days(&self) -> impl Iterator<Item = (&str, &DailyPageloads)> + '_ {
        self.days.iter().map(|(date, day)| (date.as_str(), day))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
