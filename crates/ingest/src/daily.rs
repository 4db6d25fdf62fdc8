use adoption_core::PageloadRecord;

use crate::types::{IngestError, Result};
use crate::validate::{RawRecord, validate_record};

/// All pageload records observed for one date.
#[derive(Debug, Clone, Default)]
pub struct DailyPageloads {
    records: Vec<PageloadRecord>,
}

impl DailyPageloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a record. Repeated records accumulate.
    pub fn log(&mut self, fields: &RawRecord) -> Result<()> {
        let record = validate_record(fields)?;
        self.push(record);
        Ok(())
    }

    pub fn push(&mut self, record: PageloadRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pageload-weighted mean of `ratio` over the records matching `filter`.
    ///
    /// Returns `Ok(None)` when nothing matches or the matching records carry no
    /// pageload weight. Fails if a matching record has a non-numeric
    /// `normalized_pageloads` or `ratio`.
    pub fn weighted_ratio<F>(&self, filter: F) -> Result<Option<f64>>
    where
        F: Fn(&PageloadRecord) -> bool,
    {
        let mut samples = Vec::new();
        for record in self.records.iter().filter(|record| filter(*record)) {
            let weight = parse_number("normalized_pageloads", &record.normalized_pageloads)?;
            let ratio = parse_number("ratio", &record.ratio)?;
            samples.push((weight, ratio));
        }

        let total_weight: f64 = samples.iter().map(|(weight, _)| weight).sum();
        if samples.is_empty() || total_weight == 0.0 {
            return Ok(None);
        }

        let weighted: f64 = samples
            .iter()
            .map(|(weight, ratio)| ratio * (weight / total_weight))
            .sum();
        Ok(Some(weighted))
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| IngestError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoption_core::Dimension;
    use proptest::prelude::*;

    fn record(os: &str, country: &str, pageloads: f64, ratio: f64) -> PageloadRecord {
        PageloadRecord {
            os: os.to_string(),
            country: country.to_string(),
            normalized_pageloads: pageloads.to_string(),
            ratio: ratio.to_string(),
            reporting_ratio: "1".to_string(),
        }
    }

    fn sample_day() -> DailyPageloads {
        let mut day = DailyPageloads::new();
        day.push(record("Darwin", "US", 2.0, 0.5));
        day.push(record("Linux", "DE", 2.0, 0.9));
        day
    }

    #[test]
    fn all_filter_weights_by_pageloads() {
        let ratio = sample_day().weighted_ratio(|_| true).expect("ratio").expect("data");
        assert!((ratio - 0.7).abs() < 1e-12);
    }

    #[test]
    fn country_filter_uses_only_matching_records() {
        let us = Dimension::Country("US".to_string());
        let ratio = sample_day()
            .weighted_ratio(|record| us.matches(record))
            .expect("ratio")
            .expect("data");
        assert!((ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn uneven_weights() {
        let mut day = DailyPageloads::new();
        day.push(record("Windows_NT", "IN", 3.0, 0.2));
        day.push(record("Windows_NT", "IN", 1.0, 0.6));
        let ratio = day.weighted_ratio(|_| true).expect("ratio").expect("data");
        assert!((ratio - 0.3).abs() < 1e-12);
    }

    #[test]
    fn no_match_is_no_data() {
        let eg = Dimension::Country("EG".to_string());
        let ratio = sample_day()
            .weighted_ratio(|record| eg.matches(record))
            .expect("ratio");
        assert_eq!(ratio, None);
    }

    #[test]
    fn zero_weight_is_no_data() {
        let mut day = DailyPageloads::new();
        day.push(record("Linux", "FR", 0.0, 0.8));
        assert_eq!(day.weighted_ratio(|_| true).expect("ratio"), None);
    }

    #[test]
    fn non_numeric_ratio_fails_at_aggregation() {
        let mut day = sample_day();
        let mut bad = record("Linux", "JP", 1.0, 0.0);
        bad.ratio = "high".to_string();
        day.push(bad);

        match day.weighted_ratio(|_| true) {
            Err(IngestError::InvalidNumber { field, value }) => {
                assert_eq!(field, "ratio");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // Records outside the filter are never parsed.
        let us = Dimension::Country("US".to_string());
        assert!(day.weighted_ratio(|record| us.matches(record)).is_ok());
    }

    #[test]
    fn log_rejects_incomplete_record() {
        let mut day = DailyPageloads::new();
        let fields: RawRecord = [("os", "Linux"), ("country", "DE")]
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        assert!(day.log(&fields).is_err());
        assert!(day.is_empty());
    }

    proptest! {
        #[test]
        fn prop_constant_ratio_is_returned_exactly(
            ratio in 0.0f64..1.0,
            weights in prop::collection::vec(0.01f64..1000.0, 1..20)
        ) {
            let mut day = DailyPageloads::new();
            for weight in &weights {
                day.push(record("Linux", "US", *weight, ratio));
            }
            let result = day.weighted_ratio(|_| true).expect("ratio").expect("data");
            prop_assert!((result - ratio).abs() < 1e-9);
        }

        #[test]
        fn prop_insertion_order_does_not_matter(
            samples in prop::collection::vec((0.01f64..1000.0, 0.0f64..1.0), 1..20)
        ) {
            let mut forward = DailyPageloads::new();
            let mut reverse = DailyPageloads::new();
            for (weight, ratio) in &samples {
                forward.push(record("Darwin", "DE", *weight, *ratio));
            }
            for (weight, ratio) in samples.iter().rev() {
                reverse.push(record("Darwin", "DE", *weight, *ratio));
            }
            let total: f64 = samples.iter().map(|(weight, _)| weight).sum();
            let expected = samples
                .iter()
                .map(|(weight, ratio)| weight * ratio)
                .sum::<f64>()
                / total;

            let a = forward.weighted_ratio(|_| true).expect("ratio").expect("data");
            let b = reverse.weighted_ratio(|_| true).expect("ratio").expect("data");
            prop_assert!((a - b).abs() < 1e-9);
            prop_assert!((a - expected).abs() < 1e-9);
        }
    }
}
