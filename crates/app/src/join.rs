use adoption_core::{FilterSet, IssuanceEntry, OutputRow, output_header};
use ingest::{IssuanceTimeline, PageloadSeries};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Synthesized series plus the dates that had no issuance entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinReport {
    pub header: Vec<String>,
    pub rows: Vec<OutputRow>,
    pub missing_issuance: Vec<String>,
}

/// Left outer join of the pageload series with the issuance timeline on date.
#[derive(Debug, Clone)]
pub struct SeriesJoiner {
    filters: FilterSet,
}

impl SeriesJoiner {
    pub fn new(filters: FilterSet) -> Self {
        Self { filters }
    }

    pub fn header(&self) -> Vec<String> {
        output_header(&self.filters)
    }

    /// One row per pageload date, ascending. Timeline-only dates are ignored.
    pub fn join(&self, series: &PageloadSeries, timeline: &IssuanceTimeline) -> Result<JoinReport> {
        let header = self.header();
        let mut rows = Vec::with_capacity(series.len());
        let mut missing_issuance = Vec::new();

        for (date, day) in series.all_days() {
            let mut ratios = Vec::with_capacity(self.filters.len());
            for filter in self.filters.iter() {
                let ratio = day
                    .weighted_ratio(|record| filter.dimension.matches(record))
                    .map_err(|source| AppError::Aggregate {
                        date: date.to_string(),
                        filter: filter.name.clone(),
                        source,
                    })?;
                ratios.push((filter.name.clone(), ratio));
            }

            let issuance = timeline.for_day(date).map(IssuanceEntry::counts);
            if issuance.is_none() {
                debug!(date, "no issuance stats for date");
                missing_issuance.push(date.to_string());
            }

            let row = OutputRow {
                date: date.to_string(),
                ratios,
                issuance,
            };
            info!("{}", describe_row(&header, &row));
            rows.push(row);
        }

        Ok(JoinReport {
            header,
            rows,
            missing_issuance,
        })
    }
}

fn describe_row(header: &[String], row: &OutputRow) -> String {
    header
        .iter()
        .zip(row.cells())
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}
