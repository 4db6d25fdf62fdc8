use std::io::Read;

use tracing::{debug, warn};

use crate::issuance::{IssuanceTimeline, LogOutcome};
use crate::series::PageloadSeries;
use crate::types::{IngestError, IngestIssue, IngestStats, Result, ValidationPolicy};
use crate::validate::{RawRecord, validate_record};

/// Pageload CSV column holding the date key.
pub const DATE_COLUMN: &str = "submission_date";

/// Reads the pageload CSV (with header row) into `series`.
pub fn read_pageloads<R: Read>(
    reader: R,
    series: &mut PageloadSeries,
    policy: ValidationPolicy,
) -> Result<IngestStats> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut stats = IngestStats::default();

    for result in reader.records() {
        let record = result?;
        stats.rows_read += 1;
        let line = record.position().map(|position| position.line());
        let fields: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        match log_pageload(series, &fields, line) {
            Ok(()) => stats.rows_logged += 1,
            Err(err) if policy == ValidationPolicy::Skip => {
                warn!(line = ?line, error = %err, "skipping invalid pageload row");
                stats.rows_skipped += 1;
                stats.issues.push(IngestIssue {
                    line,
                    message: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        rows = stats.rows_read,
        days = series.len(),
        skipped = stats.rows_skipped,
        "read pageload rows"
    );
    Ok(stats)
}

fn log_pageload(series: &mut PageloadSeries, fields: &RawRecord, line: Option<u64>) -> Result<()> {
    let date = fields
        .get(DATE_COLUMN)
        .filter(|date| !date.is_empty())
        .ok_or(IngestError::MissingDate { line })?;
    // Validate before touching the series so a rejected row never creates a day.
    let record = validate_record(fields)?;
    series.for_day(date).push(record);
    Ok(())
}

/// Reads the tab-separated issuance timeline (no header) into `timeline`.
///
/// Blank lines are passed to the timeline as empty rows so they are counted
/// and reported like any other skipped row.
pub fn read_issuance<R: Read>(
    mut reader: R,
    timeline: &mut IssuanceTimeline,
) -> Result<IngestStats> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    // Every row then ends with a newline, so each record accounts for its own lines.
    if input.last().is_some_and(|byte| *byte != b'\n') {
        input.push(b'\n');
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_slice());
    let mut stats = IngestStats::default();
    let mut record = csv::StringRecord::new();

    loop {
        let start_line = reader.position().line();
        let has_record = reader.read_record(&mut record)?;
        let end_line = reader.position().line();
        let record_lines = if has_record {
            1 + embedded_newlines(&record)
        } else {
            0
        };

        // The csv reader steps over blank lines without yielding a record.
        let blank_lines = end_line
            .saturating_sub(start_line)
            .saturating_sub(record_lines);
        for _ in 0..blank_lines {
            stats.rows_read += 1;
            stats.rows_skipped += 1;
            timeline.log(Vec::new());
        }
        if !has_record {
            break;
        }

        stats.rows_read += 1;
        let line = Some(end_line.saturating_sub(record_lines));
        let fields: Vec<String> = record.iter().map(str::to_string).collect();

        match timeline.log(fields) {
            outcome if outcome.is_stored() => stats.rows_logged += 1,
            LogOutcome::SkippedShort => {
                stats.rows_skipped += 1;
                stats.issues.push(IngestIssue {
                    line,
                    message: format!("issuance row has {} fields", record.len()),
                });
            }
            _ => stats.rows_skipped += 1,
        }
    }

    debug!(
        rows = stats.rows_read,
        dates = timeline.len(),
        skipped = stats.rows_skipped,
        "read issuance rows"
    );
    Ok(stats)
}

fn embedded_newlines(record: &csv::StringRecord) -> u64 {
    record
        .iter()
        .map(|field| field.matches('\n').count() as u64)
        .sum()
}
