use std::io::Write;

use adoption_core::{DATE_FIELD, ISSUANCE_FIELDS, OutputRow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::join::JoinReport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    JsonLines,
}

pub fn write_report<W: Write>(writer: W, report: &JoinReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, report),
        OutputFormat::JsonLines => write_json_lines(writer, report),
    }
}

/// Header row, then one row per date. Absent values are empty cells.
pub fn write_csv<W: Write>(writer: W, report: &JoinReport) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&report.header)?;
    for row in &report.rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// One JSON object per line, keys in header order, absent values as `null`.
pub fn write_json_lines<W: Write>(mut writer: W, report: &JoinReport) -> Result<()> {
    for row in &report.rows {
        let line = serde_json::to_string(&Value::Object(row_object(row)))?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

fn row_object(row: &OutputRow) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert(DATE_FIELD.to_string(), Value::from(row.date.as_str()));
    for (name, ratio) in &row.ratios {
        // Non-finite ratios have no JSON form and become null.
        let value = ratio.map(Value::from).unwrap_or(Value::Null);
        object.insert(name.clone(), value);
    }
    for (index, field) in ISSUANCE_FIELDS.iter().enumerate() {
        let value = row
            .issuance
            .as_ref()
            .map(|counts| Value::from(counts[index].as_str()))
            .unwrap_or(Value::Null);
        object.insert(field.name.to_string(), value);
    }
    object
}
