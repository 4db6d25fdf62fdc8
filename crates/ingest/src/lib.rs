mod daily;
mod issuance;
mod reader;
mod series;
mod types;
mod validate;

pub use daily::DailyPageloads;
pub use issuance::{IssuanceTimeline, LogOutcome};
pub use reader::{DATE_COLUMN, read_issuance, read_pageloads};
pub use series::PageloadSeries;
pub use types::{IngestError, IngestIssue, IngestStats, Result, ValidationPolicy};
pub use validate::{RawRecord, validate_record};
