//! Export formatters over a full, already filtered record set.
//!
//! Both formatters take records in the order they should appear (newest
//! first) and emit one complete document. They never fetch on their own.

pub mod delimited;
pub mod pdf;

pub use delimited::{CSV_HEADERS, render_csv};
pub use pdf::render_pdf;

use crate::model::Registration;

/// Cells of one record in export column order.
///
/// `created_fmt` is a chrono format string for the registration time; the
/// CSV keeps seconds, the PDF table drops them.
pub(crate) fn row_cells(record: &Registration, created_fmt: &str) -> [String; 9] {
    [
        record.registration_id.to_string(),
        record.name.clone(),
        record.faculty.to_string(),
        record.batch.clone(),
        record.gender.to_string(),
        record.dob.format("%Y-%m-%d").to_string(),
        record.phone.clone(),
        record.email.clone(),
        record.created_at.format(created_fmt).to_string(),
    ]
}
