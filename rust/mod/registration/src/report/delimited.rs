use super::row_cells;
use crate::model::Registration;

pub const CSV_HEADERS: [&str; 9] = [
    "Registration ID",
    "Name",
    "Faculty",
    "Batch",
    "Gender",
    "Date of Birth",
    "Phone",
    "Email",
    "Registration Date",
];

const SEP: char = ',';

/// Render the header line and one `\n`-terminated line per record.
pub fn render_csv(records: &[Registration]) -> String {
    let mut out = String::with_capacity(128 * (records.len() + 1));
    push_line(&mut out, CSV_HEADERS.iter().copied());
    for record in records {
        let cells = row_cells(record, "%Y-%m-%d %H:%M:%S");
        push_line(&mut out, cells.iter().map(String::as_str));
    }
    out
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(SEP);
        }
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

/// Quote a field only when it holds the separator, a quote, CR or LF.
pub(crate) fn escape_field(s: &str) -> String {
    if s.contains([SEP, '"', '\r', '\n']) {
        let escaped = s.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        s.to_string()
    }
}
