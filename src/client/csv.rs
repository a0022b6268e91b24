// src/client/csv.rs

use chrono::NaiveDate;

use crate::models::lead::Lead;

const HEADER: [&str; 8] = [
    "Name",
    "Phone",
    "Email",
    "Status",
    "Source",
    "Follow-up",
    "Notes",
    "Created",
];

/// Arquivo gerado no cliente, pronto para download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

/// `leads-YYYY-MM-DD.csv`
pub fn export_filename(today: NaiveDate) -> String {
    format!("leads-{}.csv", today.format("%Y-%m-%d"))
}

// Aspas quando o campo tem separador, aspas ou quebra de linha
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn leads_to_csv<'a>(rows: impl IntoIterator<Item = &'a Lead>) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');

    for lead in rows {
        let follow_up = lead.follow_up_date.map(|d| d.to_string()).unwrap_or_default();
        let created = lead.created_at.format("%Y-%m-%d").to_string();
        let fields = [
            lead.name.as_str(),
            lead.phone.as_deref().unwrap_or(""),
            lead.email.as_deref().unwrap_or(""),
            lead.status.as_str(),
            lead.source.as_str(),
            follow_up.as_str(),
            lead.notes.as_deref().unwrap_or(""),
            created.as_str(),
        ];

        let line: Vec<String> = fields.iter().map(|f| escape(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_iso_date() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_filename(today), "leads-2025-03-07.csv");
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("Dubai, Marina"), "\"Dubai, Marina\"");
        assert_eq!(escape("said \"hi\""), "\"said \"\"hi\"\"\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = leads_to_csv(std::iter::empty());
        assert_eq!(csv, "Name,Phone,Email,Status,Source,Follow-up,Notes,Created\n");
    }
}
