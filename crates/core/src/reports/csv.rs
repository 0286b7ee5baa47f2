//! CSV rendering for reports.
//!
//! Hand-rolled RFC 4180 quoting; the report surface is small enough that a
//! dedicated CSV dependency is not warranted.

use super::types::CollectionsReport;

const HEADER: &str =
    "enrollment_id,student_name,program_name,total_value,total_paid,remaining_balance,payment_status,enrolled_on";

/// Renders a collections report as CSV, header row included.
#[must_use]
pub fn render_collections_csv(report: &CollectionsReport) -> String {
    let mut out = String::with_capacity(64 * (report.rows.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for row in &report.rows {
        out.push_str(&row.enrollment_id.to_string());
        out.push(',');
        out.push_str(&escape_field(&row.student_name));
        out.push(',');
        out.push_str(&escape_field(&row.program_name));
        out.push(',');
        out.push_str(&row.total_value.to_string());
        out.push(',');
        out.push_str(&row.total_paid.to_string());
        out.push(',');
        out.push_str(&row.remaining_balance.to_string());
        out.push(',');
        out.push_str(&row.payment_status);
        out.push(',');
        out.push_str(&row.enrolled_on.to_string());
        out.push('\n');
    }

    out
}

/// Quotes a field when it contains a comma, quote, or newline.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::types::EnrollmentCollectionRow;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn report_with(names: &[&str]) -> CollectionsReport {
        let rows = names
            .iter()
            .map(|name| EnrollmentCollectionRow {
                enrollment_id: Uuid::now_v7(),
                student_name: (*name).to_string(),
                program_name: "Criminology Review".to_string(),
                total_value: dec!(10000),
                total_paid: dec!(4000),
                remaining_balance: dec!(6000),
                payment_status: "partial".to_string(),
                enrolled_on: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            })
            .collect();
        CollectionsReport::from_rows(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), rows)
    }

    #[test]
    fn test_header_and_row_count() {
        let csv = render_collections_csv(&report_with(&["Ana Cruz", "Ben Reyes"]));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("enrollment_id,student_name"));
        assert!(lines[1].contains("Ana Cruz"));
        assert!(lines[1].contains("4000"));
    }

    #[test]
    fn test_comma_in_name_is_quoted() {
        let csv = render_collections_csv(&report_with(&["Cruz, Ana"]));
        assert!(csv.contains("\"Cruz, Ana\""));
    }

    #[test]
    fn test_quote_in_name_is_doubled() {
        let csv = render_collections_csv(&report_with(&["Ana \"Annie\" Cruz"]));
        assert!(csv.contains("\"Ana \"\"Annie\"\" Cruz\""));
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let csv = render_collections_csv(&report_with(&[]));
        assert_eq!(csv.lines().count(), 1);
    }
}
