//! Tab-separated rendering of event records

use crate::state::EventRecord;

/// Column names, in output order
pub const TSV_HEADER: [&str; 4] = ["name", "venue", "date", "attendee_count"];

/// Formats records as TSV with a header row
///
/// Tabs and line breaks inside fields are replaced by spaces so every record
/// stays on one line. An absent attendee count is an empty cell.
pub fn format_tsv(records: &[EventRecord]) -> String {
    let mut tsv = TSV_HEADER.join("\t");
    tsv.push('\n');

    for record in records {
        let count = record
            .attendee_count
            .map(|count| count.to_string())
            .unwrap_or_default();
        let row = [
            clean_field(&record.name),
            clean_field(&record.venue),
            clean_field(&record.date),
            count,
        ];
        tsv.push_str(&row.join("\t"));
        tsv.push('\n');
    }

    tsv
}

fn clean_field(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(format_tsv(&[]), "name\tvenue\tdate\tattendee_count\n");
    }

    #[test]
    fn test_rows() {
        let records = vec![
            EventRecord {
                name: "Alpha".to_string(),
                venue: "Flash".to_string(),
                date: "2019-03-01T22:00".to_string(),
                attendee_count: Some(42),
            },
            EventRecord {
                name: "Beta".to_string(),
                venue: "U Street".to_string(),
                date: "2019-03-02T23:00".to_string(),
                attendee_count: None,
            },
        ];

        let lines: Vec<_> = format_tsv(&records).lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Alpha\tFlash\t2019-03-01T22:00\t42");
        assert_eq!(lines[2], "Beta\tU Street\t2019-03-02T23:00\t");
    }

    #[test]
    fn test_fields_are_kept_on_one_line() {
        let records = vec![EventRecord {
            name: "Two\tLine\nName".to_string(),
            venue: "Club".to_string(),
            date: "2019-03-01".to_string(),
            attendee_count: None,
        }];

        let tsv = format_tsv(&records);
        assert_eq!(tsv.lines().count(), 2);
        assert!(tsv.contains("Two Line Name\tClub"));
    }
}
