//! Summary table as CSV: `filename,word_count` then the eighteen category
//! columns in their fixed order.

use crate::analysis::{Category, PunctuationCounts, CATEGORY_COUNT};
use crate::error::{PunctalyzerError, Result};
use crate::report::DocumentRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const FILENAME_COLUMN: &str = "filename";
pub const WORD_COUNT_COLUMN: &str = "word_count";

pub fn header() -> Vec<&'static str> {
    let mut columns = vec![FILENAME_COLUMN, WORD_COUNT_COLUMN];
    columns.extend(Category::ALL.iter().map(|c| c.key()));
    columns
}

pub fn write_records<W: Write>(records: &[DocumentRecord], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(header())?;
    for record in records {
        let mut row = Vec::with_capacity(CATEGORY_COUNT + 2);
        row.push(record.filename.clone());
        row.push(record.word_count.to_string());
        row.extend(record.punctuation.iter().map(|(_, count)| count.to_string()));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(path: P, records: &[DocumentRecord]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_records(records, file)
}

/// Render the table to a string, as offered for download.
pub fn to_csv_string(records: &[DocumentRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| PunctalyzerError::Csv {
        message: e.to_string(),
    })
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<DocumentRecord>> {
    let mut reader = csv::Reader::from_reader(reader);

    let expected = header();
    let found = reader.headers()?;
    if found.iter().ne(expected.iter().copied()) {
        return Err(PunctalyzerError::Csv {
            message: format!(
                "unexpected header '{}'",
                found.iter().collect::<Vec<_>>().join(",")
            ),
        });
    }

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let number = |column: usize| -> Result<usize> {
            let field = row.get(column).unwrap_or("");
            field.trim().parse().map_err(|_| PunctalyzerError::Csv {
                message: format!(
                    "row {}: '{}' is not a count for column {}",
                    line + 1,
                    field,
                    expected[column]
                ),
            })
        };

        let mut counts = [0usize; CATEGORY_COUNT];
        for (index, count) in counts.iter_mut().enumerate() {
            *count = number(index + 2)?;
        }

        records.push(DocumentRecord {
            filename: row.get(0).unwrap_or("").to_string(),
            word_count: number(1)?,
            punctuation: PunctuationCounts::from_array(counts),
        });
    }

    Ok(records)
}

pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<DocumentRecord>> {
    let file = File::open(path.as_ref())?;
    read_records(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_records() -> Vec<DocumentRecord> {
        vec![
            DocumentRecord::from_text("Chapter_One.docx", "Well, well... \"Who's there?\" she said."),
            DocumentRecord::from_text("notes, draft.docx", "A; b: c/d | [e] {f} (g) – h — i!"),
        ]
    }

    #[test]
    fn test_header_order() {
        let header = header();
        assert_eq!(header.len(), 20);
        assert_eq!(header[0], "filename");
        assert_eq!(header[1], "word_count");
        assert_eq!(header[2], "apostrophes");
        assert_eq!(header[19], "vertical_bars");
    }

    #[test]
    fn test_csv_text_layout() {
        let records = vec![DocumentRecord::from_text("a.docx", "Hi, you.")];
        let text = to_csv_string(&records).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("filename,word_count,apostrophes,colons,commas,"));
        // commas=1, full_stops=1
        assert_eq!(lines[1], "a.docx,2,0,0,1,0,0,0,0,0,0,1,0,0,0,0,0,0,0,0");
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("punctuation_summary.csv");
        let records = sample_records();

        write_csv_file(&path, &records).unwrap();
        let loaded = read_csv_file(&path).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_filename_with_comma_is_quoted() {
        let text = to_csv_string(&sample_records()).unwrap();
        assert!(text.contains("\"notes, draft.docx\""));
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let text = to_csv_string(&[]).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(read_records(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_wrong_header() {
        let result = read_records("name,words\na,1\n".as_bytes());
        assert!(matches!(result, Err(PunctalyzerError::Csv { .. })));
    }

    #[test]
    fn test_rejects_bad_count() {
        let mut text = to_csv_string(&sample_records()[..1]).unwrap();
        text = text.replacen("Chapter_One.docx,", "Chapter_One.docx,many", 1);
        let result = read_records(text.as_bytes());
        assert!(matches!(result, Err(PunctalyzerError::Csv { .. })));
    }
}
