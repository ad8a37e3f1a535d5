//! Question set loading from tabular files (CSV and Excel)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::error::{QuizError, Result};
use crate::question::Question;

/// File extensions the loader understands.
pub const QUIZ_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Load questions from `path`, one per row, in file order.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let questions = match extension_of(path).as_str() {
        "csv" => parse_csv(path)?,
        "xlsx" | "xls" => parse_excel(path)?,
        _ => return Err(QuizError::UnsupportedFormat(path.to_path_buf())),
    };

    if questions.is_empty() {
        warn!(path = %path.display(), "quiz file has no questions");
    }
    info!(path = %path.display(), count = questions.len(), "loaded questions");
    Ok(questions)
}

/// Parse a headerless CSV of `prompt,answer` rows.
pub fn parse_csv(path: &Path) -> Result<Vec<Question>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| QuizError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut questions = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|source| QuizError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let cells: Vec<String> = record.iter().map(|s| s.trim().to_string()).collect();
        if let Some(q) = row_to_question(path, index + 1, &cells)? {
            questions.push(q);
        }
    }

    Ok(questions)
}

/// Parse the first sheet of an Excel workbook (`.xlsx` or legacy `.xls`) with the
/// same row layout as CSV.
pub fn parse_excel(path: &Path) -> Result<Vec<Question>> {
    let spreadsheet_err = |message: String| QuizError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| spreadsheet_err(format!("failed to open: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| spreadsheet_err("no sheets found".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| spreadsheet_err(format!("failed to read sheet: {}", e)))?;

    let mut questions = Vec::new();
    for (index, row) in range.rows().enumerate() {
        let cells: Vec<String> = row.iter().map(get_cell_string).collect();
        if let Some(q) = row_to_question(path, index + 1, &cells)? {
            questions.push(q);
        }
    }

    Ok(questions)
}

/// Blank rows are skipped; anything else must carry a prompt and an answer.
fn row_to_question(path: &Path, row: usize, cells: &[String]) -> Result<Option<Question>> {
    if cells.iter().all(|c| c.is_empty()) {
        return Ok(None);
    }

    match cells {
        [prompt, answer, ..] if !prompt.is_empty() && !answer.is_empty() => {
            Ok(Some(Question::new(prompt.as_str(), answer.as_str())))
        }
        _ => Err(QuizError::MalformedRow {
            path: path.to_path_buf(),
            row,
        }),
    }
}

/// Helper to extract string from Excel cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn csv_rows_become_questions_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "capitals.csv",
            "Capital of France?,Paris\n\"Capital of Italy, the country?\", Rome \nCapital of Spain?,Madrid,extra\n",
        );

        let questions = load_questions(&path).unwrap();
        assert_eq!(
            questions,
            vec![
                Question::new("Capital of France?", "Paris"),
                Question::new("Capital of Italy, the country?", "Rome"),
                Question::new("Capital of Spain?", "Madrid"),
            ]
        );
    }

    #[test]
    fn missing_answer_names_the_row() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "a,b\nc,d\njust a prompt\n");

        let err = load_questions(&path).unwrap_err();
        assert!(matches!(err, QuizError::MalformedRow { row: 3, .. }));
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn empty_answer_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "prompt,\n");
        assert!(matches!(
            load_questions(&path),
            Err(QuizError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gaps.csv", "a,b\n,\nc,d\n");
        assert_eq!(load_questions(&path).unwrap().len(), 2);
    }

    #[test]
    fn unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.txt", "a,b\n");
        assert!(matches!(
            load_questions(&path),
            Err(QuizError::UnsupportedFormat(_))
        ));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn xlsx_rows_become_questions_in_order() {
        let questions = load_questions(&fixture("questions.xlsx")).unwrap();
        assert_eq!(
            questions,
            vec![
                Question::new("Capital of France?", "Paris"),
                Question::new("2 + 2", "4"),
                Question::new("Half of 5", "2.5"),
                Question::new("Capital of Italy?", "Rome"),
            ]
        );
    }

    #[test]
    fn xlsx_missing_answer_names_the_sheet_row() {
        let err = load_questions(&fixture("malformed.xlsx")).unwrap_err();
        assert!(matches!(err, QuizError::MalformedRow { row: 2, .. }));
        assert!(err.to_string().contains("malformed.xlsx: row 2"));
    }

    #[test]
    fn xls_extension_uses_legacy_reader() {
        // an OOXML zip under a .xls name must go to the BIFF reader, not the xlsx one
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questions.xls");
        fs::copy(fixture("questions.xlsx"), &path).unwrap();

        assert!(matches!(
            load_questions(&path),
            Err(QuizError::Spreadsheet { .. })
        ));
    }

    #[test]
    fn unreadable_spreadsheet_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.xlsx", "not really a workbook");
        assert!(matches!(
            load_questions(&path),
            Err(QuizError::Spreadsheet { .. })
        ));
    }
}
