//! Loading of CSV and JSON source files into a [`Table`].
//!
//! CSV files go through encoding and delimiter auto-detection before being
//! parsed with the `csv` crate. JSON files must hold an array of objects.
//! No GCF-specific logic here.

pub mod table;

use encoding_rs::Encoding;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{ReadError, ReadResult};

pub use table::{Record, Table};

/// Supported source file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> ReadResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(ReadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// CSV table plus what was detected while reading it.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: Table,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Candidate CSV delimiters; on a tie the earlier one wins.
const DELIMITERS: [char; 4] = [';', ',', '\t', '|'];

/// Encoding label guessed by chardet, normalised to a WHATWG label.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _confidence, _language) = chardet::detect(bytes);
    let label = charset.to_lowercase();
    match label.as_str() {
        "" | "ascii" | "utf8" => "utf-8".to_string(),
        "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "cp1252" => "windows-1252".to_string(),
        _ => label,
    }
}

/// Decode bytes with the encoding named by `label`.
///
/// Unknown labels decode as lossy UTF-8. A leading byte order mark is dropped.
pub fn decode_content(bytes: &[u8], label: &str) -> String {
    let encoding = Encoding::for_label(label.trim().as_bytes()).unwrap_or(encoding_rs::UTF_8);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// The delimiter occurring most often in the header line, `,` if none does.
pub fn detect_delimiter(content: &str) -> char {
    let header = content.lines().next().unwrap_or_default();
    DELIMITERS
        .iter()
        .map(|&d| (d, header.matches(d).count()))
        .filter(|&(_, count)| count > 0)
        .fold(None, |best: Option<(char, usize)>, candidate| match best {
            Some((_, count)) if count >= candidate.1 => best,
            _ => Some(candidate),
        })
        .map_or(',', |(d, _)| d)
}

/// Turn one raw CSV field into a cell value.
///
/// Blank fields become null. Fields holding a JSON list or object are
/// decoded so nested columns look the same as in JSON sources.
pub fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(value @ (Value::Array(_) | Value::Object(_))) = serde_json::from_str::<Value>(trimmed) {
            return value;
        }
    }
    Value::String(trimmed.to_string())
}

/// Parse CSV text with an explicit delimiter.
pub fn parse_csv_str(content: &str, delimiter: char) -> ReadResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let row: Record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).map_or(Value::Null, parse_cell)))
            .collect();
        rows.push(row);
    }

    Ok(Table::new(headers, rows))
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_csv_bytes(bytes: &[u8]) -> ReadResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let table = parse_csv_str(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse JSON text holding an array of objects.
pub fn parse_json_str(content: &str) -> ReadResult<Table> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(ReadError::NotAnArrayOfObjects(json_kind(&value).to_string()));
    };

    let rows = items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            other => Err(ReadError::NotAnArrayOfObjects(format!(
                "an array containing {}",
                json_kind(&other)
            ))),
        })
        .collect::<ReadResult<Vec<Record>>>()?;

    Ok(Table::from_records(rows))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn read_non_empty(path: &Path) -> ReadResult<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ReadError::EmptyFile(path.display().to_string()));
    }
    Ok(bytes)
}

pub fn read_csv_file(path: &Path) -> ReadResult<Table> {
    let bytes = read_non_empty(path)?;
    let parsed = parse_csv_bytes(&bytes)?;
    debug!(
        path = %path.display(),
        encoding = %parsed.encoding,
        delimiter = ?parsed.delimiter,
        rows = parsed.table.len(),
        "Read CSV file"
    );
    Ok(parsed.table)
}

pub fn read_json_file(path: &Path) -> ReadResult<Table> {
    let bytes = read_non_empty(path)?;
    let table = parse_json_str(&decode_content(&bytes, "utf-8"))?;
    debug!(path = %path.display(), rows = table.len(), "Read JSON file");
    Ok(table)
}

/// Read a `.csv` or `.json` file, chosen by extension.
pub fn read_table(path: impl AsRef<Path>) -> ReadResult<Table> {
    let path = path.as_ref();
    match FileFormat::from_path(path)? {
        FileFormat::Csv => read_csv_file(path),
        FileFormat::Json => read_json_file(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let table = parse_csv_str("name;age\nAlice;30\nBob;25", ';').unwrap();

        assert_eq!(table.columns, vec!["name", "age"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["name"], "Alice");
        assert_eq!(table.rows[1]["age"], "25");
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let csv = "Type,Title\n\"Policies, strategies, and guidelines\",\"A, B\"";
        let table = parse_csv_str(csv, ',').unwrap();
        assert_eq!(table.rows[0]["Type"], "Policies, strategies, and guidelines");
        assert_eq!(table.rows[0]["Title"], "A, B");
    }

    #[test]
    fn test_empty_fields_and_short_rows_are_null() {
        let table = parse_csv_str("a;b;c\n1;;3\n4", ';').unwrap();
        assert_eq!(table.rows[0]["b"], Value::Null);
        assert_eq!(table.rows[1]["a"], "4");
        assert_eq!(table.rows[1]["c"], Value::Null);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse_csv_str("a;b\n1;2\n;\n3;4\n", ';').unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_json_cells_are_decoded() {
        let csv = "ApprovedRef;Entities\nFP001;[{\"Name\": \"Agency\"}]\nFP002;[not json";
        let table = parse_csv_str(csv, ';').unwrap();
        assert_eq!(table.rows[0]["Entities"], json!([{"Name": "Agency"}]));
        assert_eq!(table.rows[1]["Entities"], "[not json");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("ApprovedRef\nFP001"), ',');
        assert_eq!(detect_delimiter("a;b,c\n"), ';');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_csv_bytes("name;age\nAlice;30\nBob;25".as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.len(), 2);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Société");
        assert_eq!(decode_content(bytes, "windows-1252"), "Société");
        assert_eq!(decode_content("abc".as_bytes(), "no-such-encoding"), "abc");
    }

    #[test]
    fn test_bom_is_dropped() {
        let table = parse_csv_bytes("\u{feff}ApprovedRef,ProjectsID\nFP001,1".as_bytes()).unwrap();
        assert!(table.table.has_column("ApprovedRef"));
    }

    #[test]
    fn test_parse_json_str() {
        let table = parse_json_str(r#"[{"a": 1}, {"b": [{"x": 1}]}]"#).unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);

        assert!(matches!(
            parse_json_str(r#"{"a": 1}"#),
            Err(ReadError::NotAnArrayOfObjects(_))
        ));
        assert!(matches!(
            parse_json_str("[1, 2]"),
            Err(ReadError::NotAnArrayOfObjects(_))
        ));
    }

    #[test]
    fn test_read_table_rejects_other_extensions() {
        let err = read_table("projects.xlsx").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error reading file: File must be a valid json or csv file"
        );
    }

    #[test]
    fn test_read_table_empty_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file).unwrap();
        let err = read_table(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("File is empty"));
    }

    #[test]
    fn test_read_table_dispatches_by_extension() {
        let mut csv = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        write!(csv, "a,b\n1,2\n").unwrap();
        assert_eq!(read_table(csv.path()).unwrap().len(), 1);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"[{{"a": 1}}]"#).unwrap();
        assert_eq!(read_table(json.path()).unwrap().rows[0]["a"], 1);
    }
}
