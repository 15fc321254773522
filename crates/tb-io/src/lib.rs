#![forbid(unsafe_code)]

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use tb_frame::{DataFrame, FrameError, Series};
use tb_types::{ElementKind, TEXT_MISSING};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("csv input has no headers")]
    MissingHeaders,
    #[error("delimiter {0:?} is not a single ascii character")]
    InvalidDelimiter(char),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// CSV dialect shared by [`read_csv_str`] and [`write_csv_string`].
///
/// Every field is optional when deserialized; absent fields take the
/// [`Default`] value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: char,
    /// First record names the columns on read; a names row is written on write.
    pub has_headers: bool,
    /// Strip surrounding whitespace from headers and fields on read.
    pub trim: bool,
    /// Field text that reads as a missing value and is written for one.
    pub missing_marker: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: true,
            trim: true,
            missing_marker: String::new(),
        }
    }
}

impl CsvOptions {
    fn delimiter_byte(&self) -> Result<u8, IoError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(IoError::InvalidDelimiter(self.delimiter))
        }
    }
}

/// Parse CSV text into a frame, coercing column `i` into `kinds[i]`.
///
/// Columns without a kind hint are read as text. Without headers, columns are
/// named `column_0`, `column_1`, and so on.
pub fn read_csv_str(
    input: &str,
    kinds: &[ElementKind],
    options: &CsvOptions,
) -> Result<DataFrame, IoError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .has_headers(false)
        .trim(if options.trim { Trim::All } else { Trim::None })
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record?;
        let is_header = options.has_headers && n == 0;
        let row = record
            .iter()
            .map(|field| {
                if !is_header && field == options.missing_marker {
                    TEXT_MISSING.to_owned()
                } else {
                    field.to_owned()
                }
            })
            .collect::<Vec<_>>();
        rows.push(row);
    }

    if options.has_headers {
        let header = rows.first().ok_or(IoError::MissingHeaders)?;
        if header.iter().all(String::is_empty) {
            return Err(IoError::MissingHeaders);
        }
    }

    let width = rows.first().map_or(kinds.len(), Vec::len);
    if kinds.len() > width {
        return Err(FrameError::LengthMismatch {
            expected: width,
            found: kinds.len(),
        }
        .into());
    }
    let kinds = (0..width)
        .map(|col| kinds.get(col).copied().unwrap_or(ElementKind::Text))
        .collect::<Vec<_>>();

    if options.has_headers {
        return Ok(DataFrame::load_records(&rows, None, &kinds)?);
    }

    let names = (0..width).map(|col| format!("column_{col}")).collect::<Vec<_>>();
    if rows.is_empty() {
        let empty = names
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Series::empty(name, kind))
            .collect();
        return Ok(DataFrame::from_series(empty)?);
    }
    let names = names.iter().map(String::as_str).collect::<Vec<_>>();
    Ok(DataFrame::load_records(&rows, Some(names.as_slice()), &kinds)?)
}

/// Render `frame` as CSV text, writing missing values as the missing marker.
pub fn write_csv_string(frame: &DataFrame, options: &CsvOptions) -> Result<String, IoError> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .from_writer(Vec::new());

    let records = frame.records(true, options.has_headers);
    let body_start = usize::from(options.has_headers);
    for (n, record) in records.iter().enumerate() {
        if n < body_start {
            writer.write_record(record)?;
            continue;
        }
        let fields = record.iter().map(|field| {
            if field == TEXT_MISSING {
                options.missing_marker.as_str()
            } else {
                field.as_str()
            }
        });
        writer.write_record(fields)?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use tb_frame::{Condition, Operator};
    use tb_types::{Element, ElementKind, INTEGER_MISSING};

    use super::{CsvOptions, IoError, read_csv_str, write_csv_string};

    const KINDS: [ElementKind; 3] = [ElementKind::Integer, ElementKind::Text, ElementKind::Real];

    #[test]
    fn read_applies_kind_hints_and_missing_marker() {
        let input = "id,name,score\n1,Alice,95.5\n2,,87\n,Carl,\n";
        let frame = read_csv_str(input, &KINDS, &CsvOptions::default()).expect("read");
        assert_eq!(frame.shape(), (3, 3));
        assert_eq!(frame.column_kinds(), KINDS.to_vec());
        assert_eq!(
            frame.column("id").expect("id").to_ints(),
            vec![1, 2, INTEGER_MISSING]
        );
        assert!(frame.cell(1, "name").expect("name").is_missing());
        assert!(frame.cell(2, "score").expect("score").is_missing());
    }

    #[test]
    fn unhinted_columns_are_text() {
        let frame = read_csv_str("a,b\n1,2\n", &[ElementKind::Integer], &CsvOptions::default())
            .expect("read");
        assert_eq!(
            frame.column_kinds(),
            vec![ElementKind::Integer, ElementKind::Text]
        );
        let err = read_csv_str("a\n1\n", &KINDS, &CsvOptions::default()).expect_err("too many kinds");
        assert!(matches!(err, IoError::Frame(_)), "{err}");
    }

    #[test]
    fn headers_only_gives_empty_typed_columns() {
        let frame = read_csv_str("id,name,score\n", &KINDS, &CsvOptions::default()).expect("read");
        assert_eq!(frame.shape(), (0, 3));
        assert_eq!(frame.column_names(), vec!["id", "name", "score"]);
    }

    #[test]
    fn missing_marker_skips_the_header_row() {
        let frame = read_csv_str("a,,c\n1,,3\n", &[], &CsvOptions::default()).expect("read");
        assert_eq!(frame.column_names(), vec!["a", "", "c"]);
        assert!(frame.cell(0, "").expect("cell").is_missing());

        let options = CsvOptions {
            missing_marker: "NA".to_owned(),
            ..CsvOptions::default()
        };
        let frame = read_csv_str("NA,b\nNA,x\n", &[], &options).expect("read");
        assert_eq!(frame.column_names(), vec!["NA", "b"]);
        assert!(frame.cell(0, "NA").expect("cell").is_missing());
    }

    #[test]
    fn empty_input_has_no_headers() {
        let err = read_csv_str("", &[], &CsvOptions::default()).expect_err("empty");
        assert!(matches!(err, IoError::MissingHeaders));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = read_csv_str("a,b\n1\n", &[], &CsvOptions::default()).expect_err("ragged");
        assert!(matches!(err, IoError::Csv(_)), "{err}");
    }

    #[test]
    fn headerless_input_gets_generated_names() {
        let options = CsvOptions {
            delimiter: ';',
            has_headers: false,
            ..CsvOptions::default()
        };
        let frame = read_csv_str("1; x\n2; y\n", &[ElementKind::Integer], &options).expect("read");
        assert_eq!(frame.column_names(), vec!["column_0", "column_1"]);
        assert_eq!(frame.cell(1, "column_1").expect("cell"), Element::from("y"));
    }

    #[test]
    fn untrimmed_fields_keep_whitespace() {
        let options = CsvOptions {
            trim: false,
            ..CsvOptions::default()
        };
        let frame = read_csv_str("name\n  pad \n", &[], &options).expect("read");
        assert_eq!(frame.cell(0, "name").expect("cell"), Element::from("  pad "));
    }

    #[test]
    fn quoted_fields_survive() {
        let input = "name,address\n\"Smith, John\",\"123 Main St\nApt 4\"\n";
        let frame = read_csv_str(input, &[], &CsvOptions::default()).expect("read");
        assert_eq!(
            frame.cell(0, "name").expect("name"),
            Element::from("Smith, John")
        );
        assert!(frame.cell(0, "address").expect("address").as_text().contains('\n'));
    }

    #[test]
    fn write_renders_missing_with_marker() {
        let input = "id,name,score\n1,Alice,95.5\n2,,87\n";
        let frame = read_csv_str(input, &KINDS, &CsvOptions::default()).expect("read");
        let options = CsvOptions {
            missing_marker: "NA".to_owned(),
            ..CsvOptions::default()
        };
        let output = write_csv_string(&frame, &options).expect("write");
        assert_eq!(output, "id,name,score\n1,Alice,95.5\n2,NA,87\n");

        let headerless = CsvOptions {
            has_headers: false,
            delimiter: '\t',
            ..CsvOptions::default()
        };
        let output = write_csv_string(&frame, &headerless).expect("write");
        assert_eq!(output, "1\tAlice\t95.5\n2\t\t87\n");
    }

    #[test]
    fn round_trip_after_filter() {
        let input = "id,name,score\n1,Alice,95.5\n2,Bob,87\n3,Cleo,100\n";
        let frame = read_csv_str(input, &KINDS, &CsvOptions::default()).expect("read");
        let top = frame
            .filter(&[Condition::new("score", Operator::GreaterThan, 90.0)])
            .expect("filter");
        let output = write_csv_string(&top, &CsvOptions::default()).expect("write");
        let again = read_csv_str(&output, &KINDS, &CsvOptions::default()).expect("re-read");
        assert_eq!(again.records(true, true), top.records(true, true));
        assert_eq!(again.n_rows(), 2);
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let options = CsvOptions {
            delimiter: '§',
            ..CsvOptions::default()
        };
        let err = read_csv_str("a\n", &[], &options).expect_err("delimiter");
        assert!(matches!(err, IoError::InvalidDelimiter('§')));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CsvOptions =
            serde_json::from_str(r#"{"delimiter": ";", "missing_marker": "NA"}"#).expect("json");
        assert_eq!(options.delimiter, ';');
        assert!(options.has_headers);
        assert!(options.trim);
        assert_eq!(options.missing_marker, "NA");

        let defaults: CsvOptions = serde_json::from_str("{}").expect("json");
        assert_eq!(defaults, CsvOptions::default());
    }
}
