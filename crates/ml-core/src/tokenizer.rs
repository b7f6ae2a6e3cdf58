//! CSV tokenizer producing raw records
//!
//! Records are pulled lazily from decoded text. Nothing is treated as a
//! header here; the caller decides that the first record is the header.

use crate::error::{Error, Result};

/// A single CSV record: its cells in column order
pub type Record = Vec<String>;

/// Lazy iterator over the records of a decoded CSV text
pub struct Records<'a> {
    inner: csv::StringRecordsIntoIter<&'a [u8]>,
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.inner.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(Error::Csv(e))),
            };
            if record.is_empty() {
                continue;
            }
            return Some(Ok(record.iter().map(str::to_string).collect()));
        }
    }
}

/// Start pulling records from `text`.
///
/// Fields are comma separated and may be quoted with `"` (doubled to escape).
/// Blank lines produce no record. Every record must have as many fields as
/// the first one; a mismatch is reported as an error when reached.
pub fn records(text: &str) -> Result<Records<'_>> {
    check_quotes(text)?;

    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .quote(b'"')
        .flexible(false)
        .from_reader(text.as_bytes());

    Ok(Records {
        inner: reader.into_records(),
    })
}

/// Tokenize the whole text eagerly
pub fn tokenize(text: &str) -> Result<Vec<Record>> {
    records(text)?.collect()
}

/// Reject quoting the csv crate would otherwise accept by guessing.
///
/// A quote may only open a field as its first character, a closing quote
/// must be followed by a delimiter, a line break or the end of input, and a
/// quoted field must be closed. The csv crate would silently keep stray
/// quotes, merge text after a closing quote into the field, or fold the
/// rest of the file into an unclosed field.
fn check_quotes(text: &str) -> Result<()> {
    let mut line: u64 = 1;
    let mut opened_at: Option<u64> = None;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if opened_at.is_some() {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => {
                    if !matches!(chars.peek(), None | Some(',' | '\r' | '\n')) {
                        return Err(Error::CsvParse {
                            line,
                            message: "invalid closing quote: text follows the quoted field".to_string(),
                        });
                    }
                    opened_at = None;
                    at_field_start = false;
                }
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if at_field_start => opened_at = Some(line),
            '"' => {
                return Err(Error::CsvParse {
                    line,
                    message: "invalid opening quote: quote inside an unquoted field".to_string(),
                })
            }
            ',' | '\r' => at_field_start = true,
            '\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    match opened_at {
        Some(line) => Err(Error::CsvParse {
            line,
            message: "quoted field is never closed".to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(cells: &[&str]) -> Record {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let records = tokenize("A,B\nx,m1\ny,m2\n").unwrap();
        assert_eq!(records, vec![rec(&["A", "B"]), rec(&["x", "m1"]), rec(&["y", "m2"])]);
    }

    #[test]
    fn test_quoted_field_with_newline_and_comma() {
        let records = tokenize("A,B\nx,\"m1\nm2\"\ny,\"a,b\"\n").unwrap();
        assert_eq!(records[1], rec(&["x", "m1\nm2"]));
        assert_eq!(records[2], rec(&["y", "a,b"]));
    }

    #[test]
    fn test_escaped_quote() {
        let records = tokenize("A\n\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(records[1], rec(&["say \"hi\""]));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let records = tokenize("A,B\n\nx,m1\n\r\n\ny,m2").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], rec(&["y", "m2"]));
    }

    #[test]
    fn test_crlf_terminators() {
        let records = tokenize("A,B\r\nx,m1\r\n").unwrap();
        assert_eq!(records, vec![rec(&["A", "B"]), rec(&["x", "m1"])]);
    }

    #[test]
    fn test_cells_are_not_trimmed() {
        let records = tokenize("Foo ,B\n x , y \n").unwrap();
        assert_eq!(records[0], rec(&["Foo ", "B"]));
        assert_eq!(records[1], rec(&[" x ", " y "]));
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_unequal_record_length_fails() {
        let err = tokenize("A,B\nx,m1,extra\n").unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
        assert!(err.to_string().starts_with("CSVのパースに失敗しました。"));
    }

    #[test]
    fn test_unclosed_quote_fails() {
        let err = tokenize("A,B\nx,m1\ny,\"m2\nz,m3\n").unwrap_err();
        match err {
            Error::CsvParse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected CsvParse, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_inside_unquoted_field_fails() {
        let err = tokenize("A,B\nx,m1\ny,ab\"c\n").unwrap_err();
        match err {
            Error::CsvParse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("opening quote"));
            }
            other => panic!("expected CsvParse, got {:?}", other),
        }
    }

    #[test]
    fn test_text_after_closing_quote_fails() {
        let err = tokenize("A,B\nx,\"m1\"junk\n").unwrap_err();
        match err {
            Error::CsvParse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("closing quote"));
            }
            other => panic!("expected CsvParse, got {:?}", other),
        }
    }

    #[test]
    fn test_closing_quote_before_delimiter_or_end() {
        let records = tokenize("A,B\r\n\"x\",\"m1\"\r\n\"y\",\"m2\"").unwrap();
        assert_eq!(records[1], rec(&["x", "m1"]));
        assert_eq!(records[2], rec(&["y", "m2"]));
    }

    #[test]
    fn test_records_are_lazy() {
        let mut iter = records("A,B\nx,m1\ny,m2,bad\n").unwrap();
        assert_eq!(iter.next().unwrap().unwrap(), rec(&["A", "B"]));
        assert_eq!(iter.next().unwrap().unwrap(), rec(&["x", "m1"]));
        assert!(iter.next().unwrap().is_err());
    }
}
