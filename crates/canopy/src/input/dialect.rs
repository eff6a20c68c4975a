//! Delimiter and quote detection from a leading sample of the file.

use std::io::{BufRead, BufReader};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Quote characters to try when auto-detecting.
const QUOTES: &[u8] = &[b'"', b'\''];

/// Default number of leading bytes inspected by [`Dialect::sniff`].
pub const DEFAULT_SAMPLE_SIZE: usize = 4096;

/// Delimiter/quoting convention of a delimited text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// True when the dialect was detected from the data rather than defaulted.
    pub sniffed: bool,
}

impl Default for Dialect {
    /// Comma-delimited, double-quoted: the spreadsheet export dialect.
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            sniffed: false,
        }
    }
}

impl Dialect {
    /// A dialect with an explicit delimiter and double quotes.
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    /// Short label for the delimiter, used in metadata and summaries.
    pub fn format(&self) -> &'static str {
        match self.delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
    }

    /// Detect the dialect from the first `sample_size` bytes.
    ///
    /// Never fails: when no delimiter can be identified the default
    /// comma/double-quote dialect is returned.
    pub fn sniff(bytes: &[u8], sample_size: usize) -> Self {
        let sample = &bytes[..bytes.len().min(sample_size)];

        match sniff_delimiter(sample) {
            Some(delimiter) => {
                let quote = sniff_quote(sample, delimiter);
                debug!(
                    delimiter = %(delimiter as char).escape_default(),
                    quote = %(quote as char),
                    "sniffed dialect"
                );
                Self {
                    delimiter,
                    quote,
                    sniffed: true,
                }
            }
            None => {
                debug!("could not sniff dialect, falling back to comma-delimited");
                Self::default()
            }
        }
    }
}

/// Lines of the sample worth scoring. A multi-byte character cut at the
/// sample boundary only damages the last line.
fn sample_lines(sample: &[u8]) -> Vec<String> {
    BufReader::new(sample)
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect()
}

/// Pick the delimiter whose per-line count is highest and most consistent.
fn sniff_delimiter(sample: &[u8]) -> Option<u8> {
    let lines = sample_lines(sample);
    if lines.is_empty() {
        return None;
    }

    let mut best: Option<(u8, usize)> = None;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs rarely occur inside values.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if best.is_none_or(|(_, s)| score > s) {
            best = Some((delim, score));
        }
    }

    best.map(|(delim, _)| delim)
}

/// Pick the quote character that most often wraps whole fields.
fn sniff_quote(sample: &[u8], delimiter: u8) -> u8 {
    let lines = sample_lines(sample);
    let delim = delimiter as char;

    let mut best = (b'"', 0usize);
    for &quote in QUOTES {
        let q = quote as char;
        let wrapped = lines
            .iter()
            .flat_map(|line| line.split(delim))
            .filter(|field| {
                let f = field.trim();
                f.len() >= 2 && f.starts_with(q) && f.ends_with(q)
            })
            .count();
        if wrapped > best.1 {
            best = (quote, wrapped);
        }
    }
    best.0
}

/// Count delimiter occurrences in a line, ignoring those inside double quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_csv() {
        let data = b"X,Y,Name\n1,2,Oak\n3,4,Elm";
        let dialect = Dialect::sniff(data, DEFAULT_SAMPLE_SIZE);
        assert_eq!(dialect.delimiter, b',');
        assert!(dialect.sniffed);
        assert_eq!(dialect.format(), "csv");
    }

    #[test]
    fn test_sniff_tsv() {
        let data = b"X\tY\tName\n1\t2\tOak\n3\t4\tElm";
        assert_eq!(Dialect::sniff(data, DEFAULT_SAMPLE_SIZE).delimiter, b'\t');
    }

    #[test]
    fn test_sniff_semicolon() {
        let data = b"X;Y;Name\n1;2;Oak\n";
        assert_eq!(Dialect::sniff(data, DEFAULT_SAMPLE_SIZE).delimiter, b';');
    }

    #[test]
    fn test_delimiters_inside_quotes_ignored() {
        let data = b"Name,Description\nOak,\"big, old; tall\"\nElm,\"a; b; c\"";
        assert_eq!(Dialect::sniff(data, DEFAULT_SAMPLE_SIZE).delimiter, b',');
    }

    #[test]
    fn test_single_quote_detected() {
        let data = b"Name,Description\n'Oak','big, old'\n'Elm','short'";
        let dialect = Dialect::sniff(data, DEFAULT_SAMPLE_SIZE);
        assert_eq!(dialect.quote, b'\'');
    }

    #[test]
    fn test_fallback_on_empty() {
        let dialect = Dialect::sniff(b"", DEFAULT_SAMPLE_SIZE);
        assert_eq!(dialect, Dialect::default());
        assert!(!dialect.sniffed);
    }

    #[test]
    fn test_fallback_on_single_column() {
        let dialect = Dialect::sniff(b"Name\nOak\nElm\n", DEFAULT_SAMPLE_SIZE);
        assert_eq!(dialect.delimiter, b',');
        assert!(!dialect.sniffed);
    }

    #[test]
    fn test_sample_is_bounded() {
        // Only the first line fits in the sample; the tabs later on are unseen.
        let data = b"a,b,c\nx\ty\tz\tw\tv\n";
        assert_eq!(Dialect::sniff(data, 6).delimiter, b',');
    }
}
