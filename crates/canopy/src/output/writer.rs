//! Writing cleaned and passthrough tables.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{CanopyError, Result};
use crate::input::RawRecord;
use crate::normalize::{CLEAN_COLUMNS, CleanRecord};

/// Writer builder for the spreadsheet dialect: comma, minimal quoting, CRLF.
fn builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .has_headers(false);
    builder
}

/// Create the output file, making its parent directory if needed.
fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| CanopyError::io(parent, e))?;
        }
    }
    let file = File::create(path).map_err(|e| CanopyError::io(path, e))?;
    Ok(BufWriter::new(file))
}

/// Flush a csv writer, mapping failures to the output path.
fn finish<W: Write>(writer: csv::Writer<W>, path: &Path) -> Result<()> {
    let mut inner = writer.into_inner().map_err(|e| {
        let source = io::Error::new(e.error().kind(), e.error().to_string());
        CanopyError::io(path, source)
    })?;
    inner.flush().map_err(|e| CanopyError::io(path, e))
}

/// Run `write` against `out` and flush, reporting any failure against `path`.
fn save_with<W, F>(path: &Path, out: W, write: F) -> Result<()>
where
    W: Write,
    F: FnOnce(W) -> Result<csv::Writer<W>>,
{
    let writer = write(out).map_err(|e| match e {
        CanopyError::Csv(e) => CanopyError::io(path, io::Error::from(e)),
        other => other,
    })?;
    finish(writer, path)
}

/// Write clean records under the fixed `X,Y,Name,...,Image` header.
pub fn write_clean_records<'a, W: Write>(
    out: W,
    records: impl IntoIterator<Item = &'a CleanRecord>,
) -> Result<csv::Writer<W>> {
    let mut writer = builder().from_writer(out);
    writer.write_record(CLEAN_COLUMNS)?;
    for record in records {
        writer.write_record(record.values())?;
    }
    Ok(writer)
}

/// Write clean records to a file.
pub fn save_clean_records<'a>(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = &'a CleanRecord>,
) -> Result<()> {
    let path = path.as_ref();
    save_with(path, create(path)?, |out| write_clean_records(out, records))
}

/// Write records under an arbitrary header; missing fields are written empty.
pub fn write_records<'a, W: Write>(
    out: W,
    headers: &[String],
    records: impl IntoIterator<Item = &'a RawRecord>,
) -> Result<csv::Writer<W>> {
    let mut writer = builder().from_writer(out);
    writer.write_record(headers)?;
    for record in records {
        writer.write_record(headers.iter().map(|h| record.get(h)))?;
    }
    Ok(writer)
}

/// Write records to a file under an arbitrary header.
pub fn save_records<'a>(
    path: impl AsRef<Path>,
    headers: &[String],
    records: impl IntoIterator<Item = &'a RawRecord>,
) -> Result<()> {
    let path = path.as_ref();
    save_with(path, create(path)?, |out| write_records(out, headers, records))
}
