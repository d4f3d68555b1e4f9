// CSV reader - bytes to header-keyed rows
use crate::domain::equipment::RawRow;
use csv::{ByteRecord, ReaderBuilder};

#[derive(Debug, thiserror::Error)]
pub enum CsvReadError {
    #[error("missing header row")]
    MissingHeader,
    #[error("failed to read CSV headers: {0}")]
    Header(#[from] csv::Error),
}

/// Read every data row keyed by its (trimmed) header. Ragged rows are allowed and
/// unreadable rows are skipped; only the header row is mandatory.
pub fn read_rows(contents: &[u8]) -> Result<Vec<RawRow>, CsvReadError> {
    let contents = contents.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(contents);
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(contents);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvReadError::MissingHeader);
    }

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    let mut line = 1usize;
    loop {
        line += 1;
        match reader.read_byte_record(&mut record) {
            Ok(true) => {
                if is_blank(&record) {
                    continue;
                }
                rows.push(to_row(&headers, &record));
            }
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::debug!("Skipping unreadable CSV row {}: {}", line, e);
            }
        }
    }

    Ok(rows)
}

fn to_row(headers: &[String], record: &ByteRecord) -> RawRow {
    headers
        .iter()
        .zip(record.iter())
        .filter(|(header, _)| !header.is_empty())
        .map(|(header, value)| (header.clone(), String::from_utf8_lossy(value).into_owned()))
        .collect()
}

fn is_blank(record: &ByteRecord) -> bool {
    record.iter().all(|field| field.is_empty())
}
