// Primitives for reading CSV files.

use std::io::Read;

use log::{debug, info, warn};
use snafu::prelude::*;

use crate::dashboard::*;

pub fn read_csv_file(path: &str) -> BDashResult<Vec<RawRow>> {
    let rdr = csv_builder().from_path(path).context(CsvOpenSnafu { path })?;
    read_records(rdr, path)
}

pub fn read_csv_bytes(bytes: &[u8], origin: &str) -> BDashResult<Vec<RawRow>> {
    read_records(csv_builder().from_reader(bytes), origin)
}

// Rows may be shorter or longer than the header.
fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

/// Reads all the rows, keyed by the header names.
///
/// A row that cannot be decoded is skipped: the other rows are still usable.
fn read_records<R: Read>(mut rdr: csv::Reader<R>, origin: &str) -> BDashResult<Vec<RawRow>> {
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("read_records: {}: headers: {:?}", origin, headers);

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = match line_r {
            Ok(line) => line,
            Err(e) => {
                warn!("read_records: {}: skipping line {}: {}", origin, lineno, e);
                continue;
            }
        };
        res.push(RawRow::from_pairs(
            headers.iter().map(|h| h.as_str()).zip(line.iter()),
        ));
    }
    info!(
        "read_records: {}: read {:?} rows",
        simplify_location(origin),
        res.len()
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keyed_by_header() {
        let text = "Nom,Tipus,Localització,Latitud,Longitud\n\
                    Fira,Esdeveniments,Gandesa,\"40,9\",\"0,4\"\n\
                    Curt,Esdeveniments\n";
        let rows = read_csv_bytes(text.as_bytes(), "test.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Localització"), "Gandesa");
        assert_eq!(rows[0].get("Latitud"), "40,9");
        assert_eq!(rows[1].get("Nom"), "Curt");
        assert_eq!(rows[1].get("Latitud"), "");
        assert_eq!(rows[1].get("Columna inexistent"), "");
    }

    #[test]
    fn empty_input() {
        let rows = read_csv_bytes(b"", "empty.csv").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn invalid_utf8_rows_are_skipped() {
        let mut bytes: Vec<u8> = b"Nom,Tipus\nA,Esdeveniments\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'x', b'\n']);
        bytes.extend_from_slice(b"B,Esdeveniments\n");
        let rows = read_csv_bytes(&bytes, "mixed.csv").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.get("Nom")).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
