// Primitives for reading the spreadsheet exported as an Excel workbook.

use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::{debug, info};
use snafu::prelude::*;

use crate::dashboard::*;

pub fn read_xlsx_file(path: &str, worksheet: Option<&str>) -> BDashResult<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    read_workbook(&mut workbook, path, worksheet)
}

pub fn read_xlsx_bytes(
    bytes: Vec<u8>,
    origin: &str,
    worksheet: Option<&str>,
) -> BDashResult<Vec<RawRow>> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context(OpeningExcelSnafu { path: origin })?;
    read_workbook(&mut workbook, origin, worksheet)
}

fn read_workbook<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    origin: &str,
    worksheet: Option<&str>,
) -> BDashResult<Vec<RawRow>> {
    let range_o = match worksheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    let wrange = range_o
        .context(MissingWorksheetSnafu {
            path: origin,
            sheet: worksheet.unwrap_or("(first worksheet)"),
        })?
        .context(OpeningExcelSnafu { path: origin })?;

    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(read_cell).collect(),
        None => return Ok(vec![]),
    };
    debug!("read_workbook: header: {:?}", header);

    let res: Vec<RawRow> = iter
        .map(|row| {
            RawRow::from_pairs(
                header
                    .iter()
                    .map(|h| h.as_str())
                    .zip(row.iter().map(read_cell)),
            )
        })
        .collect();
    info!(
        "read_workbook: {}: read {:?} rows",
        simplify_location(origin),
        res.len()
    );
    Ok(res)
}

// The spreadsheet stores years and months as numbers: 2019.0 must read as "2019".
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        x => x.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::String("Gandesa".to_string())), "Gandesa");
        assert_eq!(read_cell(&DataType::Empty), "");
        assert_eq!(read_cell(&DataType::Float(2019.0)), "2019");
        assert_eq!(read_cell(&DataType::Float(40.9)), "40.9");
        assert_eq!(read_cell(&DataType::Int(7)), "7");
    }

    #[test]
    fn not_a_workbook() {
        let res = read_xlsx_bytes(b"Nom,Tipus\n".to_vec(), "fake.xlsx", None);
        assert!(res.is_err());
    }
}
