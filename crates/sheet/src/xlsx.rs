use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, open_workbook_from_rs, Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as serial day counts; keep the raw number and
        // let the caller decide how to interpret it.
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn workbook_err<E: std::fmt::Display>(e: E) -> SheetError {
    SheetError::Workbook(e.to_string())
}

fn read_book<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<Book> {
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut book = Book::new();

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(workbook_err)?;

        let mut data: Vec<Vec<CellValue>> = Vec::new();
        for row in range.rows() {
            data.push(row.iter().map(data_to_cell_value).collect());
        }

        let mut sheet = Sheet::with_name(&sheet_name);
        *sheet.data_mut() = data;
        book.add_sheet(&sheet_name, sheet)?;
    }

    Ok(book)
}

impl Sheet {
    /// Load the first sheet of an Excel file as raw rows.
    ///
    /// Header handling (offsets, name normalization) is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or parsed.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let book = Book::from_xlsx(path)?;
        match book.into_iter().next() {
            Some((_, sheet)) => Ok(sheet),
            None => Ok(Sheet::new()),
        }
    }

    /// Load a specific sheet of an Excel file by name, as raw rows.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened, parsed, or the sheet is
    /// absent.
    pub fn from_xlsx_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_err)?;

        let range = workbook.worksheet_range(sheet_name).map_err(workbook_err)?;

        let mut data: Vec<Vec<CellValue>> = Vec::new();
        for row in range.rows() {
            data.push(row.iter().map(data_to_cell_value).collect());
        }

        let mut sheet = Sheet::with_name(sheet_name);
        *sheet.data_mut() = data;
        Ok(sheet)
    }

    /// Save the sheet to an Excel file.
    ///
    /// If columns are named, the header is written as the first row.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.write_to_worksheet(worksheet)?;
        workbook.save(path.as_ref()).map_err(workbook_err)?;
        Ok(())
    }

    /// Serialize the sheet to in-memory xlsx bytes.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.write_to_worksheet(worksheet)?;
        workbook.save_to_buffer().map_err(workbook_err)
    }

    fn write_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        worksheet.set_name(self.name()).map_err(workbook_err)?;

        let mut next_row: u32 = 0;
        if let Some(names) = self.column_names() {
            for (col_idx, name) in names.iter().enumerate() {
                let col = u16::try_from(col_idx)
                    .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;
                worksheet.write_string(0, col, name).map_err(workbook_err)?;
            }
            next_row = 1;
        }

        for (row_idx, row) in self.data().iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| SheetError::Workbook("Row index overflow".to_string()))?
                + next_row;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = u16::try_from(col_idx)
                    .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;

                match cell {
                    CellValue::Null => {} // Leave empty
                    CellValue::Bool(b) => {
                        worksheet
                            .write_boolean(row_num, col_num, *b)
                            .map_err(workbook_err)?;
                    }
                    // Excel stores all numbers as f64; integers beyond 2^53
                    // may lose precision
                    CellValue::Int(i) => {
                        worksheet
                            .write_number(row_num, col_num, *i as f64)
                            .map_err(workbook_err)?;
                    }
                    CellValue::Float(f) => {
                        worksheet
                            .write_number(row_num, col_num, *f)
                            .map_err(workbook_err)?;
                    }
                    CellValue::String(s) => {
                        worksheet
                            .write_string(row_num, col_num, s)
                            .map_err(workbook_err)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl Book {
    /// Load a book from an Excel file (all sheets, raw rows).
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or parsed.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_err)?;
        read_book(workbook)
    }

    /// Load a book from in-memory xlsx bytes (all sheets, raw rows).
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a parseable workbook.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let workbook: Xlsx<Cursor<&[u8]>> =
            open_workbook_from_rs(Cursor::new(bytes)).map_err(workbook_err)?;
        read_book(workbook)
    }

    /// Save the book to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        for (_, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            sheet.write_to_worksheet(worksheet)?;
        }
        workbook.save(path.as_ref()).map_err(workbook_err)?;
        Ok(())
    }

    /// Get sheet names from an Excel file without loading cell data
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened.
    pub fn xlsx_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_err)?;
        Ok(workbook.sheet_names().to_vec())
    }
}
