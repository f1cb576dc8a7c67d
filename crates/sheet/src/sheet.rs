use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::HashMap;

/// A sheet representing a 2D grid of cells (row-major storage).
///
/// A sheet starts out as raw rows. Calling [`Sheet::promote_header`] consumes
/// a header row: the rows above and including it are removed from the data,
/// and from then on `data()` holds data rows only and columns can be
/// addressed by name.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
    column_names: Option<Vec<String>>,
    column_index: Option<HashMap<String, usize>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
            column_names: None,
            column_index: None,
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            data: converted,
            column_names: None,
            column_index: None,
        }
    }

    /// Create a sheet with named columns from header names and data rows.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LengthMismatch` if any row is wider than the
    /// header. Short rows are padded with Null.
    pub fn from_rows<T: Into<CellValue>>(
        headers: Vec<String>,
        rows: Vec<Vec<T>>,
    ) -> Result<Self> {
        let width = headers.len();
        let mut data = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row: Vec<CellValue> = row.into_iter().map(Into::into).collect();
            if row.len() > width {
                return Err(SheetError::LengthMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            row.resize(width, CellValue::Null);
            data.push(row);
        }

        let mut sheet = Sheet {
            name: "Sheet1".to_string(),
            data,
            column_names: None,
            column_index: None,
        };
        sheet.set_column_names(headers);
        Ok(sheet)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        match &self.column_names {
            Some(names) => names.len(),
            None => self.data.first().map_or(0, Vec::len),
        }
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ===== Cell access =====

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.col_count(),
            })
    }

    /// Get a cell value by row index and column name
    pub fn get_by_name(&self, row: usize, col_name: &str) -> Result<&CellValue> {
        let col = self.column_index_of(col_name)?;
        self.get(row, col)
    }

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&[CellValue]> {
        self.data
            .get(index)
            .map(Vec::as_slice)
            .ok_or(SheetError::RowIndexOutOfBounds {
                index,
                count: self.row_count(),
            })
    }

    /// Append a data row
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LengthMismatch` if the row width does not match
    /// the sheet.
    pub fn push_row<T: Into<CellValue>>(&mut self, row: Vec<T>) -> Result<()> {
        let row: Vec<CellValue> = row.into_iter().map(Into::into).collect();
        let width = self.col_count();
        if width > 0 && row.len() != width {
            return Err(SheetError::LengthMismatch {
                expected: width,
                actual: row.len(),
            });
        }
        self.data.push(row);
        Ok(())
    }

    /// Get an entire column by index (0-based)
    pub fn column(&self, index: usize) -> Result<Vec<CellValue>> {
        if index >= self.col_count() {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index,
                count: self.col_count(),
            });
        }

        Ok(self
            .data
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or(CellValue::Null))
            .collect())
    }

    /// Get an entire column by name
    pub fn column_by_name(&self, name: &str) -> Result<Vec<CellValue>> {
        let index = self.column_index_of(name)?;
        self.column(index)
    }

    // ===== Named access =====

    /// Consume the rows up to and including `row_index` and use that row as
    /// the column header. Header cells are rendered with `as_str`.
    ///
    /// Duplicate header names are tolerated; name lookup resolves to the
    /// first occurrence.
    pub fn promote_header(&mut self, row_index: usize) -> Result<()> {
        let header: Vec<String> = self.row(row_index)?.iter().map(CellValue::as_str).collect();
        self.data.drain(..=row_index);
        self.set_column_names(header);
        Ok(())
    }

    /// Set the column names directly, rebuilding the lookup index.
    pub fn set_column_names(&mut self, names: Vec<String>) {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // first occurrence wins for duplicate headers
            index.entry(name.clone()).or_insert(i);
        }
        self.column_names = Some(names);
        self.column_index = Some(index);
    }

    /// Apply a function to every column name in place.
    pub fn rename_columns<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        if let Some(names) = self.column_names.take() {
            let renamed: Vec<String> = names.iter().map(|n| f(n)).collect();
            self.set_column_names(renamed);
        }
    }

    /// Get column names (if set)
    #[must_use]
    pub fn column_names(&self) -> Option<&Vec<String>> {
        self.column_names.as_ref()
    }

    /// Check whether a named column exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index
            .as_ref()
            .is_some_and(|idx| idx.contains_key(name))
    }

    /// Get the column index by name
    pub fn column_index_of(&self, name: &str) -> Result<usize> {
        self.column_index
            .as_ref()
            .ok_or_else(|| SheetError::ColumnsNotNamed("Call promote_header() first".to_string()))?
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    // ===== Transformation =====

    /// Return a new sheet containing only the given columns, in the given
    /// order. Column names are required.
    pub fn select_columns(&self, columns: &[&str]) -> Result<Sheet> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|name| self.column_index_of(name))
            .collect::<Result<Vec<_>>>()?;

        let data: Vec<Vec<CellValue>> = self
            .data
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Null))
                    .collect()
            })
            .collect();

        let mut out = Sheet {
            name: self.name.clone(),
            data,
            column_names: None,
            column_index: None,
        };
        out.set_column_names(columns.iter().map(|s| (*s).to_string()).collect());
        Ok(out)
    }

    /// Return a new sheet keeping only the columns whose name matches the
    /// predicate, preserving order. Column names are required.
    pub fn filter_columns<F>(&self, keep: F) -> Result<Sheet>
    where
        F: Fn(&str) -> bool,
    {
        let names = self.column_names.as_ref().ok_or_else(|| {
            SheetError::ColumnsNotNamed("Call promote_header() first".to_string())
        })?;
        let kept: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|n| keep(n))
            .collect();
        self.select_columns(&kept)
    }

    /// Remove data rows matching a predicate, returning the number removed.
    pub fn retain_rows<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&[CellValue]) -> bool,
    {
        let before = self.data.len();
        self.data.retain(|row| predicate(row));
        before - self.data.len()
    }

    // ===== Iteration / raw access =====

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Get mutable internal data reference
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sheet {
        let mut sheet = Sheet::from_data(vec![
            vec!["Name", "Units", "City"],
            vec!["Alice", "30", "NYC"],
            vec!["Bob", "25", "LA"],
        ]);
        sheet.promote_header(0).unwrap();
        sheet
    }

    #[test]
    fn test_promote_header_removes_header_rows() {
        let sheet = sample();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.col_count(), 3);
        assert_eq!(
            sheet.column_names(),
            Some(&vec![
                "Name".to_string(),
                "Units".to_string(),
                "City".to_string()
            ])
        );
        assert_eq!(
            sheet.get_by_name(0, "Name").unwrap(),
            &CellValue::String("Alice".to_string())
        );
    }

    #[test]
    fn test_promote_header_with_offset_skips_title_rows() {
        let mut sheet = Sheet::from_data(vec![
            vec!["Report", "", ""],
            vec!["Q1", "", ""],
            vec!["Name", "Units", "City"],
            vec!["Alice", "30", "NYC"],
        ]);
        sheet.promote_header(2).unwrap();
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.column_names().unwrap()[0], "Name");
    }

    #[test]
    fn test_duplicate_headers_resolve_to_first() {
        let mut sheet = Sheet::from_data(vec![
            vec!["A", "A", "B"],
            vec!["first", "second", "third"],
        ]);
        sheet.promote_header(0).unwrap();
        assert_eq!(sheet.column_index_of("A").unwrap(), 0);
    }

    #[test]
    fn test_column_by_name() {
        let sheet = sample();
        let units = sheet.column_by_name("Units").unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0], CellValue::String("30".to_string()));
    }

    #[test]
    fn test_column_not_found() {
        let sheet = sample();
        assert!(matches!(
            sheet.column_by_name("Missing"),
            Err(SheetError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_select_columns_reorders() {
        let sheet = sample();
        let out = sheet.select_columns(&["City", "Name"]).unwrap();
        assert_eq!(
            out.column_names(),
            Some(&vec!["City".to_string(), "Name".to_string()])
        );
        assert_eq!(
            out.get(0, 0).unwrap(),
            &CellValue::String("NYC".to_string())
        );
    }

    #[test]
    fn test_filter_columns() {
        let sheet = sample();
        let out = sheet.filter_columns(|n| n != "Units").unwrap();
        assert_eq!(out.col_count(), 2);
        assert!(!out.has_column("Units"));
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let sheet = Sheet::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![CellValue::Int(1)]],
        )
        .unwrap();
        assert_eq!(sheet.get(0, 1).unwrap(), &CellValue::Null);
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut sheet = sample();
        assert!(sheet.push_row(vec!["x", "1"]).is_err());
        assert!(sheet.push_row(vec!["x", "1", "SF"]).is_ok());
        assert_eq!(sheet.row_count(), 3);
    }

    #[test]
    fn test_retain_rows() {
        let mut sheet = sample();
        let removed = sheet.retain_rows(|row| row[0].as_str() != "Bob");
        assert_eq!(removed, 1);
        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn test_rename_columns() {
        let mut sheet = sample();
        sheet.rename_columns(|n| n.to_uppercase());
        assert!(sheet.has_column("NAME"));
        assert!(!sheet.has_column("Name"));
    }
}
