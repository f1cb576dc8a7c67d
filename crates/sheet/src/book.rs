use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;

/// A book containing multiple sheets (preserves insertion order)
#[derive(Debug, Clone, Default)]
pub struct Book {
    name: String,
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Book1")
    }

    /// Create a new empty book with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Book {
            name: name.to_string(),
            sheets: IndexMap::new(),
        }
    }

    /// Get the book name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check if a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a mutable sheet by name
    pub fn get_sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a sheet by index (0-based)
    pub fn get_sheet_by_index(&self, index: usize) -> Result<&Sheet> {
        self.sheets
            .get_index(index)
            .map(|(_, sheet)| sheet)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: format!("index {index}"),
            })
    }

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Remove a sheet by name
    pub fn remove_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheets
            .shift_remove(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Iterate over sheets
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Book {
    type Item = (String, Sheet);
    type IntoIter = indexmap::map::IntoIter<String, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book() {
        let book = Book::new();
        assert_eq!(book.name(), "Book1");
        assert!(book.is_empty());
        assert_eq!(book.sheet_count(), 0);
    }

    #[test]
    fn test_add_and_get_sheet() {
        let mut book = Book::new();
        let sheet = Sheet::from_data(vec![vec![1, 2], vec![3, 4]]);

        book.add_sheet("Data", sheet).unwrap();

        assert_eq!(book.sheet_count(), 1);
        assert!(book.has_sheet("Data"));
        assert_eq!(book.sheet_names(), vec!["Data"]);
        assert_eq!(book.get_sheet("Data").unwrap().row_count(), 2);
    }

    #[test]
    fn test_sheet_order_is_insertion_order() {
        let mut book = Book::new();
        book.add_sheet("Zebra", Sheet::new()).unwrap();
        book.add_sheet("Alpha", Sheet::new()).unwrap();
        assert_eq!(book.sheet_names(), vec!["Zebra", "Alpha"]);
    }

    #[test]
    fn test_sheet_already_exists() {
        let mut book = Book::new();
        book.add_sheet("Sheet1", Sheet::new()).unwrap();

        let result = book.add_sheet("Sheet1", Sheet::new());
        assert!(matches!(
            result,
            Err(SheetError::SheetAlreadyExists { .. })
        ));
    }

    #[test]
    fn test_remove_sheet() {
        let mut book = Book::new();
        book.add_sheet("Sheet1", Sheet::new()).unwrap();
        book.add_sheet("Sheet2", Sheet::new()).unwrap();

        book.remove_sheet("Sheet1").unwrap();

        assert_eq!(book.sheet_count(), 1);
        assert!(!book.has_sheet("Sheet1"));
    }

    #[test]
    fn test_get_missing_sheet() {
        let book = Book::new();
        assert!(matches!(
            book.get_sheet("nope"),
            Err(SheetError::SheetNotFound { .. })
        ));
    }
}
