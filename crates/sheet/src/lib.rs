//! Sheet/Book module for plmkit
//!
//! The in-memory tabular model shared by every plmkit transform: a
//! [`Sheet`] is a row-major grid of [`CellValue`]s with optional named
//! columns, a [`Book`] is an ordered collection of sheets. Workbooks are
//! read with `calamine` and written with `rust_xlsxwriter`.
//!
//! # Examples
//!
//! ## Creating a sheet from data
//!
//! ```
//! use plmkit_sheet::{Sheet, CellValue};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec!["Style", "Units"],
//!     vec!["S1", "30"],
//!     vec!["S2", "25"],
//! ]);
//!
//! sheet.promote_header(0).unwrap();
//! assert_eq!(sheet.row_count(), 2);
//! let units = sheet.column_by_name("Units").unwrap();
//! assert_eq!(units.len(), 2);
//! ```
//!
//! ## Working with books
//!
//! ```
//! use plmkit_sheet::{Book, Sheet};
//!
//! let mut book = Book::new();
//! book.add_sheet("Data", Sheet::new()).unwrap();
//! book.add_sheet("Summary", Sheet::new()).unwrap();
//!
//! assert_eq!(book.sheet_count(), 2);
//! ```

mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
