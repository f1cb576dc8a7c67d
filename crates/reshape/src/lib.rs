//! Reshape engine for plmkit
//!
//! Turns spreadsheet exports from garment-industry business systems into
//! PLM-upload / MCU-format tables. Two transform shapes exist:
//!
//! - **Pivot**: normalize headers, bucket a date column into months, sum a
//!   numeric measure by (identity columns, month), and emit a wide table
//!   with month columns in calendar order ([`pivot::pivot`]).
//! - **Combine**: stack the allow-listed sheets of a workbook into one
//!   table with a fixed schema plus dynamic month columns
//!   ([`combine::combine`]).
//!
//! Each business system is described by a recipe ([`recipe`]); the
//! [`Account`] enum dispatches a loaded workbook to the right transform.
//! Only missing required columns or an unparseable workbook abort a
//! transform; undated rows, non-numeric measures, and absent sheets all
//! degrade to documented fallbacks.
//!
//! ```
//! use plmkit_reshape::{savage_buy_to_plm, Account};
//! use plmkit_sheet::Sheet;
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["title row", "", ""],
//!     vec!["another title row", "", ""],
//!     vec!["DESIGN STYLE", "XFD", "GLOBAL UNITS"],
//!     vec!["S1", "2024-01-15", "100"],
//! ]);
//! let wide = savage_buy_to_plm(&sheet).unwrap();
//! assert_eq!(wide.row_count(), 1);
//! ```

pub mod account;
pub mod combine;
pub mod error;
pub mod loader;
pub mod month;
pub mod pivot;
pub mod recipe;

pub use account::{savage_buy_to_plm, savage_plm_to_mcu, vspink_to_mcu, Account};
pub use error::{ReshapeError, Result};
pub use month::{MonthBucket, MonthGranularity};
pub use recipe::{CombineSpec, ReshapeRecipe};
