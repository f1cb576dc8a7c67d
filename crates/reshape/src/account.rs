//! Business-system accounts and their entry points.

use crate::combine::combine;
use crate::error::{ReshapeError, Result};
use crate::loader::required_table;
use crate::pivot::pivot;
use crate::recipe::{SAVAGE_BUY, SAVAGE_PLM, VSPINK};
use plmkit_sheet::{Book, Sheet};
use std::fmt;
use tracing::info;

/// The supported business-system transform variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Account {
    /// Savage buy file -> PLM upload pivot
    SavageBuy,
    /// Savage PLM download -> combined MCU sheet
    SavagePlm,
    /// HugoBoss buy file (no recipe defined yet)
    HugoBossBuy,
    /// HugoBoss PLM download (no recipe defined yet)
    HugoBossPlm,
    /// VSPINK brief -> MCU pivot
    Vspink,
}

impl Account {
    pub const ALL: [Account; 5] = [
        Account::SavageBuy,
        Account::SavagePlm,
        Account::HugoBossBuy,
        Account::HugoBossPlm,
        Account::Vspink,
    ];

    /// The sheet name the exporter should write the result under.
    #[must_use]
    pub fn output_sheet_name(self) -> &'static str {
        match self {
            Account::SavageBuy | Account::HugoBossBuy => "PLM Upload",
            Account::SavagePlm | Account::HugoBossPlm => "MCU",
            Account::Vspink => "VSPINK MCU",
        }
    }

    /// Default file name for the exported workbook.
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            Account::SavageBuy => "plm upload - savage.xlsx",
            Account::SavagePlm => "MCU - savage.xlsx",
            Account::HugoBossBuy => "plm upload - hugoboss.xlsx",
            Account::HugoBossPlm => "MCU - hugoboss.xlsx",
            Account::Vspink => "vspink_mcu.xlsx",
        }
    }

    /// Run this account's transform against a loaded workbook.
    ///
    /// # Errors
    ///
    /// `ReshapeError::MissingColumns` when the input lacks required columns,
    /// `ReshapeError::NotImplemented` for accounts without a recipe.
    pub fn convert(self, book: &Book) -> Result<Sheet> {
        info!(account = %self, "running transform");
        let mut out = match self {
            Account::SavageBuy => savage_buy_to_plm(book.get_sheet_by_index(0)?)?,
            Account::SavagePlm => savage_plm_to_mcu(book)?,
            Account::Vspink => vspink_to_mcu(book.get_sheet_by_index(0)?)?,
            Account::HugoBossBuy | Account::HugoBossPlm => {
                return Err(ReshapeError::NotImplemented {
                    account: self.to_string(),
                })
            }
        };
        out.set_name(self.output_sheet_name());
        Ok(out)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Account::SavageBuy => "Savage buy file",
            Account::SavagePlm => "Savage PLM download",
            Account::HugoBossBuy => "HugoBoss buy file",
            Account::HugoBossPlm => "HugoBoss PLM download",
            Account::Vspink => "VSPINK brief",
        };
        f.write_str(label)
    }
}

/// Savage buy file -> PLM upload: keep DESIGN STYLE / XFD / GLOBAL UNITS,
/// bucket XFD into months, pivot GLOBAL UNITS into month columns.
pub fn savage_buy_to_plm(sheet: &Sheet) -> Result<Sheet> {
    let table = required_table(sheet, &SAVAGE_BUY)?;
    pivot(&table, &SAVAGE_BUY)
}

/// Savage PLM download -> MCU: combine the allow-listed component sheets
/// into one table with the MCU schema.
pub fn savage_plm_to_mcu(book: &Book) -> Result<Sheet> {
    combine(book, &SAVAGE_PLM)
}

/// VSPINK brief -> MCU: pivot Qty (m) by EX-mill month while preserving the
/// metadata block.
pub fn vspink_to_mcu(sheet: &Sheet) -> Result<Sheet> {
    let table = required_table(sheet, &VSPINK)?;
    pivot(&table, &VSPINK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hugoboss_is_an_explicit_not_implemented() {
        let mut book = Book::new();
        book.add_sheet("Sheet1", Sheet::from_data(vec![vec!["a"]]))
            .unwrap();

        for account in [Account::HugoBossBuy, Account::HugoBossPlm] {
            let err = account.convert(&book).unwrap_err();
            assert!(matches!(err, ReshapeError::NotImplemented { .. }));
        }
    }

    #[test]
    fn test_convert_names_output_sheet() {
        let mut book = Book::new();
        book.add_sheet(
            "Fabrics",
            Sheet::from_data(vec![vec!["Style"], vec!["F-1"]]),
        )
        .unwrap();

        let out = Account::SavagePlm.convert(&book).unwrap();
        assert_eq!(out.name(), "MCU");
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(Account::SavageBuy.default_file_name(), "plm upload - savage.xlsx");
        assert_eq!(Account::Vspink.output_sheet_name(), "VSPINK MCU");
    }
}
