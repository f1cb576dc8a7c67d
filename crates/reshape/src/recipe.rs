//! Per-account recipes.
//!
//! Each business system gets its quirks captured as data, not as a forked
//! copy of the transform: which row carries the headers, which columns
//! identify a row, which column is the date, which is the measure, and how
//! the month label is spelled.

use crate::month::MonthGranularity;

/// Declarative description of one pivot transform.
#[derive(Debug, Clone, Copy)]
pub struct ReshapeRecipe {
    /// Human-readable name used in error messages
    pub name: &'static str,
    /// 0-based row index of the header row (rows above are title clutter)
    pub header_row: usize,
    /// Columns that must be present after header normalization
    pub required: &'static [&'static str],
    /// Identity/metadata columns, in output order
    pub identity: &'static [&'static str],
    /// The date-like column months are derived from
    pub date_column: &'static str,
    /// The numeric column being summed
    pub measure_column: &'static str,
    /// Whether ambiguous dates read day-first (regional export convention)
    pub day_first: bool,
    /// Month-only or month-year pivot columns
    pub granularity: MonthGranularity,
}

/// Declarative description of one multi-sheet combine transform.
#[derive(Debug, Clone, Copy)]
pub struct CombineSpec {
    /// Human-readable name used in error messages
    pub name: &'static str,
    /// Sheets considered valid input, in output order; anything else in the
    /// workbook is silently ignored
    pub allow_list: &'static [&'static str],
    /// Fixed schema columns; the first is the source-sheet column
    pub base_columns: &'static [&'static str],
    /// Name of the inserted source-sheet column
    pub sheet_column: &'static str,
    /// Columns whose normalized name starts with this prefix are
    /// pre-computed totals and are dropped (case-insensitive)
    pub drop_prefix: &'static str,
}

/// Savage buy file -> PLM upload pivot.
pub const SAVAGE_BUY: ReshapeRecipe = ReshapeRecipe {
    name: "Savage buy file",
    header_row: 2,
    required: &["DESIGN STYLE", "XFD", "GLOBAL UNITS"],
    identity: &["DESIGN STYLE"],
    date_column: "XFD",
    measure_column: "GLOBAL UNITS",
    day_first: true,
    granularity: MonthGranularity::Calendar,
};

/// Savage PLM download -> combined MCU sheet.
pub const SAVAGE_PLM: CombineSpec = CombineSpec {
    name: "Savage PLM download",
    allow_list: &[
        "Fabrics",
        "Strip Cut",
        "Laces",
        "Embriodery/Printing",
        "Elastics",
        "Tapes",
        "Trim/Component",
        "Label/ Transfer",
        "Foam Cup",
        "Packing Trim",
    ],
    base_columns: &[
        "Sheet Names",
        "Season",
        "Style",
        "BOM",
        "Cycle",
        "Article",
        "Type of Const 1",
        "Supplier",
        "UOM",
        "Composition",
        "Measurement",
        "Supplier Country",
        "Avg YY",
    ],
    sheet_column: "Sheet Names",
    drop_prefix: "sum",
};

/// VSPINK brief -> MCU pivot preserving the full metadata block.
pub const VSPINK: ReshapeRecipe = ReshapeRecipe {
    name: "VSPINK brief",
    header_row: 0,
    required: &[
        "Customer",
        "Supplier",
        "Supplier COO",
        "Production Plant (region)",
        "Program",
        "Construction",
        "Article",
        "# of repeats in Article ( optional)",
        "Composition",
        "If Yarn Dyed/ Piece Dyed",
        "Qty (m)",
        "EX-mill",
    ],
    identity: &[
        "Customer",
        "Supplier",
        "Supplier COO",
        "Production Plant (region)",
        "Program",
        "Construction",
        "Article",
        "# of repeats in Article ( optional)",
        "Composition",
        "If Yarn Dyed/ Piece Dyed",
    ],
    date_column: "EX-mill",
    measure_column: "Qty (m)",
    day_first: true,
    // The MCU sheet keeps year granularity ("Nov-24") so briefs spanning a
    // year boundary stay in chronological order
    granularity: MonthGranularity::MonthYear,
};
