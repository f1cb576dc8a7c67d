//! Load policies: header normalization, required-column checks, and
//! allow-list sheet selection.

use crate::error::{ReshapeError, Result};
use crate::recipe::{CombineSpec, ReshapeRecipe};
use plmkit_sheet::{Book, Sheet};
use tracing::debug;

/// Normalize a raw header cell: collapse each run of embedded newlines and
/// quote characters to a single space, then trim.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_junk = false;
    for ch in raw.chars() {
        if matches!(ch, '\n' | '\r' | '"') {
            if !in_junk {
                out.push(' ');
                in_junk = true;
            }
        } else {
            out.push(ch);
            in_junk = false;
        }
    }
    out.trim().to_string()
}

/// Apply the single-table load policy for a pivot recipe.
///
/// Promotes the header at the recipe's offset, normalizes the names, and
/// restricts the table to the recipe's required columns.
///
/// # Errors
///
/// `ReshapeError::MissingColumns` listing every absent required column; a
/// sheet too short to contain the header row counts as missing everything.
pub fn required_table(sheet: &Sheet, recipe: &ReshapeRecipe) -> Result<Sheet> {
    let mut table = sheet.clone();
    if table.promote_header(recipe.header_row).is_err() {
        return Err(ReshapeError::MissingColumns {
            context: recipe.name.to_string(),
            missing: recipe.required.iter().map(|c| (*c).to_string()).collect(),
        });
    }
    table.rename_columns(normalize_header);

    let missing: Vec<String> = recipe
        .required
        .iter()
        .filter(|col| !table.has_column(col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReshapeError::MissingColumns {
            context: recipe.name.to_string(),
            missing,
        });
    }

    Ok(table.select_columns(recipe.required)?)
}

/// Apply the multi-sheet load policy for a combine spec.
///
/// Returns the allow-listed sheets present in the book, in allow-list
/// order, each with row 0 promoted to normalized column names. Sheets
/// outside the allow-list are skipped, not errors.
#[must_use]
pub fn allowed_tables(book: &Book, spec: &CombineSpec) -> Vec<(String, Sheet)> {
    for name in book.sheet_names() {
        if !spec.allow_list.contains(&name) {
            debug!(sheet = name, "ignoring sheet outside allow-list");
        }
    }

    let mut tables = Vec::new();
    for name in spec.allow_list {
        let Ok(sheet) = book.get_sheet(name) else {
            continue;
        };
        let mut table = sheet.clone();
        if table.is_empty() {
            // No header row to promote; contributes no columns and no rows
            table.set_column_names(Vec::new());
        } else if table.promote_header(0).is_err() {
            continue;
        }
        table.rename_columns(normalize_header);
        tables.push(((*name).to_string(), table));
    }
    tables
}
