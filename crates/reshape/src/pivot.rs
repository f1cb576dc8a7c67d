//! Pivot/aggregate engine: group by (identity tuple, month bucket), sum the
//! measure, and emit a wide table with month columns.

use crate::error::Result;
use crate::month::{derive_months, MonthBucket, MonthGranularity};
use crate::recipe::ReshapeRecipe;
use indexmap::IndexMap;
use plmkit_sheet::{CellValue, Sheet};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

struct Group {
    /// Original identity cell values, for output
    cells: Vec<CellValue>,
    sums: BTreeMap<MonthBucket, f64>,
}

/// Coerce a measure cell to a number.
///
/// Text values are trimmed and stripped of thousands separators before
/// parsing. Anything unparsable counts as zero; messy upstream data must
/// never abort the pivot.
#[must_use]
pub fn coerce_measure(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Int(i) => *i as f64,
        CellValue::Float(f) => *f,
        CellValue::Bool(b) => f64::from(*b),
        CellValue::String(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        CellValue::Null => 0.0,
    }
}

/// Render a sum as a cell: integral values as Int, anything else as Float.
fn number_cell(value: f64) -> CellValue {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        CellValue::Int(value as i64)
    } else {
        CellValue::Float(value)
    }
}

/// Pivot a required-columns table into the wide month table.
///
/// Rows whose date cell yields no month bucket are excluded. Every
/// (identity group, month) cell absent from the input is exactly 0. With
/// calendar granularity the output always carries all twelve month columns
/// in JAN..DEC order; with month-year granularity it carries the observed
/// buckets chronologically. When no rows survive the month filter, the
/// result is a header-only table with the identity columns.
pub fn pivot(table: &Sheet, recipe: &ReshapeRecipe) -> Result<Sheet> {
    let identity_indices: Vec<usize> = recipe
        .identity
        .iter()
        .map(|name| table.column_index_of(name))
        .collect::<plmkit_sheet::Result<Vec<_>>>()?;
    let measure_index = table.column_index_of(recipe.measure_column)?;

    let date_cells = table.column_by_name(recipe.date_column)?;
    let buckets = derive_months(&date_cells, recipe.day_first, recipe.granularity);

    let mut groups: IndexMap<Vec<String>, Group> = IndexMap::new();
    let mut dropped = 0usize;

    for (row, bucket) in table.rows().zip(buckets) {
        let Some(bucket) = bucket else {
            dropped += 1;
            continue;
        };

        let key: Vec<String> = identity_indices
            .iter()
            .map(|&i| row.get(i).unwrap_or(&CellValue::Null).group_key())
            .collect();

        let group = groups.entry(key).or_insert_with(|| Group {
            cells: identity_indices
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Null))
                .collect(),
            sums: BTreeMap::new(),
        });

        let measure = coerce_measure(row.get(measure_index).unwrap_or(&CellValue::Null));
        *group.sums.entry(bucket).or_insert(0.0) += measure;
    }

    if dropped > 0 {
        debug!(rows = dropped, "dropped rows with no parseable date");
    }

    let months: Vec<MonthBucket> = if groups.is_empty() {
        Vec::new()
    } else {
        match recipe.granularity {
            MonthGranularity::Calendar => (1..=12).map(MonthBucket::Month).collect(),
            MonthGranularity::MonthYear => groups
                .values()
                .flat_map(|g| g.sums.keys().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    };

    let mut headers: Vec<String> = recipe.identity.iter().map(|c| (*c).to_string()).collect();
    headers.extend(months.iter().map(MonthBucket::label));

    let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(groups.len());
    for group in groups.values() {
        let mut row = group.cells.clone();
        for month in &months {
            row.push(number_cell(group.sums.get(month).copied().unwrap_or(0.0)));
        }
        rows.push(row);
    }

    Ok(Sheet::from_rows(headers, rows)?)
}
