//! Multi-sheet combiner: stack allow-listed sheets into one MCU-format
//! table with a fixed schema up front and dynamic month columns behind it.

use crate::error::Result;
use crate::loader::allowed_tables;
use crate::recipe::CombineSpec;
use indexmap::IndexSet;
use plmkit_sheet::{Book, CellValue, Sheet};
use tracing::debug;

/// Combine the allow-listed sheets of a workbook into a single table.
///
/// Per sheet: columns whose normalized name starts with the spec's drop
/// prefix (case-insensitive) are pre-computed totals and are discarded; the
/// source-sheet column is inserted first; every base-schema column the
/// sheet lacks is filled with an empty string. Columns outside the schema
/// ("dynamic" columns, typically per-month figures) are appended after the
/// schema columns in first-seen order across the whole combination.
///
/// Zero allow-listed sheets present yields a header-only table with just
/// the base schema.
pub fn combine(book: &Book, spec: &CombineSpec) -> Result<Sheet> {
    let tables = allowed_tables(book, spec);

    // First pass: drop total columns, discover dynamic columns in
    // first-seen order.
    let mut kept: Vec<(String, Sheet)> = Vec::with_capacity(tables.len());
    let mut dynamic: IndexSet<String> = IndexSet::new();
    let prefix = spec.drop_prefix.to_lowercase();

    for (name, table) in tables {
        let table = table.filter_columns(|col| !col.to_lowercase().starts_with(&prefix))?;
        if let Some(names) = table.column_names() {
            for col in names {
                if !spec.base_columns.contains(&col.as_str()) {
                    dynamic.insert(col.clone());
                }
            }
        }
        kept.push((name, table));
    }

    let mut headers: Vec<String> = spec.base_columns.iter().map(|c| (*c).to_string()).collect();
    headers.extend(dynamic.iter().cloned());

    // Second pass: project every sheet onto the combined column set.
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (sheet_name, table) in &kept {
        debug!(sheet = sheet_name.as_str(), rows = table.row_count(), "combining sheet");
        for row in table.rows() {
            let mut out_row: Vec<CellValue> = Vec::with_capacity(headers.len());
            out_row.push(CellValue::String(sheet_name.clone()));
            for col in &spec.base_columns[1..] {
                out_row.push(match table.column_index_of(col) {
                    Ok(i) => row.get(i).cloned().unwrap_or(CellValue::Null),
                    // Declared schema columns are never omitted
                    Err(_) => CellValue::String(String::new()),
                });
            }
            for col in &dynamic {
                out_row.push(match table.column_index_of(col) {
                    Ok(i) => row.get(i).cloned().unwrap_or(CellValue::Null),
                    Err(_) => CellValue::Null,
                });
            }
            rows.push(out_row);
        }
    }

    Ok(Sheet::from_rows(headers, rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::SAVAGE_PLM;

    fn plm_book() -> Book {
        let mut book = Book::new();
        book.add_sheet(
            "Fabrics",
            Sheet::from_data(vec![
                vec!["Style", "Article", "Sum of Qty", "Jan-25"],
                vec!["F-1", "A-9", "999", "10"],
            ]),
        )
        .unwrap();
        book.add_sheet(
            "Laces",
            Sheet::from_data(vec![
                vec!["Style", "Supplier", "Feb-25"],
                vec!["L-1", "Acme", "4"],
            ]),
        )
        .unwrap();
        book.add_sheet(
            "Scrap",
            Sheet::from_data(vec![vec!["junk"], vec!["x"]]),
        )
        .unwrap();
        book
    }

    #[test]
    fn test_combine_stacks_allowed_sheets() {
        let combined = combine(&plm_book(), &SAVAGE_PLM).unwrap();

        assert_eq!(combined.row_count(), 2);
        assert_eq!(
            combined.get_by_name(0, "Sheet Names").unwrap(),
            &CellValue::String("Fabrics".to_string())
        );
        assert_eq!(
            combined.get_by_name(1, "Sheet Names").unwrap(),
            &CellValue::String("Laces".to_string())
        );
    }

    #[test]
    fn test_sum_columns_never_survive() {
        let combined = combine(&plm_book(), &SAVAGE_PLM).unwrap();
        let names = combined.column_names().unwrap();
        assert!(names.iter().all(|n| !n.to_lowercase().starts_with("sum")));
    }

    #[test]
    fn test_missing_schema_columns_filled_with_empty_string() {
        let combined = combine(&plm_book(), &SAVAGE_PLM).unwrap();
        // Fabrics has no Supplier column
        assert_eq!(
            combined.get_by_name(0, "Supplier").unwrap(),
            &CellValue::String(String::new())
        );
        // Laces has one
        assert_eq!(
            combined.get_by_name(1, "Supplier").unwrap(),
            &CellValue::String("Acme".to_string())
        );
    }

    #[test]
    fn test_dynamic_columns_appended_in_first_seen_order() {
        let combined = combine(&plm_book(), &SAVAGE_PLM).unwrap();
        let names = combined.column_names().unwrap();
        let base_len = SAVAGE_PLM.base_columns.len();
        assert_eq!(&names[..base_len], SAVAGE_PLM.base_columns);
        assert_eq!(&names[base_len..], &["Jan-25".to_string(), "Feb-25".to_string()]);
        // Dynamic column absent from a sheet stays null, not ""
        assert_eq!(combined.get_by_name(1, "Jan-25").unwrap(), &CellValue::Null);
        assert_eq!(
            combined.get_by_name(0, "Jan-25").unwrap(),
            &CellValue::String("10".to_string())
        );
    }

    #[test]
    fn test_no_allowed_sheets_yields_schema_only() {
        let mut book = Book::new();
        book.add_sheet("Whatever", Sheet::from_data(vec![vec!["a"], vec!["1"]]))
            .unwrap();

        let combined = combine(&book, &SAVAGE_PLM).unwrap();
        assert_eq!(combined.row_count(), 0);
        let names = combined.column_names().unwrap();
        assert_eq!(names.len(), SAVAGE_PLM.base_columns.len());
        assert_eq!(&names[..], SAVAGE_PLM.base_columns);
    }

    #[test]
    fn test_missing_allowed_sheet_is_not_an_error() {
        // Only one of the ten allow-listed sheets present
        let mut book = Book::new();
        book.add_sheet(
            "Tapes",
            Sheet::from_data(vec![vec!["Style"], vec!["T-1"]]),
        )
        .unwrap();

        let combined = combine(&book, &SAVAGE_PLM).unwrap();
        assert_eq!(combined.row_count(), 1);
        assert_eq!(
            combined.get_by_name(0, "Sheet Names").unwrap(),
            &CellValue::String("Tapes".to_string())
        );
    }
}
