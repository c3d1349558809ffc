//! Conversion between sheet rows and customer records.
//!
//! A sheet is a grid of text cells. Row 1 is the header: header cell `i` names
//! the field stored in column `i` of every data row. Nothing here caches a
//! header or a row position; callers rebuild a [`SheetTable`] from a fresh read
//! before every lookup.

use crate::types::{CustomerField, CustomerId, CustomerRecord};

/// Number of sheet rows before the first data row.
pub const HEADER_ROWS: u32 = 1;

/// The header row of a customer sheet: column names in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetHeader {
    columns: Vec<String>,
}

impl SheetHeader {
    /// Build a header from the raw cells of row 1. Each name is trimmed.
    #[must_use]
    pub fn from_row(cells: &[String]) -> Self {
        Self {
            columns: cells.iter().map(|cell| cell.trim().to_owned()).collect(),
        }
    }

    /// The header written to a sheet that has none yet: every known field in
    /// canonical order.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            columns: CustomerField::ALL
                .iter()
                .map(|field| field.header().to_owned())
                .collect(),
        }
    }

    /// Column names in column order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Convert a data row to a record by position.
    ///
    /// Cells past the end of a short row leave their field absent. Cells
    /// under a blank header are kept by column index in `unnamed`. Cells past
    /// the last header are ignored.
    #[must_use]
    pub fn decode(&self, cells: &[String]) -> CustomerRecord {
        let mut record = CustomerRecord::default();
        for (index, (column, cell)) in self.columns.iter().zip(cells).enumerate() {
            if column.is_empty() {
                record.unnamed.insert(index, cell.clone());
            } else {
                record.set(column, Some(cell.clone()));
            }
        }
        record
    }

    /// Convert a record to a data row in header column order.
    ///
    /// Absent fields become empty cells. Record fields without a column are
    /// dropped.
    #[must_use]
    pub fn encode(&self, record: &CustomerRecord) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                if column.is_empty() {
                    record.unnamed.get(&index).cloned().unwrap_or_default()
                } else {
                    record.get(column).unwrap_or_default()
                }
            })
            .collect()
    }
}

/// A fully read customer sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    /// Row 1, or `None` for a sheet with no rows at all.
    pub header: Option<SheetHeader>,
    /// Data rows 2.., in sheet order.
    pub records: Vec<CustomerRecord>,
}

impl SheetTable {
    /// Decode the rows returned by a full-range read.
    #[must_use]
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let Some((header_row, data_rows)) = rows.split_first() else {
            return Self::default();
        };
        let header = SheetHeader::from_row(header_row);
        let records = data_rows.iter().map(|row| header.decode(row)).collect();
        Self {
            header: Some(header),
            records,
        }
    }

    /// Zero-based data index of the first record with this id.
    #[must_use]
    pub fn position(&self, id: &CustomerId) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.records.iter().position(|record| &record.id == id)
    }

    /// Consume the table, returning only the records.
    #[must_use]
    pub fn into_records(self) -> Vec<CustomerRecord> {
        self.records
    }
}

/// One-based sheet row number of the data row at `index`.
///
/// Data index 0 lives on sheet row 2: one for the header, one because sheet
/// rows count from 1.
#[must_use]
pub fn sheet_row(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(HEADER_ROWS + 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_empty_sheet_has_no_header_or_records() {
        let table = SheetTable::from_rows(&[]);
        assert!(table.header.is_none());
        assert!(table.records.is_empty());
    }

    #[test]
    fn test_header_only_sheet() {
        let table = SheetTable::from_rows(&[row(&["id", "name"])]);
        assert_eq!(table.header.unwrap().columns(), &["id", "name"]);
        assert!(table.records.is_empty());
    }

    #[test]
    fn test_header_cells_are_trimmed() {
        let header = SheetHeader::from_row(&row(&[" id ", "name\t"]));
        assert_eq!(header.columns(), &["id", "name"]);
    }

    #[test]
    fn test_positional_decode() {
        let table = SheetTable::from_rows(&[
            row(&["name", "id", "phone", "visitCount"]),
            row(&["Aiko", "1", "111", "3"]),
            row(&["Ken", "2"]),
        ]);

        let aiko = &table.records[0];
        assert_eq!(aiko.id.as_str(), "1");
        assert_eq!(aiko.name.as_deref(), Some("Aiko"));
        assert_eq!(aiko.phone.as_deref(), Some("111"));
        assert_eq!(aiko.visit_count, Some(3.0));

        let ken = &table.records[1];
        assert_eq!(ken.id.as_str(), "2");
        assert_eq!(ken.phone, None);
        assert_eq!(ken.visit_count, None);
    }

    #[test]
    fn test_unparseable_visit_count_is_absent() {
        let table = SheetTable::from_rows(&[row(&["id", "visitCount"]), row(&["1", "abc"])]);
        assert_eq!(table.records[0].visit_count, None);
    }

    #[test]
    fn test_unknown_columns_are_kept() {
        let header = SheetHeader::from_row(&row(&["id", "membership"]));
        let record = header.decode(&row(&["1", "gold"]));
        assert_eq!(record.extra.get("membership").map(String::as_str), Some("gold"));
        assert_eq!(header.encode(&record), row(&["1", "gold"]));
    }

    #[test]
    fn test_blank_header_cells_round_trip_by_position() {
        let header = SheetHeader::from_row(&row(&["id", "", "name", " "]));
        let record = header.decode(&row(&["1", "memo", "A", "flag"]));
        assert_eq!(record.unnamed.get(&1).map(String::as_str), Some("memo"));
        assert_eq!(record.unnamed.get(&3).map(String::as_str), Some("flag"));
        assert!(record.extra.is_empty());
        assert_eq!(header.encode(&record), row(&["1", "memo", "A", "flag"]));
    }

    #[test]
    fn test_encode_follows_header_order_and_drops_unknown_fields() {
        let header = SheetHeader::from_row(&row(&["phone", "id", "name", "visitCount"]));
        let mut record = CustomerRecord::new("1", "Aiko");
        record.email = Some("a@example.com".to_string());
        record.visit_count = Some(4.0);

        assert_eq!(header.encode(&record), row(&["", "1", "Aiko", "4"]));
    }

    #[test]
    fn test_canonical_header_matches_field_order() {
        let header = SheetHeader::canonical();
        assert_eq!(header.columns().len(), CustomerField::ALL.len());
        assert_eq!(header.columns()[0], "id");
        assert_eq!(header.columns()[10], "visitCount");
    }

    #[test]
    fn test_position_lookup() {
        let table = SheetTable::from_rows(&[
            row(&["id", "name"]),
            row(&["a", "A"]),
            row(&["", "Blank"]),
            row(&["b", "B"]),
        ]);
        assert_eq!(table.position(&CustomerId::new("a")), Some(0));
        assert_eq!(table.position(&CustomerId::new("b")), Some(2));
        assert_eq!(table.position(&CustomerId::new("z")), None);
        assert_eq!(table.position(&CustomerId::default()), None);
    }

    #[test]
    fn test_sheet_row_offsets_header() {
        assert_eq!(sheet_row(0), 2);
        assert_eq!(sheet_row(5), 7);
    }
}
