//! A1 notation ranges.

use std::fmt;

/// Last column read by a full-sheet read. Columns past `Z` are not read.
pub const LAST_COLUMN: char = 'Z';

/// A range in A1 notation, always starting at column A.
///
/// Only the shapes the customer store needs are representable: an open-ended
/// block (`Customers!A1:Z`) for whole-sheet reads, the header row
/// (`Customers!A1:Z1`), and a single anchor cell (`Customers!A5`) that
/// addresses a row for appends and overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    /// Sheet (tab) name, unquoted.
    pub sheet: String,
    /// One-based first row.
    pub row: u32,
    /// Last column of a block, or `None` for a single anchor cell.
    pub last_column: Option<char>,
    /// Last row of a bounded block, or `None` for an open-ended one.
    pub last_row: Option<u32>,
}

impl A1Range {
    /// Every row of the sheet from row 1, columns A through [`LAST_COLUMN`].
    #[must_use]
    pub fn whole_sheet(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_owned(),
            row: 1,
            last_column: Some(LAST_COLUMN),
            last_row: None,
        }
    }

    /// Row 1 only, columns A through [`LAST_COLUMN`].
    #[must_use]
    pub fn header(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_owned(),
            row: 1,
            last_column: Some(LAST_COLUMN),
            last_row: Some(1),
        }
    }

    /// The anchor cell of a row (column A).
    #[must_use]
    pub fn row(sheet: &str, row: u32) -> Self {
        Self {
            sheet: sheet.to_owned(),
            row,
            last_column: None,
            last_row: None,
        }
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!A{}", quote_sheet_name(&self.sheet), self.row)?;
        if let Some(column) = self.last_column {
            write!(f, ":{column}")?;
            if let Some(last_row) = self.last_row {
                write!(f, "{last_row}")?;
            }
        }
        Ok(())
    }
}

/// Quote a sheet name for A1 notation when it is not a plain identifier.
///
/// Embedded single quotes are doubled.
fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_owned()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_sheet_range() {
        assert_eq!(A1Range::whole_sheet("Customers").to_string(), "Customers!A1:Z");
    }

    #[test]
    fn test_header_range() {
        assert_eq!(A1Range::header("Customers").to_string(), "Customers!A1:Z1");
    }

    #[test]
    fn test_row_anchor() {
        assert_eq!(A1Range::row("Customers", 7).to_string(), "Customers!A7");
    }

    #[test]
    fn test_quoted_sheet_names() {
        assert_eq!(A1Range::row("My Customers", 1).to_string(), "'My Customers'!A1");
        assert_eq!(A1Range::row("顧客", 1).to_string(), "'顧客'!A1");
        assert_eq!(A1Range::row("Bob's", 2).to_string(), "'Bob''s'!A2");
    }
}
