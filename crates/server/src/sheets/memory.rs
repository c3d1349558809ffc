//! In-process [`TabularStore`] for tests.
//!
//! Mimics the parts of Google Sheets behavior the customer store relies on:
//! reads drop trailing empty cells and rows and stop at the last requested
//! column, appends land after the last non-empty row, overwrites only touch
//! the cells they carry, and row deletion shifts later rows up. Every call is
//! recorded so tests can assert which remote operations ran.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{A1Range, SheetsError, TabularStore};

/// A remote call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetValues(String),
    AppendValues(String),
    UpdateValues(String),
    SheetId(String),
    DeleteRows { sheet_id: i64, start: u32, end: u32 },
}

impl StoreCall {
    /// Whether the call changes sheet contents.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::AppendValues(_) | Self::UpdateValues(_) | Self::DeleteRows { .. }
        )
    }
}

#[derive(Debug, Default)]
struct MemorySheet {
    id: i64,
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    sheets: BTreeMap<String, MemorySheet>,
    calls: Vec<StoreCall>,
}

/// A spreadsheet held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// An empty spreadsheet with no sheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet with the given rows. Sheet ids are assigned in insertion order.
    #[must_use]
    pub fn with_sheet(self, name: &str, rows: &[&[&str]]) -> Self {
        {
            let mut state = self.lock();
            let id = i64::try_from(state.sheets.len()).unwrap_or(i64::MAX);
            let rows = rows
                .iter()
                .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
                .collect();
            state.sheets.insert(name.to_owned(), MemorySheet { id, rows });
        }
        self
    }

    /// Current rows of a sheet, exactly as stored.
    #[must_use]
    pub fn rows(&self, sheet: &str) -> Option<Vec<Vec<String>>> {
        self.lock().sheets.get(sheet).map(|s| s.rows.clone())
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Number of calls that changed sheet contents.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.lock().calls.iter().filter(|c| c.is_mutation()).count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn range_error(range: &A1Range) -> SheetsError {
    SheetsError::Api {
        status: 400,
        message: format!("Unable to parse range: {range}"),
    }
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Zero-based index of a one-based row number.
fn row_index(row: u32) -> usize {
    to_usize(row.saturating_sub(1))
}

/// Number of columns from A through `last`.
fn column_count(last: char) -> usize {
    to_usize(u32::from(last).saturating_sub(u32::from('A')) + 1)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

/// Overwrite cells of `rows[index]` from column A, growing the grid as needed.
fn write_row(rows: &mut Vec<Vec<String>>, index: usize, cells: Vec<String>) {
    if rows.len() <= index {
        rows.resize_with(index + 1, Vec::new);
    }
    if let Some(row) = rows.get_mut(index) {
        if row.len() < cells.len() {
            row.resize(cells.len(), String::new());
        }
        for (slot, cell) in row.iter_mut().zip(cells) {
            *slot = cell;
        }
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn get_values(&self, range: &A1Range) -> Result<Vec<Vec<String>>, SheetsError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::GetValues(range.to_string()));
        let sheet = state.sheets.get(&range.sheet).ok_or_else(|| range_error(range))?;

        let width = range.last_column.map_or(1, column_count);
        let height = match (range.last_column, range.last_row) {
            (None, _) => 1,
            (Some(_), Some(last)) => row_index(last).saturating_sub(row_index(range.row)) + 1,
            (Some(_), None) => usize::MAX,
        };

        let mut values: Vec<Vec<String>> = sheet
            .rows
            .iter()
            .skip(row_index(range.row))
            .take(height)
            .map(|row| {
                let mut cells: Vec<String> = row.iter().take(width).cloned().collect();
                while cells.last().is_some_and(String::is_empty) {
                    cells.pop();
                }
                cells
            })
            .collect();
        while values.last().is_some_and(|row| row.is_empty()) {
            values.pop();
        }
        Ok(values)
    }

    async fn append_values(
        &self,
        range: &A1Range,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetsError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::AppendValues(range.to_string()));
        let sheet = state
            .sheets
            .get_mut(&range.sheet)
            .ok_or_else(|| range_error(range))?;

        let start = sheet
            .rows
            .iter()
            .rposition(|row| !is_blank(row))
            .map_or(0, |last| last + 1);
        for (offset, cells) in rows.into_iter().enumerate() {
            write_row(&mut sheet.rows, start + offset, cells);
        }
        Ok(())
    }

    async fn update_values(
        &self,
        range: &A1Range,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetsError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::UpdateValues(range.to_string()));
        let sheet = state
            .sheets
            .get_mut(&range.sheet)
            .ok_or_else(|| range_error(range))?;

        let start = row_index(range.row);
        for (offset, cells) in rows.into_iter().enumerate() {
            write_row(&mut sheet.rows, start + offset, cells);
        }
        Ok(())
    }

    async fn sheet_id(&self, sheet: &str) -> Result<i64, SheetsError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::SheetId(sheet.to_owned()));
        state
            .sheets
            .get(sheet)
            .map(|s| s.id)
            .ok_or_else(|| SheetsError::SheetNotFound(sheet.to_owned()))
    }

    async fn delete_rows(&self, sheet_id: i64, start: u32, end: u32) -> Result<(), SheetsError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::DeleteRows {
            sheet_id,
            start,
            end,
        });
        let sheet = state
            .sheets
            .values_mut()
            .find(|s| s.id == sheet_id)
            .ok_or_else(|| SheetsError::Api {
                status: 400,
                message: format!("No grid with id: {sheet_id}"),
            })?;

        let len = sheet.rows.len();
        let start = to_usize(start).min(len);
        let end = to_usize(end).clamp(start, len);
        sheet.rows.drain(start..end);
        Ok(())
    }
}
