//! Customer record store backed by a sheet.
//!
//! Every operation starts from a fresh read of the sheet: the header row is the
//! schema and a record's row is found by scanning for its id, so neither is
//! cached between calls. There is no locking between the read and the write of
//! an update or delete. Two concurrent updates of one record both succeed and
//! the later write wins; a row inserted or deleted between the scan and the
//! write of another request shifts the target row.

use std::sync::Arc;

use customer_sheets_core::sheet::sheet_row;
use customer_sheets_core::{CustomerId, CustomerPatch, CustomerRecord, SheetHeader, SheetTable};
use thiserror::Error;
use tracing::instrument;

use crate::config::AppConfig;
use crate::sheets::{A1Range, SheetsClient, SheetsError, TabularStore};

/// Errors returned by [`CustomerStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The sheet backend is not configured.
    #[error("{0}")]
    Configuration(String),

    /// No record has the requested id.
    #[error("No customer with id {0}")]
    NotFound(CustomerId),

    /// The remote store failed.
    #[error(transparent)]
    Remote(#[from] SheetsError),
}

#[derive(Clone)]
enum Backend {
    Connected(Arc<dyn TabularStore>),
    /// Carries the reason every call fails.
    Unconfigured(Arc<str>),
}

/// Customer CRUD over a [`TabularStore`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct CustomerStore {
    backend: Backend,
}

impl std::fmt::Debug for CustomerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backend {
            Backend::Connected(_) => f.write_str("CustomerStore(Connected)"),
            Backend::Unconfigured(reason) => write!(f, "CustomerStore(Unconfigured: {reason})"),
        }
    }
}

impl CustomerStore {
    /// Build the store for the configured Google Sheets backend.
    ///
    /// A missing or unusable configuration does not fail here; the store is
    /// created unconfigured and reports the problem on every call.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let sheets = match &config.sheets {
            Ok(sheets) => sheets,
            Err(e) => return Self::unconfigured(e.to_string()),
        };

        match SheetsClient::new(sheets.clone()) {
            Ok(client) => {
                tracing::info!(
                    project_id = %sheets.project_id,
                    spreadsheet_id = %client.spreadsheet_id(),
                    "Google Sheets backend configured"
                );
                Self::with_backend(Arc::new(client))
            }
            Err(e) => Self::unconfigured(e.to_string()),
        }
    }

    /// Use the given tabular store.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn TabularStore>) -> Self {
        Self {
            backend: Backend::Connected(backend),
        }
    }

    /// A store whose every call fails with `StoreError::Configuration(reason)`.
    #[must_use]
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self {
            backend: Backend::Unconfigured(Arc::from(reason)),
        }
    }

    /// Whether a backend is available.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Connected(_))
    }

    fn backend(&self) -> Result<&dyn TabularStore, StoreError> {
        match &self.backend {
            Backend::Connected(store) => Ok(store.as_ref()),
            Backend::Unconfigured(reason) => Err(StoreError::Configuration(reason.to_string())),
        }
    }

    /// Read and decode the whole sheet.
    async fn read_table(&self, sheet: &str) -> Result<SheetTable, StoreError> {
        let rows = self
            .backend()?
            .get_values(&A1Range::whole_sheet(sheet))
            .await?;
        Ok(SheetTable::from_rows(&rows))
    }

    /// Every record in sheet order. An empty sheet yields no records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` when unconfigured, or
    /// `StoreError::Remote` if the read fails.
    #[instrument(skip(self))]
    pub async fn read_all(&self, sheet: &str) -> Result<Vec<CustomerRecord>, StoreError> {
        let records = self.read_table(sheet).await?.into_records();
        tracing::debug!(count = records.len(), "Read customers");
        Ok(records)
    }

    /// Append a record as the last row, in the sheet's header column order.
    ///
    /// A sheet with no header row gets the canonical header written in the
    /// same append.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` when unconfigured, or
    /// `StoreError::Remote` if a remote call fails.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn append(&self, sheet: &str, record: &CustomerRecord) -> Result<(), StoreError> {
        let backend = self.backend()?;
        let header_row = backend.get_values(&A1Range::header(sheet)).await?;

        let (header, mut rows) = match header_row.first() {
            Some(cells) => (SheetHeader::from_row(cells), Vec::with_capacity(1)),
            None => {
                let header = SheetHeader::canonical();
                let header_cells = header.columns().to_vec();
                tracing::info!("Sheet has no header row, writing canonical header");
                (header, vec![header_cells])
            }
        };
        rows.push(header.encode(record));

        backend.append_values(&A1Range::row(sheet, 1), rows).await?;
        tracing::info!("Appended customer");
        Ok(())
    }

    /// Merge `patch` over the record with `id` and rewrite its whole row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record has `id` (nothing is
    /// written), `StoreError::Configuration` when unconfigured, or
    /// `StoreError::Remote` if a remote call fails.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update(
        &self,
        sheet: &str,
        id: &CustomerId,
        patch: &CustomerPatch,
    ) -> Result<(), StoreError> {
        let table = self.read_table(sheet).await?;
        let index = table
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let (Some(header), Some(existing)) = (table.header.as_ref(), table.records.get(index))
        else {
            return Err(StoreError::NotFound(id.clone()));
        };

        let mut record = existing.clone();
        record.apply(patch);

        self.backend()?
            .update_values(&A1Range::row(sheet, sheet_row(index)), vec![header.encode(&record)])
            .await?;
        tracing::info!(row = sheet_row(index), "Updated customer");
        Ok(())
    }

    /// Delete the row of the record with `id`, shifting later rows up.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record has `id` (nothing is
    /// deleted), `StoreError::Configuration` when unconfigured, or
    /// `StoreError::Remote` if a remote call fails, including
    /// `SheetsError::SheetNotFound` when the sheet title cannot be resolved.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, sheet: &str, id: &CustomerId) -> Result<(), StoreError> {
        let table = self.read_table(sheet).await?;
        let index = table
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let backend = self.backend()?;
        let sheet_id = backend.sheet_id(sheet).await?;

        // Zero-based, end-exclusive: exactly the record's row
        let row = sheet_row(index);
        backend
            .delete_rows(sheet_id, row.saturating_sub(1), row)
            .await?;
        tracing::info!(row, "Deleted customer");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::sheets::memory::{MemoryStore, StoreCall};

    const SHEET: &str = "Customers";

    fn setup(rows: &[&[&str]]) -> (Arc<MemoryStore>, CustomerStore) {
        let memory = Arc::new(MemoryStore::new().with_sheet(SHEET, rows));
        let store = CustomerStore::with_backend(memory.clone());
        (memory, store)
    }

    fn seeded() -> (Arc<MemoryStore>, CustomerStore) {
        setup(&[
            &["id", "name", "phone"],
            &["1", "A", "111"],
            &["2", "B", "222"],
        ])
    }

    #[tokio::test]
    async fn test_read_all_empty_sheet() {
        let (_, store) = setup(&[]);
        assert!(store.read_all(SHEET).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_all_header_only() {
        let (_, store) = setup(&[&["id", "name"]]);
        assert!(store.read_all(SHEET).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_all_is_repeatable() {
        let (memory, store) = seeded();
        let first = store.read_all(SHEET).await.unwrap();
        let second = store.read_all(SHEET).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(memory.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_visit_count_reads_as_absent() {
        let (_, store) = setup(&[&["id", "name", "visitCount"], &["1", "A", "abc"]]);
        let records = store.read_all(SHEET).await.unwrap();
        assert_eq!(records[0].visit_count, None);
    }

    #[tokio::test]
    async fn test_append_then_read_round_trip() {
        let (_, store) = setup(&[&["id", "name", "kana", "visitCount"]]);
        store
            .append(SHEET, &CustomerRecord::new("1", "A"))
            .await
            .unwrap();

        let records = store.read_all(SHEET).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "1");
        assert_eq!(records[0].name.as_deref(), Some("A"));
        assert_eq!(records[0].visit_count, None);
        // Written as empty cells, trimmed on read
        assert_eq!(records[0].kana, None);
    }

    #[tokio::test]
    async fn test_append_follows_header_order() {
        let (memory, store) = setup(&[&["name", "custom", "id"]]);
        let mut record = CustomerRecord::new("9", "Z");
        record.email = Some("z@example.com".to_string());
        store.append(SHEET, &record).await.unwrap();

        let rows = memory.rows(SHEET).unwrap();
        assert_eq!(rows[1], vec!["Z", "", "9"]);
    }

    #[tokio::test]
    async fn test_append_to_empty_sheet_writes_header() {
        let (memory, store) = setup(&[]);
        store
            .append(SHEET, &CustomerRecord::new("1", "A"))
            .await
            .unwrap();

        let rows = memory.rows(SHEET).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], SheetHeader::canonical().columns());
        assert_eq!(memory.mutation_count(), 1);

        let records = store.read_all(SHEET).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let (memory, store) = setup(&[&["id", "name", "phone"], &["1", "A", "111"]]);
        store
            .update(
                SHEET,
                &CustomerId::new("1"),
                &CustomerPatch::new().with("phone", "222"),
            )
            .await
            .unwrap();

        let records = store.read_all(SHEET).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "1");
        assert_eq!(records[0].name.as_deref(), Some("A"));
        assert_eq!(records[0].phone.as_deref(), Some("222"));
        assert!(
            memory
                .calls()
                .contains(&StoreCall::UpdateValues("Customers!A2".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_targets_the_matching_row() {
        let (memory, store) = seeded();
        store
            .update(
                SHEET,
                &CustomerId::new("2"),
                &CustomerPatch::new().with("name", "Bee"),
            )
            .await
            .unwrap();

        let rows = memory.rows(SHEET).unwrap();
        assert_eq!(rows[1], vec!["1", "A", "111"]);
        assert_eq!(rows[2], vec!["2", "Bee", "222"]);
    }

    #[tokio::test]
    async fn test_update_keeps_unknown_columns() {
        let (memory, store) = setup(&[&["id", "name", "memberRank"], &["1", "A", "gold"]]);
        store
            .update(
                SHEET,
                &CustomerId::new("1"),
                &CustomerPatch::new().with("name", "B"),
            )
            .await
            .unwrap();
        assert_eq!(memory.rows(SHEET).unwrap()[1], vec!["1", "B", "gold"]);
    }

    #[tokio::test]
    async fn test_update_keeps_cells_under_blank_headers() {
        let (memory, store) = setup(&[
            &["id", "name", "", "phone"],
            &["1", "A", "memo-kept", "111"],
        ]);
        store
            .update(
                SHEET,
                &CustomerId::new("1"),
                &CustomerPatch::new().with("phone", "222"),
            )
            .await
            .unwrap();
        assert_eq!(
            memory.rows(SHEET).unwrap()[1],
            vec!["1", "A", "memo-kept", "222"]
        );
    }

    #[tokio::test]
    async fn test_update_drops_fields_without_a_column() {
        let (memory, store) = setup(&[&["id", "name"], &["1", "A"]]);
        store
            .update(
                SHEET,
                &CustomerId::new("1"),
                &CustomerPatch::new().with("email", "a@example.com"),
            )
            .await
            .unwrap();
        assert_eq!(memory.rows(SHEET).unwrap()[1], vec!["1", "A"]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (memory, store) = seeded();
        let err = store
            .update(
                SHEET,
                &CustomerId::new("missing"),
                &CustomerPatch::new().with("name", "X"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(err.to_string(), "No customer with id missing");
        assert_eq!(memory.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (memory, store) = seeded();
        store.delete(SHEET, &CustomerId::new("1")).await.unwrap();

        let records = store.read_all(SHEET).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "2");
        assert_eq!(memory.rows(SHEET).unwrap().len(), 2);
        assert!(memory.calls().contains(&StoreCall::DeleteRows {
            sheet_id: 0,
            start: 1,
            end: 2,
        }));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let (memory, store) = seeded();
        let err = store
            .delete(SHEET, &CustomerId::new("missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(memory.mutation_count(), 0);
        assert!(
            !memory
                .calls()
                .iter()
                .any(|call| matches!(call, StoreCall::SheetId(_)))
        );
    }

    #[tokio::test]
    async fn test_empty_id_never_matches() {
        let (memory, store) = setup(&[&["id", "name"], &["", "Nameless"]]);
        let err = store.delete(SHEET, &CustomerId::new("")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(memory.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_sheet_is_remote_error() {
        let (_, store) = seeded();
        let err = store.read_all("Other").await.unwrap_err();
        assert!(matches!(err, StoreError::Remote(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_store_fails_every_call() {
        let store = CustomerStore::unconfigured("GOOGLE_PROJECT_ID is not set");
        assert!(!store.is_configured());

        let err = store.read_all(SHEET).await.unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
        assert_eq!(err.to_string(), "GOOGLE_PROJECT_ID is not set");

        let err = store
            .append(SHEET, &CustomerRecord::new("1", "A"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));

        let err = store.delete(SHEET, &CustomerId::new("1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
    }
}
