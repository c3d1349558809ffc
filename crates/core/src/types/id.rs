//! Customer identifier newtype.
//!
//! Ids are opaque strings: rows created elsewhere in the sheet may carry any
//! text, and ids generated by this application are UUID v4 strings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of a customer record.
///
/// An empty id is representable (a row whose id cell is blank) but never
/// matches a lookup, since the request layer rejects empty ids.
///
/// # Example
///
/// ```rust
/// # use customer_sheets_core::CustomerId;
/// let id = CustomerId::new("cust-1");
/// assert_eq!(id.as_str(), "cust-1");
///
/// let generated = CustomerId::generate();
/// assert_eq!(generated.as_str().len(), 36);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Create an id from any string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CustomerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
