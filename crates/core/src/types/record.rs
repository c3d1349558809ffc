//! Customer record and partial-update types.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::cell::{self, format_number, json_to_cell, parse_number};
use super::{CustomerField, CustomerId};

/// A customer, as stored in one data row of the customer sheet.
///
/// Every field except `id` is optional: a field is present only when the
/// sheet has a column for it and the row has a cell in that column. Columns
/// the application does not know are kept in `extra` under their header text,
/// and cells under a blank header are kept in `unnamed` by column index, so
/// rewriting a row never loses them.
///
/// Serializes to the camelCase JSON shape used by the HTTP API with absent
/// fields omitted. Deserializing only reads the known fields; `visitCount`
/// accepts a number or numeric text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: Option<String>,
    pub kana: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub first_visit_date: Option<String>,
    pub last_visit_date: Option<String>,
    #[serde(deserialize_with = "cell::deserialize_visit_count")]
    pub visit_count: Option<f64>,
    pub tags: Option<String>,
    pub allergy: Option<String>,
    pub history: Option<String>,
    pub consent: Option<String>,
    pub note: Option<String>,
    /// Cells in columns whose header is not a known field.
    #[serde(skip)]
    pub extra: BTreeMap<String, String>,
    /// Cells in columns with a blank header, keyed by zero-based column index.
    #[serde(skip)]
    pub unnamed: BTreeMap<usize, String>,
}

impl Serialize for CustomerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(CustomerField::Id.header(), &self.id)?;
        for field in CustomerField::ALL {
            match field {
                CustomerField::Id => {}
                CustomerField::VisitCount => {
                    if let Some(count) = self.visit_count {
                        map.serialize_entry(field.header(), &count)?;
                    }
                }
                other => {
                    if let Some(Some(text)) = self.text_slot(other) {
                        map.serialize_entry(field.header(), text)?;
                    }
                }
            }
        }
        for (header, text) in &self.extra {
            map.serialize_entry(header, text)?;
        }
        map.end()
    }
}

impl CustomerRecord {
    /// Create a record with only an id and a name.
    #[must_use]
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Get the cell text for a column header.
    ///
    /// Known fields are looked up by their header; any other header reads
    /// from `extra`. The id is `None` when blank.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<String> {
        match CustomerField::from_header(header) {
            Some(field) => self.field(field),
            None => self.extra.get(header).cloned(),
        }
    }

    /// Set (or clear, with `None`) the value for a column header from cell text.
    ///
    /// `visitCount` text that does not parse as a number clears the field.
    pub fn set(&mut self, header: &str, value: Option<String>) {
        match CustomerField::from_header(header) {
            Some(field) => self.set_field(field, value),
            None => match value {
                Some(text) => {
                    self.extra.insert(header.to_owned(), text);
                }
                None => {
                    self.extra.remove(header);
                }
            },
        }
    }

    /// Get the cell text of a known field.
    #[must_use]
    pub fn field(&self, field: CustomerField) -> Option<String> {
        match field {
            CustomerField::Id => (!self.id.is_empty()).then(|| self.id.to_string()),
            CustomerField::VisitCount => self.visit_count.map(format_number),
            other => self.text_slot(other).cloned().flatten(),
        }
    }

    /// Set a known field from cell text.
    pub fn set_field(&mut self, field: CustomerField, value: Option<String>) {
        match field {
            CustomerField::Id => self.id = value.map(CustomerId::from).unwrap_or_default(),
            CustomerField::VisitCount => {
                self.visit_count = value.as_deref().and_then(parse_number);
            }
            other => {
                if let Some(slot) = self.text_slot_mut(other) {
                    *slot = value;
                }
            }
        }
    }

    /// Merge a patch over this record, field by field. The patch's later value wins.
    pub fn apply(&mut self, patch: &CustomerPatch) {
        for (header, value) in patch.iter() {
            self.set(header, Some(value.to_owned()));
        }
    }

    fn text_slot(&self, field: CustomerField) -> Option<&Option<String>> {
        Some(match field {
            CustomerField::Name => &self.name,
            CustomerField::Kana => &self.kana,
            CustomerField::Phone => &self.phone,
            CustomerField::Email => &self.email,
            CustomerField::BirthDate => &self.birth_date,
            CustomerField::Gender => &self.gender,
            CustomerField::Address => &self.address,
            CustomerField::FirstVisitDate => &self.first_visit_date,
            CustomerField::LastVisitDate => &self.last_visit_date,
            CustomerField::Tags => &self.tags,
            CustomerField::Allergy => &self.allergy,
            CustomerField::History => &self.history,
            CustomerField::Consent => &self.consent,
            CustomerField::Note => &self.note,
            CustomerField::Id | CustomerField::VisitCount => return None,
        })
    }

    fn text_slot_mut(&mut self, field: CustomerField) -> Option<&mut Option<String>> {
        Some(match field {
            CustomerField::Name => &mut self.name,
            CustomerField::Kana => &mut self.kana,
            CustomerField::Phone => &mut self.phone,
            CustomerField::Email => &mut self.email,
            CustomerField::BirthDate => &mut self.birth_date,
            CustomerField::Gender => &mut self.gender,
            CustomerField::Address => &mut self.address,
            CustomerField::FirstVisitDate => &mut self.first_visit_date,
            CustomerField::LastVisitDate => &mut self.last_visit_date,
            CustomerField::Tags => &mut self.tags,
            CustomerField::Allergy => &mut self.allergy,
            CustomerField::History => &mut self.history,
            CustomerField::Consent => &mut self.consent,
            CustomerField::Note => &mut self.note,
            CustomerField::Id | CustomerField::VisitCount => return None,
        })
    }
}

/// A partial update: header name to new cell text.
///
/// Deserializes from any JSON object. `id` is never part of a patch (the
/// target is addressed separately) and `null` values are skipped. Other
/// values are converted to cell text, so `{"visitCount": 4}` and
/// `{"visitCount": "4"}` are the same patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomerPatch(BTreeMap<String, String>);

impl CustomerPatch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the patch. Setting `id` is ignored.
    #[must_use]
    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(header, value);
        self
    }

    /// Insert a field. Setting `id` is ignored.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        if header != CustomerField::Id.header() {
            self.0.insert(header, value.into());
        }
    }

    /// Iterate over `(header, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'de> Deserialize<'de> for CustomerPatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let mut patch = Self::new();
        for (header, value) in &object {
            if let Some(text) = json_to_cell(value) {
                patch.insert(header.clone(), text);
            }
        }
        Ok(patch)
    }
}
