//! Known customer fields and their canonical column order.

use serde::{Deserialize, Serialize};

/// A field of [`CustomerRecord`](super::CustomerRecord) that the application knows by name.
///
/// The sheet's header row decides which of these are actually stored and in
/// which column. [`CustomerField::ALL`] is the canonical order, used only when
/// a sheet has no header row yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerField {
    Id,
    Name,
    Kana,
    Phone,
    Email,
    BirthDate,
    Gender,
    Address,
    FirstVisitDate,
    LastVisitDate,
    VisitCount,
    Tags,
    Allergy,
    History,
    Consent,
    Note,
}

impl CustomerField {
    /// Every known field, in canonical column order.
    pub const ALL: [Self; 16] = [
        Self::Id,
        Self::Name,
        Self::Kana,
        Self::Phone,
        Self::Email,
        Self::BirthDate,
        Self::Gender,
        Self::Address,
        Self::FirstVisitDate,
        Self::LastVisitDate,
        Self::VisitCount,
        Self::Tags,
        Self::Allergy,
        Self::History,
        Self::Consent,
        Self::Note,
    ];

    /// The header text naming this field in the sheet.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Kana => "kana",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::BirthDate => "birthDate",
            Self::Gender => "gender",
            Self::Address => "address",
            Self::FirstVisitDate => "firstVisitDate",
            Self::LastVisitDate => "lastVisitDate",
            Self::VisitCount => "visitCount",
            Self::Tags => "tags",
            Self::Allergy => "allergy",
            Self::History => "history",
            Self::Consent => "consent",
            Self::Note => "note",
        }
    }

    /// Look up a field by its exact header text.
    ///
    /// Matching is case-sensitive; `"Name"` is an unknown column, not `name`.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.header() == header)
    }
}

impl std::fmt::Display for CustomerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_round_trips() {
        for field in CustomerField::ALL {
            assert_eq!(CustomerField::from_header(field.header()), Some(field));
        }
    }

    #[test]
    fn test_unknown_header() {
        assert_eq!(CustomerField::from_header("Name"), None);
        assert_eq!(CustomerField::from_header("membership"), None);
        assert_eq!(CustomerField::from_header(""), None);
    }

    #[test]
    fn test_canonical_order_starts_with_id_and_name() {
        assert_eq!(CustomerField::ALL.first(), Some(&CustomerField::Id));
        assert_eq!(CustomerField::ALL.get(1), Some(&CustomerField::Name));
        assert_eq!(CustomerField::ALL.last(), Some(&CustomerField::Note));
    }
}
