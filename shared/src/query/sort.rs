//! Two-key sort priority list

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Maximum number of simultaneous sort keys the backend understands
pub const MAX_SORT_KEYS: usize = 2;

/// Sortable product column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Category,
    UnitPrice,
    ExpirationDate,
    InStock,
}

impl SortField {
    /// Columns in table order
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Category,
        SortField::UnitPrice,
        SortField::ExpirationDate,
        SortField::InStock,
    ];

    /// Value sent as `sortByN`
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::UnitPrice => "unitPrice",
            Self::ExpirationDate => "expirationDate",
            Self::InStock => "inStock",
        }
    }

    /// Column header text
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Category => "CATEGORY",
            Self::UnitPrice => "UNIT PRICE",
            Self::ExpirationDate => "EXPIRATION DATE",
            Self::InStock => "IN STOCK",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_param() == s)
            .ok_or_else(|| ParseError::SortField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Value sent as `sortDirectionN`
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ParseError::SortDirection(other.to_string())),
        }
    }
}

/// One (field, direction) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Sort priority list holding at most [`MAX_SORT_KEYS`] keys, no field twice.
///
/// Index 0 is the primary key, index 1 the secondary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances `field` through its asc → desc → removed cycle.
    ///
    /// A field that is not yet sorted enters as the primary key in ascending
    /// order; when the list is already full the entry at index 0 is evicted
    /// first. Removing the primary promotes the secondary.
    pub fn toggle(&mut self, field: SortField) {
        match self.position(field) {
            None => {
                if self.keys.len() >= MAX_SORT_KEYS {
                    self.keys.remove(0);
                }
                self.keys.insert(0, SortKey::asc(field));
            }
            Some(index) if self.keys[index].direction == SortDirection::Asc => {
                self.keys[index].direction = SortDirection::Desc;
            }
            Some(index) => {
                self.keys.remove(index);
            }
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn primary(&self) -> Option<SortKey> {
        self.keys.first().copied()
    }

    pub fn secondary(&self) -> Option<SortKey> {
        self.keys.get(1).copied()
    }

    /// Priority index of `field`, if sorted
    pub fn position(&self, field: SortField) -> Option<usize> {
        self.keys.iter().position(|key| key.field == field)
    }

    pub fn direction_of(&self, field: SortField) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|key| key.field == field)
            .map(|key| key.direction)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycles_single_field() {
        let mut sort = SortSpec::new();

        sort.toggle(SortField::Name);
        assert_eq!(sort.keys(), &[SortKey::asc(SortField::Name)]);

        sort.toggle(SortField::Name);
        assert_eq!(sort.keys(), &[SortKey::desc(SortField::Name)]);

        sort.toggle(SortField::Name);
        assert!(sort.is_empty());
    }

    #[test]
    fn test_new_field_becomes_primary() {
        let mut sort = SortSpec::new();
        sort.toggle(SortField::Name);
        sort.toggle(SortField::UnitPrice);

        assert_eq!(sort.primary(), Some(SortKey::asc(SortField::UnitPrice)));
        assert_eq!(sort.secondary(), Some(SortKey::asc(SortField::Name)));
    }

    #[test]
    fn test_third_field_evicts_and_demotes() {
        let mut sort = SortSpec::new();
        sort.toggle(SortField::Name);
        sort.toggle(SortField::Category);
        sort.toggle(SortField::InStock);

        assert_eq!(
            sort.keys(),
            &[SortKey::asc(SortField::InStock), SortKey::asc(SortField::Name)]
        );
        assert_eq!(sort.position(SortField::Category), None);
    }

    #[test]
    fn test_descending_flip_keeps_position() {
        let mut sort = SortSpec::new();
        sort.toggle(SortField::Name);
        sort.toggle(SortField::Category);
        sort.toggle(SortField::Name);

        assert_eq!(
            sort.keys(),
            &[SortKey::asc(SortField::Category), SortKey::desc(SortField::Name)]
        );
    }

    #[test]
    fn test_removing_primary_promotes_secondary() {
        let mut sort = SortSpec::new();
        sort.toggle(SortField::Name);
        sort.toggle(SortField::Category);
        // primary is Category: asc -> desc -> removed
        sort.toggle(SortField::Category);
        sort.toggle(SortField::Category);

        assert_eq!(sort.keys(), &[SortKey::asc(SortField::Name)]);
    }

    #[test]
    fn test_removing_secondary_keeps_primary() {
        let mut sort = SortSpec::new();
        sort.toggle(SortField::Name);
        sort.toggle(SortField::Category);
        sort.toggle(SortField::Name);
        sort.toggle(SortField::Name);

        assert_eq!(sort.keys(), &[SortKey::asc(SortField::Category)]);
    }

    #[test]
    fn test_never_exceeds_two_distinct_keys() {
        let mut sort = SortSpec::new();
        for field in SortField::ALL.into_iter().cycle().take(23) {
            sort.toggle(field);
            assert!(sort.len() <= MAX_SORT_KEYS);
            if let (Some(primary), Some(secondary)) = (sort.primary(), sort.secondary()) {
                assert_ne!(primary.field, secondary.field);
            }
        }
    }

    #[test]
    fn test_field_param_round_trip() {
        for field in SortField::ALL {
            assert_eq!(field.as_param().parse::<SortField>(), Ok(field));
        }
        assert!("price".parse::<SortField>().is_err());
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
    }
}
