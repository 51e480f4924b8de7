//! Output unit of the summarizer.
//!
//! `EntryIndex::Others` is the merged remainder bucket. On the wire it is the
//! integer `-1`; items are their non-negative input position. The derived
//! order puts `Others` before every item, i.e. the same order as the signed
//! wire value.

use core::fmt;

use rust_decimal::Decimal;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

/// Reference from an entry back to the caller's input.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EntryIndex {
    /// Aggregated remainder; no single backing item.
    Others,
    /// Position in the caller's amounts slice.
    Item(usize),
}

impl EntryIndex {
    pub const OTHERS_WIRE: i64 = -1;

    /// Signed wire value (`-1` for the remainder bucket).
    pub fn as_signed(self) -> i64 {
        match self {
            EntryIndex::Others => Self::OTHERS_WIRE,
            EntryIndex::Item(i) => i as i64,
        }
    }

    pub fn from_signed(v: i64) -> Result<Self, CoreError> {
        match v {
            Self::OTHERS_WIRE => Ok(EntryIndex::Others),
            v if v >= 0 => Ok(EntryIndex::Item(v as usize)),
            _ => Err(CoreError::DomainOutOfRange("entry index")),
        }
    }

    /// Position in the input, `None` for the remainder bucket.
    pub fn item(self) -> Option<usize> {
        match self {
            EntryIndex::Others => None,
            EntryIndex::Item(i) => Some(i),
        }
    }

    pub fn is_others(self) -> bool {
        matches!(self, EntryIndex::Others)
    }
}

impl fmt::Display for EntryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_signed())
    }
}

#[cfg(feature = "serde")]
impl Serialize for EntryIndex {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(self.as_signed())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for EntryIndex {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = i64::deserialize(d)?;
        EntryIndex::from_signed(v).map_err(|_| {
            D::Error::invalid_value(serde::de::Unexpected::Signed(v), &"-1 or a non-negative index")
        })
    }
}

/// `(index, percentage)` pair; percentage is full precision in `[0, 100]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistributionEntry {
    pub index: EntryIndex,
    pub percentage: Decimal,
}

impl DistributionEntry {
    pub fn item(index: usize, percentage: Decimal) -> Self {
        Self { index: EntryIndex::Item(index), percentage }
    }

    pub fn others(percentage: Decimal) -> Self {
        Self { index: EntryIndex::Others, percentage }
    }

    pub fn is_others(&self) -> bool {
        self.index.is_others()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn others_orders_before_items() {
        assert!(EntryIndex::Others < EntryIndex::Item(0));
        assert!(EntryIndex::Item(0) < EntryIndex::Item(1));
    }

    #[test]
    fn signed_round_trip_and_rejects_other_negatives() {
        assert_eq!(EntryIndex::from_signed(-1), Ok(EntryIndex::Others));
        assert_eq!(EntryIndex::from_signed(3), Ok(EntryIndex::Item(3)));
        assert!(EntryIndex::from_signed(-2).is_err());
        assert_eq!(EntryIndex::Others.as_signed(), -1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_shape_uses_minus_one() {
        use rust_decimal_macros::dec;
        let e = DistributionEntry::others(dec!(12.5));
        let v = serde_json::to_value(e).unwrap();
        assert_eq!(v["index"], serde_json::json!(-1));
        let back: DistributionEntry = serde_json::from_value(v).unwrap();
        assert_eq!(back, e);
    }
}
