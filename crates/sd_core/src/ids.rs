//! Proposal identifiers with a strict charset.
//!
//! On-chain proposal ids arrive as decimal strings (`"12"`) or hex hashes
//! (`"0x3f…"`); both fit the token charset below.

use crate::errors::CoreError;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize};

fn is_token(s: &str) -> bool {
    let len = s.len();
    if !(1..=128).contains(&len) {
        return false;
    }
    s.bytes().all(|b| matches!(b,
        b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
        b'_' | b'-' | b':' | b'.'
    ))
}

/// Identifier of a proposal a stake is committed to.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProposalId(String);

impl ProposalId {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProposalId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_token(s) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidToken) }
    }
}

impl AsRef<str> for ProposalId {
    fn as_ref(&self) -> &str { &self.0 }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ProposalId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(|_| {
            D::Error::invalid_value(
                serde::de::Unexpected::Str(&s),
                &"token [A-Za-z0-9_.:-], len 1..=128",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_hex_ids() {
        assert!("12".parse::<ProposalId>().is_ok());
        assert!("0x3fa9c1".parse::<ProposalId>().is_ok());
    }

    #[test]
    fn rejects_empty_and_spaces() {
        assert_eq!("".parse::<ProposalId>(), Err(CoreError::InvalidToken));
        assert_eq!("fund x".parse::<ProposalId>(), Err(CoreError::InvalidToken));
    }
}
