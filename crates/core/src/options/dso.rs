//! Repository object types a search can be restricted to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A repository object type, as carried by the `dsoType` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DsoType {
    Community,
    Collection,
    Item,
    Bundle,
    Bitstream,
}

/// Parse failure for an object type string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown object type: {0}")]
pub struct UnknownDsoType(String);

impl FromStr for DsoType {
    type Err = UnknownDsoType;

    /// Case-insensitive parse, so `item`, `Item` and `ITEM` all match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COMMUNITY" => Ok(DsoType::Community),
            "COLLECTION" => Ok(DsoType::Collection),
            "ITEM" => Ok(DsoType::Item),
            "BUNDLE" => Ok(DsoType::Bundle),
            "BITSTREAM" => Ok(DsoType::Bitstream),
            _ => Err(UnknownDsoType(s.to_string())),
        }
    }
}

impl fmt::Display for DsoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DsoType::Community => "COMMUNITY",
            DsoType::Collection => "COLLECTION",
            DsoType::Item => "ITEM",
            DsoType::Bundle => "BUNDLE",
            DsoType::Bitstream => "BITSTREAM",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("ITEM".parse::<DsoType>().unwrap(), DsoType::Item);
        assert_eq!("item".parse::<DsoType>().unwrap(), DsoType::Item);
        assert_eq!("Collection".parse::<DsoType>().unwrap(), DsoType::Collection);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("workspace".parse::<DsoType>().is_err());
        assert!("".parse::<DsoType>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for dso in [DsoType::Community, DsoType::Collection, DsoType::Item, DsoType::Bundle, DsoType::Bitstream] {
            assert_eq!(dso.to_string().parse::<DsoType>().unwrap(), dso);
        }
    }
}
