//! # Program References
//!
//! The indexer has returned program references in several shapes over time:
//!
//! ```text
//! {"_id": {"$oid": "65f1..."}}     legacy Mongo export
//! {"_id": "65f1..."}               flattened Mongo export
//! {"id": "65f1..."}                v2 API
//! {"programId": "65f1..._10"}      application records (chain-suffixed)
//! "65f1..."                        bare string
//! ```
//!
//! [`RawProgramRef`] accepts all of them and [`ProgramId::decode`] converts to
//! the one canonical form used everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::ChainId;
use crate::errors::ParseIdError;

/// Canonical program identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(String);

/// Value under a Mongo `_id` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MongoId {
    Wrapped {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Plain(String),
}

/// Every wire shape a program reference has been observed in.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawProgramRef {
    Mongo {
        #[serde(rename = "_id")]
        id: MongoId,
    },
    Id {
        id: String,
    },
    ProgramId {
        #[serde(rename = "programId")]
        program_id: String,
    },
    Plain(String),
}

impl RawProgramRef {
    fn into_raw_string(self) -> String {
        match self {
            RawProgramRef::Mongo {
                id: MongoId::Wrapped { oid },
            } => oid,
            RawProgramRef::Mongo {
                id: MongoId::Plain(id),
            } => id,
            RawProgramRef::Id { id } => id,
            RawProgramRef::ProgramId { program_id } => program_id,
            RawProgramRef::Plain(id) => id,
        }
    }
}

impl ProgramId {
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError::InvalidProgramRef(id));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert any accepted raw shape into the canonical id.
    ///
    /// A trailing `_<chainId>` suffix is split off and returned separately.
    pub fn from_raw(raw: RawProgramRef) -> Result<(Self, Option<ChainId>), ParseIdError> {
        let value = raw.into_raw_string();
        match value.rsplit_once('_') {
            Some((id, chain))
                if !id.is_empty()
                    && !chain.is_empty()
                    && chain.chars().all(|c| c.is_ascii_digit()) =>
            {
                let chain_id = chain.parse::<ChainId>()?;
                Ok((Self::new(id)?, Some(chain_id)))
            }
            _ => Ok((Self::new(value)?, None)),
        }
    }

    /// Decode from an arbitrary JSON value returned by the indexer.
    pub fn decode(value: &serde_json::Value) -> Result<(Self, Option<ChainId>), ParseIdError> {
        let raw: RawProgramRef = serde_json::from_value(value.clone())
            .map_err(|_| ParseIdError::InvalidProgramRef(value.to_string()))?;
        Self::from_raw(raw)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_wrapped_oid() {
        let (id, chain) = ProgramId::decode(&json!({"_id": {"$oid": "65f1aa"}})).unwrap();
        assert_eq!(id.as_str(), "65f1aa");
        assert_eq!(chain, None);
    }

    #[test]
    fn test_decode_flat_mongo_id() {
        let (id, _) = ProgramId::decode(&json!({"_id": "65f1bb"})).unwrap();
        assert_eq!(id.as_str(), "65f1bb");
    }

    #[test]
    fn test_decode_v2_id() {
        let (id, _) = ProgramId::decode(&json!({"id": "prog-7"})).unwrap();
        assert_eq!(id.as_str(), "prog-7");
    }

    #[test]
    fn test_decode_chain_suffixed_program_id() {
        let (id, chain) = ProgramId::decode(&json!({"programId": "959_42161"})).unwrap();
        assert_eq!(id.as_str(), "959");
        assert_eq!(chain, Some(ChainId::ARBITRUM));
    }

    #[test]
    fn test_decode_plain_string() {
        let (id, chain) = ProgramId::decode(&json!("  abc  ")).unwrap();
        assert_eq!(id.as_str(), "abc");
        assert_eq!(chain, None);
    }

    #[test]
    fn test_non_numeric_suffix_is_kept() {
        let (id, chain) = ProgramId::decode(&json!("gitcoin_round")).unwrap();
        assert_eq!(id.as_str(), "gitcoin_round");
        assert_eq!(chain, None);
    }

    #[test]
    fn test_decode_rejects_unknown_shapes() {
        assert!(ProgramId::decode(&json!(42)).is_err());
        assert!(ProgramId::decode(&json!({"name": "x"})).is_err());
        assert!(ProgramId::decode(&json!("")).is_err());
    }
}
