//! Integrity digest value object
//!
//! Wraps a subresource-integrity style digest: `<algorithm>-<base64>`.
//! Hashing is optional; descriptors carry `Option<IntegrityHash>` and the
//! manifest serializes the absent case as `null`.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::GantryError;

/// Supported integrity digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = GantryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(GantryError::UnknownAlgorithm {
                name: other.to_string(),
            }),
        }
    }
}

/// An `<algorithm>-<base64 digest>` integrity string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityHash(String);

impl IntegrityHash {
    /// Digest raw content with the given algorithm
    pub fn digest(algorithm: HashAlgorithm, content: &[u8]) -> Self {
        let digest = match algorithm {
            HashAlgorithm::Sha256 => Sha256::digest(content).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(content).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(content).to_vec(),
        };
        Self(format!("{}-{}", algorithm.as_str(), STANDARD.encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IntegrityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for IntegrityHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
