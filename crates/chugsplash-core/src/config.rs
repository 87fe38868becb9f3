//! # Config Shapes
//!
//! The raw [`ChugSplashConfig`] an author writes, and the
//! [`CanonicalChugSplashConfig`] that gets published once compiler inputs are
//! attached.
//!
//! ## Source Correspondence
//!
//! `sources` carries no source names on the wire. Entry `i` belongs to the
//! `i`-th name returned by [`ChugSplashConfig::distinct_sources`]: the
//! deduplicated `source` values of all contracts, sorted. Anything that
//! builds a canonical config must preserve that ordering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::CanonicalBytesError;
use crate::variable::ConfigVariable;

/// Project-level options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOptions {
    /// Deployment name, unique within its owner's scope.
    pub name: String,
    /// Owner address. Treated opaquely.
    pub owner: String,
}

/// One named contract in a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Compilation unit the contract comes from.
    pub source: String,
    /// Address of an already-deployed instance to attach to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Variable assignments keyed by variable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, ConfigVariable>>,
}

/// How a contract entry comes to exist on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment<'a> {
    /// A new instance is deployed and its constructor runs.
    Fresh,
    /// An existing instance is referenced; no constructor runs.
    Existing {
        /// Address of the existing instance.
        address: &'a str,
    },
}

impl fmt::Display for Deployment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => f.write_str("deploy"),
            Self::Existing { address } => write!(f, "attach {address}"),
        }
    }
}

impl ContractConfig {
    /// Create a fresh-deployment entry with no variables.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            address: None,
            variables: None,
        }
    }

    /// Whether this entry deploys a new instance or attaches to one.
    pub fn deployment(&self) -> Deployment<'_> {
        match self.address.as_deref() {
            Some(address) => Deployment::Existing { address },
            None => Deployment::Fresh,
        }
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&ConfigVariable> {
        self.variables.as_ref()?.get(name)
    }
}

/// Full config object that can be used to commit a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChugSplashConfig {
    /// Project-level options.
    pub options: ConfigOptions,
    /// Contracts keyed by contract name.
    pub contracts: BTreeMap<String, ContractConfig>,
}

impl ChugSplashConfig {
    /// Deduplicated `source` values of all contracts, in sorted order.
    pub fn distinct_sources(&self) -> Vec<&str> {
        self.contracts
            .values()
            .map(|c| c.source.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Names of contracts that reference `source`, in sorted order.
    pub fn contracts_using(&self, source: &str) -> Vec<&str> {
        self.contracts
            .iter()
            .filter(|(_, c)| c.source == source)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Compiler language of a source. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// Solidity (`solc`).
    Solidity,
}

impl SourceLanguage {
    /// Every supported language.
    pub const ALL: [SourceLanguage; 1] = [SourceLanguage::Solidity];

    /// Returns the wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solidity => "solidity",
        }
    }

    /// Parse a wire identifier. Exact, lowercase match only.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compilation details for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSource {
    /// Source language.
    pub language: SourceLanguage,
    /// Compiler version string, e.g. `0.8.0`.
    pub version: String,
    /// Compiler input payload, opaque to this crate.
    pub input: serde_json::Value,
}

/// Config object with added compilation details.
///
/// Off-chain tooling needs the compiler inputs to re-generate the deployment,
/// so a config must be canonicalized before it is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalChugSplashConfig {
    /// The raw config this was derived from.
    #[serde(flatten)]
    pub config: ChugSplashConfig,
    /// One entry per distinct source, sorted by source name.
    pub sources: Vec<CompilerSource>,
}

impl CanonicalChugSplashConfig {
    /// Source names in the same order as `sources`.
    pub fn source_names(&self) -> Vec<&str> {
        self.config.distinct_sources()
    }

    /// Compilation details for the source named `source`.
    pub fn source(&self, source: &str) -> Option<&CompilerSource> {
        let names = self.config.distinct_sources();
        let index = names.iter().position(|n| *n == source)?;
        self.sources.get(index)
    }

    /// Compilation details for the contract named `contract`.
    pub fn source_for(&self, contract: &str) -> Option<&CompilerSource> {
        let entry = self.config.contracts.get(contract)?;
        self.source(&entry.source)
    }

    /// Canonical bytes of the whole config.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalBytesError> {
        CanonicalBytes::new(self)
    }

    /// SHA-256 content digest of the canonical bytes.
    pub fn digest(&self) -> Result<ContentDigest, CanonicalBytesError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }
}
