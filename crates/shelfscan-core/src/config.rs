//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::record::HashAlgorithm;
use crate::rules::{IgnoreRules, TargetExtensions};

/// Configuration for a single scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan. Not normalized; relative roots stay relative.
    pub root: PathBuf,

    /// Leaf-name patterns to skip, along with their subtrees.
    #[builder(default)]
    #[serde(default)]
    pub ignore: IgnoreRules,

    /// Extensions that qualify a file for reporting.
    #[builder(default)]
    #[serde(default)]
    pub extensions: TargetExtensions,

    /// Digest used for content hashes.
    #[builder(default)]
    #[serde(default)]
    pub hash: HashAlgorithm,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config for scanning a path with the default rules.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: IgnoreRules::default(),
            extensions: TargetExtensions::default(),
            hash: HashAlgorithm::default(),
        }
    }
}
