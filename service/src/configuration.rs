// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Startup configuration.
//!
//! [`ServiceOptions`] covers how the process listens and where it finds its
//! data; [`Config`] is the metadata snapshot itself, read once from a JSON file:
//!
//! ```json
//! {
//!   "MetadataValues": { "ami-id": "ami-0123", "security-credentials": { "User": "role-A" } },
//!   "MetadataPrefixes": ["/latest/meta-data", "/2016-09-02/meta-data"],
//!   "UserdataValues": { "env": "dev" },
//!   "UserdataPrefixes": ["/latest/user-data"]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::constants;
use crate::models::MetadataValues;
use crate::routes::{is_mountable, metadata_version};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct ServiceOptions {
    #[arg(long, default_value = constants::DEFAULT_HTTP_HOST, env("METADATA_HTTP_HOST"))]
    pub host: String,
    #[arg(long, default_value_t = constants::DEFAULT_HTTP_PORT, env("METADATA_HTTP_PORT"))]
    pub port: u16,
    #[arg(long, default_value = constants::DEFAULT_CONFIG_PATH, env("METADATA_CONFIG_PATH"))]
    pub config: PathBuf,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        ServiceOptions {
            host: constants::DEFAULT_HTTP_HOST.to_string(),
            port: constants::DEFAULT_HTTP_PORT,
            config: PathBuf::from(constants::DEFAULT_CONFIG_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "MetadataValues")]
    pub metadata_values: MetadataValues,

    #[serde(rename = "MetadataPrefixes")]
    #[validate(custom(function = "validate_metadata_prefixes"))]
    pub metadata_prefixes: Vec<String>,

    #[serde(rename = "UserdataValues")]
    pub userdata_values: BTreeMap<String, String>,

    #[serde(rename = "UserdataPrefixes")]
    #[validate(custom(function = "validate_userdata_prefixes"))]
    pub userdata_prefixes: Vec<String>,
}

impl Config {
    /// Reads and parses the configuration file. Validation is left to the caller.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config file {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

fn validate_metadata_prefixes(prefixes: &[String]) -> Result<(), ValidationError> {
    for prefix in prefixes {
        if !is_mountable(prefix) || metadata_version(prefix).is_none() {
            return Err(ValidationError::new("invalid_metadata_prefix"));
        }
    }
    Ok(())
}

fn validate_userdata_prefixes(prefixes: &[String]) -> Result<(), ValidationError> {
    if prefixes.iter().any(|prefix| !is_mountable(prefix)) {
        return Err(ValidationError::new("invalid_userdata_prefix"));
    }
    Ok(())
}
