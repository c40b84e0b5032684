// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::configuration::Config;

/// The single IAM identity exposed under `iam/security-credentials/`.
///
/// Field names on the wire match the ones returned by the real metadata
/// service, so SDK credential providers can parse the response unchanged.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, ZeroizeOnDrop)]
pub struct SecurityCredentials {
    #[serde(rename = "User", default)]
    pub user: String,

    #[serde(rename = "AccessKeyId", default)]
    pub access_key_id: String,

    #[serde(rename = "SecretAccessKey", default)]
    pub secret_access_key: String,

    #[serde(rename = "Token", default)]
    pub token: String,

    #[serde(rename = "Expiration", default)]
    pub expiration: String,

    #[serde(rename = "Code", default)]
    pub code: String,
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for SecurityCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityCredentials")
            .field("user", &self.user)
            .field("access_key_id", &"[REDACTED]")
            .field("secret_access_key", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .field("code", &self.code)
            .finish()
    }
}

/// Instance attributes served under every metadata prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MetadataValues {
    pub ami_id: String,
    pub ami_launch_index: String,
    pub ami_manifest_path: String,
    pub availability_zone: String,
    pub hostname: String,
    pub instance_action: String,
    pub instance_id: String,
    pub instance_type: String,
    pub local_hostname: String,
    pub local_ipv4: String,
    pub mac: String,
    pub profile: String,
    pub reservation_id: String,
    /// Rendered newline-joined, in configured order.
    pub security_groups: Vec<String>,
    pub security_credentials: SecurityCredentials,
}

/// Immutable snapshot shared by every request handler.
///
/// Built once from a validated [`Config`] and never mutated afterwards, so it
/// can be read concurrently without locking.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    pub values: MetadataValues,
    pub metadata_prefixes: Vec<String>,
    /// Iteration follows key order today, but callers must not depend on the
    /// order of user-data lines.
    pub userdata_values: BTreeMap<String, String>,
    pub userdata_prefixes: Vec<String>,
}

impl From<Config> for MetadataStore {
    fn from(config: Config) -> Self {
        Self {
            values: config.metadata_values,
            metadata_prefixes: config.metadata_prefixes,
            userdata_values: config.userdata_values,
            userdata_prefixes: config.userdata_prefixes,
        }
    }
}

impl MetadataStore {
    pub fn credentials(&self) -> &SecurityCredentials {
        &self.values.security_credentials
    }
}
