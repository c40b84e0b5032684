// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Body of `/{version}/`.
pub const METADATA_ROOT_BODY: &str = "meta-data";
/// Body of `{prefix}/iam/`.
pub const IAM_BODY: &str = "security-credentials/";

/// Path parameter bound to the requested IAM user name.
pub const USERNAME_PARAM: &str = "username";

/// Top-level items listed at `{prefix}/`. This is a fixed menu mirroring the
/// real service, not a reflection of which attributes are configured.
pub const METADATA_INDEX_ITEMS: [&str; 22] = [
    "ami-id",
    "ami-launch-index",
    "ami-manifest-path",
    "block-device-mapping/",
    "hostname",
    "iam/",
    "instance-action",
    "instance-id",
    "instance-type",
    "local-hostname",
    "local-ipv4",
    "mac",
    "metrics/",
    "network/",
    "placement/",
    "profile",
    "public-hostname",
    "public-ipv4",
    "public-keys/",
    "reservation-id",
    "security-groups",
    "services/",
];
