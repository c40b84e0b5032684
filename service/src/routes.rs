// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Route table construction.
//!
//! [`build`] turns a [`MetadataStore`] into the full set of GET bindings the
//! service answers. For every metadata prefix (for example `/latest/meta-data`)
//! it mounts the following tree, where `{version}` is the second `/`-delimited
//! segment of the prefix:
//!
//! | Path | Handler |
//! |------|---------|
//! | `/{version}/` | [`Handler::MetadataRoot`] |
//! | `{prefix}/` | [`Handler::MetadataIndex`] |
//! | `{prefix}/ami-id`, ... | [`Handler::Attribute`] |
//! | `{prefix}/security-groups` | [`Handler::SecurityGroups`] |
//! | `{prefix}/iam/` | [`Handler::Iam`] |
//! | `{prefix}/iam/security-credentials` | [`Handler::MovedPermanently`] |
//! | `{prefix}/iam/security-credentials/` | [`Handler::CredentialsList`] |
//! | `{prefix}/iam/security-credentials/{username}` | [`Handler::CredentialDetails`] |
//!
//! Each user-data prefix gets `{prefix}/` bound to [`Handler::UserData`], and
//! `/` is bound to [`Handler::VersionIndex`].

use std::collections::{BTreeMap, HashMap};

use axum::http::Method;

use crate::constants::USERNAME_PARAM;
use crate::errors::AppError;
use crate::models::{MetadataStore, MetadataValues};

/// Scalar instance attributes, each served verbatim at its own path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    AmiId,
    AmiLaunchIndex,
    AmiManifestPath,
    AvailabilityZone,
    Hostname,
    InstanceAction,
    InstanceId,
    InstanceType,
    LocalHostname,
    LocalIpv4,
    Mac,
    Profile,
    ReservationId,
}

impl Attribute {
    pub const ALL: [Attribute; 13] = [
        Attribute::AmiId,
        Attribute::AmiLaunchIndex,
        Attribute::AmiManifestPath,
        Attribute::AvailabilityZone,
        Attribute::Hostname,
        Attribute::InstanceAction,
        Attribute::InstanceId,
        Attribute::InstanceType,
        Attribute::LocalHostname,
        Attribute::LocalIpv4,
        Attribute::Mac,
        Attribute::Profile,
        Attribute::ReservationId,
    ];

    /// Path relative to the metadata prefix.
    pub fn path(self) -> &'static str {
        match self {
            Attribute::AmiId => "ami-id",
            Attribute::AmiLaunchIndex => "ami-launch-index",
            Attribute::AmiManifestPath => "ami-manifest-path",
            Attribute::AvailabilityZone => "placement/availability-zone",
            Attribute::Hostname => "hostname",
            Attribute::InstanceAction => "instance-action",
            Attribute::InstanceId => "instance-id",
            Attribute::InstanceType => "instance-type",
            Attribute::LocalHostname => "local-hostname",
            Attribute::LocalIpv4 => "local-ipv4",
            Attribute::Mac => "mac",
            Attribute::Profile => "profile",
            Attribute::ReservationId => "reservation-id",
        }
    }

    pub fn value(self, values: &MetadataValues) -> &str {
        match self {
            Attribute::AmiId => &values.ami_id,
            Attribute::AmiLaunchIndex => &values.ami_launch_index,
            Attribute::AmiManifestPath => &values.ami_manifest_path,
            Attribute::AvailabilityZone => &values.availability_zone,
            Attribute::Hostname => &values.hostname,
            Attribute::InstanceAction => &values.instance_action,
            Attribute::InstanceId => &values.instance_id,
            Attribute::InstanceType => &values.instance_type,
            Attribute::LocalHostname => &values.local_hostname,
            Attribute::LocalIpv4 => &values.local_ipv4,
            Attribute::Mac => &values.mac,
            Attribute::Profile => &values.profile,
            Attribute::ReservationId => &values.reservation_id,
        }
    }
}

/// The behavior bound to a (path, method) pair. Responses are produced in
/// [`crate::handlers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Literal `meta-data`.
    MetadataRoot,
    /// Fixed listing of top-level metadata items.
    MetadataIndex,
    Attribute(Attribute),
    SecurityGroups,
    /// Literal `security-credentials/`.
    Iam,
    /// 301 to the contained location.
    MovedPermanently(String),
    /// Name of the configured IAM user.
    CredentialsList,
    /// JSON credential bundle when `{username}` matches the configured user.
    CredentialDetails,
    UserData,
    /// Version labels of all metadata prefixes.
    VersionIndex,
}

/// Resolved bindings, keyed by path then method.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, HashMap<Method, Handler>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `(path, method)`, refusing to replace an existing binding.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        method: Method,
        handler: Handler,
    ) -> Result<(), AppError> {
        let path = path.into();
        let methods = self.routes.entry(path.clone()).or_default();
        if methods.contains_key(&method) {
            return Err(AppError::DuplicateRoute(method.to_string(), path));
        }
        methods.insert(method, handler);
        Ok(())
    }

    pub fn get(&self, path: &str, method: &Method) -> Option<&Handler> {
        self.routes.get(path).and_then(|methods| methods.get(method))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<Method, Handler>)> {
        self.routes
            .iter()
            .map(|(path, methods)| (path.as_str(), methods))
    }

    /// Number of (path, method) bindings.
    pub(crate) fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }
}

/// Shape rules for any mount point: rooted, no trailing slash, and no segment
/// the router would read as a parameter or wildcard.
pub fn is_mountable(prefix: &str) -> bool {
    prefix.starts_with('/')
        && !prefix.ends_with('/')
        && !prefix.contains(['{', '}'])
        && !prefix
            .split('/')
            .any(|segment| segment.starts_with([':', '*']))
}

/// Returns the version label of a metadata prefix: its second `/`-delimited
/// segment, so `/latest/meta-data` yields `latest`.
pub fn metadata_version(prefix: &str) -> Option<&str> {
    if !prefix.starts_with('/') {
        return None;
    }
    prefix.split('/').nth(1).filter(|version| !version.is_empty())
}

/// Builds the complete route table for `store`.
///
/// # Errors
///
/// - [`AppError::InvalidPrefix`] - a prefix cannot be mounted, or a metadata
///   prefix has no version segment
/// - [`AppError::DuplicateRoute`] - two prefixes would bind the same path
#[tracing::instrument(skip(store))]
pub fn build(store: &MetadataStore) -> Result<RouteTable, AppError> {
    let mut table = RouteTable::new();

    for (index, prefix) in store.metadata_prefixes.iter().enumerate() {
        tracing::info!("[metadata] adding metadata prefix ({}) {}", index, prefix);
        add_metadata_prefix(&mut table, prefix)?;
    }

    for (index, prefix) in store.userdata_prefixes.iter().enumerate() {
        tracing::info!("[metadata] adding userdata prefix ({}) {}", index, prefix);
        if !is_mountable(prefix) {
            return Err(AppError::InvalidPrefix(prefix.to_string()));
        }
        table.insert(format!("{prefix}/"), Method::GET, Handler::UserData)?;
    }

    table.insert("/", Method::GET, Handler::VersionIndex)?;

    tracing::debug!("[metadata] built {} routes", table.len());

    Ok(table)
}

fn add_metadata_prefix(table: &mut RouteTable, prefix: &str) -> Result<(), AppError> {
    let version = metadata_version(prefix)
        .filter(|_| is_mountable(prefix))
        .ok_or_else(|| AppError::InvalidPrefix(prefix.to_string()))?;
    tracing::info!("[metadata] adding metadata version: {}", version);

    let version_root = format!("/{version}/");
    let index = format!("{prefix}/");
    if version_root == index {
        // `/{version}` mounted directly: the listing owns `/{version}/`
        tracing::info!(
            "[metadata] index listing for {} replaces the version root {}",
            prefix,
            version_root
        );
    } else if table.get(&version_root, &Method::GET) != Some(&Handler::MetadataRoot) {
        // prefixes sharing a version bind the same root once
        table.insert(version_root, Method::GET, Handler::MetadataRoot)?;
    }

    table.insert(index, Method::GET, Handler::MetadataIndex)?;

    for attribute in Attribute::ALL {
        table.insert(
            format!("{prefix}/{}", attribute.path()),
            Method::GET,
            Handler::Attribute(attribute),
        )?;
    }

    table.insert(
        format!("{prefix}/security-groups"),
        Method::GET,
        Handler::SecurityGroups,
    )?;
    table.insert(format!("{prefix}/iam/"), Method::GET, Handler::Iam)?;
    table.insert(
        format!("{prefix}/iam/security-credentials"),
        Method::GET,
        Handler::MovedPermanently(format!("{prefix}/iam/security-credentials/")),
    )?;
    table.insert(
        format!("{prefix}/iam/security-credentials/"),
        Method::GET,
        Handler::CredentialsList,
    )?;
    table.insert(
        format!("{prefix}/iam/security-credentials/{{{USERNAME_PARAM}}}"),
        Method::GET,
        Handler::CredentialDetails,
    )?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn store_with(metadata: &[&str], userdata: &[&str]) -> MetadataStore {
        MetadataStore {
            metadata_prefixes: metadata.iter().map(|p| p.to_string()).collect(),
            userdata_prefixes: userdata.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_metadata_version_is_second_segment() {
        assert_eq!(metadata_version("/latest"), Some("latest"));
        assert_eq!(metadata_version("/latest/meta-data"), Some("latest"));
        assert_eq!(metadata_version("/2016-09-02/meta-data"), Some("2016-09-02"));
        assert_eq!(metadata_version("latest"), None);
        assert_eq!(metadata_version("latest/meta-data"), None);
        assert_eq!(metadata_version("/"), None);
        assert_eq!(metadata_version(""), None);
    }

    #[test]
    fn test_build_mounts_full_metadata_tree() {
        let table = build(&store_with(&["/latest/meta-data"], &[])).unwrap();
        let get = |path: &str| table.get(path, &Method::GET).cloned();

        assert_eq!(get("/"), Some(Handler::VersionIndex));
        assert_eq!(get("/latest/"), Some(Handler::MetadataRoot));
        assert_eq!(get("/latest/meta-data/"), Some(Handler::MetadataIndex));
        assert_eq!(
            get("/latest/meta-data/ami-id"),
            Some(Handler::Attribute(Attribute::AmiId))
        );
        assert_eq!(
            get("/latest/meta-data/placement/availability-zone"),
            Some(Handler::Attribute(Attribute::AvailabilityZone))
        );
        assert_eq!(
            get("/latest/meta-data/security-groups"),
            Some(Handler::SecurityGroups)
        );
        assert_eq!(get("/latest/meta-data/iam/"), Some(Handler::Iam));
        assert_eq!(
            get("/latest/meta-data/iam/security-credentials"),
            Some(Handler::MovedPermanently(
                "/latest/meta-data/iam/security-credentials/".to_string()
            ))
        );
        assert_eq!(
            get("/latest/meta-data/iam/security-credentials/"),
            Some(Handler::CredentialsList)
        );
        assert_eq!(
            get("/latest/meta-data/iam/security-credentials/{username}"),
            Some(Handler::CredentialDetails)
        );

        // root, version root, index, 13 attributes, groups, iam, redirect, list, details
        assert_eq!(table.len(), 3 + Attribute::ALL.len() + 5);
    }

    #[test]
    fn test_build_registers_get_only() {
        let table = build(&store_with(&["/latest"], &["/latest/user-data"])).unwrap();
        for (path, methods) in table.iter() {
            assert_eq!(methods.len(), 1, "{path}");
            assert!(methods.contains_key(&Method::GET), "{path}");
        }
        assert!(table.get("/latest/ami-id", &Method::POST).is_none());
    }

    #[test]
    fn test_version_prefix_index_replaces_version_root() {
        let table = build(&store_with(&["/latest"], &[])).unwrap();
        assert_eq!(
            table.get("/latest/", &Method::GET),
            Some(&Handler::MetadataIndex)
        );
        assert_eq!(
            table.get("/latest/ami-id", &Method::GET),
            Some(&Handler::Attribute(Attribute::AmiId))
        );
    }

    #[test]
    fn test_prefixes_sharing_a_version_share_the_root() {
        let table = build(&store_with(&["/latest/meta-data", "/latest/dynamic"], &[])).unwrap();
        assert_eq!(
            table.get("/latest/", &Method::GET),
            Some(&Handler::MetadataRoot)
        );
        assert!(table.get("/latest/dynamic/", &Method::GET).is_some());
    }

    #[test]
    fn test_multiple_versions_are_mounted() {
        let table = build(&store_with(
            &["/latest/meta-data", "/2016-09-02/meta-data"],
            &["/latest/user-data"],
        ))
        .unwrap();

        assert!(table.get("/2016-09-02/", &Method::GET).is_some());
        assert!(
            table
                .get("/2016-09-02/meta-data/instance-id", &Method::GET)
                .is_some()
        );
        assert_eq!(
            table.get("/latest/user-data/", &Method::GET),
            Some(&Handler::UserData)
        );
    }

    #[test]
    fn test_duplicate_prefix_is_rejected() {
        let err = build(&store_with(&["/latest/meta-data", "/latest/meta-data"], &[]))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateRoute(_, _)));
    }

    #[test]
    fn test_userdata_colliding_with_metadata_is_rejected() {
        let err = build(&store_with(&["/latest/meta-data"], &["/latest/meta-data"])).unwrap_err();
        assert_eq!(
            err,
            AppError::DuplicateRoute("GET".to_string(), "/latest/meta-data/".to_string())
        );
    }

    #[test]
    fn test_version_root_colliding_with_index_is_rejected() {
        let err = build(&store_with(&["/latest/meta-data", "/latest"], &[])).unwrap_err();
        assert!(matches!(err, AppError::DuplicateRoute(_, ref path) if path == "/latest/"));
    }

    #[test]
    fn test_malformed_prefix_is_rejected() {
        let err = build(&store_with(&["latest"], &[])).unwrap_err();
        assert_eq!(err, AppError::InvalidPrefix("latest".to_string()));
    }

    #[test]
    fn test_is_mountable() {
        assert!(is_mountable("/latest"));
        assert!(is_mountable("/latest/meta-data"));
        assert!(is_mountable("/latest/user:data"));
        for prefix in ["latest", "/latest/", "/{version}", "/latest/:meta", "/*rest", "/latest/*"] {
            assert!(!is_mountable(prefix), "{prefix}");
        }
    }

    #[test]
    fn test_router_syntax_in_prefix_is_rejected() {
        let err = build(&store_with(&["/latest/:meta"], &[])).unwrap_err();
        assert_eq!(err, AppError::InvalidPrefix("/latest/:meta".to_string()));

        let err = build(&store_with(&["/latest/meta-data"], &["/latest/*data"])).unwrap_err();
        assert_eq!(err, AppError::InvalidPrefix("/latest/*data".to_string()));
    }

    #[test]
    fn test_empty_store_only_serves_root() {
        let table = build(&MetadataStore::default()).unwrap();
        let paths: Vec<&str> = table.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["/"]);
    }
}
