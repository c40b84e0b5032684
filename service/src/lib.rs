// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Metadata Service
//!
//! A stand-in for the EC2 instance metadata service, for local tooling and
//! test environments that expect to find one.
//!
//! The service reads a static snapshot of instance attributes, one IAM
//! credential bundle and a set of user-data entries, then serves them as a
//! read-only tree of HTTP resources under every configured prefix:
//!
//! ```text
//! GET /                                          -> latest\n2016-09-02
//! GET /latest/                                   -> meta-data
//! GET /latest/meta-data/                         -> index listing
//! GET /latest/meta-data/instance-id              -> i-0123456789abcdef0
//! GET /latest/meta-data/iam/security-credentials -> 301 .../security-credentials/
//! GET /latest/meta-data/iam/security-credentials/role-A -> credential JSON
//! GET /latest/user-data/                         -> key=value lines
//! ```
//!
//! ## Modules
//!
//! - [`application`]: HTTP server setup with Axum, request tracing and timeouts
//! - [`configuration`]: CLI argument parsing with clap and the JSON data file
//! - [`constants`]: Configuration constants and fixed response bodies
//! - [`errors`]: Application error types with HTTP response mapping
//! - [`handlers`]: Response production for each route
//! - [`models`]: Metadata values, credentials and the immutable store
//! - [`routes`]: Route table construction from the configured prefixes
//!
//! ## Usage
//!
//! ```bash
//! metadata-service --host 127.0.0.1 --port 8080 --config config.json
//! ```
//!
//! The data is fixed for the life of the process; there is no write API and no
//! authentication.

pub mod application;
pub mod configuration;
pub mod constants;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
