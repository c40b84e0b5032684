// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use anyhow::Context;
use clap::Parser;
use metadata_service::application::Application;
use metadata_service::configuration::{Config, ServiceOptions};
use metadata_service::errors::AppError;
use metadata_service::models::MetadataStore;
use tracing_subscriber::EnvFilter;
use validator::Validate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("[metadata] init");

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    // get configuration options from arguments or environment variables
    let options = ServiceOptions::parse();

    tracing::info!("[metadata] {:?}", &options);

    let config = Config::load(&options.config)?;
    config
        .validate()
        .map_err(AppError::from)
        .with_context(|| format!("invalid config file {}", options.config.display()))?;

    tracing::info!(
        "[metadata] loaded {} metadata prefixes and {} userdata prefixes",
        config.metadata_prefixes.len(),
        config.userdata_prefixes.len()
    );

    let application = Application::build(options, MetadataStore::from(config)).await?;

    application.run_until_stopped().await?;

    Ok(())
}
