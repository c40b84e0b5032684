// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::configuration::ServiceOptions;
use crate::constants::{self, USERNAME_PARAM};
use crate::errors::AppError;
use crate::models::MetadataStore;
use crate::routes::{self, Handler};
use anyhow::Context;
use axum::Router;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{RawPathParams, State};
use axum::response::Response;
use axum::routing::{MethodFilter, MethodRouter};
use axum::serve::Serve;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(options: ServiceOptions, store: MetadataStore) -> anyhow::Result<Self> {
        let address = format!("{}:{}", options.host, options.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {address}"))?;
        let server = run(listener, store)?;
        let port = server.local_addr()?.port();

        tracing::info!("[metadata] listening at http://{}:{}", options.host, port);

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

pub fn run(
    listener: TcpListener,
    store: MetadataStore,
) -> Result<Serve<TcpListener, Router, Router>, AppError> {
    let app = create_router(store)?;
    Ok(axum::serve(listener, app))
}

/// Builds the route table for `store` and mounts it on an axum [`Router`].
///
/// Every binding shares one read-only copy of the store.
#[tracing::instrument(skip(store))]
pub fn create_router(store: MetadataStore) -> Result<Router, AppError> {
    let table = routes::build(&store)?;
    let store = Arc::new(store);

    let mut router: Router<Arc<MetadataStore>> = Router::new();
    for (path, methods) in table.iter() {
        let mut method_router: MethodRouter<Arc<MetadataStore>> = MethodRouter::new();
        for (method, handler) in methods {
            let filter = MethodFilter::try_from(method.clone())
                .map_err(|e| AppError::ConfigError(e.to_string()))?;
            method_router = method_router.on(filter, endpoint(handler.clone()));
        }
        router = router.route(path, method_router);
    }

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(constants::REQUEST_TIMEOUT))
        .with_state(store))
}

/// Adapts a [`Handler`] into an axum handler closure.
fn endpoint(
    handler: Handler,
) -> impl Fn(
    State<Arc<MetadataStore>>,
    Result<RawPathParams, RawPathParamsRejection>,
) -> std::future::Ready<Response>
+ Clone
+ Send
+ Sync
+ 'static {
    move |State(store): State<Arc<MetadataStore>>,
          params: Result<RawPathParams, RawPathParamsRejection>| {
        let username = params.ok().and_then(|params| {
            params
                .iter()
                .find(|(key, _)| *key == USERNAME_PARAM)
                .map(|(_, value)| value.to_string())
        });
        std::future::ready(handler.respond(&store, username.as_deref()))
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("[metadata] unable to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("[metadata] shutting down");
}
