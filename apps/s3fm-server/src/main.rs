//! s3fm server - per-user file manager over an object store.
//!
//! Runs as an AWS Lambda function when `AWS_LAMBDA_RUNTIME_API` is set, and
//! as a standalone HTTP server otherwise. Both modes drive the same
//! [`FileManager`] handler.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8080 S3FM_USERS_FILE=users.json s3fm-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address (HTTP mode) |
//! | `S3FM_BUCKET` | `s3fm-files` | Bucket holding user files |
//! | `S3FM_SECRET_NAME` | `s3fm-users` | Secret holding the user directory |
//! | `S3FM_STORAGE_BACKEND` | `memory` | `memory` or `s3` |
//! | `S3FM_SECRET_BACKEND` | `file` | `file` or `secretsmanager` |
//! | `S3FM_USERS_FILE` | `users.json` | Users file for the `file` backend |
//! | `AWS_ENDPOINT_URL` | *(unset)* | SDK endpoint override |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod backends;
mod lambda;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use s3fm_core::FileManagerConfig;
use s3fm_http::{EnvelopeHandler, FileHttpConfig, FileHttpService};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::backends::build_file_manager;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config
/// value. Under Lambda, events are written as JSON lines for CloudWatch.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().with_ansi(false).init();
    } else {
        builder.init();
    }

    Ok(())
}

fn build_http_config(config: &FileManagerConfig) -> FileHttpConfig {
    FileHttpConfig {
        decode_binary_responses: config.decode_binary_responses,
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: EnvelopeHandler>(listener: TcpListener, service: FileHttpService<H>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the gateway and requesting the health endpoint.
///
/// Exits with code 0 if healthy, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /_health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = FileManagerConfig::from_env().context("invalid configuration")?;

    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let runtime_api = std::env::var(lambda::RUNTIME_API_ENV).ok();
    init_tracing(&config.log_level, runtime_api.is_some())?;

    info!(
        storage_backend = %config.storage_backend,
        secret_backend = %config.secret_backend,
        lambda = runtime_api.is_some(),
        version = VERSION,
        "starting s3fm server",
    );

    let manager = build_file_manager(&config).await?;

    if let Some(api) = runtime_api {
        return lambda::run(&api, manager).await;
    }

    let service = FileHttpService::new(manager, build_http_config(&config));

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
