//! huginnd: the Huginn daemon.
//!
//! Serves the [`MetaGateway`](huginn::MetaGateway) over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use huginn::cache::MemoryStoreConfig;
use huginn::providers::CredentialHandle;
use huginn::server::config::{CacheBackend, Config, Secrets};
use huginn::{Huginn, HuginnError, MetaGateway};

/// Huginn daemon, the anime metadata gateway service.
#[derive(Parser)]
#[command(name = "huginnd")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Huginn anime metadata gateway daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let gateway = build_gateway(&config, &secrets).await?;

    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| HuginnError::Configuration(format!("Invalid address: {e}")))?;

    info!(
        version = huginn::version_string(),
        %addr,
        proxies = gateway.registry().proxies().len(),
        cache = ?config.cache.backend,
        "huginnd starting"
    );

    let app = huginn::server::create_router(Arc::new(gateway));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("huginnd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Build a [`MetaGateway`] from configuration.
async fn build_gateway(config: &Config, secrets: &Secrets) -> Result<MetaGateway, HuginnError> {
    let mut builder = Huginn::builder()
        .upstream(&config.upstream.base_url)
        .timeout(config.upstream.timeout())
        .default_provider(&config.upstream.default_provider)
        .proxies(config.proxy_pool()?)
        .ttl_policy(config.cache.ttl.policy())
        .default_locale(&config.session.default_locale)
        .credential(CredentialHandle::new(secrets.credential()));

    if let Some(ref url) = config.session.auth_url {
        builder = builder.session_auth_url(url);
    }
    if let Some(ref namespace) = config.cache.namespace {
        builder = builder.namespace(namespace);
    }

    builder = match config.cache.backend {
        CacheBackend::Memory => {
            builder.memory_cache(MemoryStoreConfig::new().max_entries(config.cache.max_entries))
        }
        CacheBackend::Redis => builder.cache_store(connect_redis(config).await?),
        CacheBackend::None => builder,
    };

    builder.build()
}

#[cfg(feature = "redis")]
async fn connect_redis(
    config: &Config,
) -> Result<Arc<dyn huginn::cache::CacheStore>, HuginnError> {
    let url = config.cache.redis_url.as_deref().ok_or_else(|| {
        HuginnError::Configuration("cache.redis_url is required for the redis backend".into())
    })?;
    let store = huginn::cache::RedisStore::connect(url).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(
    _config: &Config,
) -> Result<Arc<dyn huginn::cache::CacheStore>, HuginnError> {
    Err(HuginnError::Configuration(
        "the redis cache backend requires building with the `redis` feature".into(),
    ))
}
