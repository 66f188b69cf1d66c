//! API server binary

use std::{net::SocketAddr, time::Duration};

use api::ApiState;
use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use warehouse::WarehouseReader;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let reader = WarehouseReader::new(
        opts.clickhouse.url,
        opts.clickhouse.db,
        opts.clickhouse.username,
        opts.clickhouse.password,
    )?;
    info!(db = reader.db_name(), cache_ttl_secs = opts.cache.ttl_secs, "Warehouse reader ready");

    let state = ApiState::new(
        reader,
        Duration::from_secs(opts.cache.ttl_secs),
        opts.api.max_requests,
        Duration::from_secs(opts.api.rate_period_secs),
    );

    let addr: SocketAddr = format!("{}:{}", opts.api.host, opts.api.port).parse()?;
    server::run(addr, state, opts.api.allowed_origins).await
}
