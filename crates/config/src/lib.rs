//! Axelscope configuration
use clap::Parser;
use url::Url;

/// Default comma-separated list of origins allowed to call the API.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "https://axelscope.xyz,https://www.axelscope.xyz";

/// Clickhouse database configuration options
#[derive(Debug, Clone, Parser)]
pub struct ClickhouseOpts {
    /// Clickhouse URL
    #[clap(long, env = "CLICKHOUSE_URL")]
    pub url: Url,
    /// Clickhouse database
    #[clap(long, env = "CLICKHOUSE_DB")]
    pub db: String,
    /// Clickhouse username
    #[clap(long, env = "CLICKHOUSE_USERNAME")]
    pub username: String,
    /// Clickhouse password
    #[clap(long, env = "CLICKHOUSE_PASSWORD")]
    pub password: String,
}

/// API server configuration options
#[derive(Debug, Clone, Parser)]
pub struct ApiOpts {
    /// Host to bind the API server to
    #[clap(long = "api-host", env = "API_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Port to bind the API server to
    #[clap(long = "api-port", env = "API_PORT", default_value = "3000")]
    pub port: u16,
    /// Comma separated list of allowed CORS origins
    #[clap(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = DEFAULT_ALLOWED_ORIGINS,
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,
    /// Maximum number of requests per rate limiting window
    #[clap(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = u64::MAX)]
    pub max_requests: u64,
    /// Rate limiting window in seconds
    #[clap(long, env = "RATE_LIMIT_PERIOD_SECS", default_value = "1")]
    pub rate_period_secs: u64,
}

/// Query result cache configuration options
#[derive(Debug, Clone, Parser)]
pub struct CacheOpts {
    /// How long a query result is served from memory before it is recomputed
    #[clap(
        long = "cache-ttl-secs",
        env = "CACHE_TTL_SECS",
        default_value = "3600",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub ttl_secs: u64,
}

/// CLI options for the API server
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Clickhouse database configuration
    #[clap(flatten)]
    pub clickhouse: ClickhouseOpts,

    /// API server configuration
    #[clap(flatten)]
    pub api: ApiOpts,

    /// Query result cache configuration
    #[clap(flatten)]
    pub cache: CacheOpts,
}

#[cfg(test)]
mod tests {
    use super::Opts;
    use clap::Parser;

    const REQUIRED: [&str; 9] = [
        "api-server",
        "--url",
        "http://localhost:8123",
        "--db",
        "axelar",
        "--username",
        "reader",
        "--password",
        "secret",
    ];

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Opts::command().debug_assert()
    }

    #[test]
    fn defaults_apply() {
        let opts = Opts::try_parse_from(REQUIRED).unwrap();
        assert_eq!(opts.api.port, 3000);
        assert_eq!(opts.cache.ttl_secs, 3600);
        assert_eq!(opts.api.allowed_origins.len(), 2);
        assert_eq!(opts.clickhouse.db, "axelar");
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--cache-ttl-secs", "0"]);
        assert!(Opts::try_parse_from(args).is_err());
    }

    #[test]
    fn allowed_origins_are_split() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--allowed-origins", "https://a.example,https://b.example"]);
        let opts = Opts::try_parse_from(args).unwrap();
        assert_eq!(opts.api.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }
}
