//! Server configuration.
//!
//! Command-line flags take precedence over environment variables, which
//! take precedence over the built-in defaults.

use std::path::PathBuf;

use clap::Parser;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default directory of the map page's static files.
pub const DEFAULT_STATIC_DIR: &str = "app/dist";

/// Serve the Bogotá crime heatmap.
#[derive(Debug, Default, Parser)]
#[command(name = "crime_heatmap_server")]
#[command(about = "Serve the Bogotá crime heatmap")]
pub struct ServerArgs {
    /// Address to bind (env `BIND_ADDR`).
    #[arg(long)]
    pub bind_addr: Option<String>,

    /// Port to listen on (env `PORT`).
    #[arg(long)]
    pub port: Option<u16>,

    /// Hostname the page is served from; `localhost` routes data requests
    /// through the built-in proxy (env `HEATMAP_HOST`, defaults to the
    /// bind address).
    #[arg(long)]
    pub host: Option<String>,

    /// Override the CKAN API base URL (env `HEATMAP_API_URL`).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Directory of static files to serve (env `HEATMAP_STATIC_DIR`).
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Seed for synthetic data (env `HEATMAP_SEED`).
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Hostname used to choose between the local proxy and the public API.
    pub host: String,
    /// Explicit CKAN API base URL, bypassing host-based selection.
    pub api_url: Option<String>,
    /// Directory of the map page's static files.
    pub static_dir: PathBuf,
    /// Seed for synthetic data; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl ServerConfig {
    /// Resolves `args` against the process environment.
    #[must_use]
    pub fn from_args(args: ServerArgs) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolves `args`, reading fallbacks through `env`.
    #[must_use]
    pub fn resolve(args: ServerArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = args
            .bind_addr
            .or_else(|| env("BIND_ADDR"))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = args
            .port
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_PORT);
        let host = args
            .host
            .or_else(|| env("HEATMAP_HOST"))
            .unwrap_or_else(|| bind_addr.clone());
        let api_url = args.api_url.or_else(|| env("HEATMAP_API_URL"));
        let static_dir = args
            .static_dir
            .or_else(|| env("HEATMAP_STATIC_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let seed = args
            .seed
            .or_else(|| env("HEATMAP_SEED").and_then(|s| s.parse().ok()));

        Self {
            bind_addr,
            port,
            host,
            api_url,
            static_dir,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let config = ServerConfig::resolve(ServerArgs::default(), env_of(&[]));
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.api_url.is_none());
        assert_eq!(config.static_dir, PathBuf::from("app/dist"));
        assert!(config.seed.is_none());
    }

    #[test]
    fn env_fills_missing_flags() {
        let config = ServerConfig::resolve(
            ServerArgs::default(),
            env_of(&[
                ("BIND_ADDR", "0.0.0.0"),
                ("PORT", "8000"),
                ("HEATMAP_HOST", "mapa.example.org"),
                ("HEATMAP_SEED", "42"),
            ]),
        );
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "mapa.example.org");
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn flags_win_over_env() {
        let args = ServerArgs {
            port: Some(9000),
            host: Some("localhost".to_string()),
            ..ServerArgs::default()
        };
        let config = ServerConfig::resolve(args, env_of(&[("PORT", "8000")]));
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn unparseable_port_falls_back_to_default() {
        let config = ServerConfig::resolve(ServerArgs::default(), env_of(&[("PORT", "http")]));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn parses_command_line() {
        let args = ServerArgs::parse_from(["crime_heatmap_server", "--port", "8000", "--seed", "7"]);
        assert_eq!(args.port, Some(8000));
        assert_eq!(args.seed, Some(7));
    }
}
