use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use weather_core::{GatewayConfig, provider_from_config};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-gateway", version, about = "City weather HTTP gateway")]
pub struct Cli {
    /// Config file to use instead of the one in the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP gateway.
    Serve {
        /// Listen address, e.g. "127.0.0.1:8080".
        #[arg(long)]
        listen: Option<String>,

        /// Upstream base URL the city name is appended to.
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Fetch weather for a city once and print it as JSON.
    Show {
        /// City name, passed to the upstream as-is.
        city: String,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            None => serve(load_config(self.config.as_ref())?).await,
            Some(Command::Serve { listen, base_url }) => {
                let mut config = load_config(self.config.as_ref())?;
                apply_overrides(&mut config, listen, base_url);
                serve(config).await
            }
            Some(Command::Show { city }) => {
                let config = load_config(self.config.as_ref())?;
                let provider = provider_from_config(&config)?;

                let weather = provider.fetch_weather(&city).await?;
                let json = serde_json::to_string_pretty(&weather)
                    .context("Failed to encode weather as JSON")?;
                println!("{json}");
                Ok(())
            }
            Some(Command::InitConfig { force }) => {
                let path = match self.config {
                    Some(path) => path,
                    None => GatewayConfig::config_file_path()?,
                };
                if path.exists() && !force {
                    bail!(
                        "Config file already exists: {}\n\
                         Hint: pass --force to overwrite it.",
                        path.display()
                    );
                }

                GatewayConfig::default().save_to(&path)?;
                println!("Wrote default configuration to {}", path.display());
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GatewayConfig> {
    match path {
        Some(path) => GatewayConfig::load_from(path),
        None => GatewayConfig::load(),
    }
}

fn apply_overrides(config: &mut GatewayConfig, listen: Option<String>, base_url: Option<String>) {
    if let Some(listen) = listen {
        config.listen_addr = listen;
    }
    if let Some(base_url) = base_url {
        config.upstream_base_url = base_url;
    }
}

async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    let provider = provider_from_config(&config)?;

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind listener on {}", config.listen_addr))?;
    let port = listener.local_addr().context("Listener has no local address")?.port();

    info!(upstream = %config.upstream_base_url, "Server is started on port {port}!");
    server::serve(listener, AppState::from(provider)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve_with_defaults() {
        let cli = Cli::try_parse_from(["weather-gateway"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn serve_accepts_overrides_and_global_config() {
        let cli = Cli::try_parse_from([
            "weather-gateway",
            "serve",
            "--listen",
            "127.0.0.1:9000",
            "--base-url",
            "http://localhost:3000/weather/",
            "--config",
            "/tmp/gateway.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/gateway.toml")));
        match cli.command {
            Some(Command::Serve { listen, base_url }) => {
                assert_eq!(listen.as_deref(), Some("127.0.0.1:9000"));
                assert_eq!(base_url.as_deref(), Some("http://localhost:3000/weather/"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_city() {
        assert!(Cli::try_parse_from(["weather-gateway", "show"]).is_err());

        let cli = Cli::try_parse_from(["weather-gateway", "show", "New York"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Show { city }) if city == "New York"));
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let mut config = GatewayConfig::default();
        apply_overrides(&mut config, Some("127.0.0.1:1234".into()), None);

        assert_eq!(config.listen_addr, "127.0.0.1:1234");
        assert_eq!(config.upstream_base_url, GatewayConfig::default().upstream_base_url);
    }
}
