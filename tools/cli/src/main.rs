//! OAuthKit CLI - Command line interface for OAuth service resolution.
//!
//! Lists the providers the resolver knows about and starts authorization
//! flows by printing (or opening) the provider's authorization URL.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;

use oauthkit_common::Credentials;
use oauthkit_resolver::{FactoryConfig, ServiceFactory};
use oauthkit_service::{OAuth1Service, OAuth2Service, ServiceHandle};
use oauthkit_storage::{LocalStorage, TokenStorage};

#[derive(Parser)]
#[command(name = "oauthkit")]
#[command(about = "OAuthKit - OAuth service resolution")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known providers.
    Providers {
        /// Factory configuration declaring custom providers.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the authorization URL for a provider.
    Authorize {
        /// Provider name, e.g. "github".
        #[arg(short, long)]
        provider: String,

        /// JSON file with consumer_id, consumer_secret and callback_url.
        #[arg(long)]
        credentials: PathBuf,

        /// Scope to request (repeatable). Not allowed for OAuth1 providers.
        #[arg(short, long = "scope")]
        scopes: Vec<String>,

        /// Factory configuration declaring custom providers.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Token store file (default: user data directory).
        #[arg(long)]
        token_store: Option<PathBuf>,

        /// Open the URL in the default browser.
        #[arg(long)]
        open: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Providers { config } => cmd_providers(config.as_deref()),

        Commands::Authorize {
            provider,
            credentials,
            scopes,
            config,
            token_store,
            open,
        } => {
            cmd_authorize(
                &provider,
                &credentials,
                &scopes,
                config.as_deref(),
                token_store,
                open,
            )
            .await
        }

        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "oauthkit", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the factory configuration, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<FactoryConfig> {
    match path {
        Some(path) => FactoryConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(FactoryConfig::default()),
    }
}

/// Read credentials, prompting for the secret when the file leaves it empty.
fn load_credentials(path: &Path) -> Result<Credentials> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;
    let credentials: Credentials =
        serde_json::from_str(&json).context("Invalid credentials file")?;

    if credentials.consumer_secret().is_empty() {
        let secret =
            rpassword::prompt_password("Consumer secret: ").context("Failed to read secret")?;
        return Ok(credentials.with_consumer_secret(secret));
    }

    Ok(credentials)
}

fn default_token_store() -> Result<PathBuf> {
    let dir = dirs::data_dir().context("No user data directory on this platform")?;
    Ok(dir.join("oauthkit").join("tokens.json"))
}

/// List providers.
fn cmd_providers(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let custom: Vec<String> = config
        .providers
        .iter()
        .map(|p| p.provider_name().to_string())
        .collect();
    let factory = ServiceFactory::from_config(config).context("Invalid provider configuration")?;

    println!("Built-in providers:");
    for id in factory.catalog().identifiers() {
        println!("  {}", id);
    }

    if !custom.is_empty() {
        println!("Configured providers:");
        for name in custom {
            println!("  {}", name);
        }
    }

    Ok(())
}

/// Start an authorization flow.
async fn cmd_authorize(
    provider: &str,
    credentials: &Path,
    scopes: &[String],
    config: Option<&Path>,
    token_store: Option<PathBuf>,
    open_browser: bool,
) -> Result<()> {
    let factory =
        ServiceFactory::from_config(load_config(config)?).context("Invalid provider configuration")?;
    let credentials = Arc::new(load_credentials(credentials)?);

    let store_path = match token_store {
        Some(path) => path,
        None => default_token_store()?,
    };
    let storage: Arc<dyn TokenStorage> = Arc::new(LocalStorage::new(&store_path));

    let service = factory
        .create_service(provider, credentials, storage, scopes)
        .context("Failed to create service")?
        .with_context(|| format!("Unknown provider: {}", provider))?;

    info!("Resolved {} as {}", service.service_name(), service.version());

    let url = authorization_url(&service).await?;

    println!("Authorize {} at:", service.service_name());
    println!("  {}", url);
    println!("Tokens are stored in {}", store_path.display());

    if open_browser {
        open::that(url.as_str()).context("Failed to open browser")?;
    }

    Ok(())
}

/// OAuth1 providers need a request token before the user can be sent off.
async fn authorization_url(service: &ServiceHandle) -> Result<Url> {
    match service {
        ServiceHandle::OAuth2(service) => service
            .authorization_uri(&[])
            .await
            .context("Failed to build authorization URL"),
        ServiceHandle::OAuth1(service) => {
            let token = service
                .request_request_token()
                .await
                .context("Failed to obtain request token")?;
            let request_token = token
                .request_token
                .context("Provider returned no request token")?;
            service
                .authorization_uri(&[("oauth_token", request_token.as_str())])
                .context("Failed to build authorization URL")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_authorize() {
        let cli = Cli::parse_from([
            "oauthkit",
            "authorize",
            "--provider",
            "github",
            "--credentials",
            "creds.json",
            "-s",
            "email",
            "-s",
            "repo",
        ]);

        match cli.command {
            Commands::Authorize {
                provider, scopes, open, ..
            } => {
                assert_eq!(provider, "github");
                assert_eq!(scopes, vec!["email", "repo"]);
                assert!(!open);
            }
            _ => panic!("expected authorize"),
        }
    }

    #[test]
    fn test_load_credentials_with_secret() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"consumer_id": "id", "consumer_secret": "secret", "callback_url": "http://localhost/cb"}"#,
        )
        .unwrap();

        let credentials = load_credentials(file.path()).unwrap();
        assert_eq!(credentials.consumer_id(), "id");
        assert_eq!(credentials.consumer_secret().expose(), "secret");
    }

    #[test]
    fn test_missing_config_is_default() {
        let config = load_config(None).unwrap();
        assert!(config.providers.is_empty());
    }
}
