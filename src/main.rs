//! CRM gateway command-line client.
//!
//! # Architecture Overview
//!
//! ```text
//!     CLI args ──▶ config (TOML + CRM_API_URL / CRM_ENV) ──▶ validation
//!                                                              │
//!                                                              ▼
//!     ┌──────────────┐     ┌───────────────────┐      ┌──────────────┐
//!     │ session store│────▶│ identity resolver │─────▶│   gateway    │──▶ CRM API
//!     │ (--user,     │     │ local → remote    │      │ headers/call │
//!     │ --session-   │     │ bounded backoff   │      └──────┬───────┘
//!     │   file)      │     └───────────────────┘             │
//!     └──────────────┘               ▲                       ▼
//!     ┌──────────────┐               │          envelope unwrap / error taxonomy
//!     │ session      │───────────────┘                       │
//!     │ provider     │                                       ▼
//!     │ (--token)    │                              stdout (pretty JSON)
//!     └──────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crm_gateway::api::{JournalApi, UsersApi};
use crm_gateway::config::load_with_env;
use crm_gateway::gateway::{Gateway, GatewayError, RequestOptions};
use crm_gateway::identity::{FileSessionStore, MemorySessionStore, SessionStore, StaticSessionProvider};
use crm_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "crm-gateway")]
#[command(about = "Command-line client for the CRM API", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Act as this demo user (stored as the local session record)
    #[arg(short, long)]
    user: Option<String>,

    /// JSON file holding session records; `--user` is saved into it
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Token reported by the remote session provider
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET an endpoint
    Get { endpoint: String },
    /// DELETE an endpoint
    Delete { endpoint: String },
    /// POST a JSON body
    Post {
        endpoint: String,
        #[arg(short, long)]
        body: String,
    },
    /// PUT a JSON body
    Put {
        endpoint: String,
        #[arg(short, long)]
        body: String,
    },
    /// PATCH a JSON body
    Patch {
        endpoint: String,
        #[arg(short, long)]
        body: String,
    },
    /// List the team directory
    Users,
    /// List journal entries
    Journal,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_with_env(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let store = match build_store(
        cli.session_file.as_deref(),
        cli.user.as_deref(),
        &config.identity.session_key,
    ) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Session file error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let provider = StaticSessionProvider::new(cli.token.clone());

    let gateway = match Gateway::new(&config, store, Arc::new(provider)) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("{}: {}", e.category, e.message);
            return ExitCode::FAILURE;
        }
    };

    match run(&gateway, cli.command).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render response: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("{}: {}", e.category, e.message);
            ExitCode::FAILURE
        }
    }
}

/// Session records from `--session-file` when given, else in memory only.
fn build_store(
    session_file: Option<&Path>,
    user: Option<&str>,
    session_key: &str,
) -> std::io::Result<Arc<dyn SessionStore>> {
    match session_file {
        Some(path) => {
            let store = FileSessionStore::load_from_file(path)?;
            if let Some(user) = user {
                store.records().set_user(session_key, user);
                store.save_to_file()?;
            }
            Ok(Arc::new(store))
        }
        None => {
            let store = MemorySessionStore::new();
            if let Some(user) = user {
                store.set_user(session_key, user);
            }
            Ok(Arc::new(store))
        }
    }
}

async fn run(gateway: &Gateway, command: Commands) -> Result<Value, GatewayError> {
    let payload = match command {
        Commands::Get { endpoint } => gateway.request_value(&endpoint, RequestOptions::get()).await?,
        Commands::Delete { endpoint } => {
            gateway.request_value(&endpoint, RequestOptions::delete()).await?
        }
        Commands::Post { endpoint, body } => {
            gateway.request_value(&endpoint, RequestOptions::post().with_body(parse_body(&body)?)).await?
        }
        Commands::Put { endpoint, body } => {
            gateway.request_value(&endpoint, RequestOptions::put().with_body(parse_body(&body)?)).await?
        }
        Commands::Patch { endpoint, body } => {
            gateway.request_value(&endpoint, RequestOptions::patch().with_body(parse_body(&body)?)).await?
        }
        Commands::Users => Some(to_value(UsersApi::new(gateway).list().await?)?),
        Commands::Journal => Some(to_value(JournalApi::new(gateway).list().await?)?),
    };
    Ok(payload.unwrap_or(Value::Null))
}

fn parse_body(raw: &str) -> Result<Value, GatewayError> {
    serde_json::from_str(raw)
        .map_err(|e| GatewayError::invalid_request(format!("--body is not valid JSON: {}", e)))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, GatewayError> {
    serde_json::to_value(value)
        .map_err(|e| GatewayError::invalid_request(format!("Failed to render response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_gateway::config::GatewayConfig;
    use crm_gateway::identity::store::parse_session_record;
    use crm_gateway::identity::{IdentityToken, NoSessionProvider};
    use crm_gateway::ErrorCategory;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn gateway_at(base_url: String) -> Gateway {
        let mut config = GatewayConfig::default();
        config.api.base_url = Some(base_url);
        config.identity.max_attempts = 1;
        Gateway::new(&config, Arc::new(MemorySessionStore::new()), Arc::new(NoSessionProvider)).unwrap()
    }

    /// Answer a single request with `response`.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    #[test]
    fn test_cli_parses_global_flags_and_command() {
        let cli = Cli::try_parse_from([
            "crm-gateway",
            "--session-file",
            "sessions.json",
            "-u",
            "user-42",
            "post",
            "/journal/entries",
            "--body",
            r#"{"title":"Standup"}"#,
        ])
        .unwrap();
        assert_eq!(cli.session_file, Some(PathBuf::from("sessions.json")));
        assert_eq!(cli.user.as_deref(), Some("user-42"));
        assert!(matches!(cli.command, Commands::Post { ref endpoint, .. } if endpoint == "/journal/entries"));

        assert!(Cli::try_parse_from(["crm-gateway", "post", "/journal/entries"]).is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(r#"{"done":true}"#).unwrap(), serde_json::json!({ "done": true }));

        let err = parse_body("{done: true").unwrap_err();
        assert_eq!(err.category, ErrorCategory::InvalidRequest);
        assert!(err.message.starts_with("--body is not valid JSON"));
    }

    #[test]
    fn test_build_store_in_memory() {
        let store = build_store(None, Some("user-7"), "demoUser").unwrap();
        let raw = store.get("demoUser").unwrap();
        assert_eq!(parse_session_record(&raw), Some(IdentityToken::new("user-7")));

        let store = build_store(None, None, "demoUser").unwrap();
        assert!(store.get("demoUser").is_none());
    }

    #[test]
    fn test_build_store_persists_user_to_session_file() {
        let path = std::env::temp_dir().join(format!("crm-cli-sessions-{}.json", uuid::Uuid::new_v4()));

        build_store(Some(&path), Some("user-9"), "demoUser").unwrap();

        // A later run without --user still finds the saved record.
        let store = build_store(Some(&path), None, "demoUser").unwrap();
        let raw = store.get("demoUser").unwrap();
        assert_eq!(parse_session_record(&raw), Some(IdentityToken::new("user-9")));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_run_prints_null_for_empty_response() {
        let base_url = serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n").await;
        let gateway = gateway_at(base_url);

        let output = run(&gateway, Commands::Delete { endpoint: "/journal/entries/j1".to_string() })
            .await
            .unwrap();
        assert_eq!(output, Value::Null);
    }

    #[tokio::test]
    async fn test_run_rejects_bad_body_before_sending() {
        // Nothing listens here; a request would fail with a transport error instead.
        let gateway = gateway_at("http://127.0.0.1:1/api".to_string());

        let err = run(
            &gateway,
            Commands::Put { endpoint: "/crm/tasks/t1".to_string(), body: "not json".to_string() },
        )
        .await
        .unwrap_err();
        assert_eq!(err.category, ErrorCategory::InvalidRequest);
    }
}
