mod outline;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zcreator_auth::bootstrap::{self, CodeGrant};
use zcreator_client::{CreatorClient, Method};
use zcreator_config::Config;
use zcreator_types::Endpoint;

#[derive(Parser, Debug)]
#[command(name = "zcreator", about = "Zoho Creator custom API client")]
struct Cli {
    /// Path to a YAML configuration file (environment variables still win).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Call any custom function by name and print the raw JSON result.
    Call {
        /// Function name (e.g. HelloWorld_TEST).
        name: String,
        /// HTTP method (GET or POST).
        #[arg(short = 'X', long, default_value = "GET")]
        method: Method,
        /// Query parameter for GET calls, repeatable.
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
        /// JSON body for POST calls.
        #[arg(short, long, value_name = "JSON")]
        body: Option<String>,
    },
    /// Call a registered endpoint with a schema-checked JSON request.
    Typed {
        /// Registered endpoint name (see `zcreator endpoints`).
        endpoint: Endpoint,
        /// Request object as JSON.
        #[arg(short, long, value_name = "JSON")]
        json: String,
        /// HTTP method (GET or POST).
        #[arg(short = 'X', long, default_value = "POST")]
        method: Method,
        /// Also print the type outline of `result`.
        #[arg(long)]
        show_types: bool,
    },
    /// List registered endpoints with their request and response fields.
    Endpoints,
    /// Refresh the access token and print its state.
    Token,
    /// One-time exchange of an authorization code for a refresh token.
    ExchangeCode {
        /// Authorization code from the Zoho API console.
        code: String,
        /// Redirect URI registered with the OAuth client.
        #[arg(long)]
        redirect_uri: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Call {
            name,
            method,
            params,
            body,
        } => cmd_call(&config, &name, method, &params, body.as_deref()).await,
        Commands::Typed {
            endpoint,
            json,
            method,
            show_types,
        } => cmd_typed(&config, endpoint, &json, method, show_types).await,
        Commands::Endpoints => {
            cmd_endpoints();
            Ok(())
        }
        Commands::Token => cmd_token(&config).await,
        Commands::ExchangeCode { code, redirect_uri } => {
            cmd_exchange_code(&config, &code, redirect_uri).await
        }
    }
}

async fn cmd_call(
    config: &Config,
    name: &str,
    method: Method,
    params: &[(String, String)],
    body: Option<&str>,
) -> Result<()> {
    let client = CreatorClient::from_config(config)?;
    let body: Option<Value> = body
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--body is not valid JSON")?;

    match client.call(name, method, params, body.as_ref()).await? {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Err(anyhow::anyhow!("{name} failed: {record}"))
        }
    }
}

async fn cmd_typed(
    config: &Config,
    endpoint: Endpoint,
    json: &str,
    method: Method,
    show_types: bool,
) -> Result<()> {
    let client = CreatorClient::from_config(config)?;
    let request: Value = serde_json::from_str(json).context("--json is not valid JSON")?;
    let response = client.call_endpoint(endpoint, &request, method).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    if show_types {
        let result = response.get("result").unwrap_or(&Value::Null);
        eprint!("{}", outline::outline(result));
    }
    Ok(())
}

fn cmd_endpoints() {
    print!("{}", endpoint_listing());
}

/// One block per registered endpoint with its request and response fields.
fn endpoint_listing() -> String {
    let mut out = String::new();
    for endpoint in Endpoint::all() {
        let (request, response) = endpoint.shapes();
        out.push_str(&format!("{endpoint}\n"));
        for (label, shape) in [("request", request), ("response", response)] {
            let fields: Vec<String> = shape
                .fields
                .iter()
                .map(|f| format!("{}: {}", f.name, f.ty))
                .collect();
            out.push_str(&format!("  {label:<8} {}\n", fields.join(", ")));
        }
    }
    out
}

async fn cmd_token(config: &Config) -> Result<()> {
    let client = CreatorClient::from_config(config)?;
    let snapshot = client.refresh_token().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn cmd_exchange_code(
    config: &Config,
    code: &str,
    redirect_uri: Option<String>,
) -> Result<()> {
    let client_id = config
        .client_id
        .as_deref()
        .context("client_id is not configured (ZOHO_CLIENT_ID)")?;
    let client_secret = config
        .client_secret
        .as_deref()
        .context("client_secret is not configured (ZOHO_CLIENT_SECRET)")?;
    let redirect_uri = redirect_uri
        .or_else(|| config.redirect_uri.clone())
        .context("redirect_uri is not configured (ZOHO_REDIRECT_URI or --redirect-uri)")?;

    let grant = CodeGrant {
        accounts_url: &config.accounts_url,
        client_id,
        client_secret,
        redirect_uri: &redirect_uri,
        code,
    };
    let tokens = bootstrap::exchange_code(&reqwest::Client::new(), &grant).await?;
    println!("{}", serde_json::to_string_pretty(&tokens)?);
    if tokens.refresh_token.is_some() {
        eprintln!("store refresh_token as ZOHO_REFRESH_TOKEN");
    }
    Ok(())
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("orderID=42").unwrap(),
            ("orderID".to_string(), "42".to_string())
        );
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn test_cli_parses_typed_command() {
        let cli = Cli::try_parse_from([
            "zcreator",
            "typed",
            "OrderToJSON",
            "--json",
            r#"{"orderID": 1}"#,
            "-X",
            "get",
        ])
        .unwrap();
        match cli.command {
            Commands::Typed {
                endpoint, method, ..
            } => {
                assert_eq!(endpoint, Endpoint::OrderToJson);
                assert_eq!(method, Method::Get);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_listing_covers_registry() {
        let listing = endpoint_listing();
        for endpoint in Endpoint::all() {
            assert!(listing.contains(endpoint.name()), "missing {endpoint}");
        }
        assert!(listing.contains("  request  orderID: integer\n"));
        assert!(listing.contains("  response code: integer, result: json\n"));
    }

    #[test]
    fn test_cli_rejects_unknown_endpoint() {
        assert!(Cli::try_parse_from(["zcreator", "typed", "Nope", "--json", "{}"]).is_err());
    }
}
