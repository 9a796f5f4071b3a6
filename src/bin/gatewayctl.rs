use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use todo_gateway::auth::{TokenIssuer, TokenVerifier};
use todo_gateway::config::load_config;

#[derive(Parser)]
#[command(name = "gatewayctl")]
#[command(about = "Operator CLI for the to-do gateway", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (JWT settings for issue/verify)
    #[arg(short, long, global = true, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe a running gateway's health endpoint
    Health {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Issue a token with the configured signing key
    Issue {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        username: String,
    },
    /// Verify a token and print its claims
    Verify { token: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Health { url } => {
            let client = reqwest::Client::new();
            let res = client
                .get(format!("{}/api/health", url.trim_end_matches('/')))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Issue { user_id, username } => {
            let config = load_config(cli.config.as_deref())?;
            let issuer = TokenIssuer::from_config(&config.jwt)?;
            println!("{}", issuer.issue(user_id, &username)?);
        }
        Commands::Verify { token } => {
            let config = load_config(cli.config.as_deref())?;
            let verifier = TokenVerifier::from_config(&config.jwt)?;
            let payload = verifier.verify(token.trim())?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("health check failed with status {status}").into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
