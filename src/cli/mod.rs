pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "catalogue")]
#[command(about = "Games catalogue CLI - run the API, manage the schema, mint dev tokens")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Create the catalogue tables if they do not exist")]
    Migrate,

    #[command(about = "Mint an HS256 token signed with AUTH_JWT_SECRET")]
    Token {
        #[arg(long = "permission", short = 'p', required = true, help = "Permission to grant (repeatable)")]
        permissions: Vec<String>,
        #[arg(long, default_value = "catalogue-dev", help = "Token subject")]
        subject: String,
        #[arg(long, default_value_t = 60, help = "Lifetime in minutes")]
        ttl_minutes: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config();

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(config, port).await,
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::Token {
            permissions,
            subject,
            ttl_minutes,
        } => commands::token::handle(config, permissions, subject, ttl_minutes, output_format),
    }
}
