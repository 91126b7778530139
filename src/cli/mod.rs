pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::Database;

#[derive(Parser)]
#[command(name = "blog-admin")]
#[command(about = "Blog API administration - schema, roles and tokens")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create missing tables in the configured database")]
    Migrate,

    #[command(about = "Grant admin rights to the user with this email")]
    Promote {
        #[arg(help = "Email of the user to promote")]
        email: String,
    },

    #[command(about = "Revoke admin rights from the user with this email")]
    Demote {
        #[arg(help = "Email of the user to demote")]
        email: String,
    },

    #[command(about = "Issue a bearer token for an active user")]
    Token {
        #[arg(help = "User id")]
        user_id: i64,
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

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let database = Database::connect(&config.database).await?;

    let result = match cli.command {
        Commands::Migrate => commands::database::migrate(&database, &output_format).await,
        Commands::Promote { email } => commands::user::set_admin(&database, &email, true, &output_format).await,
        Commands::Demote { email } => commands::user::set_admin(&database, &email, false, &output_format).await,
        Commands::Token { user_id } => {
            commands::token::issue(&database, config, user_id, &output_format).await
        }
    };

    database.close().await;
    result
}
