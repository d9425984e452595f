use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agency_admin::client::{
    has_unmigrated_settings, CategoryFilter, ClientConfig, HttpAdminClient, JsonFileStore, KeyValueStore,
    LoadState, MigrationEngine, Prompt, VaultController, ADMIN_AUTH_KEY,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Move legacy admin settings into the secrets vault", long_about = None)]
struct Args {
    /// JSON export of the browser's local storage
    #[arg(short, long, default_value = "local_storage.json")]
    file: PathBuf,

    /// Base URL of the admin backend
    #[arg(short, long, default_value = "http://localhost:5000")]
    api_url: String,

    /// Log in with this admin password and keep the session in the file
    #[arg(short, long)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report legacy entries that have not been moved yet
    Check,
    /// Upsert every legacy entry into the vault
    Migrate,
    /// Copy the server's project secrets into the vault
    Import {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the vault contents
    List {
        /// webhooks, analytics, integrations, api_keys, general or all
        #[arg(short, long, default_value = "all")]
        category: String,
    },
}

struct TerminalPrompt {
    assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn alert(&self, message: &str) {
        println!("{}", message);
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", question);
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let store = Arc::new(JsonFileStore::open(&args.file)?);
    let client = HttpAdminClient::new(ClientConfig {
        timeout: Duration::from_secs(args.timeout),
        ..ClientConfig::new(args.api_url.as_str())
    })?;

    if let Some(password) = &args.password {
        let token = client.login(password).await?;
        store.set(ADMIN_AUTH_KEY, &token)?;
        tracing::info!("Session stored in {}", store.path().display());
    }

    match args.command {
        Command::Check => {
            if !has_unmigrated_settings(store.as_ref()) {
                println!("No legacy settings found in {}", store.path().display());
                return Ok(());
            }
            let engine = MigrationEngine::new(store.as_ref(), &client);
            let records = engine.collect_records()?;
            println!("{} setting(s) waiting to be migrated:", records.len());
            for record in records {
                println!("  {:<28} {}", record.key, record.category);
            }
        }
        Command::Migrate => {
            let report = MigrationEngine::new(store.as_ref(), &client).migrate().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Import { yes } => {
            let mut vault = VaultController::new(client, TerminalPrompt { assume_yes: yes }, store);
            vault.import_from_project_secrets().await;
        }
        Command::List { category } => {
            let filter: CategoryFilter = category.parse().map_err(anyhow::Error::msg)?;
            let mut vault = VaultController::new(client, TerminalPrompt { assume_yes: false }, store);
            vault.select_category(filter).await;
            if let LoadState::Error(message) = &vault.state {
                anyhow::bail!("Failed to load settings: {}", message);
            }
            for setting in &vault.settings {
                println!(
                    "{:<28} {:<13} {}",
                    setting.key,
                    setting.category.as_str(),
                    setting.description.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}
