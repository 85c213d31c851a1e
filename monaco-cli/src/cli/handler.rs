//! Command handlers

use anyhow::{Context, Result, bail};
use colored::*;
use std::fs;

use super::{Cli, Commands, ConnectionArgs};
use crate::api::{Api, DynatraceClient, RestClient, find_api, known_apis};
use crate::config::{ClientConfig, EnvironmentsFile};

/// Execute a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Commands::Apis { json } = cli.command {
        return print_apis(json);
    }

    let config = resolve_connection(&cli.connection)?;
    let client = RestClient::new(&config).context("Failed to create HTTP client")?;
    execute(&client, cli.command).await
}

/// Pick the environment from the command-line flags
pub fn resolve_connection(args: &ConnectionArgs) -> Result<ClientConfig> {
    if let Some(url) = &args.url {
        let token = std::env::var(&args.token_name)
            .with_context(|| format!("Token variable {} is not set", args.token_name))?;
        return ClientConfig::builder()
            .environment_url(url.clone())
            .token(token)
            .build();
    }

    if let Some(env) = &args.env {
        let path = args
            .environments
            .clone()
            .unwrap_or_else(EnvironmentsFile::default_path);
        let file = EnvironmentsFile::load(&path)?;
        return file.client_config(env);
    }

    ClientConfig::from_env().context(
        "No environment selected. Use --env, --url, or set MONACO_ENVIRONMENT_URL and MONACO_API_TOKEN",
    )
}

/// Look up a built-in API family by id
pub fn lookup_api(id: &str) -> Result<Api> {
    match find_api(id) {
        Some(api) => Ok(api),
        None => {
            let known: Vec<String> = known_apis().iter().map(|a| a.id().to_string()).collect();
            bail!("Unknown API '{}'. Known APIs: {}", id, known.join(", "))
        }
    }
}

async fn execute<C: DynatraceClient + ?Sized>(client: &C, command: Commands) -> Result<()> {
    match command {
        Commands::Apis { json } => print_apis(json),

        Commands::List { api } => {
            let api = lookup_api(&api)?;
            let values = client
                .list(&api)
                .await
                .with_context(|| format!("Failed to list {}", api.id()))?;

            for value in &values {
                println!("{}\t{}", value.id.dimmed(), value.name);
            }
            println!("{} {} object(s)", values.len().to_string().bold(), api.id());
            Ok(())
        }

        Commands::Exists { api, name } => {
            let api = lookup_api(&api)?;
            let (exists, id) = client
                .exists_by_name(&api, &name)
                .await
                .with_context(|| format!("Failed to look up {} '{}'", api.id(), name))?;

            if exists {
                println!(
                    "{} {} '{}' exists with id {}",
                    "✓".bright_green(),
                    api.id(),
                    name,
                    id.cyan()
                );
            } else {
                println!("{} no {} named '{}'", "✗".bright_red(), api.id(), name);
            }
            Ok(())
        }

        Commands::Read { api, name, id } => {
            let api = lookup_api(&api)?;
            let body = match (name, id) {
                (_, Some(id)) => client
                    .read_by_id(&api, &id)
                    .await
                    .with_context(|| format!("Failed to read {} {}", api.id(), id))?,
                (Some(name), None) => client
                    .read_by_name(&api, &name)
                    .await
                    .with_context(|| format!("Failed to read {} '{}'", api.id(), name))?,
                (None, None) => bail!("Either --name or --id is required"),
            };

            println!("{}", pretty_body(&body));
            Ok(())
        }

        Commands::Upsert { api, name, file } => {
            let api = lookup_api(&api)?;
            let body = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read config file: {}", file.display()))?;
            if body.trim().is_empty() {
                bail!("Config file is empty: {}", file.display());
            }

            let entity = client
                .upsert_by_name(&api, &name, &body)
                .await
                .with_context(|| format!("Failed to upsert {} '{}'", api.id(), name))?;

            println!(
                "{} {} '{}' -> {}",
                "✓".bright_green(),
                api.id(),
                entity.name,
                entity.id.cyan()
            );
            Ok(())
        }

        Commands::Delete { api, name } => {
            let api = lookup_api(&api)?;
            client
                .delete_by_name(&api, &name)
                .await
                .with_context(|| format!("Failed to delete {} '{}'", api.id(), name))?;

            println!("{} {} '{}' is absent", "✓".bright_green(), api.id(), name);
            Ok(())
        }
    }
}

fn print_apis(json: bool) -> Result<()> {
    let apis = known_apis();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&apis).context("Failed to format JSON output")?
        );
        return Ok(());
    }

    for api in &apis {
        println!(
            "{:<34} {:<17} {}",
            api.id().bold(),
            api.upsert_strategy().label(),
            api.url_path().dimmed()
        );
    }
    Ok(())
}

/// Pretty-print JSON bodies, pass anything else through
fn pretty_body(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
