//! Command-line interface of the `monaco` binary

pub mod handler;

pub use handler::run;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "monaco",
    version,
    about = "Create, update, read and delete Dynatrace configuration by name"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log every HTTP call
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to find the environment to talk to.
///
/// `--url` wins over `--env`; without either, `MONACO_ENVIRONMENT_URL` and
/// `MONACO_API_TOKEN` are used.
#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Environment name from the environments file
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Environments file (defaults to <config dir>/monaco/environments.toml)
    #[arg(long, global = true)]
    pub environments: Option<PathBuf>,

    /// Environment URL, bypassing the environments file
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Variable holding the API token when --url is used
    #[arg(long, global = true, default_value = "MONACO_API_TOKEN")]
    pub token_name: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the built-in API families
    Apis {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List (id, name) of every object of a family
    List {
        /// API family identifier (e.g. alerting-profile)
        api: String,
    },
    /// Check whether an object with the given name exists
    Exists { api: String, name: String },
    /// Print the JSON of an object
    Read {
        api: String,
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        name: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Create the object if absent, replace it otherwise
    Upsert {
        api: String,
        name: String,
        /// JSON body (extension.json for the extension family)
        file: PathBuf,
    },
    /// Delete the object with the given name, if any
    Delete { api: String, name: String },
}
