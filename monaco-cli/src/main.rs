use anyhow::Result;
use clap::Parser;

use monaco_cli::cli::{self, Cli};
use monaco_cli::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Tokens usually live in a local .env next to the project
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    cli::run(cli).await
}
