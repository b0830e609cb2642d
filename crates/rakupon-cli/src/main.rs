use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod batch;


#[derive(Debug, Parser)]
#[command(name = "rakupon")]
#[command(about = "Rewrites Rakuten item titles to advertise today's best coupon price")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the catalog, resolve coupons, and push rewritten titles.
    Run {
        /// Compute and print the new titles without updating the store.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the titles the next run would submit (same as `run --dry-run`).
    Preview,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = rakupon_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let dry_run = match cli.command {
        Commands::Run { dry_run } => dry_run,
        Commands::Preview => true,
    };

    let totals = batch::run_with_batch_retry(&config, dry_run).await?;
    tracing::info!(
        products = totals.products,
        updated = totals.updated,
        update_failures = totals.update_failures,
        skipped = totals.skipped,
        dry_run,
        "batch finished"
    );

    if totals.update_failures > 0 {
        anyhow::bail!(
            "{} of {} title updates failed",
            totals.update_failures,
            totals.products
        );
    }

    Ok(())
}
