//! PromoKit CLI: batch promotional asset generation.
//!
//! Usage:
//!   promokit generate --payload <JSON> --campaign <NAME>   Produce the asset archive
//!   promokit variants --campaign <NAME> --discount <KIND>  Show the derived variants
//!   promokit options list|add                              Inspect or extend option lists
//!   promokit check                                         Check browser, backgrounds, templates

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use promokit_campaign_model::catalog::OptionCategory;
use promokit_campaign_model::payload::DiscountKind;
use promokit_common::config::{config_file_path, AppConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "promokit",
    about = "Batch-produce campaign promotional assets",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render, capture and composite all variants into one zip archive
    Generate {
        /// Campaign payload (JSON)
        #[arg(short, long)]
        payload: PathBuf,

        /// Campaign name; selects the background folder
        #[arg(short, long)]
        campaign: String,

        /// Directory the archive is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Show the variants a run would produce
    Variants {
        /// Campaign name
        #[arg(short, long)]
        campaign: String,

        /// Discount structure
        #[arg(short, long, value_enum, default_value = "flat")]
        discount: DiscountArg,
    },

    /// Inspect or extend the option catalog
    Options {
        #[command(subcommand)]
        action: OptionsAction,
    },

    /// Check browser, background and template availability
    Check {
        /// Write a default config file if none exists
        #[arg(long)]
        init_config: bool,
    },
}

#[derive(Subcommand)]
enum OptionsAction {
    /// Print option lists
    List {
        /// Only this category
        category: Option<OptionCategory>,
    },

    /// Add an item to a category
    Add {
        /// campaigns, exams, streams, subjects or offerings
        category: OptionCategory,

        /// Item to add
        item: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DiscountArg {
    Flat,
    FlatAdditional,
}

impl From<DiscountArg> for DiscountKind {
    fn from(arg: DiscountArg) -> Self {
        match arg {
            DiscountArg::Flat => DiscountKind::Flat,
            DiscountArg::FlatAdditional => DiscountKind::FlatAdditional,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let config = AppConfig::load_from(&config_path);

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    promokit_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Generate {
            payload,
            campaign,
            out,
        } => commands::generate::run(&config, payload, campaign, out).await,
        Commands::Variants { campaign, discount } => {
            commands::variants::run(&config, campaign, discount.into())
        }
        Commands::Options { action } => match action {
            OptionsAction::List { category } => commands::options::list(&config, category),
            OptionsAction::Add { category, item } => {
                commands::options::add(&config, category, item)
            }
        },
        Commands::Check { init_config } => {
            commands::check::run(&config, &config_path, init_config)
        }
    }
}
