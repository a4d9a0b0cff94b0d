use anyhow::Result;
use clap::{Parser, Subcommand};

mod calendar;
mod catalog;
mod config;
mod logging;
mod schedule_cmd;
mod state;

use calendar::CalendarCommand;
use catalog::CatalogArgs;
use schedule_cmd::ScheduleCommand;

#[derive(Parser, Debug)]
#[command(
    name = "courseplan",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("COURSEPLAN_BUILD_SHA"), ")"),
    about = "Course search and conflict-free schedule planning"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog ("01:198:111", "CS 111", "111", or free text)
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Max results to print (default: search.limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Show tier and score for each result
        #[arg(long, default_value_t = false)]
        scores: bool,
    },

    /// List a course's sections and meeting times
    Sections {
        course: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Manage the working schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },

    /// Saved calendars and ICS export
    Calendar {
        #[command(subcommand)]
        command: CalendarCommand,
    },

    /// Manage ~/.courseplan/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Search {
            query,
            catalog,
            limit,
            scores,
        } => {
            let cfg = config::load_config()?;
            catalog::search_cmd(&query.join(" "), &catalog, &cfg, limit, scores).await?;
        }

        Command::Sections { course, catalog } => {
            let cfg = config::load_config()?;
            catalog::sections_cmd(&course, &catalog, &cfg).await?;
        }

        Command::Schedule { command } => {
            let cfg = config::load_config()?;
            schedule_cmd::run(command, &cfg).await?;
        }

        Command::Calendar { command } => {
            let cfg = config::load_config()?;
            calendar::run(command, &cfg)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
