//! CLI argument definitions for Gavel.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gavel",
    version,
    about = "Transitive dependency analysis for JVM projects",
    long_about = "Gavel inspects the transitive dependencies of Gradle and Maven projects, \
                  prints dependency trees, and suggests exclusions for version conflicts \
                  and known-problematic artifacts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to gavel.toml (defaults to ./gavel.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the transitive dependency tree of a coordinate
    Tree {
        /// Coordinate (group:artifact:version)
        coordinate: String,
        /// Maximum expansion depth below the root
        #[arg(short, long)]
        depth: Option<usize>,
        /// Use only local caches, never the network
        #[arg(long)]
        offline: bool,
    },

    /// Analyze a project's dependencies and suggest exclusions
    Analyze {
        /// Path to a JSON file listing the project's direct dependencies
        input: PathBuf,
        /// Restrict analysis to a single module
        #[arg(short, long)]
        module: Option<String>,
        /// Build system the suggestions target: gradle, maven
        #[arg(long, default_value = "gradle")]
        build_system: String,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check which configured repositories are reachable
    Probe,

    /// Fetch a coordinate's POM and print the dependencies it declares
    Fetch {
        /// Coordinate (group:artifact:version)
        coordinate: String,
    },

    /// Print the bundled known-problematic exclusion rules
    Rules {
        /// Emit the ruleset as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
