//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod ask;
pub mod config;
pub mod export;
pub mod options;
pub mod search;
pub mod seed;
pub mod serve;
pub mod suggest;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Ask(args) => ask::run(ctx, args),
        Commands::Suggest(args) => suggest::run(ctx, args),
        Commands::Options(args) => options::run(ctx, args),
        Commands::Export(args) => export::run(ctx, args),
        Commands::Seed(args) => seed::run(ctx, args),
        Commands::Serve(args) => serve::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}
