//! CatVault CLI - a PIN-protected encrypted notes vault.
//!
//! This is the command-line interface for CatVault. It provides a
//! user-friendly interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod store;
mod ui;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use catvault_core::VERSION;

use app::AppContext;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    match &cli.command {
        Some(Commands::Init(args)) => commands::init::handle_init(&ctx, args),
        Some(Commands::Add(args)) => commands::add::handle_add(&ctx, args),
        Some(Commands::List(args)) => commands::list::handle_list(&ctx, args),
        Some(Commands::Show(args)) => commands::show::handle_show(&ctx, args),
        Some(Commands::Delete(args)) => commands::delete::handle_delete(&ctx, args),
        Some(Commands::Check) => commands::check::handle_check(&ctx),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "catvault", &mut std::io::stdout());
            Ok(())
        }
        None => {
            println!("CatVault v{}", VERSION);
            println!("\nRun `catvault --help` for usage information.");
            Ok(())
        }
    }
}
