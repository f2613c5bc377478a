use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use catvault_core::VERSION;

/// CatVault - a PIN-protected encrypted notes vault
#[derive(Parser)]
#[command(name = "catvault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path override
    #[arg(short, long, global = true, env = "CATVAULT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up the vault: choose a PIN and create the master key
    Init(InitArgs),

    /// Save a new note
    Add(AddArgs),

    /// List all notes
    List(ListArgs),

    /// Show a note by id
    Show(ShowArgs),

    /// Delete a note by id
    Delete(DeleteArgs),

    /// Check index/store consistency and prune dangling entries
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Disable interactive prompts (requires CATVAULT_PIN)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Note body (overrides stdin/editor)
    #[arg(long)]
    pub text: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// On encryption failure, save the note unencrypted without asking
    #[arg(long)]
    pub allow_plaintext: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note id (note_<millis>)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Note id (note_<millis>)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}
