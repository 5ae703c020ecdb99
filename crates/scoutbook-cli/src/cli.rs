use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "scoutbook")]
#[command(about = "Collect scouting data offline and sync it with the team server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the local image database file
    #[arg(long, global = true, value_name = "PATH")]
    pub image_db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or set the scout name recorded on every edit
    Name {
        /// New scout name (omit to show the current one)
        name: Option<String>,
    },
    /// Set one field of an entry
    Set {
        #[command(flatten)]
        target: EntryTarget,
        /// Field identifier from the synced field definitions
        field: String,
        /// Field value, e.g. bool:true, enum:2, counter:3, text:hello, timer:12.5
        value: String,
    },
    /// Clear one field of an entry
    Clear {
        #[command(flatten)]
        target: EntryTarget,
        /// Field identifier to remove
        field: String,
    },
    /// Print a stored entry as JSON
    Show {
        #[command(flatten)]
        target: EntryTarget,
    },
    /// Attach an image file to an image field
    Attach {
        #[command(flatten)]
        target: EntryTarget,
        /// Field identifier from the synced field definitions
        field: String,
        /// Path to the image file
        file: PathBuf,
    },
    /// List who scouted an entry
    Scouts {
        #[command(flatten)]
        target: EntryTarget,
    },
    /// Show event context, watermarks, and pending changes
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sync local data with the team server
    Sync {
        /// Server base URL, e.g. https://scouting.example.com
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Which entry an editing command addresses.
#[derive(Args)]
pub struct EntryTarget {
    /// Entry kind
    #[arg(value_enum)]
    pub kind: EntryKindArg,

    /// Team id
    #[arg(long = "team", value_name = "TEAM")]
    pub team_id: String,

    /// Match id (required for match and driver entries)
    #[arg(long = "match", value_name = "MATCH")]
    pub match_id: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum EntryKindArg {
    Match,
    Pit,
    Driver,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
