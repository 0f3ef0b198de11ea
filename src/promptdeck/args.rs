use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "promptdeck")]
#[command(about = "Personal prompt and checkpoint library", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List prompts or checkpoints grouped by category
    #[command(alias = "ls")]
    List {
        /// List checkpoints instead of prompts
        #[arg(long)]
        checkpoints: bool,

        /// Restrict to one category (id or name)
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by title or body substring
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Manage categories
    #[command(subcommand)]
    Cat(CategoryCommands),

    /// Create a new prompt
    #[command(alias = "n")]
    Add {
        /// Category (id or name)
        category: String,
        title: String,
        body: String,
    },

    /// Edit a prompt
    #[command(alias = "e")]
    Edit {
        /// Prompt (id or title)
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        body: Option<String>,

        /// Reassign to another category (id or name)
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a prompt
    #[command(alias = "rm")]
    Delete {
        /// Prompt (id or title)
        id: String,
    },

    /// Move a prompt up within its category
    Up { id: String },

    /// Move a prompt down within its category
    Down { id: String },

    /// Manage checkpoints
    #[command(subcommand, alias = "cp")]
    Ckpt(CheckpointCommands),

    /// Insert an item into a composer target file
    #[command(alias = "i")]
    Insert {
        /// Prompt (id or title)
        id: String,

        /// Target file receiving the text
        #[arg(long)]
        into: PathBuf,

        /// Insert a checkpoint instead of a prompt
        #[arg(long)]
        checkpoint: bool,
    },

    /// Export the library as a JSON envelope
    Export {
        /// Output path (defaults to promptdeck-<timestamp>.json)
        path: Option<PathBuf>,
    },

    /// Import a library from a JSON file, replacing the current one
    Import {
        path: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Clear the library or restore the sample
    Reset {
        mode: ResetArg,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or set the auto-send preference
    Autosend { state: Option<ToggleArg> },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Add a category
    Add {
        name: String,

        /// Operate on checkpoint categories
        #[arg(long)]
        checkpoints: bool,
    },

    /// Rename a category
    Rename {
        /// Category (id or name)
        id: String,
        name: String,

        #[arg(long)]
        checkpoints: bool,
    },

    /// Move a category up in display order
    Up {
        id: String,

        #[arg(long)]
        checkpoints: bool,
    },

    /// Move a category down in display order
    Down {
        id: String,

        #[arg(long)]
        checkpoints: bool,
    },

    /// Delete a category and every item in it
    #[command(alias = "rm")]
    Delete {
        id: String,

        #[arg(long)]
        checkpoints: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CheckpointCommands {
    /// Save a new checkpoint
    Save {
        /// Checkpoint category (id or name)
        category: String,
        title: String,
        body: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Edit a checkpoint (re-stamps savedAt)
    Edit {
        /// Checkpoint (id or title)
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        body: Option<String>,

        /// Reassign to another checkpoint category (id or name)
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a checkpoint
    #[command(alias = "rm")]
    Delete { id: String },

    /// Move a checkpoint up within its category
    Up { id: String },

    /// Move a checkpoint down within its category
    Down { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ResetArg {
    Clear,
    Sample,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ToggleArg {
    On,
    Off,
}
