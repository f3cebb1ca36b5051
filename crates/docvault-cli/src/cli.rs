//! CLI argument parsing for docvault.
//!
//! CLI flags override every other configuration source.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// docvault
///
/// A personal document repository with faceted full-text search.
#[derive(Parser, Debug)]
#[command(name = "docvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/docvault/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override the metadata database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Override the text index path
    #[arg(long, global = true)]
    pub index_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the documents visible to a user
    Search {
        /// User the search runs for
        #[arg(short, long)]
        user: String,

        /// Query, e.g. `report tag:work after:2020 full:uranium`
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,

        /// Link share ids to present
        #[arg(long = "share")]
        shares: Vec<String>,

        /// Sort column index (0 title, 1 description, 2 language,
        /// 3 create date, 4 shared, 5 file count, 6 relevance)
        #[arg(long)]
        sort_column: Option<u32>,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        #[arg(long, default_value = "0")]
        offset: usize,

        /// Page size (default from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Document management
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },

    /// Tag management
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Share management
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DocumentCommands {
    /// Create a document
    Create {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Three-letter language code (default eng)
        #[arg(long)]
        language: Option<String>,

        /// Creation date, RFC 3339 or YYYY-MM-DD (default now)
        #[arg(long)]
        create_date: Option<String>,

        /// Tag id to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Attach a file with its extracted text
    Attach {
        #[arg(short, long)]
        user: String,

        document_id: String,

        /// File name shown for the attachment
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = "text/plain")]
        mime_type: String,

        /// Read the extracted text from this file
        #[arg(long)]
        text_file: Option<PathBuf>,
    },

    /// Show one document
    Show {
        #[arg(short, long)]
        user: String,

        document_id: String,
    },

    /// Delete a document with its files and shares
    Delete {
        #[arg(short, long)]
        user: String,

        document_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TagCommands {
    /// Create a tag
    Create {
        #[arg(short, long)]
        user: String,

        name: String,

        /// Color as #rrggbb
        #[arg(long, default_value = "#3a87ad")]
        color: String,
    },

    /// List a user's tags
    List {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ShareCommands {
    /// Share a document with a user, or as a link when no grantee is given
    Create {
        #[arg(short, long)]
        user: String,

        document_id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        grantee: Option<String>,
    },

    /// Remove a share
    Delete {
        #[arg(short, long)]
        user: String,

        share_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommands {
    /// Show repository statistics
    Stats,

    /// Rebuild the text index from the metadata store
    RebuildIndex,

    /// Flush and compact the metadata store
    Compact,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
