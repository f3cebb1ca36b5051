//! docvault
//!
//! A personal document repository with faceted full-text search.
//!
//! # Usage
//!
//! ```bash
//! docvault document create -u alice --title "Lease" --tag <tag-id>
//! docvault search -u alice lease after:2020 tag:home
//! docvault admin rebuild-index
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/docvault/config.toml)
//! 3. Environment variables (DOCVAULT_*)
//! 4. CLI flags

use anyhow::Result;

use docvault_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse_args())
}
