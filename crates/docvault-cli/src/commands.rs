//! Command implementations for the docvault CLI.
//!
//! Every command loads settings, opens the repository in-process, runs
//! one operation and prints the result.

use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use docvault_service::{DocumentService, NewDocument, PageRequest, SortSpec, Viewer};
use docvault_types::{DocumentList, Settings};

use crate::cli::{AdminCommands, Cli, Commands, DocumentCommands, ShareCommands, TagCommands};

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    if let Some(db_path) = &cli.db_path {
        settings.db_path = db_path.clone();
    }
    if let Some(index_path) = &cli.index_path {
        settings.search_index_path = index_path.clone();
    }
    Ok(settings)
}

/// Install the tracing subscriber; `RUST_LOG` wins over the configured level.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Entry point used by the binary.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    init_logging(&settings.log_level)?;
    execute(cli.command, &settings)
}

/// Run one command against the repository named by `settings`.
pub fn execute(command: Commands, settings: &Settings) -> Result<()> {
    let service = open_service(settings)?;
    match command {
        Commands::Search {
            user,
            query,
            shares,
            sort_column,
            asc,
            offset,
            limit,
            json,
        } => {
            let viewer = shares
                .into_iter()
                .fold(Viewer::new(user), |viewer, share| viewer.with_share(share));
            let page = PageRequest { offset, limit };
            let list = service
                .search(
                    &viewer,
                    &query.join(" "),
                    SortSpec::from_params(sort_column, Some(asc)),
                    page,
                )
                .context("Search failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                print_list(&list, offset);
            }
        }
        Commands::Document { command } => handle_document(&service, command)?,
        Commands::Tag { command } => handle_tag(&service, command)?,
        Commands::Share { command } => handle_share(&service, command)?,
        Commands::Admin { command } => handle_admin(&service, command)?,
    }
    Ok(())
}

fn open_service(settings: &Settings) -> Result<DocumentService> {
    let db_path = settings.expanded_db_path();
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    info!(db = ?db_path, index = ?settings.expanded_search_index_path(), "Opening repository");
    DocumentService::open(settings).context("Failed to open repository")
}

/// The 1-based range of rows a page covers, as shown in listings.
fn page_range(offset: usize, returned: usize) -> (usize, usize) {
    (offset.saturating_add(1), offset.saturating_add(returned))
}

fn print_list(list: &DocumentList, offset: usize) {
    if list.documents.is_empty() {
        println!("No documents found ({} total)", list.total);
        return;
    }
    let (first, last) = page_range(offset, list.documents.len());
    println!("Documents {}-{} of {}:", first, last, list.total);
    for doc in &list.documents {
        let created = DateTime::<Utc>::from_timestamp_millis(doc.create_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let tags: Vec<&str> = doc.tags.iter().map(|t| t.name.as_str()).collect();
        println!(
            "  {}  {}  [{}] {}{}",
            doc.id,
            created,
            doc.language,
            doc.title,
            if doc.shared { " (shared)" } else { "" }
        );
        if !tags.is_empty() {
            println!("      tags: {}", tags.join(", "));
        }
        if doc.file_count > 0 {
            println!("      files: {}", doc.file_count);
        }
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_create_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {}", value))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid date: {}", value))?;
    Ok(midnight.and_utc())
}

fn handle_document(service: &DocumentService, command: DocumentCommands) -> Result<()> {
    match command {
        DocumentCommands::Create {
            user,
            title,
            description,
            language,
            create_date,
            tags,
        } => {
            let create_date = create_date.as_deref().map(parse_create_date).transpose()?;
            let document = service.create_document(
                &user,
                NewDocument {
                    title,
                    description,
                    language,
                    create_date,
                    tag_ids: tags,
                },
            )?;
            println!("Created document {}", document.document_id);
        }
        DocumentCommands::Attach {
            user,
            document_id,
            name,
            mime_type,
            text_file,
        } => {
            let content = text_file
                .map(|path| {
                    fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))
                })
                .transpose()?;
            let file = service.add_file(&user, &document_id, &name, &mime_type, content)?;
            println!("Attached file {} to document {}", file.file_id, document_id);
        }
        DocumentCommands::Show { user, document_id } => {
            let detail = service.get_document(&Viewer::new(user), &document_id)?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        DocumentCommands::Delete { user, document_id } => {
            service.delete_document(&user, &document_id)?;
            println!("Deleted document {}", document_id);
        }
    }
    Ok(())
}

fn handle_tag(service: &DocumentService, command: TagCommands) -> Result<()> {
    match command {
        TagCommands::Create { user, name, color } => {
            let tag = service.create_tag(&user, &name, &color)?;
            println!("Created tag {} ({})", tag.tag_id, tag.name);
        }
        TagCommands::List { user } => {
            let tags = service.tags(&user)?;
            if tags.is_empty() {
                println!("No tags");
            }
            for tag in tags {
                println!("  {}  {}  {}", tag.tag_id, tag.color, tag.name);
            }
        }
    }
    Ok(())
}

fn handle_share(service: &DocumentService, command: ShareCommands) -> Result<()> {
    match command {
        ShareCommands::Create {
            user,
            document_id,
            name,
            grantee,
        } => {
            let share =
                service.share_document(&user, &document_id, name.as_deref(), grantee.as_deref())?;
            match &share.grantee_id {
                Some(grantee) => {
                    println!("Shared {} with {} ({})", document_id, grantee, share.share_id)
                }
                None => println!("Created link share {}", share.share_id),
            }
        }
        ShareCommands::Delete { user, share_id } => {
            service.unshare(&user, &share_id)?;
            println!("Deleted share {}", share_id);
        }
    }
    Ok(())
}

fn handle_admin(service: &DocumentService, command: AdminCommands) -> Result<()> {
    match command {
        AdminCommands::Stats => {
            let stats = service.stats()?;
            println!("Repository statistics:");
            println!("  Documents:          {}", stats.documents);
            println!("  Tags:               {}", stats.tags);
            println!("  Shares:             {}", stats.shares);
            println!("  Files:              {}", stats.files);
            println!("  Pending outbox:     {}", stats.pending_outbox);
            println!("  Indexed documents:  {}", stats.indexed_documents);
            println!("  Disk usage:         {} bytes", stats.disk_usage_bytes);
        }
        AdminCommands::RebuildIndex => {
            let progress = service.rebuild_index()?;
            println!(
                "Rebuilt text index: {} documents ({} with file text, {} errors)",
                progress.documents_indexed, progress.with_content, progress.errors
            );
        }
        AdminCommands::Compact => {
            service.compact()?;
            println!("Compaction complete");
        }
    }
    Ok(())
}
