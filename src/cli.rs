//! Command line interface
//!
//! Without a subcommand the interactive TUI starts. Subcommands run one API
//! operation, print the result and exit.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};
use unicode_width::UnicodeWidthStr;

use crate::api::{read_upload_file, CategoryApi};
use crate::models::{Category, CategoryChanges, CategoryField};
use crate::tui::{ui::truncate_to_width, Screen};

#[derive(Parser)]
#[command(name = "category-desk")]
#[command(about = "Create, edit and bulk-import categories from the terminal")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides CATEGORY_DESK_API_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Screen shown when the TUI starts
    #[arg(long, value_enum, default_value_t = StartScreen::Form)]
    pub screen: StartScreen,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum StartScreen {
    /// Category entry form
    Form,
    /// Category table
    Table,
}

impl From<StartScreen> for Screen {
    fn from(start: StartScreen) -> Self {
        match start {
            StartScreen::Form => Screen::EntryForm,
            StartScreen::Table => Screen::CategoryTable,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List all categories
    List,

    /// Create a category
    Create {
        /// Unique identifier, at most 10 characters
        #[arg(long)]
        uid: String,

        #[arg(long)]
        retail_store_type: String,

        #[arg(long)]
        store_types: String,

        #[arg(long)]
        description: String,
    },

    /// Update fields of an existing category
    Update {
        /// Category to update
        uid: String,

        #[arg(long)]
        retail_store_type: Option<String>,

        #[arg(long)]
        store_types: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Upload an .xlsx or .xls spreadsheet for bulk import
    Upload {
        /// Spreadsheet to send
        path: PathBuf,
    },
}

const COLUMN_WIDTHS: [usize; 4] = [12, 24, 24, 40];

/// Pad or cut a cell to a display width
fn cell(value: &str, width: usize) -> String {
    let cut = truncate_to_width(value, width);
    let padding = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(padding))
}

fn format_row(values: [&str; 4]) -> String {
    values
        .iter()
        .zip(COLUMN_WIDTHS)
        .map(|(value, width)| cell(value, width))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

/// Run one headless command, writing its report to `out`
pub async fn run_command<W: Write>(
    command: Commands,
    api: &dyn CategoryApi,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::List => {
            let categories = api
                .list_categories()
                .await
                .context("An error occurred while loading categories.")?;

            if categories.is_empty() {
                writeln!(out, "No categories found")?;
                return Ok(());
            }

            writeln!(
                out,
                "{}",
                format_row(["UID", "Retail Store Type", "Store Types", "Description"])
            )?;
            writeln!(out, "{}", "-".repeat(COLUMN_WIDTHS.iter().sum::<usize>() + 3))?;
            for category in &categories {
                writeln!(
                    out,
                    "{}",
                    format_row([
                        &category.uid,
                        &category.retail_store_type,
                        &category.store_types,
                        &category.description,
                    ])
                )?;
            }
            writeln!(out)?;
            writeln!(out, "Total: {} categories", categories.len())?;
        }

        Commands::Create {
            uid,
            retail_store_type,
            store_types,
            description,
        } => {
            let category = Category::new(&uid, &retail_store_type, &store_types, &description);
            if let Err(errors) = category.validate() {
                let messages: Vec<String> = errors
                    .into_iter()
                    .map(|(field, message)| format!("{}: {}", field.as_str(), message))
                    .collect();
                bail!("Invalid category:\n  {}", messages.join("\n  "));
            }

            info!("Creating category {}", category.uid);
            match api.create_category(&category).await {
                Ok(()) => writeln!(out, "Category submitted successfully!")?,
                Err(e) if e.is_rejection() => bail!("Unable to submit the category."),
                Err(e) => {
                    return Err(e).context("An error occurred while submitting the category.")
                }
            }
        }

        Commands::Update {
            uid,
            retail_store_type,
            store_types,
            description,
        } => {
            let mut changes = CategoryChanges::new();
            for (field, value) in [
                (CategoryField::RetailStoreType, retail_store_type),
                (CategoryField::StoreTypes, store_types),
                (CategoryField::Description, description),
            ] {
                if let Some(value) = value {
                    changes.set(field, value);
                }
            }
            if changes.is_empty() {
                bail!("Nothing to update: pass --retail-store-type, --store-types or --description");
            }

            info!("Updating category {} ({} field(s))", uid, changes.len());
            match api.update_category(&uid, &changes).await {
                Ok(()) => writeln!(out, "Category updated successfully!")?,
                Err(e) if e.is_rejection() => bail!("Unable to update the category."),
                Err(e) => return Err(e).context("An error occurred while updating the category."),
            }
        }

        Commands::Upload { path } => {
            let file = read_upload_file(&path)
                .await
                .with_context(|| format!("Cannot read {}", path.display()))?;

            info!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());
            match api.upload_spreadsheet(file).await {
                Ok(()) => writeln!(out, "Excel file uploaded successfully!")?,
                Err(e) if e.is_rejection() => bail!("The server rejected the file."),
                Err(e) => return Err(e).context("An error occurred while uploading the file."),
            }
        }
    }

    Ok(())
}

/// Run one headless command, reporting a failure on `err`.
///
/// Returns whether the command succeeded so the caller can choose an exit
/// status without skipping destructors.
pub async fn run_and_report<W: Write, E: Write>(
    command: Commands,
    api: &dyn CategoryApi,
    out: &mut W,
    err: &mut E,
) -> bool {
    match run_command(command, api, out).await {
        Ok(()) => true,
        Err(e) => {
            error!("Command failed: {:#}", e);
            let _ = writeln!(err, "Error: {:#}", e);
            false
        }
    }
}
