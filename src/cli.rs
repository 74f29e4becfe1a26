use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recipe-box",
    about = "Keep recipes, track which ingredients you have, and edit steps",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Store recipes in this directory instead of the configured one
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all recipes
    List,
    /// Show one recipe with its ingredients and steps
    Show(ShowArgs),
    /// Create a new recipe
    Add(AddArgs),
    /// Toggle whether an ingredient is available
    Toggle(ToggleArgs),
    /// Replace the preparation steps of a recipe, or print them for editing
    EditSteps(EditStepsArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: i64,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: String,
    /// Comma-separated, e.g. "flour, sugar, eggs"
    #[arg(short, long)]
    pub ingredients: String,
    /// One step per line
    #[arg(short, long)]
    pub steps: String,
    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct ToggleArgs {
    pub id: i64,
    /// Zero-based ingredient position as shown by `show`
    pub index: usize,
}

#[derive(Args)]
pub struct EditStepsArgs {
    pub id: i64,
    /// One step per line; omit to print the current steps for editing
    #[arg(short, long)]
    pub steps: Option<String>,
}
