use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, OpenaiConfig};
use crate::summary::SummaryEngine;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the saved books and cached summaries.
    #[arg(long, global = true, default_value = ".bookscout")]
    pub data_dir: PathBuf,

    /// Catalog base URL (default: $BOOKSCOUT_CATALOG_URL or https://www.gutenberg.org).
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a book, save it to the recently viewed list and print it.
    Show(ShowArgs),
    /// Print every saved book.
    Viewed(ViewedArgs),
    /// Print a summary of the book's full text (cached after the first run).
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Catalog book id (e.g. 1342).
    #[arg(long)]
    pub id: String,

    /// Print the book record as JSON instead of the details table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ViewedArgs {
    /// Print the saved collection as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Catalog book id (e.g. 1342).
    #[arg(long)]
    pub id: String,

    /// Ignore a cached summary and generate a new one.
    #[arg(long, default_value_t = false)]
    pub refresh: bool,

    #[arg(long, value_enum, default_value_t = SummaryEngine::Openai)]
    pub engine: SummaryEngine,

    #[command(flatten)]
    pub openai: OpenaiArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OpenaiArgs {
    /// OpenAI model used when --engine=openai.
    #[arg(long, default_value = DEFAULT_OPENAI_MODEL)]
    pub openai_model: String,

    /// OpenAI API base URL (e.g. https://api.openai.com/v1).
    #[arg(long, default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Sampling temperature (ignored for GPT-5 models).
    #[arg(long, default_value_t = OpenaiConfig::default_temperature())]
    pub openai_temperature: f32,

    /// Upper bound on characters of book text sent to the model.
    #[arg(long, default_value_t = OpenaiConfig::default_max_chars())]
    pub openai_max_chars: usize,
}

impl OpenaiArgs {
    /// Pairs the flags with `OPENAI_API_KEY`; an unset key stays empty and is
    /// rejected when the openai engine is built.
    pub fn to_config(&self) -> OpenaiConfig {
        OpenaiConfig {
            api_key: OpenaiConfig::api_key_from_env().unwrap_or_default(),
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            temperature: self.openai_temperature,
            max_chars: self.openai_max_chars,
        }
    }
}
