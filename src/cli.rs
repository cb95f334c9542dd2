use clap::{Args, Parser, Subcommand};

use crate::listing::{DEFAULT_PER_PAGE, DateSort, StatusFilter};
use crate::records::Category;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Decode(DecodeArgs),
    Encode(EncodeArgs),
    Preview(PreviewArgs),
    List(ListArgs),
    Show(ShowArgs),
    Save(SaveArgs),
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ApiArgs {
    /// Backend base URL (default: $NEWSDESK_API_URL, then the hosted backend).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// JSON content field (envelope or string); `-` reads stdin.
    #[arg(long, default_value = "-")]
    pub input: String,
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// HTML file; `-` reads stdin.
    #[arg(long, default_value = "-")]
    pub input: String,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// JSON list body as returned by a list endpoint; `-` reads stdin.
    #[arg(long, default_value = "-")]
    pub input: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Category to list. Repeat to merge several into one feed.
    #[arg(long = "category", value_enum, required_unless_present = "all")]
    pub categories: Vec<Category>,

    /// Combined feed: development, nature and person.
    #[arg(long, conflicts_with = "categories")]
    pub all: bool,

    /// Case-insensitive title filter.
    #[arg(long, default_value = "")]
    pub query: String,

    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    #[arg(long, value_enum, default_value_t = DateSort::Newest)]
    pub sort: DateSort,

    /// Earliest `created_at` day to include (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<chrono::NaiveDate>,

    /// Latest `created_at` day to include (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<chrono::NaiveDate>,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: usize,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[arg(long, value_enum)]
    pub category: Category,

    #[arg(long)]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[arg(long, value_enum)]
    pub category: Category,

    /// Existing record id; omit to create a new record.
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub title: String,

    /// Editor HTML file; `-` reads stdin.
    #[arg(long)]
    pub html: String,

    /// Override `created_at` (YYYY-MM-DD); only sent when editing.
    #[arg(long)]
    pub created_at: Option<chrono::NaiveDate>,

    /// Save with status=false.
    #[arg(long)]
    pub inactive: bool,

    /// Pin the record (position=true).
    #[arg(long)]
    pub position: bool,

    /// Save with is_research=false.
    #[arg(long)]
    pub not_research: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[arg(long, value_enum)]
    pub category: Category,

    #[arg(long)]
    pub id: String,
}
