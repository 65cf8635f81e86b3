use clap::{Parser, ValueEnum};
use filectl_core::select::{Limit, Selection, SelectionError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Show or delete files stored on an OpenAI-compatible files API", long_about = None)]
pub struct Args {
    /// Action to perform on the selected files
    #[arg(value_enum)]
    pub action: Action,
    /// ID(s) of the file(s) to perform the action on
    #[arg(long, num_args = 0..)]
    pub ids: Option<Vec<String>>,
    /// Perform the action on all files
    #[arg(long)]
    pub all: bool,
    /// Regular expression searched for in file names
    #[arg(long)]
    pub pattern: Option<String>,
    /// Act on at most this many files; zero or negative means no limit
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub limit: i64,
    /// Print `show` output as a table
    #[arg(long)]
    pub table: bool,
    /// API key sent as bearer token
    #[arg(env = "OPENAI_API_KEY", long, hide_env_values = true)]
    pub api_key: String,
    /// Base URL of the files API
    #[arg(env = "OPENAI_BASE_URL", long, default_value = "https://api.openai.com/v1")]
    pub base_url: String,
    /// Number of files requested per page when listing
    #[arg(env = "FILECTL_PAGE_SIZE", long, default_value_t = 10000)]
    pub page_size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Print metadata of the selected files
    Show,
    /// Delete the selected files
    Delete,
}

/// What to do, validated before anything talks to the API.
#[derive(Debug)]
pub struct Plan {
    pub action: Action,
    pub selection: Selection,
    pub limit: Limit,
    pub table: bool,
}

impl Args {
    pub fn plan(&self) -> Result<Plan, SelectionError> {
        let selection =
            Selection::from_flags(self.ids.as_deref(), self.all, self.pattern.as_deref())?;
        Ok(Plan {
            action: self.action,
            selection,
            limit: Limit::from(self.limit),
            table: self.table,
        })
    }
}
