//! Rendering of command results to stdout.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use handsoft_core::error::AppError;

/// How listings are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bordered table
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
}

impl OutputFormat {
    /// Render `rows` as a single string.
    pub fn render<T: Serialize + Tabled>(self, rows: &[T]) -> Result<String, AppError> {
        Ok(match self {
            Self::Table if rows.is_empty() => "(none)".to_string(),
            Self::Table => Table::new(rows).with(Style::sharp()).to_string(),
            Self::Json => serde_json::to_string_pretty(rows)?,
        })
    }

    pub fn print<T: Serialize + Tabled>(self, rows: &[T]) -> Result<(), AppError> {
        println!("{}", self.render(rows)?);
        Ok(())
    }
}

/// One-line status message.
#[derive(Debug, Clone, Copy)]
pub enum Notice {
    Done,
    Warn,
    Error,
}

impl Notice {
    pub fn emit(self, message: &str) {
        match self {
            Self::Done => println!("ok: {message}"),
            Self::Warn => println!("warning: {message}"),
            Self::Error => eprintln!("error: {message}"),
        }
    }
}

/// Aligned `key: value` lines, used for summaries.
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    for (key, value) in fields {
        println!("  {:<width$} {value}", format!("{key}:"));
    }
}
