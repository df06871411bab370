//! Command line interface

use clap::{Args, Parser, Subcommand};
use shared::{Availability, Query, SortDirection, SortField};

#[derive(Debug, Parser)]
#[command(name = "stockroom-console", version, about = "Terminal front end for the inventory backend")]
pub struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "STOCKROOM_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// Print one page of products and the metrics, then exit
    List(ListArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Name substring
    #[arg(long, default_value = "")]
    pub name: String,

    /// Category filter; repeat for several
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// in_stock or out_of_stock
    #[arg(long, default_value = "")]
    pub availability: Availability,

    /// FIELD or FIELD:desc, primary first; at most two
    #[arg(long = "sort", value_parser = parse_sort_key)]
    pub sort: Vec<(SortField, SortDirection)>,

    /// Zero-based page index, clamped to the last page
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Products per page
    #[arg(long)]
    pub size: Option<u32>,
}

impl ListArgs {
    /// Query for page 0; the page index is applied once the total is known
    pub fn query(&self, default_page_size: u32) -> anyhow::Result<Query> {
        anyhow::ensure!(self.sort.len() <= 2, "at most two --sort keys are allowed");
        if let [(first, _), (second, _)] = self.sort.as_slice() {
            anyhow::ensure!(first != second, "--sort {first} given twice");
        }

        let mut query = Query::new(self.size.unwrap_or(default_page_size));
        query.set_filters(&self.name, self.categories.iter().cloned(), self.availability);

        // each newly toggled field becomes primary, so apply lowest priority first
        for (field, direction) in self.sort.iter().rev() {
            query.toggle_sort(*field);
            if *direction == SortDirection::Desc {
                query.toggle_sort(*field);
            }
        }
        Ok(query)
    }
}

fn parse_sort_key(raw: &str) -> Result<(SortField, SortDirection), String> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, direction)) => (field, direction),
        None => (raw, "asc"),
    };
    let field = field.parse::<SortField>().map_err(|e| e.to_string())?;
    let direction = direction.parse::<SortDirection>().map_err(|e| e.to_string())?;
    Ok((field, direction))
}
