//! Project commands

pub mod handler;

use anyhow::{Context, Result};
use clap::Args;

use super::SourceArgs;
use crate::cli::output::OutputFormat;
use crate::services::projects::{ProjectFilter, StatBound, StatField};

#[derive(Args, Debug)]
pub struct CreateProjectArgs {
    /// Project name
    #[arg(long)]
    pub name: String,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct ListProjectsArgs {
    /// Page to list when no filter is given
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Fetch every page
    #[arg(long)]
    pub all_pages: bool,

    /// Case-insensitive regex matched against the project name
    #[arg(long, value_name = "REGEX")]
    pub name_filter: Option<String>,

    /// Only projects not updated within this many days
    #[arg(long, value_name = "DAYS")]
    pub inactive_days: Option<u32>,

    #[command(flatten)]
    pub stats: StatBoundArgs,

    /// Extra stat bound such as `min_pages_found=10` (repeatable)
    #[arg(long = "stat", value_name = "BOUND")]
    pub extra_bounds: Vec<StatBound>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Inclusive bounds on project stats
#[derive(Args, Debug, Clone, Default)]
pub struct StatBoundArgs {
    #[arg(long, value_name = "N")]
    pub min_queries: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_queries: Option<f64>,
    #[arg(long, value_name = "N")]
    pub min_pages_found: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_pages_found: Option<f64>,
    #[arg(long, value_name = "N")]
    pub min_pages_crawled: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_pages_crawled: Option<f64>,
    #[arg(long, value_name = "N")]
    pub min_pages_indexed: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_pages_indexed: Option<f64>,
    #[arg(long, value_name = "N")]
    pub min_words_indexed: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_words_indexed: Option<f64>,
    #[arg(long, value_name = "N")]
    pub min_storage_credits: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_storage_credits: Option<f64>,
    #[arg(long, value_name = "N")]
    pub min_crawl_credits: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_crawl_credits: Option<f64>,
    #[arg(long, value_name = "N")]
    pub min_query_credits: Option<f64>,
    #[arg(long, value_name = "N")]
    pub max_query_credits: Option<f64>,
}

impl StatBoundArgs {
    pub fn bounds(&self) -> Vec<StatBound> {
        let fields = [
            (StatField::Queries, self.min_queries, self.max_queries),
            (StatField::PagesFound, self.min_pages_found, self.max_pages_found),
            (StatField::PagesCrawled, self.min_pages_crawled, self.max_pages_crawled),
            (StatField::PagesIndexed, self.min_pages_indexed, self.max_pages_indexed),
            (StatField::WordsIndexed, self.min_words_indexed, self.max_words_indexed),
            (StatField::StorageCredits, self.min_storage_credits, self.max_storage_credits),
            (StatField::CrawlCredits, self.min_crawl_credits, self.max_crawl_credits),
            (StatField::QueryCredits, self.min_query_credits, self.max_query_credits),
        ];
        fields
            .into_iter()
            .flat_map(|(field, min, max)| {
                min.map(|v| StatBound::min(field, v))
                    .into_iter()
                    .chain(max.map(|v| StatBound::max(field, v)))
            })
            .collect()
    }
}

impl ListProjectsArgs {
    /// Build the project filter from the flags
    pub fn filter(&self) -> Result<ProjectFilter> {
        let mut filter = ProjectFilter::new();
        if let Some(pattern) = &self.name_filter {
            filter = filter
                .with_name_pattern(pattern)
                .with_context(|| format!("Invalid --name-filter pattern: {}", pattern))?;
        }
        if let Some(days) = self.inactive_days {
            filter = filter.with_inactive_days(days);
        }
        for bound in self.stats.bounds().into_iter().chain(self.extra_bounds.iter().copied()) {
            filter = filter.with_bound(bound);
        }
        Ok(filter)
    }
}

#[derive(Args, Debug)]
pub struct UpdateProjectArgs {
    #[arg(long)]
    pub project_id: u64,
    /// New project name
    #[arg(long)]
    pub name: Option<String>,
    /// Share (1) or unshare (0) the project
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub is_shared: Option<u8>,
}

#[derive(Args, Debug)]
pub struct DeleteProjectsArgs {
    /// Comma-separated project ids
    #[arg(long, value_delimiter = ',', required = true)]
    pub project_ids: Vec<u64>,
    /// Only show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}
