//! Project catalogue: fetching every project and filtering the set
//!
//! Filters run cheapest first: name, then inactivity, then stat windows. Stats
//! are fetched at most once per project that survives the earlier filters.

pub mod datetime;
pub mod filter;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

pub use datetime::parse_datetime;
pub use filter::{ProjectFilter, StatBound, StatField, StatWindow, fold_windows};

use super::pagination::fetch_all_pages;
use crate::api::{Executor, Operation, Project, ProjectStats};

/// A project together with the stats it was filtered on
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithStats {
    #[serde(flatten)]
    pub project: Project,
    pub stats: Option<ProjectStats>,
}

pub struct ProjectCatalog<'a> {
    executor: &'a Executor,
}

impl<'a> ProjectCatalog<'a> {
    pub fn new(executor: &'a Executor) -> Self {
        Self { executor }
    }

    /// Every project across all pages (partial on failure)
    pub async fn fetch_all(&self) -> Vec<Project> {
        let projects: Vec<Project> =
            fetch_all_pages(self.executor, "projects", None, Operation::list_projects).await;
        info!("Fetched {} projects", projects.len());
        projects
    }

    /// Stats of one project; `None` (with a warning) when unavailable
    pub async fn get_stats(&self, project_id: u64) -> Option<ProjectStats> {
        let response = self
            .executor
            .execute(&Operation::project_stats(project_id))
            .await?;
        match response.data::<ProjectStats>() {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!("Could not read stats for project {}: {}", project_id, err);
                None
            }
        }
    }

    /// Apply `filter`, dropping the stats used for the decision
    pub async fn filter(&self, projects: Vec<Project>, filter: &ProjectFilter) -> Vec<Project> {
        self.filter_with_stats(projects, filter)
            .await
            .into_iter()
            .map(|item| item.project)
            .collect()
    }

    pub async fn filter_with_stats(
        &self,
        projects: Vec<Project>,
        filter: &ProjectFilter,
    ) -> Vec<ProjectWithStats> {
        self.filter_at(projects, filter, Utc::now()).await
    }

    /// Same as [`Self::filter_with_stats`] with an explicit "now" for the inactivity cutoff
    pub async fn filter_at(
        &self,
        projects: Vec<Project>,
        filter: &ProjectFilter,
        now: DateTime<Utc>,
    ) -> Vec<ProjectWithStats> {
        let total = projects.len();
        let windows = fold_windows(&filter.stat_bounds);
        let mut kept = Vec::new();

        for project in projects {
            if !filter.matches_name(&project) || !filter.matches_inactivity(&project, now) {
                continue;
            }

            if windows.is_empty() {
                kept.push(project.into());
                continue;
            }

            let Some(stats) = self.get_stats(project.id).await else {
                debug!("Excluding project {} without stats", project.id);
                continue;
            };

            // absent counters read as zero
            let in_windows = windows
                .iter()
                .all(|(field, window)| window.contains(field.value(&stats).unwrap_or(0.0)));
            if in_windows {
                kept.push(ProjectWithStats {
                    project,
                    stats: Some(stats),
                });
            }
        }

        info!("{} of {} projects matched the filters", kept.len(), total);
        kept
    }

    /// Fetch stats for every item that has none yet
    pub async fn attach_stats(&self, items: &mut [ProjectWithStats]) {
        for item in items.iter_mut().filter(|item| item.stats.is_none()) {
            item.stats = self.get_stats(item.project.id).await;
        }
    }
}

impl From<Project> for ProjectWithStats {
    fn from(project: Project) -> Self {
        Self {
            project,
            stats: None,
        }
    }
}
