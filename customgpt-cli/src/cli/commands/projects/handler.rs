//! Project command handlers

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;
use log::{debug, warn};

use super::{CreateProjectArgs, DeleteProjectsArgs, ListProjectsArgs, UpdateProjectArgs};
use crate::api::{Deletion, Operation, Project};
use crate::cli::AppContext;
use crate::cli::commands::{fetch_single_page, print_data};
use crate::cli::output::{OutputFormat, Table, opt_cell, stat_cell, to_json};
use crate::services::projects::{ProjectCatalog, ProjectWithStats, StatField};

/// Stat columns of the project table, in display order
const STAT_COLUMNS: [(StatField, &str); 8] = [
    (StatField::PagesFound, "Pages Found"),
    (StatField::PagesCrawled, "Pages Crawled"),
    (StatField::PagesIndexed, "Pages Indexed"),
    (StatField::WordsIndexed, "Words Indexed"),
    (StatField::StorageCredits, "Storage Credits"),
    (StatField::CrawlCredits, "Crawl Credits"),
    (StatField::QueryCredits, "Query Credits"),
    (StatField::Queries, "Total Queries"),
];

pub async fn create_project(ctx: &AppContext, args: CreateProjectArgs) -> Result<()> {
    let source = args.source.load()?;
    print_data(ctx, Operation::CreateProject {
        project_name: args.name,
        source,
    })
    .await
}

pub async fn update_project(ctx: &AppContext, args: UpdateProjectArgs) -> Result<()> {
    if args.name.is_none() && args.is_shared.is_none() {
        anyhow::bail!("Nothing to update: pass --name and/or --is-shared");
    }
    print_data(ctx, Operation::UpdateProject {
        project_id: args.project_id,
        project_name: args.name,
        is_shared: args.is_shared.map(|flag| flag == 1),
    })
    .await
}

/// List projects. Without filters and `--all-pages` a single page is listed;
/// otherwise every project is fetched and filtered.
pub async fn list_projects(ctx: &AppContext, args: ListProjectsArgs) -> Result<()> {
    let filter = args.filter()?;
    let catalog = ProjectCatalog::new(&ctx.executor);

    let mut items: Vec<ProjectWithStats> = if filter.is_empty() && !args.all_pages {
        fetch_single_page::<Project>(ctx, "projects", None, &Operation::list_projects(args.page))
            .await?
            .into_iter()
            .map(ProjectWithStats::from)
            .collect()
    } else {
        let projects = catalog.fetch_all().await;
        if projects.is_empty() {
            println!("No projects found or unable to retrieve projects");
            return Ok(());
        }
        catalog.filter_with_stats(projects, &filter).await
    };

    match args.format {
        OutputFormat::IdOnly => {
            for item in &items {
                println!("{}", item.project.id);
            }
        }
        OutputFormat::Json => {
            catalog.attach_stats(&mut items).await;
            println!("{}", to_json(&items)?);
        }
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No projects matched the given filters");
                return Ok(());
            }
            catalog.attach_stats(&mut items).await;
            println!("{}", project_table(&items).render());
        }
    }
    Ok(())
}

/// Delete the given projects after showing them and asking for confirmation
pub async fn delete_projects(ctx: &AppContext, args: DeleteProjectsArgs) -> Result<()> {
    let catalog = ProjectCatalog::new(&ctx.executor);
    let all_projects = catalog.fetch_all().await;

    let targets: Vec<Project> = all_projects
        .into_iter()
        .filter(|p| args.project_ids.contains(&p.id))
        .collect();

    let missing: Vec<String> = args
        .project_ids
        .iter()
        .filter(|id| !targets.iter().any(|p| p.id == **id))
        .map(u64::to_string)
        .collect();
    if !missing.is_empty() {
        println!(
            "{} Could not find projects with IDs: {}",
            "Warning:".yellow().bold(),
            missing.join(", ")
        );
    }

    if targets.is_empty() {
        println!("No projects found matching the criteria");
        return Ok(());
    }

    println!("\nProjects that will be deleted:");
    let mut items: Vec<ProjectWithStats> = targets.iter().cloned().map(Into::into).collect();
    catalog.attach_stats(&mut items).await;
    println!("{}", project_table(&items).render());

    if args.dry_run {
        println!("\n{}", "Dry run: nothing was deleted".dimmed());
        return Ok(());
    }

    if !args.force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete {} projects?",
                targets.len()
            ))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Operation cancelled");
            return Ok(());
        }
    }

    let mut succeeded = 0;
    let mut failed = 0;
    for project in &targets {
        let deleted = delete_single_project(ctx, project).await;
        let status = if deleted {
            succeeded += 1;
            "success".green()
        } else {
            failed += 1;
            "failed".red()
        };
        println!(
            "Deleted project {}: {} -> Status: {}",
            project.id, project.project_name, status
        );
    }

    println!(
        "\nDeletion complete: {} succeeded, {} failed",
        succeeded.to_string().green(),
        failed.to_string().red()
    );
    Ok(())
}

/// True only when the server confirms `data.deleted`
async fn delete_single_project(ctx: &AppContext, project: &Project) -> bool {
    let Some(response) = ctx
        .executor
        .execute(&Operation::delete_project(project.id))
        .await
    else {
        return false;
    };

    debug!(
        "Delete response for project {}: {} {}",
        project.id,
        response.status_code(),
        response.text()
    );

    match response.data::<Deletion>() {
        Ok(deletion) if deletion.deleted => true,
        Ok(_) => {
            warn!("Failed to delete project {}: server did not confirm", project.id);
            false
        }
        Err(err) => {
            warn!("Failed to delete project {}: {}", project.id, err);
            false
        }
    }
}

fn project_table(items: &[ProjectWithStats]) -> Table {
    let headers = ["ID", "Name", "Created At", "Updated At", "Type"]
        .into_iter()
        .chain(STAT_COLUMNS.iter().map(|(_, header)| *header));
    let mut table = Table::new(headers);

    for item in items {
        let project = &item.project;
        let mut row = vec![
            project.id.to_string(),
            project.project_name.clone(),
            opt_cell(project.created_at.as_deref()),
            opt_cell(project.updated_at.as_deref()),
            opt_cell(project.project_type.as_deref()),
        ];
        row.extend(STAT_COLUMNS.iter().map(|(field, _)| {
            stat_cell(item.stats.as_ref().and_then(|stats| field.value(stats)))
        }));
        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Executor, ProjectStats, ResilienceConfig};
    use crate::testing::{MockTransport, RecordingSleeper, json_response, rate_limited};
    use serde_json::json;
    use std::sync::Arc;

    fn context(transport: Arc<MockTransport>) -> AppContext {
        AppContext::new(Executor::with_sleeper(
            transport,
            Arc::new(RecordingSleeper::default()),
            ResilienceConfig::default(),
        ))
    }

    fn project(id: u64) -> Project {
        serde_json::from_value(json!({ "id": id, "project_name": format!("p{}", id) })).unwrap()
    }

    #[tokio::test]
    async fn test_delete_requires_deleted_flag() {
        let transport = Arc::new(MockTransport::new(|request, _| {
            let body = match request.path.as_str() {
                "projects/1" => json!({ "status": "success", "data": { "deleted": true } }),
                "projects/2" => json!({ "status": "success", "data": { "deleted": false } }),
                _ => json!({ "status": "success" }),
            };
            Ok(json_response(200, body))
        }));
        let ctx = context(transport);

        assert!(delete_single_project(&ctx, &project(1)).await);
        assert!(!delete_single_project(&ctx, &project(2)).await);
        assert!(!delete_single_project(&ctx, &project(3)).await);
    }

    #[tokio::test]
    async fn test_delete_retries_rate_limit_then_succeeds() {
        let transport = Arc::new(MockTransport::new(|_, call| match call {
            0 => Ok(rate_limited(Some("2"))),
            _ => Ok(json_response(200, json!({ "data": { "deleted": true } }))),
        }));
        let ctx = context(transport.clone());

        assert!(delete_single_project(&ctx, &project(9)).await);
        assert_eq!(transport.calls_to("projects/9"), 2);
    }

    #[tokio::test]
    async fn test_delete_fails_after_exhausted_retries() {
        let transport = Arc::new(MockTransport::new(|_, _| Ok(rate_limited(Some("1")))));
        let ctx = context(transport.clone());

        assert!(!delete_single_project(&ctx, &project(4)).await);
        assert_eq!(transport.calls(), 4);
    }

    #[test]
    fn test_project_table_shows_na_for_missing_stats() {
        colored::control::set_override(false);
        let items = vec![
            ProjectWithStats {
                project: project(1),
                stats: Some(ProjectStats {
                    pages_found: Some(12.0),
                    ..ProjectStats::default()
                }),
            },
            project(2).into(),
        ];
        let rendered = project_table(&items).render();
        assert!(rendered.contains("Pages Found"));
        assert!(rendered.contains("| 12 "));
        assert!(rendered.contains("N/A"));
    }
}
