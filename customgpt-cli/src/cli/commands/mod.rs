//! Command handlers
//!
//! Every handler sends its operations through the shared [`Executor`], so all
//! commands get the same rate-limit handling.

pub mod conversations;
pub mod pages;
pub mod plugins;
pub mod projects;
pub mod reports;
pub mod settings;
pub mod sources;
pub mod users;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::output::{OutputFormat, Table, json_value_to_string, to_json};
use super::{AppContext, Commands};
use crate::api::{Operation, ProjectSource};
use crate::services::pagination::{decode_page, fetch_all_pages};

/// Commands that only need a project id
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(long)]
    pub project_id: u64,
}

/// Paging options shared by list commands
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page to list
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Fetch every page instead of a single one
    #[arg(long)]
    pub all_pages: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Content a project or source is built from; exactly one is required
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Sitemap URL to crawl
    #[arg(long, value_name = "URL")]
    pub sitemap: Option<String>,
    /// Document to upload
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl SourceArgs {
    pub fn load(&self) -> Result<ProjectSource> {
        if let Some(sitemap) = &self.sitemap {
            return Ok(ProjectSource::Sitemap(sitemap.clone()));
        }
        let Some(path) = &self.file else {
            anyhow::bail!("Either --sitemap or --file must be provided");
        };
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(ProjectSource::File { file_name, bytes })
    }
}

/// Run the parsed command
pub async fn dispatch(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::CreateProject(args) => projects::handler::create_project(ctx, args).await,
        Commands::ListProjects(args) => projects::handler::list_projects(ctx, args).await,
        Commands::GetProject(args) => {
            print_data(ctx, Operation::GetProject {
                project_id: args.project_id,
            })
            .await
        }
        Commands::ProjectStats(args) => {
            print_data(ctx, Operation::project_stats(args.project_id)).await
        }
        Commands::UpdateProject(args) => projects::handler::update_project(ctx, args).await,
        Commands::DeleteProjects(args) => projects::handler::delete_projects(ctx, args).await,

        Commands::ListConversations(args) => conversations::list_conversations(ctx, args).await,
        Commands::CreateConversation(args) => conversations::create_conversation(ctx, args).await,
        Commands::UpdateConversation(args) => conversations::update_conversation(ctx, args).await,
        Commands::DeleteConversation(args) => conversations::delete_conversation(ctx, args).await,
        Commands::SendMessage(args) => conversations::send_message(ctx, args).await,
        Commands::ListMessages(args) => conversations::list_messages(ctx, args).await,
        Commands::GetCitation(args) => conversations::get_citation(ctx, args).await,

        Commands::GetPages(args) => pages::get_pages(ctx, args).await,
        Commands::DeletePage(args) => pages::delete_page(ctx, args).await,
        Commands::ReindexPage(args) => pages::reindex_page(ctx, args).await,
        Commands::GetPageMetadata(args) => pages::get_page_metadata(ctx, args).await,
        Commands::UpdatePageMetadata(args) => pages::update_page_metadata(ctx, args).await,

        Commands::ListSources(args) => sources::list_sources(ctx, args).await,
        Commands::AddSource(args) => sources::add_source(ctx, args).await,
        Commands::DeleteSource(args) => sources::delete_source(ctx, args).await,

        Commands::GetSettings(args) => settings::get_settings(ctx, args).await,
        Commands::UpdateSettings(args) => settings::update_settings(ctx, args).await,

        Commands::GetPlugin(args) => plugins::get_plugin(ctx, args).await,
        Commands::CreatePlugin(args) => plugins::create_plugin(ctx, args).await,
        Commands::UpdatePlugin(args) => plugins::update_plugin(ctx, args).await,

        Commands::Report(args) => reports::report(ctx, args).await,

        Commands::GetUser => users::get_user(ctx).await,
        Commands::UpdateUser(args) => users::update_user(ctx, args).await,
    }
}

/// Execute one operation and return its `data` payload.
/// Error statuses come back as errors carrying the server's message.
pub async fn fetch_data(ctx: &AppContext, operation: &Operation) -> Result<Value> {
    let response = ctx
        .executor
        .try_execute(operation)
        .await
        .with_context(|| format!("{} failed", operation.name()))?;
    let data = response
        .data()
        .with_context(|| format!("{} failed", operation.name()))?;
    Ok(data)
}

/// Execute one operation and print its `data` payload as pretty JSON
pub async fn print_data(ctx: &AppContext, operation: Operation) -> Result<()> {
    let data = fetch_data(ctx, &operation).await?;
    println!("{}", to_json(&data)?);
    Ok(())
}

/// List a paginated collection: one page, or every page with `--all-pages`
pub async fn list_collection<F>(
    ctx: &AppContext,
    label: &str,
    container: Option<&str>,
    paging: &PageArgs,
    make_operation: F,
) -> Result<()>
where
    F: Fn(u32) -> Operation,
{
    let items: Vec<Value> = if paging.all_pages {
        fetch_all_pages(&ctx.executor, label, container, make_operation).await
    } else {
        fetch_single_page(ctx, label, container, &make_operation(paging.page)).await?
    };

    print_items(&items, paging.format, label)
}

/// Items of one page. Unlike the all-pages walk, a page without a `data`
/// sequence is an error here.
pub async fn fetch_single_page<T: DeserializeOwned>(
    ctx: &AppContext,
    label: &str,
    container: Option<&str>,
    operation: &Operation,
) -> Result<Vec<T>> {
    let response = ctx
        .executor
        .try_execute(operation)
        .await
        .with_context(|| format!("{} failed", operation.name()))?;
    let page = decode_page::<T>(&response, container)
        .with_context(|| format!("{} failed", operation.name()))?;
    if let (Some(current), Some(last)) = (page.current_page, page.last_page) {
        info!("{} page {} of {}", label, current, last);
    }
    page.data
        .with_context(|| format!("{} failed: page has no {} list", operation.name(), label))
}

/// Print JSON items in the requested format
pub fn print_items(items: &[Value], format: OutputFormat, label: &str) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(items)?),
        OutputFormat::IdOnly => {
            for item in items {
                let id = item.get("id").or_else(|| item.get("session_id"));
                println!("{}", id.map(json_value_to_string).unwrap_or_default());
            }
        }
        OutputFormat::Table if items.is_empty() => println!("No {} found", label),
        OutputFormat::Table => println!("{}", Table::from_json_rows(items).render()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Executor, ResilienceConfig};
    use crate::testing::{MockTransport, RecordingSleeper, json_response};
    use serde_json::json;
    use std::io::Write;
    use std::sync::Arc;

    fn context(transport: Arc<MockTransport>) -> AppContext {
        AppContext::new(Executor::with_sleeper(
            transport,
            Arc::new(RecordingSleeper::default()),
            ResilienceConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_fetch_data_returns_payload() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            Ok(json_response(200, json!({ "status": "success", "data": { "id": 7 } })))
        }));
        let ctx = context(transport.clone());

        let data = fetch_data(&ctx, &Operation::GetProject { project_id: 7 })
            .await
            .unwrap();
        assert_eq!(data["id"], 7);
        assert_eq!(transport.calls_to("projects/7"), 1);
    }

    #[tokio::test]
    async fn test_fetch_data_reports_server_message() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            Ok(json_response(
                404,
                json!({ "status": "error", "data": { "message": "Project not found" } }),
            ))
        }));
        let ctx = context(transport);

        let err = fetch_data(&ctx, &Operation::GetProject { project_id: 1 })
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("get_project failed"));
        assert!(message.contains("Project not found"));
    }

    #[tokio::test]
    async fn test_single_page_without_data_is_an_error() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            Ok(json_response(200, json!({ "status": "success", "data": { "current_page": 1 } })))
        }));
        let ctx = context(transport);

        let err = fetch_single_page::<Value>(&ctx, "projects", None, &Operation::list_projects(1))
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("list_projects failed"));
        assert!(message.contains("no projects list"));
    }

    #[tokio::test]
    async fn test_single_page_items() {
        let transport = Arc::new(MockTransport::new(|_, _| {
            Ok(json_response(
                200,
                json!({ "data": { "current_page": 2, "last_page": 3, "data": [{ "id": 4 }] } }),
            ))
        }));
        let ctx = context(transport.clone());

        let items = fetch_single_page::<Value>(&ctx, "projects", None, &Operation::list_projects(2))
            .await
            .unwrap();
        assert_eq!(items, vec![json!({ "id": 4 })]);
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_sitemap_source() {
        let args = SourceArgs {
            sitemap: Some("https://example.com/sitemap.xml".to_string()),
            file: None,
        };
        assert_eq!(
            args.load().unwrap(),
            ProjectSource::Sitemap("https://example.com/sitemap.xml".to_string())
        );
    }

    #[test]
    fn test_file_source_uses_base_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let args = SourceArgs {
            sitemap: None,
            file: Some(file.path().to_path_buf()),
        };

        let ProjectSource::File { file_name, bytes } = args.load().unwrap() else {
            panic!("expected a file source");
        };
        assert_eq!(bytes, b"hello");
        assert!(!file_name.contains('/'));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let args = SourceArgs {
            sitemap: None,
            file: Some(PathBuf::from("/definitely/not/here.pdf")),
        };
        assert!(args.load().is_err());
    }
}
