//! Command-line interface: argument model and dispatch

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::Executor;
use commands::{
    ProjectArgs, conversations, pages, plugins, projects, reports, settings, sources,
    users,
};

#[derive(Parser, Debug)]
#[command(
    name = "customgpt-cli",
    version,
    about = "Command-line client for the CustomGPT API"
)]
pub struct Cli {
    /// API key (otherwise read from CUSTOMGPT_API_KEY or the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the API
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Retries after a rate-limited (429) response
    #[arg(long, global = true, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // Projects
    /// Create a project from a sitemap or an uploaded file
    CreateProject(projects::CreateProjectArgs),
    /// List projects, optionally filtered by name, activity and stats
    ListProjects(projects::ListProjectsArgs),
    /// Show one project
    GetProject(ProjectArgs),
    /// Show the stats of one project
    ProjectStats(ProjectArgs),
    /// Rename or (un)share a project
    UpdateProject(projects::UpdateProjectArgs),
    /// Delete projects by id
    DeleteProjects(projects::DeleteProjectsArgs),

    // Conversations and messages
    /// List the conversations of a project
    ListConversations(conversations::ListConversationsArgs),
    /// Start a conversation
    CreateConversation(conversations::CreateConversationArgs),
    /// Rename a conversation
    UpdateConversation(conversations::UpdateConversationArgs),
    /// Delete a conversation
    DeleteConversation(conversations::SessionArgs),
    /// Send a prompt to a conversation
    SendMessage(conversations::SendMessageArgs),
    /// List the messages of a conversation
    ListMessages(conversations::ListMessagesArgs),
    /// Show a citation
    GetCitation(conversations::GetCitationArgs),

    // Pages
    /// List the pages of a project
    GetPages(pages::GetPagesArgs),
    /// Delete a page
    DeletePage(pages::PageIdArgs),
    /// Queue a page for reindexing
    ReindexPage(pages::PageIdArgs),
    /// Show the metadata of a page
    GetPageMetadata(pages::PageIdArgs),
    /// Update the metadata of a page
    UpdatePageMetadata(pages::UpdatePageMetadataArgs),

    // Sources
    /// List the sources of a project
    ListSources(ProjectArgs),
    /// Add a sitemap or file source to a project
    AddSource(sources::AddSourceArgs),
    /// Delete a source
    DeleteSource(sources::DeleteSourceArgs),

    // Settings
    /// Show project settings
    GetSettings(ProjectArgs),
    /// Update project settings
    UpdateSettings(settings::UpdateSettingsArgs),

    // Plugins
    /// Show the plugin of a project
    GetPlugin(ProjectArgs),
    /// Create the plugin of a project
    CreatePlugin(plugins::PluginArgs),
    /// Update the plugin of a project
    UpdatePlugin(plugins::PluginArgs),

    // Reports
    /// Fetch a project report
    Report(reports::ReportArgs),

    // Users
    /// Show the current user
    GetUser,
    /// Update the current user
    UpdateUser(users::UpdateUserArgs),
}

/// Shared state handed to every command handler
pub struct AppContext {
    pub executor: Executor,
}

impl AppContext {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "customgpt-cli",
            "get-project",
            "--project-id",
            "7",
            "--max-retries",
            "5",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.max_retries, Some(5));
        assert!(cli.no_color);
        assert!(matches!(cli.command, Commands::GetProject(ref args) if args.project_id == 7));
    }

    #[test]
    fn test_list_projects_bounds() {
        let cli = Cli::try_parse_from([
            "customgpt-cli",
            "list-projects",
            "--min-pages-found",
            "10",
            "--max-pages-found",
            "20",
            "--stat",
            "min_queries=3",
            "--format",
            "id-only",
        ])
        .unwrap();
        let Commands::ListProjects(args) = cli.command else {
            panic!("expected list-projects");
        };
        let filter = args.filter().unwrap();
        assert_eq!(filter.stat_bounds.len(), 3);
        assert_eq!(args.format, output::OutputFormat::IdOnly);
    }

    #[test]
    fn test_project_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["customgpt-cli", "create-project", "--name", "x"]).is_err());
        assert!(
            Cli::try_parse_from([
                "customgpt-cli",
                "create-project",
                "--name",
                "x",
                "--sitemap",
                "https://example.com/sitemap.xml",
                "--file",
                "doc.pdf",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_delete_projects_splits_ids() {
        let cli = Cli::try_parse_from([
            "customgpt-cli",
            "delete-projects",
            "--project-ids",
            "1,2,3",
            "--dry-run",
        ])
        .unwrap();
        let Commands::DeleteProjects(args) = cli.command else {
            panic!("expected delete-projects");
        };
        assert_eq!(args.project_ids, vec![1, 2, 3]);
        assert!(args.dry_run);
    }
}
