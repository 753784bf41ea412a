//! Project plugin commands

use anyhow::Result;
use clap::Args;

use super::{ProjectArgs, print_data};
use crate::api::{Operation, PluginPayload};
use crate::cli::AppContext;

#[derive(Args, Debug)]
pub struct PluginArgs {
    #[arg(long)]
    pub project_id: u64,
    /// Machine name of the plugin
    #[arg(long)]
    pub model_name: String,
    /// Display name of the plugin
    #[arg(long)]
    pub human_name: String,
    #[arg(long)]
    pub keywords: String,
    #[arg(long)]
    pub description: String,
    /// Register the plugin disabled
    #[arg(long)]
    pub inactive: bool,
}

impl PluginArgs {
    fn payload(self) -> (u64, PluginPayload) {
        (
            self.project_id,
            PluginPayload {
                model_name: self.model_name,
                human_name: self.human_name,
                keywords: self.keywords,
                description: self.description,
                is_active: !self.inactive,
            },
        )
    }
}

pub async fn get_plugin(ctx: &AppContext, args: ProjectArgs) -> Result<()> {
    print_data(ctx, Operation::GetPlugin {
        project_id: args.project_id,
    })
    .await
}

pub async fn create_plugin(ctx: &AppContext, args: PluginArgs) -> Result<()> {
    let (project_id, plugin) = args.payload();
    print_data(ctx, Operation::CreatePlugin { project_id, plugin }).await
}

pub async fn update_plugin(ctx: &AppContext, args: PluginArgs) -> Result<()> {
    let (project_id, plugin) = args.payload();
    print_data(ctx, Operation::UpdatePlugin { project_id, plugin }).await
}
