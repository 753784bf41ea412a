//! Project source commands

use anyhow::Result;
use clap::Args;

use super::{ProjectArgs, SourceArgs, print_data};
use crate::api::Operation;
use crate::cli::AppContext;

#[derive(Args, Debug)]
pub struct AddSourceArgs {
    #[arg(long)]
    pub project_id: u64,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct DeleteSourceArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub source_id: u64,
}

pub async fn list_sources(ctx: &AppContext, args: ProjectArgs) -> Result<()> {
    print_data(ctx, Operation::ListSources {
        project_id: args.project_id,
    })
    .await
}

pub async fn add_source(ctx: &AppContext, args: AddSourceArgs) -> Result<()> {
    let source = args.source.load()?;
    print_data(ctx, Operation::CreateSource {
        project_id: args.project_id,
        source,
    })
    .await
}

pub async fn delete_source(ctx: &AppContext, args: DeleteSourceArgs) -> Result<()> {
    print_data(ctx, Operation::DeleteSource {
        project_id: args.project_id,
        source_id: args.source_id,
    })
    .await
}
