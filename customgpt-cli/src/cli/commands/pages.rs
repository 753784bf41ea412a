//! Project page commands

use anyhow::Result;
use clap::Args;

use super::{PageArgs, list_collection, print_data};
use crate::api::{Operation, PageMetadataUpdate};
use crate::cli::AppContext;

#[derive(Args, Debug)]
pub struct GetPagesArgs {
    #[arg(long)]
    pub project_id: u64,
    #[command(flatten)]
    pub paging: PageArgs,
}

/// Identifies one page of a project
#[derive(Args, Debug)]
pub struct PageIdArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub page_id: u64,
}

#[derive(Args, Debug)]
pub struct UpdatePageMetadataArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub page_id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
}

/// The pages endpoint nests its paginator under `pages`
pub async fn get_pages(ctx: &AppContext, args: GetPagesArgs) -> Result<()> {
    let project_id = args.project_id;
    list_collection(ctx, "pages", Some("pages"), &args.paging, |page| {
        Operation::ListPages { project_id, page }
    })
    .await
}

pub async fn delete_page(ctx: &AppContext, args: PageIdArgs) -> Result<()> {
    print_data(ctx, Operation::DeletePage {
        project_id: args.project_id,
        page_id: args.page_id,
    })
    .await
}

pub async fn reindex_page(ctx: &AppContext, args: PageIdArgs) -> Result<()> {
    print_data(ctx, Operation::ReindexPage {
        project_id: args.project_id,
        page_id: args.page_id,
    })
    .await
}

pub async fn get_page_metadata(ctx: &AppContext, args: PageIdArgs) -> Result<()> {
    print_data(ctx, Operation::GetPageMetadata {
        project_id: args.project_id,
        page_id: args.page_id,
    })
    .await
}

pub async fn update_page_metadata(ctx: &AppContext, args: UpdatePageMetadataArgs) -> Result<()> {
    let metadata = PageMetadataUpdate {
        title: args.title,
        url: args.url,
        description: args.description,
        image: args.image,
    };
    if metadata == PageMetadataUpdate::default() {
        anyhow::bail!("Nothing to update: pass at least one of --title, --url, --description, --image");
    }
    print_data(ctx, Operation::UpdatePageMetadata {
        project_id: args.project_id,
        page_id: args.page_id,
        metadata,
    })
    .await
}
