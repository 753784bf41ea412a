//! Account commands

use anyhow::Result;
use clap::Args;

use super::print_data;
use crate::api::Operation;
use crate::cli::AppContext;

#[derive(Args, Debug)]
pub struct UpdateUserArgs {
    /// New display name
    #[arg(long)]
    pub name: String,
}

pub async fn get_user(ctx: &AppContext) -> Result<()> {
    print_data(ctx, Operation::GetUser).await
}

pub async fn update_user(ctx: &AppContext, args: UpdateUserArgs) -> Result<()> {
    print_data(ctx, Operation::UpdateUser { name: args.name }).await
}
