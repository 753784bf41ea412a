//! Project report commands

use anyhow::Result;
use clap::Args;

use super::print_data;
use crate::api::{Operation, ReportInterval, ReportKind};
use crate::cli::AppContext;

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long, value_enum)]
    pub kind: ReportKind,
    /// Aggregation interval (analysis report)
    #[arg(long, value_enum)]
    pub interval: Option<ReportInterval>,
}

pub async fn report(ctx: &AppContext, args: ReportArgs) -> Result<()> {
    print_data(ctx, Operation::Report {
        project_id: args.project_id,
        kind: args.kind,
        interval: args.interval,
    })
    .await
}
