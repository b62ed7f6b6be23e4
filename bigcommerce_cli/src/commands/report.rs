//! The `report` subcommand: order totals for a date range.

use anyhow::Result;
use bigcommerce_lib::{retry_throttled, with_cancel};
use chrono::NaiveDate;
use clap::Args;

use crate::commands::Context;
use crate::output::{print_json, print_order_stats, print_orders_table, OutputFormat};

#[derive(Args)]
pub struct ReportArgs {
    /// First day of the report (YYYY-MM-DD)
    #[arg(long)]
    pub since: NaiveDate,

    /// Last day of the report (YYYY-MM-DD)
    #[arg(long)]
    pub until: NaiveDate,

    /// Print only the totals, not every order
    #[arg(long)]
    pub summary_only: bool,
}

pub async fn run(args: &ReportArgs, ctx: &Context<'_>) -> Result<()> {
    let fetcher = ctx.fetcher;
    let cancel = ctx.cancel;
    let (since, until) = (args.since, args.until);

    let report = retry_throttled("order report", ctx.max_retries, move || {
        with_cancel("order report", cancel, fetcher.order_report(since, until))
    })
    .await?;

    match ctx.format {
        OutputFormat::Table => {
            if !args.summary_only {
                print_orders_table(&report.data);
            }
            print_order_stats(&report.stats);
        }
        OutputFormat::Json if args.summary_only => print_json(&report.stats),
        OutputFormat::Json => print_json(&report),
    }
    Ok(())
}
