//! The `fetch` subcommand: pages through any collection resource.

use anyhow::Result;
use bigcommerce_lib::QueryParams;
use clap::Args;

use crate::commands::Context;
use crate::output::{print_items_table, print_json, OutputFormat};

#[derive(Args)]
pub struct FetchArgs {
    /// Resource path relative to the store root (e.g. v3/catalog/products)
    pub resource: String,

    /// Extra query parameter as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

pub async fn run(args: &FetchArgs, ctx: &Context<'_>) -> Result<()> {
    let params: QueryParams = args.params.iter().cloned().collect();
    let outcome = ctx.fetch_all(&args.resource, params).await?;

    match ctx.format {
        OutputFormat::Table => print_items_table(&outcome.data),
        OutputFormat::Json => print_json(&outcome),
    }
    Ok(())
}
