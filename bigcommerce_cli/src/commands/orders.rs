//! The `orders` subcommand: exports every order matching the filters.

use anyhow::Result;
use bigcommerce_lib::bigcommerce_api::OrderSortBy;
use bigcommerce_lib::{OrderQuery, Query, ORDERS_RESOURCE};
use chrono::NaiveDate;
use clap::Args;

use crate::commands::Context;
use crate::output::{print_json, print_orders_table, OutputFormat};

#[derive(Args)]
pub struct OrdersArgs {
    /// Filter by order status id (e.g. 11 = Awaiting Fulfillment)
    #[arg(long)]
    pub status_id: Option<u32>,

    /// Filter by customer id
    #[arg(long)]
    pub customer_id: Option<u64>,

    /// Only orders created on/after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Only orders created on/before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Page size (max 250)
    #[arg(long)]
    pub limit: Option<u64>,

    /// Sort field: id, date-created, date-modified, status
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,
}

impl OrdersArgs {
    fn to_query(&self) -> Result<OrderQuery> {
        let mut query = OrderQuery::default();
        if let Some(status_id) = self.status_id {
            query = query.with_status_id(status_id);
        }
        if let Some(customer_id) = self.customer_id {
            query = query.with_customer_id(customer_id);
        }
        if let Some(since) = self.since {
            query = query.with_min_date_created(&format!("{}T00:00:00Z", since));
        }
        if let Some(until) = self.until {
            query = query.with_max_date_created(&format!("{}T23:59:59Z", until));
        }
        if let Some(limit) = self.limit {
            query = query.with_limit(limit.clamp(1, 250));
        }
        if let Some(sort_by) = &self.sort_by {
            query = query.with_sort(parse_sort_by(sort_by)?, !self.asc);
        }
        Ok(query)
    }
}

fn parse_sort_by(s: &str) -> Result<OrderSortBy> {
    match s {
        "id" => Ok(OrderSortBy::Id),
        "date-created" => Ok(OrderSortBy::DateCreated),
        "date-modified" => Ok(OrderSortBy::DateModified),
        "status" => Ok(OrderSortBy::Status),
        other => anyhow::bail!(
            "unknown sort field '{}', expected id, date-created, date-modified or status",
            other
        ),
    }
}

pub async fn run(args: &OrdersArgs, ctx: &Context<'_>) -> Result<()> {
    let params = args.to_query()?.to_params();
    let outcome = ctx.fetch_all(ORDERS_RESOURCE, params).await?;

    match ctx.format {
        OutputFormat::Table => print_orders_table(&outcome.data),
        OutputFormat::Json => print_json(&outcome),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> OrdersArgs {
        OrdersArgs {
            status_id: None,
            customer_id: None,
            since: None,
            until: None,
            limit: None,
            sort_by: None,
            asc: false,
        }
    }

    #[test]
    fn date_filters_cover_whole_days() {
        let mut a = args();
        a.since = NaiveDate::from_ymd_opt(2024, 3, 1);
        a.until = NaiveDate::from_ymd_opt(2024, 3, 31);
        let params = a.to_query().unwrap().to_params();
        assert_eq!(params.get("min_date_created"), Some("2024-03-01T00:00:00Z"));
        assert_eq!(params.get("max_date_created"), Some("2024-03-31T23:59:59Z"));
    }

    #[test]
    fn limit_is_capped() {
        let mut a = args();
        a.limit = Some(1000);
        assert_eq!(a.to_query().unwrap().to_params().limit(), Some(250));
    }

    #[test]
    fn sort_defaults_to_descending() {
        let mut a = args();
        a.sort_by = Some("id".to_string());
        assert_eq!(a.to_query().unwrap().to_params().get("sort"), Some("id:desc"));
        a.asc = true;
        assert_eq!(a.to_query().unwrap().to_params().get("sort"), Some("id:asc"));
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let mut a = args();
        a.sort_by = Some("revenue".to_string());
        assert!(a.to_query().is_err());
    }
}
