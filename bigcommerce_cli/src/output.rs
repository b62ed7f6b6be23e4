use bigcommerce_lib::OrderStats;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Order ID")]
    id: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Billing Name")]
    billing_name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Orders")]
    orders: usize,
    #[tabled(rename = "Revenue")]
    revenue: String,
}

// -- Row builders --

fn build_order_rows(orders: &[Value]) -> Vec<OrderRow> {
    orders
        .iter()
        .map(|o| OrderRow {
            id: text(&o["id"]),
            created: text(&o["date_created"]),
            billing_name: format!(
                "{} {}",
                text(&o["billing_address"]["first_name"]),
                text(&o["billing_address"]["last_name"])
            )
            .trim()
            .to_string(),
            status: text(&o["status"]),
            total: format_currency(&o["total_inc_tax"]),
        })
        .collect()
}

fn build_item_rows(items: &[Value]) -> Vec<ItemRow> {
    items
        .iter()
        .map(|item| ItemRow {
            id: text(&item["id"]),
            name: ["name", "title", "email"]
                .iter()
                .map(|key| text(&item[*key]))
                .find(|s| !s.is_empty())
                .unwrap_or_default(),
        })
        .collect()
}

// -- Printers --

pub fn print_orders_table(orders: &[Value]) {
    let mut table = Table::new(build_order_rows(orders));
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_items_table(items: &[Value]) {
    let mut table = Table::new(build_item_rows(items));
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_order_stats(stats: &OrderStats) {
    let mut table = Table::new([StatsRow {
        orders: stats.total_orders,
        revenue: format!("${:.2}", stats.total_revenue),
    }]);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Renders a scalar JSON value as plain text; missing values are empty.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_currency(value: &Value) -> String {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match amount {
        Some(amount) => format!("${:.2}", amount),
        None => "-".to_string(),
    }
}
