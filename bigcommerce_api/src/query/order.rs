use std::fmt;

use super::common::{Query, QueryParams};

/// Sort field for the v2 orders collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderSortBy {
    Id,
    #[default]
    DateCreated,
    DateModified,
    Status,
}

impl fmt::Display for OrderSortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderSortBy::Id => "id",
            OrderSortBy::DateCreated => "date_created",
            OrderSortBy::DateModified => "date_modified",
            OrderSortBy::Status => "status_id",
        };
        write!(f, "{}", s)
    }
}

/// Builder for `v2/orders` filters.
///
/// Dates are passed through as given; the API accepts RFC 2822 and
/// ISO 8601 timestamps.
#[derive(Clone, Debug, Default)]
pub struct OrderQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status_id: Option<u32>,
    pub customer_id: Option<u64>,
    pub email: Option<String>,
    pub min_date_created: Option<String>,
    pub max_date_created: Option<String>,
    pub min_id: Option<u64>,
    pub max_id: Option<u64>,
    pub sort: Option<(OrderSortBy, bool)>,
}

impl OrderQuery {
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_status_id(mut self, status_id: u32) -> Self {
        self.status_id = Some(status_id);
        self
    }

    pub fn with_customer_id(mut self, customer_id: u64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_min_date_created(mut self, date: &str) -> Self {
        self.min_date_created = Some(date.to_string());
        self
    }

    pub fn with_max_date_created(mut self, date: &str) -> Self {
        self.max_date_created = Some(date.to_string());
        self
    }

    pub fn with_id_range(mut self, min_id: u64, max_id: u64) -> Self {
        self.min_id = Some(min_id);
        self.max_id = Some(max_id);
        self
    }

    /// Sorts by the given field, descending when `descending` is true.
    pub fn with_sort(mut self, sort_by: OrderSortBy, descending: bool) -> Self {
        self.sort = Some((sort_by, descending));
        self
    }
}

impl Query for OrderQuery {
    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(page) = self.page {
            params.set_page(page);
        }
        if let Some(limit) = self.limit {
            params.set_limit(limit);
        }
        if let Some(status_id) = self.status_id {
            params.insert("status_id", status_id);
        }
        if let Some(customer_id) = self.customer_id {
            params.insert("customer_id", customer_id);
        }
        if let Some(email) = &self.email {
            params.insert("email", email);
        }
        if let Some(date) = &self.min_date_created {
            params.insert("min_date_created", date);
        }
        if let Some(date) = &self.max_date_created {
            params.insert("max_date_created", date);
        }
        if let Some(min_id) = self.min_id {
            params.insert("min_id", min_id);
        }
        if let Some(max_id) = self.max_id {
            params.insert("max_id", max_id);
        }
        if let Some((sort_by, descending)) = self.sort {
            let direction = if descending { "desc" } else { "asc" };
            params.insert("sort", format!("{}:{}", sort_by, direction));
        }
        params
    }
}
