mod common;
pub use self::common::{Query, QueryParams};

mod order;
pub use self::order::{OrderQuery, OrderSortBy};
