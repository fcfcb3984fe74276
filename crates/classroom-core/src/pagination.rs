//! Page-based pagination for list endpoints.
//!
//! List endpoints accept `page`, `take` and `order` query parameters and
//! answer with a [`Page`]: the items of the requested page plus [`PageMeta`]
//! computed from a single `COUNT(*)`.
//!
//! - `page`: 1-indexed, default 1, values below 1 are raised to 1
//! - `take`: items per page, default 10, clamped to [1, 50]
//! - `order`: `ASC` or `DESC` by id, default `ASC`
//!
//! # Example JSON Response
//!
//! ```json
//! {
//!   "data": [...],
//!   "meta": {
//!     "page": 2,
//!     "take": 10,
//!     "item_count": 25,
//!     "page_count": 3,
//!     "has_previous_page": true,
//!     "has_next_page": true
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::{deserialize_optional_i64, deserialize_optional_order};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_TAKE: i64 = 10;
pub const MAX_TAKE: i64 = 50;

/// Sort direction applied to the primary key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Order::Asc),
            "DESC" => Ok(Order::Desc),
            other => Err(format!("order must be ASC or DESC, got {other}")),
        }
    }
}

/// Query parameters for list endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageOptions {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-50, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub take: Option<i64>,
    /// Sort direction by id (default: ASC)
    #[serde(default, deserialize_with = "deserialize_optional_order")]
    pub order: Option<Order>,
}

impl PageOptions {
    pub fn new(page: i64, take: i64, order: Order) -> Self {
        Self {
            page: Some(page),
            take: Some(take),
            order: Some(order),
        }
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    #[must_use]
    pub fn take(&self) -> i64 {
        self.take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE)
    }

    #[must_use]
    pub fn order(&self) -> Order {
        self.order.unwrap_or_default()
    }

    /// Rows to skip before the requested page.
    #[must_use]
    pub fn skip(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.take())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub page: i64,
    pub take: i64,
    pub item_count: i64,
    pub page_count: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageMeta {
    pub fn new(options: &PageOptions, item_count: i64) -> Self {
        let page = options.page();
        let take = options.take();
        let item_count = item_count.max(0);
        let page_count = (item_count + take - 1) / take;

        Self {
            page,
            take,
            item_count,
            page_count,
            has_previous_page: page > 1,
            has_next_page: page < page_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, options: &PageOptions, item_count: i64) -> Self {
        Self {
            data,
            meta: PageMeta::new(options, item_count),
        }
    }

    /// Converts every item, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_options_defaults() {
        let options = PageOptions::default();
        assert_eq!(options.page(), 1);
        assert_eq!(options.take(), 10);
        assert_eq!(options.order(), Order::Asc);
        assert_eq!(options.skip(), 0);
    }

    #[test]
    fn test_take_is_clamped() {
        let cases = [
            (Some(0), 1),
            (Some(-3), 1),
            (Some(1), 1),
            (Some(50), 50),
            (Some(51), 50),
            (None, 10),
        ];
        for (take, expected) in cases {
            let options = PageOptions { take, ..Default::default() };
            assert_eq!(options.take(), expected, "take {take:?}");
        }
    }

    #[test]
    fn test_page_below_one_is_first_page() {
        let options = PageOptions { page: Some(0), ..Default::default() };
        assert_eq!(options.page(), 1);
        assert_eq!(options.skip(), 0);
    }

    #[test]
    fn test_skip_uses_page_and_take() {
        let options = PageOptions::new(3, 20, Order::Desc);
        assert_eq!(options.skip(), 40);
        assert_eq!(options.order().as_sql(), "DESC");
    }

    #[test]
    fn test_meta_middle_page() {
        let meta = PageMeta::new(&PageOptions::new(2, 10, Order::Asc), 25);
        assert_eq!(meta.page_count, 3);
        assert!(meta.has_previous_page);
        assert!(meta.has_next_page);
    }

    #[test]
    fn test_meta_last_page() {
        let meta = PageMeta::new(&PageOptions::new(3, 10, Order::Asc), 25);
        assert_eq!(meta.page_count, 3);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_meta_exact_multiple() {
        let meta = PageMeta::new(&PageOptions::new(2, 10, Order::Asc), 20);
        assert_eq!(meta.page_count, 2);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_meta_empty_table() {
        let meta = PageMeta::new(&PageOptions::default(), 0);
        assert_eq!(meta.page_count, 0);
        assert!(!meta.has_previous_page);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_meta_beyond_last_page() {
        let meta = PageMeta::new(&PageOptions::new(5, 10, Order::Asc), 25);
        assert!(meta.has_previous_page);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_meta_serializes_snake_case() {
        let meta = PageMeta::new(&PageOptions::default(), 1);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["item_count"], 1);
        assert_eq!(json["page_count"], 1);
        assert_eq!(json["has_previous_page"], false);
        assert_eq!(json["has_next_page"], false);
    }

    #[test]
    fn test_page_map_keeps_meta() {
        let page = Page::new(vec![1, 2, 3], &PageOptions::default(), 3);
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.data, vec![2, 4, 6]);
        assert_eq!(mapped.meta.item_count, 3);
    }

    #[test]
    fn test_deserialize_query_strings() {
        let json = r#"{"page":"2","take":"5","order":"desc"}"#;
        let options: PageOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.page(), 2);
        assert_eq!(options.take(), 5);
        assert_eq!(options.order(), Order::Desc);
    }

    #[test]
    fn test_deserialize_empty_strings_as_absent() {
        let json = r#"{"page":"","take":"","order":""}"#;
        let options: PageOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.page(), 1);
        assert_eq!(options.take(), 10);
        assert_eq!(options.order(), Order::Asc);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<PageOptions>(r#"{"page":"two"}"#).is_err());
        assert!(serde_json::from_str::<PageOptions>(r#"{"order":"sideways"}"#).is_err());
    }
}
