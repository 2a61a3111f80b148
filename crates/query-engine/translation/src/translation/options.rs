//! The query options model: the raw options delivered by the HTTP layer and
//! the decoded per-request model the validator consumes.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::filter;

/// Engine-configured bounds for paging. `max_top` is both the largest page a
/// client may request and the page size used when `top` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_max_top")]
    pub max_top: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_top: default_max_top(),
        }
    }
}

fn default_max_top() -> u32 {
    100
}

/// Query options as delivered by the HTTP collaborator: option values are
/// already tokenized, except the filter string, which the engine parses
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawQueryOptions {
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub order_by: Vec<OrderByElement>,
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub top: Option<i64>,
    #[serde(default)]
    pub count: bool,
}

/// A single ordering element: a field name and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByElement {
    pub field: String,
    #[serde(default)]
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// A decoded request. Built fresh per request, immutable once built.
///
/// The select list is silently de-duplicated, keeping the order of first
/// occurrence; an empty list means "all fields". `skip` and `top` carry the
/// client's values (with defaults applied) so that out-of-range requests are
/// rejected by the validator rather than clamped here.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub select: IndexSet<String>,
    pub filter: Option<filter::Expression>,
    pub order_by: Vec<OrderByElement>,
    pub skip: i64,
    pub top: i64,
    pub include_count: bool,
}

impl QueryOptions {
    /// Decode raw options: parse the filter string and apply paging defaults.
    /// An empty or all-whitespace filter string means "no filter".
    pub fn from_raw(raw: RawQueryOptions, limits: &Limits) -> Result<Self, filter::ParseError> {
        let filter = match &raw.filter {
            Some(text) if !text.trim().is_empty() => Some(filter::parse(text)?),
            _ => None,
        };

        Ok(QueryOptions {
            select: raw.select.into_iter().collect(),
            filter,
            order_by: raw.order_by,
            skip: raw.skip.unwrap_or(0),
            top: raw.top.unwrap_or_else(|| i64::from(limits.max_top)),
            include_count: raw.count,
        })
    }
}
