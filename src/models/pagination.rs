//! Offset-based pagination for `GET /logs`.

use std::collections::HashMap;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;
pub const DEFAULT_OFFSET: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Pagination {
    /// Build from raw query parameters.
    ///
    /// Values that are not integers fall back to their defaults. `limit` is
    /// capped at `MAX_LIMIT`; negative values are left for the database to reject.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let limit = parse_param(params, "limit").unwrap_or(DEFAULT_LIMIT);
        let offset = parse_param(params, "offset").unwrap_or(DEFAULT_OFFSET);
        Self {
            limit: limit.min(MAX_LIMIT),
            offset,
        }
    }
}

fn parse_param(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|raw| raw.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_unspecified() {
        assert_eq!(Pagination::from_query(&query(&[])), Pagination::default());
        assert_eq!(Pagination::default().limit, 100);
        assert_eq!(Pagination::default().offset, 0);
    }

    #[test]
    fn limit_is_clamped() {
        let page = Pagination::from_query(&query(&[("limit", "5000"), ("offset", "20")]));
        assert_eq!(page.limit, 1000);
        assert_eq!(page.offset, 20);

        let page = Pagination::from_query(&query(&[("limit", "1000")]));
        assert_eq!(page.limit, 1000);
    }

    #[test]
    fn non_integer_values_use_defaults() {
        let page = Pagination::from_query(&query(&[("limit", "ten"), ("offset", "1.5")]));
        assert_eq!(page, Pagination::default());
    }

    #[test]
    fn negative_values_pass_through() {
        let page = Pagination::from_query(&query(&[("limit", "-3"), ("offset", "-1")]));
        assert_eq!(page.limit, -3);
        assert_eq!(page.offset, -1);
    }
}
