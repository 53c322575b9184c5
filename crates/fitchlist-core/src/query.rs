//! Query encoding for paginated list requests.
//!
//! A view state becomes `page`, `per_page`, optional `query`, optional
//! `sort` and one parameter group per filter key. Sort entries are joined
//! with commas; a leading `-` marks a descending field:
//!
//! ```
//! use fitchlist_core::encode_sort;
//! use fitchlist_types::SortField;
//!
//! let sort = vec![SortField::ascend("name"), SortField::descend("due_date")];
//! assert_eq!(encode_sort(&sort), "name,-due_date");
//! ```
//!
//! Field names are passed through untouched. The server validates them.

use fitchlist_types::{FetchRequest, SortField, SortOrder, ViewState};
use url::form_urlencoded;

/// How multi-valued filters are laid out in the query string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterEncoding {
    /// `role=a&role=b`
    #[default]
    Repeated,
    /// `role[]=a&role[]=b`
    Bracketed,
    /// `role=a,b`
    Joined,
}

impl std::str::FromStr for FilterEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeated" => Ok(FilterEncoding::Repeated),
            "bracketed" => Ok(FilterEncoding::Bracketed),
            "joined" => Ok(FilterEncoding::Joined),
            other => Err(format!("unknown filter encoding '{}'", other)),
        }
    }
}

/// Transport-neutral parameter bag for a GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub page: u64,
    pub per_page: u64,
    pub query: Option<String>,
    pub sort: Option<String>,
    /// One group per filter key, values deduplicated in first-seen order
    pub filters: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    pub fn from_view_state(state: &ViewState) -> Self {
        Self::from_request(&FetchRequest::from(state))
    }

    pub fn from_request(request: &FetchRequest) -> Self {
        let query = (!request.query.is_empty()).then(|| request.query.clone());
        let sort = Some(encode_sort(&request.sort)).filter(|s| !s.is_empty());

        let filters = request
            .filters
            .iter()
            .filter_map(|(key, values)| {
                let mut unique: Vec<String> = Vec::with_capacity(values.len());
                for value in values {
                    if !unique.contains(value) {
                        unique.push(value.clone());
                    }
                }
                (!unique.is_empty()).then(|| (key.clone(), unique))
            })
            .collect();

        Self {
            page: request.page,
            per_page: request.per_page,
            query,
            sort,
            filters,
        }
    }

    /// Flatten into ordered key/value pairs.
    pub fn to_pairs(&self, encoding: FilterEncoding) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];

        if let Some(query) = &self.query {
            pairs.push(("query".to_string(), query.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }

        for (key, values) in &self.filters {
            match encoding {
                FilterEncoding::Repeated => {
                    for value in values {
                        pairs.push((key.clone(), value.clone()));
                    }
                }
                FilterEncoding::Bracketed => {
                    for value in values {
                        pairs.push((format!("{}[]", key), value.clone()));
                    }
                }
                FilterEncoding::Joined => {
                    pairs.push((key.clone(), values.join(",")));
                }
            }
        }

        pairs
    }

    /// Percent-encoded query string (without the leading `?`).
    pub fn to_query_string(&self, encoding: FilterEncoding) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_pairs(encoding) {
            serializer.append_pair(&key, &value);
        }
        serializer.finish()
    }
}

/// Serialize a multi-key sort: `field` for ascending, `-field` for descending.
pub fn encode_sort(sort: &[SortField]) -> String {
    sort.iter()
        .map(|entry| match entry.order {
            SortOrder::Ascend => entry.field.clone(),
            SortOrder::Descend => format!("-{}", entry.field),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`encode_sort`]. Blank segments are skipped.
pub fn parse_sort(raw: &str) -> Vec<SortField> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != "-")
        .map(|segment| match segment.strip_prefix('-') {
            Some(field) => SortField::descend(field),
            None => SortField::ascend(segment),
        })
        .collect()
}
