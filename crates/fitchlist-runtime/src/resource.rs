use crate::{Error, Result};
use fitchlist_core::FilterEncoding;
use fitchlist_types::ColumnDef;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"));

fn default_key_field() -> String {
    "id".to_string()
}

/// One listable collection on the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Path below the API base URL; `{name}` segments come from `--param name=value`
    pub endpoint: String,
    /// Key of the item array inside the envelope's `data` object
    pub items_key: String,
    #[serde(default = "default_key_field")]
    pub key_field: String,
    #[serde(default)]
    pub page_size: Option<u64>,
    /// `repeated`, `bracketed` or `joined`
    #[serde(default)]
    pub filter_encoding: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

impl ResourceConfig {
    pub fn new(endpoint: impl Into<String>, items_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            items_key: items_key.into(),
            key_field: default_key_field(),
            page_size: None,
            filter_encoding: None,
            columns: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    /// Placeholder names in endpoint order.
    pub fn placeholders(&self) -> Vec<String> {
        PLACEHOLDER
            .captures_iter(&self.endpoint)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Substitute `{name}` placeholders. `resource` is only used for the error.
    pub fn resolve_endpoint(
        &self,
        resource: &str,
        params: &HashMap<String, String>,
    ) -> Result<String> {
        if let Some(missing) = self
            .placeholders()
            .into_iter()
            .find(|name| !params.contains_key(name))
        {
            return Err(Error::MissingParam {
                resource: resource.to_string(),
                param: missing,
            });
        }

        let resolved = PLACEHOLDER.replace_all(&self.endpoint, |caps: &regex::Captures| {
            params.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(resolved.trim_matches('/').to_string())
    }

    pub fn filter_encoding(&self) -> Result<FilterEncoding> {
        match &self.filter_encoding {
            None => Ok(FilterEncoding::default()),
            Some(raw) => raw.parse().map_err(Error::Config),
        }
    }
}

/// Resources every installation knows about.
pub fn builtin_resources() -> BTreeMap<String, ResourceConfig> {
    let mut resources = BTreeMap::new();

    resources.insert(
        "modules".to_string(),
        ResourceConfig::new("modules", "modules").with_columns(vec![
            ColumnDef::new("code", "Code").sortable().filterable(),
            ColumnDef::new("year", "Year").sortable().filterable(),
            ColumnDef::new("description", "Description"),
            ColumnDef::new("credits", "Credits").sortable(),
            ColumnDef::new("created_at", "Created").sortable().hidden(),
        ]),
    );

    resources.insert(
        "users".to_string(),
        ResourceConfig::new("users", "users").with_columns(vec![
            ColumnDef::new("username", "Username").sortable(),
            ColumnDef::new("email", "Email").sortable(),
            ColumnDef::new("admin", "Admin").filter_options(["true", "false"]),
            ColumnDef::new("created_at", "Created").sortable().hidden(),
        ]),
    );

    resources.insert(
        "assignments".to_string(),
        ResourceConfig::new("modules/{module_id}/assignments", "assignments").with_columns(vec![
            ColumnDef::new("name", "Name").sortable(),
            ColumnDef::new("assignment_type", "Type")
                .sortable()
                .filter_options(["assignment", "practical"]),
            ColumnDef::new("status", "Status").filterable(),
            ColumnDef::new("available_from", "Available").sortable().hidden(),
            ColumnDef::new("due_date", "Due").sortable(),
        ]),
    );

    resources.insert(
        "announcements".to_string(),
        ResourceConfig::new("modules/{module_id}/announcements", "announcements").with_columns(
            vec![
                ColumnDef::new("title", "Title").sortable(),
                ColumnDef::new("pinned", "Pinned").filter_options(["true", "false"]),
                ColumnDef::new("body", "Body").hidden(),
                ColumnDef::new("created_at", "Posted").sortable(),
            ],
        ),
    );

    resources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_endpoint() -> Result<()> {
        let resource = ResourceConfig::new("/modules/{module_id}/assignments/", "assignments");
        assert_eq!(resource.placeholders(), vec!["module_id"]);
        assert_eq!(
            resource.resolve_endpoint("assignments", &params(&[("module_id", "7")]))?,
            "modules/7/assignments"
        );
        Ok(())
    }

    #[test]
    fn test_missing_param_is_reported() {
        let resource = ResourceConfig::new("modules/{module_id}/announcements", "announcements");
        let err = resource
            .resolve_endpoint("announcements", &HashMap::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Resource 'announcements' needs --param module_id=<value>"
        );
    }

    #[test]
    fn test_builtin_resources() {
        let resources = builtin_resources();
        assert_eq!(
            resources.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["announcements", "assignments", "modules", "users"]
        );
        assert!(resources.values().all(|r| !r.columns.is_empty()));
    }

    #[test]
    fn test_filter_encoding_parse() {
        let mut resource = ResourceConfig::new("users", "users");
        assert_eq!(resource.filter_encoding().ok(), Some(FilterEncoding::Repeated));
        resource.filter_encoding = Some("bracketed".to_string());
        assert_eq!(resource.filter_encoding().ok(), Some(FilterEncoding::Bracketed));
        resource.filter_encoding = Some("pipe".to_string());
        assert!(resource.filter_encoding().is_err());
    }
}
