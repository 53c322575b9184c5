//! Assertions over `fitchlist list --format json` output.
//!
//! The JSON shape is `{ "items": [...], "page", "per_page", "total",
//! "page_count" }`.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert the number of items on the printed page.
pub fn assert_item_count(json: &Value, expected: usize) -> Result<()> {
    let items = json["items"]
        .as_array()
        .context("Expected 'items' array in JSON")?;

    if items.len() != expected {
        anyhow::bail!("Expected {} items, got {}", expected, items.len());
    }
    Ok(())
}

/// Assert the reported total across all pages.
pub fn assert_total(json: &Value, expected: u64) -> Result<()> {
    let total = json["total"].as_u64().context("Expected numeric 'total'")?;
    if total != expected {
        anyhow::bail!("Expected total {}, got {}", expected, total);
    }
    Ok(())
}

/// Assert the values of `field` across the page, in order.
pub fn assert_field_values(json: &Value, field: &str, expected: &[Value]) -> Result<()> {
    let items = json["items"]
        .as_array()
        .context("Expected 'items' array in JSON")?;

    let actual: Vec<Value> = items.iter().map(|item| item[field].clone()).collect();
    if actual != expected {
        anyhow::bail!("Expected {} values {:?}, got {:?}", field, expected, actual);
    }
    Ok(())
}
