//! Sample records shaped like the platform's list payloads.

use serde_json::{Map, Value, json};

/// `count` modules with codes `COS101`, `COS102`, ... spread over two years.
pub fn modules(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": i as i64,
                "code": format!("COS{}", 100 + i),
                "year": if i % 2 == 0 { 2025 } else { 2024 },
                "description": format!("Module {}", i),
                "credits": 16,
                "created_at": "2025-01-10T08:00:00Z",
                "updated_at": "2025-01-10T08:00:00Z",
            })
        })
        .collect()
}

/// Assignments alternating between the `assignment` and `practical` types.
pub fn assignments(module_id: i64, count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": i as i64,
                "module_id": module_id,
                "name": format!("Practical {}", i),
                "description": null,
                "assignment_type": if i % 2 == 0 { "practical" } else { "assignment" },
                "status": "open",
                "available_from": "2025-02-01T00:00:00Z",
                "due_date": format!("2025-03-{:02}T23:59:00Z", (i % 28) + 1),
            })
        })
        .collect()
}

/// Announcements; every third one is pinned.
pub fn announcements(module_id: i64, count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": i as i64,
                "module_id": module_id,
                "user_id": 1,
                "title": format!("Announcement {}", i),
                "body": "Lab venue has moved.",
                "pinned": i % 3 == 0,
                "created_at": "2025-02-14T10:00:00Z",
            })
        })
        .collect()
}

/// Users with string ids (`u1`, `u2`, ...); the first is an admin.
pub fn users(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": format!("u{}", i),
                "username": format!("u{:08}", 20000000 + i),
                "email": format!("student{}@example.com", i),
                "admin": i == 1,
                "created_at": "2024-11-01T12:00:00Z",
            })
        })
        .collect()
}

/// The platform's success envelope around one page.
pub fn envelope(items_key: &str, items: &[Value], page: u64, per_page: u64, total: u64) -> Value {
    let mut data = Map::new();
    data.insert(items_key.to_string(), Value::Array(items.to_vec()));
    data.insert("page".to_string(), json!(page));
    data.insert("per_page".to_string(), json!(per_page));
    data.insert("total".to_string(), json!(total));

    json!({
        "success": true,
        "data": data,
        "message": format!("Retrieved {} {}", items.len(), items_key),
    })
}

/// The platform's failure envelope.
pub fn failure(message: &str) -> Value {
    json!({
        "success": false,
        "data": null,
        "message": message,
    })
}
