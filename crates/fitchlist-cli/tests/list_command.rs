use anyhow::Result;
use fitchlist_testing::assertions::{assert_field_values, assert_item_count, assert_total};
use fitchlist_testing::{FixtureServer, TestWorld, fixtures};
use serde_json::json;

// The fixture server runs on the test runtime while the binary blocks this
// thread, so these tests need worker threads.

async fn server() -> Result<FixtureServer> {
    FixtureServer::builder()
        .resource("modules", fixtures::modules(30))
        .resource("modules/3/assignments", fixtures::assignments(3, 6))
        .failing("users", 403, "Admin access required")
        .start()
        .await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_json_first_page() -> Result<()> {
    let server = server().await?;
    let world = TestWorld::new().with_api_url(server.url());

    let result = world.run(&["list", "modules", "--format", "json"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assert_item_count(&json, 20)?;
    assert_total(&json, 30)?;
    assert_eq!(json["page_count"], 2);
    assert_eq!(json["resource"], "modules");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_applies_view_options() -> Result<()> {
    let server = server().await?;
    let world = TestWorld::new().with_api_url(server.url());

    let result = world.run(&[
        "list",
        "modules",
        "--filter",
        "year=2025",
        "--sort",
        "-code",
        "--per-page",
        "5",
        "--page",
        "2",
        "--format",
        "json",
    ])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assert_total(&json, 15)?;
    assert_eq!(json["page"], 2);
    assert_field_values(
        &json,
        "code",
        &[
            json!("COS120"),
            json!("COS118"),
            json!("COS116"),
            json!("COS114"),
            json!("COS112"),
        ],
    )?;

    let request = server.last_request().map(|r| r.query).unwrap_or_default();
    assert_eq!(request, "page=2&per_page=5&sort=-code&year=2025");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_nested_resource_as_csv() -> Result<()> {
    let server = server().await?;
    let world = TestWorld::new().with_api_url(server.url());

    let result = world.run(&[
        "list",
        "assignments",
        "--param",
        "module_id=3",
        "--filter",
        "assignment_type=practical",
        "--hide",
        "status",
        "--format",
        "csv",
    ])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let lines: Vec<&str> = result.stdout().lines().collect();
    assert_eq!(lines[0], "name,assignment_type,due_date");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Practical 2,practical,"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_plain_table() -> Result<()> {
    let server = server().await?;
    let world = TestWorld::new().with_api_url(server.url());

    let result = world.run(&["list", "modules", "--search", "COS10", "--sort", "code"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let stdout = result.stdout();
    assert!(stdout.contains("Code ▲"));
    assert!(stdout.contains("[ ] COS101"));
    assert!(stdout.contains("page 1/1 · 20 per page · 9 total · search \"COS10\" · sort code"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_reports_server_failure() -> Result<()> {
    let server = server().await?;
    let world = TestWorld::new().with_api_url(server.url());

    let result = world.run(&["list", "users"])?;
    assert!(!result.success());
    assert!(
        result
            .stderr()
            .contains("Could not load users: Admin access required")
    );
    Ok(())
}

#[test]
fn test_list_requires_endpoint_params() -> Result<()> {
    let world = TestWorld::new().with_api_url("http://127.0.0.1:9/api");

    let result = world.run(&["list", "announcements"])?;
    assert!(!result.success());
    assert!(
        result
            .stderr()
            .contains("Resource 'announcements' needs --param module_id=<value>")
    );
    Ok(())
}

#[test]
fn test_list_unknown_resource_and_column() -> Result<()> {
    let world = TestWorld::new().with_api_url("http://127.0.0.1:9/api");

    let result = world.run(&["list", "grades"])?;
    assert!(!result.success());
    assert!(result.stderr().contains("Unknown resource 'grades'"));

    let result = world.run(&["list", "modules", "--hide", "colour"])?;
    assert!(!result.success());
    assert!(result.stderr().contains("Unknown column 'colour' for modules"));
    Ok(())
}
