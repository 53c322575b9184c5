use anyhow::{Result, bail};
use fitchlist_core::parse_sort;
use fitchlist_engine::{ListController, ListOptions, ListSnapshot, LoadOutcome};
use fitchlist_types::{ColumnDef, DEFAULT_PAGE_SIZE, Filters, Record};
use serde_json::json;

use crate::args::{ListArgs, parse_filter};
use crate::context::CliContext;
use crate::presentation::{
    ConsoleRenderer, PageView, inferred_columns, page_summary, query_summary, renderer_for,
};
use crate::types::OutputFormat;

pub fn handle(ctx: &CliContext, args: &ListArgs, format: OutputFormat) -> Result<()> {
    if args.page == Some(0) {
        bail!("--page must be at least 1");
    }
    if args.per_page == Some(0) {
        bail!("--per-page must be at least 1");
    }

    let (resource, fetcher) = ctx.open_resource(&args.resource, &args.params)?;
    let page_size = args
        .per_page
        .or(resource.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let controller = ListController::new(
        fetcher,
        ListOptions::new()
            .columns(resource.columns.clone())
            .page_size(page_size),
    );
    apply_view_args(&controller, args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    if let LoadOutcome::Failed(error) = runtime.block_on(controller.load_current_page()) {
        bail!("Could not load {}: {}", args.resource, error.message);
    }

    let snapshot = controller.snapshot();
    let columns: Vec<ColumnDef> = if snapshot.columns.all().is_empty() {
        inferred_columns(&snapshot.items)
    } else {
        snapshot.columns.visible().into_iter().cloned().collect()
    };

    match format {
        OutputFormat::Json => print_json(&args.resource, &snapshot),
        OutputFormat::Csv => print_csv(&snapshot.items, &columns),
        OutputFormat::Plain => {
            print_plain(&args.resource, args, &snapshot, &columns);
            Ok(())
        }
    }
}

/// Push the command-line view options into the controller. The page goes
/// last, since search, sort and filter changes send the list back to page 1.
fn apply_view_args(controller: &ListController<Record>, args: &ListArgs) -> Result<()> {
    let columns = controller.columns();
    let known = |key: &str| -> Result<()> {
        if columns.all().is_empty() || columns.get(key).is_some() {
            return Ok(());
        }
        let available: Vec<&str> = columns.all().iter().map(|c| c.key.as_str()).collect();
        bail!(
            "Unknown column '{}' for {} (available: {})",
            key,
            args.resource,
            available.join(", ")
        )
    };

    for key in &args.show {
        known(key)?;
        if columns.is_hidden(key) {
            controller.toggle_column(key);
        }
    }
    for key in &args.hide {
        known(key)?;
        if !controller.columns().is_hidden(key) && controller.toggle_column(key).is_none() {
            bail!("Cannot hide '{}': at least one column must stay visible", key);
        }
    }

    if let Some(search) = &args.search {
        controller.set_search_term(search.trim());
    }
    if let Some(sort) = &args.sort {
        controller.set_sort(parse_sort(sort));
    }
    if !args.filters.is_empty() {
        let mut filters = Filters::new();
        for raw in &args.filters {
            let (key, values) = parse_filter(raw)?;
            filters.entry(key).or_default().extend(values);
        }
        controller.set_filters(filters);
    }
    if let Some(page) = args.page {
        controller.set_page(page);
    }
    Ok(())
}

fn print_json(resource: &str, snapshot: &ListSnapshot<Record>) -> Result<()> {
    let pagination = snapshot.view.pagination;
    let items: Vec<_> = snapshot.items.iter().map(|item| &item.fields).collect();
    let output = json!({
        "resource": resource,
        "page": pagination.current,
        "per_page": pagination.page_size,
        "total": pagination.total,
        "page_count": pagination.page_count(),
        "items": items,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_csv(items: &[Record], columns: &[ColumnDef]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(columns.iter().map(|column| column.key.as_str()))?;
    for item in items {
        writer.write_record(columns.iter().map(|column| item.text(&column.key)))?;
    }
    writer.flush()?;
    Ok(())
}

fn print_plain(
    resource: &str,
    args: &ListArgs,
    snapshot: &ListSnapshot<Record>,
    columns: &[ColumnDef],
) {
    let console = ConsoleRenderer::detect();

    if snapshot.items.is_empty() {
        println!("No {} match the current view", resource);
    } else {
        let page = PageView {
            items: &snapshot.items,
            columns: columns.iter().collect(),
            selection: &snapshot.selection,
            sort: &snapshot.view.sort,
            cursor: None,
            focus_column: None,
            width: console.width(),
        };
        console.print_page(&renderer_for(args.view).render(&page));
    }

    let mut status = vec![page_summary(&snapshot.view)];
    status.extend(query_summary(&snapshot.view));
    println!();
    println!("{}", console.status(&status.join(" · ")));
}
