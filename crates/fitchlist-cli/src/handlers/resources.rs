use anyhow::Result;
use serde_json::json;

use crate::context::CliContext;
use crate::types::OutputFormat;

pub fn handle(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let resources = &ctx.config.resources;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = resources
                .iter()
                .map(|(name, resource)| {
                    json!({
                        "name": name,
                        "endpoint": resource.endpoint,
                        "params": resource.placeholders(),
                        "columns": resource.columns.iter().map(|c| &c.key).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["name", "endpoint", "params"])?;
            for (name, resource) in resources {
                writer.write_record([
                    name.as_str(),
                    resource.endpoint.as_str(),
                    resource.placeholders().join(" ").as_str(),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Plain => {
            let width = resources.keys().map(String::len).max().unwrap_or(0);
            for (name, resource) in resources {
                let params: String = resource
                    .placeholders()
                    .iter()
                    .map(|p| format!(" --param {}=<value>", p))
                    .collect();
                println!("{:width$}  {}{}", name, resource.endpoint, params, width = width);
            }
        }
    }
    Ok(())
}
