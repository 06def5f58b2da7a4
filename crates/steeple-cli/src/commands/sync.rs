use anyhow::Result;
use steeple_core::catalog;
use steeple_directus::DirectusClient;
use steeple_sync::run_pass;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::output::print_success;

pub async fn sync(client: &DirectusClient) -> Result<()> {
    let cat = catalog();
    let report = run_pass(client, &cat).await?;

    let mut builder = Builder::default();
    builder.push_record(["", "Created", "Existing"]);
    builder.push_record([
        "Collections".to_string(),
        report.collections_created.to_string(),
        report.collections_existing.to_string(),
    ]);
    builder.push_record([
        "Fields".to_string(),
        report.fields_created.to_string(),
        report.fields_existing.to_string(),
    ]);
    builder.push_record([
        "Relations".to_string(),
        report.relations_created.to_string(),
        report.relations_existing.to_string(),
    ]);
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");

    if report.is_noop() {
        print_success("schema already converged, nothing to do");
    } else {
        print_success("schema converged");
    }
    Ok(())
}
