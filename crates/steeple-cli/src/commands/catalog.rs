use anyhow::Result;
use colored::Colorize;
use steeple_core::catalog;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn catalog_table() -> Result<()> {
    let cat = catalog();

    let mut builder = Builder::default();
    builder.push_record(["Collection", "Icon", "Fields"]);
    for spec in cat.collections() {
        let fields: Vec<&str> = spec.fields.iter().map(|f| f.name.as_str()).collect();
        builder.push_record([spec.name.as_str(), spec.icon.as_str(), &fields.join(", ")]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");

    println!("\n{}", "Relations".cyan());
    for rel in cat.relations() {
        println!("  {rel}");
    }
    Ok(())
}
