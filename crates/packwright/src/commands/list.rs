//! List command

use anyhow::Result;
use camino::Utf8Path;
use packwright_core::ComponentDescriptor;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::ListArgs;
use crate::output;

#[derive(Tabled)]
struct ComponentRow {
    id: String,
    name: String,
    required: String,
    size: String,
    description: String,
}

impl From<&ComponentDescriptor> for ComponentRow {
    fn from(component: &ComponentDescriptor) -> Self {
        Self {
            id: component.id.to_string(),
            name: component.name.clone(),
            required: if component.required { "yes" } else { "no" }.to_string(),
            size: output::format_bytes(component.approx_size_bytes),
            description: component.description.clone(),
        }
    }
}

pub fn run(args: ListArgs, config: Option<&Utf8Path>) -> Result<()> {
    let assembler = super::load_assembler(config)?;
    let components = assembler.catalog().list_components();

    if args.json {
        println!("{}", serde_json::to_string_pretty(components)?);
        return Ok(());
    }

    output::header("Component Catalog");
    let rows: Vec<ComponentRow> = components.iter().map(ComponentRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    let required = components.iter().filter(|c| c.required).count();
    output::info(&format!(
        "{} components, {} required",
        components.len(),
        required
    ));
    Ok(())
}
