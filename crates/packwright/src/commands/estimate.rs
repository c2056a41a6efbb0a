//! Estimate command

use anyhow::Result;
use camino::Utf8Path;

use crate::cli::SelectionArgs;
use crate::output;

pub fn run(args: SelectionArgs, config: Option<&Utf8Path>) -> Result<()> {
    let assembler = super::load_assembler(config)?;
    let selection = super::build_selection(&assembler, &args)?;

    output::header("Package Estimate");
    for id in selection.ordered() {
        if let Some(component) = assembler.catalog().get(id.as_str()) {
            output::kv(&component.name, &output::format_bytes(component.approx_size_bytes));
        }
    }
    println!();
    output::info(&format!(
        "{} components, approximately {}",
        selection.len(),
        output::format_bytes(selection.estimated_size())
    ));
    Ok(())
}
