//! Generate command

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use dialoguer::Confirm;
use packwright_assembler::{PackageArtifact, Progress};
use packwright_core::{CustomerContext, DeploymentType};

use crate::cli::SelectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Customer company name
    #[arg(long)]
    pub company: String,

    /// License key; an evaluation key is issued when omitted
    #[arg(long, env = "PACKWRIGHT_LICENSE_KEY")]
    pub license_key: Option<String>,

    /// Target deployment topology (saas, on-premise, hybrid)
    #[arg(long, default_value = "on-premise")]
    pub deployment_type: DeploymentType,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Accept the license terms without prompting
    #[arg(long)]
    pub accept_terms: bool,

    /// Directory to write the package to
    #[arg(short, long, default_value = ".")]
    pub output: Utf8PathBuf,
}

pub async fn run(args: GenerateArgs, config: Option<&Utf8Path>) -> Result<()> {
    output::header("Generate Deployment Package");

    let assembler = super::load_assembler(config)?;
    let selection = super::build_selection(&assembler, &args.selection)?;
    let product = assembler.renderer().product().clone();

    let names: Vec<String> = selection.ordered().iter().map(|id| id.to_string()).collect();
    output::kv("Product", &format!("{} {}", product.name, product.version));
    output::kv("Company", &args.company);
    output::kv("Deployment", args.deployment_type.as_str());
    output::kv(
        "License",
        if args.license_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
            "perpetual (supplied key)"
        } else {
            "evaluation (key will be issued)"
        },
    );
    output::kv("Components", &names.join(", "));
    output::kv(
        "Estimated size",
        &output::format_bytes(selection.estimated_size()),
    );
    println!();

    let accepted = args.accept_terms || confirm_terms(&product.name)?;

    let mut ctx = CustomerContext::new(args.company.as_str())
        .with_accepted_terms(accepted)
        .with_deployment_type(args.deployment_type);
    if let Some(key) = &args.license_key {
        ctx = ctx.with_license_key(key.as_str());
    }

    let pb = output::progress_bar(selection.len() as u64, "Rendering components");
    let result = assembler
        .generate_selection(&selection, ctx, |progress: &Progress| {
            pb.set_position(progress.completed as u64);
            if progress.is_last() {
                pb.set_message("Writing license and archive");
            } else {
                pb.set_message(format!("{} ({}%)", progress.component, progress.percent()));
            }
        })
        .await;

    let artifact = match result {
        Ok(artifact) => {
            pb.finish_and_clear();
            artifact
        }
        Err(failure) => {
            pb.abandon();
            output::error(&failure.message);
            if let Some(field) = failure.field {
                output::info(&format!("Correct '{}' and run generate again", field));
            }
            return Err(failure.into());
        }
    };

    let path = write_artifact(&args.output, &artifact)?;

    output::success("Package generated successfully");
    println!();
    output::kv("Location", path.as_str());
    output::kv("Entries", &artifact.entries.len().to_string());
    output::kv("Size", &output::format_bytes(artifact.size() as u64));
    output::kv(
        "Compression",
        &format!("{}%", artifact.stats.compression_percentage()),
    );
    output::kv("SHA256", artifact.checksum());
    output::kv(
        "License",
        &format!("{} ({})", artifact.license.license_key, artifact.license.kind),
    );

    Ok(())
}

/// Ask for the license terms when a user is at the terminal
fn confirm_terms(product: &str) -> Result<bool> {
    if !console::user_attended() {
        output::warning("License terms not accepted; pass --accept-terms to generate");
        return Ok(false);
    }
    let accepted = Confirm::new()
        .with_prompt(format!("Accept the {} license terms?", product))
        .default(false)
        .interact()?;
    Ok(accepted)
}

/// Write the archive into `dir` under its suggested filename
fn write_artifact(dir: &Utf8Path, artifact: &PackageArtifact) -> Result<Utf8PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir))?;
    let path = dir.join(&artifact.suggested_filename);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("Failed to write package to {}", path))?;
    tracing::debug!("Wrote {} bytes to {}", artifact.size(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use packwright_assembler::PackageAssembler;
    use packwright_core::{FixedClock, PackwrightConfig};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_artifact_creates_directory() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap();
        let assembler = PackageAssembler::from_config(&PackwrightConfig::default())
            .unwrap()
            .with_clock(Arc::new(FixedClock(instant)));
        let ctx = CustomerContext::new("Acme").with_accepted_terms(true);
        let artifact = assembler.generate(["docs"], ctx, |_| {}).await.unwrap();

        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp.path().join("out/packages")).unwrap();
        let path = write_artifact(&dir, &artifact).unwrap();

        assert_eq!(
            path.file_name(),
            Some(format!("packwright-on-premise-{}.zip", instant.timestamp_millis()).as_str())
        );
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    }
}
