use anyhow::Result;
use std::path::PathBuf;

use crate::acquire::Source;
use crate::config::Settings;

pub async fn run_export(settings: &Settings, source: &str, output: Option<PathBuf>) -> Result<()> {
    let acquirer = settings.acquirer()?;
    let artifact = acquirer.acquire(Source::parse(source)?).await?;

    let written = artifact.save_json(output.as_deref())?;
    println!("✅ JSON content saved to '{}'.", written.display());

    Ok(())
}
