use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

use crate::api::GenerateRequest;
use crate::artifact::Origin;
use crate::config::Settings;
use crate::generate::{generate_and_wait, GenerationOutcome, PollPolicy};

use super::show::{describe_artifact, render_slide};

pub struct GenerateOptions {
    pub text: String,
    pub theme: Option<String>,
    pub length: u32,
    pub interval_secs: u64,
    pub max_polls: u32,
    pub download: bool,
}

pub async fn run_generate(settings: &Settings, options: GenerateOptions) -> Result<()> {
    let acquirer = settings.acquirer()?;

    let request = GenerateRequest {
        plain_text: options.text,
        theme: options.theme,
        length: options.length,
    };
    let policy = PollPolicy {
        interval: Duration::from_secs(options.interval_secs),
        max_polls: options.max_polls,
    };

    println!("Generating presentation...");
    let outcome = generate_and_wait(acquirer.service(), &request, policy).await?;

    let info_url = match &outcome {
        GenerationOutcome::Ready { info_url, .. } => info_url.clone(),
        _ => None,
    };
    let (task_id, url) = outcome.into_url()?;

    println!("{}", "*".repeat(42));
    println!("Download your presentation here: {}", url);
    if let Some(info_url) = info_url {
        println!("Presentation info: {}", info_url);
    }
    println!("{}", "*".repeat(42));

    if options.download {
        let parsed = Url::parse(&url).with_context(|| format!("Invalid result URL: {}", url))?;
        let artifact = acquirer
            .acquire_url(&parsed, Origin::Generated { task_id, url })
            .await?;

        for line in describe_artifact(&artifact) {
            println!("{}", line);
        }
        for slide in artifact.model().slides() {
            println!();
            for line in render_slide(slide) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
