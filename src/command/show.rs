use anyhow::Result;

use crate::acquire::Source;
use crate::artifact::Artifact;
use crate::config::Settings;
use crate::error::DeckError;
use crate::model::Slide;

pub async fn run_show(settings: &Settings, source: &str, slide: Option<usize>) -> Result<()> {
    let acquirer = settings.acquirer()?;
    let artifact = acquirer.acquire(Source::parse(source)?).await?;

    for line in describe_artifact(&artifact) {
        println!("{}", line);
    }
    if artifact.model().is_empty() {
        println!("\n(the presentation has no slides)");
        return Ok(());
    }

    let slides: Vec<&Slide> = match slide {
        Some(number) => {
            let slide = artifact.model().slide(number).ok_or_else(|| {
                DeckError::Input(format!(
                    "Slide {} does not exist (deck has {} slide(s))",
                    number,
                    artifact.model().len()
                ))
            })?;
            vec![slide]
        }
        None => artifact.model().slides().iter().collect(),
    };

    for slide in slides {
        println!();
        for line in render_slide(slide) {
            println!("{}", line);
        }
    }

    Ok(())
}

pub(crate) fn describe_artifact(artifact: &Artifact) -> Vec<String> {
    let mut lines = vec![
        format!("Presentation: {}", artifact.path().display()),
        format!("   Source: {}", artifact.origin()),
        format!("   Slides: {}", artifact.model().len()),
        format!("   SHA-256: {}", artifact.digest()),
        format!("   Acquired: {}", acquired_label(artifact)),
    ];
    if let Some(url) = artifact.origin().url() {
        lines.push(format!("   URL: {}", url));
    }
    lines
}

pub(crate) fn acquired_label(artifact: &Artifact) -> String {
    artifact
        .acquired_at()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Slide header followed by one line per shape, prefixed with the shape id
/// accepted by `edit --set`.
pub(crate) fn render_slide(slide: &Slide) -> Vec<String> {
    let mut lines = vec![format!("📊 Slide {}:", slide.slide_number)];
    if slide.shapes.is_empty() {
        lines.push(" (no shapes)".to_string());
    }
    for (id, shape) in slide.shapes_with_ids() {
        lines.push(format!(
            " - [{}] Shape Name: '{}' | Content: '{}'",
            id, shape.name, shape.content
        ));
    }
    lines
}
