use anyhow::{anyhow, Result};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::acquire::Source;
use crate::collection::VersionCollection;
use crate::config::Settings;
use crate::edit::{EditInvoker, EditSession};
use crate::error::DeckError;
use crate::model::ShapeId;

use super::show::{describe_artifact, render_slide};

/// `SLIDE.POS=TEXT`
static SET_BY_ID: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?s)^(\d+\.\d+)=(.*)$"));

/// `SLIDE:NAME=TEXT`
static SET_BY_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?s)^(\d+):([^=]+)=(.*)$"));

pub(crate) fn parse_set_by_id(raw: &str) -> Result<(ShapeId, String)> {
    let re = SET_BY_ID
        .as_ref()
        .map_err(|e| anyhow!("Invalid --set pattern: {}", e))?;
    let caps = re.captures(raw).ok_or_else(|| {
        DeckError::Input(format!("Invalid --set '{}', expected SLIDE.POS=TEXT", raw))
    })?;
    let id: ShapeId = caps[1].parse()?;
    Ok((id, caps[2].to_string()))
}

pub(crate) fn parse_set_by_name(raw: &str) -> Result<(usize, String, String)> {
    let re = SET_BY_NAME
        .as_ref()
        .map_err(|e| anyhow!("Invalid --set-name pattern: {}", e))?;
    let caps = re.captures(raw).ok_or_else(|| {
        DeckError::Input(format!("Invalid --set-name '{}', expected SLIDE:NAME=TEXT", raw))
    })?;
    let slide: usize = caps[1]
        .parse()
        .map_err(|_| DeckError::Input(format!("Invalid slide number in '{}'", raw)))?;
    Ok((slide, caps[2].to_string(), caps[3].to_string()))
}

pub async fn run_edit(
    settings: &Settings,
    source: &str,
    set: &[String],
    set_name: &[String],
    export: Option<PathBuf>,
) -> Result<()> {
    if set.is_empty() && set_name.is_empty() {
        anyhow::bail!(DeckError::Input(
            "Nothing to edit: pass --set SLIDE.POS=TEXT or --set-name SLIDE:NAME=TEXT".to_string()
        ));
    }

    let by_id = set
        .iter()
        .map(|raw| parse_set_by_id(raw))
        .collect::<Result<Vec<_>>>()?;
    let by_name = set_name
        .iter()
        .map(|raw| parse_set_by_name(raw))
        .collect::<Result<Vec<_>>>()?;

    let acquirer = settings.acquirer()?;
    let mut versions = VersionCollection::new();
    let original = versions.append(acquirer.acquire(Source::parse(source)?).await?);

    let request = {
        let mut session = EditSession::new(versions.get(original)?.model());
        for (id, content) in by_id {
            session.replace(id, content)?;
        }
        for (slide, name, content) in by_name {
            session.replace_by_name(slide, &name, content)?;
        }
        session.finish()
    };

    println!("Queued {} replacement(s):", request.len());
    for entry in request.entries() {
        println!(
            " - [{}] '{}' -> '{}'{}",
            entry.target,
            entry.replacement.shape_name,
            entry.replacement.content,
            if entry.ambiguous { " ⚠️  name is not unique on its slide" } else { "" }
        );
    }
    if request.has_ambiguous_targets() {
        println!("⚠️  Some target names are shared by several shapes on their slide;");
        println!("   the edit service decides which of them change.");
    }

    let edited = EditInvoker::new(&acquirer)
        .apply(versions.get(original)?, request)
        .await?;
    let edited = versions.append(edited);
    println!("✅ Edits applied successfully!");

    println!("\nVersions:");
    for (idx, artifact) in versions.list() {
        println!("{}. {} ({})", idx, artifact.path().display(), artifact.origin());
    }

    let artifact = versions.get(edited)?;
    println!();
    for line in describe_artifact(artifact) {
        println!("{}", line);
    }
    for slide in artifact.model().slides() {
        println!();
        for line in render_slide(slide) {
            println!("{}", line);
        }
    }

    if let Some(output) = export {
        let written = artifact.save_json(Some(&output))?;
        println!("\n✅ JSON content saved to '{}'.", written.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_by_id() {
        let (id, text) = parse_set_by_id("2.3=Hello = world").unwrap();
        assert_eq!(id, ShapeId::new(2, 3));
        assert_eq!(text, "Hello = world");

        let (_, text) = parse_set_by_id("1.1=line one\nline two").unwrap();
        assert_eq!(text, "line one\nline two");

        assert!(parse_set_by_id("2=Hello").is_err());
        assert!(parse_set_by_id("0.1=Hello").is_err());
    }

    #[test]
    fn test_parse_set_by_name() {
        let (slide, name, text) = parse_set_by_name("1:Title 1=New Title").unwrap();
        assert_eq!(slide, 1);
        assert_eq!(name, "Title 1");
        assert_eq!(text, "New Title");

        let (_, _, text) = parse_set_by_name("4:Body=").unwrap();
        assert_eq!(text, "");

        assert!(parse_set_by_name("Title=x").is_err());
    }
}
