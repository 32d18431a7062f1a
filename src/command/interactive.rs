//! Menu-driven session over an explicitly owned version collection.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::acquire::{Acquirer, Source};
use crate::cli::Prompter;
use crate::collection::VersionCollection;
use crate::config::Settings;
use crate::edit::{EditInvoker, EditSession};
use crate::error::DeckError;
use crate::service::PresentationService;

use super::show::{acquired_label, render_slide};

const ACTIONS: &[&str] = &[
    "Load a presentation",
    "List loaded presentations",
    "Show a presentation (slides and shapes)",
    "Save presentation JSON",
    "Edit a presentation",
    "Exit",
];

pub async fn run_interactive(settings: &Settings) -> Result<()> {
    let acquirer = settings.acquirer()?;
    let stdin = std::io::stdin();
    let prompter = Prompter::new(stdin.lock(), std::io::stdout());

    let mut session = MenuSession::new(&acquirer, prompter);
    session.run().await
}

pub(crate) struct MenuSession<'a, S: ?Sized, R, W> {
    acquirer: &'a Acquirer<S>,
    prompter: Prompter<R, W>,
    versions: VersionCollection,
}

impl<'a, S, R, W> MenuSession<'a, S, R, W>
where
    S: PresentationService + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(acquirer: &'a Acquirer<S>, prompter: Prompter<R, W>) -> Self {
        Self {
            acquirer,
            prompter,
            versions: VersionCollection::new(),
        }
    }

    #[cfg(test)]
    pub fn versions(&self) -> &VersionCollection {
        &self.versions
    }

    #[cfg(test)]
    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    pub async fn run(&mut self) -> Result<()> {
        let actions: Vec<String> = ACTIONS.iter().map(|a| a.to_string()).collect();

        loop {
            self.prompter.say("")?;
            self.prompter.say("Presentation Manager")?;
            let choice = self.prompter.select("Choose an action:", &actions)?;

            let outcome = match choice {
                0 => self.load().await,
                1 => self.list(),
                2 => self.show(),
                3 => self.save_json(),
                4 => self.edit().await,
                _ => {
                    self.prompter.say("👋 Goodbye!")?;
                    return Ok(());
                }
            };

            if let Err(err) = outcome {
                self.report(&err)?;
            }
        }
    }

    fn report(&mut self, err: &anyhow::Error) -> Result<()> {
        match err.downcast_ref::<DeckError>() {
            Some(deck_err) => self.prompter.say(format!(
                "❌ {} ({})",
                deck_err,
                deck_err.category().describe()
            )),
            None => self.prompter.say(format!("❌ {:#}", err)),
        }
    }

    async fn load(&mut self) -> Result<()> {
        let kinds = vec!["File".to_string(), "URL".to_string()];
        let source = match self.prompter.select("Load a presentation from:", &kinds)? {
            0 => {
                let path = self.prompter.ask("Path to a PPTX file:")?;
                Source::from_parts(Some(PathBuf::from(path)), None)?
            }
            _ => {
                let url = self.prompter.ask("URL of the PPTX file:")?;
                Source::from_parts(None, Some(&url))?
            }
        };

        let artifact = self.acquirer.acquire(source).await?;
        let index = self.versions.append(artifact);
        self.prompter
            .say(format!("✅ Presentation loaded successfully! ({})", index))
    }

    fn list(&mut self) -> Result<()> {
        if self.versions.is_empty() {
            return self.prompter.say("No presentations loaded yet.");
        }

        self.prompter
            .say(format!("Loaded Presentations ({}):", self.versions.len()))?;
        let lines: Vec<String> = self
            .versions
            .list()
            .map(|(idx, a)| {
                format!(
                    "{}. {} ({}, {})",
                    idx,
                    a.path().display(),
                    a.origin(),
                    acquired_label(a)
                )
            })
            .collect();
        for line in lines {
            self.prompter.say(line)?;
        }
        Ok(())
    }

    /// Pick a loaded presentation; returns its 1-based index.
    fn pick_presentation(&mut self, title: &str) -> Result<usize> {
        if self.versions.is_empty() {
            anyhow::bail!(DeckError::Input("No presentations loaded yet.".to_string()));
        }
        let choices: Vec<String> = self
            .versions
            .list()
            .map(|(idx, a)| format!("{}. {}", idx, a.path().display()))
            .collect();
        Ok(self.prompter.select(title, &choices)? + 1)
    }

    fn pick_slide(&mut self, index: usize, title: &str) -> Result<usize> {
        let model = self.versions.get(index)?.model();
        if model.is_empty() {
            anyhow::bail!(DeckError::Input("This presentation has no slides.".to_string()));
        }
        let choices: Vec<String> = model
            .slides()
            .iter()
            .map(|s| format!("Slide {}", s.slide_number))
            .collect();
        Ok(self.prompter.select(title, &choices)? + 1)
    }

    fn show(&mut self) -> Result<()> {
        let index = self.pick_presentation("Select a presentation to view:")?;

        loop {
            let slide_number = self.pick_slide(index, "Choose a slide to view:")?;
            let lines = match self.versions.get(index)?.model().slide(slide_number) {
                Some(slide) => render_slide(slide),
                None => Vec::new(),
            };
            self.prompter.say("")?;
            for line in lines {
                self.prompter.say(line)?;
            }

            if !self.prompter.confirm("View another slide?", false)? {
                return Ok(());
            }
        }
    }

    fn save_json(&mut self) -> Result<()> {
        let index = self.pick_presentation("Select a presentation to save:")?;
        let output = self.prompter.ask_default("Output file name", "output.json")?;

        let written = self
            .versions
            .get(index)?
            .save_json(Some(PathBuf::from(output).as_path()))?;
        self.prompter
            .say(format!("✅ JSON content saved to '{}'.", written.display()))
    }

    async fn edit(&mut self) -> Result<()> {
        let index = self.pick_presentation("Select a presentation to edit:")?;

        let mut picks = Vec::new();
        loop {
            let slide_number = self.pick_slide(index, "Choose a slide to edit:")?;
            let choices = EditSession::new(self.versions.get(index)?.model()).shape_choices(slide_number)?;
            if choices.is_empty() {
                self.prompter.say("This slide has no shapes.")?;
            } else {
                let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
                let picked = self.prompter.select("Choose a shape to modify:", &labels)?;
                let content = self
                    .prompter
                    .ask(&format!("New content for '{}':", choices[picked].name))?;
                picks.push((choices[picked].id, content));
            }

            if !self.prompter.confirm("Edit more shapes?", false)? {
                break;
            }
        }

        let request = {
            let mut session = EditSession::new(self.versions.get(index)?.model());
            for (id, content) in picks {
                session.replace(id, content)?;
            }
            session.finish()
        };
        if request.has_ambiguous_targets() {
            self.prompter
                .say("⚠️  Some chosen shapes share a name with another shape on the same slide.")?;
        }

        let edited = EditInvoker::new(self.acquirer)
            .apply(self.versions.get(index)?, request)
            .await?;
        let new_index = self.versions.append(edited);
        self.prompter
            .say(format!("✅ New presentation added successfully! ({})", new_index))
    }
}
