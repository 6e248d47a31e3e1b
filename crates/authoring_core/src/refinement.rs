//! crates/authoring_core/src/refinement.rs
//!
//! AI-assisted mutation of sections: bulk generation, refinement and feedback.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::domain::{DocType, Feedback, Project, RefinementEntry, Section};
use crate::generation::{is_degraded, TextGenerator};
use crate::ports::{PortResult, ProjectStore};
use crate::prompts::{outline_prompt, refine_prompt, section_prompt};
use crate::text::parse_outline;

/// Outcome of a `generate_all` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationReport {
    pub generated: usize,
    /// Sections whose stored content is a tagged generation error.
    pub degraded: usize,
}

#[derive(Clone)]
pub struct RefinementEngine {
    store: Arc<dyn ProjectStore>,
    generator: TextGenerator,
}

impl RefinementEngine {
    pub fn new(store: Arc<dyn ProjectStore>, generator: TextGenerator) -> Self {
        Self { store, generator }
    }

    /// Generates and stores content for every section of `project`.
    ///
    /// Sections are generated concurrently and stored independently; a failed
    /// generation is stored as tagged text and does not stop the others.
    pub async fn generate_all(&self, project: &Project) -> PortResult<GenerationReport> {
        let subject = project.subject();
        let runs = project.sections.iter().map(|section| async move {
            let prompt = section_prompt(&section.title, subject, project.doc_type);
            let text = self.generator.generate(&prompt).await;
            let degraded = is_degraded(&text);
            self.store
                .set_section_content(section.id, &text)
                .await
                .map(|_| degraded)
        });

        let mut report = GenerationReport::default();
        let mut first_error = None;
        for outcome in join_all(runs).await {
            match outcome {
                Ok(degraded) => {
                    report.generated += 1;
                    if degraded {
                        report.degraded += 1;
                    }
                }
                Err(e) => {
                    warn!("Failed to store generated section content: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        info!(
            "Generated {} sections for project {} ({} degraded)",
            report.generated, project.id, report.degraded
        );
        Ok(report)
    }

    /// Rewrites `section` according to `instruction` and returns the new content.
    ///
    /// The history entry and the content overwrite are committed together. A
    /// failed generation still goes through: the tagged error becomes the
    /// content and is recorded in the history like any other result.
    pub async fn refine(&self, section: &Section, instruction: &str) -> PortResult<String> {
        let prompt = refine_prompt(&section.content, instruction);
        let result = self.generator.generate(&prompt).await;
        let updated = self
            .store
            .apply_refinement(
                section.id,
                RefinementEntry {
                    instruction: instruction.to_string(),
                    result,
                },
            )
            .await?;
        Ok(updated.content)
    }

    /// Records a like/dislike and an optional comment. Never touches history.
    pub async fn feedback(&self, section: &Section, feedback: &Feedback) -> PortResult<Section> {
        self.store.record_feedback(section.id, feedback).await
    }

    /// Proposes section titles for `topic`.
    pub async fn generate_outline(&self, topic: &str, doc_type: DocType) -> Vec<String> {
        let raw = self.generator.generate(&outline_prompt(topic, doc_type)).await;
        parse_outline(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedbackAction, NewProject, OutlineItem};
    use crate::generation::GENERATION_ERROR_TAG;
    use crate::memory::InMemoryStore;
    use crate::ports::{GenerationOptions, PortError, TextGenerationService};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    /// Echoes the section title found in the prompt, fails for "Broken".
    struct TitleEcho;

    #[async_trait]
    impl TextGenerationService for TitleEcho {
        async fn generate(&self, prompt: &str, _options: GenerationOptions) -> PortResult<String> {
            if prompt.contains("'Broken'") {
                return Err(PortError::Upstream("model overloaded".to_string()));
            }
            if let Some(rest) = prompt.split("Instruction: ").nth(1) {
                let instruction = rest.lines().next().unwrap_or_default();
                return Ok(format!("**Rewritten** ({instruction})"));
            }
            let title = prompt
                .split('\'')
                .nth(1)
                .unwrap_or("outline")
                .to_string();
            Ok(format!("Body of {title}"))
        }

        async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerationService for Canned {
        async fn generate(&self, _prompt: &str, _options: GenerationOptions) -> PortResult<String> {
            Ok(self.0.to_string())
        }

        async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    async fn setup(
        backend: Arc<dyn TextGenerationService>,
        titles: &[&str],
    ) -> (RefinementEngine, Arc<InMemoryStore>, Project) {
        let store = Arc::new(InMemoryStore::new());
        let project = store
            .create_project(
                Uuid::new_v4(),
                NewProject {
                    title: "Q1 Report".to_string(),
                    topic: Some("Quarterly results".to_string()),
                    doc_type: DocType::Docx,
                    outline: titles
                        .iter()
                        .enumerate()
                        .map(|(i, t)| OutlineItem {
                            title: t.to_string(),
                            order: i as i32,
                        })
                        .collect(),
                },
            )
            .await
            .unwrap();
        let engine = RefinementEngine::new(store.clone(), TextGenerator::new(backend));
        (engine, store, project)
    }

    #[tokio::test]
    async fn generate_all_stores_each_sections_own_result() {
        let (engine, store, project) =
            setup(Arc::new(TitleEcho), &["Intro", "Broken", "Summary"]).await;

        let report = engine.generate_all(&project).await.unwrap();
        assert_eq!(report, GenerationReport { generated: 3, degraded: 1 });

        let stored = store.get_project(project.owner_id, project.id).await.unwrap();
        assert_eq!(stored.sections[0].content, "Body of Intro");
        assert!(stored.sections[1].content.starts_with(GENERATION_ERROR_TAG));
        assert_eq!(stored.sections[2].content, "Body of Summary");
    }

    #[tokio::test]
    async fn refine_appends_exactly_one_history_entry() {
        let (engine, store, project) = setup(Arc::new(TitleEcho), &["Intro"]).await;
        engine.generate_all(&project).await.unwrap();

        let section = store
            .get_section(project.id, project.sections[0].id)
            .await
            .unwrap();
        let first = engine.refine(&section, "make it shorter").await.unwrap();
        let before = store.get_section(project.id, section.id).await.unwrap();

        let second = engine.refine(&before, "add numbers").await.unwrap();
        let after = store.get_section(project.id, section.id).await.unwrap();

        assert_eq!(first, "Rewritten (make it shorter)");
        assert_eq!(after.refinement_history.len(), before.refinement_history.len() + 1);
        assert_eq!(after.refinement_history[..1], before.refinement_history[..]);
        assert_eq!(
            after.refinement_history.last().unwrap(),
            &RefinementEntry {
                instruction: "add numbers".to_string(),
                result: after.content.clone(),
            }
        );
        assert_eq!(second, after.content);
    }

    #[tokio::test]
    async fn refine_keeps_failures_as_content() {
        let (engine, store, project) = setup(Arc::new(TitleEcho), &["Broken"]).await;
        let section = project.sections[0].clone();

        // The refine prompt quotes the content, so the stub fails on it.
        store
            .set_section_content(section.id, "about 'Broken' things")
            .await
            .unwrap();
        let section = store.get_section(project.id, section.id).await.unwrap();

        let content = engine.refine(&section, "fix").await.unwrap();
        assert!(is_degraded(&content));
        let stored = store.get_section(project.id, section.id).await.unwrap();
        assert_eq!(stored.refinement_history.len(), 1);
        assert_eq!(stored.refinement_history[0].result, stored.content);
    }

    #[tokio::test]
    async fn feedback_does_not_touch_history() {
        let (engine, _store, project) = setup(Arc::new(TitleEcho), &["Intro"]).await;
        let section = &project.sections[0];

        let updated = engine
            .feedback(
                section,
                &Feedback {
                    action: FeedbackAction::Dislike,
                    comment: Some("too long".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!((updated.likes, updated.dislikes), (0, 1));
        assert_eq!(updated.comments.len(), 1);
        assert!(updated.refinement_history.is_empty());
    }

    #[tokio::test]
    async fn outline_falls_back_to_line_splitting() {
        let (engine, _store, _project) = setup(
            Arc::new(Canned("Sure! Here are titles:\n- Intro\n• Market\n- Risks")),
            &[],
        )
        .await;

        let titles = engine.generate_outline("Energy", DocType::Pptx).await;
        assert_eq!(titles, vec!["Sure! Here are titles:", "Intro", "Market", "Risks"]);
        assert!(titles.len() <= 8);
    }
}
