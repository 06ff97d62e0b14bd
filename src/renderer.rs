/// Markdown to HTML renderer driving the rewrite stages
use crate::stages::{Document, PIPELINE, Stage};

#[derive(Debug, Clone)]
pub struct Renderer {
    stages: Vec<Stage>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            stages: PIPELINE.to_vec(),
        }
    }

    /// Build a renderer over a custom stage list, run in the given order
    pub fn with_stages(stages: impl IntoIterator<Item = Stage>) -> Self {
        Renderer {
            stages: stages.into_iter().collect(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn render(&self, markdown: &str) -> String {
        let mut doc = Document::new(markdown);

        for stage in &self.stages {
            stage.apply(&mut doc);
            tracing::trace!(
                stage = stage.name(),
                len = doc.text().len(),
                "Applied rewrite stage"
            );
        }

        let protected = doc.protected_spans();
        let html = doc.into_html();
        tracing::debug!(
            input_len = markdown.len(),
            output_len = html.len(),
            protected,
            "Rendered markdown"
        );
        html
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
