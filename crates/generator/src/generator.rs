use crate::error::{GenerationError, Result};
use crate::usage::TokenUsage;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Text produced by a generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub usage: TokenUsage,
}

/// Anything that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation>;

    /// Short label for progress output
    fn describe(&self) -> String;
}

/// Replays a recorded response instead of calling a model
#[derive(Debug, Clone)]
pub struct CannedGenerator {
    path: PathBuf,
}

impl CannedGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        log::debug!(
            "Canned generator ignoring {}-byte prompt, replaying {}",
            prompt.len(),
            self.path.display()
        );
        let text = tokio::fs::read_to_string(&self.path).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(Generation {
            text,
            usage: TokenUsage::default(),
        })
    }

    fn describe(&self) -> String {
        format!("recorded response {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn replays_file_contents() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("response.md");
        std::fs::write(&path, "```python\nprint(1)\n```\n").unwrap();

        let generation = CannedGenerator::new(&path).generate("prompt").await.unwrap();
        assert_eq!(generation.text, "```python\nprint(1)\n```\n");
        assert_eq!(generation.usage.total(), 0);
    }

    #[tokio::test]
    async fn blank_recording_is_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("response.md");
        std::fs::write(&path, "\n  \n").unwrap();

        let err = CannedGenerator::new(&path).generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Empty));
    }

    #[tokio::test]
    async fn missing_recording_is_io_error() {
        let temp = tempdir().unwrap();
        let err = CannedGenerator::new(temp.path().join("absent.md"))
            .generate("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Io(_)));
    }
}
