//! Renderer seam: turns DOT source into image bytes.
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::diagram::OutFormat;

/// Lays out and rasterizes a DOT graph.
/// - `render` takes the full DOT source and returns the encoded file contents for `format`.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, dot: &str, format: OutFormat) -> anyhow::Result<Vec<u8>>;
}

/// Shells out to Graphviz (`dot -T<format>`).
pub struct GraphvizRenderer {
    exe: String,
}

impl GraphvizRenderer {
    pub fn new(exe: impl Into<String>) -> Self {
        GraphvizRenderer { exe: exe.into() }
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        GraphvizRenderer::new("dot")
    }
}

#[async_trait]
impl Renderer for GraphvizRenderer {
    async fn render(&self, dot: &str, format: OutFormat) -> anyhow::Result<Vec<u8>> {
        if format == OutFormat::Dot {
            return Ok(dot.as_bytes().to_vec());
        }

        tracing::debug!(exe = %self.exe, %format, "spawning renderer");
        let mut child = Command::new(&self.exe)
            .arg(format!("-T{}", format.extension()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start `{}` (is Graphviz installed?)", self.exe))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("failed to take child stdin"))?;
        stdin.write_all(dot.as_bytes()).await?;
        // Close the pipe so the renderer sees EOF.
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(anyhow!(
                "`{}` exited with {}: {}",
                self.exe,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dot_format_skips_renderer() {
        let renderer = GraphvizRenderer::new("definitely-not-a-renderer");
        let bytes = renderer
            .render("digraph {}\n", OutFormat::Dot)
            .await
            .expect("dot passthrough failed");
        assert_eq!(bytes, b"digraph {}\n");
    }

    #[tokio::test]
    async fn test_missing_executable_is_an_error() {
        let renderer = GraphvizRenderer::new("definitely-not-a-renderer");
        let err = renderer
            .render("digraph {}\n", OutFormat::Png)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-renderer"));
    }
}
