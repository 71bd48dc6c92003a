use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;

use crate::cli::Config;
use crate::dot;
use crate::render::{GraphvizRenderer, Renderer};
use crate::topology;

pub async fn run(config: Config) -> anyhow::Result<Vec<PathBuf>> {
    let renderer = GraphvizRenderer::new(config.dot_exe.clone());
    let written = render_to_dir(&config, &renderer).await?;

    if config.show {
        if let Some(first) = written.first() {
            open_file(first).await;
        }
    }

    Ok(written)
}

/// Build, emit and render the diagram once per output format.
pub async fn render_to_dir(
    config: &Config,
    renderer: &dyn Renderer,
) -> anyhow::Result<Vec<PathBuf>> {
    let diagram = topology::tfe_gcp(config.attrs.clone())?;
    tracing::info!(
        nodes = diagram.nodes().len(),
        clusters = diagram.clusters().len(),
        edges = diagram.edges().len(),
        "diagram declared"
    );

    let source = dot::to_dot(&diagram);
    let stem = config.attrs.file_stem();

    // Render every format before touching the output directory.
    let mut rendered: Vec<(PathBuf, Vec<u8>)> = Vec::new();
    for &format in &config.attrs.outformats {
        let bytes = renderer
            .render(&source, format)
            .await
            .with_context(|| format!("rendering {format}"))?;
        let path = config
            .output_dir
            .join(format!("{stem}.{}", format.extension()));
        rendered.push((path, bytes));
    }

    fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let mut written = Vec::new();
    for (path, bytes) in rendered {
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "diagram written");
        written.push(path);
    }

    if config.write_descriptor {
        let path = config.output_dir.join(format!("{stem}.json"));
        let json = serde_json::to_string_pretty(&diagram.descriptor())?;
        fs::write(&path, json)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "descriptor written");
    }

    Ok(written)
}

async fn open_file(path: &Path) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    match Command::new(opener).arg(path).status().await {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!(opener, %status, "viewer exited with failure"),
        Err(e) => tracing::warn!(opener, error = %e, "failed to launch viewer"),
    }
}
