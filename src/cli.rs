use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::diagram::{DiagramAttrs, Direction, OutFormat};
use crate::topology;

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub attrs: DiagramAttrs,
    pub dot_exe: String,
    pub write_descriptor: bool,
    pub show: bool,
}

#[derive(Parser, Debug)]
#[command(name = "tfe_diagram")]
#[command(about = "Render the TFE on GCP architecture diagram via Graphviz", long_about = None)]
pub struct Cli {
    #[arg(default_value = ".")]
    pub output_dir: PathBuf,
    /// Diagram title. Without `--filename` the file stem is derived from it.
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub filename: Option<String>,
    #[arg(long)]
    pub direction: Option<Direction>,
    /// Output format (png, jpg, svg, pdf, dot); repeat for several files.
    #[arg(long = "format")]
    pub formats: Vec<OutFormat>,
    #[arg(long, default_value = "dot")]
    pub dot_exe: String,
    /// Also write the layout-free JSON descriptor next to the image.
    #[arg(long)]
    pub descriptor: bool,
    /// Do not open the rendered file when done.
    #[arg(long = "no-show", action = ArgAction::SetFalse)]
    pub show: bool,
}

impl Cli {
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        let mut attrs = match self.title {
            Some(title) => DiagramAttrs::new(title),
            None => topology::default_attrs(),
        };
        if let Some(filename) = self.filename {
            attrs.filename = Some(filename);
        }
        if let Some(direction) = self.direction {
            attrs.direction = direction;
        }
        if !self.formats.is_empty() {
            attrs.outformats = self.formats;
        }

        Config {
            output_dir: self.output_dir,
            attrs,
            dot_exe: self.dot_exe,
            write_descriptor: self.descriptor,
            show: self.show,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_declared_constants() {
        let config = Cli::try_parse_from(["tfe_diagram"]).unwrap().into_config();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.attrs.title, topology::TITLE);
        assert_eq!(config.attrs.file_stem(), topology::FILENAME);
        assert_eq!(config.attrs.direction, topology::DIRECTION);
        assert_eq!(config.attrs.outformats, vec![topology::OUTFORMAT]);
        assert_eq!(config.dot_exe, "dot");
        assert!(!config.write_descriptor);
        assert!(config.show);
    }

    #[test]
    fn test_title_override_derives_filename() {
        let config = Cli::try_parse_from(["tfe_diagram", "--title", "Web Service Arch"])
            .unwrap()
            .into_config();
        assert_eq!(config.attrs.file_stem(), "web_service_arch");

        let config = Cli::try_parse_from([
            "tfe_diagram",
            "--title",
            "Web Service Arch",
            "--filename",
            "web",
        ])
        .unwrap()
        .into_config();
        assert_eq!(config.attrs.file_stem(), "web");
    }

    #[test]
    fn test_overrides() {
        let config = Cli::try_parse_from([
            "tfe_diagram",
            "out",
            "--direction",
            "lr",
            "--format",
            "svg",
            "--format",
            "dot",
            "--descriptor",
            "--no-show",
        ])
        .unwrap()
        .into_config();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.attrs.direction, Direction::LR);
        assert_eq!(config.attrs.outformats, vec![OutFormat::Svg, OutFormat::Dot]);
        assert!(config.write_descriptor);
        assert!(!config.show);
        assert_eq!(config.attrs.title, topology::TITLE);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["tfe_diagram", "--format", "gif"]).is_err());
    }
}
