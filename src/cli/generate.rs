//! Generate command for firmware files.

use crate::firmware::generate_artifacts;
use crate::models::Dialect;
use crate::parser::parse_layout_str;
use crate::project::ProjectFile;
use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// Generate ZMK and QMK firmware sources from a layout or saved project
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to the ergogen layout YAML file
    #[arg(short, long, value_name = "FILE", conflicts_with = "project")]
    pub layout: Option<PathBuf>,

    /// Path to a saved project file (.kb.json)
    #[arg(short, long, value_name = "FILE")]
    pub project: Option<PathBuf>,

    /// Output directory for generated files
    #[arg(short, long, value_name = "DIR", default_value = "out")]
    pub out_dir: PathBuf,

    /// Which dialect to generate: zmk, qmk, or all
    #[arg(long, value_name = "TYPE", default_value = "all")]
    pub format: String,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> Result<()> {
        if !matches!(self.format.as_str(), "zmk" | "qmk" | "all") {
            bail!("Invalid format '{}'. Must be 'zmk', 'qmk', or 'all'", self.format);
        }

        let project = self.load_project()?;
        for warning in &project.parsed.warnings {
            warn!("{warning}");
        }

        let artifacts =
            generate_artifacts(&project.parsed, &project.layers, &project.export_settings())?;

        let mut written = 0usize;
        for artifact in &artifacts {
            let wanted = match self.format.as_str() {
                "zmk" => artifact.dialect == Dialect::Zmk,
                "qmk" => artifact.dialect == Dialect::Qmk,
                _ => true,
            };
            if !wanted {
                continue;
            }
            let dir = self.out_dir.join(artifact.dialect.id());
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            let path = dir.join(artifact.filename);
            std::fs::write(&path, &artifact.contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
            written += 1;
        }

        println!("✓ Generated {written} files");
        println!("  Output: {}", self.out_dir.display());
        Ok(())
    }

    fn load_project(&self) -> Result<ProjectFile> {
        if let Some(path) = &self.project {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read project file: {}", path.display()))?;
            return ProjectFile::from_json(&text);
        }
        if let Some(path) = &self.layout {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
            let parsed = parse_layout_str(&text)?;
            return Ok(ProjectFile::new(parsed));
        }
        bail!(
            "Provide a layout (--layout) or a saved project (--project).\n\nExamples:\n  {name} generate --layout board.yaml\n  {name} generate --project board.kb.json",
            name = crate::constants::APP_BINARY_NAME
        );
    }
}
