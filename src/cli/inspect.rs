//! Inspect command for layout documents.

use crate::parser::parse_layout_str;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

/// Parse a layout document and report its geometry and matrix
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Path to the ergogen layout YAML file
    #[arg(value_name = "FILE")]
    pub layout: PathBuf,

    /// Print the full resolution result as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> Result<()> {
        let text = std::fs::read_to_string(&self.layout)
            .with_context(|| format!("Failed to read layout file: {}", self.layout.display()))?;
        let parsed = parse_layout_str(&text)?;

        for warning in &parsed.warnings {
            warn!("{warning}");
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            return Ok(());
        }

        let Some(matrix) = parsed.matrix.as_ref() else {
            println!("Layout is empty");
            return Ok(());
        };

        println!(
            "Keys: {} ({} physical)",
            parsed.keys.len(),
            parsed.visible_keys().count()
        );
        println!(
            "Matrix: {} rows x {} cols{}",
            matrix.rows.len(),
            matrix.cols.len(),
            if matrix.mirrored { ", mirrored" } else { "" }
        );
        for row in &matrix.rows {
            println!(
                "  row {} -> net {} (pin {})",
                row.name,
                if row.net.is_empty() { "-" } else { &row.net },
                matrix.pin_for(&row.net).unwrap_or("-")
            );
        }
        for col in &matrix.cols {
            println!(
                "  col {} -> net {} (pin {})",
                col.name,
                if col.net.is_empty() { "-" } else { &col.net },
                matrix.pin_for(&col.net).unwrap_or("-")
            );
        }
        if !matrix.trrs_pin.is_empty() {
            println!("TRRS pin: {}", matrix.trrs_pin);
        }
        if let Some(bounds) = parsed.bounds {
            println!("Bounds: {:.1} x {:.1} mm", bounds.width(), bounds.height());
        }
        if !parsed.warnings.is_empty() {
            println!("Warnings: {}", parsed.warnings.len());
        }

        Ok(())
    }
}
