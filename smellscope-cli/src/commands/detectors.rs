//! `smellscope detectors` command handler

use std::collections::HashSet;
use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use smellscope_core::config::SmellscopeConfig;
use smellscope_engine::session::config_dir;
use smellscope_engine::{DetectorConfig, DetectorRegistry};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `detectors` command.
///
/// Every entry is resolved the same way a run would resolve it, so the
/// report shows exactly which detectors a run would skip.
pub async fn execute(config: &SmellscopeConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let path = &config.paths.detectors;
    info!(path = %path.display(), "checking detector config");

    let detector_config = DetectorConfig::load(path).await?;
    let report = DetectorListReport::build(
        path.display().to_string(),
        &detector_config,
        &DetectorRegistry::default(),
        &config_dir(path),
    );
    writer.render(&report)
}

#[derive(Debug, Serialize)]
pub struct DetectorListReport {
    pub source: String,
    pub folder: String,
    pub available_modules: Vec<String>,
    pub configured: usize,
    pub loadable: usize,
    pub detectors: Vec<DetectorStatusEntry>,
}

#[derive(Debug, Serialize)]
pub struct DetectorStatusEntry {
    pub name: String,
    pub path: String,
    pub loaded: bool,
    pub error: Option<String>,
    pub args: serde_json::Value,
}

impl DetectorListReport {
    pub fn build(
        source: String,
        config: &DetectorConfig,
        registry: &DetectorRegistry,
        base_dir: &std::path::Path,
    ) -> Self {
        let mut seen = HashSet::new();
        let detectors: Vec<_> = config
            .smells
            .iter()
            .map(|entry| {
                let path = config.resolve_path(base_dir, entry).display().to_string();
                let error = if !seen.insert(entry.name.as_str()) {
                    Some("duplicate detector name".to_owned())
                } else {
                    registry
                        .load_entry(config, entry, base_dir)
                        .err()
                        .map(|e| e.to_string())
                };
                DetectorStatusEntry {
                    name: entry.name.clone(),
                    path,
                    loaded: error.is_none(),
                    error,
                    args: entry.args.clone(),
                }
            })
            .collect();

        Self {
            source,
            folder: config.folder.clone(),
            available_modules: registry
                .catalog()
                .modules()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            configured: detectors.len(),
            loadable: detectors.iter().filter(|d| d.loaded).count(),
            detectors,
        }
    }
}

impl Render for DetectorListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "{} ({} of {} loadable, from {})",
            "Detectors".bold(),
            self.loadable,
            self.configured,
            self.source
        )?;
        for d in &self.detectors {
            let status = if d.loaded {
                "ok".green()
            } else {
                "skip".red()
            };
            writeln!(w, "  [{status:^4}] {:<32} {}", d.name, d.path)?;
            if let Some(error) = &d.error {
                writeln!(w, "         {}", error.dimmed())?;
            }
        }
        writeln!(w)?;
        writeln!(w, "Available modules: {}", self.available_modules.join(", "))?;
        Ok(())
    }
}
