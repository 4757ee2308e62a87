//! `smellscope run` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use smellscope_core::config::SmellscopeConfig;
use smellscope_engine::{DetectorCatalog, RunSummary, SmellSession};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
///
/// Cached incidents are reused when they were computed for the current
/// model file, unless `--force` is given.
pub async fn execute(
    args: RunArgs,
    config: &SmellscopeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut session = SmellSession::open(config, DetectorCatalog::builtin()).await?;

    let report = if session.from_cache() && !args.force {
        info!("model unchanged, using cached incidents");
        RunReport::cached(&session)
    } else {
        let summary = session.compute().await?;
        RunReport::computed(&session, &summary)
    };

    writer.render(&report)
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub model: String,
    pub last_edit: String,
    pub from_cache: bool,
    pub run_id: Option<String>,
    pub elapsed_ms: Option<f64>,
    pub total_incidents: usize,
    pub detectors: Vec<DetectorRunEntry>,
    pub failures: Vec<FailureEntry>,
}

#[derive(Debug, Serialize)]
pub struct DetectorRunEntry {
    pub name: String,
    pub incidents: usize,
    pub time_ms: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FailureEntry {
    pub name: String,
    pub error: String,
}

impl RunReport {
    fn cached(session: &SmellSession) -> Self {
        let incidents = session.incidents().unwrap_or_default();
        let detectors = session
            .detectors()
            .iter()
            .map(|d| DetectorRunEntry {
                name: d.name().to_owned(),
                incidents: incidents.iter().filter(|i| i.smell == d.name()).count(),
                time_ms: None,
            })
            .collect();

        Self {
            model: session.fingerprint().file.clone(),
            last_edit: session.fingerprint().last_edit.clone(),
            from_cache: true,
            run_id: None,
            elapsed_ms: None,
            total_incidents: incidents.len(),
            detectors,
            failures: Vec::new(),
        }
    }

    fn computed(session: &SmellSession, summary: &RunSummary) -> Self {
        Self {
            model: session.fingerprint().file.clone(),
            last_edit: session.fingerprint().last_edit.clone(),
            from_cache: false,
            run_id: Some(summary.run_id.to_string()),
            elapsed_ms: Some(millis(summary.elapsed)),
            total_incidents: summary.incident_count(),
            detectors: summary
                .reports
                .iter()
                .map(|r| DetectorRunEntry {
                    name: r.detector_name.clone(),
                    incidents: r.incidents.len(),
                    time_ms: Some(millis(r.time)),
                })
                .collect(),
            failures: summary
                .failures
                .iter()
                .map(|f| FailureEntry {
                    name: f.detector_name.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }
}

fn millis(d: std::time::Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", "Detector Run".bold())?;
        writeln!(w, "  Model:     {} (last edit {})", self.model, self.last_edit)?;
        match (&self.run_id, self.elapsed_ms) {
            (Some(run_id), Some(elapsed)) => {
                writeln!(w, "  Run:       {run_id} ({elapsed:.2} ms)")?;
            }
            _ => writeln!(
                w,
                "  Run:       {} (use --force to re-run)",
                "cached results".cyan()
            )?,
        }
        writeln!(w)?;

        writeln!(w, "  {:<32} {:>9} {:>12}", "DETECTOR", "INCIDENTS", "TIME")?;
        for d in &self.detectors {
            let time = d
                .time_ms
                .map(|t| format!("{t:.2} ms"))
                .unwrap_or_else(|| "-".to_owned());
            writeln!(w, "  {:<32} {:>9} {:>12}", d.name, d.incidents, time)?;
        }

        for f in &self.failures {
            writeln!(w, "  {} {}: {}", "FAILED".red().bold(), f.name, f.error)?;
        }

        writeln!(w)?;
        writeln!(w, "Total incidents: {}", self.total_incidents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_cached_report() {
        colored::control::set_override(false);
        let report = RunReport {
            model: "ST.json".to_owned(),
            last_edit: "1.000000000".to_owned(),
            from_cache: true,
            run_id: None,
            elapsed_ms: None,
            total_incidents: 3,
            detectors: vec![DetectorRunEntry {
                name: "Too Many Literals".to_owned(),
                incidents: 3,
                time_ms: None,
            }],
            failures: Vec::new(),
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("cached results"));
        assert!(output.contains("Too Many Literals"));
        assert!(output.contains("Total incidents: 3"));
    }

    #[test]
    fn test_render_failures() {
        colored::control::set_override(false);
        let report = RunReport {
            model: "ST.json".to_owned(),
            last_edit: "1.000000000".to_owned(),
            from_cache: false,
            run_id: Some("run".to_owned()),
            elapsed_ms: Some(1.5),
            total_incidents: 0,
            detectors: Vec::new(),
            failures: vec![FailureEntry {
                name: "slow".to_owned(),
                error: "detector 'slow' timed out after 5s".to_owned(),
            }],
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("FAILED slow: detector 'slow' timed out after 5s"));
        assert!(output.contains("1.50 ms"));
    }
}
