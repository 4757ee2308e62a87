//! `smellscope stats` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use smellscope_core::config::SmellscopeConfig;
use smellscope_core::stats::{GroupStats, SmellStats};

use crate::error::CliError;
use crate::output::{OutputWriter, Render, level_label};

/// Execute the `stats` command.
pub async fn execute(config: &SmellscopeConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let (fingerprint, incidents) = super::load_cached(config).await?;
    let report = StatsReport {
        model: fingerprint.file,
        stats: SmellStats::compute(&incidents),
    };
    writer.render(&report)
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub model: String,
    #[serde(flatten)]
    pub stats: SmellStats,
}

fn render_groups(w: &mut dyn Write, title: &str, groups: &[GroupStats]) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", title.bold())?;
    if groups.is_empty() {
        writeln!(w, "  (none)")?;
        return Ok(());
    }
    writeln!(w, "  {:<40} {:>6} {:>4} {:>6}", "", "COUNT", "MAX", "MEAN")?;
    for g in groups {
        let mean = g.total_level as f64 / g.count as f64;
        writeln!(
            w,
            "  {:<40} {:>6} {:>4} {:>6.2}",
            g.key,
            g.count,
            level_label(g.max_level),
            mean
        )?;
    }
    Ok(())
}

impl Render for StatsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let s = &self.stats;
        writeln!(w, "{}", "Overview".bold())?;
        writeln!(w, "  Model:      {}", self.model)?;
        writeln!(w, "  Incidents:  {}", s.total)?;
        writeln!(w, "  Max level:  {}", s.max_level)?;
        writeln!(w, "  Mean level: {:.2}", s.mean_level)?;
        for (lvl, count) in s.by_level.iter().rev() {
            writeln!(w, "    level {:>2}: {count}", lvl)?;
        }

        render_groups(w, "By smell", &s.by_smell)?;
        render_groups(w, "By structure", &s.by_structure)?;
        render_groups(w, "By file", &s.by_file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smellscope_core::types::{Incident, SourceLocation};

    fn incident(smell: &str, structure: &str, lvl: u8) -> Incident {
        let mut i = Incident::new(
            SourceLocation {
                file: format!("{structure}.cpp"),
                line: 1,
                col: 1,
                structure_id: structure.to_owned(),
                method_id: format!("{structure}::f"),
            },
            "m",
            lvl,
        );
        i.smell = smell.to_owned();
        i
    }

    #[test]
    fn test_render_sections() {
        colored::control::set_override(false);
        let report = StatsReport {
            model: "ST.json".to_owned(),
            stats: SmellStats::compute(&[
                incident("literals", "Parser", 10),
                incident("literals", "Lexer", 4),
                incident("locals", "Parser", 6),
            ]),
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");

        assert!(output.contains("Incidents:  3"));
        assert!(output.contains("By smell"));
        assert!(output.contains("By structure"));
        assert!(output.contains("Parser.cpp"));
        assert!(output.contains("level 10: 1"));
    }

    #[test]
    fn test_json_flattens_stats() {
        let report = StatsReport {
            model: "ST.json".to_owned(),
            stats: SmellStats::compute(&[incident("literals", "A", 2)]),
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["model"], "ST.json");
        assert_eq!(json["total"], 1);
        assert_eq!(json["by_smell"][0]["key"], "literals");
    }

    #[test]
    fn test_render_empty_stats() {
        let report = StatsReport {
            model: "ST.json".to_owned(),
            stats: SmellStats::compute(&[]),
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("(none)"));
    }
}
