//! `smellscope show` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use smellscope_core::config::SmellscopeConfig;
use smellscope_core::stats::{SortKey, SortOrder, sort_incidents};
use smellscope_core::types::Incident;

use crate::cli::ShowArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, level_label};

/// Execute the `show` command.
pub async fn execute(
    args: ShowArgs,
    config: &SmellscopeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let (fingerprint, incidents) = super::load_cached(config).await?;
    let report = IncidentListReport::build(
        fingerprint.file,
        &incidents,
        args.sort.into(),
        args.order.into(),
        args.min_level,
        args.limit,
    );
    writer.render(&report)
}

#[derive(Debug, Serialize)]
pub struct IncidentListReport {
    pub model: String,
    pub total: usize,
    pub shown: usize,
    pub sort: String,
    pub order: String,
    pub incidents: Vec<Incident>,
}

impl IncidentListReport {
    pub fn build(
        model: String,
        incidents: &[Incident],
        sort: SortKey,
        order: SortOrder,
        min_level: u8,
        limit: Option<usize>,
    ) -> Self {
        let filtered: Vec<Incident> = incidents
            .iter()
            .filter(|i| i.lvl >= min_level)
            .cloned()
            .collect();
        let mut sorted = sort_incidents(&filtered, sort, order);
        if let Some(limit) = limit {
            sorted.truncate(limit);
        }

        Self {
            model,
            total: incidents.len(),
            shown: sorted.len(),
            sort: sort.to_string(),
            order: order.to_string(),
            incidents: sorted,
        }
    }
}

impl Render for IncidentListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.incidents.is_empty() {
            writeln!(w, "No incidents ({} total).", self.total)?;
            return Ok(());
        }

        writeln!(
            w,
            "{} ({} of {}, by {} {})",
            "Incidents".bold(),
            self.shown,
            self.total,
            self.sort,
            self.order
        )?;
        writeln!(
            w,
            "{:>3}  {:<24} {:<20} {:<28} {}",
            "LVL", "SMELL", "CLASS", "LOCATION", "NOTE"
        )?;
        for incident in &self.incidents {
            writeln!(
                w,
                "{:>3}  {:<24} {:<20} {:<28} {}",
                level_label(incident.lvl),
                incident.smell,
                incident.src.structure_id,
                incident.src.to_string(),
                incident.msg
            )?;
        }
        Ok(())
    }
}
