//! Output formatting abstraction for text vs JSON rendering
//!
//! All subcommand output flows through [`OutputWriter`] which handles format switching.

use std::io::Write;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use smellscope_core::MAX_SMELL_LEVEL;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes a payload to stdout in the selected format.
///
/// Subcommand handlers call `writer.render(&payload)` where `payload`
/// implements both `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    /// Render a payload to an arbitrary writer.
    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Colour a smell level by how close it is to the maximum.
pub fn level_label(lvl: u8) -> ColoredString {
    let text = format!("{lvl:>2}");
    match lvl {
        0 => text.dimmed(),
        l if l >= MAX_SMELL_LEVEL => text.red().bold(),
        l if l > MAX_SMELL_LEVEL / 2 => text.yellow(),
        _ => text.green(),
    }
}
