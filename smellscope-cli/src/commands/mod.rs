pub mod config;
pub mod detectors;
pub mod run;
pub mod show;
pub mod stats;

use smellscope_core::config::SmellscopeConfig;
use smellscope_core::model::ModelFingerprint;
use smellscope_core::types::Incident;
use smellscope_engine::IncidentCache;

use crate::error::CliError;

/// Read the cached incidents for the current model.
///
/// Only the model's fingerprint is computed; the model itself is not parsed.
pub(crate) async fn load_cached(
    config: &SmellscopeConfig,
) -> Result<(ModelFingerprint, Vec<Incident>), CliError> {
    let fingerprint = ModelFingerprint::of_file(&config.paths.model).await?;
    match IncidentCache::new(&config.paths.cache).load(&fingerprint).await {
        Some(incidents) => Ok((fingerprint, incidents)),
        None => Err(CliError::NoResults {
            model: fingerprint.file,
        }),
    }
}
