#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`registry`]: Detector config file, compiled catalogue, registry (`DetectorRegistry`, `LoadedDetector`)
//! - [`detectors`]: Built-in detectors (`MethodLiterals`, `MethodLocals`, `StructureMethods`)
//! - [`runtime`]: Concurrent, order-preserving detector execution (`DetectorRuntime`, `RunSummary`)
//! - [`cache`]: Fingerprint-keyed incident cache (`IncidentCache`)
//! - [`session`]: Application state for one process (`SmellSession`)
//!
//! # Architecture
//!
//! ```text
//! ST.json ----------> StructuralModel + ModelFingerprint
//!                            |                  |
//! SmellsConfig.json          |                  v
//!      |                     |            IncidentCache --(hit)--> Vec<Incident>
//!      v                     |                  ^
//! DetectorRegistry           v                  | save
//!      |            DetectorRuntime::run_all ---+
//!      +--> Vec<LoadedDetector> ---^    |
//!                                       v
//!                        Vec<IncidentReport> (config order)
//! ```

pub mod cache;
pub mod detectors;
mod json;
pub mod registry;
pub mod runtime;
pub mod session;

// --- Public API Re-exports ---

// Session
pub use session::SmellSession;

// Registry
pub use registry::{
    DetectorCatalog, DetectorConfig, DetectorEntry, DetectorFactory, DetectorRegistry,
    LoadedDetector,
};

// Runtime
pub use runtime::{DetectorFailure, DetectorRuntime, RunSummary};

// Cache
pub use cache::{CacheEntry, IncidentCache};
