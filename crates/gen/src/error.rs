//! Generation error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Errors the generation engine can surface.
///
/// Every failure is deterministic and reproducible from the same schema set;
/// the engine never retries, and any failure before the final writes aborts
/// the run with no output committed.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The registry holds no collection-rooted models. Emission is refused
    /// instead of producing vacuous files.
    #[error("no collection models in registry; nothing to generate")]
    EmptyRegistry,

    /// Strict mode only: a type descriptor fell outside every rendering rule.
    /// The default policy widens such types to `Any` instead.
    #[error("cannot render type for {model}.{path}: {reason}")]
    UnrenderableType {
        model: String,
        path: String,
        reason: String,
    },

    /// Writing a generated file failed. Both texts are fully built before the
    /// first write, and a failed first write aborts before the second, so a
    /// half-consistent pair is never produced by this engine.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
