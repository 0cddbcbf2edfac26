use thiserror::Error;

use crate::equivalence::Mismatch;
use crate::resolve::ResolutionError;
use crate::validate::ValidationError;

/// Error type for this crate.
///
/// Parsing, resolution and validation each have their own
/// variant so that callers can tell at which stage a document
/// was rejected.
///
/// # Example
///
/// This input is incorrect because the epoch fails
/// to define `start_size` or `end_size`.
///
/// ```
/// let yaml = "
/// time_units: generations
/// demes:
///  - name: A
///    epochs:
///     - end_time: 100
/// ";
/// assert!(matches!(
///     demes_resolver::loads(yaml),
///     Err(demes_resolver::DemesError::ResolutionError(_))
/// ));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DemesError {
    #[error(transparent)]
    /// Errors coming from `serde_yaml`: malformed documents,
    /// unknown fields, wrong types.
    YamlError(#[from] serde_yaml::Error),
    #[cfg(feature = "json")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
    #[error(transparent)]
    /// Errors coming from `serde_json`.
    JsonError(#[from] serde_json::Error),
    /// A document that deserialized but cannot describe a graph,
    /// such as a NaN value or a JSON document that is not an object.
    ///
    /// Syntax errors, unknown fields and wrong types are reported
    /// by the deserializer and arrive as
    /// [`YamlError`](DemesError::YamlError) or `JsonError`.
    #[error("{0:?}")]
    ParseError(String),
    #[error(transparent)]
    /// A required value could not be filled in.
    ResolutionError(#[from] ResolutionError),
    #[error(transparent)]
    /// A resolved graph broke one or more invariants.
    ValidationError(#[from] ValidationError),
    #[error(transparent)]
    /// Two graphs are not equivalent.
    EquivalenceMismatch(#[from] Mismatch),
    #[error(transparent)]
    /// Errors reading input.
    IoError(#[from] std::io::Error),
    /// Errors related to low-level types
    #[error("{0:?}")]
    ValueError(String),
}
