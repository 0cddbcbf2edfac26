//! Resolve [demes](https://popsim-consortium.github.io/demes-spec-docs/main/introduction.html)
//! demographic models.
//!
//! A demes document may leave most of its fields out. This crate
//! fills every omitted field with its default, checks the result
//! and writes it back out in a canonical form. It can also decide
//! whether two resolved graphs describe the same history.
//!
//! The pipeline is:
//!
//! 1. [`UnresolvedGraph::from_yaml_str`] parses a document.
//! 2. [`resolve()`] fills in the gaps and returns a [`Graph`].
//! 3. [`validate()`] checks the graph.
//! 4. [`Graph::as_string`] writes the canonical YAML.
//!
//! [`loads`] and [`load`] run steps 1 to 3.
//!
//! # Example
//!
//! ```
//! let yaml = "
//! demes:
//!  - name: A
//!    epochs:
//!     - start_size: 1000
//!       end_time: 100
//!  - name: B
//!    ancestors: [A]
//!    epochs:
//!     - start_size: 500
//! ";
//! let graph = demes_resolver::loads(yaml).unwrap();
//! let canonical = graph.as_string().unwrap();
//! let again = demes_resolver::loads(&canonical).unwrap();
//! assert!(graph.is_close(&again));
//! ```
//!
//! # Features
//!
//! * `json`: read and write JSON documents.
//! * `cli`: build the `demes-resolve` command line tool.

#![warn(missing_docs)]
#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod macros;

mod cloning_rate;
mod deme_size;
mod equivalence;
mod error;
mod input;
mod migration_rate;
mod path;
#[cfg(feature = "json")]
mod process_json;
mod proportion;
mod resolve;
mod selfing_rate;
mod specification;
mod time;
mod traits;
mod validate;

pub use cloning_rate::{CloningRate, InputCloningRate};
pub use deme_size::{DemeSize, InputDemeSize};
pub use equivalence::{equivalent, equivalent_str, Mismatch, Tolerance};
pub use error::DemesError;
pub use input::{
    DemeDefaults, GraphDefaults, Metadata, TopLevelDemeDefaults, UnresolvedDeme, UnresolvedEpoch,
    UnresolvedGraph, UnresolvedMigration, UnresolvedPulse,
};
pub use migration_rate::{InputMigrationRate, MigrationRate};
pub use path::FieldPath;
pub use proportion::{InputProportion, Proportion};
pub use resolve::{resolve, ResolutionError};
pub use selfing_rate::{InputSelfingRate, SelfingRate};
pub use specification::{
    Ancestor, AsymmetricMigration, Deme, DemeId, Epoch, Graph, Pulse, SizeFunction,
};
pub use time::{GenerationTime, InputGenerationTime, InputTime, Time, TimeInterval, TimeUnits};
pub use validate::{validate, Check, ValidationError, Violation};

use std::io::Read;

fn resolve_and_validate(input: UnresolvedGraph) -> Result<Graph, DemesError> {
    let graph = resolve(&input)?;
    validate(&graph)?;
    Ok(graph)
}

/// Build a [`Graph`](crate::Graph) from a string.
///
/// The document is parsed, resolved and validated.
///
/// # Arguments
///
/// * `yaml`, a YAML document.
///
/// # Errors
///
/// Returns [`DemesError`](crate::DemesError) if the input is
/// invalid at any of the three stages.
///
/// # Examples
///
/// ```
/// let yaml = "
/// time_units: generations
/// demes:
///  - name: A
///    epochs:
///     - start_size: 100
/// ";
/// let graph = demes_resolver::loads(yaml).unwrap();
/// assert_eq!(graph.num_demes(), 1);
/// ```
pub fn loads(yaml: &str) -> Result<Graph, DemesError> {
    resolve_and_validate(UnresolvedGraph::from_yaml_str(yaml)?)
}

/// Build a [`Graph`](crate::Graph) from a type implementing
/// [`std::io::Read`](std::io::Read).
///
/// # Errors
///
/// Returns [`DemesError`](crate::DemesError) if the input is
/// invalid at any stage, including reading.
///
/// # Examples
///
/// ```
/// let yaml = "
/// time_units: generations
/// demes:
///  - name: A
///    epochs:
///     - start_size: 100
/// ";
/// let reader = std::io::Cursor::new(yaml.as_bytes());
/// let graph = demes_resolver::load(reader).unwrap();
/// assert_eq!(graph.num_demes(), 1);
/// ```
pub fn load<T: Read>(reader: T) -> Result<Graph, DemesError> {
    resolve_and_validate(UnresolvedGraph::from_yaml_reader(reader)?)
}

/// Build a [`Graph`](crate::Graph) from a JSON string.
///
/// # Errors
///
/// Returns [`DemesError`](crate::DemesError) if the input is invalid.
#[cfg(feature = "json")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
pub fn loads_json(json: &str) -> Result<Graph, DemesError> {
    resolve_and_validate(UnresolvedGraph::from_json_str(json)?)
}

/// Build a [`Graph`](crate::Graph) from a reader of JSON.
///
/// # Errors
///
/// Returns [`DemesError`](crate::DemesError) if the input is invalid.
#[cfg(feature = "json")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
pub fn load_json<T: Read>(reader: T) -> Result<Graph, DemesError> {
    resolve_and_validate(UnresolvedGraph::from_json_reader(reader)?)
}
