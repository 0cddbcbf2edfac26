//! The machine data model (MDM): fully resolved graphs.
//!
//! Every field of these types holds a value. Instances are only
//! created by [`resolve`](crate::resolve()) and cannot be mutated
//! afterwards.

use crate::equivalence::{Mismatch, Tolerance};
use crate::input::Metadata;
use crate::time::*;
use crate::validate::ValidationError;
use crate::CloningRate;
use crate::DemeSize;
use crate::DemesError;
use crate::MigrationRate;
use crate::Proportion;
use crate::SelfingRate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

pub(crate) type DemeMap = HashMap<String, usize>;

macro_rules! get_deme {
    ($name: expr, $deme_map: expr, $demes: expr) => {
        match $deme_map.get($name) {
            Some(index) => $demes.get(*index),
            None => None,
        }
    };
}

/// Specify how deme sizes change during an [`Epoch`](crate::Epoch).
///
/// # Examples
///
/// ```
/// let yaml = "
/// time_units: years
/// generation_time: 25
/// description:
///   A deme of 50 individuals that grew to 100 individuals
///   in the last 100 years.
///   Default behavior is that size changes are exponential.
/// demes:
///  - name: deme
///    epochs:
///     - start_size: 50
///       end_time: 100
///     - start_size: 50
///       end_size: 100
/// ";
/// let graph = demes_resolver::loads(yaml).unwrap();
/// let deme = graph.get_deme("deme").unwrap();
/// assert_eq!(deme.num_epochs(), 2);
/// let last_epoch = deme.get_epoch(1).unwrap();
/// assert!(matches!(last_epoch.size_function(),
///                  demes_resolver::SizeFunction::Exponential));
/// let first_epoch = deme.get_epoch(0).unwrap();
/// assert!(matches!(first_epoch.size_function(),
///                  demes_resolver::SizeFunction::Constant));
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SizeFunction {
    #[allow(missing_docs)]
    Constant,
    #[allow(missing_docs)]
    Exponential,
    #[allow(missing_docs)]
    Linear,
}

impl Display for SizeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            SizeFunction::Constant => "constant",
            SizeFunction::Linear => "linear",
            SizeFunction::Exponential => "exponential",
        };
        write!(f, "{value}")
    }
}

/// A deme can be identified as an index
/// or as a name
#[derive(Copy, Clone, Debug)]
pub enum DemeId<'name> {
    /// The index of a deme
    Index(usize),
    /// The name of a deme
    Name(&'name str),
}

impl<'name> From<usize> for DemeId<'name> {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl<'name> From<&'name str> for DemeId<'name> {
    fn from(value: &'name str) -> Self {
        Self::Name(value)
    }
}

/// A resolved epoch
///
/// The epoch covers `[end_time, start_time)`, where the start
/// time is the previous epoch's end time (or the deme's start
/// time for the first epoch).
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Epoch {
    #[serde(skip)]
    pub(crate) start_time: Time,
    pub(crate) end_time: Time,
    pub(crate) start_size: DemeSize,
    pub(crate) end_size: DemeSize,
    pub(crate) size_function: SizeFunction,
    pub(crate) cloning_rate: CloningRate,
    pub(crate) selfing_rate: SelfingRate,
}

impl Epoch {
    /// The resolved size function
    pub fn size_function(&self) -> SizeFunction {
        self.size_function
    }

    /// The resolved selfing rate
    pub fn selfing_rate(&self) -> SelfingRate {
        self.selfing_rate
    }

    /// The resolved cloning rate
    pub fn cloning_rate(&self) -> CloningRate {
        self.cloning_rate
    }

    /// The resolved start time
    pub fn start_time(&self) -> Time {
        self.start_time
    }

    /// The resolved end time
    pub fn end_time(&self) -> Time {
        self.end_time
    }

    /// The resolved start size
    pub fn start_size(&self) -> DemeSize {
        self.start_size
    }

    /// The resolved end size
    pub fn end_size(&self) -> DemeSize {
        self.end_size
    }

    /// The resolved time interval
    pub fn time_interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_time, self.end_time)
    }
}

/// An ancestor of a [`Deme`].
#[derive(Clone, Debug, PartialEq)]
pub struct Ancestor {
    pub(crate) name: String,
    pub(crate) proportion: Proportion,
    pub(crate) index: Option<usize>,
}

impl Ancestor {
    /// The ancestor's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fraction of the descendant's initial ancestry
    /// contributed by this ancestor.
    pub fn proportion(&self) -> Proportion {
        self.proportion
    }

    /// Index of the ancestor in [`Graph::demes`].
    ///
    /// `None` if no deme has this name.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// A resolved deme.
#[derive(Clone, Debug, PartialEq)]
pub struct Deme {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) start_time: Time,
    pub(crate) ancestors: Vec<Ancestor>,
    pub(crate) epochs: Vec<Epoch>,
}

// Ancestors are stored with their proportions but
// the document format keeps them in two parallel lists.
impl Serialize for Deme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Deme", 6)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("start_time", &self.start_time)?;
        state.serialize_field("ancestors", &self.ancestor_names().collect::<Vec<_>>())?;
        state.serialize_field("proportions", &self.proportions().collect::<Vec<_>>())?;
        state.serialize_field("epochs", &self.epochs)?;
        state.end()
    }
}

impl Deme {
    /// The deme's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The deme's description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The resolved start time
    pub fn start_time(&self) -> Time {
        self.start_time
    }

    /// The end time of the most recent epoch
    pub fn end_time(&self) -> Time {
        self.epochs
            .last()
            .map_or(self.start_time, |epoch| epoch.end_time)
    }

    /// The time interval over which the deme exists
    pub fn time_interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_time(), self.end_time())
    }

    /// The deme's ancestors, in input order.
    pub fn ancestors(&self) -> &[Ancestor] {
        &self.ancestors
    }

    /// Number of ancestors
    pub fn num_ancestors(&self) -> usize {
        self.ancestors.len()
    }

    /// Iterate over ancestor names.
    pub fn ancestor_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.ancestors.iter().map(|a| a.name())
    }

    /// Iterate over ancestry proportions.
    pub fn proportions(&self) -> impl Iterator<Item = Proportion> + '_ {
        self.ancestors.iter().map(|a| a.proportion())
    }

    /// The resolved epochs, oldest first.
    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    /// Number of epochs
    pub fn num_epochs(&self) -> usize {
        self.epochs.len()
    }

    /// Get the `epoch`-th [`Epoch`], if it exists.
    pub fn get_epoch(&self, epoch: usize) -> Option<Epoch> {
        self.epochs.get(epoch).copied()
    }

    /// Start size of the oldest epoch
    pub fn start_size(&self) -> Option<DemeSize> {
        self.epochs.first().map(|epoch| epoch.start_size)
    }

    /// End size of the most recent epoch
    pub fn end_size(&self) -> Option<DemeSize> {
        self.epochs.last().map(|epoch| epoch.end_size)
    }
}

/// An asymmetric migration epoch.
///
/// All input migrations are resolved to asymmetric migration instances.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AsymmetricMigration {
    pub(crate) source: String,
    pub(crate) dest: String,
    pub(crate) start_time: Time,
    pub(crate) end_time: Time,
    pub(crate) rate: MigrationRate,
}

impl AsymmetricMigration {
    /// Get name of the source deme
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get name of the destination deme
    pub fn dest(&self) -> &str {
        &self.dest
    }

    /// Get the resolved migration rate
    pub fn rate(&self) -> MigrationRate {
        self.rate
    }

    /// Resolved start [`Time`](crate::Time) of the migration epoch
    pub fn start_time(&self) -> Time {
        self.start_time
    }

    /// Resolved end [`Time`](crate::Time) of the migration epoch
    pub fn end_time(&self) -> Time {
        self.end_time
    }

    /// Resolved time interval of the migration epoch
    pub fn time_interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_time(), self.end_time())
    }
}

/// An instantaneous pulse of migration.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Pulse {
    pub(crate) sources: Vec<String>,
    pub(crate) dest: String,
    pub(crate) time: Time,
    pub(crate) proportions: Vec<Proportion>,
}

impl Pulse {
    /// Resolved time of the pulse
    pub fn time(&self) -> Time {
        self.time
    }

    /// Resolved pulse source demes as slice
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Resolved pulse destination deme
    pub fn dest(&self) -> &str {
        &self.dest
    }

    /// Resolved pulse proportions
    pub fn proportions(&self) -> &[Proportion] {
        &self.proportions
    }
}

/// A resolved demes Graph.
///
/// Used as the input for simulations, etc..
///
/// # Initializations
///
/// A graph cannot be directly initialized. See:
/// * [`load`](crate::load)
/// * [`loads`](crate::loads)
/// * [`resolve`](crate::resolve())
///
/// # Serialization
///
/// Fields are written in a fixed order. Empty `doi`, `metadata`,
/// `migrations` and `pulses` are left out.
#[derive(Serialize, Debug, Clone)]
pub struct Graph {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) doi: Vec<String>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub(crate) metadata: Metadata,
    pub(crate) time_units: TimeUnits,
    pub(crate) generation_time: GenerationTime,
    pub(crate) demes: Vec<Deme>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) migrations: Vec<AsymmetricMigration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) pulses: Vec<Pulse>,
    #[serde(skip)]
    pub(crate) deme_map: DemeMap,
}

// NOTE: the deme map is derived from the demes
// and is left out of the comparison.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.doi == other.doi
            && self.metadata == other.metadata
            && self.time_units == other.time_units
            && self.generation_time == other.generation_time
            && self.demes == other.demes
            && self.migrations == other.migrations
            && self.pulses == other.pulses
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let yaml = self.as_string().map_err(|_| std::fmt::Error)?;
        write!(f, "{yaml}")
    }
}

impl Graph {
    /// The number of [`Deme`](crate::Deme) instances in the graph.
    pub fn num_demes(&self) -> usize {
        self.demes.len()
    }

    /// Get the [`Deme`](crate::Deme) at identifier `id`.
    ///
    /// # Returns
    ///
    /// * `Some(&[`Deme`])` if `id` is valid
    /// * `None` otherwise
    pub fn get_deme<'name, I: Into<DemeId<'name>>>(&self, id: I) -> Option<&Deme> {
        match id.into() {
            DemeId::Index(i) => self.demes.get(i),
            DemeId::Name(name) => get_deme!(name, &self.deme_map, &self.demes),
        }
    }

    /// Index of the deme called `name`.
    ///
    /// If a name appears more than once, the first
    /// occurrence is returned.
    pub fn deme_index(&self, name: &str) -> Option<usize> {
        self.deme_map.get(name).copied()
    }

    /// Get the [`Deme`](crate::Deme) instances via a slice.
    pub fn demes(&self) -> &[Deme] {
        &self.demes
    }

    /// Names of all demes, in input order.
    pub fn deme_names(&self) -> Box<[&str]> {
        self.demes
            .iter()
            .map(|deme| deme.name())
            .collect::<Vec<&str>>()
            .into_boxed_slice()
    }

    /// Get the [`GenerationTime`](crate::GenerationTime) for the graph.
    pub fn generation_time(&self) -> GenerationTime {
        self.generation_time
    }

    /// Get the [`TimeUnits`](crate::TimeUnits) for the graph.
    pub fn time_units(&self) -> TimeUnits {
        self.time_units.clone()
    }

    /// Get the directed migrations of the graph.
    pub fn migrations(&self) -> &[AsymmetricMigration] {
        &self.migrations
    }

    /// Get the pulse events for the graph, most ancient first.
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Get a copy of the top-level [`Metadata`](crate::Metadata).
    pub fn metadata(&self) -> Option<Metadata> {
        if self.metadata.is_empty() {
            None
        } else {
            Some(self.metadata.clone())
        }
    }

    /// Return the description field.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Return an iterator over DOI information.
    pub fn doi(&self) -> impl Iterator<Item = &str> {
        self.doi.iter().map(|s| s.as_str())
    }

    /// Return the canonical representation of the graph as a string.
    ///
    /// The format is in YAML and corresponds to the MDM
    /// representation of the data.
    ///
    /// # Error
    ///
    /// Will return an error if `serde_yaml::to_string`
    /// returns an error.
    pub fn as_string(&self) -> Result<String, DemesError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Return a representation of the graph as a string.
    ///
    /// The format is in JSON and corresponds to the MDM
    /// representation of the data.
    ///
    /// # Error
    ///
    /// Will return an error if `serde_json::to_string`
    /// returns an error.
    #[cfg(feature = "json")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
    pub fn as_json_string(&self) -> Result<String, DemesError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check every invariant of a resolved graph.
    ///
    /// See [`validate`](crate::validate()).
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate(self)
    }

    /// Compare with another graph.
    ///
    /// See [`equivalent`](crate::equivalent).
    pub fn equivalent(&self, other: &Self, tolerance: &Tolerance) -> Result<(), Mismatch> {
        crate::equivalence::equivalent(self, other, tolerance)
    }

    /// `true` if the two graphs describe the same demographic
    /// history within the default [`Tolerance`].
    pub fn is_close(&self, other: &Self) -> bool {
        self.equivalent(other, &Tolerance::default()).is_ok()
    }
}
