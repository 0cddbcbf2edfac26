//! The human data model (HDM): graphs as people write them.
//!
//! Every optional field of the demes format is an [`Option`] here.
//! Nothing is filled in or range checked at this stage. See
//! [`resolve`](crate::resolve()) for how the gaps are filled and
//! [`validate`](crate::validate()) for the range checks.

use crate::path::FieldPath;
use crate::specification::SizeFunction;
use crate::time::{InputGenerationTime, InputTime, TimeUnits};
use crate::DemesError;
use crate::InputCloningRate;
use crate::InputDemeSize;
use crate::InputMigrationRate;
use crate::InputProportion;
use crate::InputSelfingRate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// An unresolved epoch.
///
/// This type is also used for the `epoch` entries of
/// [`GraphDefaults`] and [`DemeDefaults`].
///
/// # Examples
///
/// ```
/// let _ = demes_resolver::UnresolvedEpoch{
///              start_size: Some(1e6.into()),
///              ..Default::default()
///              };
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnresolvedEpoch {
    #[allow(missing_docs)]
    pub end_time: Option<InputTime>,
    #[allow(missing_docs)]
    pub start_size: Option<InputDemeSize>,
    #[allow(missing_docs)]
    pub end_size: Option<InputDemeSize>,
    #[allow(missing_docs)]
    pub size_function: Option<SizeFunction>,
    #[allow(missing_docs)]
    pub cloning_rate: Option<InputCloningRate>,
    #[allow(missing_docs)]
    pub selfing_rate: Option<InputSelfingRate>,
}

impl UnresolvedEpoch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An unresolved migration.
///
/// A migration names either `demes` (symmetric) or a
/// `source` and `dest` (asymmetric). Which one it is gets
/// decided during resolution, after graph defaults are applied.
///
/// ```
/// let _ = demes_resolver::UnresolvedMigration{source: Some("A".to_string()),
///                                             dest: Some("B".to_string()),
///                                             rate: Some(0.2.into()),
///                                             ..Default::default()
///                                             };
/// ```
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnresolvedMigration {
    /// The demes involved in symmetric migration epochs
    pub demes: Option<Vec<String>>,
    /// The source deme of an asymmetric migration epoch
    pub source: Option<String>,
    /// The destination deme of an asymmetric migration epoch
    pub dest: Option<String>,
    /// The start time of a migration epoch
    pub start_time: Option<InputTime>,
    /// The end time of a migration epoch
    pub end_time: Option<InputTime>,
    /// The rate during a migration epoch
    pub rate: Option<InputMigrationRate>,
}

impl UnresolvedMigration {
    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An unresolved pulse.
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnresolvedPulse {
    #[allow(missing_docs)]
    pub sources: Option<Vec<String>>,
    #[allow(missing_docs)]
    pub dest: Option<String>,
    #[allow(missing_docs)]
    pub time: Option<InputTime>,
    #[allow(missing_docs)]
    pub proportions: Option<Vec<InputProportion>>,
}

impl UnresolvedPulse {
    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Deme-level defaults
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DemeDefaults {
    #[allow(missing_docs)]
    #[serde(default)]
    pub epoch: UnresolvedEpoch,
}

/// Top-level defaults for a deme.
///
/// This type is used as a member of [`GraphDefaults`].
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TopLevelDemeDefaults {
    #[allow(missing_docs)]
    pub description: Option<String>,
    #[allow(missing_docs)]
    pub start_time: Option<InputTime>,
    #[allow(missing_docs)]
    pub ancestors: Option<Vec<String>>,
    #[allow(missing_docs)]
    pub proportions: Option<Vec<InputProportion>>,
}

/// Top-level defaults
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GraphDefaults {
    #[allow(missing_docs)]
    #[serde(default)]
    pub epoch: UnresolvedEpoch,
    #[allow(missing_docs)]
    #[serde(default)]
    pub migration: UnresolvedMigration,
    #[allow(missing_docs)]
    #[serde(default)]
    pub pulse: UnresolvedPulse,
    #[allow(missing_docs)]
    #[serde(default)]
    pub deme: TopLevelDemeDefaults,
}

/// An unresolved deme.
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnresolvedDeme {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub description: Option<String>,
    // An empty list means "no ancestors", which is not the
    // same as leaving the field out: only an absent field
    // takes the graph-level default.
    #[allow(missing_docs)]
    pub ancestors: Option<Vec<String>>,
    #[allow(missing_docs)]
    pub proportions: Option<Vec<InputProportion>>,
    #[allow(missing_docs)]
    pub start_time: Option<InputTime>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub epochs: Vec<UnresolvedEpoch>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub defaults: DemeDefaults,
}

/// Top-level metadata
///
/// Metadata is carried through resolution untouched.
///
/// # Examples
///
/// ```
/// #[derive(serde::Deserialize)]
/// struct MyMetaData {
///    foo: i32,
///    bar: String
/// }
///
/// let yaml = "
/// time_units: generations
/// metadata:
///  foo: 1
///  bar: bananas
/// demes:
///  - name: A
///    epochs:
///     - start_size: 100
/// ";
///
/// let graph = demes_resolver::loads(yaml).unwrap();
/// let yaml_metadata = graph.metadata().unwrap().as_yaml_string().unwrap();
/// let my_metadata: MyMetaData = serde_yaml::from_str(&yaml_metadata).unwrap();
/// assert_eq!(my_metadata.foo, 1);
/// assert_eq!(&my_metadata.bar, "bananas");
/// ```
#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Metadata {
    metadata: BTreeMap<String, serde_yaml::Value>,
}

impl Metadata {
    /// `true` if there are no metadata entries.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Return the metadata as YAML
    pub fn as_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.metadata)
    }
}

/// An unresolved graph.
///
/// Obtained by parsing a document with [`UnresolvedGraph::from_yaml_str`]
/// and friends, or built directly.
/// Pass it to [`resolve`](crate::resolve()) to get a [`Graph`](crate::Graph).
///
/// # Examples
///
/// ```
/// let yaml = "
/// demes:
///  - name: A
///    epochs:
///     - start_size: 100
/// ";
/// let unresolved = demes_resolver::UnresolvedGraph::from_yaml_str(yaml).unwrap();
/// assert!(unresolved.time_units.is_none());
/// let graph = demes_resolver::resolve(&unresolved).unwrap();
/// assert_eq!(graph.time_units(), demes_resolver::TimeUnits::Generations);
/// ```
#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnresolvedGraph {
    #[allow(missing_docs)]
    pub description: Option<String>,
    #[allow(missing_docs)]
    pub doi: Option<Vec<String>>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub metadata: Metadata,
    #[allow(missing_docs)]
    pub time_units: Option<TimeUnits>,
    #[allow(missing_docs)]
    pub generation_time: Option<InputGenerationTime>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub defaults: GraphDefaults,
    #[allow(missing_docs)]
    pub demes: Vec<UnresolvedDeme>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub migrations: Vec<UnresolvedMigration>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub pulses: Vec<UnresolvedPulse>,
}

impl UnresolvedGraph {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// * [`DemesError::YamlError`] for malformed documents,
    ///   unknown fields and values of the wrong type.
    /// * [`DemesError::ParseError`] for `NaN` values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DemesError> {
        let graph: Self = serde_yaml::from_str(yaml)?;
        graph.reject_nan()?;
        Ok(graph)
    }

    /// Parse a YAML document from a reader.
    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self, DemesError> {
        let graph: Self = serde_yaml::from_reader(reader)?;
        graph.reject_nan()?;
        Ok(graph)
    }

    /// Parse a JSON document.
    ///
    /// JSON cannot encode infinity, so `null` start times
    /// are read as infinite.
    #[cfg(feature = "json")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
    pub fn from_json_str(json: &str) -> Result<Self, DemesError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Parse a JSON document from a reader.
    #[cfg(feature = "json")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, DemesError> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    #[cfg(feature = "json")]
    fn from_json_value(value: serde_json::Value) -> Result<Self, DemesError> {
        let value = crate::process_json::fix_json_input(value)?;
        let graph: Self = serde_json::from_value(value)?;
        graph.reject_nan()?;
        Ok(graph)
    }

    fn reject_nan(&self) -> Result<(), DemesError> {
        let mut numbers: Vec<(FieldPath, Option<f64>)> = vec![];
        let generation_time = FieldPath::root().field("generation_time");
        numbers.push((generation_time, self.generation_time.map(f64::from)));

        let defaults = FieldPath::root().field("defaults");
        epoch_numbers(defaults.clone().field("epoch"), &self.defaults.epoch, &mut numbers);
        migration_numbers(
            defaults.clone().field("migration"),
            &self.defaults.migration,
            &mut numbers,
        );
        pulse_numbers(defaults.clone().field("pulse"), &self.defaults.pulse, &mut numbers);
        let deme_defaults = defaults.field("deme");
        numbers.push((
            deme_defaults.clone().field("start_time"),
            self.defaults.deme.start_time.map(f64::from),
        ));
        proportion_numbers(
            deme_defaults.field("proportions"),
            self.defaults.deme.proportions.as_deref(),
            &mut numbers,
        );

        for deme in &self.demes {
            let path = FieldPath::deme(&deme.name);
            numbers.push((
                path.clone().field("start_time"),
                deme.start_time.map(f64::from),
            ));
            proportion_numbers(
                path.clone().field("proportions"),
                deme.proportions.as_deref(),
                &mut numbers,
            );
            epoch_numbers(
                path.clone().field("defaults").field("epoch"),
                &deme.defaults.epoch,
                &mut numbers,
            );
            for (i, epoch) in deme.epochs.iter().enumerate() {
                epoch_numbers(path.clone().field("epochs").index(i), epoch, &mut numbers);
            }
        }
        for (i, migration) in self.migrations.iter().enumerate() {
            migration_numbers(
                FieldPath::root().field("migrations").index(i),
                migration,
                &mut numbers,
            );
        }
        for (i, pulse) in self.pulses.iter().enumerate() {
            pulse_numbers(FieldPath::root().field("pulses").index(i), pulse, &mut numbers);
        }

        match numbers
            .into_iter()
            .find(|(_, value)| value.map_or(false, f64::is_nan))
        {
            Some((path, _)) => Err(DemesError::ParseError(format!("{path}: value is NaN"))),
            None => Ok(()),
        }
    }

    pub(crate) fn has_migration_defaults(&self) -> bool {
        !self.defaults.migration.is_empty()
    }

    pub(crate) fn has_pulse_defaults(&self) -> bool {
        !self.defaults.pulse.is_empty()
    }

    pub(crate) fn has_epoch_defaults(&self) -> bool {
        !self.defaults.epoch.is_empty()
    }
}

fn epoch_numbers(path: FieldPath, epoch: &UnresolvedEpoch, numbers: &mut Vec<(FieldPath, Option<f64>)>) {
    numbers.push((path.clone().field("end_time"), epoch.end_time.map(f64::from)));
    numbers.push((path.clone().field("start_size"), epoch.start_size.map(f64::from)));
    numbers.push((path.clone().field("end_size"), epoch.end_size.map(f64::from)));
    numbers.push((path.clone().field("cloning_rate"), epoch.cloning_rate.map(f64::from)));
    numbers.push((path.field("selfing_rate"), epoch.selfing_rate.map(f64::from)));
}

fn migration_numbers(
    path: FieldPath,
    migration: &UnresolvedMigration,
    numbers: &mut Vec<(FieldPath, Option<f64>)>,
) {
    numbers.push((path.clone().field("start_time"), migration.start_time.map(f64::from)));
    numbers.push((path.clone().field("end_time"), migration.end_time.map(f64::from)));
    numbers.push((path.field("rate"), migration.rate.map(f64::from)));
}

fn pulse_numbers(path: FieldPath, pulse: &UnresolvedPulse, numbers: &mut Vec<(FieldPath, Option<f64>)>) {
    numbers.push((path.clone().field("time"), pulse.time.map(f64::from)));
    proportion_numbers(path.field("proportions"), pulse.proportions.as_deref(), numbers);
}

fn proportion_numbers(
    path: FieldPath,
    proportions: Option<&[InputProportion]>,
    numbers: &mut Vec<(FieldPath, Option<f64>)>,
) {
    if let Some(proportions) = proportions {
        for (i, p) in proportions.iter().enumerate() {
            numbers.push((path.clone().index(i), Some(f64::from(*p))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document() {
        let yaml = "
demes:
 - name: A
";
        let graph = UnresolvedGraph::from_yaml_str(yaml).unwrap();
        assert_eq!(graph.demes.len(), 1);
        assert!(graph.demes[0].epochs.is_empty());
        assert!(graph.demes[0].ancestors.is_none());
        assert!(graph.migrations.is_empty());
        assert!(!graph.has_epoch_defaults());
    }

    #[test]
    fn test_empty_ancestors_differ_from_absent() {
        let yaml = "
demes:
 - name: A
   ancestors: []
";
        let graph = UnresolvedGraph::from_yaml_str(yaml).unwrap();
        assert_eq!(graph.demes[0].ancestors, Some(vec![]));
    }

    #[test]
    fn test_defaults() {
        let yaml = "
defaults:
  epoch:
    start_size: 1000
  migration:
    rate: 0.1
  deme:
    ancestors: [A]
demes:
 - name: A
   ancestors: []
 - name: B
";
        let graph = UnresolvedGraph::from_yaml_str(yaml).unwrap();
        assert_eq!(graph.defaults.epoch.start_size, Some(1000.0.into()));
        assert!(graph.has_migration_defaults());
        assert!(!graph.has_pulse_defaults());
        assert_eq!(graph.defaults.deme.ancestors, Some(vec!["A".to_string()]));
    }

    #[test]
    #[should_panic]
    fn test_unknown_field() {
        let yaml = "
demes:
 - name: A
   size: 100
";
        let _ = UnresolvedGraph::from_yaml_str(yaml).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_missing_demes() {
        let yaml = "
time_units: generations
";
        let _ = UnresolvedGraph::from_yaml_str(yaml).unwrap();
    }

    #[test]
    fn test_nan_is_a_parse_error() {
        let yaml = "
demes:
 - name: A
   epochs:
    - start_size: .nan
";
        match UnresolvedGraph::from_yaml_str(yaml) {
            Err(DemesError::ParseError(message)) => {
                assert!(message.contains("demes[A].epochs[0].start_size"))
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_metadata_is_opaque() {
        let yaml = "
metadata:
  nested:
    list: [1, 2, 3]
demes:
 - name: A
";
        let graph = UnresolvedGraph::from_yaml_str(yaml).unwrap();
        assert!(!graph.metadata.is_empty());
        assert!(graph.metadata.as_yaml_string().unwrap().contains("nested"));
    }
}
