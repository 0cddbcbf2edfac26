//! Fill in every omitted field of an [`UnresolvedGraph`].
//!
//! Resolution is a sequence of passes over the input. Each pass
//! reads the input and the output of earlier passes and never
//! modifies the input. Values are taken, in order, from the field
//! itself, deme-level defaults, graph-level defaults and finally a
//! built-in default. Nothing is range checked here: that is the job
//! of [`validate`](crate::validate()).

use crate::input::{UnresolvedDeme, UnresolvedEpoch, UnresolvedGraph, UnresolvedMigration};
use crate::path::FieldPath;
use crate::specification::{
    Ancestor, AsymmetricMigration, Deme, DemeMap, Epoch, Graph, Pulse, SizeFunction,
};
use crate::time::{GenerationTime, InputTime, Time, TimeUnits};
use crate::{
    CloningRate, DemeSize, InputCloningRate, InputDemeSize, InputProportion, InputSelfingRate,
    MigrationRate, Proportion, SelfingRate,
};
use thiserror::Error;
use tracing::{debug, instrument, trace};

/// A value that resolution could not fill in.
///
/// # Example
///
/// ```
/// let yaml = "
/// time_units: years
/// demes:
///  - name: A
///    epochs:
///     - start_size: 100
/// ";
/// let unresolved = demes_resolver::UnresolvedGraph::from_yaml_str(yaml).unwrap();
/// let error = demes_resolver::resolve(&unresolved).unwrap_err();
/// assert_eq!(error.path().to_string(), "generation_time");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {message}")]
pub struct ResolutionError {
    path: FieldPath,
    message: String,
}

impl ResolutionError {
    fn new<M: Into<String>>(path: FieldPath, message: M) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Where the value is missing.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// What went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The two shapes of an input migration once graph
/// defaults have been applied.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MigrationEndpoints {
    Symmetric(Vec<String>),
    Asymmetric { source: String, dest: String },
}

impl MigrationEndpoints {
    fn from_input(
        migration: &UnresolvedMigration,
        path: &FieldPath,
    ) -> Result<Self, ResolutionError> {
        match (&migration.demes, &migration.source, &migration.dest) {
            (Some(demes), None, None) => {
                if demes.len() < 2 {
                    Err(ResolutionError::new(
                        path.clone().field("demes"),
                        "symmetric migrations need at least two demes",
                    ))
                } else {
                    Ok(Self::Symmetric(demes.clone()))
                }
            }
            (None, Some(source), Some(dest)) => Ok(Self::Asymmetric {
                source: source.clone(),
                dest: dest.clone(),
            }),
            (Some(_), _, _) => Err(ResolutionError::new(
                path.clone(),
                "demes cannot be combined with source or dest",
            )),
            (None, None, None) => Err(ResolutionError::new(
                path.clone(),
                "either demes or source and dest must be given",
            )),
            (None, None, Some(_)) => Err(ResolutionError::new(
                path.clone().field("source"),
                "source is required when dest is given",
            )),
            (None, Some(_), None) => Err(ResolutionError::new(
                path.clone().field("dest"),
                "dest is required when source is given",
            )),
        }
    }

    fn names(&self) -> Vec<&str> {
        match self {
            Self::Symmetric(demes) => demes.iter().map(|d| d.as_str()).collect(),
            Self::Asymmetric { source, dest } => vec![source.as_str(), dest.as_str()],
        }
    }

    // Directed (source, dest) pairs, a->b then b->a for each i < j.
    fn directed_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::Asymmetric { source, dest } => vec![(source.clone(), dest.clone())],
            Self::Symmetric(demes) => {
                let mut pairs = vec![];
                for (i, a) in demes.iter().enumerate() {
                    for b in demes.iter().skip(i + 1) {
                        pairs.push((a.clone(), b.clone()));
                        pairs.push((b.clone(), a.clone()));
                    }
                }
                pairs
            }
        }
    }
}

/// Resolve a graph.
///
/// Every omitted value is filled in. The result has not been
/// validated; see [`validate`](crate::validate()), or use
/// [`loads`](crate::loads) to do both.
///
/// # Errors
///
/// [`ResolutionError`] when a value is needed and no default applies.
/// Resolution stops at the first such value.
#[instrument(skip_all, name = "resolve")]
pub fn resolve(input: &UnresolvedGraph) -> Result<Graph, ResolutionError> {
    let (time_units, generation_time) = resolve_units(input)?;
    debug!(%time_units, %generation_time, "time units resolved");

    let deme_map = build_deme_map(input);
    debug!(num_demes = input.demes.len(), "deme map built");

    let all_end_times = input
        .demes
        .iter()
        .map(|deme| resolve_end_times(input, deme))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(
        has_epoch_defaults = input.has_epoch_defaults(),
        "epoch end times resolved"
    );

    let mut demes = Vec::with_capacity(input.demes.len());
    for (deme, end_times) in input.demes.iter().zip(&all_end_times) {
        let ancestors = resolve_ancestors(input, deme, &deme_map)?;
        let start_time = resolve_start_time(input, deme, &ancestors, &deme_map, &all_end_times)?;
        let epochs = resolve_epochs(input, deme, start_time, end_times)?;
        trace!(deme = %deme.name, %start_time, num_epochs = epochs.len(), "deme resolved");
        demes.push(Deme {
            name: deme.name.clone(),
            description: deme
                .description
                .clone()
                .or_else(|| input.defaults.deme.description.clone())
                .unwrap_or_default(),
            start_time,
            ancestors,
            epochs,
        });
    }

    let migrations = resolve_migrations(input, &demes, &deme_map)?;
    debug!(num_migrations = migrations.len(), "migrations resolved");

    let pulses = resolve_pulses(input)?;
    debug!(num_pulses = pulses.len(), "pulses resolved");

    Ok(Graph {
        description: input.description.clone(),
        doi: input.doi.clone().unwrap_or_default(),
        metadata: input.metadata.clone(),
        time_units,
        generation_time,
        demes,
        migrations,
        pulses,
        deme_map,
    })
}

fn resolve_units(input: &UnresolvedGraph) -> Result<(TimeUnits, GenerationTime), ResolutionError> {
    let time_units = input.time_units.clone().unwrap_or_default();
    let generation_time = match input.generation_time {
        Some(value) => GenerationTime::from(value),
        None if time_units == TimeUnits::Generations => GenerationTime::default(),
        None => {
            return Err(ResolutionError::new(
                FieldPath::root().field("generation_time"),
                format!("required when time_units are {time_units}"),
            ))
        }
    };
    Ok((time_units, generation_time))
}

// The first occurrence of a name wins.
// Duplicates are reported by the validator.
fn build_deme_map(input: &UnresolvedGraph) -> DemeMap {
    let mut deme_map = DemeMap::default();
    for (i, deme) in input.demes.iter().enumerate() {
        deme_map.entry(deme.name.clone()).or_insert(i);
    }
    deme_map
}

fn input_epochs(deme: &UnresolvedDeme) -> Vec<UnresolvedEpoch> {
    if deme.epochs.is_empty() {
        vec![UnresolvedEpoch::default()]
    } else {
        deme.epochs.clone()
    }
}

fn resolve_end_times(
    input: &UnresolvedGraph,
    deme: &UnresolvedDeme,
) -> Result<Vec<Time>, ResolutionError> {
    let epochs = input_epochs(deme);
    let last = epochs.len() - 1;
    epochs
        .iter()
        .enumerate()
        .map(|(i, epoch)| {
            match epoch
                .end_time
                .or(deme.defaults.epoch.end_time)
                .or(input.defaults.epoch.end_time)
            {
                Some(end_time) => Ok(Time::from(end_time)),
                None if i == last => Ok(Time::from(InputTime::default_epoch_end_time())),
                None => Err(ResolutionError::new(
                    FieldPath::deme(&deme.name)
                        .field("epochs")
                        .index(i)
                        .field("end_time"),
                    "end_time is required for all but the last epoch",
                )),
            }
        })
        .collect()
}

fn resolve_ancestors(
    input: &UnresolvedGraph,
    deme: &UnresolvedDeme,
    deme_map: &DemeMap,
) -> Result<Vec<Ancestor>, ResolutionError> {
    let names = deme
        .ancestors
        .clone()
        .or_else(|| input.defaults.deme.ancestors.clone())
        .unwrap_or_default();
    let mut proportions = deme
        .proportions
        .clone()
        .or_else(|| input.defaults.deme.proportions.clone())
        .unwrap_or_default();
    if proportions.is_empty() && names.len() == 1 {
        proportions.push(InputProportion::from(1.0));
    }
    if proportions.len() != names.len() {
        return Err(ResolutionError::new(
            FieldPath::deme(&deme.name).field("proportions"),
            format!(
                "{} ancestors but {} proportions",
                names.len(),
                proportions.len()
            ),
        ));
    }
    Ok(names
        .into_iter()
        .zip(proportions)
        .map(|(name, proportion)| Ancestor {
            index: deme_map.get(&name).copied(),
            name,
            proportion: Proportion::from(proportion),
        })
        .collect())
}

fn resolve_start_time(
    input: &UnresolvedGraph,
    deme: &UnresolvedDeme,
    ancestors: &[Ancestor],
    deme_map: &DemeMap,
    end_times: &[Vec<Time>],
) -> Result<Time, ResolutionError> {
    if let Some(start_time) = deme.start_time {
        return Ok(Time::from(start_time));
    }
    // An infinite graph-level default cannot apply to a deme
    // that has ancestors, so it is inferred instead.
    match input.defaults.deme.start_time {
        Some(start_time) if !(start_time.is_infinite() && !ancestors.is_empty()) => {
            return Ok(Time::from(start_time))
        }
        _ => (),
    }
    if ancestors.is_empty() {
        return Ok(Time::infinity());
    }

    let path = FieldPath::deme(&deme.name).field("start_time");
    let mut candidate: Option<Time> = None;
    for ancestor in ancestors {
        let end_time = deme_map
            .get(&ancestor.name)
            .and_then(|&index| end_times.get(index))
            .and_then(|times| times.last().copied())
            .ok_or_else(|| {
                ResolutionError::new(
                    path.clone(),
                    format!("cannot infer from unknown ancestor {}", ancestor.name),
                )
            })?;
        match candidate {
            None => candidate = Some(end_time),
            Some(previous) if previous == end_time => (),
            Some(previous) => {
                return Err(ResolutionError::new(
                    path,
                    format!(
                        "ancestors end at different times ({previous} and {end_time}); start_time must be given"
                    ),
                ))
            }
        }
    }
    match candidate {
        Some(time) if time.is_finite() => Ok(time),
        _ => Err(ResolutionError::new(
            path,
            "cannot infer a finite start time from the ancestors",
        )),
    }
}

fn resolve_epochs(
    input: &UnresolvedGraph,
    deme: &UnresolvedDeme,
    start_time: Time,
    end_times: &[Time],
) -> Result<Vec<Epoch>, ResolutionError> {
    let deme_defaults = &deme.defaults.epoch;
    let graph_defaults = &input.defaults.epoch;
    let mut epochs: Vec<Epoch> = Vec::with_capacity(end_times.len());

    for (i, (epoch, &end_time)) in input_epochs(deme).iter().zip(end_times).enumerate() {
        let start_size = epoch
            .start_size
            .or(deme_defaults.start_size)
            .or(graph_defaults.start_size);
        let end_size = epoch
            .end_size
            .or(deme_defaults.end_size)
            .or(graph_defaults.end_size);

        let (start_size, end_size): (InputDemeSize, InputDemeSize) = match epochs.last() {
            None => match (start_size, end_size) {
                (Some(start), Some(end)) => (start, end),
                (Some(size), None) | (None, Some(size)) => (size, size),
                (None, None) => {
                    return Err(ResolutionError::new(
                        FieldPath::deme(&deme.name).field("epochs").index(0),
                        "start_size or end_size is required for the first epoch",
                    ))
                }
            },
            Some(previous) => {
                let start = start_size.unwrap_or_else(|| previous.end_size.into());
                (start, end_size.unwrap_or(start))
            }
        };

        let size_function = match epoch.size_function {
            Some(size_function) => size_function,
            None if start_size == end_size => SizeFunction::Constant,
            None => deme_defaults
                .size_function
                .or(graph_defaults.size_function)
                .unwrap_or(SizeFunction::Exponential),
        };

        let cloning_rate = epoch
            .cloning_rate
            .or(deme_defaults.cloning_rate)
            .or(graph_defaults.cloning_rate)
            .unwrap_or_else(InputCloningRate::default);
        let selfing_rate = epoch
            .selfing_rate
            .or(deme_defaults.selfing_rate)
            .or(graph_defaults.selfing_rate)
            .unwrap_or_else(InputSelfingRate::default);

        let epoch_start_time = epochs
            .last()
            .map_or(start_time, |previous| previous.end_time);
        trace!(deme = %deme.name, epoch = i, %end_time, %size_function, "epoch resolved");
        epochs.push(Epoch {
            start_time: epoch_start_time,
            end_time,
            start_size: DemeSize::from(start_size),
            end_size: DemeSize::from(end_size),
            size_function,
            cloning_rate: CloningRate::from(cloning_rate),
            selfing_rate: SelfingRate::from(selfing_rate),
        });
    }
    Ok(epochs)
}

fn apply_migration_defaults(defaults: &UnresolvedMigration, other: &mut UnresolvedMigration) {
    if other.rate.is_none() {
        other.rate = defaults.rate;
    }
    if other.start_time.is_none() {
        other.start_time = defaults.start_time;
    }
    if other.end_time.is_none() {
        other.end_time = defaults.end_time;
    }
    if other.source.is_none() {
        other.source = defaults.source.clone();
    }
    if other.dest.is_none() {
        other.dest = defaults.dest.clone();
    }
    if other.demes.is_none() {
        other.demes = defaults.demes.clone();
    }
}

fn resolve_migrations(
    input: &UnresolvedGraph,
    demes: &[Deme],
    deme_map: &DemeMap,
) -> Result<Vec<AsymmetricMigration>, ResolutionError> {
    let migrations = if input.migrations.is_empty() && input.has_migration_defaults() {
        vec![input.defaults.migration.clone()]
    } else {
        input.migrations.clone()
    };

    let mut resolved = vec![];
    for (i, mut migration) in migrations.into_iter().enumerate() {
        let path = FieldPath::root().field("migrations").index(i);
        apply_migration_defaults(&input.defaults.migration, &mut migration);
        let endpoints = MigrationEndpoints::from_input(&migration, &path)?;
        let rate = migration
            .rate
            .ok_or_else(|| ResolutionError::new(path.clone().field("rate"), "rate is required"))?;

        let involved = || {
            endpoints
                .names()
                .into_iter()
                .map(|name| {
                    deme_map
                        .get(name)
                        .and_then(|&index| demes.get(index))
                        .ok_or_else(|| {
                            ResolutionError::new(
                                path.clone(),
                                format!("cannot infer times for unknown deme {name}"),
                            )
                        })
                })
                .collect::<Result<Vec<&Deme>, _>>()
        };
        let start_time = match migration.start_time {
            Some(time) => Time::from(time),
            None => involved()?
                .iter()
                .map(|deme| deme.start_time())
                .fold(Time::infinity(), |a, b| if b < a { b } else { a }),
        };
        let end_time = match migration.end_time {
            Some(time) => Time::from(time),
            None => involved()?
                .iter()
                .map(|deme| deme.end_time())
                .fold(Time::from(InputTime::default_epoch_end_time()), |a, b| {
                    if b > a {
                        b
                    } else {
                        a
                    }
                }),
        };

        for (source, dest) in endpoints.directed_pairs() {
            trace!(%source, %dest, %start_time, %end_time, "migration edge");
            resolved.push(AsymmetricMigration {
                source,
                dest,
                start_time,
                end_time,
                rate: MigrationRate::from(rate),
            });
        }
    }
    Ok(resolved)
}

fn resolve_pulses(input: &UnresolvedGraph) -> Result<Vec<Pulse>, ResolutionError> {
    let defaults = &input.defaults.pulse;
    let pulses = if input.pulses.is_empty() && input.has_pulse_defaults() {
        vec![defaults.clone()]
    } else {
        input.pulses.clone()
    };

    let mut resolved = vec![];
    for (i, pulse) in pulses.into_iter().enumerate() {
        let path = FieldPath::root().field("pulses").index(i);
        let missing = |field: &str| {
            ResolutionError::new(path.clone().field(field), format!("{field} is required"))
        };
        let sources = pulse
            .sources
            .or_else(|| defaults.sources.clone())
            .ok_or_else(|| missing("sources"))?;
        let dest = pulse
            .dest
            .or_else(|| defaults.dest.clone())
            .ok_or_else(|| missing("dest"))?;
        let time = pulse.time.or(defaults.time).ok_or_else(|| missing("time"))?;
        let proportions = pulse
            .proportions
            .or_else(|| defaults.proportions.clone())
            .ok_or_else(|| missing("proportions"))?;
        resolved.push(Pulse {
            sources,
            dest,
            time: Time::from(time),
            proportions: proportions.into_iter().map(Proportion::from).collect(),
        });
    }
    // Stable: pulses at the same time keep their input order.
    resolved.sort_by(|a, b| f64::from(b.time).total_cmp(&f64::from(a.time)));
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_str(yaml: &str) -> Result<Graph, ResolutionError> {
        let input = UnresolvedGraph::from_yaml_str(yaml).unwrap();
        resolve(&input)
    }

    #[test]
    fn test_units_default_to_generations() {
        let graph = resolve_str("demes:\n - name: A\n   epochs:\n    - start_size: 1\n")
            .unwrap();
        assert_eq!(graph.time_units(), TimeUnits::Generations);
        assert_eq!(graph.generation_time(), 1.0);
    }

    #[test]
    fn test_years_need_generation_time() {
        let yaml = "
time_units: years
demes:
 - name: A
   epochs:
    - start_size: 1
";
        let error = resolve_str(yaml).unwrap_err();
        assert_eq!(error.path().to_string(), "generation_time");
    }

    #[test]
    fn test_missing_epochs_become_one_epoch() {
        let yaml = "
defaults:
  epoch:
    start_size: 500
demes:
 - name: A
";
        let graph = resolve_str(yaml).unwrap();
        let deme = graph.get_deme("A").unwrap();
        assert_eq!(deme.num_epochs(), 1);
        assert_eq!(deme.start_size().unwrap(), 500.0);
        assert!(deme.start_time().is_infinite());
        assert_eq!(deme.end_time(), 0.0);
    }

    #[test]
    fn test_non_last_epoch_needs_end_time() {
        let yaml = "
demes:
 - name: A
   epochs:
    - start_size: 100
    - start_size: 200
";
        let error = resolve_str(yaml).unwrap_err();
        assert_eq!(error.path().to_string(), "demes[A].epochs[0].end_time");
    }

    #[test]
    fn test_epoch_sizes_carry_forward() {
        let yaml = "
demes:
 - name: A
   epochs:
    - end_size: 100
      end_time: 200
    - end_time: 100
    - end_size: 400
";
        let graph = resolve_str(yaml).unwrap();
        let epochs = graph.get_deme("A").unwrap().epochs();
        assert_eq!(epochs[0].start_size(), 100.0);
        assert_eq!(epochs[1].start_size(), 100.0);
        assert_eq!(epochs[1].end_size(), 100.0);
        assert_eq!(epochs[1].size_function(), SizeFunction::Constant);
        assert_eq!(epochs[2].start_size(), 100.0);
        assert_eq!(epochs[2].end_size(), 400.0);
        assert_eq!(epochs[2].size_function(), SizeFunction::Exponential);
        assert_eq!(epochs[1].start_time(), 200.0);
        assert_eq!(epochs[2].start_time(), 100.0);
    }

    #[test]
    fn test_first_epoch_needs_a_size() {
        let yaml = "
demes:
 - name: A
   epochs:
    - end_time: 0
";
        let error = resolve_str(yaml).unwrap_err();
        assert_eq!(error.path().to_string(), "demes[A].epochs[0]");
    }

    #[test]
    fn test_size_function_defaults() {
        let yaml = "
defaults:
  epoch:
    size_function: linear
demes:
 - name: A
   defaults:
     epoch:
       cloning_rate: 0.25
   epochs:
    - start_size: 100
      end_time: 10
    - end_size: 200
";
        let graph = resolve_str(yaml).unwrap();
        let epochs = graph.get_deme("A").unwrap().epochs();
        assert_eq!(epochs[0].size_function(), SizeFunction::Constant);
        assert_eq!(epochs[1].size_function(), SizeFunction::Linear);
        assert!(epochs.iter().all(|e| e.cloning_rate() == 0.25));
        assert!(epochs.iter().all(|e| e.selfing_rate() == 0.0));
    }

    #[test]
    fn test_single_ancestor_gets_proportion_one() {
        let yaml = "
demes:
 - name: A
   epochs:
    - start_size: 100
      end_time: 100
 - name: B
   ancestors: [A]
   epochs:
    - start_size: 100
";
        let graph = resolve_str(yaml).unwrap();
        let b = graph.get_deme("B").unwrap();
        assert_eq!(b.proportions().collect::<Vec<_>>(), vec![1.0]);
        assert_eq!(b.start_time(), 100.0);
    }

    #[test]
    fn test_proportion_count_mismatch() {
        let yaml = "
demes:
 - name: A
   epochs:
    - start_size: 100
      end_time: 100
 - name: B
   epochs:
    - start_size: 100
      end_time: 100
 - name: C
   ancestors: [A, B]
   epochs:
    - start_size: 100
";
        let error = resolve_str(yaml).unwrap_err();
        assert_eq!(error.path().to_string(), "demes[C].proportions");
    }

    #[test]
    fn test_start_time_from_agreeing_ancestors() {
        let yaml = "
demes:
 - name: A
   epochs:
    - start_size: 100
      end_time: 100
 - name: B
   epochs:
    - start_size: 100
      end_time: 100
 - name: C
   ancestors: [A, B]
   proportions: [0.5, 0.5]
   epochs:
    - start_size: 100
";
        let graph = resolve_str(yaml).unwrap();
        assert_eq!(graph.get_deme("C").unwrap().start_time(), 100.0);
    }

    #[test]
    fn test_start_time_from_disagreeing_ancestors() {
        let yaml = "
demes:
 - name: A
   epochs:
    - start_size: 100
      end_time: 100
 - name: B
   epochs:
    - start_size: 100
      end_time: 50
 - name: C
   ancestors: [A, B]
   proportions: [0.5, 0.5]
   epochs:
    - start_size: 100
";
        let error = resolve_str(yaml).unwrap_err();
        assert_eq!(error.path().to_string(), "demes[C].start_time");
    }

    #[test]
    fn test_start_time_from_unknown_ancestor() {
        let yaml = "
demes:
 - name: B
   ancestors: [A]
   epochs:
    - start_size: 100
";
        let error = resolve_str(yaml).unwrap_err();
        assert_eq!(error.path().to_string(), "demes[B].start_time");
    }

    #[test]
    fn test_deme_defaults() {
        let yaml = "
defaults:
  deme:
    description: a deme
    ancestors: [X]
    start_time: 100
  epoch:
    start_size: 1
demes:
 - name: X
   ancestors: []
   start_time: .inf
   epochs:
    - end_time: 100
 - name: A
 - name: B
   description: not the default
";
        let graph = resolve_str(yaml).unwrap();
        let x = graph.get_deme("X").unwrap();
        assert_eq!(x.num_ancestors(), 0);
        assert!(x.start_time().is_infinite());
        for name in ["A", "B"] {
            let deme = graph.get_deme(name).unwrap();
            assert_eq!(deme.ancestor_names().collect::<Vec<_>>(), vec!["X"]);
            assert_eq!(deme.start_time(), 100.0);
        }
        assert_eq!(graph.get_deme("A").unwrap().description(), "a deme");
        assert_eq!(graph.get_deme("B").unwrap().description(), "not the default");
    }

    #[test]
    fn test_symmetric_migration_expansion() {
        let yaml = "
demes:
 - name: X
   epochs:
    - start_size: 1
 - name: Y
   epochs:
    - start_size: 1
 - name: Z
   start_time: 100
   ancestors: [X]
   epochs:
    - start_size: 1
      end_time: 10
migrations:
 - demes: [X, Y, Z]
   rate: 0.01
";
        let graph = resolve_str(yaml).unwrap();
        let edges = graph
            .migrations()
            .iter()
            .map(|m| (m.source(), m.dest()))
            .collect::<Vec<_>>();
        assert_eq!(
            edges,
            vec![
                ("X", "Y"),
                ("Y", "X"),
                ("X", "Z"),
                ("Z", "X"),
                ("Y", "Z"),
                ("Z", "Y")
            ]
        );
        for m in graph.migrations() {
            assert_eq!(m.rate(), 0.01);
            assert_eq!(m.start_time(), 100.0);
            assert_eq!(m.end_time(), 10.0);
        }
    }

    #[test]
    fn test_migration_defaults() {
        let yaml = "
defaults:
  migration:
    rate: 0.1
    source: A
    dest: B
demes:
 - name: A
   epochs:
    - start_size: 1
 - name: B
   epochs:
    - start_size: 1
";
        let graph = resolve_str(yaml).unwrap();
        assert_eq!(graph.migrations().len(), 1);
        let m = &graph.migrations()[0];
        assert_eq!(m.source(), "A");
        assert!(m.start_time().is_infinite());
        assert_eq!(m.end_time(), 0.0);
    }

    #[test]
    fn test_migration_shape_errors() {
        let both = "
demes:
 - name: A
   epochs:
    - start_size: 1
 - name: B
   epochs:
    - start_size: 1
migrations:
 - demes: [A, B]
   source: A
   rate: 0.1
";
        assert_eq!(resolve_str(both).unwrap_err().path().to_string(), "migrations[0]");

        let no_rate = "
demes:
 - name: A
   epochs:
    - start_size: 1
 - name: B
   epochs:
    - start_size: 1
migrations:
 - source: A
   dest: B
";
        assert_eq!(
            resolve_str(no_rate).unwrap_err().path().to_string(),
            "migrations[0].rate"
        );
    }

    #[test]
    fn test_pulses_sorted_by_decreasing_time() {
        let yaml = "
defaults:
  pulse:
    sources: [A]
    dest: B
    proportions: [0.1]
demes:
 - name: A
   epochs:
    - start_size: 1
 - name: B
   epochs:
    - start_size: 1
pulses:
 - time: 10
 - time: 30
 - time: 20
   proportions: [0.2]
 - time: 20
";
        let graph = resolve_str(yaml).unwrap();
        let times = graph
            .pulses()
            .iter()
            .map(|p| f64::from(p.time()))
            .collect::<Vec<_>>();
        assert_eq!(times, vec![30.0, 20.0, 20.0, 10.0]);
        assert_eq!(graph.pulses()[1].proportions()[0], 0.2);
        assert_eq!(graph.pulses()[2].proportions()[0], 0.1);
    }

    #[test]
    fn test_pulse_missing_time() {
        let yaml = "
demes:
 - name: A
   epochs:
    - start_size: 1
 - name: B
   epochs:
    - start_size: 1
pulses:
 - sources: [A]
   dest: B
   proportions: [0.1]
";
        assert_eq!(
            resolve_str(yaml).unwrap_err().path().to_string(),
            "pulses[0].time"
        );
    }
}
