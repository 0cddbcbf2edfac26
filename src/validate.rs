//! Invariants of a resolved [`Graph`].
//!
//! Every check runs, even after an earlier one has failed, and every
//! problem found is reported. Items whose prerequisites already failed
//! (an unknown deme, a broken epoch) are skipped by later checks so a
//! single mistake is not reported over and over.

use crate::path::FieldPath;
use crate::specification::{Deme, Graph, SizeFunction};
use crate::time::TimeUnits;
use crate::traits::Validate;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

// Sums of proportions and of migration rates may exceed
// their bound by this much.
const SUM_TOLERANCE: f64 = 1e-9;

/// The checks run by [`validate`], in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Check {
    /// The graph has demes and their names are unique identifiers.
    DemeNames,
    /// Epoch times, sizes, rates and size functions.
    Epochs,
    /// Ancestor names and proportions.
    Ancestors,
    /// Demes start while their ancestors exist.
    JoinTimes,
    /// Migration and pulse endpoints, times and rates.
    MigrationsAndPulses,
    /// No deme is its own (indirect) ancestor.
    AncestryCycles,
    /// Time units and generation time agree.
    Units,
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Check::DemeNames => "deme names",
            Check::Epochs => "epochs",
            Check::Ancestors => "ancestors",
            Check::JoinTimes => "join times",
            Check::MigrationsAndPulses => "migrations and pulses",
            Check::AncestryCycles => "ancestry cycles",
            Check::Units => "units",
        };
        write!(f, "{value}")
    }
}

/// A single broken invariant.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    check: Check,
    path: FieldPath,
    message: String,
}

impl Violation {
    /// The check that failed.
    pub fn check(&self) -> Check {
        self.check
    }

    /// The offending field.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    #[allow(missing_docs)]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.check, self.path, self.message)
    }
}

/// Every invariant a graph breaks.
///
/// The list is never empty and is ordered by [`Check`].
///
/// # Example
///
/// ```
/// let yaml = "
/// demes:
///  - name: A
///    start_time: 50
///    epochs:
///     - start_size: 100
///       end_time: 100
/// ";
/// match demes_resolver::loads(yaml) {
///     Err(demes_resolver::DemesError::ValidationError(e)) => {
///         assert_eq!(e.violations()[0].check(), demes_resolver::Check::Epochs);
///     }
///     _ => panic!("expected a validation error"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// The violations, in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// `true` if `check` failed.
    pub fn failed(&self, check: Check) -> bool {
        self.violations.iter().any(|v| v.check == check)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {violation}")?;
        }
        Ok(())
    }
}

/// Check every invariant of a resolved graph.
///
/// # Errors
///
/// [`ValidationError`] listing every violation found.
pub fn validate(graph: &Graph) -> Result<(), ValidationError> {
    let mut validator = Validator::new(graph);
    validator.deme_names();
    validator.epochs();
    validator.ancestors();
    validator.join_times();
    validator.migrations();
    validator.pulses();
    validator.ancestry_cycles();
    validator.units();

    if validator.violations.is_empty() {
        Ok(())
    } else {
        debug!(
            num_violations = validator.violations.len(),
            "graph failed validation"
        );
        Err(ValidationError {
            violations: validator.violations,
        })
    }
}

struct Validator<'graph> {
    graph: &'graph Graph,
    violations: Vec<Violation>,
    // Demes (by index) whose epochs are broken.
    // Their time intervals cannot be trusted.
    broken_epochs: HashSet<usize>,
    // Demes (by index) whose ancestors are broken.
    broken_ancestors: HashSet<usize>,
}

impl<'graph> Validator<'graph> {
    fn new(graph: &'graph Graph) -> Self {
        Self {
            graph,
            violations: vec![],
            broken_epochs: HashSet::new(),
            broken_ancestors: HashSet::new(),
        }
    }

    fn report<M: Into<String>>(&mut self, check: Check, path: FieldPath, message: M) {
        self.violations.push(Violation {
            check,
            path,
            message: message.into(),
        })
    }

    // A deme that can be used as an endpoint in later checks.
    fn usable_deme(&self, name: &str) -> Option<&'graph Deme> {
        let graph: &'graph Graph = self.graph;
        let index = graph.deme_index(name)?;
        if self.broken_epochs.contains(&index) {
            None
        } else {
            graph.demes().get(index)
        }
    }

    // Names must be valid Python identifiers
    // https://docs.python.org/3/reference/lexical_analysis.html#identifiers
    fn deme_names(&mut self) {
        let graph = self.graph;
        if graph.demes().is_empty() {
            self.report(
                Check::DemeNames,
                FieldPath::root().field("demes"),
                "graph must have at least one deme",
            );
            return;
        }
        let python_identifier = match regex::Regex::new(r"^[^\d\W]\w*$") {
            Ok(p) => Some(p),
            Err(e) => {
                self.report(
                    Check::DemeNames,
                    FieldPath::root(),
                    format!("failed to build identifier pattern: {e}"),
                );
                None
            }
        };
        let mut seen = HashSet::new();
        for (i, deme) in graph.demes().iter().enumerate() {
            let path = FieldPath::root().field("demes").index(i).field("name");
            if let Some(pattern) = &python_identifier {
                if !pattern.is_match(deme.name()) {
                    self.report(
                        Check::DemeNames,
                        path.clone(),
                        format!("invalid deme name: {:?}", deme.name()),
                    );
                }
            }
            if !seen.insert(deme.name()) {
                self.report(
                    Check::DemeNames,
                    path,
                    format!("duplicate deme name: {}", deme.name()),
                );
            }
        }
    }

    fn epochs(&mut self) {
        let graph = self.graph;
        for (index, deme) in graph.demes().iter().enumerate() {
            let before = self.violations.len();
            let path = FieldPath::deme(deme.name());

            let start_time = deme.start_time();
            if let Err(message) = start_time.validate(|m| m) {
                self.report(Check::Epochs, path.clone().field("start_time"), message);
            } else if start_time <= 0.0 {
                self.report(
                    Check::Epochs,
                    path.clone().field("start_time"),
                    "start_time must be greater than 0",
                );
            }

            if deme.epochs().is_empty() {
                self.report(
                    Check::Epochs,
                    path.clone().field("epochs"),
                    "deme must have at least one epoch",
                );
            }

            for (i, epoch) in deme.epochs().iter().enumerate() {
                let path = path.clone().field("epochs").index(i);
                let end_time = epoch.end_time();
                if let Err(message) = end_time.validate(|m| m) {
                    self.report(Check::Epochs, path.clone().field("end_time"), message);
                } else if !end_time.is_finite() {
                    self.report(
                        Check::Epochs,
                        path.clone().field("end_time"),
                        "end_time must be finite",
                    );
                }
                if !epoch.time_interval().duration_greater_than_zero() {
                    self.report(
                        Check::Epochs,
                        path.clone().field("end_time"),
                        format!(
                            "time ordering: epoch start_time ({}) must be greater than end_time ({})",
                            epoch.start_time(),
                            end_time
                        ),
                    );
                }

                let sizes = [
                    ("start_size", epoch.start_size()),
                    ("end_size", epoch.end_size()),
                ];
                for (field, size) in sizes {
                    if let Err(message) = size.validate(|m| m) {
                        self.report(Check::Epochs, path.clone().field(field), message);
                    }
                }
                if let Err(message) = epoch.cloning_rate().validate(|m| m) {
                    self.report(Check::Epochs, path.clone().field("cloning_rate"), message);
                }
                if let Err(message) = epoch.selfing_rate().validate(|m| m) {
                    self.report(Check::Epochs, path.clone().field("selfing_rate"), message);
                }

                let same_size = epoch.start_size() == epoch.end_size();
                let constant = epoch.size_function() == SizeFunction::Constant;
                if constant && !same_size {
                    self.report(
                        Check::Epochs,
                        path.clone().field("size_function"),
                        "constant size function requires start_size == end_size",
                    );
                } else if !constant && same_size {
                    self.report(
                        Check::Epochs,
                        path.clone().field("size_function"),
                        format!(
                            "{} size function requires start_size != end_size",
                            epoch.size_function()
                        ),
                    );
                }
                if i == 0 && epoch.start_time().is_infinite() && !same_size {
                    self.report(
                        Check::Epochs,
                        path,
                        "an epoch with an infinite start_time must have a constant size",
                    );
                }
            }

            if self.violations.len() > before {
                self.broken_epochs.insert(index);
            }
        }
    }

    fn ancestors(&mut self) {
        let graph = self.graph;
        for (index, deme) in graph.demes().iter().enumerate() {
            let before = self.violations.len();
            let path = FieldPath::deme(deme.name());
            let mut seen = HashSet::new();
            for (j, ancestor) in deme.ancestors().iter().enumerate() {
                let ancestor_path = path.clone().field("ancestors").index(j);
                if ancestor.name() == deme.name() {
                    self.report(
                        Check::Ancestors,
                        ancestor_path.clone(),
                        "a deme cannot be its own ancestor",
                    );
                } else if ancestor.index().is_none() {
                    self.report(
                        Check::Ancestors,
                        ancestor_path.clone(),
                        format!("ancestor {} does not exist", ancestor.name()),
                    );
                }
                if !seen.insert(ancestor.name()) {
                    self.report(
                        Check::Ancestors,
                        ancestor_path,
                        format!("duplicate ancestor: {}", ancestor.name()),
                    );
                }
                if let Err(message) = ancestor.proportion().validate(|m| m) {
                    self.report(
                        Check::Ancestors,
                        path.clone().field("proportions").index(j),
                        message,
                    );
                }
            }
            if deme.num_ancestors() > 0 {
                let sum: f64 = deme.proportions().map(f64::from).sum();
                if !((sum - 1.0).abs() <= SUM_TOLERANCE) {
                    self.report(
                        Check::Ancestors,
                        path.field("proportions"),
                        format!("proportions must sum to 1.0, got: {sum}"),
                    );
                }
            }
            if self.violations.len() > before {
                self.broken_ancestors.insert(index);
            }
        }
    }

    fn join_times(&mut self) {
        let graph = self.graph;
        for (index, deme) in graph.demes().iter().enumerate() {
            if deme.num_ancestors() == 0
                || self.broken_ancestors.contains(&index)
                || self.broken_epochs.contains(&index)
            {
                continue;
            }
            let path = FieldPath::deme(deme.name());
            let start_time = deme.start_time();
            if !start_time.is_finite() {
                self.report(
                    Check::JoinTimes,
                    path.field("start_time"),
                    "a deme with ancestors must have a finite start_time",
                );
                continue;
            }
            for (j, ancestor) in deme.ancestors().iter().enumerate() {
                let ancestor_deme = match self.usable_deme(ancestor.name()) {
                    Some(ancestor_deme) => ancestor_deme,
                    None => continue,
                };
                if !ancestor_deme.time_interval().contains(start_time) {
                    self.report(
                        Check::JoinTimes,
                        path.clone().field("ancestors").index(j),
                        format!(
                            "ancestor {} does not exist at start_time {} (it exists during {})",
                            ancestor.name(),
                            start_time,
                            ancestor_deme.time_interval()
                        ),
                    );
                }
            }
        }
    }

    fn migrations(&mut self) {
        let graph = self.graph;
        // Migrations that passed their own checks, by index.
        let mut usable = vec![];

        for (i, migration) in graph.migrations().iter().enumerate() {
            let before = self.violations.len();
            let path = FieldPath::root().field("migrations").index(i);

            for (field, name) in [("source", migration.source()), ("dest", migration.dest())] {
                if graph.deme_index(name).is_none() {
                    self.report(
                        Check::MigrationsAndPulses,
                        path.clone().field(field),
                        format!("deme {name} does not exist"),
                    );
                }
            }
            if migration.source() == migration.dest() {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone(),
                    format!("source and dest are both {}", migration.source()),
                );
            }
            if let Err(message) = migration.rate().validate(|m| m) {
                self.report(Check::MigrationsAndPulses, path.clone().field("rate"), message);
            }

            let (start_time, end_time) = (migration.start_time(), migration.end_time());
            let mut times_ok = true;
            for (field, time) in [("start_time", start_time), ("end_time", end_time)] {
                if let Err(message) = time.validate(|m| m) {
                    self.report(Check::MigrationsAndPulses, path.clone().field(field), message);
                    times_ok = false;
                }
            }
            if !end_time.is_finite() {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone().field("end_time"),
                    "end_time must be finite",
                );
                times_ok = false;
            }
            if !migration.time_interval().duration_greater_than_zero() {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone(),
                    format!(
                        "time ordering: start_time ({start_time}) must be greater than end_time ({end_time})"
                    ),
                );
                times_ok = false;
            }

            if times_ok {
                for name in [migration.source(), migration.dest()] {
                    if let Some(deme) = self.usable_deme(name) {
                        if start_time > deme.start_time() || end_time < deme.end_time() {
                            self.report(
                                Check::MigrationsAndPulses,
                                path.clone(),
                                format!(
                                    "migration interval {} is not within the existence of deme {} {}",
                                    migration.time_interval(),
                                    name,
                                    deme.time_interval()
                                ),
                            );
                        }
                    }
                }
            }

            if self.violations.len() > before {
                continue;
            }

            let overlapping = usable.iter().copied().find(|&j: &usize| {
                let other = &graph.migrations()[j];
                other.source() == migration.source()
                    && other.dest() == migration.dest()
                    && other.time_interval().overlaps(&migration.time_interval())
            });
            match overlapping {
                Some(j) => self.report(
                    Check::MigrationsAndPulses,
                    path,
                    format!(
                        "overlaps migrations[{j}] from {} to {}",
                        migration.source(),
                        migration.dest()
                    ),
                ),
                None => usable.push(i),
            }
        }

        self.total_migration_rates(&usable);
    }

    // The total immigration rate into a deme must not exceed 1
    // at any time.
    fn total_migration_rates(&mut self, usable: &[usize]) {
        let graph = self.graph;
        for deme in graph.demes() {
            let incoming = usable
                .iter()
                .map(|&i| &graph.migrations()[i])
                .filter(|m| m.dest() == deme.name())
                .collect::<Vec<_>>();
            if incoming.len() < 2 {
                continue;
            }
            let mut times = incoming
                .iter()
                .flat_map(|m| [f64::from(m.start_time()), f64::from(m.end_time())])
                .collect::<Vec<_>>();
            times.sort_by(|a, b| b.total_cmp(a));
            times.dedup();
            for window in times.windows(2) {
                let (older, younger) = (window[0], window[1]);
                let total: f64 = incoming
                    .iter()
                    .filter(|m| m.start_time() >= older && m.end_time() <= younger)
                    .map(|m| f64::from(m.rate()))
                    .sum();
                if total > 1.0 + SUM_TOLERANCE {
                    self.report(
                        Check::MigrationsAndPulses,
                        FieldPath::deme(deme.name()),
                        format!(
                            "total migration rate into {} is {total} during ({older}, {younger}]",
                            deme.name()
                        ),
                    );
                }
            }
        }
    }

    fn pulses(&mut self) {
        let graph = self.graph;
        for (i, pulse) in graph.pulses().iter().enumerate() {
            let path = FieldPath::root().field("pulses").index(i);
            let mut endpoints_ok = true;

            if pulse.sources().is_empty() {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone().field("sources"),
                    "a pulse needs at least one source",
                );
            }
            let mut seen = HashSet::new();
            for (j, source) in pulse.sources().iter().enumerate() {
                let source_path = path.clone().field("sources").index(j);
                if graph.deme_index(source).is_none() {
                    self.report(
                        Check::MigrationsAndPulses,
                        source_path.clone(),
                        format!("deme {source} does not exist"),
                    );
                    endpoints_ok = false;
                }
                if source == pulse.dest() {
                    self.report(
                        Check::MigrationsAndPulses,
                        source_path.clone(),
                        format!("{source} is both a source and the dest"),
                    );
                }
                if !seen.insert(source.as_str()) {
                    self.report(
                        Check::MigrationsAndPulses,
                        source_path,
                        format!("duplicate source: {source}"),
                    );
                }
            }
            if graph.deme_index(pulse.dest()).is_none() {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone().field("dest"),
                    format!("deme {} does not exist", pulse.dest()),
                );
                endpoints_ok = false;
            }

            if pulse.proportions().len() != pulse.sources().len() {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone().field("proportions"),
                    format!(
                        "{} sources but {} proportions",
                        pulse.sources().len(),
                        pulse.proportions().len()
                    ),
                );
            }
            for (j, proportion) in pulse.proportions().iter().enumerate() {
                if let Err(message) = proportion.validate(|m| m) {
                    self.report(
                        Check::MigrationsAndPulses,
                        path.clone().field("proportions").index(j),
                        message,
                    );
                }
            }
            let sum: f64 = pulse.proportions().iter().copied().map(f64::from).sum();
            if !(sum > 0.0 && sum <= 1.0 + SUM_TOLERANCE) {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone().field("proportions"),
                    format!("proportions must sum to 0 < p <= 1.0, got: {sum}"),
                );
            }

            let time = pulse.time();
            if let Err(message) = time.validate(|m| m) {
                self.report(Check::MigrationsAndPulses, path.clone().field("time"), message);
                continue;
            }
            if !time.is_finite() {
                self.report(
                    Check::MigrationsAndPulses,
                    path.clone().field("time"),
                    "time must be finite",
                );
                continue;
            }
            if !endpoints_ok {
                continue;
            }
            for source in pulse.sources() {
                if let Some(deme) = self.usable_deme(source) {
                    if !deme.time_interval().contains(time) {
                        self.report(
                            Check::MigrationsAndPulses,
                            path.clone().field("time"),
                            format!(
                                "source {source} does not exist at time {time} (it exists during {})",
                                deme.time_interval()
                            ),
                        );
                    }
                }
            }
            if let Some(deme) = self.usable_deme(pulse.dest()) {
                if !deme
                    .time_interval()
                    .contains_inclusive_start_exclusive_end(time)
                {
                    self.report(
                        Check::MigrationsAndPulses,
                        path.field("time"),
                        format!(
                            "dest {} does not exist at time {time} (it exists during {})",
                            pulse.dest(),
                            deme.time_interval()
                        ),
                    );
                }
            }
        }
    }

    // Iterative three-colour depth first search over
    // deme -> ancestor edges.
    fn ancestry_cycles(&mut self) {
        #[derive(Clone, Copy, PartialEq)]
        enum Colour {
            White,
            Grey,
            Black,
        }

        let graph = self.graph;
        let demes = graph.demes();
        let mut colour = vec![Colour::White; demes.len()];

        for root in 0..demes.len() {
            if colour[root] != Colour::White {
                continue;
            }
            colour[root] = Colour::Grey;
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            while let Some(&(node, next)) = stack.last() {
                let ancestors = demes[node].ancestors();
                if next >= ancestors.len() {
                    colour[node] = Colour::Black;
                    stack.pop();
                    continue;
                }
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let child = match ancestors[next].index() {
                    Some(child) if child != node => child,
                    _ => continue,
                };
                match colour[child] {
                    Colour::White => {
                        colour[child] = Colour::Grey;
                        stack.push((child, 0));
                    }
                    Colour::Grey => {
                        let cycle = stack
                            .iter()
                            .map(|&(n, _)| n)
                            .skip_while(|&n| n != child)
                            .chain(std::iter::once(child))
                            .map(|n| demes[n].name())
                            .collect::<Vec<_>>();
                        self.report(
                            Check::AncestryCycles,
                            FieldPath::deme(demes[child].name()).field("ancestors"),
                            format!("ancestry cycle: {}", cycle.join(" -> ")),
                        );
                    }
                    Colour::Black => (),
                }
            }
        }
    }

    fn units(&mut self) {
        let graph = self.graph;
        let generation_time = graph.generation_time();
        let path = FieldPath::root().field("generation_time");
        if let Err(message) = generation_time.validate(|m| m) {
            self.report(Check::Units, path, message);
        } else if graph.time_units() == TimeUnits::Generations && generation_time != 1.0 {
            self.report(
                Check::Units,
                path,
                format!(
                    "generation_time must be 1.0 when time_units are generations, got: {generation_time}"
                ),
            );
        }
    }
}
