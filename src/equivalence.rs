//! Decide whether two resolved graphs describe the same
//! demographic history.
//!
//! Two resolutions of one document may differ in float formatting,
//! the order of demes, migrations or ancestors, and in free text.
//! None of that matters here. Numbers are compared with a
//! [`Tolerance`]; `description`, `doi` and `metadata` are ignored.

use crate::path::FieldPath;
use crate::specification::{AsymmetricMigration, Deme, Graph, Pulse};
use crate::DemesError;
use thiserror::Error;
use tracing::debug;

/// How close two numbers must be to count as equal.
///
/// Values `a` and `b` are close when they are equal (this covers
/// infinities) or when
/// `|a - b| <= max(relative * max(|a|, |b|), absolute)`.
/// `NaN` is never close to anything.
///
/// # Examples
///
/// ```
/// let tolerance = demes_resolver::Tolerance::default();
/// assert!(tolerance.is_close(0.1 + 0.2, 0.3));
/// assert!(tolerance.is_close(f64::INFINITY, f64::INFINITY));
/// assert!(!tolerance.is_close(1.0, 1.001));
/// assert!(!demes_resolver::Tolerance::exact().is_close(0.1 + 0.2, 0.3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Allowed difference relative to the larger magnitude.
    pub relative: f64,
    /// Allowed difference near zero.
    pub absolute: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: 1e-9,
            absolute: 1e-12,
        }
    }
}

impl Tolerance {
    /// Only identical values are close.
    pub fn exact() -> Self {
        Self {
            relative: 0.0,
            absolute: 0.0,
        }
    }

    #[allow(missing_docs)]
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        if !a.is_finite() || !b.is_finite() {
            return false;
        }
        let bound = f64::max(self.relative * f64::max(a.abs(), b.abs()), self.absolute);
        (a - b).abs() <= bound
    }
}

/// The first difference found between two graphs.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("graphs differ at {path}: {left} != {right}")]
pub struct Mismatch {
    path: FieldPath,
    left: String,
    right: String,
}

impl Mismatch {
    fn new<L: ToString, R: ToString>(path: FieldPath, left: L, right: R) -> Self {
        Self {
            path,
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Where the graphs differ.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The value in the first graph.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// The value in the second graph.
    pub fn right(&self) -> &str {
        &self.right
    }
}

/// Compare two resolved graphs.
///
/// The comparison is symmetric and does not depend on the
/// order of demes, ancestors, migrations or pulse sources.
/// Pulses at the same time must come in the same order.
///
/// # Errors
///
/// [`Mismatch`] naming the first difference.
///
/// # Examples
///
/// ```
/// let a = demes_resolver::loads("
/// demes:
///  - name: A
///    epochs:
///     - start_size: 100
///  - name: B
///    epochs:
///     - start_size: 100
/// ").unwrap();
/// let b = demes_resolver::loads("
/// demes:
///  - name: B
///    epochs:
///     - start_size: 100.0000000001
///  - name: A
///    epochs:
///     - start_size: 100
/// ").unwrap();
/// let tolerance = demes_resolver::Tolerance::default();
/// assert!(demes_resolver::equivalent(&a, &b, &tolerance).is_ok());
/// let mismatch = demes_resolver::equivalent(&a, &b, &demes_resolver::Tolerance::exact()).unwrap_err();
/// assert_eq!(mismatch.path().to_string(), "demes[B].epochs[0].start_size");
/// ```
pub fn equivalent(left: &Graph, right: &Graph, tolerance: &Tolerance) -> Result<(), Mismatch> {
    let result = Comparison { tolerance }.graphs(left, right);
    if let Err(mismatch) = &result {
        debug!(%mismatch, "graphs are not equivalent");
    }
    result
}

/// Parse, resolve and validate two YAML documents, then compare them.
///
/// # Errors
///
/// * Any error from [`loads`](crate::loads) for either document.
/// * [`DemesError::EquivalenceMismatch`] if the graphs differ.
pub fn equivalent_str(left: &str, right: &str, tolerance: &Tolerance) -> Result<(), DemesError> {
    let left = crate::loads(left)?;
    let right = crate::loads(right)?;
    equivalent(&left, &right, tolerance)?;
    Ok(())
}

struct Comparison<'t> {
    tolerance: &'t Tolerance,
}

impl<'t> Comparison<'t> {
    fn number<F: Into<f64>>(&self, path: FieldPath, left: F, right: F) -> Result<(), Mismatch> {
        let (left, right) = (left.into(), right.into());
        if self.tolerance.is_close(left, right) {
            Ok(())
        } else {
            Err(Mismatch::new(path, left, right))
        }
    }

    fn exact<T: PartialEq + std::fmt::Display>(
        &self,
        path: FieldPath,
        left: T,
        right: T,
    ) -> Result<(), Mismatch> {
        if left == right {
            Ok(())
        } else {
            Err(Mismatch::new(path, left, right))
        }
    }

    fn count(&self, path: FieldPath, left: usize, right: usize) -> Result<(), Mismatch> {
        if left == right {
            Ok(())
        } else {
            Err(Mismatch::new(
                path,
                format!("{left} entries"),
                format!("{right} entries"),
            ))
        }
    }

    fn graphs(&self, left: &Graph, right: &Graph) -> Result<(), Mismatch> {
        let root = FieldPath::root();
        self.exact(
            root.clone().field("time_units"),
            left.time_units(),
            right.time_units(),
        )?;
        self.number(
            root.clone().field("generation_time"),
            left.generation_time(),
            right.generation_time(),
        )?;

        let left_names = sorted_deme_names(left);
        let right_names = sorted_deme_names(right);
        if left_names != right_names {
            return Err(Mismatch::new(
                root.field("demes"),
                format!("{left_names:?}"),
                format!("{right_names:?}"),
            ));
        }
        for name in left_names {
            if let (Some(l), Some(r)) = (left.get_deme(name), right.get_deme(name)) {
                self.demes(l, r)?;
            }
        }

        self.migrations(left.migrations(), right.migrations())?;
        self.pulses(left.pulses(), right.pulses())
    }

    fn demes(&self, left: &Deme, right: &Deme) -> Result<(), Mismatch> {
        let path = FieldPath::deme(left.name());
        self.number(
            path.clone().field("start_time"),
            left.start_time(),
            right.start_time(),
        )?;

        let mut left_ancestors = left.ancestors().iter().collect::<Vec<_>>();
        let mut right_ancestors = right.ancestors().iter().collect::<Vec<_>>();
        left_ancestors.sort_by(|a, b| a.name().cmp(b.name()));
        right_ancestors.sort_by(|a, b| a.name().cmp(b.name()));
        let left_names = left_ancestors.iter().map(|a| a.name()).collect::<Vec<_>>();
        let right_names = right_ancestors.iter().map(|a| a.name()).collect::<Vec<_>>();
        if left_names != right_names {
            return Err(Mismatch::new(
                path.field("ancestors"),
                format!("{left_names:?}"),
                format!("{right_names:?}"),
            ));
        }
        for (l, r) in left_ancestors.iter().zip(&right_ancestors) {
            self.number(
                path.clone().field("ancestors").name(l.name()).field("proportion"),
                l.proportion(),
                r.proportion(),
            )?;
        }

        let epochs = path.field("epochs");
        self.count(epochs.clone(), left.num_epochs(), right.num_epochs())?;
        for (i, (l, r)) in left.epochs().iter().zip(right.epochs()).enumerate() {
            let path = epochs.clone().index(i);
            self.number(path.clone().field("end_time"), l.end_time(), r.end_time())?;
            self.number(
                path.clone().field("start_size"),
                l.start_size(),
                r.start_size(),
            )?;
            self.number(path.clone().field("end_size"), l.end_size(), r.end_size())?;
            self.exact(
                path.clone().field("size_function"),
                l.size_function(),
                r.size_function(),
            )?;
            self.number(
                path.clone().field("cloning_rate"),
                l.cloning_rate(),
                r.cloning_rate(),
            )?;
            self.number(
                path.field("selfing_rate"),
                l.selfing_rate(),
                r.selfing_rate(),
            )?;
        }
        Ok(())
    }

    fn migrations(
        &self,
        left: &[AsymmetricMigration],
        right: &[AsymmetricMigration],
    ) -> Result<(), Mismatch> {
        let migrations = FieldPath::root().field("migrations");
        self.count(migrations.clone(), left.len(), right.len())?;
        let left = sorted_migrations(left);
        let right = sorted_migrations(right);
        for (i, (l, r)) in left.iter().zip(&right).enumerate() {
            let path = migrations.clone().index(i);
            self.exact(path.clone().field("source"), l.source(), r.source())?;
            self.exact(path.clone().field("dest"), l.dest(), r.dest())?;
            self.number(
                path.clone().field("start_time"),
                l.start_time(),
                r.start_time(),
            )?;
            self.number(path.clone().field("end_time"), l.end_time(), r.end_time())?;
            self.number(path.field("rate"), l.rate(), r.rate())?;
        }
        Ok(())
    }

    fn pulses(&self, left: &[Pulse], right: &[Pulse]) -> Result<(), Mismatch> {
        let pulses = FieldPath::root().field("pulses");
        self.count(pulses.clone(), left.len(), right.len())?;
        let left = canonical_pulses(left);
        let right = canonical_pulses(right);
        for (i, (l, r)) in left.iter().zip(&right).enumerate() {
            let path = pulses.clone().index(i);
            self.number(path.clone().field("time"), l.time, r.time)?;
            self.exact(path.clone().field("dest"), l.dest, r.dest)?;
            let left_sources = l.sources.iter().map(|(s, _)| *s).collect::<Vec<_>>();
            let right_sources = r.sources.iter().map(|(s, _)| *s).collect::<Vec<_>>();
            if left_sources != right_sources {
                return Err(Mismatch::new(
                    path.field("sources"),
                    format!("{left_sources:?}"),
                    format!("{right_sources:?}"),
                ));
            }
            for ((source, lp), (_, rp)) in l.sources.iter().zip(&r.sources) {
                self.number(
                    path.clone().field("proportions").name(source),
                    *lp,
                    *rp,
                )?;
            }
        }
        Ok(())
    }
}

fn sorted_deme_names(graph: &Graph) -> Vec<&str> {
    let mut names = graph.demes().iter().map(|d| d.name()).collect::<Vec<_>>();
    names.sort_unstable();
    names
}

fn sorted_migrations(migrations: &[AsymmetricMigration]) -> Vec<&AsymmetricMigration> {
    let mut sorted = migrations.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| {
        a.source()
            .cmp(b.source())
            .then_with(|| a.dest().cmp(b.dest()))
            .then_with(|| f64::from(a.start_time()).total_cmp(&f64::from(b.start_time())))
    });
    sorted
}

// A pulse with its sources paired to their proportions
// and sorted by source name.
struct CanonicalPulse<'graph> {
    time: f64,
    dest: &'graph str,
    sources: Vec<(&'graph str, f64)>,
}

fn canonical_pulses(pulses: &[Pulse]) -> Vec<CanonicalPulse<'_>> {
    let mut canonical = pulses
        .iter()
        .map(|pulse| {
            let mut sources = pulse
                .sources()
                .iter()
                .map(|s| s.as_str())
                .zip(pulse.proportions().iter().map(|&p| f64::from(p)))
                .collect::<Vec<_>>();
            sources.sort_by(|a, b| a.0.cmp(b.0));
            CanonicalPulse {
                time: f64::from(pulse.time()),
                dest: pulse.dest(),
                sources,
            }
        })
        .collect::<Vec<_>>();
    // Pulses at the same time apply in sequence, so a stable
    // sort on time alone keeps their order.
    canonical.sort_by(|a, b| b.time.total_cmp(&a.time));
    canonical
}
