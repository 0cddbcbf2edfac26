use crate::error::DemesError;
use crate::traits::Validate;
use serde::{Deserialize, Serialize};

/// A migration rate.
///
/// The fraction of a destination deme's ancestry drawn each
/// generation from a source deme.
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
///  - name: B
///    epochs:
///     - start_size: 100
/// migrations:
///  - demes: [A, B]
///    rate: 1e-3
/// ";
/// let graph = demes_resolver::loads(yaml).unwrap();
/// assert!(graph.migrations().iter().all(|m| m.rate() == 1e-3));
/// ```
#[derive(Clone, Copy, Debug, Serialize)]
#[repr(transparent)]
pub struct MigrationRate(f64);

impl_newtype_traits!(MigrationRate);

impl Validate for MigrationRate {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E> {
        if !self.0.is_finite() || self.0.is_sign_negative() || self.0 > 1.0 {
            Err(err(format!(
                "migration rate must be 0.0 <= m <= 1.0, got: {}",
                self.0
            )))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<f64> for MigrationRate {
    type Error = DemesError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let rv = Self(value);
        rv.validate(DemesError::ValueError)?;
        Ok(rv)
    }
}

/// Input value for [`MigrationRate`], used when loading graphs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(from = "f64")]
pub struct InputMigrationRate(f64);

impl_input_newtype_traits!(InputMigrationRate);
impl_resolved_from_input!(MigrationRate, InputMigrationRate);
