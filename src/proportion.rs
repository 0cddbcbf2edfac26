use crate::error::DemesError;
use crate::traits::Validate;
use serde::{Deserialize, Serialize};

/// An ancestry proportion.
///
/// This is a newtype wrapper for [`f64`](std::primitive::f64).
///
/// # Interpretation
///
/// For a deme's ancestors, a proportion is the fraction of the
/// deme's initial ancestry contributed by one ancestor.
/// For a pulse, it is the fraction of the destination's ancestry
/// replaced by migrants from one source.
///
/// # Examples
///
/// ## Ancestral proportions of demes
///
/// ```
/// let yaml = "
/// time_units: generations
/// description:
///   An admixed deme appears 100 generations ago.
///   Its initial ancestry is 90% from ancestor1
///   and 10% from ancestor2.
/// demes:
///  - name: ancestor1
///    epochs:
///     - start_size: 50
///       end_time: 100
///  - name: ancestor2
///    epochs:
///     - start_size: 50
///       end_time: 100
///  - name: admixed
///    ancestors: [ancestor1, ancestor2]
///    proportions: [0.9, 0.1]
///    start_time: 100
///    epochs:
///     - start_size: 200
/// ";
/// demes_resolver::loads(yaml).unwrap();
/// ```
///
/// ## Pulse proportions
///
/// ```
/// let yaml = "
/// time_units: generations
/// demes:
///  - name: deme1
///    epochs:
///     - start_size: 50
///  - name: deme2
///    epochs:
///     - start_size: 50
/// pulses:
///  - sources: [deme1]
///    dest: deme2
///    proportions: [0.5]
///    time: 63
/// ";
/// demes_resolver::loads(yaml).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Serialize)]
#[repr(transparent)]
pub struct Proportion(f64);

impl_newtype_traits!(Proportion);

impl Validate for Proportion {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E> {
        if !self.0.is_finite() || self.0 <= 0.0 || self.0 > 1.0 {
            Err(err(format!(
                "proportions must be 0.0 < p <= 1.0, got: {}",
                self.0
            )))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<f64> for Proportion {
    type Error = DemesError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let rv = Self(value);
        rv.validate(DemesError::ValueError)?;
        Ok(rv)
    }
}

/// Input value for [`Proportion`], used when loading graphs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(from = "f64")]
pub struct InputProportion(f64);

impl_input_newtype_traits!(InputProportion);
impl_resolved_from_input!(Proportion, InputProportion);
