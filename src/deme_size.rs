use crate::error::DemesError;
use crate::traits::Validate;
use serde::{Deserialize, Serialize};

/// The size of a [`Deme`](crate::Deme) at a given [`Time`](crate::Time).
///
/// This is a newtype wrapper for [`f64`](std::primitive::f64).
///
/// # Notes
///
/// * The size may take on non-integer values.
///
/// # Examples
///
/// ```
/// let t = demes_resolver::DemeSize::try_from(50.0).unwrap();
/// assert_eq!(t, 50.0);
/// ```
#[derive(Clone, Copy, Debug, Serialize)]
#[repr(transparent)]
pub struct DemeSize(f64);

impl_newtype_traits!(DemeSize);

impl Validate for DemeSize {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E> {
        if !self.0.is_finite() || self.0 <= 0.0 {
            Err(err(format!(
                "deme sizes must be 0 < d < Infinity, got: {}",
                self.0
            )))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<f64> for DemeSize {
    type Error = DemesError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let rv = Self(value);
        rv.validate(DemesError::ValueError)?;
        Ok(rv)
    }
}

/// Input value for [`DemeSize`], used when loading graphs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(from = "f64")]
pub struct InputDemeSize(f64);

impl_input_newtype_traits!(InputDemeSize);
impl_resolved_from_input!(DemeSize, InputDemeSize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_integer_size() {
        let size = DemeSize::try_from(101.5).unwrap();
        assert_eq!(f64::from(size), 101.5);
    }

    #[test]
    #[should_panic]
    fn test_deme_size_zero() {
        let _ = DemeSize::try_from(0.0).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_deme_size_infinite() {
        let _ = DemeSize::try_from(f64::INFINITY).unwrap();
    }

    #[test]
    fn test_input_size_accepts_anything() {
        let size: InputDemeSize = serde_yaml::from_str("-1.0").unwrap();
        assert_eq!(size, -1.0);
        assert!(DemeSize::try_from(f64::from(size)).is_err());
    }
}
