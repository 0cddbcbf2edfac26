use crate::error::DemesError;
use crate::traits::Validate;
use serde::{Deserialize, Serialize};

/// The cloning rate of an [`Epoch`](crate::Epoch).
#[derive(Clone, Copy, Debug, Serialize)]
#[repr(transparent)]
pub struct CloningRate(f64);

impl_newtype_traits!(CloningRate);

impl Validate for CloningRate {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E> {
        if !self.0.is_finite() || self.0.is_sign_negative() || self.0 > 1.0 {
            Err(err(format!(
                "cloning rate must be 0.0 <= C <= 1.0, got: {}",
                self.0
            )))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<f64> for CloningRate {
    type Error = DemesError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let rv = Self(value);
        rv.validate(DemesError::ValueError)?;
        Ok(rv)
    }
}

impl Default for CloningRate {
    fn default() -> Self {
        Self(0.0)
    }
}

/// Input value for [`CloningRate`], used when loading graphs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(from = "f64")]
pub struct InputCloningRate(f64);

impl_input_newtype_traits!(InputCloningRate);
impl_resolved_from_input!(CloningRate, InputCloningRate);

impl Default for InputCloningRate {
    fn default() -> Self {
        Self::from(0.0)
    }
}
