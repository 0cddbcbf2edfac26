use crate::error::DemesError;
use crate::traits::Validate;
use serde::{Deserialize, Serialize};

/// The selfing rate of an [`Epoch`](crate::Epoch).
#[derive(Clone, Copy, Debug, Serialize)]
#[repr(transparent)]
pub struct SelfingRate(f64);

impl_newtype_traits!(SelfingRate);

impl Validate for SelfingRate {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E> {
        if !self.0.is_finite() || self.0.is_sign_negative() || self.0 > 1.0 {
            Err(err(format!(
                "selfing rate must be 0.0 <= S <= 1.0, got: {}",
                self.0
            )))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<f64> for SelfingRate {
    type Error = DemesError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let rv = Self(value);
        rv.validate(DemesError::ValueError)?;
        Ok(rv)
    }
}

impl Default for SelfingRate {
    fn default() -> Self {
        Self(0.0)
    }
}

/// Input value for [`SelfingRate`], used when loading graphs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(from = "f64")]
pub struct InputSelfingRate(f64);

impl_input_newtype_traits!(InputSelfingRate);
impl_resolved_from_input!(SelfingRate, InputSelfingRate);

impl Default for InputSelfingRate {
    fn default() -> Self {
        Self::from(0.0)
    }
}
