use crate::error::DemesError;
use crate::traits::Validate;
use serde::{Deserialize, Serialize};

/// Store time values.
///
/// This is a newtype wrapper for [`f64`](std::primitive::f64).
///
/// # Notes
///
/// * The units are in the [`TimeUnits`](crate::TimeUnits)
///   of the [`Graph`](crate::Graph).
/// * Time runs backwards: larger values are further in the past
///   and `0` is the present.
/// * Infinite values serialize as the string `Infinity`.
///
/// # Examples
///
/// ```
/// let t = demes_resolver::Time::try_from(0.0).unwrap();
/// assert_eq!(t, 0.0);
/// assert!(demes_resolver::Time::try_from(-1.0).is_err());
/// ```
#[derive(Clone, Copy, Debug, Serialize)]
#[repr(transparent)]
#[serde(into = "TimeTrampoline")]
pub struct Time(f64);

impl_newtype_traits!(Time);

impl Validate for Time {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E> {
        if self.0.is_nan() || self.0 < 0.0 {
            Err(err(format!("invalid time value: {}", self.0)))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<f64> for Time {
    type Error = DemesError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let rv = Self(value);
        rv.validate(DemesError::ValueError)?;
        Ok(rv)
    }
}

impl Time {
    pub(crate) fn infinity() -> Self {
        Self(f64::INFINITY)
    }

    /// `true` if the time is infinitely far in the past.
    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }

    /// `true` if the time is a finite value.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

/// Input value for [`Time`], used when loading graphs.
///
/// Accepts any YAML number (including `.inf`) or the
/// string `"Infinity"`.
///
/// # Examples
///
/// ```
/// let t = demes_resolver::InputTime::from(1.0);
/// assert_eq!(t, 1.0);
/// ```
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(try_from = "TimeTrampoline")]
pub struct InputTime(f64);

impl_input_newtype_traits!(InputTime);
impl_resolved_from_input!(Time, InputTime);

impl InputTime {
    pub(crate) fn default_epoch_end_time() -> Self {
        Self(0.0)
    }

    pub(crate) fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }
}

/// Generation time.
///
/// If [`TimeUnits`] are in generations, this value
/// must be 1.0.
#[derive(Clone, Copy, Debug, Serialize)]
#[repr(transparent)]
pub struct GenerationTime(f64);

impl_newtype_traits!(GenerationTime);

impl Validate for GenerationTime {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E> {
        if !self.0.is_finite() || self.0 <= 0.0 {
            Err(err(format!("generation time must be > 0.0, got: {}", self.0)))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<f64> for GenerationTime {
    type Error = DemesError;
    fn try_from(value: f64) -> Result<GenerationTime, Self::Error> {
        let rv = Self(value);
        rv.validate(DemesError::ValueError)?;
        Ok(rv)
    }
}

impl Default for GenerationTime {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Input value for [`GenerationTime`], used when loading graphs.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(from = "f64")]
pub struct InputGenerationTime(f64);

impl_input_newtype_traits!(InputGenerationTime);
impl_resolved_from_input!(GenerationTime, InputGenerationTime);

/// The time units of a graph
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(from = "String")]
#[serde(into = "String")]
pub enum TimeUnits {
    #[allow(missing_docs)]
    #[default]
    Generations,
    #[allow(missing_docs)]
    Years,
    /// A "custom" time unit.  It is assumed
    /// that client code knows what to do with this.
    Custom(String),
}

impl From<String> for TimeUnits {
    fn from(value: String) -> Self {
        if &value == "generations" {
            Self::Generations
        } else if &value == "years" {
            Self::Years
        } else {
            Self::Custom(value)
        }
    }
}

impl From<TimeUnits> for String {
    fn from(value: TimeUnits) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnits::Generations => write!(f, "generations"),
            TimeUnits::Years => write!(f, "years"),
            TimeUnits::Custom(custom) => write!(f, "{}", &custom),
        }
    }
}

/// A half-open time interval `[present, past)`.
#[derive(Clone, Copy, Debug)]
pub struct TimeInterval {
    start_time: Time,
    end_time: Time,
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}]", self.start_time, self.end_time)
    }
}

impl TimeInterval {
    pub(crate) fn new(start_time: Time, end_time: Time) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    // true if other is in [end_time, start_time)
    pub(crate) fn contains<F>(&self, other: F) -> bool
    where
        F: Into<f64>,
    {
        let time = other.into();
        self.start_time > time && time >= self.end_time
    }

    // true if other is in (end_time, start_time]
    pub(crate) fn contains_inclusive_start_exclusive_end<F>(&self, other: F) -> bool
    where
        F: Into<f64>,
    {
        let time = other.into();
        time > self.end_time && time <= self.start_time
    }

    pub(crate) fn duration_greater_than_zero(&self) -> bool {
        self.start_time > self.end_time
    }

    pub(crate) fn overlaps(&self, other: &Self) -> bool {
        self.start_time > other.end_time && other.start_time > self.end_time
    }

    /// Return the resolved start time (past) of the interval.
    pub fn start_time(&self) -> Time {
        self.start_time
    }

    /// Return the resolved end time (present) of the interval.
    pub fn end_time(&self) -> Time {
        self.end_time
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TimeTrampoline {
    Infinity(String),
    Float(f64),
}

impl TryFrom<TimeTrampoline> for InputTime {
    type Error = DemesError;

    fn try_from(value: TimeTrampoline) -> Result<Self, Self::Error> {
        match value {
            TimeTrampoline::Infinity(string) => {
                if &string == "Infinity" {
                    Ok(Self(f64::INFINITY))
                } else {
                    Err(DemesError::ValueError(format!(
                        "invalid time value: {string:?}"
                    )))
                }
            }
            TimeTrampoline::Float(f) => Ok(Self::from(f)),
        }
    }
}

impl From<Time> for TimeTrampoline {
    fn from(value: Time) -> Self {
        if value.0.is_infinite() && value.0.is_sign_positive() {
            Self::Infinity("Infinity".to_string())
        } else {
            Self::Float(value.0)
        }
    }
}

#[cfg(test)]
mod test_infinity {
    use super::*;

    #[test]
    fn test_infinity_dot_inf() {
        let t: InputTime = serde_yaml::from_str("---\n.inf\n").unwrap();
        assert!(t.is_infinite());
    }

    #[test]
    fn test_infinity_string() {
        let t: InputTime = serde_yaml::from_str("---\nInfinity\n").unwrap();
        assert!(t.is_infinite());
        let t: InputTime = serde_yaml::from_str("---\n\"Infinity\"\n").unwrap();
        assert!(t.is_infinite());
    }

    #[test]
    #[should_panic]
    fn test_other_strings_rejected() {
        let _: InputTime = serde_yaml::from_str("---\nforever\n").unwrap();
    }

    #[test]
    fn test_serialize_infinity() {
        let t = Time::infinity();
        let s = serde_yaml::to_string(&t).unwrap();
        assert!(s.contains("Infinity"));
        let back: InputTime = serde_yaml::from_str(&s).unwrap();
        assert!(back.is_infinite());
        let t = Time::try_from(10.5).unwrap();
        let s = serde_yaml::to_string(&t).unwrap();
        assert_eq!(s.trim(), "10.5");
    }
}
