/// Range checks shared by the resolved newtypes.
///
/// The closure turns a message into whatever error the caller
/// collects, so the same check serves [`TryFrom`] conversions
/// (returning [`DemesError`](crate::DemesError)) and the validator
/// (collecting plain messages).
pub(crate) trait Validate {
    fn validate<E, F: FnOnce(String) -> E>(&self, err: F) -> Result<(), E>;
}
