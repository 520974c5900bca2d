use crate::{errors::ShapeViolation, types::TypeInfo};

/// Checks the declared outputs of a producer, returning the key it supplies.
///
/// Valid shapes are `(T)` and `(T, Failure)` where `T` is not the failure kind.
pub(crate) fn producer_key(outputs: &[TypeInfo]) -> Result<TypeInfo, ShapeViolation> {
    match outputs {
        [] => Err(ShapeViolation::NoOutputs),
        [value] | [value, _] if value.is_failure() => Err(ShapeViolation::FailureAsValue),
        [value] => Ok(*value),
        [value, failure] if failure.is_failure() => Ok(*value),
        [_, other] => Err(ShapeViolation::SecondOutputNotFailure(*other)),
        _ => Err(ShapeViolation::TooManyOutputs(outputs.len())),
    }
}

/// Checks the declared outputs of a consumer: nothing, or a single failure.
pub(crate) fn consumer_shape(outputs: &[TypeInfo]) -> Result<(), ShapeViolation> {
    match outputs {
        [] => Ok(()),
        [failure] if failure.is_failure() => Ok(()),
        [value] => Err(ShapeViolation::ReturnsValue(*value)),
        _ => Err(ShapeViolation::TooManyOutputs(outputs.len())),
    }
}
