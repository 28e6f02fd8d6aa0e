//! Runs coordinates through a pipeline.

use webproj_common::{Coordinate4, TransformError, TransformResult};

use crate::pipeline::Pipeline;

/// Push `coordinate` through every present stage of `pipeline` in order.
///
/// Between stages the engine output is renormalized: two components become
/// `(v1, v2, -, -)`, three become `(v1, v2, v3, -)`. A final result with an
/// infinite component is reported as [`TransformError::OutOfDomain`].
pub fn run(pipeline: &Pipeline, coordinate: Coordinate4) -> TransformResult<Coordinate4> {
    let mut current = coordinate.normalized();

    for (kind, stage) in pipeline.stages() {
        let output = stage.transform(&current.components());
        current = Coordinate4::from_components(&output).ok_or_else(|| {
            TransformError::Engine(format!(
                "{kind} stage of {} -> {} returned {} components",
                pipeline.src(),
                pipeline.dst(),
                output.len()
            ))
        })?;
    }

    if current.has_infinite() {
        return Err(TransformError::OutOfDomain);
    }

    Ok(current)
}
