//! The seam between the orchestrator and whatever executes a transformation.

use std::future::Future;

use crate::error::EditError;
use crate::types::{ImageResource, TransformRequest};

/// Result of one transformation attempt: a new image, or a classified
/// failure. Never both.
pub type TransformOutcome = Result<ImageResource, EditError>;

/// Executes a [`TransformRequest`] against a base image.
///
/// One call is exactly one attempt: implementations must not retry, must
/// never mutate `base`, and must map every failure (including an
/// unusable generator response) to an [`EditError`] rather than panic.
pub trait TransformGateway: Send + Sync {
    fn invoke(
        &self,
        base: ImageResource,
        request: TransformRequest,
    ) -> impl Future<Output = TransformOutcome> + Send;
}
