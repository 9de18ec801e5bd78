//! Error types raised while evaluating routes.

use routerisk_core::RouteError;
use thiserror::Error;

/// Failure of a single route; the rest of the batch carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The route failed validation.
    #[error("route rejected: {source}")]
    InvalidRoute {
        /// Validation failure.
        #[from]
        source: RouteError,
    },
    /// Blending produced NaN or infinity.
    #[error("route {route_id} produced a non-finite score")]
    NonFiniteScore {
        /// Identifier of the affected route.
        route_id: String,
    },
}

/// Failure of a whole batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    /// The request carried no routes.
    #[error("request contains no routes")]
    EmptyBatch,
    /// Every route in the request failed.
    #[error("all {} routes failed to evaluate", failures.len())]
    AllRoutesFailed {
        /// Per-route failures in request order.
        failures: Vec<EvaluationError>,
    },
}
