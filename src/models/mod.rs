//! Data contract shared with the OHLCV data service.
//!
//! Contains the row and response shapes returned by `GET /api/ohlcv`, the
//! closed set of upstream sources, the error body returned on failures,
//! and the post-decode validation that guards the rest of the crate
//! against malformed responses.

pub mod ohlcv;
pub mod validation;

pub use ohlcv::{ApiErrorBody, HealthResponse, OhlcvResponse, OhlcvRow, Source};
pub use validation::validate_response;
