//! Observability utilities.

mod logging;
mod tracing;

pub use self::logging::{init_tracing, LogFormat};
pub use self::tracing::SpanTimer;
