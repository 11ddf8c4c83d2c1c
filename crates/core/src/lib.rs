//! Edit history and transformation orchestration for the retouch editor.
//!
//! Pure domain crate: image resources and their codec, local validation,
//! the deterministic crop, the linear version chain, the gateway trait, and
//! the single-flight [`orchestrator::EditOrchestrator`]. The network-backed
//! gateway lives in `retouch-gateway`.

pub mod codec;
pub mod crop;
pub mod error;
pub mod events;
pub mod gateway;
pub mod history;
pub mod orchestrator;
pub mod types;
pub mod validation;
