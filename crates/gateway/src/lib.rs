//! Generative-model client for the retouch editor.
//!
//! Provides the wire types and HTTP client for the generator's
//! `generateContent` API, the instruction templates for each edit kind,
//! and [`gateway::GenerativeGateway`], the production
//! [`TransformGateway`](retouch_core::gateway::TransformGateway).

pub mod api;
pub mod config;
pub mod gateway;
pub mod messages;
pub mod prompts;
