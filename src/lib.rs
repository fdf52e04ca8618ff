//! Validate-and-relay backend for a multimodal chat widget.
//!
//! A turn posted to `/api/v1/chat` is checked against the chat request shape,
//! its image URLs are swapped for a fixed placeholder, and the result is
//! forwarded to an OpenAI-compatible completion API.

pub mod api;
pub mod app_state;
pub mod core;
pub mod domain;
pub mod errors;
pub mod routes;
