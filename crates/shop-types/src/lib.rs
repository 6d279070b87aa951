//! Core types and traits for catalog search.
//!
//! Request/response DTOs keep the `{ code, message, data }` envelope used by the HTTP API.

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;
