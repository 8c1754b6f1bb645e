//! Data Transfer Objects for REST request/response serialization.
//!
//! JSON field names are camelCase, matching the event submission format.

pub mod assistant_dto;
pub mod auth_dto;
pub mod event_dto;

pub use assistant_dto::*;
pub use auth_dto::*;
pub use event_dto::*;
