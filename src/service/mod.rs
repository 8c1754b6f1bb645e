//! Service layer: business logic orchestration.
//!
//! [`EventService`] owns validation, ownership checks and venue resolution
//! on top of the [`crate::persistence::EventStore`]. [`AssistantService`]
//! runs the extraction round-trip and hands confirmed events to the
//! event service.

pub mod assistant_service;
pub mod event_service;

pub use assistant_service::AssistantService;
pub use event_service::EventService;
