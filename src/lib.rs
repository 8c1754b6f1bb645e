//! # sports-events
//!
//! REST API for managing sports events, with an LLM-assisted creator that
//! turns a conversation into a structured event.
//!
//! Users authenticate against a hosted auth provider; every event read and
//! write is scoped to the caller's user id. Venues are shared by name across
//! all users and linked to events many-to-many.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/) ── CurrentUser extractor (auth/)
//!     │
//!     ├── EventService, AssistantService (service/)
//!     │       │                 │
//!     │       │                 └── GeminiClient, prompt, parser (ai/)
//!     │       │
//!     │       └── date filters, search, validation (domain/)
//!     │
//!     └── EventStore (persistence/) ── PostgreSQL
//! ```

pub mod ai;
pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
