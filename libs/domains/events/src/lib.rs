//! Events Domain
//!
//! Listing, joining and searching community events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, OpenAPI docs
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Capacity rule, query-variant selection
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← In-memory and PostgreSQL implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Event, DTOs, filters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{
//!     handlers,
//!     repository::InMemoryEventRepository,
//!     service::EventService,
//! };
//!
//! let repository = InMemoryEventRepository::new();
//! let service = EventService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateEvent, DEFAULT_MAX_ATTENDEES, Event, EventSearch, LocationFilter, LocationQuery,
    SearchQuery, UpdateEvent,
};
pub use postgres::PgEventRepository;
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::EventService;
