//! # tally-backend
//!
//! Pluggable data access for Tally: one [`Backend`] trait with two
//! implementations, selected at startup.
//!
//! - [`RemoteBackend`](remote::RemoteBackend): the hosted REST service
//!   (PostgREST row API plus GoTrue auth), with change feeds emulated by
//!   polling row snapshots and diffing.
//! - [`MemoryBackend`](memory::MemoryBackend): a seeded in-memory libSQL
//!   database for demo and offline use; same surface, no network, no
//!   persistence.
//!
//! [`AuditService`] sits on top of the trait and owns the workflow rules:
//! backend selection, session persistence, the template lifecycle (logic
//! checks, publish immutability, versioning), and the response pipeline
//! (rule actions on save, validation and scoring on submit). The CLI talks
//! to the service, never to a backend directly.

pub mod auth;
pub mod backend;
pub mod changes;
pub mod error;
pub mod filters;
pub mod memory;
pub mod remote;
pub mod service;
pub mod session_store;
pub mod updates;

mod helpers;
mod http;
mod migrations;
mod seed;

pub use auth::{AuthSession, AuthUser};
pub use backend::{Backend, BackendMode};
pub use error::BackendError;
pub use service::AuditService;
