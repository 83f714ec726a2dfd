//! Glossa Server Library
//!
//! A reading and annotation server for versioned legal texts. Annotations
//! are persisted as position-independent fingerprints and re-anchored into
//! each rendered body, so they survive consolidation dates, reformatting,
//! and re-fetches.
//!
//! # Modules
//!
//! - `anchor`: The anchoring engine — clean projection, fingerprint
//!   capture, resolution, boundary expansion, marker injection
//! - `corpus`: Upstream document provider, body cache, sanitizer
//! - `db`: SQLite persistence for annotations, users, bookmarks
//! - `outline`: Heading extraction and active-section lookup
//! - `session`: Reader interaction state machine and context
//! - `assist`: AI note-prefill providers
//! - `routes`: HTTP API

pub mod anchor;
pub mod assist;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod outline;
pub mod routes;
pub mod session;
pub mod state;
