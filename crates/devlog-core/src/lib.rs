// Devlog Core
//
// DB-agnostic core of the Devlog activity ledger.
//
// Key design decisions:
// - Persistence goes through the Store trait for pluggable backends
//   (Postgres in devlog-storage, MemoryStore here for tests and examples)
// - Domain entities are defined here for shared use by API, storage, and CLI
// - All writes pass through the Ledger so validation and referential checks
//   happen in one place
// - Run status transitions are permissive by default; strict mode is a
//   LedgerConfig flag
// - Hook ingestion (Resolver, IngestFacade) is best-effort and absorbs
//   failures instead of propagating them

pub mod config;
pub mod entities;
pub mod error;
pub mod ingest;
pub mod ledger;
pub mod resolver;
pub mod stats;
pub mod store;

// In-memory implementation for examples and testing
pub mod memory;

// Re-exports for convenience
pub use config::LedgerConfig;
pub use entities::{CodeSnippet, Event, EventType, Project, Run, RunStatus, Session, User};
pub use error::{LedgerError, RecordKind, Result};
pub use ingest::{CommitNotice, EventNotice, IngestFacade, IngestOutcome, FALLBACK_ACTOR};
pub use ledger::Ledger;
pub use memory::MemoryStore;
pub use resolver::Resolver;
pub use stats::{StatsEngine, Summary};
pub use store::{
    EventFilter, NewEvent, NewProject, NewRun, NewSession, NewSnippet, NewUser, Page,
    ProjectFilter, RunFilter, RunPatch, SessionFilter, SnippetFilter, Store, UserFilter,
};
