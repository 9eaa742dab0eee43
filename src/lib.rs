//! # berthdb
//!
//! An embedded, in-memory, transactional key-value store with:
//! - Ordered string keys and opaque string values
//! - Named secondary indices over value projections (e.g. JSON fields)
//! - Single-writer/multi-reader transactions with atomic rollback
//! - Ordered, early-terminable iteration over keys or any index
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Caller (CLI)                 │
//! └──────────────────────┬──────────────────────┘
//!                        │ update / view
//! ┌──────────────────────▼──────────────────────┐
//! │                    Store                     │
//! │        (RwLock: one writer, many readers)    │
//! └──────────┬──────────────────────┬───────────┘
//!            │                      │
//!            ▼                      ▼
//!     ┌─────────────┐       ┌─────────────┐
//!     │   Records   │       │   Indices   │
//!     │  (BTreeMap) │       │  (BTreeSet) │
//!     └─────────────┘       └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod index;
pub mod store;
pub mod tx;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{Error, Result};
pub use index::{json_field, json_text, key_matches, whole_value, Extractor, Projection};
pub use store::Store;
pub use tx::Tx;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of berthdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
