//! Arena Core
//!
//! Platform-agnostic types, storage traits, and error handling for the
//! arena score store.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `PublicUser`, `ScoreRecord`, `Summary`, etc.
//! - **Storage Traits**: `RecordStore` and `SessionPersistence`
//! - **Error Handling**: Unified `ArenaError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use arena_core::types::{NewUser, Rank};
//!
//! let user = NewUser::new("ada@example.com", "Ada", "hunter2");
//! assert_eq!(user.email, "ada@example.com");
//!
//! let rank = Rank::Ranked { position: 1, of: 3 };
//! assert_eq!(rank.to_string(), "1 of 3");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{ArenaError, Result};
pub use storage::{RecordStore, SessionPersistence};

pub use types::{
    NewUser, PublicUser, Rank, ScoreId, ScoreRecord, ScoreUpsert, Summary, TopEntry, Trend,
    User,
};
