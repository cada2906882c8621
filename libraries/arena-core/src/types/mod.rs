//! Domain types for the arena score store

mod ids;
mod score;
mod stats;
mod user;

pub use ids::ScoreId;
pub use score::{ScoreRecord, ScoreUpsert};
pub use stats::{Rank, Summary, TopEntry, Trend};
pub use user::{NewUser, PublicUser, User};
