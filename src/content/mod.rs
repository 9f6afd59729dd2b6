//! Site content: CTF events, challenge write-ups and team members.

mod memory;
mod repository;
mod seed;
mod service;
mod sqlite;
pub mod types;

pub use memory::MemoryRepository;
pub use repository::{Repository, SharedRepository};
pub use service::{validation_message, ContentService};
pub use sqlite::SqliteRepository;
pub use types::{
    Category, Challenge, ChallengeFilter, ChallengeInput, Ctf, CtfInput, Document, Social,
    TeamMember, TeamMemberInput, PLACEHOLDER_AVATAR,
};
