//! Infrastructure layer for Rankdeck.
//!
//! In-memory reference implementations of the core persistence contracts,
//! plus config file loading. Each store is safe for concurrent use through
//! interior `RwLock`s; swapping in a database-backed implementation only
//! requires implementing the same core traits.

pub mod config_loader;
pub mod memory_item_catalog;
pub mod memory_leaderboard_repository;
pub mod memory_session_repository;
pub mod memory_snapshot_repository;

pub use crate::config_loader::load_config;
pub use crate::memory_item_catalog::MemoryItemCatalog;
pub use crate::memory_leaderboard_repository::MemoryLeaderboardRepository;
pub use crate::memory_session_repository::MemorySessionRepository;
pub use crate::memory_snapshot_repository::MemorySnapshotRepository;
