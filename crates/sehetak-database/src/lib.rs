//! # sehetak-database
//!
//! The persistent-store seams of Sehetak ([`store`]), their PostgreSQL
//! implementations ([`repositories`]), a process-local implementation
//! ([`memory`]), connection pool management, and embedded migrations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{CategoryCatalog, DocumentStore, SharingRegistry, Stores, UserDirectory};
