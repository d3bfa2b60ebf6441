//! Repository Module
//!
//! Thin data-access functions over the SQLite pool. Functions take
//! `impl SqliteExecutor` so services can run them against the pool or
//! inside a transaction. Business rules stay in the services; the
//! compare-and-set status writes live here because they are the
//! concurrency primitive everything above relies on.

pub mod attachment;
pub mod counter;
pub mod order;
pub mod quote;
pub mod symbol;
