//! Shared application state.
//!
//! The whole relational store sits behind a single `RwLock`: reads take the
//! shared guard, every mutation takes the exclusive guard. Business
//! operations that must be atomic (subscribe's check-debit-grant) run to
//! completion while the write guard is held.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::config::ServerConfig;
use crate::identity::Directory;
use crate::store::Database;

pub struct AppState {
    config: Arc<ServerConfig>,
    db: RwLock<Database>,
    directory: RwLock<Directory>,
    started: Instant,
    /// Store operation counter for monitoring.
    store_ops: AtomicU64,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            db: RwLock::new(Database::new()),
            directory: RwLock::new(Directory::new()),
            started: Instant::now(),
            store_ops: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> Arc<ServerConfig> {
        self.config.clone()
    }

    pub fn db(&self) -> RwLockReadGuard<'_, Database> {
        self.db.read()
    }

    pub fn db_mut(&self) -> RwLockWriteGuard<'_, Database> {
        self.store_ops.fetch_add(1, Ordering::Relaxed);
        self.db.write()
    }

    /// Non-blocking read used by the readiness probe.
    pub fn try_db(&self) -> Option<RwLockReadGuard<'_, Database>> {
        self.db.try_read()
    }

    pub fn directory(&self) -> RwLockReadGuard<'_, Directory> {
        self.directory.read()
    }

    pub fn directory_mut(&self) -> RwLockWriteGuard<'_, Directory> {
        self.directory.write()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn store_op_count(&self) -> u64 {
        self.store_ops.load(Ordering::Relaxed)
    }
}
