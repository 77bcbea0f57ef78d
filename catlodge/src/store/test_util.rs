//! Shared test utilities for store unit tests.

use tempfile::tempdir;

use crate::store::{Store, StoreConfig};

/// Creates a temporary test store that lives for the whole test run.
///
/// # Panics
///
/// Panics if the temporary directory or store cannot be created. This is
/// acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_store() -> Store {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let store = Store::open(StoreConfig::new(path)).unwrap();

    // Keep the TempDir alive for the duration of the process.
    std::mem::forget(dir);

    store
}
