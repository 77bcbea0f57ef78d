//! Category-scoped locking and cooperative cancellation.
//!
//! The per-unit, per-night residual capacity read by the resolver and
//! consumed by the allocator is the engine's critical shared resource.
//! Every "resolve availability, allocate, persist" sequence — and every
//! lifecycle write that mutates residual capacity — runs under the lock of
//! its accommodation category, so two racing bookings can never both
//! observe the same free capacity. A caller may abandon a request before
//! the lock is acquired; once inside the critical section the operation
//! runs to completion or rolls back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::category::CategoryId;
use crate::error::{Error, Result};

/// Cooperative cancellation token.
///
/// Checked before the critical section is entered, never inside it.
///
/// # Examples
///
/// ```
/// use catlodge::operations::CancelToken;
///
/// let token = CancelToken::new();
/// assert!(!token.is_cancelled());
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a new, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Safe to call from any thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Registry of per-category mutexes.
///
/// Lock handles are created lazily per category and shared between all
/// clones of the registry, so workers holding their own store connections
/// still serialize on the same category.
#[derive(Debug, Default)]
pub struct CategoryLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl CategoryLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, category: CategoryId) -> Arc<Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(category.value())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Runs `f` while holding the category's lock.
    ///
    /// The cancellation token, when given, is consulted once before the
    /// lock is acquired: a cancelled request performs no work and returns
    /// [`Error::Cancelled`]. Inside the critical section the closure runs
    /// to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] for a cancelled token, otherwise
    /// whatever `f` returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use catlodge::operations::CategoryLocks;
    /// use catlodge::CategoryId;
    ///
    /// let locks = CategoryLocks::new();
    /// let value = locks.with(CategoryId::new(1), None, || Ok(42)).unwrap();
    /// assert_eq!(value, 42);
    /// ```
    pub fn with<R>(
        &self,
        category: CategoryId,
        cancel: Option<&CancelToken>,
        f: impl FnOnce() -> Result<R>,
    ) -> Result<R> {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }
        }

        let handle = self.handle(category);
        let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::thread;

    #[test]
    fn test_with_runs_closure() {
        let locks = CategoryLocks::new();
        let result = locks.with(CategoryId::new(1), None, || Ok(7)).unwrap();
        assert_eq!(result, 7);
    }

    #[test]
    fn test_cancelled_token_skips_work() {
        let locks = CategoryLocks::new();
        let token = CancelToken::new();
        token.cancel();

        let ran = AtomicBool::new(false);
        let result = locks.with(CategoryId::new(1), Some(&token), || {
            ran.store(true, Ordering::SeqCst);
            Ok(())
        });
        assert!(matches!(result.unwrap_err(), Error::Cancelled));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_same_category_serializes() {
        let locks = Arc::new(CategoryLocks::new());
        let concurrent = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let concurrent = Arc::clone(&concurrent);
                let peak = Arc::clone(&peak);
                thread::spawn(move || {
                    locks
                        .with(CategoryId::new(1), None, || {
                            let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(2));
                            concurrent.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_different_categories_do_not_block() {
        // Smoke test: two categories get distinct lock handles.
        let locks = CategoryLocks::new();
        let a = locks.handle(CategoryId::new(1));
        let b = locks.handle(CategoryId::new(2));
        assert!(!Arc::ptr_eq(&a, &b));

        let again = locks.handle(CategoryId::new(1));
        assert!(Arc::ptr_eq(&a, &again));
    }
}
