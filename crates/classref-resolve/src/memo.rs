//! Compute-once cells for lazily derived views.
//!
//! A [`Memo`] runs its initializer at most once per instance. Concurrent first
//! accesses block on the one running computation instead of racing. Once set,
//! the value is never replaced.
//!
//! Initializers must not touch the memo they are initializing.

use std::fmt;
use std::sync::OnceLock;

pub struct Memo<T> {
    cell: OnceLock<T>,
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Memo {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached value, computing it on first access.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(compute)
    }
}

impl<T, E: Clone> Memo<Result<T, E>> {
    /// Like [`Memo::get_or_compute`] for fallible views. A failure is cached
    /// like any other result and cloned out on every access.
    pub fn get_or_try_compute(&self, compute: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        self.get_or_compute(compute).as_ref().map_err(Clone::clone)
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Memo::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn computes_once() {
        let memo = Memo::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let value = memo.get_or_compute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            });
            assert_eq!(*value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_cached() {
        let memo: Memo<Result<u32, String>> = Memo::new();
        assert_eq!(memo.get_or_try_compute(|| Err("boom".to_string())), Err("boom".to_string()));
        assert_eq!(memo.get_or_try_compute(|| Ok(1)), Err("boom".to_string()));
    }

    #[test]
    fn concurrent_first_access_computes_once() {
        let memo = Arc::new(Memo::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    *memo.get_or_compute(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        7
                    })
                })
            })
            .collect();
        for handle in threads {
            assert_eq!(handle.join().unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_shows_pending_state() {
        let memo: Memo<u8> = Memo::new();
        assert_eq!(format!("{:?}", memo), "Memo(<pending>)");
        memo.get_or_compute(|| 3);
        assert_eq!(format!("{:?}", memo), "Memo(3)");
    }
}
