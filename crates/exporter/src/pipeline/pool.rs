use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Worker pool needs at least one worker")]
pub struct EmptyPool;

/// Fixed set of workers handed out without waiting.
///
/// Idle workers sit on a stack; a worker is either on the stack or held by
/// exactly one [`WorkerLease`].
pub struct WorkerPool<W> {
    idle: Mutex<Vec<W>>,
    size: usize,
}

impl<W> WorkerPool<W> {
    pub fn new(workers: Vec<W>) -> Result<Self, EmptyPool> {
        if workers.is_empty() {
            return Err(EmptyPool);
        }

        Ok(Self {
            size: workers.len(),
            idle: Mutex::new(workers),
        })
    }

    /// Build `size` workers from their index.
    pub fn from_fn(size: usize, make: impl FnMut(usize) -> W) -> Result<Self, EmptyPool> {
        Self::new((0..size).map(make).collect())
    }

    /// Lease an idle worker, or `None` right away when all are busy.
    pub fn try_acquire(self: &Arc<Self>) -> Option<WorkerLease<W>> {
        let worker = self.idle.lock().pop()?;
        Some(WorkerLease {
            worker: Some(worker),
            pool: Arc::clone(self),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn available(&self) -> usize {
        self.idle.lock().len()
    }
}

/// Exclusive use of one worker; returns it to the pool on drop.
pub struct WorkerLease<W> {
    worker: Option<W>,
    pool: Arc<WorkerPool<W>>,
}

impl<W> Deref for WorkerLease<W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.worker.as_ref().expect("worker is only taken on drop")
    }
}

impl<W> Drop for WorkerLease<W> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.pool.idle.lock().push(worker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(WorkerPool::<usize>::new(Vec::new()), Err(EmptyPool)));
        assert!(WorkerPool::from_fn(0, |i| i).is_err());
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let pool = Arc::new(WorkerPool::from_fn(2, |i| i).unwrap());

        let a = pool.try_acquire().unwrap();
        let b = pool.try_acquire().unwrap();
        assert_ne!(*a, *b);
        assert_eq!(pool.available(), 0);
        assert!(pool.try_acquire().is_none());

        drop(a);
        assert_eq!(pool.available(), 1);
        assert!(pool.try_acquire().is_some());
        assert_eq!(pool.size(), 2);
    }

    #[test]
    fn test_lease_returns_on_panic() {
        let pool = Arc::new(WorkerPool::from_fn(1, |i| i).unwrap());

        let lease = pool.try_acquire().unwrap();
        let result = std::thread::spawn(move || {
            let _lease = lease;
            panic!("worker failed");
        })
        .join();

        assert!(result.is_err());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_concurrent_leases_never_exceed_size() {
        let pool = Arc::new(WorkerPool::from_fn(3, |i| i).unwrap());
        let in_use = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let in_use = Arc::clone(&in_use);
                std::thread::spawn(move || {
                    use std::sync::atomic::Ordering;
                    for _ in 0..500 {
                        if let Some(_lease) = pool.try_acquire() {
                            let now = in_use.fetch_add(1, Ordering::SeqCst) + 1;
                            assert!(now <= 3);
                            in_use.fetch_sub(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(pool.available(), 3);
    }
}
