//! Global concurrency limiting for fetch units
//!
//! This module handles:
//! - Capping the number of fetch units that hold a request slot
//! - Releasing slots on every exit path (permits are released on drop)
//! - Making slot acquisition observe cancellation
//! - Tracking the in-flight high-water mark

use crate::FetchError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Bounded pool of request slots shared by all fetch units
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

/// A held request slot
///
/// The slot returns to the pool when the permit is dropped, whether the unit
/// succeeded, failed, timed out, panicked or was cancelled.
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LimiterPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyLimiter {
    /// Creates a limiter with the given number of slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits for a free slot
    ///
    /// # Returns
    ///
    /// * `Ok(LimiterPermit)` - A slot is held until the permit is dropped
    /// * `Err(FetchError::Cancelled)` - The token fired before a slot freed up
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<LimiterPermit, FetchError> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            permit = Arc::clone(&self.semaphore).acquire_owned() => {
                // The semaphore is never closed
                permit.map_err(|_| FetchError::Cancelled)?
            }
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tracing::trace!("Acquired fetch slot ({}/{})", now, self.capacity);

        Ok(LimiterPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of slots held at once since creation
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of slots free right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
