//! A fixed-capacity, lock-free single-producer/single-consumer ring buffer
//! of [`Position`]s, used to ship cross-band dead-cell notifications
//! between neighboring pruner workers.
//!
//! The design mirrors a classic SPSC circular buffer: one atomic head
//! (written only by the producer), one atomic tail (written only by the
//! consumer), each on its own cache line to avoid false sharing, and one
//! slot of capacity sacrificed so `head == tail` unambiguously means empty.
//! `push` never blocks or spins; a full ring is the caller's problem to
//! retry on a later iteration.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::position::Position;

/// Padding to keep the head and tail indices on separate cache lines.
/// 64 bytes is the common line size on the architectures this runs on;
/// getting it exactly right isn't load-bearing for correctness, only for
/// avoiding false-sharing stalls between the producer and consumer.
#[repr(align(64))]
struct CachePadded<T>(T);

/// A ring of `Position` with capacity `N`, where `N` must be a power of two.
pub struct Spsc<const N: usize> {
    data: Box<[UnsafeCell<Position>]>,
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
}

// SAFETY: `data` is only ever written by the single producer at `head` and
// read by the single consumer at `tail`; the acquire/release pair on the
// indices establishes happens-before between a producer's write and the
// consumer's matching read, so concurrent access to the same slot never
// occurs.
unsafe impl<const N: usize> Sync for Spsc<N> {}
unsafe impl<const N: usize> Send for Spsc<N> {}

impl<const N: usize> Default for Spsc<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Spsc<N> {
    const MASK: usize = N - 1;

    pub fn new() -> Self {
        assert!(N.is_power_of_two(), "ring capacity must be a power of two");
        let mut data = Vec::with_capacity(N);
        data.resize_with(N, || UnsafeCell::new(Position::default()));
        Spsc {
            data: data.into_boxed_slice(),
            head: CachePadded(AtomicUsize::new(0)),
            tail: CachePadded(AtomicUsize::new(0)),
        }
    }

    /// Producer-only. Appends `p`. Returns `false` without blocking if the
    /// ring is full; the caller decides whether and how to retry.
    pub fn push(&self, p: Position) -> bool {
        let head = self.head.0.load(Ordering::Relaxed);
        let tail = self.tail.0.load(Ordering::Acquire);
        let next = (head + 1) & Self::MASK;
        if next == tail {
            return false;
        }
        // SAFETY: only the producer writes `data[head]`, and the consumer
        // cannot read this slot until it observes the release store below.
        unsafe {
            *self.data[head].get() = p;
        }
        self.head.0.store(next, Ordering::Release);
        true
    }

    /// Consumer-only. Pops the oldest element into `*out`. Returns `false`
    /// without blocking if the ring is empty.
    pub fn pop(&self, out: &mut Position) -> bool {
        let tail = self.tail.0.load(Ordering::Relaxed);
        let head = self.head.0.load(Ordering::Acquire);
        if tail == head {
            return false;
        }
        // SAFETY: the producer published this slot via the acquire load of
        // `head` above; only the consumer reads or advances `tail`.
        *out = unsafe { *self.data[tail].get() };
        self.tail.0.store((tail + 1) & Self::MASK, Ordering::Release);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.head.0.load(Ordering::Acquire) == self.tail.0.load(Ordering::Acquire)
    }
}

/// The ring capacity used between pruner bands: 2^13, per the design note
/// that 8192 slots is large enough in well-behaved runs that pushes rarely
/// see a full ring.
pub const BAND_RING_CAPACITY: usize = 1 << 13;

pub type BandRing = Spsc<BAND_RING_CAPACITY>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_ring_pops_nothing() {
        let ring: Spsc<8> = Spsc::new();
        let mut out = Position::default();
        assert!(!ring.pop(&mut out));
        assert!(ring.is_empty());
    }

    #[test]
    fn push_then_pop_round_trips() {
        let ring: Spsc<8> = Spsc::new();
        let p = Position::new(3, 4);
        assert!(ring.push(p));
        assert!(!ring.is_empty());

        let mut out = Position::default();
        assert!(ring.pop(&mut out));
        assert_eq!(out, p);
        assert!(ring.is_empty());
    }

    #[test]
    fn push_reports_full_with_one_slot_reserved() {
        let ring: Spsc<4> = Spsc::new();
        // Capacity 4 holds at most 3 live elements (one slot reserved).
        assert!(ring.push(Position::new(0, 0)));
        assert!(ring.push(Position::new(0, 1)));
        assert!(ring.push(Position::new(0, 2)));
        assert!(!ring.push(Position::new(0, 3)));
    }

    #[test]
    fn fifo_order_is_preserved() {
        let ring: Spsc<16> = Spsc::new();
        for i in 0..10 {
            assert!(ring.push(Position::new(i, i)));
        }
        let mut out = Position::default();
        for i in 0..10 {
            assert!(ring.pop(&mut out));
            assert_eq!(out, Position::new(i, i));
        }
    }

    #[test]
    fn stress_spsc_preserves_multiset_and_order() {
        const COUNT: usize = 200_000;
        let ring: Arc<Spsc<1024>> = Arc::new(Spsc::new());

        let producer_ring = Arc::clone(&ring);
        let producer = thread::spawn(move || {
            let mut sent = Vec::with_capacity(COUNT);
            let mut i = 0i64;
            while i < COUNT as i64 {
                let p = Position::new(i, i.wrapping_mul(31));
                if producer_ring.push(p) {
                    sent.push(p);
                    i += 1;
                } else {
                    thread::yield_now();
                }
            }
            sent
        });

        let consumer_ring = Arc::clone(&ring);
        let consumer = thread::spawn(move || {
            let mut received = Vec::with_capacity(COUNT);
            let mut out = Position::default();
            while received.len() < COUNT {
                if consumer_ring.pop(&mut out) {
                    received.push(out);
                } else {
                    thread::yield_now();
                }
            }
            received
        });

        let sent = producer.join().unwrap();
        let received = consumer.join().unwrap();
        assert_eq!(sent, received);
    }
}
