use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::task::Waker;
use std::time::Instant;

/// An entry in the reactor timer queue.
///
/// The entry may be cancelled before it fires; cancelled entries are
/// discarded when they reach the top of the heap.
pub(crate) struct TimerEntry {
    pub(crate) deadline: Instant,

    /// Insertion order; breaks ties between equal deadlines so timers set
    /// for the same instant fire in the order they were set.
    pub(crate) seq: u64,

    pub(crate) waker: Waker,

    /// Shared with the `Sleep` future that registered the timer.
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Ord for TimerEntry {
    /// Reversed so that `BinaryHeap<TimerEntry>` pops the earliest
    /// deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;
    use std::task::Waker;
    use std::time::Duration;

    fn entry(deadline: Instant, seq: u64) -> TimerEntry {
        TimerEntry {
            deadline,
            seq,
            waker: Waker::noop().clone(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[test]
    fn heap_pops_earliest_deadline_first() {
        let now = Instant::now();
        let mut heap = BinaryHeap::new();

        heap.push(entry(now + Duration::from_millis(300), 0));
        heap.push(entry(now + Duration::from_millis(100), 1));
        heap.push(entry(now + Duration::from_millis(200), 2));

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|e| e.seq)).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn equal_deadlines_fire_in_insertion_order() {
        let now = Instant::now();
        let mut heap = BinaryHeap::new();

        for seq in [4, 2, 3, 1] {
            heap.push(entry(now, seq));
        }

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|e| e.seq)).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }
}
