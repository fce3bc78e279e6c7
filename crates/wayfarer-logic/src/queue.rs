//! Generic binary min-heap priority queue.
//!
//! Backing store is a flat vec of `(element, priority)` pairs with the
//! usual heap layout: parent of `i` at `(i - 1) / 2`, children at
//! `2i + 1` and `2i + 2`. The parent's priority is never greater than its
//! children's. On a sift-down tie between children the left child wins,
//! which keeps dequeue order deterministic.
//!
//! There is no decrease-key: a caller that rediscovers an enqueued element
//! at a better priority enqueues a fresh entry and lets its own closed-set
//! check drop the stale duplicate when it eventually surfaces.

/// Binary min-heap of elements keyed by a comparable priority.
#[derive(Debug, Clone)]
pub struct PriorityQueue<E, P> {
    entries: Vec<(E, P)>,
}

impl<E, P: PartialOrd> PriorityQueue<E, P> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append then sift up while strictly smaller than the parent.
    pub fn enqueue(&mut self, element: E, priority: P) {
        self.entries.push((element, priority));
        let mut index = self.entries.len() - 1;
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].1 < self.entries[parent].1 {
                self.entries.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Remove and return the minimum-priority element, or `None` when
    /// empty. Dequeuing from an empty queue is a caller bug; the `None`
    /// surfaces it at the call site.
    pub fn dequeue(&mut self) -> Option<E> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let (element, _) = self.entries.pop()?;
        self.sift_down(0);
        Some(element)
    }

    /// The minimum-priority element without removing it.
    pub fn peek(&self) -> Option<&E> {
        self.entries.first().map(|(e, _)| e)
    }

    pub fn peek_priority(&self) -> Option<&P> {
        self.entries.first().map(|(_, p)| p)
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            if left >= len {
                break;
            }
            // Left child on ties, for determinism.
            let smaller = if right < len && self.entries[right].1 < self.entries[left].1 {
                right
            } else {
                left
            };
            if self.entries[smaller].1 < self.entries[index].1 {
                self.entries.swap(index, smaller);
                index = smaller;
            } else {
                break;
            }
        }
    }
}

impl<E, P: PartialOrd> Default for PriorityQueue<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dequeue_in_priority_order() {
        let mut q = PriorityQueue::new();
        for (name, p) in [("d", 4), ("a", 1), ("c", 3), ("b", 2), ("e", 5)] {
            q.enqueue(name, p);
        }
        let order: Vec<&str> = std::iter::from_fn(|| q.dequeue()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_empty_dequeue_is_none() {
        let mut q: PriorityQueue<u32, u32> = PriorityQueue::new();
        assert_eq!(q.dequeue(), None);
        assert_eq!(q.peek(), None);
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut q = PriorityQueue::new();
        q.enqueue("only", 7);
        assert_eq!(q.peek(), Some(&"only"));
        assert_eq!(q.len(), 1);
        assert_eq!(q.dequeue(), Some("only"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_interleaved_operations_stay_ordered() {
        let mut q = PriorityQueue::new();
        q.enqueue(10, 10);
        q.enqueue(1, 1);
        assert_eq!(q.dequeue(), Some(1));
        q.enqueue(5, 5);
        q.enqueue(3, 3);
        q.enqueue(12, 12);
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), Some(5));
        q.enqueue(2, 2);
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), Some(10));
        assert_eq!(q.dequeue(), Some(12));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn test_duplicate_priorities_all_surface() {
        let mut q = PriorityQueue::new();
        q.enqueue("x", 1);
        q.enqueue("y", 1);
        q.enqueue("z", 1);
        let mut seen: Vec<&str> = std::iter::from_fn(|| q.dequeue()).collect();
        seen.sort();
        assert_eq!(seen, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_float_tuple_priorities() {
        // The pathfinder keys entries by (price, sequence) pairs.
        let mut q = PriorityQueue::new();
        q.enqueue("second", (2.0f32, 0u64));
        q.enqueue("first-tied", (1.0f32, 1u64));
        q.enqueue("later-tied", (1.0f32, 2u64));
        assert_eq!(q.dequeue(), Some("first-tied"));
        assert_eq!(q.dequeue(), Some("later-tied"));
        assert_eq!(q.dequeue(), Some("second"));
    }

    #[test]
    fn test_large_random_like_sequence() {
        // Deterministic pseudo-shuffle, no rand dependency needed.
        let mut q = PriorityQueue::new();
        let mut value: u64 = 42;
        let mut inserted = Vec::new();
        for _ in 0..500 {
            value = value.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let p = (value >> 33) as u32;
            inserted.push(p);
            q.enqueue(p, p);
        }
        inserted.sort_unstable();
        let drained: Vec<u32> = std::iter::from_fn(|| q.dequeue()).collect();
        assert_eq!(drained, inserted);
    }
}
