use thiserror::Error;

const MIN_CAPACITY: usize = 2;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapErr {
    #[error("heap underflow: the queue is empty")]
    EmptyQueue,
}

/// Binary min-heap over an explicitly sized backing array.
///
/// The array starts with two slots, doubles when an insert finds it full and
/// halves after a removal once it holds at least four slots per element.
/// Slots past `size` are always `None`.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<Option<T>>,
    size: usize,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap {
            elements: (0..MIN_CAPACITY).map(|_| None).collect(),
            size: 0,
        }
    }

    pub fn heap_size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    /// Live elements in backing-array order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements[..self.size].iter().flatten()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    // Only ever drops empty slots: callers keep `capacity >= size`.
    fn resize(&mut self, capacity: usize) {
        self.elements.resize_with(capacity, || None);
    }
}

impl<T: Ord> MinHeap<T> {
    /// Adopt `source` as the backing array and heapify it bottom-up.
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap {
            size: source.len(),
            elements: source.into_iter().map(Some).collect(),
        };
        for i in (0..heap.size / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.size).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    pub fn peek_min(&self) -> Result<&T, HeapErr> {
        if self.size == 0 {
            return Err(HeapErr::EmptyQueue);
        }
        self.elements[0].as_ref().ok_or(HeapErr::EmptyQueue)
    }

    pub fn insert(&mut self, value: T) {
        if self.size == self.capacity() {
            self.resize((self.capacity() * 2).max(MIN_CAPACITY));
        }
        self.elements[self.size] = Some(value);
        self.size += 1;
        self.sift_up(self.size - 1);
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.size == 0 {
            return Err(HeapErr::EmptyQueue);
        }
        let last = self.size - 1;
        self.elements.swap(0, last);
        let min = self.elements[last].take().ok_or(HeapErr::EmptyQueue)?;
        self.size = last;
        self.sift_down(0);
        self.shrink();
        Ok(min)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[p] <= self.elements[i] {
                return;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let l = Self::left(i);
            let r = Self::right(i);

            // right child wins only when strictly smaller than the left
            let child = if r < self.size && self.elements[r] < self.elements[l] {
                r
            } else if l < self.size {
                l
            } else {
                return;
            };

            if self.elements[i] <= self.elements[child] {
                return;
            }
            self.elements.swap(i, child);
            i = child;
        }
    }

    fn shrink(&mut self) {
        let capacity = self.capacity();
        if self.size > 0 && capacity > MIN_CAPACITY && capacity >= self.size * 4 {
            self.resize((capacity / 2).max(MIN_CAPACITY));
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn slots<T: Copy>(heap: &MinHeap<T>) -> Vec<Option<T>> {
        heap.elements.clone()
    }

    #[test]
    fn insert_then_drain_in_order() {
        let mut heap = MinHeap::new();
        heap.insert(5);
        heap.insert(3);
        assert_eq!(heap.capacity(), 2);
        heap.insert(6);
        assert_eq!(heap.heap_size(), 3);
        assert_eq!(heap.peek_min(), Ok(&3));
        assert_eq!(heap.extract_min(), Ok(3));
        assert_eq!(heap.extract_min(), Ok(5));
        assert_eq!(heap.extract_min(), Ok(6));
        assert_eq!(heap.heap_size(), 0);
        assert!(heap.is_empty());
        assert_eq!(heap.capacity(), 2);
    }

    #[test]
    fn build_heapifies_in_place() {
        let mut heap = MinHeap::build(vec![5, 4, 3, 2, 1]);
        assert_eq!(heap.heap_size(), 5);
        assert_eq!(heap.capacity(), 5);
        assert_eq!(heap.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5, 4]);
        assert_eq!(heap.peek_min(), Ok(&1));

        for expected in 1..=5 {
            assert_eq!(heap.extract_min(), Ok(expected));
        }
        assert_eq!(heap.capacity(), 2);
        assert!(heap.is_empty());
    }

    #[test]
    fn growth_keeps_layout() {
        let mut heap = MinHeap::new();
        heap.insert(6);
        assert_eq!(heap.capacity(), 2);
        heap.insert(7);
        assert_eq!(slots(&heap), vec![Some(6), Some(7)]);
        heap.insert(2);
        assert_eq!(slots(&heap), vec![Some(2), Some(7), Some(6), None]);
        assert_eq!(heap.extract_min(), Ok(2));
        assert_eq!(heap.extract_min(), Ok(6));
        assert_eq!(heap.extract_min(), Ok(7));
        assert!(heap.is_empty());
    }

    #[test]
    fn capacity_doubles_on_overflow() {
        let mut heap = MinHeap::new();
        for n in 1..=40usize {
            heap.insert(n);
            assert_eq!(heap.capacity(), n.next_power_of_two().max(2), "after {n} inserts");
        }
    }

    #[test]
    fn capacity_shrinks_but_not_below_two() {
        let mut heap = MinHeap::new();
        for n in 0..64 {
            heap.insert(n);
        }
        assert_eq!(heap.capacity(), 64);
        while !heap.is_empty() {
            heap.extract_min().unwrap();
            assert!(heap.capacity() >= 2);
            assert!(heap.capacity() >= heap.heap_size());
            if heap.heap_size() > 0 {
                assert!(heap.capacity() < heap.heap_size() * 4 || heap.capacity() == 2);
            }
        }
        assert_eq!(heap.capacity(), 2);
    }

    #[test]
    fn build_from_empty_then_insert() {
        let mut heap: MinHeap<u8> = MinHeap::build(Vec::new());
        assert_eq!(heap.capacity(), 0);
        heap.insert(9);
        assert_eq!(heap.capacity(), 2);
        assert_eq!(heap.extract_min(), Ok(9));
    }

    #[test]
    fn empty_queue_errors() {
        let mut heap: MinHeap<i32> = MinHeap::default();
        assert_eq!(heap.peek_min(), Err(HeapErr::EmptyQueue));
        assert_eq!(heap.extract_min(), Err(HeapErr::EmptyQueue));
    }

    #[test]
    fn random_operations_keep_heap_property() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut heap = MinHeap::new();
        let mut shadow: Vec<i32> = Vec::new();

        for _ in 0..2_000 {
            if shadow.is_empty() || rng.gen_bool(0.6) {
                let v = rng.gen_range(-50..50);
                heap.insert(v);
                shadow.push(v);
            } else {
                shadow.sort_unstable();
                let expected = shadow.remove(0);
                assert_eq!(heap.extract_min(), Ok(expected));
            }
            assert!(heap.valid_min_heap());
            assert_eq!(heap.heap_size(), shadow.len());
        }
    }
}
