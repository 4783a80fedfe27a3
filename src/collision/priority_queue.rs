use std::cmp::Ordering;

/// Binary heap ordered by an explicit comparator.
///
/// The element that compares `Less` than every other sits on top, so a
/// comparator sorting ascending yields a min-heap.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    data: Vec<T>,
    compare: fn(&T, &T) -> Ordering,
}

impl<T> PriorityQueue<T> {
    pub fn new(compare: fn(&T, &T) -> Ordering) -> Self {
        Self {
            data: Vec::new(),
            compare,
        }
    }

    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let top = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        top
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Items in heap order, not priority order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Applies `update` to every item matching `predicate`, then restores the
    /// heap. Returns how many items were touched.
    pub fn update_where<P, U>(&mut self, mut predicate: P, mut update: U) -> usize
    where
        P: FnMut(&T) -> bool,
        U: FnMut(&mut T),
    {
        let mut touched = 0;
        for item in self.data.iter_mut() {
            if predicate(&*item) {
                update(item);
                touched += 1;
            }
        }
        if touched > 0 {
            for index in (0..self.data.len() / 2).rev() {
                self.sift_down(index);
            }
        }
        touched
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.compare)(&self.data[index], &self.data[parent]) != Ordering::Less {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let first_child = 2 * index + 1;
            let second_child = first_child + 1;
            let mut best = index;

            if first_child < len && (self.compare)(&self.data[first_child], &self.data[best]) == Ordering::Less {
                best = first_child;
            }
            if second_child < len && (self.compare)(&self.data[second_child], &self.data[best]) == Ordering::Less {
                best = second_child;
            }
            if best == index {
                return;
            }
            self.data.swap(index, best);
            index = best;
        }
    }
}
