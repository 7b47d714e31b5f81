//! Fixed-capacity circular store of graph samples.
//!
//! The write cursor always names the slot that will be overwritten next. That
//! slot is never displayed, so after the first wrap the visible history is the
//! `capacity - 1` most recent samples, oldest first:
//! `[cursor + 1 .. capacity) ++ [0 .. cursor)`.

use std::ops::Range;

pub struct SampleRing {
    data: Vec<f32>,
    cursor: usize,
}

impl SampleRing {
    /// Create a ring of `capacity` zeroed slots. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Slot that will be written by the next [`push`](Self::push).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, slot: usize) -> Option<f32> {
        self.data.get(slot).copied()
    }

    /// Store a sample, clamped to [0, 1], and advance the cursor.
    ///
    /// Returns the slot that was written. NaN is stored as 0.
    pub fn push(&mut self, value: f32) -> usize {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let slot = self.cursor;
        self.data[slot] = value;
        self.cursor = (self.cursor + 1) % self.data.len();
        slot
    }

    /// The (at most two) slot ranges to display, oldest range first.
    ///
    /// Empty ranges are omitted: with the cursor at 0 only the tail range is
    /// returned, with the cursor at `capacity - 1` only the head range.
    pub fn visible_ranges(&self) -> impl Iterator<Item = Range<usize>> {
        let older = self.cursor + 1..self.data.len();
        let newer = 0..self.cursor;
        [older, newer].into_iter().filter(|r| !r.is_empty())
    }

    /// Visible samples in chronological order.
    pub fn chronological(&self) -> impl Iterator<Item = f32> + '_ {
        self.visible_ranges()
            .flat_map(move |range| self.data[range].iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_clamps_out_of_range_values() {
        let mut ring = SampleRing::new(4);
        ring.push(-0.5);
        ring.push(1.7);
        ring.push(f32::NAN);
        assert_eq!(ring.get(0), Some(0.0));
        assert_eq!(ring.get(1), Some(1.0));
        assert_eq!(ring.get(2), Some(0.0));
    }

    #[test]
    fn test_cursor_wraps() {
        let mut ring = SampleRing::new(3);
        assert_eq!(ring.push(0.1), 0);
        assert_eq!(ring.push(0.2), 1);
        assert_eq!(ring.push(0.3), 2);
        assert_eq!(ring.cursor(), 0);
        assert_eq!(ring.push(0.4), 0);
        assert_eq!(ring.cursor(), 1);
    }

    #[test]
    fn test_visible_ranges_skip_empty() {
        let mut ring = SampleRing::new(5);
        let ranges: Vec<_> = ring.visible_ranges().collect();
        assert_eq!(ranges, vec![1..5]);

        for _ in 0..4 {
            ring.push(0.5);
        }
        assert_eq!(ring.cursor(), 4);
        let ranges: Vec<_> = ring.visible_ranges().collect();
        assert_eq!(ranges, vec![0..4]);

        ring.push(0.5);
        ring.push(0.5);
        ring.push(0.5);
        let ranges: Vec<_> = ring.visible_ranges().collect();
        assert_eq!(ranges, vec![3..5, 0..2]);
    }

    #[test]
    fn test_chronological_after_wrap() {
        let capacity = 8;
        let mut ring = SampleRing::new(capacity);
        let samples: Vec<f32> = (0..capacity + 3).map(|i| i as f32 / 100.0).collect();
        for &s in &samples {
            ring.push(s);
        }
        let visible: Vec<f32> = ring.chronological().collect();
        assert_eq!(visible.len(), capacity - 1);
        assert_eq!(visible, samples[samples.len() - (capacity - 1)..].to_vec());
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let mut ring = SampleRing::new(0);
        assert_eq!(ring.capacity(), 1);
        ring.push(0.3);
        assert_eq!(ring.cursor(), 0);
        assert_eq!(ring.visible_ranges().count(), 0);
    }
}
