//! Row-major cursor over every `(outer, inner)` index pair of two relations.

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PairCursor {
    outer: usize,
    inner: usize,
}

impl PairCursor {
    pub fn reset(&mut self) {
        self.outer = 0;
        self.inner = 0;
    }

    /// Returns the current pair and advances, or None once every pair was visited.
    ///
    /// An empty inner side yields no pairs at all.
    pub fn advance(&mut self, outer_len: usize, inner_len: usize) -> Option<(usize, usize)> {
        if self.outer >= outer_len || inner_len == 0 {
            return None;
        }
        let pair = (self.outer, self.inner);
        self.inner += 1;
        if self.inner >= inner_len {
            self.inner = 0;
            self.outer += 1;
        }
        Some(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_order() {
        let mut cursor = PairCursor::default();
        let mut pairs = Vec::new();
        while let Some(pair) = cursor.advance(2, 3) {
            pairs.push(pair);
        }
        assert_eq!(pairs, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(cursor.advance(2, 3), None);

        cursor.reset();
        assert_eq!(cursor.advance(2, 3), Some((0, 0)));
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(PairCursor::default().advance(0, 3), None);
        assert_eq!(PairCursor::default().advance(3, 0), None);
    }
}
