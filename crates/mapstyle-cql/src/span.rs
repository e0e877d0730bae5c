//! Byte ranges into expression source text.

use std::ops::Range;

/// A half-open byte range in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the smallest span covering both spans.
    pub fn union(self, other: Span) -> Span {
        Span::new(self.start.min(other.start)..self.end.max(other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_union() {
        let a = Span::new(2..5);
        let b = Span::new(8..10);
        assert_eq!(a.union(b), Span::new(2..10));
        assert_eq!(b.union(a), Span::new(2..10));
    }

    #[test]
    fn test_span_len() {
        assert_eq!(Span::new(3..7).len(), 4);
        assert!(Span::new(4..4).is_empty());
        assert!(Span::new(5..2).is_empty());
    }
}
