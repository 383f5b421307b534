//! 1-based inclusive item ranges

use serde::{Deserialize, Serialize};
use std::ops::Range as Span;

/// Requested item range, 1-based and inclusive. `end == 0` means "to the last item".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    /// Build a range from raw request values, flooring `start` at 1 and `end` at 0
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start: start.max(1) as u64,
            end: end.max(0) as u64,
        }
    }

    /// The whole playlist
    pub fn full() -> Self {
        Self { start: 1, end: 0 }
    }

    /// Resolve against the actual item count into a zero-based half-open span.
    ///
    /// Both bounds are clamped into `[0, total]` and the span is never inverted,
    /// so a start past the end yields an empty selection.
    pub fn resolve(&self, total: usize) -> Span<usize> {
        let start = usize::try_from(self.start.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .min(total);
        let end = if self.end > 0 {
            usize::try_from(self.end).unwrap_or(usize::MAX).min(total)
        } else {
            total
        };

        start..end.max(start)
    }

    /// Display label such as `1-25`; an open end shows the playlist length
    pub fn label(&self, total: usize) -> String {
        let end = if self.end > 0 { self.end as usize } else { total };
        format!("{}-{}", self.start, end)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::full()
    }
}
