use std::ops::AddAssign;

/// Work done by one or more draw submissions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawCounts {
    /// Text triangles.
    pub triangles: u32,
    pub fills: u32,
    pub strokes: u32,
    pub draw_calls: u32,
}

impl DrawCounts {
    /// Counts for a single text submission of `vertex_count` vertices.
    pub fn text(vertex_count: usize) -> Self {
        Self {
            triangles: (vertex_count / 3) as u32,
            fills: 0,
            strokes: 0,
            draw_calls: 1,
        }
    }
}

impl AddAssign for DrawCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.triangles += rhs.triangles;
        self.fills += rhs.fills;
        self.strokes += rhs.strokes;
        self.draw_calls += rhs.draw_calls;
    }
}

/// Per-frame accumulator of [`DrawCounts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    totals: DrawCounts,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, counts: DrawCounts) {
        self.totals += counts;
    }

    pub fn totals(&self) -> DrawCounts {
        self.totals
    }

    pub fn reset(&mut self) {
        self.totals = DrawCounts::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_counts() {
        let counts = DrawCounts::text(12);
        assert_eq!(counts.triangles, 4);
        assert_eq!(counts.fills, 0);
        assert_eq!(counts.strokes, 0);
        assert_eq!(counts.draw_calls, 1);
    }

    #[test]
    fn accumulates_until_reset() {
        let mut stats = FrameStats::new();
        stats.record(DrawCounts::text(6));
        stats.record(DrawCounts::text(3));
        assert_eq!(stats.totals().triangles, 3);
        assert_eq!(stats.totals().draw_calls, 2);

        stats.reset();
        assert_eq!(stats.totals(), DrawCounts::default());
    }
}
