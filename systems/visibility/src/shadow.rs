//! Occlusion intervals tracked while scanning a single octant.

/// Half-open slope interval `[start, end)` hidden behind an opaque tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shadow {
    start: f64,
    end: f64,
}

impl Shadow {
    pub(crate) const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Projects an octant-local tile onto the unit slope range.
    ///
    /// The start edge uses `row + 2` rather than `row + 1`, which biases the
    /// projection slightly inward.
    pub(crate) fn project_tile(row: u32, col: u32) -> Self {
        let row = f64::from(row);
        let col = f64::from(col);
        Self::new(col / (row + 2.0), (col + 1.0) / (row + 1.0))
    }

    /// Whether `other` lies entirely within this shadow.
    pub(crate) fn contains(&self, other: &Shadow) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

/// Sorted set of disjoint shadows accumulated along one octant.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShadowLine {
    shadows: Vec<Shadow>,
}

impl ShadowLine {
    pub(crate) fn is_in_shadow(&self, projection: &Shadow) -> bool {
        self.shadows.iter().any(|shadow| shadow.contains(projection))
    }

    /// True once a single shadow spans the whole octant.
    pub(crate) fn is_full_shadow(&self) -> bool {
        matches!(self.shadows.as_slice(), [only] if only.start == 0.0 && only.end == 1.0)
    }

    /// Inserts a shadow, merging it with every shadow it overlaps or touches.
    pub(crate) fn add(&mut self, shadow: Shadow) {
        let index = self
            .shadows
            .iter()
            .position(|existing| existing.start >= shadow.start)
            .unwrap_or(self.shadows.len());

        let merges_previous = index > 0 && self.shadows[index - 1].end >= shadow.start;
        let target = if merges_previous {
            let previous = &mut self.shadows[index - 1];
            previous.end = previous.end.max(shadow.end);
            index - 1
        } else {
            self.shadows.insert(index, shadow);
            index
        };

        while target + 1 < self.shadows.len()
            && self.shadows[target + 1].start <= self.shadows[target].end
        {
            let next = self.shadows.remove(target + 1);
            let merged = &mut self.shadows[target];
            merged.end = merged.end.max(next.end);
        }
    }

    #[cfg(test)]
    pub(crate) fn shadows(&self) -> &[Shadow] {
        &self.shadows
    }
}
