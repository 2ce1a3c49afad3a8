use serde::Serialize;

/// A rectangular unit of blur work, inclusive on both ends of both ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    pub i_start: usize,
    pub i_end: usize,
    pub j_start: usize,
    pub j_end: usize,
}

impl Region {
    pub const fn new(i_start: usize, i_end: usize, j_start: usize, j_end: usize) -> Self {
        Self {
            i_start,
            i_end,
            j_start,
            j_end,
        }
    }

    pub const fn pixel(i: usize, j: usize) -> Self {
        Self::new(i, i, j, j)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.i_end < self.i_start || self.j_end < self.j_start
    }

    #[inline]
    pub fn width(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.i_end - self.i_start + 1
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.j_end - self.j_start + 1
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        (self.i_start..=self.i_end).contains(&i) && (self.j_start..=self.j_end).contains(&j)
    }

    /// Iterates the region's coordinates row by row.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.j_start..=self.j_end)
            .flat_map(move |j| (self.i_start..=self.i_end).map(move |i| (i, j)))
    }
}
