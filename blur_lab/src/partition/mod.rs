//! Partition planning.
//!
//! Every planner returns regions that are pairwise disjoint and whose union
//! is exactly the interior `[1, W-2] x [1, H-2]`. Pictures without an
//! interior (W <= 2 or H <= 2) produce an empty plan.


use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::region::Region;

/// How the interior is cut into regions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartitionKind {
    /// One region per interior row.
    Row,
    /// One region per interior column.
    Column,
    /// One 1x1 region per interior pixel.
    Pixel,
    /// A `floor(sqrt(sectors))` square grid of rectangles.
    Sector,
}

/// Plans the regions for `kind` over a `width` x `height` picture.
///
/// `sectors` is the target sector count and only matters for
/// [`PartitionKind::Sector`].
pub fn plan(kind: PartitionKind, width: usize, height: usize, sectors: usize) -> Vec<Region> {
    match kind {
        PartitionKind::Row => rows(width, height),
        PartitionKind::Column => columns(width, height),
        PartitionKind::Pixel => pixels(width, height),
        PartitionKind::Sector => sectors_grid(width, height, sectors),
    }
}

/// The whole interior as one region, or nothing if there is no interior.
pub fn whole_interior(width: usize, height: usize) -> Option<Region> {
    has_interior(width, height).then(|| Region::new(1, width - 2, 1, height - 2))
}

#[inline]
fn has_interior(width: usize, height: usize) -> bool {
    width > 2 && height > 2
}

pub fn rows(width: usize, height: usize) -> Vec<Region> {
    if !has_interior(width, height) {
        return Vec::new();
    }

    (1..height - 1)
        .map(|j| Region::new(1, width - 2, j, j))
        .collect()
}

pub fn columns(width: usize, height: usize) -> Vec<Region> {
    if !has_interior(width, height) {
        return Vec::new();
    }

    (1..width - 1)
        .map(|i| Region::new(i, i, 1, height - 2))
        .collect()
}

pub fn pixels(width: usize, height: usize) -> Vec<Region> {
    if !has_interior(width, height) {
        return Vec::new();
    }

    let mut regions = Vec::with_capacity((width - 2) * (height - 2));
    for j in 1..height - 1 {
        for i in 1..width - 1 {
            regions.push(Region::pixel(i, j));
        }
    }
    regions
}

/// Grid of sectors, row-major.
///
/// The last sector in each sector-row takes the leftover width and the last
/// sector-row takes the leftover height. A split larger than an interior
/// extent is clamped to that extent, so no sector is ever zero-sized.
pub fn sectors_grid(width: usize, height: usize, sectors: usize) -> Vec<Region> {
    let split = split_factor(sectors);
    if !has_interior(width, height) || split == 0 {
        return Vec::new();
    }

    let interior_w = width - 2;
    let interior_h = height - 2;
    let cols = split.min(interior_w);
    let rows = split.min(interior_h);

    let mut regions = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        let (j_start, j_end) = band(row, rows, interior_h);
        for col in 0..cols {
            let (i_start, i_end) = band(col, cols, interior_w);
            regions.push(Region::new(i_start, i_end, j_start, j_end));
        }
    }
    regions
}

/// Inclusive interior coordinates of band `index` out of `count` over an
/// interior of `extent` pixels starting at coordinate 1.
#[inline]
fn band(index: usize, count: usize, extent: usize) -> (usize, usize) {
    let nominal = extent / count;
    let start = 1 + index * nominal;
    let end = if index + 1 == count {
        extent
    } else {
        start + nominal - 1
    };
    (start, end)
}

/// `floor(sqrt(count))`, exact for every `usize`.
pub fn split_factor(count: usize) -> usize {
    let mut split = (count as f64).sqrt() as usize;
    while split > 0 && split.checked_mul(split).is_none_or(|sq| sq > count) {
        split -= 1;
    }
    while (split + 1)
        .checked_mul(split + 1)
        .is_some_and(|sq| sq <= count)
    {
        split += 1;
    }
    split
}
