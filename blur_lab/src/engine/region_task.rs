use std::fmt;

use crate::kernel::blur;
use crate::picture::{Picture, Pixel};
use crate::region::Region;
use crate::snapshot::Snapshot;

/// A region together with exclusive access to the destination pixels it owns.
///
/// `rows[k]` is the slice of row `region.j_start + k` covering
/// `region.i_start..=region.i_end`. Tasks built from one set of disjoint
/// regions never alias, so they can run on any threads without locking.
pub struct RegionTask<'a> {
    region: Region,
    rows: Vec<&'a mut [Pixel]>,
}

impl RegionTask<'_> {
    pub fn region(&self) -> Region {
        self.region
    }

    /// Blurs every pixel of the region from `snapshot` into the destination.
    pub fn run(self, snapshot: &Snapshot) {
        let Region {
            i_start, j_start, ..
        } = self.region;

        for (row_offset, segment) in self.rows.into_iter().enumerate() {
            let j = j_start + row_offset;
            for (col_offset, px) in segment.iter_mut().enumerate() {
                *px = blur(snapshot, i_start + col_offset, j);
            }
        }
    }
}

impl fmt::Debug for RegionTask<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionTask")
            .field("region", &self.region)
            .field("rows", &self.rows.len())
            .finish()
    }
}

/// Splits the picture's pixel store into one task per non-empty region.
///
/// Each row of the picture is cut at the region boundaries that cross it, so
/// every task receives only its own row segments. Empty regions are dropped.
///
/// # Panics
/// Panics if a region leaves the interior or two regions overlap.
pub(crate) fn split_into_tasks<'a>(
    picture: &'a mut Picture,
    regions: &[Region],
) -> Vec<RegionTask<'a>> {
    let width = picture.width();
    let height = picture.height();

    // Per picture row: (i_start, i_end, task index) of every region crossing it.
    let mut spans_per_row: Vec<Vec<(usize, usize, usize)>> = vec![Vec::new(); height];
    let mut tasks: Vec<RegionTask<'a>> = Vec::with_capacity(regions.len());

    for region in regions.iter().filter(|r| !r.is_empty()) {
        assert!(
            region.i_start >= 1
                && region.j_start >= 1
                && region.i_end + 1 < width
                && region.j_end + 1 < height,
            "region {region:?} is outside the interior of {width}x{height}"
        );

        let task_index = tasks.len();
        for row in &mut spans_per_row[region.j_start..=region.j_end] {
            row.push((region.i_start, region.i_end, task_index));
        }
        tasks.push(RegionTask {
            region: *region,
            rows: Vec::with_capacity(region.height()),
        });
    }

    for (j, (row, spans)) in picture
        .pixels_mut()
        .chunks_mut(width)
        .zip(spans_per_row.iter_mut())
        .enumerate()
    {
        if spans.is_empty() {
            continue;
        }
        spans.sort_unstable_by_key(|&(i_start, _, _)| i_start);

        let mut rest: &'a mut [Pixel] = row;
        let mut consumed = 0;
        for &(i_start, i_end, task_index) in spans.iter() {
            assert!(i_start >= consumed, "regions overlap on row {j}");

            let (_, tail) = std::mem::take(&mut rest).split_at_mut(i_start - consumed);
            let (segment, tail) = tail.split_at_mut(i_end - i_start + 1);
            tasks[task_index].rows.push(segment);

            rest = tail;
            consumed = i_end + 1;
        }
    }

    tasks
}
