use crate::picture::Pixel;
use crate::snapshot::Snapshot;

/// Number of samples in the 3x3 neighborhood.
pub const BLUR_REGION_SIZE: u32 = 9;

/// Box-blurs the pixel at `(i, j)` of `source`.
///
/// Each channel is the truncating average of the nine samples centered on
/// `(i, j)`. `(i, j)` must be an interior coordinate.
#[inline]
pub fn blur(source: &Snapshot, i: usize, j: usize) -> Pixel {
    debug_assert!(
        i >= 1 && j >= 1 && i + 1 < source.width() && j + 1 < source.height(),
        "({i}, {j}) is not an interior coordinate"
    );

    let mut red = 0u32;
    let mut green = 0u32;
    let mut blue = 0u32;

    for y in j - 1..=j + 1 {
        for x in i - 1..=i + 1 {
            let px = source.get(x, y);
            red += px.red as u32;
            green += px.green as u32;
            blue += px.blue as u32;
        }
    }

    Pixel::new(
        (red / BLUR_REGION_SIZE) as u8,
        (green / BLUR_REGION_SIZE) as u8,
        (blue / BLUR_REGION_SIZE) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::Picture;

    fn snapshot_of(picture: &Picture) -> Snapshot {
        Snapshot::capture(picture)
    }

    #[test]
    fn test_uniform_neighborhood_is_unchanged() {
        for color in [Pixel::new(10, 20, 30), Pixel::gray(255), Pixel::BLACK] {
            let pic = Picture::new_filled(3, 3, color).unwrap();
            assert_eq!(blur(&snapshot_of(&pic), 1, 1), color);
        }
    }

    #[test]
    fn test_average_truncates() {
        // Sum of red = 8 * 0 + 1 * 17 = 17, 17 / 9 = 1.
        let mut pic = Picture::new_filled(3, 3, Pixel::BLACK).unwrap();
        pic.set(2, 2, Pixel::new(17, 8, 255));
        assert_eq!(blur(&snapshot_of(&pic), 1, 1), Pixel::new(1, 0, 28));
    }

    #[test]
    fn test_reads_only_the_neighborhood() {
        // Bright pixels outside the 3x3 window around (1, 1) do not contribute.
        let pic = Picture::from_fn(5, 5, |i, j| {
            if i > 2 || j > 2 {
                Pixel::gray(255)
            } else {
                Pixel::gray(9)
            }
        })
        .unwrap();
        assert_eq!(blur(&snapshot_of(&pic), 1, 1), Pixel::gray(9));
        // (2, 2) sees five bright samples: (5 * 255 + 4 * 9) / 9 = 145.
        assert_eq!(blur(&snapshot_of(&pic), 2, 2), Pixel::gray(145));
    }

    #[test]
    fn test_channels_are_independent() {
        let pic = Picture::from_fn(3, 3, |i, _| Pixel::new(90, (i * 90) as u8, 0)).unwrap();
        // green column sums: 3 * (0 + 90 + 180) = 810, 810 / 9 = 90
        assert_eq!(blur(&snapshot_of(&pic), 1, 1), Pixel::new(90, 90, 0));
    }

    #[test]
    fn test_saturated_neighborhood_does_not_overflow() {
        let pic = Picture::new_filled(3, 3, Pixel::new(255, 254, 253)).unwrap();
        assert_eq!(blur(&snapshot_of(&pic), 1, 1), Pixel::new(255, 254, 253));
    }
}
