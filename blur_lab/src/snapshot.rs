use crate::picture::{Picture, Pixel};

/// Read-only copy of a picture taken at the start of a pass.
///
/// Regions read their neighborhoods from here while writing into the live
/// picture, so a pass never observes its own output. The snapshot is owned by
/// the pass and borrowed by every worker; it is dropped when the pass returns,
/// which the borrow checker orders after the last worker has finished.
#[derive(Debug)]
pub struct Snapshot {
    source: Picture,
}

impl Snapshot {
    /// Copies the full pixel store of `picture`.
    pub fn capture(picture: &Picture) -> Self {
        tracing::trace!(
            width = picture.width(),
            height = picture.height(),
            "Capturing snapshot"
        );
        Self {
            source: picture.clone(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.source.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.source.height()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Pixel {
        self.source.get(i, j)
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        self.source.pixels()
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        tracing::trace!(
            width = self.source.width(),
            height = self.source.height(),
            "Releasing snapshot"
        );
    }
}

impl Picture {
    /// Overwrites every pixel with the snapshot's contents.
    ///
    /// # Panics
    /// Panics if the snapshot was taken from a picture of another size.
    pub fn restore_from(&mut self, snapshot: &Snapshot) {
        assert_eq!(self.width(), snapshot.width(), "width mismatch");
        assert_eq!(self.height(), snapshot.height(), "height mismatch");
        self.pixels_mut().copy_from_slice(snapshot.pixels());
    }
}
