use crate::error::TesseraTypesError;
use crate::flags::Flags;
use crate::point::Point4d;
use crate::point_array::PointSequence;

#[derive(Debug, Copy, Clone)]
enum Storage<'a> {
    LeBytes(&'a [u8]),
    Ordinates(&'a [f64]),
}

/// Read-only view over points owned by someone else.
///
/// The view can point either into a byte buffer holding little-endian `f64` ordinates (as found in serialized
/// geometries) or into the ordinates of a [`PointBuf`](super::PointBuf). It never copies or modifies the underlying data, and cannot
/// outlive it.
#[derive(Debug, Copy, Clone)]
pub struct PointView<'a> {
    flags: Flags,
    npoints: usize,
    storage: Storage<'a>,
}

impl<'a> PointView<'a> {
    /// Creates a view of `npoints` points over interleaved little-endian `f64` ordinates.
    ///
    /// The byte slice must be exactly `npoints * ndims * 8` bytes long.
    pub fn from_le_bytes(flags: Flags, npoints: usize, bytes: &'a [u8]) -> Result<Self, TesseraTypesError> {
        let ndims = flags.ndims();
        if npoints.checked_mul(ndims * 8) != Some(bytes.len()) {
            return Err(TesseraTypesError::BufferSize {
                npoints,
                ndims,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            flags,
            npoints,
            storage: Storage::LeBytes(bytes),
        })
    }

    /// Creates a view over interleaved ordinates.
    pub fn from_ordinates(flags: Flags, ordinates: &'a [f64]) -> Result<Self, TesseraTypesError> {
        let ndims = flags.ndims();
        if ordinates.len() % ndims != 0 {
            return Err(TesseraTypesError::BufferSize {
                npoints: ordinates.len() / ndims,
                ndims,
                actual: ordinates.len() * 8,
            });
        }

        Ok(Self::from_ordinates_unchecked(flags, ordinates))
    }

    pub(crate) fn from_ordinates_unchecked(flags: Flags, ordinates: &'a [f64]) -> Self {
        Self {
            flags,
            npoints: ordinates.len() / flags.ndims(),
            storage: Storage::Ordinates(ordinates),
        }
    }

    pub(crate) fn set_geodetic(&mut self, geodetic: bool) {
        self.flags.geodetic = geodetic;
    }

    /// Returns true if the view reads directly from a serialized byte buffer.
    pub fn is_byte_backed(&self) -> bool {
        matches!(self.storage, Storage::LeBytes(_))
    }

    fn ordinate(&self, index: usize) -> f64 {
        match self.storage {
            Storage::Ordinates(ordinates) => ordinates[index],
            Storage::LeBytes(bytes) => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[index * 8..index * 8 + 8]);
                f64::from_le_bytes(raw)
            }
        }
    }
}

impl PointSequence for PointView<'_> {
    fn flags(&self) -> Flags {
        self.flags
    }

    fn len(&self) -> usize {
        self.npoints
    }

    fn point(&self, index: usize) -> Option<Point4d> {
        if index >= self.npoints {
            return None;
        }

        let ndims = self.flags.ndims();
        let mut ordinates = [0.0; 4];
        for (d, value) in ordinates.iter_mut().enumerate().take(ndims) {
            *value = self.ordinate(index * ndims + d);
        }

        Some(Point4d::from_ordinates(&ordinates[..ndims], self.flags))
    }
}
