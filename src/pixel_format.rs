use crate::plane_decs::*;

/// Chroma subsampling of a planar YCbCr frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChromaSubsampling {
    /// Y, Cb and Cr planes, 4:4:4 sub sampling (full resolution chroma)
    Cs444,

    /// Y, Cb and Cr planes, 4:2:2 sub sampling (chroma halved horizontally)
    Cs422,

    /// Y, Cb and Cr planes, 4:2:0 sub sampling (chroma halved in both axes)
    Cs420,
}

impl ChromaSubsampling {
    /// Horizontal and vertical shift applied to luma coordinates to address the chroma planes
    pub fn shifts(self) -> (u32, u32) {
        match self {
            ChromaSubsampling::Cs444 => (0, 0),
            ChromaSubsampling::Cs422 => (1, 0),
            ChromaSubsampling::Cs420 => (1, 1),
        }
    }

    /// Dimensions of a single chroma plane for a frame of the given luma dimensions
    pub fn chroma_size(self, width: usize, height: usize) -> (usize, usize) {
        let [_, chroma, _] = self.plane_desc();

        (chroma.packed_stride(width), chroma.rows(height))
    }

    /// Calculate the size of a buffer holding all three planes without any row padding
    pub fn buffer_size(self, width: usize, height: usize) -> usize {
        self.plane_desc()
            .iter()
            .map(|desc| desc.packed_stride(width).saturating_mul(desc.rows(height)))
            .fold(0, usize::saturating_add)
    }

    /// Calculate the strides of a frame in a packed buffer
    pub fn packed_strides(self, width: usize) -> [usize; 3] {
        self.plane_desc().map(|desc| desc.packed_stride(width))
    }

    /// Check if the given planes+strides are valid for dimensions
    pub fn bounds_check(
        self,
        planes: [(&[u8], usize); 3],
        width: usize,
        height: usize,
    ) -> Result<(), BoundsCheckError> {
        for (i, (desc, (slice, stride))) in self.plane_desc().iter().zip(planes).enumerate() {
            desc.bounds_check(i, slice.len(), stride, width, height)?;
        }

        Ok(())
    }

    pub(crate) fn plane_desc(self) -> [PlaneDesc; 3] {
        match self {
            ChromaSubsampling::Cs444 => I444_PLANES,
            ChromaSubsampling::Cs422 => I422_PLANES,
            ChromaSubsampling::Cs420 => I420_PLANES,
        }
    }

    pub fn variants() -> impl IntoIterator<Item = Self> {
        use ChromaSubsampling::*;

        [Cs444, Cs422, Cs420]
    }
}

/// Packed pixel formats a frame can be converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackedFormat {
    /// 3 bytes per pixel in R, G, B order
    RGB,

    /// 3 bytes per pixel in B, G, R order
    BGR,

    /// 4 bytes per pixel in R, G, B, A order, alpha is always opaque
    RGBA,

    /// 4 bytes per pixel in B, G, R, A order, alpha is always opaque.
    ///
    /// This is the memory layout of a 32 bit XRGB word on little endian targets.
    BGRA,
}

impl PackedFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PackedFormat::RGB | PackedFormat::BGR => 3,
            PackedFormat::RGBA | PackedFormat::BGRA => 4,
        }
    }

    /// Stride of a row without any padding
    pub fn packed_stride(self, width: usize) -> usize {
        self.plane_desc().packed_stride(width)
    }

    /// Calculate the required buffer size for the given dimensions and row stride
    pub fn buffer_size(self, stride: usize, height: usize) -> usize {
        stride.saturating_mul(height)
    }

    /// Check if the given buffer+stride is valid for dimensions
    pub fn bounds_check(
        self,
        buf: &[u8],
        stride: usize,
        width: usize,
        height: usize,
    ) -> Result<(), BoundsCheckError> {
        self.plane_desc()
            .bounds_check(0, buf.len(), stride, width, height)
    }

    pub(crate) fn plane_desc(self) -> PlaneDesc {
        match self {
            PackedFormat::RGB | PackedFormat::BGR => RGB_PLANE,
            PackedFormat::RGBA | PackedFormat::BGRA => RGBA_PLANE,
        }
    }

    pub fn variants() -> impl IntoIterator<Item = Self> {
        use PackedFormat::*;

        [RGB, BGR, RGBA, BGRA]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundsCheckError {
    #[error("invalid stride at plane {plane}, expected it to be at least {minimum}, but got {got}")]
    InvalidStride {
        plane: usize,
        minimum: usize,
        got: usize,
    },

    #[error(
        "invalid plane size at plane {plane}, expected it to be at least {minimum}, but got {got}"
    )]
    InvalidPlaneSize {
        plane: usize,
        minimum: usize,
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_follow_subsampling() {
        assert_eq!(ChromaSubsampling::Cs444.shifts(), (0, 0));
        assert_eq!(ChromaSubsampling::Cs422.shifts(), (1, 0));
        assert_eq!(ChromaSubsampling::Cs420.shifts(), (1, 1));
    }

    #[test]
    fn packed_buffer_sizes() {
        assert_eq!(ChromaSubsampling::Cs420.buffer_size(4, 4), 16 + 4 + 4);
        assert_eq!(ChromaSubsampling::Cs422.buffer_size(4, 4), 16 + 8 + 8);
        assert_eq!(ChromaSubsampling::Cs444.buffer_size(4, 4), 16 * 3);

        // Odd sizes keep the trailing chroma sample
        assert_eq!(ChromaSubsampling::Cs420.chroma_size(5, 3), (3, 2));
        assert_eq!(ChromaSubsampling::Cs420.packed_strides(5), [5, 3, 3]);
    }

    #[test]
    fn bounds_check_reports_plane() {
        let y = [0u8; 16];
        let c = [0u8; 3];

        let err = ChromaSubsampling::Cs420
            .bounds_check([(&y[..], 4), (&c[..], 2), (&c[..], 2)], 4, 4)
            .unwrap_err();

        assert!(matches!(
            err,
            BoundsCheckError::InvalidPlaneSize {
                plane: 1,
                minimum: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn packed_format_sizes() {
        for format in PackedFormat::variants() {
            let stride = format.packed_stride(10);
            assert_eq!(stride, 10 * format.bytes_per_pixel());
            assert_eq!(format.buffer_size(stride, 2), stride * 2);
        }
    }
}
