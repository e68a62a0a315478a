use crate::{BoundsCheckError, PackedFormat};

/// Everything that can go wrong when constructing a [`Destination`]
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    #[error("width or height must not be zero")]
    InvalidDimensions,

    #[error(transparent)]
    BoundsCheck(#[from] BoundsCheckError),
}

/// Writable packed pixel buffer, usually borrowed from a presentation surface for a single frame
#[derive(Debug)]
pub struct Destination<'a> {
    format: PackedFormat,
    buf: &'a mut [u8],
    stride: usize,
    width: usize,
    height: usize,
}

impl<'a> Destination<'a> {
    /// Wrap `buf` as a `width` x `height` image of `format`.
    ///
    /// Without an explicit `stride` the rows are assumed to be packed.
    pub fn new(
        format: PackedFormat,
        buf: &'a mut [u8],
        stride: Option<usize>,
        width: usize,
        height: usize,
    ) -> Result<Self, DestinationError> {
        if width == 0 || height == 0 {
            return Err(DestinationError::InvalidDimensions);
        }

        let stride = stride.unwrap_or_else(|| format.packed_stride(width));

        format.bounds_check(buf, stride, width, height)?;

        Ok(Self {
            format,
            buf,
            stride,
            width,
            height,
        })
    }

    /// Horizontal band of an already checked destination, `buf` starts at the band's first row
    pub(crate) fn band(
        format: PackedFormat,
        buf: &'a mut [u8],
        stride: usize,
        width: usize,
        height: usize,
    ) -> Self {
        debug_assert!(format.bounds_check(buf, stride, width, height).is_ok());

        Self {
            format,
            buf,
            stride,
            width,
            height,
        }
    }

    pub fn format(&self) -> PackedFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Visible bytes of row `y`, padding excluded
    #[inline(always)]
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let len = self.format.packed_stride(self.width);

        &mut self.buf[start..start + len]
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        &mut *self.buf
    }
}

/// Owned packed image, the counterpart to [`Destination`]
#[derive(Debug, Clone)]
pub struct PackedImage {
    format: PackedFormat,
    buffer: Vec<u8>,
    stride: usize,
    width: usize,
    height: usize,
}

impl PackedImage {
    pub fn blank(format: PackedFormat, width: usize, height: usize) -> Self {
        Self::with_stride(format, width, height, format.packed_stride(width))
    }

    /// Create a zeroed image whose rows are `stride` bytes apart
    ///
    /// # Panics
    ///
    /// If `stride` is smaller than a packed row of `width` pixels
    pub fn with_stride(format: PackedFormat, width: usize, height: usize, stride: usize) -> Self {
        assert!(
            stride >= format.packed_stride(width),
            "stride {stride} too small for {width} pixels of {format:?}"
        );

        Self {
            format,
            buffer: vec![0u8; format.buffer_size(stride, height)],
            stride,
            width,
            height,
        }
    }

    pub fn format(&self) -> PackedFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    /// Visible bytes of row `y`, padding excluded
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;

        &self.buffer[start..start + self.format.packed_stride(self.width)]
    }

    /// Bytes of the pixel at `x`, `y`
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();

        &self.row(y)[x * bpp..(x + 1) * bpp]
    }

    /// Copy all visible rows into a new buffer without padding
    pub fn to_packed_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.format.packed_stride(self.width) * self.height);

        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }

        out
    }

    pub fn as_destination(&mut self) -> Result<Destination<'_>, DestinationError> {
        Destination::new(
            self.format,
            &mut self.buffer,
            Some(self.stride),
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_stride_by_default() {
        let mut buf = vec![0u8; 4 * 2 * 3];
        let dst = Destination::new(PackedFormat::RGB, &mut buf, None, 4, 2).unwrap();

        assert_eq!(dst.stride(), 12);
    }

    #[test]
    fn buffer_too_small() {
        let mut buf = vec![0u8; 23];
        let err = Destination::new(PackedFormat::RGB, &mut buf, None, 4, 2).unwrap_err();

        assert!(matches!(
            err,
            DestinationError::BoundsCheck(BoundsCheckError::InvalidPlaneSize {
                minimum: 24,
                got: 23,
                ..
            })
        ));
    }

    #[test]
    fn row_excludes_padding() {
        let mut image = PackedImage::with_stride(PackedFormat::BGRA, 2, 2, 16);
        image.buffer_mut().fill(7);

        assert_eq!(image.row(1).len(), 8);
        assert_eq!(image.pixel(1, 1), &[7, 7, 7, 7]);
        assert_eq!(image.to_packed_vec().len(), 16);

        let mut dst = image.as_destination().unwrap();
        assert_eq!(dst.row_mut(1).len(), 8);
    }
}
