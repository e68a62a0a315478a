use crate::{BoundsCheckError, ChromaSubsampling};

/// Everything that can go wrong when constructing a [`Frame`]
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("width or height must not be zero")]
    InvalidDimensions,

    #[error(transparent)]
    BoundsCheck(#[from] BoundsCheckError),
}

/// A single plane of samples, borrowed from whoever decoded it
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    data: &'a [u8],
    stride: usize,
}

impl<'a> Plane<'a> {
    pub fn new(data: &'a [u8], stride: usize) -> Self {
        Self { data, stride }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes between the start of two consecutive rows
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Visible samples of row `y`. Only valid after the owning frame passed its bounds check.
    #[inline(always)]
    pub(crate) fn row(&self, y: usize, width: usize) -> &'a [u8] {
        let start = y * self.stride;

        &self.data[start..start + width]
    }
}

/// One decoded picture as planar YCbCr: a full resolution luma plane and two chroma planes
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    width: usize,
    height: usize,
    subsampling: ChromaSubsampling,
    planes: [Plane<'a>; 3],
}

impl<'a> Frame<'a> {
    /// Create a frame from its Y, Cb and Cr planes (in that order)
    pub fn new(
        width: usize,
        height: usize,
        subsampling: ChromaSubsampling,
        planes: [Plane<'a>; 3],
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions);
        }

        subsampling.bounds_check(planes.map(|p| (p.data, p.stride)), width, height)?;

        Ok(Self {
            width,
            height,
            subsampling,
            planes,
        })
    }

    /// Create a frame from a single buffer holding all three planes back to back without row padding
    pub fn from_buffer(
        subsampling: ChromaSubsampling,
        buf: &'a [u8],
        width: usize,
        height: usize,
    ) -> Result<Self, FrameError> {
        let [y, cb, cr] = split_planes(subsampling, buf, width, height)?;
        let [y_stride, c_stride, _] = subsampling.packed_strides(width);

        Self::new(
            width,
            height,
            subsampling,
            [
                Plane::new(y, y_stride),
                Plane::new(cb, c_stride),
                Plane::new(cr, c_stride),
            ],
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn subsampling(&self) -> ChromaSubsampling {
        self.subsampling
    }

    /// The Y, Cb and Cr planes
    pub fn planes(&self) -> [Plane<'a>; 3] {
        self.planes
    }

    pub fn luma(&self) -> Plane<'a> {
        self.planes[0]
    }

    /// Width and height of plane `index` (0 = luma, 1 = Cb, 2 = Cr)
    pub fn plane_size(&self, index: usize) -> (usize, usize) {
        let desc = self.subsampling.plane_desc()[index];

        (desc.packed_stride(self.width), desc.rows(self.height))
    }
}

/// Split a packed three plane buffer into its planes
fn split_planes(
    subsampling: ChromaSubsampling,
    buf: &[u8],
    width: usize,
    height: usize,
) -> Result<[&[u8]; 3], BoundsCheckError> {
    let mut out: [&[u8]; 3] = [&[]; 3];
    let mut rem = buf;

    for (i, (desc, out)) in subsampling
        .plane_desc()
        .iter()
        .zip(out.iter_mut())
        .enumerate()
    {
        let len = desc.packed_stride(width).saturating_mul(desc.rows(height));

        if len > rem.len() {
            return Err(BoundsCheckError::InvalidPlaneSize {
                plane: i,
                minimum: len,
                got: rem.len(),
            });
        }

        let (plane, tail) = rem.split_at(len);
        *out = plane;
        rem = tail;
    }

    Ok(out)
}

/// Owned planar frame, used where samples are generated instead of decoded
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    subsampling: ChromaSubsampling,
    buffer: Vec<u8>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    /// Create a frame filled with black (Y = 0, Cb = Cr = 128)
    pub fn blank(subsampling: ChromaSubsampling, width: usize, height: usize) -> Self {
        let luma_len = width * height;
        let mut buffer = vec![128u8; subsampling.buffer_size(width, height)];
        buffer[..luma_len].fill(0);

        Self {
            subsampling,
            buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn subsampling(&self) -> ChromaSubsampling {
        self.subsampling
    }

    /// Mutable access to the Y, Cb and Cr planes together with their strides
    pub fn planes_mut(&mut self) -> [(&mut [u8], usize); 3] {
        let [y_stride, c_stride, _] = self.subsampling.packed_strides(self.width);
        let luma_len = self.width * self.height;

        let (y, chroma) = self.buffer.split_at_mut(luma_len);
        let (cb, cr) = chroma.split_at_mut(chroma.len() / 2);

        [(y, y_stride), (cb, c_stride), (cr, c_stride)]
    }

    pub fn as_frame(&self) -> Result<Frame<'_>, FrameError> {
        Frame::from_buffer(self.subsampling, &self.buffer, self.width, self.height)
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_frame() {
        let err = Frame::from_buffer(ChromaSubsampling::Cs420, &[], 0, 4).unwrap_err();
        assert!(matches!(err, FrameError::InvalidDimensions));
    }

    #[test]
    fn split_packed_buffer() {
        let buf: Vec<u8> = (0..24).collect();
        let frame = Frame::from_buffer(ChromaSubsampling::Cs420, &buf, 4, 4).unwrap();

        let [y, cb, cr] = frame.planes();
        assert_eq!(y.data(), &buf[..16]);
        assert_eq!(frame.luma().data(), y.data());
        assert_eq!(cb.data(), &buf[16..20]);
        assert_eq!(cr.data(), &buf[20..24]);
        assert_eq!(cb.stride(), 2);
        assert_eq!(frame.plane_size(2), (2, 2));
    }

    #[test]
    fn truncated_buffer() {
        let buf = [0u8; 23];
        let err = Frame::from_buffer(ChromaSubsampling::Cs420, &buf, 4, 4).unwrap_err();

        assert!(matches!(
            err,
            FrameError::BoundsCheck(BoundsCheckError::InvalidPlaneSize { plane: 2, .. })
        ));
    }

    #[test]
    fn padded_planes() {
        let y = [0u8; 8 * 3 + 4];
        let c = [0u8; 8 + 2];

        let frame = Frame::new(
            4,
            4,
            ChromaSubsampling::Cs420,
            [Plane::new(&y, 8), Plane::new(&c, 8), Plane::new(&c, 8)],
        );

        assert!(frame.is_ok());
    }

    #[test]
    fn blank_frame_is_black() {
        let mut frame = FrameBuffer::blank(ChromaSubsampling::Cs422, 4, 2);

        let [(y, y_stride), (cb, c_stride), (cr, _)] = frame.planes_mut();
        assert_eq!((y.len(), y_stride), (8, 4));
        assert_eq!((cb.len(), c_stride), (4, 2));
        assert!(y.iter().all(|&s| s == 0));
        assert!(cb.iter().chain(cr.iter()).all(|&s| s == 128));

        assert!(frame.as_frame().is_ok());
    }
}
