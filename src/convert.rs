use crate::{Destination, Frame, PackedFormat, YCbCrCoefficients};

/// Everything that can go wrong when converting a frame
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("frame is {src_width}x{src_height} but the destination is {dst_width}x{dst_height}")]
    DimensionMismatch {
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    },
}

/// Convert a planar YCbCr frame into the packed destination using BT.601 coefficients
///
/// Only the visible part of every destination row is written, row padding is left untouched.
pub fn convert(frame: &Frame<'_>, dst: &mut Destination<'_>) -> Result<(), ConvertError> {
    verify_input(frame, dst)?;

    convert_rows(frame, 0, dst);

    Ok(())
}

/// Verify that frame and destination describe the same image
pub(crate) fn verify_input(frame: &Frame<'_>, dst: &Destination<'_>) -> Result<(), ConvertError> {
    if frame.width() != dst.width() || frame.height() != dst.height() {
        return Err(ConvertError::DimensionMismatch {
            src_width: frame.width(),
            src_height: frame.height(),
            dst_width: dst.width(),
            dst_height: dst.height(),
        });
    }

    Ok(())
}

/// Convert `dst.height()` rows of `frame`, starting at frame row `first_row`, into `dst`
pub(crate) fn convert_rows(frame: &Frame<'_>, first_row: usize, dst: &mut Destination<'_>) {
    match dst.format() {
        PackedFormat::RGB => write_rows::<RgbWriter<false>>(frame, first_row, dst),
        PackedFormat::BGR => write_rows::<RgbWriter<true>>(frame, first_row, dst),
        PackedFormat::RGBA => write_rows::<RgbaWriter<false>>(frame, first_row, dst),
        PackedFormat::BGRA => write_rows::<RgbaWriter<true>>(frame, first_row, dst),
    }
}

trait PixelWriter {
    const BYTES: usize;

    fn write(px: &mut [u8], rgb: [u8; 3]);
}

struct RgbWriter<const REVERSE: bool>;
struct RgbaWriter<const REVERSE: bool>;

impl<const REVERSE: bool> PixelWriter for RgbWriter<REVERSE> {
    const BYTES: usize = 3;

    #[inline(always)]
    fn write(px: &mut [u8], [r, g, b]: [u8; 3]) {
        if REVERSE {
            px.copy_from_slice(&[b, g, r]);
        } else {
            px.copy_from_slice(&[r, g, b]);
        }
    }
}

impl<const REVERSE: bool> PixelWriter for RgbaWriter<REVERSE> {
    const BYTES: usize = 4;

    #[inline(always)]
    fn write(px: &mut [u8], [r, g, b]: [u8; 3]) {
        if REVERSE {
            px.copy_from_slice(&[b, g, r, u8::MAX]);
        } else {
            px.copy_from_slice(&[r, g, b, u8::MAX]);
        }
    }
}

fn write_rows<W: PixelWriter>(frame: &Frame<'_>, first_row: usize, dst: &mut Destination<'_>) {
    const COEFFICIENTS: YCbCrCoefficients = YCbCrCoefficients::BT601;

    let (shift_x, shift_y) = frame.subsampling().shifts();
    let [luma, cb, cr] = frame.planes();
    let (chroma_width, _) = frame.plane_size(1);
    let width = frame.width();

    for row in 0..dst.height() {
        let y = first_row + row;

        let luma_row = luma.row(y, width);
        let cb_row = cb.row(y >> shift_y, chroma_width);
        let cr_row = cr.row(y >> shift_y, chroma_width);

        let out = dst.row_mut(row);

        for (x, (px, &yi)) in out.chunks_exact_mut(W::BYTES).zip(luma_row).enumerate() {
            let xs = x >> shift_x;

            W::write(px, COEFFICIENTS.to_rgb(yi, cb_row[xs], cr_row[xs]));
        }
    }
}
