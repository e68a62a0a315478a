use crate::convert::{convert_rows, verify_input};
use crate::{ConvertError, Destination, Frame, convert};
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

/// Like [`convert`] but splits the destination into horizontal bands which are converted in parallel.
///
/// The output is identical to [`convert`].
#[inline(never)]
pub fn convert_multi_thread(
    frame: &Frame<'_>,
    dst: &mut Destination<'_>,
) -> Result<(), ConvertError> {
    verify_input(frame, dst)?;

    let threads = num_cpus::get();
    let height = dst.height();

    if threads == 1 || height < 2 {
        return convert(frame, dst);
    }

    let format = dst.format();
    let width = dst.width();
    let stride = dst.stride();
    let rows_per_band = height.div_ceil(threads);

    dst.buffer_mut()
        .par_chunks_mut(stride * rows_per_band)
        .enumerate()
        .for_each(|(i, band)| {
            let first_row = i * rows_per_band;

            // The buffer may extend past the last row
            if first_row >= height {
                return;
            }

            let rows = rows_per_band.min(height - first_row);

            let mut band = Destination::band(format, band, stride, width, rows);
            convert_rows(frame, first_row, &mut band);
        });

    Ok(())
}
