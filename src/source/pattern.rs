use super::{FrameSource, SourceError, SourceEvent, StreamInfo};
use crate::{ChromaSubsampling, FrameBuffer, YCbCrCoefficients};

/// 75% color bars: white, yellow, cyan, green, magenta, red, blue, black
const BARS: [[u8; 3]; 8] = [
    [191, 191, 191],
    [191, 191, 0],
    [0, 191, 191],
    [0, 191, 0],
    [191, 0, 191],
    [191, 0, 0],
    [0, 0, 191],
    [0, 0, 0],
];

/// Synthetic stream of color bars scrolling one pixel per frame
pub struct PatternSource {
    info: StreamInfo,
    frame: FrameBuffer,
    bars: [[u8; 3]; 8],
    index: usize,
    frame_count: Option<usize>,
}

impl PatternSource {
    /// Endless pattern of the given shape and frame rate
    pub fn new(
        width: usize,
        height: usize,
        subsampling: ChromaSubsampling,
        fps_num: u64,
        fps_den: u64,
    ) -> Self {
        log::info!("pattern stream is {width}x{height} {subsampling:?} at {fps_num}/{fps_den} fps");

        Self {
            info: StreamInfo {
                width,
                height,
                subsampling,
                fps_num,
                fps_den,
            },
            frame: FrameBuffer::blank(subsampling, width, height),
            bars: BARS.map(|rgb| YCbCrCoefficients::BT601.from_rgb(rgb)),
            index: 0,
            frame_count: None,
        }
    }

    /// End the stream after `frame_count` frames
    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = Some(frame_count);
        self
    }

    /// Number of frames handed out so far
    pub fn frames_produced(&self) -> usize {
        self.index
    }

    fn paint(&mut self) {
        let width = self.info.width;
        let luma_height = self.info.height;
        let (shift_x, _) = self.info.subsampling.shifts();
        let offset = self.index;
        let bars = self.bars;

        if width == 0 {
            return;
        }

        let bar_at = |x: usize| bars[((x + offset) % width) * bars.len() / width];

        for (component, (plane, stride)) in self.frame.planes_mut().into_iter().enumerate() {
            let shift_x = if component == 0 { 0 } else { shift_x };

            for (row, samples) in plane.chunks_exact_mut(stride).enumerate() {
                // Darken the bottom quarter so vertical addressing is visible
                let dim = component == 0 && row >= luma_height * 3 / 4;

                for (x, sample) in samples.iter_mut().enumerate() {
                    let value = bar_at(x << shift_x)[component];

                    *sample = if dim { value / 2 } else { value };
                }
            }
        }
    }
}

impl FrameSource for PatternSource {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<SourceEvent<'_>, SourceError> {
        if self.frame_count.is_some_and(|count| self.index >= count) {
            return Ok(SourceEvent::EndOfStream);
        }

        self.paint();
        self.index += 1;

        let frame = self
            .frame
            .as_frame()
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok(SourceEvent::Frame(frame))
    }
}
