use super::{PresentationSink, SinkError, SurfaceBuffer};
use crate::{PackedFormat, PackedImage};
use image::ExtendedColorType;
use std::fs;
use std::path::{Path, PathBuf};

/// Rows of the surface are padded to a multiple of this, like most texture uploads require
const ROW_ALIGNMENT: usize = 16;

/// Headless sink writing every presented frame into a directory as `frame_NNNNN.png`
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    surface: Option<PackedImage>,
    acquired: bool,
    presented: usize,
    frame_limit: Option<usize>,
}

impl PngSequenceSink {
    /// Create the sink, creating `dir` if it doesn't exist yet
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)
            .map_err(|e| SinkError::Init(format!("cannot create {}: {e}", dir.display())))?;

        Ok(Self {
            dir,
            surface: None,
            acquired: false,
            presented: 0,
            frame_limit: None,
        })
    }

    /// Request a stop once `frame_limit` frames have been written
    pub fn with_frame_limit(mut self, frame_limit: usize) -> Self {
        self.frame_limit = Some(frame_limit);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames_written(&self) -> usize {
        self.presented
    }

    /// Path the frame with the given index is written to
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }
}

impl PresentationSink for PngSequenceSink {
    fn create_surface(
        &mut self,
        width: usize,
        height: usize,
        format: PackedFormat,
    ) -> Result<(), SinkError> {
        if width == 0 || height == 0 {
            return Err(SinkError::Surface(format!(
                "invalid surface size {width}x{height}"
            )));
        }

        let stride = format.packed_stride(width).next_multiple_of(ROW_ALIGNMENT);

        log::debug!("creating {width}x{height} {format:?} surface with stride {stride}");

        self.surface = Some(PackedImage::with_stride(format, width, height, stride));
        self.acquired = false;

        Ok(())
    }

    fn acquire_buffer(&mut self) -> Result<SurfaceBuffer<'_>, SinkError> {
        let surface = self.surface.as_mut().ok_or(SinkError::SurfaceMissing)?;

        if self.acquired {
            return Err(SinkError::Surface("buffer is already acquired".into()));
        }

        self.acquired = true;

        Ok(SurfaceBuffer {
            stride: surface.stride(),
            data: surface.buffer_mut(),
        })
    }

    fn release_buffer(&mut self) {
        self.acquired = false;
    }

    fn present(&mut self) -> Result<(), SinkError> {
        let surface = self.surface.as_ref().ok_or(SinkError::SurfaceMissing)?;

        if self.acquired {
            return Err(SinkError::Present("buffer is still acquired".into()));
        }

        let path = self.frame_path(self.presented);
        save_png(surface, &path)?;

        log::trace!("wrote {}", path.display());

        self.presented += 1;

        Ok(())
    }

    fn stop_requested(&mut self) -> bool {
        self.frame_limit
            .is_some_and(|limit| self.presented >= limit)
    }

    fn destroy_surface(&mut self) {
        self.surface = None;
        self.acquired = false;
    }
}

fn save_png(surface: &PackedImage, path: &Path) -> Result<(), SinkError> {
    let too_large = || SinkError::Present("surface too large for PNG".into());

    let width = u32::try_from(surface.width()).map_err(|_| too_large())?;
    let height = u32::try_from(surface.height()).map_err(|_| too_large())?;

    let mut pixels = surface.to_packed_vec();

    let color = match surface.format() {
        PackedFormat::RGB => ExtendedColorType::Rgb8,
        PackedFormat::BGR => {
            pixels.chunks_exact_mut(3).for_each(|px| px.swap(0, 2));
            ExtendedColorType::Rgb8
        }
        PackedFormat::RGBA => ExtendedColorType::Rgba8,
        PackedFormat::BGRA => {
            pixels.chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
            ExtendedColorType::Rgba8
        }
    };

    image::save_buffer(path, &pixels, width, height, color)?;

    Ok(())
}
