//! Presentation sinks, the downstream side of the playback pipeline

use crate::PackedFormat;
use std::io;

#[cfg(feature = "png")]
mod png_sequence;

#[cfg(feature = "png")]
pub use png_sequence::PngSequenceSink;

/// Writable pixel memory of a surface, lent out between `acquire_buffer` and `release_buffer`
#[derive(Debug)]
pub struct SurfaceBuffer<'a> {
    pub data: &'a mut [u8],

    /// Bytes between the start of two consecutive rows
    pub stride: usize,
}

/// Everything that can go wrong while talking to a sink
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to initialize sink: {0}")]
    Init(String),

    #[error("no surface has been created")]
    SurfaceMissing,

    #[error("surface error: {0}")]
    Surface(String),

    #[error("failed to present frame: {0}")]
    Present(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[cfg(feature = "png")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Turns packed pixel buffers into visible images and reports termination requests
pub trait PresentationSink {
    /// Create the surface frames are written into, replacing any previous one
    fn create_surface(
        &mut self,
        width: usize,
        height: usize,
        format: PackedFormat,
    ) -> Result<(), SinkError>;

    fn acquire_buffer(&mut self) -> Result<SurfaceBuffer<'_>, SinkError>;

    /// Hand the buffer from the last successful `acquire_buffer` back to the surface
    fn release_buffer(&mut self);

    fn present(&mut self) -> Result<(), SinkError>;

    /// Polled once per frame, `true` ends playback
    fn stop_requested(&mut self) -> bool;

    fn destroy_surface(&mut self);
}

impl<T: PresentationSink + ?Sized> PresentationSink for &mut T {
    fn create_surface(
        &mut self,
        width: usize,
        height: usize,
        format: PackedFormat,
    ) -> Result<(), SinkError> {
        (**self).create_surface(width, height, format)
    }

    fn acquire_buffer(&mut self) -> Result<SurfaceBuffer<'_>, SinkError> {
        (**self).acquire_buffer()
    }

    fn release_buffer(&mut self) {
        (**self).release_buffer()
    }

    fn present(&mut self) -> Result<(), SinkError> {
        (**self).present()
    }

    fn stop_requested(&mut self) -> bool {
        (**self).stop_requested()
    }

    fn destroy_surface(&mut self) {
        (**self).destroy_surface()
    }
}
