//! Frame sources, the upstream side of the playback pipeline
//!
//! A source owns everything needed to turn an input into decoded planar frames:
//! the open file, the container state and the decoder context.

use crate::{ChromaSubsampling, Frame};
use std::io;
use std::path::PathBuf;

mod pattern;
#[cfg(feature = "y4m")]
mod yuv4mpeg;

pub use pattern::PatternSource;
#[cfg(feature = "y4m")]
pub use yuv4mpeg::Y4mSource;

/// Stream parameters negotiated while opening a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub width: usize,
    pub height: usize,
    pub subsampling: ChromaSubsampling,
    pub fps_num: u64,
    pub fps_den: u64,
}

/// Result of asking a source for its next frame
#[derive(Debug)]
pub enum SourceEvent<'a> {
    /// A decoded frame, valid until the next call to [`FrameSource::next_frame`]
    Frame(Frame<'a>),

    /// More input was consumed but no complete frame is ready yet
    Pending,

    /// The stream is finished, no more frames will follow
    EndOfStream,
}

/// Everything that can go wrong while opening or reading a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no supported video stream found")]
    NoVideoStream,

    #[error("unsupported video stream: {0}")]
    UnsupportedStream(String),

    #[error("malformed or truncated stream header: {0}")]
    Header(String),

    #[error("failed to decode frame: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Supplies decoded frames, one per call
pub trait FrameSource {
    fn info(&self) -> &StreamInfo;

    fn next_frame(&mut self) -> Result<SourceEvent<'_>, SourceError>;
}

impl<T: FrameSource + ?Sized> FrameSource for &mut T {
    fn info(&self) -> &StreamInfo {
        (**self).info()
    }

    fn next_frame(&mut self) -> Result<SourceEvent<'_>, SourceError> {
        (**self).next_frame()
    }
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn info(&self) -> &StreamInfo {
        (**self).info()
    }

    fn next_frame(&mut self) -> Result<SourceEvent<'_>, SourceError> {
        (**self).next_frame()
    }
}
