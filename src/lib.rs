pub use color::YCbCrCoefficients;
pub use convert::{ConvertError, convert};
pub use destination::{Destination, DestinationError, PackedImage};
pub use frame::{Frame, FrameBuffer, FrameError, Plane};
#[cfg(feature = "multi-thread")]
pub use multi_thread::convert_multi_thread;
pub use pacing::{StopSignal, frame_delay};
pub use pixel_format::{BoundsCheckError, ChromaSubsampling, PackedFormat};
pub use playback::{
    DEFAULT_SOURCE_PATH, DEFAULT_STACK_SIZE, PlaybackConfig, PlaybackError, PlaybackHandle,
    PlaybackState, PlaybackSummary, StopReason, run, spawn,
};

mod color;
mod convert;
mod destination;
mod frame;
#[cfg(feature = "multi-thread")]
mod multi_thread;
mod pacing;
mod pixel_format;
mod plane_decs;
mod playback;
pub mod sink;
pub mod source;
