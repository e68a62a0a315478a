//! The read / convert / present loop and the worker thread running it

use crate::sink::{PresentationSink, SinkError};
use crate::source::{FrameSource, SourceError, SourceEvent, StreamInfo};
use crate::{ConvertError, Destination, DestinationError, Frame, PackedFormat, StopSignal};
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_SOURCE_PATH: &str = "/assets/video.y4m";

/// Stack size of the playback worker
pub const DEFAULT_STACK_SIZE: usize = 1024 * 1024;

/// Knobs of a playback session
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Input handed to the source constructor
    pub source_path: PathBuf,

    /// Pixel format of the presentation surface
    pub format: PackedFormat,

    /// Convert frames on the rayon thread pool (requires the `multi-thread` feature)
    pub multi_thread: bool,

    /// Stack size of the worker thread in bytes
    pub stack_size: usize,

    /// Name of the worker thread
    pub thread_name: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            format: PackedFormat::RGB,
            multi_thread: true,
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "playback".into(),
        }
    }
}

impl PlaybackConfig {
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = source_path.into();
        self
    }

    pub fn with_format(mut self, format: PackedFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_multi_thread(mut self, multi_thread: bool) -> Self {
        self.multi_thread = multi_thread;
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    /// Terminal
    Stopped,
}

/// Why a playback loop ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    StopRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub frames_presented: usize,
    pub frames_dropped: usize,
    pub reason: StopReason,
}

/// Everything that aborts a playback session
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("presentation sink unavailable")]
    Init(#[source] SinkError),

    #[error("cannot open input")]
    Open(#[source] SourceError),

    #[error("stream negotiation failed")]
    Negotiation(#[source] SourceError),

    #[error("decoding failed")]
    Decode(#[source] SourceError),

    #[error("invalid frame rate {num}/{den}")]
    InvalidFrameRate { num: u64, den: u64 },

    #[error("cannot create presentation surface")]
    Surface(#[source] SinkError),

    #[error("failed to spawn playback thread")]
    Spawn(#[source] io::Error),

    #[error("playback thread panicked")]
    WorkerPanicked,
}

impl From<SourceError> for PlaybackError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Open { .. } => PlaybackError::Open(e),
            SourceError::NoVideoStream
            | SourceError::UnsupportedStream(_)
            | SourceError::Header(_) => PlaybackError::Negotiation(e),
            SourceError::Decode(_) | SourceError::Io(_) => PlaybackError::Decode(e),
        }
    }
}

/// Why a single frame didn't make it to the screen
#[derive(Debug, thiserror::Error)]
enum FrameDropped {
    #[error("cannot acquire surface buffer")]
    Acquire(#[source] SinkError),

    #[error(transparent)]
    Destination(#[from] DestinationError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("cannot present frame")]
    Present(#[source] SinkError),
}

/// Run the playback loop on the current thread until the stream ends, a stop is requested or an error occurs.
///
/// The surface is created from the source's stream info and destroyed again before returning,
/// whatever the outcome.
pub fn run<S, K>(
    source: &mut S,
    sink: &mut K,
    config: &PlaybackConfig,
    stop: &StopSignal,
) -> Result<PlaybackSummary, PlaybackError>
where
    S: FrameSource + ?Sized,
    K: PresentationSink + ?Sized,
{
    let info = *source.info();

    let delay = crate::frame_delay(info.fps_num, info.fps_den).ok_or_else(|| {
        log::error!("stream declares a frame rate of {}/{}", info.fps_num, info.fps_den);

        PlaybackError::InvalidFrameRate {
            num: info.fps_num,
            den: info.fps_den,
        }
    })?;

    sink.create_surface(info.width, info.height, config.format)
        .map_err(|e| {
            log::error!("failed to create surface: {e}");
            PlaybackError::Surface(e)
        })?;

    let result = Sequencer {
        source: &mut *source,
        sink: &mut *sink,
        info,
        format: config.format,
        multi_thread: config.multi_thread,
        delay,
        stop,
        presented: 0,
        dropped: 0,
    }
    .run();

    sink.destroy_surface();

    result
}

struct Sequencer<'a, S: ?Sized, K: ?Sized> {
    source: &'a mut S,
    sink: &'a mut K,
    info: StreamInfo,
    format: PackedFormat,
    multi_thread: bool,
    delay: Duration,
    stop: &'a StopSignal,
    presented: usize,
    dropped: usize,
}

impl<S, K> Sequencer<'_, S, K>
where
    S: FrameSource + ?Sized,
    K: PresentationSink + ?Sized,
{
    fn run(mut self) -> Result<PlaybackSummary, PlaybackError> {
        log::info!(
            "playing {}x{} as {:?}, {:?} between frames",
            self.info.width,
            self.info.height,
            self.format,
            self.delay
        );

        loop {
            if let Some(reason) = self.step()? {
                log::info!(
                    "playback stopped ({reason:?}) after {} frames, {} dropped",
                    self.presented,
                    self.dropped
                );

                return Ok(PlaybackSummary {
                    frames_presented: self.presented,
                    frames_dropped: self.dropped,
                    reason,
                });
            }
        }
    }

    /// One iteration: poll stop, pull a frame, show it, wait for the next frame slot
    fn step(&mut self) -> Result<Option<StopReason>, PlaybackError> {
        if self.stop.is_raised() || self.sink.stop_requested() {
            return Ok(Some(StopReason::StopRequested));
        }

        let event = self.source.next_frame().map_err(|e| {
            log::error!("frame source failed: {e}");
            PlaybackError::from(e)
        })?;

        match event {
            SourceEvent::Frame(frame) => {
                match show_frame(&mut *self.sink, &frame, self.format, self.multi_thread) {
                    Ok(()) => self.presented += 1,
                    Err(e) => {
                        log::warn!("dropping frame {}: {e}", self.presented + self.dropped);
                        self.dropped += 1;
                    }
                }
            }
            SourceEvent::Pending => log::trace!("no frame ready"),
            SourceEvent::EndOfStream => return Ok(Some(StopReason::EndOfStream)),
        }

        if self.stop.wait_timeout(self.delay) {
            return Ok(Some(StopReason::StopRequested));
        }

        Ok(None)
    }
}

/// Convert `frame` into a freshly acquired surface buffer and present it
fn show_frame<K>(
    sink: &mut K,
    frame: &Frame<'_>,
    format: PackedFormat,
    multi_thread: bool,
) -> Result<(), FrameDropped>
where
    K: PresentationSink + ?Sized,
{
    let converted = {
        let buffer = sink.acquire_buffer().map_err(FrameDropped::Acquire)?;

        Destination::new(
            format,
            buffer.data,
            Some(buffer.stride),
            frame.width(),
            frame.height(),
        )
        .map_err(FrameDropped::from)
        .and_then(|mut dst| convert_frame(frame, &mut dst, multi_thread).map_err(FrameDropped::from))
    };

    sink.release_buffer();
    converted?;

    sink.present().map_err(FrameDropped::Present)
}

fn convert_frame(
    frame: &Frame<'_>,
    dst: &mut Destination<'_>,
    multi_thread: bool,
) -> Result<(), ConvertError> {
    #[cfg(feature = "multi-thread")]
    if multi_thread {
        return crate::convert_multi_thread(frame, dst);
    }

    #[cfg(not(feature = "multi-thread"))]
    let _ = multi_thread;

    crate::convert(frame, dst)
}

/// Start a playback session on a dedicated worker thread.
///
/// The sink is initialized and the source opened on the worker, in that order, so neither needs
/// to be `Send`. They are dropped in reverse order once playback ends.
pub fn spawn<S, K, FS, FK>(
    config: PlaybackConfig,
    open_source: FS,
    init_sink: FK,
) -> Result<PlaybackHandle, PlaybackError>
where
    S: FrameSource,
    K: PresentationSink,
    FS: FnOnce(&Path) -> Result<S, SourceError> + Send + 'static,
    FK: FnOnce() -> Result<K, SinkError> + Send + 'static,
{
    let stop = StopSignal::new();
    let worker_stop = stop.clone();

    let thread = thread::Builder::new()
        .name(config.thread_name.clone())
        .stack_size(config.stack_size)
        .spawn(move || {
            let mut sink = init_sink().map_err(|e| {
                log::error!("failed to initialize sink: {e}");
                PlaybackError::Init(e)
            })?;

            let mut source = open_source(&config.source_path).map_err(|e| {
                log::error!("failed to open {}: {e}", config.source_path.display());
                PlaybackError::from(e)
            })?;

            let result = run(&mut source, &mut sink, &config, &worker_stop);

            drop(source);
            drop(sink);

            result
        })
        .map_err(|e| {
            log::error!("failed to spawn playback thread: {e}");
            PlaybackError::Spawn(e)
        })?;

    Ok(PlaybackHandle { stop, thread })
}

/// Handle to a playback worker. Dropping it detaches the worker.
#[derive(Debug)]
pub struct PlaybackHandle {
    stop: StopSignal,
    thread: JoinHandle<Result<PlaybackSummary, PlaybackError>>,
}

impl PlaybackHandle {
    /// Ask the worker to stop, it ends before requesting the next frame
    pub fn stop(&self) {
        self.stop.raise();
    }

    pub fn state(&self) -> PlaybackState {
        if self.thread.is_finished() {
            PlaybackState::Stopped
        } else {
            PlaybackState::Running
        }
    }

    /// Wait for the worker to finish and return its outcome
    pub fn join(self) -> Result<PlaybackSummary, PlaybackError> {
        self.thread
            .join()
            .map_err(|_| PlaybackError::WorkerPanicked)?
    }
}
