//! Play a YUV4MPEG2 file (or a generated test pattern) into a directory of PNG files

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use yuv_playback::sink::PngSequenceSink;
use yuv_playback::source::{FrameSource, PatternSource, SourceError, Y4mSource};
use yuv_playback::{ChromaSubsampling, DEFAULT_SOURCE_PATH, PackedFormat, PlaybackConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Rgb,
    Bgr,
    Rgba,
    Bgra,
}

impl From<Format> for PackedFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Rgb => PackedFormat::RGB,
            Format::Bgr => PackedFormat::BGR,
            Format::Rgba => PackedFormat::RGBA,
            Format::Bgra => PackedFormat::BGRA,
        }
    }
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// YUV4MPEG2 file to play
    #[arg(default_value = DEFAULT_SOURCE_PATH)]
    input: PathBuf,

    /// Pixel format of the presentation surface
    #[arg(long, value_enum, default_value_t = Format::Rgb)]
    format: Format,

    /// Directory the presented frames are written to
    #[arg(long, short, default_value = "frames")]
    output: PathBuf,

    /// Stop after presenting this many frames
    #[arg(long, short)]
    frames: Option<usize>,

    /// Convert frames on the playback thread only
    #[arg(long)]
    single_thread: bool,

    /// Play a generated 320x240 color bar pattern instead of the input file
    #[arg(long)]
    pattern: bool,

    /// Stack size of the playback thread in bytes
    #[arg(long, default_value_t = yuv_playback::DEFAULT_STACK_SIZE)]
    stack_size: usize,
}

fn open_source(path: &Path, pattern: bool) -> Result<Box<dyn FrameSource>, SourceError> {
    if pattern {
        return Ok(Box::new(
            PatternSource::new(320, 240, ChromaSubsampling::Cs420, 30, 1).with_frame_count(300),
        ));
    }

    Ok(Box::new(Y4mSource::open(path)?))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = PlaybackConfig::default()
        .with_source_path(args.input)
        .with_format(args.format.into())
        .with_multi_thread(!args.single_thread)
        .with_stack_size(args.stack_size);

    let pattern = args.pattern;
    let output = args.output;
    let frames = args.frames;

    let handle = yuv_playback::spawn(
        config,
        move |path| open_source(path, pattern),
        move || {
            let sink = PngSequenceSink::new(output)?;

            Ok(match frames {
                Some(limit) => sink.with_frame_limit(limit),
                None => sink,
            })
        },
    );

    let result = handle.and_then(|handle| handle.join());

    match result {
        Ok(summary) => {
            log::info!(
                "presented {} frames, dropped {} ({:?})",
                summary.frames_presented,
                summary.frames_dropped,
                summary.reason
            );

            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("playback failed: {e}");

            let mut source = e.source();
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }

            ExitCode::FAILURE
        }
    }
}
