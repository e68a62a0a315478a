#![cfg(feature = "y4m")]

use std::io::Cursor;
use yuv_playback::source::{FrameSource, SourceError, SourceEvent, Y4mSource};
use yuv_playback::{ChromaSubsampling, PlaybackError};

/// 4x2 4:2:0 stream holding `frames` frames whose samples count up from the frame index
fn make_stream(header: &str, frames: usize, frame_len: usize) -> Vec<u8> {
    let mut out = header.as_bytes().to_vec();

    for i in 0..frames {
        out.extend_from_slice(b"FRAME\n");
        out.extend((0..frame_len).map(|j| (i * 16 + j) as u8));
    }

    out
}

#[test]
fn negotiates_stream_info() {
    let stream = make_stream("YUV4MPEG2 W4 H2 F30000:1001 C420jpeg\n", 0, 0);
    let source = Y4mSource::from_reader(Cursor::new(stream)).unwrap();

    let info = source.info();
    assert_eq!((info.width, info.height), (4, 2));
    assert_eq!(info.subsampling, ChromaSubsampling::Cs420);
    assert_eq!((info.fps_num, info.fps_den), (30000, 1001));
}

#[test]
fn reads_frames_until_end_of_stream() {
    // 4x2 luma, 2x1 for each chroma plane
    let stream = make_stream("YUV4MPEG2 W4 H2 F30:1 C420jpeg\n", 2, 12);
    let mut source = Y4mSource::from_reader(Cursor::new(stream)).unwrap();

    for i in 0..2u8 {
        let Ok(SourceEvent::Frame(frame)) = source.next_frame() else {
            panic!("expected frame {i}");
        };

        let [y, cb, cr] = frame.planes();
        assert_eq!(y.data(), &[0, 1, 2, 3, 4, 5, 6, 7].map(|v| v + i * 16));
        assert_eq!(cb.data(), &[8, 9].map(|v| v + i * 16));
        assert_eq!(cr.data(), &[10, 11].map(|v| v + i * 16));
        assert_eq!(frame.plane_size(1), (2, 1));
    }

    assert!(matches!(source.next_frame(), Ok(SourceEvent::EndOfStream)));
}

#[test]
fn subsampling_from_colorspace() {
    for (colorspace, subsampling) in [
        ("C420", ChromaSubsampling::Cs420),
        ("C420mpeg2", ChromaSubsampling::Cs420),
        ("C422", ChromaSubsampling::Cs422),
        ("C444", ChromaSubsampling::Cs444),
    ] {
        let header = format!("YUV4MPEG2 W6 H4 F25:1 {colorspace}\n");
        let frame_len = subsampling.buffer_size(6, 4);

        let stream = make_stream(&header, 1, frame_len);
        let mut source = Y4mSource::from_reader(Cursor::new(stream)).unwrap();
        assert_eq!(source.info().subsampling, subsampling);

        let Ok(SourceEvent::Frame(frame)) = source.next_frame() else {
            panic!("expected a {colorspace} frame");
        };
        assert_eq!(frame.subsampling(), subsampling);
    }
}

#[test]
fn high_bit_depth_is_unsupported() {
    let stream = make_stream("YUV4MPEG2 W4 H2 F30:1 C420p10\n", 0, 0);

    let err = Y4mSource::from_reader(Cursor::new(stream)).err().unwrap();
    assert!(matches!(err, SourceError::UnsupportedStream(_)));
    assert!(matches!(PlaybackError::from(err), PlaybackError::Negotiation(_)));
}

#[test]
fn empty_input_has_no_stream() {
    let err = Y4mSource::from_reader(Cursor::new(Vec::new())).err().unwrap();
    assert!(matches!(err, SourceError::NoVideoStream));
}

#[test]
fn malformed_header() {
    let err = Y4mSource::from_reader(Cursor::new(b"RIFF....WAVEfmt \n".to_vec()))
        .err()
        .unwrap();

    assert!(matches!(
        PlaybackError::from(err),
        PlaybackError::Negotiation(_)
    ));
}

#[test]
fn truncated_frame_does_not_yield_a_frame() {
    let mut stream = make_stream("YUV4MPEG2 W4 H2 F30:1 C420jpeg\n", 1, 12);
    stream.truncate(stream.len() - 5);

    let mut source = Y4mSource::from_reader(Cursor::new(stream)).unwrap();

    assert!(matches!(
        source.next_frame(),
        Ok(SourceEvent::EndOfStream) | Err(SourceError::Decode(_))
    ));
}

#[test]
fn missing_file() {
    let err = Y4mSource::open("/does/not/exist.y4m").err().unwrap();

    assert!(matches!(err, SourceError::Open { .. }));
    assert!(matches!(PlaybackError::from(err), PlaybackError::Open(_)));
}
