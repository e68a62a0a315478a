use super::{FrameSource, SourceError, SourceEvent, StreamInfo};
use crate::{ChromaSubsampling, Frame};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads 8 bit planar frames from a YUV4MPEG2 stream
pub struct Y4mSource<R: Read> {
    decoder: y4m::Decoder<R>,
    info: StreamInfo,

    /// Planes of the current frame, packed back to back
    frame: Vec<u8>,
}

impl Y4mSource<BufReader<File>> {
    /// Open the file at `path` and parse its stream header
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read> Y4mSource<R> {
    pub fn from_reader(reader: R) -> Result<Self, SourceError> {
        let decoder = y4m::decode(reader).map_err(|e| match e {
            y4m::Error::EOF => SourceError::NoVideoStream,
            e => SourceError::Header(format!("{e:?}")),
        })?;

        if decoder.get_bytes_per_sample() != 1 {
            return Err(SourceError::UnsupportedStream(format!(
                "{} bit samples",
                decoder.get_bit_depth()
            )));
        }

        let subsampling = match decoder.get_colorspace() {
            y4m::Colorspace::C420
            | y4m::Colorspace::C420jpeg
            | y4m::Colorspace::C420paldv
            | y4m::Colorspace::C420mpeg2 => ChromaSubsampling::Cs420,
            y4m::Colorspace::C422 => ChromaSubsampling::Cs422,
            y4m::Colorspace::C444 => ChromaSubsampling::Cs444,
            colorspace => {
                return Err(SourceError::UnsupportedStream(format!(
                    "colorspace {colorspace:?}"
                )));
            }
        };

        let framerate = decoder.get_framerate();

        let info = StreamInfo {
            width: decoder.get_width(),
            height: decoder.get_height(),
            subsampling,
            fps_num: framerate.num as u64,
            fps_den: framerate.den as u64,
        };

        log::info!(
            "y4m stream is {}x{} {:?} at {}/{} fps",
            info.width,
            info.height,
            info.subsampling,
            info.fps_num,
            info.fps_den
        );

        Ok(Self {
            decoder,
            info,
            frame: Vec::new(),
        })
    }
}

impl<R: Read> FrameSource for Y4mSource<R> {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<SourceEvent<'_>, SourceError> {
        // The decoder only lends its planes for the lifetime of its own frame value
        match self.decoder.read_frame() {
            Ok(frame) => {
                self.frame.clear();
                self.frame.extend_from_slice(frame.get_y_plane());
                self.frame.extend_from_slice(frame.get_u_plane());
                self.frame.extend_from_slice(frame.get_v_plane());
            }
            Err(y4m::Error::EOF) => return Ok(SourceEvent::EndOfStream),
            Err(e) => return Err(SourceError::Decode(format!("{e:?}"))),
        }

        let frame = Frame::from_buffer(
            self.info.subsampling,
            &self.frame,
            self.info.width,
            self.info.height,
        )
        .map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok(SourceEvent::Frame(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frame_buffer_grows_with_frames_not_header() {
        let mut stream = b"YUV4MPEG2 W4 H2 F30:1 C444\n".to_vec();
        let mut source = Y4mSource::from_reader(Cursor::new(stream.clone())).unwrap();

        // Nothing is reserved until a frame arrives
        assert_eq!(source.frame.capacity(), 0);
        assert!(matches!(source.next_frame(), Ok(SourceEvent::EndOfStream)));

        stream.extend_from_slice(b"FRAME\n");
        stream.extend_from_slice(&[16; 24]);
        let mut source = Y4mSource::from_reader(Cursor::new(stream)).unwrap();

        assert!(matches!(source.next_frame(), Ok(SourceEvent::Frame(_))));
        assert_eq!(source.frame.len(), 24);
    }
}
