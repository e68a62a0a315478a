use criterion::{Criterion, criterion_group, criterion_main};

use std::hint::black_box;
use yuv_playback::{ChromaSubsampling, Frame, FrameBuffer, PackedFormat, PackedImage, convert};

const IMAGE_WIDTH: usize = 1920;
const IMAGE_HEIGHT: usize = 1080;

fn do_convert(src: &Frame<'_>, dst: &mut PackedImage) {
    convert(black_box(src), &mut dst.as_destination().unwrap()).unwrap();
}

#[cfg(feature = "multi-thread")]
fn do_convert_multi_thread(src: &Frame<'_>, dst: &mut PackedImage) {
    use yuv_playback::convert_multi_thread;

    convert_multi_thread(black_box(src), &mut dst.as_destination().unwrap()).unwrap();
}

type ConvertFunction = fn(&Frame<'_>, &mut PackedImage);

fn run_benchmarks(c: &mut Criterion, do_convert: ConvertFunction, s: &str) {
    use ChromaSubsampling::*;

    let i420 = FrameBuffer::blank(Cs420, IMAGE_WIDTH, IMAGE_HEIGHT);
    let i444 = FrameBuffer::blank(Cs444, IMAGE_WIDTH, IMAGE_HEIGHT);
    let i420 = i420.as_frame().unwrap();
    let i444 = i444.as_frame().unwrap();

    let mut rgb = PackedImage::blank(PackedFormat::RGB, IMAGE_WIDTH, IMAGE_HEIGHT);
    let mut bgra = PackedImage::blank(PackedFormat::BGRA, IMAGE_WIDTH, IMAGE_HEIGHT);

    c.bench_function(&format!("I420 to RGB {s}"), |b| {
        b.iter(|| do_convert(&i420, &mut rgb))
    });

    c.bench_function(&format!("I420 to BGRA {s}"), |b| {
        b.iter(|| do_convert(&i420, &mut bgra))
    });

    c.bench_function(&format!("I444 to RGB {s}"), |b| {
        b.iter(|| do_convert(&i444, &mut rgb))
    });
}

fn single_threaded(c: &mut Criterion) {
    run_benchmarks(c, do_convert, "single threaded")
}

#[cfg(feature = "multi-thread")]
fn multi_threaded(c: &mut Criterion) {
    run_benchmarks(c, do_convert_multi_thread, "multi threaded")
}

#[cfg(feature = "multi-thread")]
criterion_group!(img, single_threaded, multi_threaded);

#[cfg(not(feature = "multi-thread"))]
criterion_group!(img, single_threaded);

criterion_main!(img);
