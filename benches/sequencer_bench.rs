//! Cedar 命令序列器性能基准测试.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cedar::mpeg::bus::RecordingBus;
use cedar::mpeg::{
    FrameHeader, InputBuffer, PictureBuffer, PictureCodingType, ReferenceBuffers,
};

fn b_frame() -> (FrameHeader, ReferenceBuffers) {
    let header = FrameHeader {
        width: 1920,
        height: 1088,
        picture_coding_type: PictureCodingType::B,
        f_code: [[3, 3], [3, 3]],
        slice_end: 400_000,
        forward_index: 1,
        backward_index: 2,
        ..FrameHeader::default()
    };
    let refs = ReferenceBuffers {
        forward: Some(PictureBuffer::new(0x4b00_0000, 0x4b20_0000)),
        backward: Some(PictureBuffer::new(0x4c00_0000, 0x4c20_0000)),
    };
    (header, refs)
}

fn bench_plan(c: &mut Criterion) {
    let (header, refs) = b_frame();
    let input = InputBuffer::new(0x4800_0000);
    let output = PictureBuffer::new(0x4a00_0000, 0x4a20_0000);
    c.bench_function("mpeg2_plan_1080p_b", |b| {
        b.iter(|| {
            cedar::mpeg::encode_and_dispatch(black_box(&header), &input, &output, &refs)
        });
    });
}

fn bench_plan_and_dispatch(c: &mut Criterion) {
    let (header, refs) = b_frame();
    let input = InputBuffer::new(0x4800_0000);
    let output = PictureBuffer::new(0x4a00_0000, 0x4a20_0000);
    c.bench_function("mpeg2_plan_dispatch_recording", |b| {
        b.iter(|| {
            let plan = cedar::mpeg::encode_and_dispatch(black_box(&header), &input, &output, &refs);
            let mut bus = RecordingBus::new();
            plan.dispatch(&mut bus).unwrap();
            bus
        });
    });
}

criterion_group!(benches, bench_plan, bench_plan_and_dispatch);
criterion_main!(benches);
