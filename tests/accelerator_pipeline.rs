//! 驱动层端到端测试: 模拟中断在另一任务中到来.

use std::time::Duration;

use cedar::core::CedarError;
use cedar::mpeg::bus::RecordingBus;
use cedar::mpeg::regs::{MpegStatus, VE_MPEG_TRIGGER};
use cedar::mpeg::sequencer::PLAN_LEN;
use cedar::mpeg::{
    Accelerator, EngineState, FrameHeader, InputBuffer, PictureBuffer, PictureCodingType,
    PlatformConfig,
};

fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn header(ty: PictureCodingType, fwd: usize) -> FrameHeader {
    FrameHeader {
        width: 352,
        height: 288,
        picture_coding_type: ty,
        slice_end: 8192,
        forward_index: fwd,
        ..FrameHeader::default()
    }
}

#[tokio::test]
async fn test_中断在后台任务中到来() {
    init_test_logger();
    let mut acc = Accelerator::new(RecordingBus::new(), PlatformConfig::default());
    let input = InputBuffer::new(0x4800_0000);

    for n in 0..3usize {
        let out = PictureBuffer::new(0x4a00_0000 + n as u32 * 0x10_0000, 0x4a08_0000 + n as u32 * 0x10_0000);
        let ty = if n == 0 { PictureCodingType::I } else { PictureCodingType::P };
        acc.decode(&header(ty, n), &input, &out).unwrap();
        assert_eq!(acc.state(), EngineState::Triggered);

        let handle = acc.completion_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            handle.notify(MpegStatus::SUCCESS.bits());
        });

        let status = acc.wait(Duration::from_secs(1)).await.unwrap();
        assert!(status.is_success());
        acc.buffers_mut().insert(n + 1, out).unwrap();
    }

    assert_eq!(acc.frames_decoded(), 3);
    let writes = acc.bus().writes();
    assert_eq!(writes.len(), 3 * PLAN_LEN);
    let triggers = writes.iter().filter(|w| w.offset == VE_MPEG_TRIGGER).count();
    assert_eq!(triggers, 3);
}

#[tokio::test]
async fn test_码流耗尽视为错误() {
    init_test_logger();
    let mut acc = Accelerator::new(RecordingBus::new(), PlatformConfig::default());
    let handle = acc.completion_handle();
    acc.decode(
        &header(PictureCodingType::I, 0),
        &InputBuffer::new(0x4800_0000),
        &PictureBuffer::new(0x4a00_0000, 0x4a08_0000),
    )
    .unwrap();

    handle.notify(MpegStatus::VLD_DATA_REQ.bits());
    let err = acc.wait(Duration::from_millis(100)).await.unwrap_err();
    assert!(matches!(err, CedarError::Hardware(0x4)));

    acc.reset().unwrap();
    assert_eq!(acc.state(), EngineState::Idle);
}
