//! 视频引擎驱动层: 显式建模硬件的隐式状态机.
//!
//! 状态转换:
//! ```text
//! Idle/Complete --decode()--> Configured --下发完成--> Triggered
//! Triggered --中断: SUCCESS--> Complete
//! Triggered --中断: ERROR/VLD_DATA_REQ, 或超时--> Error --reset()--> Idle
//! ```
//!
//! 同一时刻只允许一帧在硬件中解码. 触发之后无法取消, 只能等待完成、出错或超时.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cedar_core::{CedarError, CedarResult};
use log::{debug, warn};
use tokio::sync::watch;

use crate::buffers::{BufferSet, InputBuffer, PictureBuffer};
use crate::bus::RegisterBus;
use crate::config::PlatformConfig;
use crate::header::FrameHeader;
use crate::regs::{MpegStatus, VE_CTRL, VE_CTRL_DISABLED};
use crate::sequencer::CommandSequencer;

/// 引擎状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// 空闲, 可以开始新的一帧
    Idle,
    /// 正在下发寄存器序列
    Configured,
    /// 已触发, 等待硬件完成
    Triggered,
    /// 上一帧成功完成
    Complete,
    /// 上一帧出错或超时, 需要 `reset()`
    Error,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Configured => "configured",
            Self::Triggered => "triggered",
            Self::Complete => "complete",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// 中断处理程序用来上报解码结果的句柄
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    tx: Arc<watch::Sender<Option<MpegStatus>>>,
}

impl CompletionHandle {
    /// 上报状态寄存器的原始值, 未知位被忽略
    pub fn notify(&self, status_bits: u32) {
        let status = MpegStatus::from_bits_truncate(status_bits);
        self.tx.send_replace(Some(status));
    }
}

/// 一个视频引擎实例
pub struct Accelerator<B: RegisterBus> {
    bus: B,
    sequencer: CommandSequencer,
    buffers: BufferSet,
    state: EngineState,
    status_tx: Arc<watch::Sender<Option<MpegStatus>>>,
    status_rx: watch::Receiver<Option<MpegStatus>>,
    frames: u64,
}

impl<B: RegisterBus> Accelerator<B> {
    /// 以指定寄存器总线和平台配置创建
    pub fn new(bus: B, config: PlatformConfig) -> Self {
        let (tx, rx) = watch::channel(None);
        Self {
            bus,
            sequencer: CommandSequencer::new(config),
            buffers: BufferSet::new(),
            state: EngineState::Idle,
            status_tx: Arc::new(tx),
            status_rx: rx,
            frames: 0,
        }
    }

    /// 当前状态
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// 已成功解码的帧数
    pub fn frames_decoded(&self) -> u64 {
        self.frames
    }

    /// 寄存器总线
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// 寄存器总线 (可变)
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// 参考帧缓冲区集合
    pub fn buffers(&self) -> &BufferSet {
        &self.buffers
    }

    /// 参考帧缓冲区集合 (可变)
    pub fn buffers_mut(&mut self) -> &mut BufferSet {
        &mut self.buffers
    }

    /// 创建交给中断处理程序的完成句柄
    pub fn completion_handle(&self) -> CompletionHandle {
        CompletionHandle {
            tx: Arc::clone(&self.status_tx),
        }
    }

    /// 下发一帧并触发硬件解码
    ///
    /// 参考帧按帧头中的索引从缓冲区集合解析.
    pub fn decode(
        &mut self,
        header: &FrameHeader,
        input: &InputBuffer,
        output: &PictureBuffer,
    ) -> CedarResult<()> {
        match self.state {
            EngineState::Idle | EngineState::Complete => {}
            EngineState::Triggered => return Err(CedarError::Busy),
            state => {
                return Err(CedarError::InvalidState(format!(
                    "引擎处于 {state} 状态, 需要先 reset()"
                )));
            }
        }

        // 清掉上一帧的结果, 避免误认为本帧已完成
        self.status_tx.send_replace(None);

        let refs = self.buffers.references(header);
        let plan = self.sequencer.plan(header, input, output, &refs);

        self.state = EngineState::Configured;
        if let Err(err) = plan.dispatch(&mut self.bus) {
            warn!("下发寄存器序列失败: {err}");
            self.state = EngineState::Error;
            return Err(err);
        }
        self.state = EngineState::Triggered;
        debug!("已触发第 {} 帧解码", self.frames + 1);
        Ok(())
    }

    /// 等待硬件完成当前帧
    ///
    /// 超时视为硬件挂死, 引擎进入 Error 状态.
    pub async fn wait(&mut self, timeout: Duration) -> CedarResult<MpegStatus> {
        if self.state != EngineState::Triggered {
            return Err(CedarError::InvalidState(format!(
                "引擎处于 {} 状态, 没有正在解码的帧",
                self.state
            )));
        }

        let waited = tokio::time::timeout(timeout, self.status_rx.wait_for(Option::is_some)).await;
        let status = match waited {
            Ok(Ok(status)) => (*status).unwrap_or_default(),
            Ok(Err(_)) => {
                self.state = EngineState::Error;
                return Err(CedarError::InvalidState("完成通道已关闭".to_string()));
            }
            Err(_) => {
                warn!("等待解码完成超时 ({:?})", timeout);
                self.state = EngineState::Error;
                return Err(CedarError::Timeout(timeout.as_millis() as u64));
            }
        };

        if status.is_success() {
            self.state = EngineState::Complete;
            self.frames += 1;
            Ok(status)
        } else {
            warn!("硬件报告解码错误: {:?}", status);
            self.state = EngineState::Error;
            Err(CedarError::Hardware(status.bits()))
        }
    }

    /// 关闭引擎并回到 Idle
    ///
    /// 正在解码时不能复位.
    pub fn reset(&mut self) -> CedarResult<()> {
        if self.state == EngineState::Triggered {
            return Err(CedarError::Busy);
        }
        self.bus.write(VE_CTRL_DISABLED, VE_CTRL)?;
        self.status_tx.send_replace(None);
        self.state = EngineState::Idle;
        debug!("引擎已复位");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::RecordingBus;
    use crate::regs::VE_MPEG_TRIGGER;
    use crate::sequencer::PLAN_LEN;

    fn accelerator() -> Accelerator<RecordingBus> {
        Accelerator::new(RecordingBus::new(), PlatformConfig::default())
    }

    fn frame() -> (FrameHeader, InputBuffer, PictureBuffer) {
        let header = FrameHeader {
            width: 64,
            height: 64,
            slice_end: 128,
            ..FrameHeader::default()
        };
        (
            header,
            InputBuffer::new(0x4800_0000),
            PictureBuffer::new(0x4a00_0000, 0x4a10_0000),
        )
    }

    #[test]
    fn test_触发后忙() {
        let mut acc = accelerator();
        let (header, input, output) = frame();
        acc.decode(&header, &input, &output).unwrap();
        assert_eq!(acc.state(), EngineState::Triggered);
        assert_eq!(acc.bus().writes().len(), PLAN_LEN);

        let err = acc.decode(&header, &input, &output).unwrap_err();
        assert!(matches!(err, CedarError::Busy));
        // 被拒绝的调用不会产生任何写入
        assert_eq!(acc.bus().writes().len(), PLAN_LEN);
        assert!(matches!(acc.reset(), Err(CedarError::Busy)));
    }

    #[tokio::test]
    async fn test_成功完成() {
        let mut acc = accelerator();
        let handle = acc.completion_handle();
        let (header, input, output) = frame();

        acc.decode(&header, &input, &output).unwrap();
        handle.notify(MpegStatus::SUCCESS.bits());
        let status = acc.wait(Duration::from_millis(100)).await.unwrap();
        assert!(status.is_success());
        assert_eq!(acc.state(), EngineState::Complete);
        assert_eq!(acc.frames_decoded(), 1);

        // 完成后可以直接开始下一帧
        acc.decode(&header, &input, &output).unwrap();
        assert_eq!(acc.bus().writes().len(), 2 * PLAN_LEN);
    }

    #[tokio::test]
    async fn test_硬件错误后需复位() {
        let mut acc = accelerator();
        let handle = acc.completion_handle();
        let (header, input, output) = frame();

        acc.decode(&header, &input, &output).unwrap();
        handle.notify((MpegStatus::SUCCESS | MpegStatus::ERROR).bits());
        let err = acc.wait(Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, CedarError::Hardware(0x3)));
        assert_eq!(acc.state(), EngineState::Error);

        assert!(matches!(
            acc.decode(&header, &input, &output),
            Err(CedarError::InvalidState(_))
        ));

        acc.reset().unwrap();
        assert_eq!(acc.state(), EngineState::Idle);
        let last = acc.bus().writes().last().copied().unwrap();
        assert_eq!((last.offset, last.value), (VE_CTRL, VE_CTRL_DISABLED));
    }

    #[tokio::test]
    async fn test_超时() {
        let mut acc = accelerator();
        let (header, input, output) = frame();
        acc.decode(&header, &input, &output).unwrap();

        let err = acc.wait(Duration::from_millis(10)).await.unwrap_err();
        assert!(matches!(err, CedarError::Timeout(10)));
        assert_eq!(acc.state(), EngineState::Error);
    }

    #[tokio::test]
    async fn test_上一帧状态不会泄漏() {
        let mut acc = accelerator();
        let handle = acc.completion_handle();
        let (header, input, output) = frame();

        acc.decode(&header, &input, &output).unwrap();
        handle.notify(MpegStatus::SUCCESS.bits());
        acc.wait(Duration::from_millis(100)).await.unwrap();

        // 第二帧没有中断到来, 必须超时而不是复用第一帧的结果
        acc.decode(&header, &input, &output).unwrap();
        assert!(acc.wait(Duration::from_millis(10)).await.is_err());
    }

    #[tokio::test]
    async fn test_空闲时等待无效() {
        let mut acc = accelerator();
        let err = acc.wait(Duration::from_millis(10)).await.unwrap_err();
        assert!(matches!(err, CedarError::InvalidState(_)));
    }

    #[test]
    fn test_参考帧从缓冲区集合解析() {
        let mut acc = accelerator();
        acc.buffers_mut()
            .insert(1, PictureBuffer::new(0x4b00_0000, 0x4b10_0000))
            .unwrap();
        let (mut header, input, output) = frame();
        header.forward_index = 1;
        acc.decode(&header, &input, &output).unwrap();

        let plan = acc.bus_mut().take();
        assert_eq!(
            plan.last_write_to(crate::regs::VE_MPEG_FWD_LUMA),
            Some(0x0b00_0000)
        );
        assert_eq!(plan.last_write_to(crate::regs::VE_MPEG_BACK_LUMA), Some(0));
        assert!(plan.last_write_to(VE_MPEG_TRIGGER).is_some());
    }

    /// 在第 N 次写入时失败的总线
    struct FailingBus {
        remaining: usize,
    }

    impl RegisterBus for FailingBus {
        fn write(&mut self, _value: u32, offset: u32) -> CedarResult<()> {
            if self.remaining == 0 {
                return Err(CedarError::Bus {
                    offset,
                    reason: "模拟故障".to_string(),
                });
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_下发失败进入错误状态() {
        let mut acc = Accelerator::new(FailingBus { remaining: 10 }, PlatformConfig::default());
        let (header, input, output) = frame();
        let err = acc.decode(&header, &input, &output).unwrap_err();
        assert!(matches!(err, CedarError::Bus { .. }));
        assert_eq!(acc.state(), EngineState::Error);
    }
}
