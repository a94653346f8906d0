//! # cedar-mpeg
//!
//! Cedar 视频引擎的 MPEG-1/2 解码命令序列器.
//!
//! 视频引擎是固定功能的硬件解码器: 软件负责解析码流并分配缓冲区,
//! 然后按严格的顺序写一组控制寄存器, 最后写触发寄存器让硬件开始解码.
//! 本 crate 负责其中 "帧头 + 缓冲区地址 -> 寄存器写入序列" 的部分.
//!
//! ## 使用示例
//!
//! ```rust
//! use cedar_mpeg::{FrameHeader, InputBuffer, PictureBuffer, ReferenceBuffers};
//! use cedar_mpeg::bus::RecordingBus;
//!
//! let header = FrameHeader {
//!     width: 320,
//!     height: 240,
//!     slice_end: 4096,
//!     ..FrameHeader::default()
//! };
//! let plan = cedar_mpeg::encode_and_dispatch(
//!     &header,
//!     &InputBuffer::new(0x4800_0000),
//!     &PictureBuffer::new(0x4a00_0000, 0x4a20_0000),
//!     &ReferenceBuffers::none(),
//! );
//! assert_eq!(plan.len(), 149);
//!
//! let mut bus = RecordingBus::new();
//! plan.dispatch(&mut bus).unwrap();
//! ```

pub mod buffers;
pub mod bus;
pub mod config;
pub mod driver;
pub mod header;
pub mod plan;
pub mod quant;
pub mod regs;
pub mod sequencer;
pub mod trace;

// 重导出常用类型
pub use buffers::{BufferSet, InputBuffer, PictureBuffer, ReferenceBuffers};
pub use bus::RegisterBus;
pub use config::PlatformConfig;
pub use driver::{Accelerator, CompletionHandle, EngineState};
pub use header::{FrameHeader, MpegVersion, PictureCodingType, PictureStructure};
pub use plan::{RegisterWrite, WritePlan};
pub use sequencer::{CommandSequencer, encode_and_dispatch};
