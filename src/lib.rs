//! # Cedar
//!
//! 纯 Rust 实现的 sunxi Cedar 视频引擎 MPEG-1/2 硬件命令序列器.
//!
//! 给定解析好的帧头和 DMA 缓冲区地址, 生成视频引擎解码一帧所需的
//! 有序寄存器写入序列, 并提供把序列下发到寄存器总线的驱动层.
//!
//! # 快速开始
//!
//! ```rust
//! use cedar::mpeg::{FrameHeader, InputBuffer, PictureBuffer, ReferenceBuffers};
//!
//! let header = FrameHeader {
//!     width: 720,
//!     height: 576,
//!     slice_end: 8192,
//!     ..FrameHeader::default()
//! };
//! let plan = cedar::mpeg::encode_and_dispatch(
//!     &header,
//!     &InputBuffer::new(0x4800_0000),
//!     &PictureBuffer::new(0x4a00_0000, 0x4a20_0000),
//!     &ReferenceBuffers::none(),
//! );
//! println!("{plan}");
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `cedar-core` | 错误类型、总线地址、位域打包、宏块几何 |
//! | `cedar-mpeg` | 帧头、寄存器映射、命令序列器、驱动层 |

pub mod logging;

/// 核心类型与工具
pub use cedar_core as core;

/// MPEG-1/2 命令序列器
pub use cedar_mpeg as mpeg;

/// 获取 Cedar 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
