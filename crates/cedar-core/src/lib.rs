//! # cedar-core
//!
//! Cedar 视频引擎核心库, 提供基础类型定义、错误处理和工具函数.
//!
//! 本 crate 不涉及任何具体编解码标准, 只包含硬件编程时各模块共用的底层设施:
//! 总线地址修正、寄存器位域打包与宏块几何计算.

pub mod address;
pub mod bitfield;
pub mod error;
pub mod geometry;

// 重导出常用类型
pub use address::{BusAddress, PHYS_OFFSET};
pub use bitfield::BitField;
pub use error::{CedarError, CedarResult};
pub use geometry::MacroblockDims;
