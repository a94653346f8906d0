//! 统一错误类型定义.
//!
//! 所有 Cedar crate 共用的错误类型, 支持跨模块传播.
//!
//! 注意: 命令序列器本身从不返回错误, 这里的错误只出现在它的外围
//! (寄存器总线、缓冲区集合、驱动状态机、寄存器轨迹文件).

use thiserror::Error;

/// Cedar 统一错误类型
#[derive(Debug, Error)]
pub enum CedarError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 无效数据 (损坏的轨迹文件等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 寄存器总线访问失败
    #[error("寄存器总线错误: 偏移 {offset:#05x}: {reason}")]
    Bus { offset: u32, reason: String },

    /// 加速器正忙, 上一帧尚未完成
    #[error("加速器正忙, 上一帧解码尚未完成")]
    Busy,

    /// 当前状态不允许该操作
    #[error("状态错误: {0}")]
    InvalidState(String),

    /// 等待硬件完成超时
    #[error("等待硬件完成超时 ({0} ms)")]
    Timeout(u64),

    /// 硬件报告的解码错误 (状态寄存器原始值)
    #[error("硬件解码错误: 状态 {0:#x}")]
    Hardware(u32),
}

/// Cedar 统一 Result 类型
pub type CedarResult<T> = Result<T, CedarError>;
