//! Cedar 视频引擎寄存器映射.
//!
//! 偏移均相对于 VE 寄存器基址. 只列出 MPEG 解码路径实际使用的寄存器.

use bitflags::bitflags;

// --- 引擎全局 ---

/// 引擎模式选择
pub const VE_CTRL: u32 = 0x000;

// --- MPEG 引擎 (0x100-0x1FF) ---

/// 图像头
pub const VE_MPEG_PIC_HDR: u32 = 0x100;
/// 图像尺寸 (宏块)
pub const VE_MPEG_SIZE: u32 = 0x108;
/// 帧尺寸 (宏块, 显示尺寸变体)
pub const VE_MPEG_FRAME_SIZE: u32 = 0x10c;
/// 当前宏块地址
pub const VE_MPEG_MBA: u32 = 0x110;
/// 中断与控制
pub const VE_MPEG_CTRL: u32 = 0x114;
/// 触发寄存器, 写入即开始解码
pub const VE_MPEG_TRIGGER: u32 = 0x118;
/// 状态寄存器 (只读, 写 1 清除)
pub const VE_MPEG_STATUS: u32 = 0x11c;
/// 码流起始地址 (编码后)
pub const VE_MPEG_VLD_ADDR: u32 = 0x128;
/// 码流起始位偏移
pub const VE_MPEG_VLD_OFFSET: u32 = 0x12c;
/// 码流位长度
pub const VE_MPEG_VLD_LEN: u32 = 0x130;
/// 码流窗口末字节地址
pub const VE_MPEG_VLD_END: u32 = 0x134;
pub const VE_MPEG_REC_LUMA: u32 = 0x148;
pub const VE_MPEG_REC_CHROMA: u32 = 0x14c;
pub const VE_MPEG_FWD_LUMA: u32 = 0x150;
pub const VE_MPEG_FWD_CHROMA: u32 = 0x154;
pub const VE_MPEG_BACK_LUMA: u32 = 0x158;
pub const VE_MPEG_BACK_CHROMA: u32 = 0x15c;
/// 量化表输入
pub const VE_MPEG_IQ_MIN_INPUT: u32 = 0x180;
/// 错误状态
pub const VE_MPEG_ERROR: u32 = 0x1c4;
/// 用途不明, 每帧必须清零
pub const VE_MPEG_CTR_MB: u32 = 0x1c8;
pub const VE_MPEG_ROT_LUMA: u32 = 0x1cc;
pub const VE_MPEG_ROT_CHROMA: u32 = 0x1d0;

/// 寄存器窗口大小 (字节)
pub const VE_REGS_SIZE: usize = 0x800;

// --- 寄存器取值 ---

/// VE_CTRL: 2MB 重建写模式 | 128 位 DDR 总线 | MPEG 引擎
pub const VE_CTRL_MPEG: u32 = (1 << 20) | (0x3 << 16);

/// VE_CTRL: 关闭全部引擎
pub const VE_CTRL_DISABLED: u32 = 0x7;

/// VE_MPEG_CTRL: 打开 MPEG 类解码完成中断, 其余位含义未公开
pub const VE_MPEG_CTRL_MPEG2: u32 = 0x8000_01b8;

bitflags! {
    /// VE_MPEG_TRIGGER 位域
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Trigger: u32 {
        /// 在宏块边界处停止
        const MB_BOUNDARY = 1 << 31;
        /// MPEG-1 解码
        const MPEG1 = 1 << 24;
        /// MPEG-2 解码
        const MPEG2 = 2 << 24;
        /// 开始解码命令
        const START_DECODE = 0xf;
    }
}

/// MPEG-1 触发值
pub const VE_TRIG_MPEG1: u32 = Trigger::MB_BOUNDARY
    .union(Trigger::MPEG1)
    .union(Trigger::START_DECODE)
    .bits();

/// MPEG-2 触发值
pub const VE_TRIG_MPEG2: u32 = Trigger::MB_BOUNDARY
    .union(Trigger::MPEG2)
    .union(Trigger::START_DECODE)
    .bits();

bitflags! {
    /// VE_MPEG_STATUS 位域
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MpegStatus: u32 {
        /// 解码成功完成
        const SUCCESS = 1 << 0;
        /// 解码出错
        const ERROR = 1 << 1;
        /// 码流耗尽, 硬件请求更多数据
        const VLD_DATA_REQ = 1 << 2;
    }
}

impl MpegStatus {
    /// 状态寄存器中需要检查 (并写回清除) 的位
    pub const CHECK_MASK: u32 = 0x7;

    /// 是否为干净的成功状态
    pub fn is_success(self) -> bool {
        self.contains(Self::SUCCESS) && !self.intersects(Self::ERROR | Self::VLD_DATA_REQ)
    }
}

/// 码流起始地址编码
///
/// 低 28 位按 16 字节对齐保留, 地址最高 4 位移到 [3:0],
/// [30:28] 置位表示首段、末段、有效数据.
pub const fn vld_addr_encode(addr: u32) -> u32 {
    (addr & 0x0fff_fff0) | (addr >> 28) | (0x7 << 28)
}

/// 寄存器符号名, 用于日志和写入计划的文本输出
pub fn register_name(offset: u32) -> Option<&'static str> {
    let name = match offset {
        VE_CTRL => "VE_CTRL",
        VE_MPEG_PIC_HDR => "VE_MPEG_PIC_HDR",
        VE_MPEG_SIZE => "VE_MPEG_SIZE",
        VE_MPEG_FRAME_SIZE => "VE_MPEG_FRAME_SIZE",
        VE_MPEG_MBA => "VE_MPEG_MBA",
        VE_MPEG_CTRL => "VE_MPEG_CTRL",
        VE_MPEG_TRIGGER => "VE_MPEG_TRIGGER",
        VE_MPEG_STATUS => "VE_MPEG_STATUS",
        VE_MPEG_VLD_ADDR => "VE_MPEG_VLD_ADDR",
        VE_MPEG_VLD_OFFSET => "VE_MPEG_VLD_OFFSET",
        VE_MPEG_VLD_LEN => "VE_MPEG_VLD_LEN",
        VE_MPEG_VLD_END => "VE_MPEG_VLD_END",
        VE_MPEG_REC_LUMA => "VE_MPEG_REC_LUMA",
        VE_MPEG_REC_CHROMA => "VE_MPEG_REC_CHROMA",
        VE_MPEG_FWD_LUMA => "VE_MPEG_FWD_LUMA",
        VE_MPEG_FWD_CHROMA => "VE_MPEG_FWD_CHROMA",
        VE_MPEG_BACK_LUMA => "VE_MPEG_BACK_LUMA",
        VE_MPEG_BACK_CHROMA => "VE_MPEG_BACK_CHROMA",
        VE_MPEG_IQ_MIN_INPUT => "VE_MPEG_IQ_MIN_INPUT",
        VE_MPEG_ERROR => "VE_MPEG_ERROR",
        VE_MPEG_CTR_MB => "VE_MPEG_CTR_MB",
        VE_MPEG_ROT_LUMA => "VE_MPEG_ROT_LUMA",
        VE_MPEG_ROT_CHROMA => "VE_MPEG_ROT_CHROMA",
        _ => return None,
    };
    Some(name)
}
