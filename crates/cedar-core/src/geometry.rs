//! 宏块几何计算.

/// 宏块边长 (像素)
pub const MB_SIZE: u32 = 16;

/// 以宏块为单位的图像尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacroblockDims {
    /// 水平宏块数
    pub width: u32,
    /// 垂直宏块数
    pub height: u32,
}

impl MacroblockDims {
    /// 由像素尺寸向上取整得到宏块尺寸
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self {
            width: width.div_ceil(MB_SIZE),
            height: height.div_ceil(MB_SIZE),
        }
    }

    /// 宏块总数
    pub fn count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
