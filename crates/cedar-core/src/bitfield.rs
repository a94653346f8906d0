//! 表驱动的寄存器位域打包器.
//!
//! 硬件寄存器字由若干固定位置的位域组成. 用一张 `BitField` 表描述布局,
//! 打包和解包都按表进行, 避免手写移位时的位置错配.
//!
//! # 示例
//! ```
//! use cedar_core::bitfield::{self, BitField};
//!
//! const LAYOUT: [BitField; 2] = [
//!     BitField::new("hi", 4, 4),
//!     BitField::new("lo", 0, 4),
//! ];
//! let word = bitfield::pack(&LAYOUT, [0xA, 0x5]);
//! assert_eq!(word, 0xA5);
//! assert_eq!(bitfield::unpack(&LAYOUT, word), [0xA, 0x5]);
//! ```

/// 寄存器位域描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    /// 位域名称 (用于调试输出)
    pub name: &'static str,
    /// 最低位位置
    pub shift: u32,
    /// 位宽 (1-32)
    pub width: u32,
}

impl BitField {
    /// 创建位域描述
    pub const fn new(name: &'static str, shift: u32, width: u32) -> Self {
        Self { name, shift, width }
    }

    /// 未移位的值掩码
    pub const fn value_mask(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// 在寄存器字中占用的位
    pub const fn word_mask(&self) -> u32 {
        self.value_mask() << self.shift
    }

    /// 将值截断到位宽后放到对应位置
    pub const fn place(&self, value: u32) -> u32 {
        (value & self.value_mask()) << self.shift
    }

    /// 从寄存器字中取出本位域的值
    pub const fn extract(&self, word: u32) -> u32 {
        (word >> self.shift) & self.value_mask()
    }
}

/// 按布局表把各位域的值打包成一个 32 位字
pub fn pack<const N: usize>(layout: &[BitField; N], values: [u32; N]) -> u32 {
    layout
        .iter()
        .zip(values)
        .fold(0u32, |word, (field, value)| word | field.place(value))
}

/// 按布局表解包, 返回顺序与布局表一致
pub fn unpack<const N: usize>(layout: &[BitField; N], word: u32) -> [u32; N] {
    let mut values = [0u32; N];
    for (slot, field) in values.iter_mut().zip(layout) {
        *slot = field.extract(word);
    }
    values
}

/// 检查布局内各位域互不重叠且都落在 32 位之内
pub fn is_well_formed(layout: &[BitField]) -> bool {
    let mut used = 0u32;
    for field in layout {
        if field.width == 0 || field.shift + field.width > 32 {
            return false;
        }
        let mask = field.word_mask();
        if used & mask != 0 {
            return false;
        }
        used |= mask;
    }
    true
}
