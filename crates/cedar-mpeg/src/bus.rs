//! 寄存器访问层.
//!
//! 序列器只依赖一个有序、不重排、不合并的写原语 `write(value, offset)`.

use std::ptr::NonNull;

use cedar_core::{CedarError, CedarResult};
use log::trace;

use crate::plan::{RegisterWrite, WritePlan};

/// 寄存器总线
///
/// 实现必须保证硬件按调用顺序观察到每一次写入.
pub trait RegisterBus {
    /// 向 `offset` 处的 32 位寄存器写入 `value`
    fn write(&mut self, value: u32, offset: u32) -> CedarResult<()>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn write(&mut self, value: u32, offset: u32) -> CedarResult<()> {
        (**self).write(value, offset)
    }
}

/// 记录全部写入的总线, 用于测试与离线生成轨迹
#[derive(Debug, Clone, Default)]
pub struct RecordingBus {
    writes: Vec<RegisterWrite>,
}

impl RecordingBus {
    /// 创建空记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录的写入
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// 取出并清空已记录的写入
    pub fn take(&mut self) -> WritePlan {
        WritePlan::from(std::mem::take(&mut self.writes))
    }
}

impl RegisterBus for RecordingBus {
    fn write(&mut self, value: u32, offset: u32) -> CedarResult<()> {
        self.writes.push(RegisterWrite::new(offset, value));
        Ok(())
    }
}

/// 内存映射寄存器窗口
///
/// 每次写入都是一次 32 位 volatile 存储, 编译器不会重排或合并.
#[derive(Debug)]
pub struct MmioBus {
    base: NonNull<u8>,
    len: usize,
}

impl MmioBus {
    /// 包装一段已映射的寄存器窗口
    ///
    /// # Safety
    /// `base` 必须指向至少 `len` 字节、4 字节对齐的可写映射, 且在 `MmioBus`
    /// 存活期间保持有效, 并且没有其他代码同时写同一窗口.
    pub unsafe fn new(base: *mut u8, len: usize) -> CedarResult<Self> {
        let base = NonNull::new(base)
            .ok_or_else(|| CedarError::InvalidArgument("寄存器基址为空".to_string()))?;
        if base.as_ptr() as usize % 4 != 0 {
            return Err(CedarError::InvalidArgument(
                "寄存器基址未按 4 字节对齐".to_string(),
            ));
        }
        Ok(Self { base, len })
    }

    /// 窗口大小 (字节)
    pub fn len(&self) -> usize {
        self.len
    }

    /// 窗口是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl RegisterBus for MmioBus {
    fn write(&mut self, value: u32, offset: u32) -> CedarResult<()> {
        let off = offset as usize;
        if off % 4 != 0 {
            return Err(CedarError::Bus {
                offset,
                reason: "偏移未按 4 字节对齐".to_string(),
            });
        }
        if off.checked_add(4).is_none_or(|end| end > self.len) {
            return Err(CedarError::Bus {
                offset,
                reason: format!("超出寄存器窗口 ({} 字节)", self.len),
            });
        }
        trace!("mmio write [{offset:#05x}] <- {value:#010x}");
        // SAFETY: 偏移已检查在窗口内且对齐, 窗口有效性由构造者保证
        unsafe {
            self.base.as_ptr().add(off).cast::<u32>().write_volatile(value);
        }
        Ok(())
    }
}
