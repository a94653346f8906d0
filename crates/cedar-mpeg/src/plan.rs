//! 寄存器写入计划.
//!
//! 序列器不直接访问硬件, 而是生成一份有序的 (偏移, 值) 列表,
//! 再由 `dispatch()` 交给寄存器总线逐条写出. 这样整条序列可以脱离硬件测试.

use std::fmt;

use cedar_core::CedarResult;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::bus::RegisterBus;
use crate::regs;

/// 一次寄存器写入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterWrite {
    /// 寄存器偏移
    pub offset: u32,
    /// 写入值
    pub value: u32,
}

impl RegisterWrite {
    /// 创建寄存器写入
    pub const fn new(offset: u32, value: u32) -> Self {
        Self { offset, value }
    }

    /// 目标寄存器的符号名
    pub fn register_name(&self) -> Option<&'static str> {
        regs::register_name(self.offset)
    }
}

impl fmt::Display for RegisterWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} [{:#05x}] <- {:#010x}",
            self.register_name().unwrap_or("?"),
            self.offset,
            self.value
        )
    }
}

impl Serialize for RegisterWrite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RegisterWrite", 3)?;
        s.serialize_field("register", &self.register_name())?;
        s.serialize_field("offset", &self.offset)?;
        s.serialize_field("value", &self.value)?;
        s.end()
    }
}

/// 有序的寄存器写入计划
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritePlan {
    writes: Vec<RegisterWrite>,
}

impl WritePlan {
    /// 创建空计划
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定容量创建计划
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writes: Vec::with_capacity(capacity),
        }
    }

    /// 追加一次写入
    pub fn push(&mut self, offset: u32, value: u32) {
        self.writes.push(RegisterWrite::new(offset, value));
    }

    /// 写入次数
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// 按顺序遍历
    pub fn iter(&self) -> std::slice::Iter<'_, RegisterWrite> {
        self.writes.iter()
    }

    /// 全部写入的切片
    pub fn as_slice(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// 写入某个寄存器的全部值, 保持写入顺序
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.writes
            .iter()
            .filter(|w| w.offset == offset)
            .map(|w| w.value)
            .collect()
    }

    /// 写入某个寄存器的最后一个值
    pub fn last_write_to(&self, offset: u32) -> Option<u32> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.offset == offset)
            .map(|w| w.value)
    }

    /// 触发寄存器的写入值
    pub fn trigger(&self) -> Option<u32> {
        self.last_write_to(regs::VE_MPEG_TRIGGER)
    }

    /// 按顺序把全部写入交给寄存器总线
    ///
    /// 遇到第一个总线错误即停止, 之后的写入不再发出.
    pub fn dispatch<B: RegisterBus + ?Sized>(&self, bus: &mut B) -> CedarResult<()> {
        for w in &self.writes {
            bus.write(w.value, w.offset)?;
        }
        Ok(())
    }
}

impl From<Vec<RegisterWrite>> for WritePlan {
    fn from(writes: Vec<RegisterWrite>) -> Self {
        Self { writes }
    }
}

impl<'a> IntoIterator for &'a WritePlan {
    type Item = &'a RegisterWrite;
    type IntoIter = std::slice::Iter<'a, RegisterWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.iter()
    }
}

impl fmt::Display for WritePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.writes.iter().enumerate() {
            writeln!(f, "{i:3}: {w}")?;
        }
        Ok(())
    }
}

impl Serialize for WritePlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.writes.serialize(serializer)
    }
}
