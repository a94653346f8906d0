//! 寄存器写入轨迹的二进制格式.
//!
//! 用于把生成的写入计划与从真实硬件抓取的轨迹逐条比对.
//!
//! 格式 (小端):
//! - 4 字节魔数 `CVE1`
//! - u32 写入条数
//! - 每条: u32 偏移, u32 值

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use cedar_core::{CedarError, CedarResult};

use crate::plan::{RegisterWrite, WritePlan};

/// 轨迹文件魔数
pub const TRACE_MAGIC: [u8; 4] = *b"CVE1";

/// 单个轨迹允许的最大写入条数
const MAX_TRACE_WRITES: u32 = 1 << 20;

/// 写出轨迹
pub fn write_trace<W: Write>(w: &mut W, plan: &WritePlan) -> CedarResult<()> {
    let count = u32::try_from(plan.len())
        .map_err(|_| CedarError::InvalidArgument(format!("写入条数过多: {}", plan.len())))?;
    w.write_all(&TRACE_MAGIC)?;
    w.write_u32::<LittleEndian>(count)?;
    for write in plan {
        w.write_u32::<LittleEndian>(write.offset)?;
        w.write_u32::<LittleEndian>(write.value)?;
    }
    Ok(())
}

/// 读取轨迹
pub fn read_trace<R: Read>(r: &mut R) -> CedarResult<WritePlan> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).map_err(truncated)?;
    if magic != TRACE_MAGIC {
        return Err(CedarError::InvalidData(format!(
            "轨迹魔数错误: {:02x?}",
            magic
        )));
    }

    let count = r.read_u32::<LittleEndian>().map_err(truncated)?;
    if count > MAX_TRACE_WRITES {
        return Err(CedarError::InvalidData(format!(
            "轨迹写入条数异常: {count}"
        )));
    }

    let mut writes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = r.read_u32::<LittleEndian>().map_err(truncated)?;
        let value = r.read_u32::<LittleEndian>().map_err(truncated)?;
        writes.push(RegisterWrite::new(offset, value));
    }
    Ok(WritePlan::from(writes))
}

fn truncated(err: io::Error) -> CedarError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        CedarError::InvalidData("轨迹文件被截断".to_string())
    } else {
        CedarError::Io(err)
    }
}

/// 两份轨迹第一次出现差异的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergence {
    /// 写入序号
    pub index: usize,
    /// 期望的写入, 期望序列已结束时为 `None`
    pub expected: Option<RegisterWrite>,
    /// 实际的写入, 实际序列已结束时为 `None`
    pub actual: Option<RegisterWrite>,
}

/// 查找两份写入序列的第一处差异, 完全一致时返回 `None`
pub fn first_divergence(expected: &WritePlan, actual: &WritePlan) -> Option<Divergence> {
    let longest = expected.len().max(actual.len());
    (0..longest).find_map(|index| {
        let e = expected.as_slice().get(index).copied();
        let a = actual.as_slice().get(index).copied();
        (e != a).then_some(Divergence {
            index,
            expected: e,
            actual: a,
        })
    })
}
