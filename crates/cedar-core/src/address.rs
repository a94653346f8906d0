//! 总线地址与物理偏移修正.
//!
//! 视频引擎只能访问以 DRAM 起点为零点的地址, 而 DMA 接口给出的是 CPU
//! 物理地址. 写入任何地址寄存器之前都必须减去平台的 DRAM 物理基址.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CedarError, CedarResult};

/// sun4i/sun5i/sun7i 平台 DRAM 的物理基址
pub const PHYS_OFFSET: u32 = 0x4000_0000;

/// DMA 总线地址 (CPU 物理地址视角)
///
/// JSON 中既可写成数字, 也可写成 `"0x4a000000"` 形式的字符串.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "AddressRepr", into = "u32")]
pub struct BusAddress(pub u32);

impl BusAddress {
    /// 创建总线地址
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// 原始地址值
    pub const fn get(self) -> u32 {
        self.0
    }

    /// 转换为引擎可见地址 (减去物理基址)
    ///
    /// 不做下溢检查: 低于基址的地址按 32 位回绕, 与硬件寄存器宽度一致.
    pub const fn to_engine(self, phys_offset: u32) -> u32 {
        self.0.wrapping_sub(phys_offset)
    }
}

impl From<u32> for BusAddress {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

impl From<BusAddress> for u32 {
    fn from(addr: BusAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl FromStr for BusAddress {
    type Err = CedarError;

    fn from_str(s: &str) -> CedarResult<Self> {
        parse_u32(s).map(Self)
    }
}

/// 解析十进制或 `0x` 前缀的十六进制 u32
pub fn parse_u32(s: &str) -> CedarResult<u32> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u32>(),
    };
    parsed.map_err(|e| CedarError::InvalidArgument(format!("无法解析地址 '{s}': {e}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AddressRepr {
    Number(u32),
    Text(String),
}

impl TryFrom<AddressRepr> for BusAddress {
    type Error = CedarError;

    fn try_from(repr: AddressRepr) -> CedarResult<Self> {
        match repr {
            AddressRepr::Number(n) => Ok(Self(n)),
            AddressRepr::Text(s) => s.parse(),
        }
    }
}
