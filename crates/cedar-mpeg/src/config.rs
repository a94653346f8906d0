//! 平台相关的硬件参数.

use cedar_core::{CedarError, CedarResult, PHYS_OFFSET};
use serde::{Deserialize, Serialize};

/// 输入码流窗口默认大小 (VBV 缓冲区, 1 MiB)
pub const VBV_SIZE: u32 = 1024 * 1024;

/// 平台配置
///
/// 缺省值对应 A10/A13/A20 等 sunxi SoC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// DRAM 物理基址, 所有地址写入前都要减去该值
    #[serde(default = "default_phys_offset")]
    pub phys_offset: u32,
    /// 输入码流窗口大小 (字节)
    #[serde(default = "default_vbv_size")]
    pub vbv_size: u32,
}

fn default_phys_offset() -> u32 {
    PHYS_OFFSET
}

fn default_vbv_size() -> u32 {
    VBV_SIZE
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            phys_offset: PHYS_OFFSET,
            vbv_size: VBV_SIZE,
        }
    }
}

impl PlatformConfig {
    /// 检查配置是否可用
    pub fn validate(&self) -> CedarResult<()> {
        if self.vbv_size == 0 {
            return Err(CedarError::InvalidArgument(
                "vbv_size 不能为 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认配置() {
        let config = PlatformConfig::default();
        assert_eq!(config.phys_offset, 0x4000_0000);
        assert_eq!(config.vbv_size, 0x10_0000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_零窗口无效() {
        let config = PlatformConfig {
            vbv_size: 0,
            ..PlatformConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CedarError::InvalidArgument(_))
        ));
    }
}
