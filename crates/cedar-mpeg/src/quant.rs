//! 默认量化矩阵及其上传格式.
//!
//! 硬件的量化表地址空间共 128 项: 0-63 为非帧内表, 64-127 为帧内表.
//! 每次写入 VE_MPEG_IQ_MIN_INPUT 时, 高位携带表项地址, 低 8 位为量化值.

/// MPEG 默认帧内量化矩阵
pub const MPEG_DEFAULT_INTRA_QUANT: [u8; 64] = [
    8, 16, 16, 19, 16, 19, 22, 22, //
    22, 22, 22, 22, 26, 24, 26, 27, //
    27, 27, 26, 26, 26, 26, 27, 27, //
    27, 29, 29, 29, 34, 34, 34, 29, //
    29, 29, 27, 27, 29, 29, 32, 32, //
    34, 34, 37, 38, 37, 35, 35, 34, //
    35, 38, 38, 40, 40, 40, 48, 48, //
    46, 46, 56, 56, 58, 69, 69, 83,
];

/// MPEG 默认非帧内量化矩阵 (全 16)
pub const MPEG_DEFAULT_NON_INTRA_QUANT: [u8; 64] = [16; 64];

/// 帧内表在量化地址空间中的起始地址
pub const INTRA_TABLE_BASE: u32 = 64;

/// 非帧内表在量化地址空间中的起始地址
pub const NON_INTRA_TABLE_BASE: u32 = 0;

/// 帧内表第 `i` 项的上传字
pub const fn intra_entry(i: usize) -> u32 {
    ((INTRA_TABLE_BASE + i as u32) << 8) | MPEG_DEFAULT_INTRA_QUANT[i] as u32
}

/// 非帧内表第 `i` 项的上传字
pub const fn non_intra_entry(i: usize) -> u32 {
    ((NON_INTRA_TABLE_BASE + i as u32) << 8) | MPEG_DEFAULT_NON_INTRA_QUANT[i] as u32
}

/// 按硬件要求的顺序生成全部 128 个上传字
///
/// 对每个 `i` 先帧内后非帧内, 不能改为两张表分别连续上传.
pub fn upload_words() -> impl Iterator<Item = u32> {
    (0..64).flat_map(|i| [intra_entry(i), non_intra_entry(i)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_上传字格式() {
        assert_eq!(intra_entry(0), (64 << 8) | 8);
        assert_eq!(intra_entry(63), (127 << 8) | 83);
        assert_eq!(non_intra_entry(0), 16);
        assert_eq!(non_intra_entry(63), (63 << 8) | 16);
    }

    #[test]
    fn test_上传顺序交错() {
        let words: Vec<u32> = upload_words().collect();
        assert_eq!(words.len(), 128);
        for (i, pair) in words.chunks(2).enumerate() {
            assert_eq!(pair[0] >> 8, 64 + i as u32);
            assert_eq!(pair[1] >> 8, i as u32);
        }
    }
}
