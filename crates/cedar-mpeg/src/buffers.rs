//! 图像缓冲区与参考帧集合.
//!
//! 缓冲区的分配与地址映射由外部缓冲区管理器负责,
//! 这里只记录每个缓冲区两个平面的总线地址.

use cedar_core::{BusAddress, CedarError, CedarResult};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::header::FrameHeader;

/// 缓冲区集合的槽位数 (与 V4L2 的 VIDEO_MAX_FRAME 一致)
pub const MAX_BUFFERS: usize = 32;

/// 一帧图像缓冲区 (亮度 + 色度两个平面)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PictureBuffer {
    /// 亮度平面总线地址
    pub luma: BusAddress,
    /// 色度平面总线地址
    pub chroma: BusAddress,
}

impl PictureBuffer {
    /// 创建图像缓冲区
    pub fn new(luma: impl Into<BusAddress>, chroma: impl Into<BusAddress>) -> Self {
        Self {
            luma: luma.into(),
            chroma: chroma.into(),
        }
    }
}

/// 输入码流缓冲区
///
/// 窗口大小由 `PlatformConfig::vbv_size` 决定, 不随缓冲区携带.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputBuffer {
    /// 起始总线地址
    pub address: BusAddress,
}

impl InputBuffer {
    /// 创建输入缓冲区
    pub fn new(address: impl Into<BusAddress>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// 本帧使用的前向/后向参考帧, 缺失时为 `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferenceBuffers {
    pub forward: Option<PictureBuffer>,
    pub backward: Option<PictureBuffer>,
}

impl ReferenceBuffers {
    /// 无参考帧 (I 帧)
    pub const fn none() -> Self {
        Self {
            forward: None,
            backward: None,
        }
    }
}

/// 已解码输出缓冲区的集合, 按索引寻址
///
/// 索引 0 保留为 "无", 永远不存放缓冲区.
#[derive(Debug, Clone, Default)]
pub struct BufferSet {
    slots: [Option<PictureBuffer>; MAX_BUFFERS],
}

impl BufferSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 在指定槽位登记缓冲区, 返回该槽位原有的缓冲区
    pub fn insert(
        &mut self,
        index: usize,
        buffer: PictureBuffer,
    ) -> CedarResult<Option<PictureBuffer>> {
        if index == 0 || index >= MAX_BUFFERS {
            return Err(CedarError::InvalidArgument(format!(
                "缓冲区索引 {index} 超出范围 1..{MAX_BUFFERS}"
            )));
        }
        trace!("登记缓冲区 #{index}: luma={}, chroma={}", buffer.luma, buffer.chroma);
        Ok(self.slots[index].replace(buffer))
    }

    /// 移除指定槽位的缓冲区
    pub fn remove(&mut self, index: usize) -> Option<PictureBuffer> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// 获取指定槽位的缓冲区
    pub fn get(&self, index: usize) -> Option<&PictureBuffer> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// 将参考帧索引解析为缓冲区
    ///
    /// 索引为 0、越界或槽位为空时都返回 `None`, 序列器据此写入零地址.
    pub fn resolve(&self, index: usize) -> Option<PictureBuffer> {
        if index == 0 {
            return None;
        }
        self.get(index).copied()
    }

    /// 按帧头中的索引取出前向与后向参考帧
    pub fn references(&self, header: &FrameHeader) -> ReferenceBuffers {
        ReferenceBuffers {
            forward: self.resolve(header.forward_index),
            backward: self.resolve(header.backward_index),
        }
    }

    /// 已登记的缓冲区数量
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
