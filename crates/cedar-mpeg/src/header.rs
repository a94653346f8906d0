//! MPEG-1/2 帧头描述.
//!
//! `FrameHeader` 由外部码流解析器按图像填写, 在一次解码调用期间不可变.
//! 这里只保存序列器编程硬件所需的字段, 不做任何合法性校验.

use std::fmt;

use cedar_core::bitfield::{self, BitField};
use cedar_core::MacroblockDims;
use serde::{Deserialize, Serialize};

/// MPEG 版本 (决定触发寄存器的取值)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MpegVersion {
    /// MPEG-1 (ISO/IEC 11172-2)
    Mpeg1,
    /// MPEG-2 (ISO/IEC 13818-2)
    #[default]
    Mpeg2,
}

impl fmt::Display for MpegVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mpeg1 => write!(f, "MPEG-1"),
            Self::Mpeg2 => write!(f, "MPEG-2"),
        }
    }
}

/// 图像编码类型 (picture_coding_type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PictureCodingType {
    /// 帧内编码, 不使用参考帧
    #[default]
    I,
    /// 前向预测
    P,
    /// 双向预测
    B,
    /// 仅 DC 系数 (MPEG-1)
    D,
}

impl PictureCodingType {
    /// 码流中的编码值
    pub const fn code(self) -> u8 {
        match self {
            Self::I => 1,
            Self::P => 2,
            Self::B => 3,
            Self::D => 4,
        }
    }

    /// 由码流编码值还原
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::I),
            2 => Some(Self::P),
            3 => Some(Self::B),
            4 => Some(Self::D),
            _ => None,
        }
    }
}

/// 图像结构 (picture_structure)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PictureStructure {
    /// 顶场
    TopField,
    /// 底场
    BottomField,
    /// 帧图像
    #[default]
    Frame,
}

impl PictureStructure {
    /// 码流中的编码值
    pub const fn code(self) -> u8 {
        match self {
            Self::TopField => 1,
            Self::BottomField => 2,
            Self::Frame => 3,
        }
    }

    /// 由码流编码值还原
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::TopField),
            2 => Some(Self::BottomField),
            3 => Some(Self::Frame),
            _ => None,
        }
    }
}

/// 解析器交给序列器的帧头
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameHeader {
    /// MPEG 版本
    pub version: MpegVersion,
    /// 图像宽度 (像素)
    pub width: u32,
    /// 图像高度 (像素)
    pub height: u32,
    /// 图像编码类型
    pub picture_coding_type: PictureCodingType,
    /// 运动向量范围 `f_code[参考方向][分量]`, 每个 4 位
    pub f_code: [[u8; 2]; 2],
    /// 帧内 DC 精度 (2 位)
    pub intra_dc_precision: u8,
    /// 图像结构
    pub picture_structure: PictureStructure,
    pub top_field_first: bool,
    pub frame_pred_frame_dct: bool,
    pub concealment_motion_vectors: bool,
    pub q_scale_type: bool,
    pub intra_vlc_format: bool,
    pub alternate_scan: bool,
    /// 切片数据在输入缓冲区中的起始位置 (位)
    pub slice_pos: u32,
    /// 切片数据在输入缓冲区中的结束位置 (位)
    pub slice_end: u32,
    /// 前向参考帧在缓冲区集合中的索引, 0 表示无
    pub forward_index: usize,
    /// 后向参考帧在缓冲区集合中的索引, 0 表示无
    pub backward_index: usize,
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self {
            version: MpegVersion::default(),
            width: 0,
            height: 0,
            picture_coding_type: PictureCodingType::default(),
            // 未使用的 f_code 按标准填 15
            f_code: [[0xf; 2]; 2],
            intra_dc_precision: 0,
            picture_structure: PictureStructure::default(),
            top_field_first: false,
            frame_pred_frame_dct: false,
            concealment_motion_vectors: false,
            q_scale_type: false,
            intra_vlc_format: false,
            alternate_scan: false,
            slice_pos: 0,
            slice_end: 0,
            forward_index: 0,
            backward_index: 0,
        }
    }
}

impl FrameHeader {
    /// 宏块尺寸
    pub fn mb_dims(&self) -> MacroblockDims {
        MacroblockDims::from_pixels(self.width, self.height)
    }

    /// 切片数据长度 (位)
    ///
    /// 结束位置小于起始位置时按 32 位回绕, 由硬件自行处理.
    pub fn vld_len(&self) -> u32 {
        self.slice_end.wrapping_sub(self.slice_pos)
    }

    /// 是否为 MPEG-2 码流
    pub fn is_mpeg2(&self) -> bool {
        self.version == MpegVersion::Mpeg2
    }

    /// 提取写入图像头寄存器的原始字段
    pub fn picture_fields(&self) -> PictureHeaderFields {
        PictureHeaderFields {
            coding_type: self.picture_coding_type.code(),
            f_code: self.f_code,
            intra_dc_precision: self.intra_dc_precision,
            picture_structure: self.picture_structure.code(),
            top_field_first: self.top_field_first,
            frame_pred_frame_dct: self.frame_pred_frame_dct,
            concealment_motion_vectors: self.concealment_motion_vectors,
            q_scale_type: self.q_scale_type,
            intra_vlc_format: self.intra_vlc_format,
            alternate_scan: self.alternate_scan,
        }
    }
}

/// 图像头寄存器 (VE_MPEG_PIC_HDR) 的位域布局, 高位在前
pub const PIC_HDR_LAYOUT: [BitField; 13] = [
    BitField::new("picture_coding_type", 28, 4),
    BitField::new("f_code[0][0]", 24, 4),
    BitField::new("f_code[0][1]", 20, 4),
    BitField::new("f_code[1][0]", 16, 4),
    BitField::new("f_code[1][1]", 12, 4),
    BitField::new("intra_dc_precision", 10, 2),
    BitField::new("picture_structure", 8, 2),
    BitField::new("top_field_first", 7, 1),
    BitField::new("frame_pred_frame_dct", 6, 1),
    BitField::new("concealment_motion_vectors", 5, 1),
    BitField::new("q_scale_type", 4, 1),
    BitField::new("intra_vlc_format", 3, 1),
    BitField::new("alternate_scan", 2, 1),
];

/// 图像头寄存器中的原始字段值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PictureHeaderFields {
    pub coding_type: u8,
    pub f_code: [[u8; 2]; 2],
    pub intra_dc_precision: u8,
    pub picture_structure: u8,
    pub top_field_first: bool,
    pub frame_pred_frame_dct: bool,
    pub concealment_motion_vectors: bool,
    pub q_scale_type: bool,
    pub intra_vlc_format: bool,
    pub alternate_scan: bool,
}

impl PictureHeaderFields {
    /// 按 `PIC_HDR_LAYOUT` 打包为寄存器字, 各字段截断到自身位宽
    pub fn pack(&self) -> u32 {
        bitfield::pack(
            &PIC_HDR_LAYOUT,
            [
                u32::from(self.coding_type),
                u32::from(self.f_code[0][0]),
                u32::from(self.f_code[0][1]),
                u32::from(self.f_code[1][0]),
                u32::from(self.f_code[1][1]),
                u32::from(self.intra_dc_precision),
                u32::from(self.picture_structure),
                u32::from(self.top_field_first),
                u32::from(self.frame_pred_frame_dct),
                u32::from(self.concealment_motion_vectors),
                u32::from(self.q_scale_type),
                u32::from(self.intra_vlc_format),
                u32::from(self.alternate_scan),
            ],
        )
    }

    /// 从寄存器字还原各字段
    pub fn unpack(word: u32) -> Self {
        let [ct, f00, f01, f10, f11, dc, ps, tff, fpfd, cmv, qst, ivf, alt] =
            bitfield::unpack(&PIC_HDR_LAYOUT, word);
        Self {
            coding_type: ct as u8,
            f_code: [[f00 as u8, f01 as u8], [f10 as u8, f11 as u8]],
            intra_dc_precision: dc as u8,
            picture_structure: ps as u8,
            top_field_first: tff != 0,
            frame_pred_frame_dct: fpfd != 0,
            concealment_motion_vectors: cmv != 0,
            q_scale_type: qst != 0,
            intra_vlc_format: ivf != 0,
            alternate_scan: alt != 0,
        }
    }
}
