//! 解码任务描述文件.
//!
//! ```json
//! {
//!   "header": { "version": "mpeg2", "width": 720, "height": 576,
//!               "picture_coding_type": "P", "f_code": [[1, 1], [15, 15]],
//!               "slice_pos": 32, "slice_end": 81920, "forward_index": 1 },
//!   "input": "0x48000000",
//!   "output": { "luma": "0x4a000000", "chroma": "0x4a065400" },
//!   "references": [ { "index": 1, "luma": "0x4b000000", "chroma": "0x4b065400" } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cedar_core::BusAddress;
use cedar_mpeg::{BufferSet, FrameHeader, InputBuffer, PictureBuffer, ReferenceBuffers};
use serde::Deserialize;

/// 一帧解码任务
#[derive(Debug, Deserialize)]
pub struct DecodeJob {
    pub header: FrameHeader,
    pub input: BusAddress,
    pub output: PictureBuffer,
    #[serde(default)]
    pub references: Vec<ReferenceSlot>,
}

/// 缓冲区集合中的一个参考帧
#[derive(Debug, Deserialize)]
pub struct ReferenceSlot {
    pub index: usize,
    pub luma: BusAddress,
    pub chroma: BusAddress,
}

impl DecodeJob {
    /// 从 JSON 文件读取
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("读取任务文件失败, path={}", path.display()))?;
        Self::parse(&text).with_context(|| format!("解析任务文件失败, path={}", path.display()))
    }

    /// 从 JSON 文本解析
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn input_buffer(&self) -> InputBuffer {
        InputBuffer::new(self.input)
    }

    /// 构造缓冲区集合并解析帧头引用的参考帧
    pub fn resolve_references(&self) -> Result<ReferenceBuffers> {
        let mut set = BufferSet::new();
        for slot in &self.references {
            set.insert(slot.index, PictureBuffer::new(slot.luma, slot.chroma))
                .with_context(|| format!("参考帧槽位 {} 无效", slot.index))?;
        }
        let refs = set.references(&self.header);
        if self.header.forward_index != 0 && refs.forward.is_none() {
            log::warn!("前向参考帧 #{} 不存在, 按无参考处理", self.header.forward_index);
        }
        if self.header.backward_index != 0 && refs.backward.is_none() {
            log::warn!("后向参考帧 #{} 不存在, 按无参考处理", self.header.backward_index);
        }
        Ok(refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cedar_mpeg::{MpegVersion, PictureCodingType};

    const JOB: &str = r#"{
        "header": {
            "version": "mpeg1",
            "width": 352,
            "height": 288,
            "picture_coding_type": "B",
            "f_code": [[1, 2], [3, 4]],
            "slice_end": 2048,
            "forward_index": 1,
            "backward_index": 2
        },
        "input": "0x48000000",
        "output": { "luma": 1241513984, "chroma": "0x4a100000" },
        "references": [
            { "index": 1, "luma": "0x4b000000", "chroma": "0x4b100000" }
        ]
    }"#;

    #[test]
    fn test_解析任务文件() {
        let job = DecodeJob::parse(JOB).unwrap();
        assert_eq!(job.header.version, MpegVersion::Mpeg1);
        assert_eq!(job.header.picture_coding_type, PictureCodingType::B);
        // 未给出的字段取默认值
        assert_eq!(job.header.slice_pos, 0);
        assert_eq!(job.output.luma.get(), 0x4a00_0000);
        assert_eq!(job.input_buffer().address.get(), 0x4800_0000);
    }

    #[test]
    fn test_缺失的参考帧解析为空() {
        let job = DecodeJob::parse(JOB).unwrap();
        let refs = job.resolve_references().unwrap();
        assert_eq!(refs.forward.map(|b| b.luma.get()), Some(0x4b00_0000));
        assert_eq!(refs.backward, None);
    }

    #[test]
    fn test_保留槽位报错() {
        let text = JOB.replace(r#""index": 1"#, r#""index": 0"#);
        let job = DecodeJob::parse(&text).unwrap();
        assert!(job.resolve_references().is_err());
    }

    #[test]
    fn test_地址格式错误() {
        let text = JOB.replace("0x48000000", "0xZZ");
        assert!(DecodeJob::parse(&text).is_err());
    }

    #[test]
    fn test_从文件加载() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.json");
        fs::write(&path, JOB).unwrap();
        let job = DecodeJob::load(&path).unwrap();
        assert_eq!(job.references.len(), 1);

        let err = DecodeJob::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
