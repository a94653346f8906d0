//! MPEG-1/2 硬件命令序列器.
//!
//! 把一帧的帧头和缓冲区地址翻译成视频引擎解码该帧所需的寄存器写入序列.
//! 序列是输入的纯函数: 不读取任何硬件状态, 不做参数校验, 也不跨调用保存状态.
//!
//! 写入顺序固定如下:
//! 1. 选择 MPEG 引擎
//! 2. 上传量化表 (128 次)
//! 3. 图像尺寸与帧尺寸
//! 4. 图像头
//! 5. 中断/控制使能
//! 6. 宏块地址、错误状态、CTR_MB 清零
//! 7. 前向/后向参考帧地址
//! 8. 重建与旋转输出地址
//! 9. 码流位偏移与位长度
//! 10. 码流起始与结束地址
//! 11. 触发

use log::debug;

use crate::buffers::{InputBuffer, PictureBuffer, ReferenceBuffers};
use crate::config::PlatformConfig;
use crate::header::FrameHeader;
use crate::plan::WritePlan;
use crate::quant;
use crate::regs::*;

/// 每帧固定的写入次数
pub const PLAN_LEN: usize = 1 + 128 + 2 + 1 + 1 + 3 + 4 + 4 + 2 + 2 + 1;

/// 命令序列器
///
/// 只持有平台配置, 可以在多次解码之间复用.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandSequencer {
    config: PlatformConfig,
}

impl CommandSequencer {
    /// 以指定平台配置创建序列器
    pub fn new(config: PlatformConfig) -> Self {
        Self { config }
    }

    /// 平台配置
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// 生成解码一帧的完整写入计划
    pub fn plan(
        &self,
        header: &FrameHeader,
        input: &InputBuffer,
        output: &PictureBuffer,
        refs: &ReferenceBuffers,
    ) -> WritePlan {
        let mut plan = WritePlan::with_capacity(PLAN_LEN);

        plan.push(VE_CTRL, VE_CTRL_MPEG);

        for word in quant::upload_words() {
            plan.push(VE_MPEG_IQ_MIN_INPUT, word);
        }

        let mb = header.mb_dims();
        plan.push(VE_MPEG_SIZE, (mb.width << 8) | mb.height);
        plan.push(VE_MPEG_FRAME_SIZE, (mb.width << 20) | (mb.height << 4));

        let pic_header = header.picture_fields().pack();
        plan.push(VE_MPEG_PIC_HDR, pic_header);

        plan.push(VE_MPEG_CTRL, VE_MPEG_CTRL_MPEG2);

        plan.push(VE_MPEG_MBA, 0);
        plan.push(VE_MPEG_ERROR, 0);
        plan.push(VE_MPEG_CTR_MB, 0);

        let (fwd_luma, fwd_chroma) = self.reference_addrs(refs.forward);
        let (bwd_luma, bwd_chroma) = self.reference_addrs(refs.backward);
        plan.push(VE_MPEG_FWD_LUMA, fwd_luma);
        plan.push(VE_MPEG_FWD_CHROMA, fwd_chroma);
        plan.push(VE_MPEG_BACK_LUMA, bwd_luma);
        plan.push(VE_MPEG_BACK_CHROMA, bwd_chroma);

        // 不做旋转时, 重建与旋转输出必须指向同一缓冲区
        let out_luma = output.luma.to_engine(self.config.phys_offset);
        let out_chroma = output.chroma.to_engine(self.config.phys_offset);
        plan.push(VE_MPEG_REC_LUMA, out_luma);
        plan.push(VE_MPEG_REC_CHROMA, out_chroma);
        plan.push(VE_MPEG_ROT_LUMA, out_luma);
        plan.push(VE_MPEG_ROT_CHROMA, out_chroma);

        plan.push(VE_MPEG_VLD_OFFSET, header.slice_pos);
        plan.push(VE_MPEG_VLD_LEN, header.vld_len());

        let in_start = input.address.to_engine(self.config.phys_offset);
        let in_end = in_start
            .wrapping_add(self.config.vbv_size)
            .wrapping_sub(1);
        plan.push(VE_MPEG_VLD_ADDR, vld_addr_encode(in_start));
        plan.push(VE_MPEG_VLD_END, in_end);

        let trigger = if header.is_mpeg2() {
            VE_TRIG_MPEG2
        } else {
            VE_TRIG_MPEG1
        };
        plan.push(VE_MPEG_TRIGGER, trigger);

        debug!(
            "{} {:?} 帧 {}x{} ({}x{} MB), pic_hdr={:#010x}, vld={}+{} bits, trigger={:#010x}",
            header.version,
            header.picture_coding_type,
            header.width,
            header.height,
            mb.width,
            mb.height,
            pic_header,
            header.slice_pos,
            header.vld_len(),
            trigger
        );

        plan
    }

    /// 参考帧亮度/色度的引擎地址, 缺失时为 0
    fn reference_addrs(&self, buffer: Option<PictureBuffer>) -> (u32, u32) {
        match buffer {
            Some(buf) => (
                buf.luma.to_engine(self.config.phys_offset),
                buf.chroma.to_engine(self.config.phys_offset),
            ),
            None => (0, 0),
        }
    }
}

/// 以默认 sunxi 平台配置生成解码一帧的写入计划
pub fn encode_and_dispatch(
    header: &FrameHeader,
    input: &InputBuffer,
    output: &PictureBuffer,
    refs: &ReferenceBuffers,
) -> WritePlan {
    CommandSequencer::default().plan(header, input, output, refs)
}
