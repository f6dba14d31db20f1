//! # ASS 字幕文档生成器
//!
//! 给定样式配置、画布尺寸与按播放顺序排列的对齐片段序列，
//! 生成完整的 ASS 字幕文档文本（`[Script Info]`/`[V4+ Styles]` 样式头
//! 加按时间码排列的 `Dialogue` 事件行）。
//!
//! 生成是纯函数：不做 I/O、不含随机性、调用之间不共享可变状态，
//! 可以在实时预览场景下高频重入调用。

pub mod color;
pub mod time;

use std::fmt::Write;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::GenerateError, style::config::SubtitleStyle};

use self::{color::web_color_to_ass, time::format_ass_time};

/// ASS 事件文本内的显式换行符。
const ASS_LINE_BREAK: &str = r"\N";

/// 阴影被禁用时写入 BackColour 槽位的固定值（全透明黑）。
const DEFAULT_BACK_COLOR: &str = "&HFF000000";

/// 由外部对齐器产生的一条带时间戳的文本片段。
///
/// 序列的插入顺序即播放顺序，生成器不会重新排序。
/// 空文本片段应由调用方在生成前过滤。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    /// 开始时间（秒，≥ 0）。
    pub start: f64,
    /// 结束时间（秒），不早于开始时间。
    pub end: f64,
    /// 片段文本。
    pub text: String,
}

/// 嵌入换行符的处理策略。
///
/// 原工具的两条代码路径在这一点上行为不一致，
/// 这里将其收敛为显式选项，默认保留换行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineBreakPolicy {
    /// 保留输入中的显式换行，输出为 ASS 的 `\N` 换行符。
    #[default]
    Preserve,
    /// 去除首尾空白并将所有嵌入换行折叠为单个空格。
    Collapse,
}

/// ASS 生成选项。
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), default)]
pub struct AssGenerationOptions {
    /// 目标画布宽度（像素）。
    pub canvas_width: u32,
    /// 目标画布高度（像素），百分比样式字段以此为基准解析。
    pub canvas_height: u32,
    /// 播放速度倍率。事件时间戳会除以该值，
    /// 以保持与经过同一倍率变速的媒体轨道同步。
    pub speed: f64,
    /// 嵌入换行符的处理策略。
    pub line_break_policy: LineBreakPolicy,
}

impl Default for AssGenerationOptions {
    fn default() -> Self {
        Self {
            canvas_width: 1920,
            canvas_height: 1080,
            speed: 1.0,
            line_break_policy: LineBreakPolicy::default(),
        }
    }
}

/// 解析后的边框渲染参数。
struct ResolvedBorder {
    border_style: u8,
    outline_color: String,
    back_color: String,
    outline_width: f64,
    shadow_distance: f64,
}

/// ASS 文档生成的主入口函数。
///
/// # 参数
/// * `segments` - 按播放顺序排列的片段序列。
/// * `style` - 字幕样式。坏颜色在这里回退为白色而不会报错。
/// * `options` - 画布尺寸、播放速度与换行策略。
///
/// # Errors
///
/// 仅在向输出字符串写入格式化文本失败时返回 [`GenerateError`]；
/// 对于已通过校验的样式，本函数不会因输入值本身而失败。
pub fn generate_ass(
    segments: &[TimedSegment],
    style: &SubtitleStyle,
    options: &AssGenerationOptions,
) -> Result<String, GenerateError> {
    let mut output = String::with_capacity(segments.len() * 100 + 512);
    write_ass_header(&mut output, style, options)?;
    write_ass_events(&mut output, segments, style, options)?;
    Ok(output)
}

fn write_ass_header(
    output: &mut String,
    style: &SubtitleStyle,
    options: &AssGenerationOptions,
) -> Result<(), GenerateError> {
    let height = f64::from(options.canvas_height);
    let font_size = (height * style.font_size_percent / 100.0).round() as u32;
    let margin_v = (height * style.vertical_margin_percent / 100.0).round() as u32;
    let primary_color = web_color_to_ass(&style.text_color, style.text_alpha_percent);
    let border = resolve_border(style);

    let bold_flag = ass_flag(style.bold);
    let italic_flag = ass_flag(style.italic);
    let underline_flag = ass_flag(style.underline);
    let strike_flag = ass_flag(style.strikethrough);

    writeln!(output, "[Script Info]")?;
    writeln!(output, "ScriptType: v4.00+")?;
    writeln!(output, "PlayResX: {}", options.canvas_width)?;
    writeln!(output, "PlayResY: {}", options.canvas_height)?;
    writeln!(output, "[V4+ Styles]")?;
    writeln!(
        output,
        "Format: Name,Fontname,Fontsize,PrimaryColour,SecondaryColour,OutlineColour,BackColour,Bold,Italic,Underline,StrikeOut,ScaleX,ScaleY,Spacing,Angle,BorderStyle,Outline,Shadow,Alignment,MarginL,MarginR,MarginV,Encoding"
    )?;
    writeln!(
        output,
        "Style: DEF,{font},{font_size},{primary_color},{primary_color},{outline_color},{back_color},{bold_flag},{italic_flag},{underline_flag},{strike_flag},100,100,{spacing},0,{border_style},{outline_width},{shadow_distance},{alignment},10,10,{margin_v},1",
        font = style.font,
        outline_color = border.outline_color,
        back_color = border.back_color,
        spacing = style.character_spacing,
        border_style = border.border_style,
        outline_width = border.outline_width,
        shadow_distance = border.shadow_distance,
        alignment = style.alignment,
    )?;
    writeln!(output, "[Events]")?;
    writeln!(
        output,
        "Format: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text"
    )?;
    Ok(())
}

fn write_ass_events(
    output: &mut String,
    segments: &[TimedSegment],
    style: &SubtitleStyle,
    options: &AssGenerationOptions,
) -> Result<(), GenerateError> {
    if (options.speed - 1.0).abs() > f64::EPSILON {
        debug!("字幕时间戳将按播放速度 {}x 重新映射", options.speed);
    }
    for segment in segments {
        let text = layout_event_text(&segment.text, style.wrap_column, options.line_break_policy);
        let start = format_ass_time(segment.start / options.speed);
        let end = format_ass_time(segment.end / options.speed);
        writeln!(output, "Dialogue: 0,{start},{end},DEF,,0,0,0,,{text}")?;
    }
    Ok(())
}

/// 解析边框渲染参数，背景板的优先级高于描边/阴影。
///
/// 背景板启用时按背景板参数渲染：边框样式为 3（填充背景），
/// 背景板颜色写入 OutlineColour 槽位，
/// 且 `outline_width` 被重新解释为背景板的边框厚度，不受 `use_outline` 影响。
/// 阴影距离只由 `use_shadow` 决定，与背景板无关。
fn resolve_border(style: &SubtitleStyle) -> ResolvedBorder {
    let shadow_distance = if style.use_shadow {
        style.shadow_distance
    } else {
        0.0
    };
    if style.use_background_box {
        ResolvedBorder {
            border_style: 3,
            outline_color: web_color_to_ass(
                &style.background_color,
                style.background_alpha_percent,
            ),
            back_color: DEFAULT_BACK_COLOR.to_string(),
            outline_width: style.outline_width,
            shadow_distance,
        }
    } else {
        ResolvedBorder {
            border_style: 1,
            outline_color: web_color_to_ass(&style.outline_color, 100.0),
            back_color: if style.use_shadow {
                web_color_to_ass(&style.outline_color, 50.0)
            } else {
                DEFAULT_BACK_COLOR.to_string()
            },
            outline_width: if style.use_outline {
                style.outline_width
            } else {
                0.0
            },
            shadow_distance,
        }
    }
}

const fn ass_flag(enabled: bool) -> &'static str {
    if enabled { "-1" } else { "0" }
}

/// 按换行策略与自动折行列数排版单条事件文本。
fn layout_event_text(text: &str, wrap_column: u32, policy: LineBreakPolicy) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    match policy {
        LineBreakPolicy::Collapse => {
            let collapsed = normalized.trim().replace('\n', " ");
            wrap_text(&collapsed, wrap_column).join(ASS_LINE_BREAK)
        }
        LineBreakPolicy::Preserve => normalized
            .split('\n')
            .flat_map(|line| wrap_text(line, wrap_column))
            .collect::<Vec<_>>()
            .join(ASS_LINE_BREAK),
    }
}

/// 将文本贪心地折行为每行至多 `wrap_column` 个字符。
///
/// `wrap_column` 为 0 或文本长度未超过列数时原样返回单行。
/// 折行优先发生在空白处；超过列数的单个词会被按列数硬切，
/// 因此没有空白分词的 CJK 文本会按固定字符数分块。
fn wrap_text(text: &str, wrap_column: u32) -> Vec<String> {
    let limit = wrap_column as usize;
    if limit == 0 || text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > limit {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(limit) {
                if chunk.len() == limit {
                    lines.push(chunk.iter().collect());
                } else {
                    current = chunk.iter().collect();
                    current_len = chunk.len();
                }
            }
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len > limit {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(word);
            current_len += word_len + 1;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
