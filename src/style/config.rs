use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

/// 可用字体的固定允许列表。
///
/// 与渲染环境中实际安装的 CJK 字体保持一致，校验器只接受其中的成员。
pub const AVAILABLE_FONTS: &[&str] = &[
    "Noto Sans CJK JP",
    "Noto Serif CJK JP",
    "IPAGothic",
    "IPAMincho",
];

/// 枚举：表示预设的种类。
///
/// 播客视频合成与视频字幕烧录两种模式共用同一套样式与预设逻辑，
/// 仅以此标签区分各自的存储命名空间。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
    Default,
)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    /// 播客视频合成模式。
    #[default]
    Podcast,
    /// 视频字幕烧录模式。
    Subtitler,
}

impl PresetKind {
    /// 返回用作存储目录名的字符串。
    #[must_use]
    pub const fn as_dir_name(self) -> &'static str {
        match self {
            PresetKind::Podcast => "podcast",
            PresetKind::Subtitler => "subtitler",
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_dir_name())
    }
}

/// 一条字幕样式的完整描述。
///
/// 所有百分比字段均相对于画布高度解析。
/// 该结构本身不做约束检查，
/// 入库前由 [`validate`](crate::style::validator::validate) 负责结构校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleStyle {
    /// 字体名，必须是 [`AVAILABLE_FONTS`] 的成员。
    pub font: String,
    /// 字号，画布高度的百分比 (1-20)。
    pub font_size_percent: f64,
    /// 文字颜色，`#RRGGBB` 或 `rgba(r,g,b,a)` 形式。
    pub text_color: String,
    /// 文字不透明度 (0-100)。
    pub text_alpha_percent: f64,
    /// 粗体。
    pub bold: bool,
    /// 斜体。
    pub italic: bool,
    /// 下划线。
    pub underline: bool,
    /// 删除线。
    pub strikethrough: bool,
    /// 九宫格式对齐码 (1-9)，布局与数字小键盘一致。
    pub alignment: u8,
    /// 垂直边距，画布高度的百分比 (0-50)。
    pub vertical_margin_percent: f64,
    /// 自动折行列数 (0-50)，0 表示关闭自动折行。
    pub wrap_column: u32,
    /// 字符间距 (0-10)。
    pub character_spacing: f64,
    /// 播放速度倍率 (0.5-2.0)。
    pub speed: f64,
    /// 是否启用描边。
    pub use_outline: bool,
    /// 描边宽度 (0-10)。背景板启用时被重新解释为背景板的边框厚度。
    pub outline_width: f64,
    /// 是否启用阴影。
    pub use_shadow: bool,
    /// 阴影距离 (0-10)。
    pub shadow_distance: f64,
    /// 描边/阴影颜色。
    pub outline_color: String,
    /// 是否启用背景板。启用时优先于描边/阴影。
    pub use_background_box: bool,
    /// 背景板颜色。
    pub background_color: String,
    /// 背景板不透明度 (0-100)。
    pub background_alpha_percent: f64,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font: "Noto Sans CJK JP".to_string(),
            font_size_percent: 7.0,
            text_color: "#FFFFFF".to_string(),
            text_alpha_percent: 100.0,
            bold: true,
            italic: false,
            underline: false,
            strikethrough: false,
            alignment: 2,
            vertical_margin_percent: 15.0,
            wrap_column: 20,
            character_spacing: 0.0,
            speed: 1.0,
            use_outline: true,
            outline_width: 1.5,
            use_shadow: false,
            shadow_distance: 1.0,
            outline_color: "#404040".to_string(),
            use_background_box: false,
            background_color: "#000000".to_string(),
            background_alpha_percent: 50.0,
        }
    }
}
