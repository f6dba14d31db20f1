//! # 颜色转换模块
//!
//! 在网页风格的颜色表示（十六进制、`rgba(...)` 文本）
//! 与 ASS 的 `&HAABBGGRR` 打包编码之间转换。
//!
//! 颜色属于装饰性数据：解析失败一律回退为不透明白色，
//! 从不向调用方抛出错误。拒绝坏颜色是校验器的职责。

use std::sync::LazyLock;

use regex::Regex;

/// 一个简单的 sRGB 颜色值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// 红色分量。
    pub r: u8,
    /// 绿色分量。
    pub g: u8,
    /// 蓝色分量。
    pub b: u8,
}

impl Rgb {
    /// 不透明白色，所有解析失败时的后备颜色。
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };
}

static COLOR_COMPONENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.]+").expect("颜色分量正则应当有效"));

/// 解析网页风格的颜色表示。
///
/// 支持 `#RGB`、`#RRGGBB`（不区分大小写）以及 `rgb(...)` / `rgba(...)` 文本形式。
/// 任何解析失败都返回 [`Rgb::WHITE`]。
#[must_use]
pub fn parse_web_color(input: &str) -> Rgb {
    let trimmed = input.trim();
    if trimmed.to_ascii_lowercase().starts_with("rgb") {
        return parse_rgb_function(trimmed).unwrap_or(Rgb::WHITE);
    }
    parse_hex(trimmed).unwrap_or(Rgb::WHITE)
}

/// 将 RGB 颜色与不透明度 (0-100) 打包为 ASS 的 `&HAABBGGRR` 颜色编码。
///
/// ASS 的 alpha 约定与网页相反：`00` 为完全不透明，`FF` 为完全透明，
/// 因此存储的 alpha 字节为 `round((100 - opacity_percent) * 2.55)`，
/// 并被收缩到 0-255。通道顺序为 alpha、蓝、绿、红。
#[must_use]
pub fn to_ass_color(rgb: Rgb, opacity_percent: f64) -> String {
    let alpha = ((100.0 - opacity_percent) * 2.55).round().clamp(0.0, 255.0) as u8;
    format!("&H{alpha:02X}{:02X}{:02X}{:02X}", rgb.b, rgb.g, rgb.r)
}

/// 解析网页颜色并直接打包为 ASS 颜色编码。
#[must_use]
pub fn web_color_to_ass(input: &str, opacity_percent: f64) -> String {
    to_ass_color(parse_web_color(input), opacity_percent)
}

fn parse_rgb_function(input: &str) -> Option<Rgb> {
    let mut components = COLOR_COMPONENT_REGEX
        .find_iter(input)
        .filter_map(|m| m.as_str().parse::<f64>().ok());
    let r = components.next()?;
    let g = components.next()?;
    let b = components.next()?;
    Some(Rgb {
        r: clamp_component(r),
        g: clamp_component(g),
        b: clamp_component(b),
    })
}

fn parse_hex(input: &str) -> Option<Rgb> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    // #RGB 短形式按位翻倍展开为六位
    let expanded: String = if digits.chars().count() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    if expanded.len() != 6 || !expanded.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(Rgb {
        r: u8::from_str_radix(&expanded[0..2], 16).ok()?,
        g: u8::from_str_radix(&expanded[2..4], 16).ok()?,
        b: u8::from_str_radix(&expanded[4..6], 16).ok()?,
    })
}

fn clamp_component(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
