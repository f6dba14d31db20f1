//! # 样式设置校验器
//!
//! 按固定声明顺序的字段模式对原始样式值做结构校验，
//! 一次性收集所有字段级违规并以人类可读的消息列表返回。
//!
//! 与生成侧的颜色解析不同，这里对颜色字段是严格校验：
//! 生成器遇到坏颜色会回退为白色，而校验器会将其作为违规上报，
//! 两者是互不重叠的两层防线。

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::style::config::AVAILABLE_FONTS;

static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("颜色正则应当有效"));

/// 单个字段的校验方式。
enum FieldCheck {
    /// 数值字段，闭区间范围检查。
    Number { min: f64, max: f64 },
    /// 整数字段，闭区间范围检查。
    Integer { min: i64, max: i64 },
    /// 布尔字段。
    Bool,
    /// 颜色字段，只要求可解析性，不做范围检查。
    Color,
    /// 字体字段，检查允许列表成员资格。
    FontChoice,
    /// 对齐码字段，检查 1-9 成员资格。
    AlignmentChoice,
}

/// 一条字段校验规则。
struct FieldRule {
    name: &'static str,
    check: FieldCheck,
}

/// 按声明顺序排列的样式字段模式。
///
/// 顺序即报告顺序，必须与 [`SubtitleStyle`](crate::style::config::SubtitleStyle)
/// 的序列化字段保持一致。
const STYLE_SCHEMA: &[FieldRule] = &[
    FieldRule {
        name: "font",
        check: FieldCheck::FontChoice,
    },
    FieldRule {
        name: "font_size_percent",
        check: FieldCheck::Number {
            min: 1.0,
            max: 20.0,
        },
    },
    FieldRule {
        name: "text_color",
        check: FieldCheck::Color,
    },
    FieldRule {
        name: "text_alpha_percent",
        check: FieldCheck::Number {
            min: 0.0,
            max: 100.0,
        },
    },
    FieldRule {
        name: "bold",
        check: FieldCheck::Bool,
    },
    FieldRule {
        name: "italic",
        check: FieldCheck::Bool,
    },
    FieldRule {
        name: "underline",
        check: FieldCheck::Bool,
    },
    FieldRule {
        name: "strikethrough",
        check: FieldCheck::Bool,
    },
    FieldRule {
        name: "alignment",
        check: FieldCheck::AlignmentChoice,
    },
    FieldRule {
        name: "vertical_margin_percent",
        check: FieldCheck::Number {
            min: 0.0,
            max: 50.0,
        },
    },
    FieldRule {
        name: "wrap_column",
        check: FieldCheck::Integer { min: 0, max: 50 },
    },
    FieldRule {
        name: "character_spacing",
        check: FieldCheck::Number {
            min: 0.0,
            max: 10.0,
        },
    },
    FieldRule {
        name: "speed",
        check: FieldCheck::Number { min: 0.5, max: 2.0 },
    },
    FieldRule {
        name: "use_outline",
        check: FieldCheck::Bool,
    },
    FieldRule {
        name: "outline_width",
        check: FieldCheck::Number {
            min: 0.0,
            max: 10.0,
        },
    },
    FieldRule {
        name: "use_shadow",
        check: FieldCheck::Bool,
    },
    FieldRule {
        name: "shadow_distance",
        check: FieldCheck::Number {
            min: 0.0,
            max: 10.0,
        },
    },
    FieldRule {
        name: "outline_color",
        check: FieldCheck::Color,
    },
    FieldRule {
        name: "use_background_box",
        check: FieldCheck::Bool,
    },
    FieldRule {
        name: "background_color",
        check: FieldCheck::Color,
    },
    FieldRule {
        name: "background_alpha_percent",
        check: FieldCheck::Number {
            min: 0.0,
            max: 100.0,
        },
    },
];

/// 校验结果。`errors` 为空即通过。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// 按字段声明顺序排列的违规消息列表。
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// 是否没有任何违规。
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 校验一个原始样式值。
///
/// 对每个声明字段依次检查：存在性、类型、
/// 颜色可解析性（颜色字段豁免范围检查）、允许值成员资格、闭区间范围。
/// 单个字段内的检查短路，但字段之间不短路，调用方能一次看到全部问题。
/// 非映射输入立即返回单条通用错误。本函数不会 panic。
#[must_use]
pub fn validate(raw: &Value) -> ValidationReport {
    let Some(map) = raw.as_object() else {
        return ValidationReport {
            errors: vec!["样式设置必须是一个映射对象。".to_string()],
        };
    };

    let mut errors = Vec::new();
    for rule in STYLE_SCHEMA {
        let Some(value) = map.get(rule.name) else {
            errors.push(format!("缺少必需的样式字段 '{}'。", rule.name));
            continue;
        };
        match rule.check {
            FieldCheck::Bool => {
                if !value.is_boolean() {
                    errors.push(format!("'{}' 必须是布尔值。", rule.name));
                }
            }
            FieldCheck::Number { min, max } => match value.as_f64() {
                None => errors.push(format!("'{}' 必须是数值。", rule.name)),
                Some(v) if v < min || v > max => errors.push(format!(
                    "'{}' 必须介于 {min} 和 {max} 之间。(实际为 {v})",
                    rule.name
                )),
                Some(_) => {}
            },
            FieldCheck::Integer { min, max } => match value.as_i64() {
                None => errors.push(format!("'{}' 必须是整数。", rule.name)),
                Some(v) if v < min || v > max => errors.push(format!(
                    "'{}' 必须介于 {min} 和 {max} 之间。(实际为 {v})",
                    rule.name
                )),
                Some(_) => {}
            },
            FieldCheck::Color => match value.as_str() {
                None => errors.push(format!("'{}' 必须是字符串。", rule.name)),
                Some(s) if !is_valid_color(s) => {
                    errors.push(format!("'{}' 的颜色格式不正确。", rule.name));
                }
                Some(_) => {}
            },
            FieldCheck::FontChoice => match value.as_str() {
                None => errors.push(format!("'{}' 必须是字符串。", rule.name)),
                Some(s) if !AVAILABLE_FONTS.contains(&s) => {
                    errors.push(format!("'{}' 的取值不被允许。", rule.name));
                }
                Some(_) => {}
            },
            FieldCheck::AlignmentChoice => match value.as_i64() {
                None => errors.push(format!("'{}' 必须是整数。", rule.name)),
                Some(v) if !(1..=9).contains(&v) => {
                    errors.push(format!("'{}' 的取值不被允许。", rule.name));
                }
                Some(_) => {}
            },
        }
    }
    ValidationReport { errors }
}

/// 颜色字段的严格判定：六位十六进制或 `rgb`/`rgba` 前缀。
fn is_valid_color(value: &str) -> bool {
    let trimmed = value.trim();
    if HEX_COLOR_REGEX.is_match(trimmed) {
        return true;
    }
    let lower = trimmed.to_ascii_lowercase();
    lower.starts_with("rgba") || lower.starts_with("rgb")
}
