use std::{fmt, io};

use thiserror::Error;

use crate::style::config::PresetKind;

/// 定义字幕文档生成过程中可能发生的错误。
///
/// 对于已通过校验的样式，生成器是全函数；
/// 唯一的失败来源是向输出字符串写入格式化文本。
#[derive(Error, Debug)]
pub enum GenerateError {
    /// 字符串格式化错误。
    #[error("格式错误: {0}")]
    Format(#[from] fmt::Error),
}

/// 定义预设持久化过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum PresetError {
    /// 文件读写等IO错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
    /// JSON 序列化错误。
    #[error("序列化 JSON 失败: {0}")]
    Serialize(#[from] serde_json::Error),
    /// JSON 解析错误。`serde_json` 的错误信息自带行列号。
    #[error("解析 JSON 内容 {context} 失败: {source}")]
    JsonParse {
        /// 底层 `serde_json` 错误
        #[source]
        source: serde_json::Error,
        /// 有关错误发生位置的上下文信息。
        context: String,
    },
    /// 预设文档缺少必需的顶层键。
    #[error("预设文件缺少必需的键: {0}")]
    MissingKeys(String),
    /// 引用的预设文件不存在。
    #[error("找不到预设文件: {0}")]
    NotFound(String),
    /// 文件内记录的预设种类与请求的命名空间不一致。
    #[error("预设种类不匹配: 期望 {expected}，实际为 {found}")]
    KindMismatch {
        /// 请求的种类。
        expected: PresetKind,
        /// 文件内实际记录的种类。
        found: PresetKind,
    },
    /// 样式设置未通过结构校验。完整的违规列表按字段声明顺序排列。
    #[error("样式设置未通过校验:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}

impl PresetError {
    /// 创建一个带有上下文的 `JsonParse` 错误。
    #[must_use]
    pub fn json_parse(source: serde_json::Error, context: String) -> Self {
        Self::JsonParse { source, context }
    }
}
