//! # 预设持久化模块
//!
//! 以 `(所有者作用域, 预设种类)` 两级命名空间保存、列出、加载和导入
//! 命名的字幕样式预设。
//!
//! 预设一经写入即不可变：保存遇到同名文件时会追加 `(1)`、`(2)`
//! 等后缀生成新的身份，永不覆盖已有文件。删除只能通过外部手段进行。
//! 保存和加载两个方向都要经过结构校验，
//! 手工编辑过的或陈旧的预设文件无法混入。

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{LazyLock, Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::PresetError,
    style::{
        config::{PresetKind, SubtitleStyle},
        validator,
    },
};

/// 作用域经清洗后为空时使用的默认作用域名。
const DEFAULT_SCOPE_NAME: &str = "default";
/// 预设名经清洗后为空时使用的默认文件基础名。
const DEFAULT_PRESET_NAME: &str = "preset";

static UNSAFE_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\-一-龠ぁ-んァ-ヶＡ-Ｚａ-ｚ０-９（）() ]+").expect("文件名清洗正则应当有效")
});

/// 已保存预设的身份标识。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPreset {
    /// 实际写入的文件名（含 `.json` 扩展名，可能带去重后缀）。
    pub file_name: String,
    /// 文件的完整路径。
    pub path: PathBuf,
}

/// 预设文件的持久化结构。
///
/// 磁盘布局：`{ "kind": ..., "name": ..., "created_at": ..., "settings": ... }`，
/// UTF-8 编码的格式化 JSON，每个预设一个文件。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetDocument {
    /// 预设种类。
    pub kind: PresetKind,
    /// 用户提供的预设名（未经文件名清洗的原始名）。
    pub name: String,
    /// 保存时刻 (UTC)。导入的文档允许缺失，保存时总会重新生成。
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// 样式设置本体，加载时重新校验后才反序列化。
    pub settings: Value,
}

/// 样式预设的文件存储。
///
/// 存储根目录在构造时显式注入，命名空间目录在首次写入时按需创建。
/// 同一实例上的并发保存是安全的：文件名探测在互斥锁内进行，
/// 最终以 `create_new` 原子地创建文件，
/// 两个并发保存不可能抢到同一个去重后的文件名。
#[derive(Debug)]
pub struct PresetStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl PresetStore {
    /// 创建一个以 `root` 为存储根目录的预设存储。
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 校验并保存一个命名预设。
    ///
    /// 校验失败时返回 [`PresetError::Validation`]，不会写入任何文件。
    /// 预设名会被清洗为文件系统安全的基础名，
    /// 冲突通过追加 `(1)`、`(2)` 后缀解决。
    ///
    /// # Errors
    ///
    /// 设置未通过校验、序列化失败或文件写入失败时返回错误。
    pub fn save(
        &self,
        scope: &str,
        kind: PresetKind,
        name: &str,
        settings: &SubtitleStyle,
    ) -> Result<SavedPreset, PresetError> {
        let raw = serde_json::to_value(settings)?;
        let report = validator::validate(&raw);
        if !report.is_valid() {
            return Err(PresetError::Validation(report.errors));
        }

        let document = PresetDocument {
            kind,
            name: name.to_string(),
            created_at: Some(Utc::now()),
            settings: raw,
        };
        let directory = self.namespace_dir(scope, kind);
        fs::create_dir_all(&directory)?;
        let base = sanitize_path_segment(name, DEFAULT_PRESET_NAME);
        let saved = self.write_unique(&directory, &base, &document)?;
        info!("预设已保存: {}", saved.path.display());
        Ok(saved)
    }

    /// 列出命名空间下所有预设文件名，按字典序排列。
    ///
    /// 命名空间尚无任何条目时返回空列表，而不是错误。
    ///
    /// # Errors
    ///
    /// 目录读取失败时返回 IO 错误。
    pub fn list(&self, scope: &str, kind: PresetKind) -> Result<Vec<String>, PresetError> {
        let directory = self.namespace_dir(scope, kind);
        if !directory.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&directory)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_file() && file_name.ends_with(".json") {
                names.push(file_name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// 从命名空间加载一个预设并返回其中的样式设置。
    ///
    /// # Errors
    ///
    /// - [`PresetError::NotFound`] - 文件不存在。
    /// - [`PresetError::KindMismatch`] - 文件内记录的种类与请求的不一致。
    /// - [`PresetError::Validation`] - 内嵌设置未通过重新校验。
    /// - [`PresetError::JsonParse`] - 文件不是合法的预设文档。
    pub fn load(
        &self,
        scope: &str,
        file_name: &str,
        kind: PresetKind,
    ) -> Result<SubtitleStyle, PresetError> {
        let path = self.namespace_dir(scope, kind).join(file_name);
        if !path.is_file() {
            return Err(PresetError::NotFound(file_name.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        let document: PresetDocument = serde_json::from_str(&content)
            .map_err(|e| PresetError::json_parse(e, format!("预设文件 {file_name}")))?;
        if document.kind != kind {
            return Err(PresetError::KindMismatch {
                expected: kind,
                found: document.kind,
            });
        }
        settings_from_value(document.settings)
    }

    /// 从外部提供的 JSON 文本导入预设。
    ///
    /// 内容必须符合持久化布局；顶层 `name` 键缺失或为空时使用
    /// `fallback_name`。导入成功后委托给 [`save`](Self::save)，
    /// 任何解析或校验失败都不会写入文件。
    ///
    /// # Errors
    ///
    /// 内容无法解析、缺少必需键、种类不匹配或设置未通过校验时返回错误。
    pub fn import_from_str(
        &self,
        content: &str,
        scope: &str,
        kind: PresetKind,
        fallback_name: &str,
    ) -> Result<SavedPreset, PresetError> {
        let payload: Value = serde_json::from_str(content)
            .map_err(|e| PresetError::json_parse(e, "导入的预设内容".to_string()))?;
        let Some(object) = payload.as_object() else {
            return Err(PresetError::MissingKeys("kind, settings".to_string()));
        };

        let missing: Vec<&str> = ["kind", "settings"]
            .iter()
            .filter(|key| !object.contains_key(**key))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(PresetError::MissingKeys(missing.join(", ")));
        }

        let found: PresetKind = serde_json::from_value(object["kind"].clone())
            .map_err(|e| PresetError::json_parse(e, "kind 字段".to_string()))?;
        if found != kind {
            return Err(PresetError::KindMismatch {
                expected: kind,
                found,
            });
        }

        let settings = settings_from_value(object["settings"].clone())?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback_name);
        debug!("导入预设 '{name}' 到 {scope}/{kind}");
        self.save(scope, kind, name, &settings)
    }

    fn namespace_dir(&self, scope: &str, kind: PresetKind) -> PathBuf {
        self.root
            .join(sanitize_path_segment(scope, DEFAULT_SCOPE_NAME))
            .join(kind.as_dir_name())
    }

    /// 在命名空间内寻找未被占用的文件名并原子地创建文件。
    fn write_unique(
        &self,
        directory: &Path,
        base: &str,
        document: &PresetDocument,
    ) -> Result<SavedPreset, PresetError> {
        let content = serde_json::to_string_pretty(document)?;
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut counter = 0usize;
        loop {
            let file_name = if counter == 0 {
                format!("{base}.json")
            } else {
                format!("{base}({counter}).json")
            };
            let path = directory.join(&file_name);
            match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())?;
                    file.write_all(b"\n")?;
                    return Ok(SavedPreset { file_name, path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(PresetError::Io(e)),
            }
        }
    }
}

/// 校验原始设置并严格反序列化为 [`SubtitleStyle`]。
fn settings_from_value(settings: Value) -> Result<SubtitleStyle, PresetError> {
    let report = validator::validate(&settings);
    if !report.is_valid() {
        return Err(PresetError::Validation(report.errors));
    }
    serde_json::from_value(settings)
        .map_err(|e| PresetError::json_parse(e, "样式设置".to_string()))
}

/// 将用户提供的名称清洗为文件系统安全的路径段。
///
/// 非单词、非 CJK 字符被替换为 `_`，再去除首尾的 `.`、`_` 和空格；
/// 清洗后为空时回退为 `fallback`。
fn sanitize_path_segment(name: &str, fallback: &str) -> String {
    let replaced = UNSAFE_NAME_CHARS.replace_all(name.trim(), "_");
    let trimmed = replaced.trim_matches(|c: char| matches!(c, '.' | '_' | ' '));
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
