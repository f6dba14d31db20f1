//! 字幕样式的配置类型与结构校验。

pub mod config;
pub mod validator;
