//! # ASS 时间码格式化模块

/// 将秒数格式化为 ASS 标准的 `H:MM:SS.CC` 时间字符串。
///
/// 小时不补零，分钟和秒补足两位。
/// 厘秒部分使用截断而不是四舍五入，
/// 以保证与外部渲染器消费的参考输出逐字节一致。
/// 例如：3661.25s -> "1:01:01.25"
#[must_use]
pub fn format_ass_time(seconds: f64) -> String {
    let clamped = seconds.max(0.0);
    let whole = clamped as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let centis = ((clamped - whole as f64) * 100.0) as u64;
    format!("{hours}:{minutes:02}:{secs:02}.{centis:02}")
}
