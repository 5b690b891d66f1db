//! TTL 字符串解析
//!
//! 支持形如 `90s`、`1m`、`2h`、`1.5d`、`1 week` 的写法，
//! 不带单位的数字按毫秒处理。结果必须不少于 `MIN_TTL`。

use std::time::Duration;

use crate::error::{HidrError, Result};

/// 后端接受的最短 TTL
pub const MIN_TTL: Duration = Duration::from_secs(60);

const SECOND: f64 = 1000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

/// 解析 TTL 字符串
///
/// # 错误
/// - 无法识别的格式返回 InvalidInput
/// - 小于 1 分钟返回 InvalidInput
pub fn parse_ttl(input: &str) -> Result<Duration> {
    let ttl = parse_millis(input)
        .and_then(|millis| Duration::try_from_secs_f64(millis / 1000.0).ok())
        .ok_or_else(|| {
            HidrError::invalid_input(
                "Invalid TTL. Please provide a valid time duration (e.g. 1m, 2h, 1d)",
            )
        })?;

    if ttl < MIN_TTL {
        return Err(HidrError::invalid_input(
            "Invalid TTL. TTL must be at least 1 minute",
        ));
    }

    Ok(ttl)
}

fn parse_millis(input: &str) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() || s.len() > 100 {
        return None;
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    if number.ends_with('.') {
        return None;
    }

    let value: f64 = number.parse().ok()?;
    let scale = unit_scale(&unit.trim_start_matches(' ').to_ascii_lowercase())?;

    Some(value * scale)
}

fn unit_scale(unit: &str) -> Option<f64> {
    let scale = match unit {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "week" | "weeks" => WEEK,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR,
        _ => return None,
    };
    Some(scale)
}
