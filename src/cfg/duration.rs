use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub use serde_with::{serde_as, DeserializeAs, SerializeAs};

/// Duration 的人性化格式
///
/// 支持格式: "3s", "100ms", "2m", "72h", "1h30m45s", "2d"
pub struct HumanDur;

impl SerializeAs<Duration> for HumanDur {
    fn serialize_as<S>(source: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*source))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumanDur {
    fn deserialize_as<D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// 解析时间字符串: "1h30m45s" -> Duration
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(anyhow!("empty duration"));
    }

    let mut total = Duration::ZERO;
    let mut rest = s.as_str();

    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (num_str, tail) = rest.split_at(num_end);
        if num_str.is_empty() {
            return Err(anyhow!("expected number in duration: {}", s));
        }
        let value: f64 = num_str
            .parse()
            .map_err(|_| anyhow!("invalid number in duration: {}", num_str))?;

        let unit_end = tail
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let part = match unit {
            "ns" => nanos(value, 1.0),
            "us" | "µs" | "μs" => nanos(value, 1_000.0),
            "ms" => nanos(value, 1_000_000.0),
            "s" => secs(value, 1.0),
            "m" => secs(value, 60.0),
            "h" => secs(value, 3_600.0),
            "d" => secs(value, 86_400.0),
            "" => return Err(anyhow!("missing unit in duration: {}", s)),
            _ => return Err(anyhow!("unsupported duration unit: {}", unit)),
        }
        .ok_or_else(|| anyhow!("duration out of range: {}", s))?;

        total = total
            .checked_add(part)
            .ok_or_else(|| anyhow!("duration out of range: {}", s))?;
        rest = tail;
    }

    Ok(total)
}

fn nanos(value: f64, scale: f64) -> Option<Duration> {
    let n = value * scale;
    (n.is_finite() && n >= 0.0 && n < u64::MAX as f64).then(|| Duration::from_nanos(n as u64))
}

fn secs(value: f64, scale: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value * scale).ok()
}

/// Duration 格式化为字符串: Duration -> "1h30m45s"
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let nanos = duration.subsec_nanos();

    if total_secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            n if n % 1_000_000 == 0 => format!("{}ms", n / 1_000_000),
            n if n % 1_000 == 0 => format!("{}us", n / 1_000),
            n => format!("{}ns", n),
        };
    }

    let mut out = String::new();
    let mut remaining = total_secs;

    for (unit, secs) in [("d", 86_400), ("h", 3_600), ("m", 60)] {
        if remaining >= secs {
            out.push_str(&format!("{}{}", remaining / secs, unit));
            remaining %= secs;
        }
    }

    if nanos > 0 {
        out.push_str(&format!("{}ms", remaining * 1_000 + u64::from(nanos) / 1_000_000));
    } else if remaining > 0 {
        out.push_str(&format!("{}s", remaining));
    }

    out
}
