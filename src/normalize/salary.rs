use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalaryUnit {
    #[serde(rename = "currency/month")]
    Monthly,
    /// 年薪按 12 个月折算
    #[serde(rename = "monthly-equivalent-from-annual")]
    AnnualizedMonthly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub unit: SalaryUnit,
}

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)[k千万]?\s*[-~至]\s*(\d+(?:\.\d+)?)[k千万]?")
            .expect("salary range pattern")
    })
}

/// 解析薪资文本，如 "15k-25k"、"15000-25000元"、"15-30万/年"。
///
/// 结果统一为 元/月；无法识别时返回 `None`。
pub fn parse_salary(text: &str) -> Option<SalaryRange> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let caps = range_re().captures(&text)?;
    let mut min: f64 = caps.get(1)?.as_str().parse().ok()?;
    let mut max: f64 = caps.get(2)?.as_str().parse().ok()?;

    // 单位按整段文本判断，而不是只看匹配到的区间
    let scale = if text.contains('k') || text.contains('千') {
        1000.0
    } else if text.contains('万') {
        10000.0
    } else {
        1.0
    };
    min *= scale;
    max *= scale;

    let mut unit = SalaryUnit::Monthly;
    if text.contains("/年") || text.contains("年薪") {
        min /= 12.0;
        max /= 12.0;
        unit = SalaryUnit::AnnualizedMonthly;
    }

    Some(SalaryRange { min, max, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thousands_shorthand() {
        let r = parse_salary("15k-25k").unwrap();
        assert_eq!(r.min, 15000.0);
        assert_eq!(r.max, 25000.0);
        assert_eq!(r.unit, SalaryUnit::Monthly);
    }

    #[test]
    fn converts_annual_wan_to_monthly() {
        let r = parse_salary("15-30万/年").unwrap();
        assert_eq!(r.min, 12500.0);
        assert_eq!(r.max, 25000.0);
        assert_eq!(r.unit, SalaryUnit::AnnualizedMonthly);
    }

    #[test]
    fn plain_yuan_and_alternate_separators() {
        let r = parse_salary("15000-25000元").unwrap();
        assert_eq!((r.min, r.max), (15000.0, 25000.0));

        let r = parse_salary("8千~1.2万").unwrap();
        // 含"千"时整体按千计
        assert_eq!((r.min, r.max), (8000.0, 1200.0));

        let r = parse_salary("年薪 24至36万").unwrap();
        assert_eq!((r.min, r.max), (20000.0, 30000.0));
        assert_eq!(r.unit, SalaryUnit::AnnualizedMonthly);
    }

    #[test]
    fn uppercase_and_spaces_are_tolerated() {
        let r = parse_salary("  20K - 30K ").unwrap();
        assert_eq!((r.min, r.max), (20000.0, 30000.0));
    }

    #[test]
    fn unparseable_is_unknown() {
        assert!(parse_salary("not a salary").is_none());
        assert!(parse_salary("面议").is_none());
        assert!(parse_salary("").is_none());
        assert!(parse_salary("20k").is_none());
    }

    #[test]
    fn unit_tags_serialize_as_documented() {
        let s = serde_json::to_string(&SalaryUnit::AnnualizedMonthly).unwrap();
        assert_eq!(s, "\"monthly-equivalent-from-annual\"");
    }
}
