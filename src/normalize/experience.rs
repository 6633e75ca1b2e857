use regex::Regex;
use std::sync::OnceLock;

/// 经验要求（年），未知的一端为 `None`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExperienceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ExperienceRange {
    fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unknown(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

struct Patterns {
    range: Regex,
    at_least: Regex,
    at_most: Regex,
}

fn patterns() -> &'static Patterns {
    static P: OnceLock<Patterns> = OnceLock::new();
    P.get_or_init(|| Patterns {
        range: Regex::new(r"(\d+)\s*[-~至]\s*(\d+)\s*年").expect("experience range pattern"),
        at_least: Regex::new(r"(\d+)\s*年以上").expect("experience lower bound pattern"),
        at_most: Regex::new(r"(\d+)\s*年以下").expect("experience upper bound pattern"),
    })
}

fn capture_years(re: &Regex, text: &str, group: usize) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(group))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// 解析经验要求，按 区间 > 下限 > 上限 > 特殊词 的顺序匹配
pub fn parse_experience(text: &str) -> ExperienceRange {
    let text = text.trim();
    if text.is_empty() {
        return ExperienceRange::default();
    }
    let p = patterns();

    if let Some(caps) = p.range.captures(text) {
        let min = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
        let max = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
        if min.is_some() && max.is_some() {
            return ExperienceRange::new(min, max);
        }
    }

    if let Some(min) = capture_years(&p.at_least, text, 1) {
        return ExperienceRange::new(Some(min), None);
    }

    if let Some(max) = capture_years(&p.at_most, text, 1) {
        return ExperienceRange::new(Some(0.0), Some(max));
    }

    if text.contains("应届") || text.contains("毕业生") {
        return ExperienceRange::new(Some(0.0), Some(1.0));
    }
    if text.contains("经验不限") || text.contains("不限经验") {
        return ExperienceRange::new(Some(0.0), None);
    }

    ExperienceRange::default()
}

/// 经验分段：(-0.1,0] 不限，(0,1] 0-1年，(1,3) 1-3年，[3,5) 3-5年，
/// [5,10) 5-10年，[10,100] 10年以上。
///
/// 前两段右闭，所以 0 落在"不限"、1 落在"0-1年"；之后按起始年份归段，
/// 要求 5 年的岗位归入"5-10年"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExperienceBand {
    Unlimited,
    UpToOne,
    OneToThree,
    ThreeToFive,
    FiveToTen,
    TenPlus,
}

impl ExperienceBand {
    pub const ALL: [ExperienceBand; 6] = [
        ExperienceBand::Unlimited,
        ExperienceBand::UpToOne,
        ExperienceBand::OneToThree,
        ExperienceBand::ThreeToFive,
        ExperienceBand::FiveToTen,
        ExperienceBand::TenPlus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExperienceBand::Unlimited => "不限",
            ExperienceBand::UpToOne => "0-1年",
            ExperienceBand::OneToThree => "1-3年",
            ExperienceBand::ThreeToFive => "3-5年",
            ExperienceBand::FiveToTen => "5-10年",
            ExperienceBand::TenPlus => "10年以上",
        }
    }

    /// 超出 (-0.1, 100] 或 NaN 时不属于任何分段
    pub fn from_years(years: f64) -> Option<ExperienceBand> {
        let band = match years {
            y if y > -0.1 && y <= 0.0 => ExperienceBand::Unlimited,
            y if y > 0.0 && y <= 1.0 => ExperienceBand::UpToOne,
            y if y > 1.0 && y < 3.0 => ExperienceBand::OneToThree,
            y if (3.0..5.0).contains(&y) => ExperienceBand::ThreeToFive,
            y if (5.0..10.0).contains(&y) => ExperienceBand::FiveToTen,
            y if (10.0..=100.0).contains(&y) => ExperienceBand::TenPlus,
            _ => return None,
        };
        Some(band)
    }
}
