use crate::normalize::vocabulary::Vocabulary;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 学历档位，按 `tier()` 从高到低：博士 > 硕士 > 本科 > 大专 > 中专 > 高中 > 初中 > 小学 > 不限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EducationLevel {
    Doctorate,
    Master,
    Bachelor,
    Associate,
    Vocational,
    HighSchool,
    MiddleSchool,
    PrimarySchool,
    Unlimited,
    Unknown,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 10] = [
        EducationLevel::Doctorate,
        EducationLevel::Master,
        EducationLevel::Bachelor,
        EducationLevel::Associate,
        EducationLevel::Vocational,
        EducationLevel::HighSchool,
        EducationLevel::MiddleSchool,
        EducationLevel::PrimarySchool,
        EducationLevel::Unlimited,
        EducationLevel::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EducationLevel::Doctorate => "博士",
            EducationLevel::Master => "硕士",
            EducationLevel::Bachelor => "本科",
            EducationLevel::Associate => "大专",
            EducationLevel::Vocational => "中专",
            EducationLevel::HighSchool => "高中",
            EducationLevel::MiddleSchool => "初中",
            EducationLevel::PrimarySchool => "小学",
            EducationLevel::Unlimited => "不限",
            EducationLevel::Unknown => "未知",
        }
    }

    pub fn from_label(label: &str) -> Option<EducationLevel> {
        Self::ALL.iter().copied().find(|l| l.as_str() == label)
    }

    /// 数值越大学历越高；未知为 0
    pub fn tier(self) -> u8 {
        match self {
            EducationLevel::Doctorate => 9,
            EducationLevel::Master => 8,
            EducationLevel::Bachelor => 7,
            EducationLevel::Associate => 6,
            EducationLevel::Vocational => 5,
            EducationLevel::HighSchool => 4,
            EducationLevel::MiddleSchool => 3,
            EducationLevel::PrimarySchool => 2,
            EducationLevel::Unlimited => 1,
            EducationLevel::Unknown => 0,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EducationLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EducationLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EducationLevel::from_label(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown education level: {s}")))
    }
}

/// 学历归一：小写去空格后按规则表顺序做子串匹配，先命中者为准，无命中为"未知"
pub fn normalize_education(text: &str, vocab: &Vocabulary) -> EducationLevel {
    let edu = text.trim().to_lowercase();
    if edu.is_empty() {
        return EducationLevel::Unknown;
    }
    vocab
        .education_rules
        .iter()
        .find(|rule| edu.contains(rule.key.as_str()))
        .map(|rule| rule.level)
        .unwrap_or(EducationLevel::Unknown)
}
