pub const UNKNOWN_CITY: &str = "未知";

// 分隔符优先级，"市" 放最后兜底
const SEPARATORS: [char; 5] = ['-', '，', ',', ' ', '市'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub district: String,
}

impl Location {
    fn new(city: &str, district: &str) -> Self {
        Self {
            city: strip_city_suffix(city).to_string(),
            district: district.to_string(),
        }
    }
}

fn strip_city_suffix(city: &str) -> &str {
    city.strip_suffix('市').unwrap_or(city)
}

/// 解析工作地点，如 "北京"、"上海-浦东新区"、"广州市天河区"
pub fn parse_location(text: &str) -> Location {
    let location = text.trim();
    if location.is_empty() {
        return Location {
            city: UNKNOWN_CITY.to_string(),
            district: String::new(),
        };
    }

    for sep in SEPARATORS {
        if let Some((city, district)) = location.split_once(sep) {
            return Location::new(city, district);
        }
    }
    Location::new(location, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(city: &str, district: &str) -> Location {
        Location {
            city: city.to_string(),
            district: district.to_string(),
        }
    }

    #[test]
    fn dash_separated() {
        assert_eq!(parse_location("上海-浦东新区"), loc("上海", "浦东新区"));
    }

    #[test]
    fn city_suffix_as_separator() {
        assert_eq!(parse_location("广州市天河区"), loc("广州", "天河区"));
        assert_eq!(parse_location("北京市"), loc("北京", ""));
    }

    #[test]
    fn separator_priority() {
        assert_eq!(parse_location("深圳市-南山区"), loc("深圳", "南山区"));
        assert_eq!(parse_location("杭州，西湖区"), loc("杭州", "西湖区"));
        assert_eq!(parse_location("成都 高新区"), loc("成都", "高新区"));
        // "-" 优先于逗号，哪怕逗号出现得更早
        assert_eq!(parse_location("武汉,洪山区-光谷"), loc("武汉,洪山区", "光谷"));
    }

    #[test]
    fn whole_string_is_city() {
        assert_eq!(parse_location("北京"), loc("北京", ""));
        assert_eq!(parse_location("  南京 "), loc("南京", ""));
    }

    #[test]
    fn empty_is_unknown() {
        assert_eq!(parse_location(""), loc("未知", ""));
        assert_eq!(parse_location("   "), loc("未知", ""));
        assert_eq!(parse_location("未知"), loc("未知", ""));
    }
}
