use crate::insight::types::LlmAnalysis;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// 解析模型回复：优先按 JSON（允许 ```json 围栏或前后有说明文字），否则按分节文本提取
pub fn parse_analysis(text: &str) -> LlmAnalysis {
    match parse_json(text) {
        Some(analysis) => analysis,
        None => parse_sections(text),
    }
}

fn parse_json(text: &str) -> Option<LlmAnalysis> {
    let body = strip_fence(text.trim());
    let value: Value = serde_json::from_str(body).ok().or_else(|| {
        let start = body.find('{')?;
        let end = body.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str(&body[start..=end]).ok()
    })?;
    let obj = value.as_object()?;

    Some(LlmAnalysis {
        summary: obj
            .get("summary")
            .map(value_text)
            .unwrap_or_default(),
        insights: string_list(obj.get("insights")),
        recommendations: string_list(obj.get("recommendations")),
        timestamp: String::new(),
    })
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // 去掉语言标记所在的首行
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Summary,
    Insights,
    Recommendations,
}

fn section_header(line: &str) -> Option<Section> {
    const HEADERS: [(&[&str], Section); 3] = [
        (&["总体分析", "市场分析", "总结"], Section::Summary),
        (&["洞察", "发现", "趋势"], Section::Insights),
        (&["建议", "推荐", "策略"], Section::Recommendations),
    ];
    HEADERS
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| line.contains(k)))
        .map(|(_, s)| *s)
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[-*]|\d[.)、])").expect("list item pattern"))
}

fn list_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*0-9.)、\s]+").expect("list prefix pattern"))
}

/// 分节文本：含关键词的行切换小节（该行本身丢弃），列表项归入洞察或建议，
/// 总结小节里的普通行拼成 summary
pub fn parse_sections(text: &str) -> LlmAnalysis {
    let mut out = LlmAnalysis::default();
    let mut summary = Vec::new();
    let mut current = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(section) = section_header(line) {
            current = Some(section);
            continue;
        }
        if list_item_re().is_match(line) {
            let item = list_prefix_re().replace(line, "").to_string();
            match current {
                Some(Section::Insights) => out.insights.push(item),
                Some(Section::Recommendations) => out.recommendations.push(item),
                _ => {}
            }
            continue;
        }
        if current == Some(Section::Summary) {
            summary.push(line);
        }
    }

    out.summary = summary.join(" ");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let text = r#"{"summary": "市场活跃", "insights": ["Java 需求大"], "recommendations": ["多做项目", ""]}"#;
        let a = parse_analysis(text);
        assert_eq!(a.summary, "市场活跃");
        assert_eq!(a.insights, vec!["Java 需求大"]);
        assert_eq!(a.recommendations, vec!["多做项目"]);
    }

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"summary\": \"s\", \"insights\": [\"a\", \"b\"]}\n```";
        let a = parse_analysis(text);
        assert_eq!(a.summary, "s");
        assert_eq!(a.insights.len(), 2);
        assert!(a.recommendations.is_empty());
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let text = "好的，以下是分析：\n{\"summary\": \"总体平稳\"}\n希望有帮助";
        assert_eq!(parse_analysis(text).summary, "总体平稳");
    }

    #[test]
    fn falls_back_to_sections() {
        let text = "一、总体分析\n当前市场需求旺盛。\n薪资水平较高。\n\n二、关键洞察\n1. Java 岗位最多\n2) Python 增长快\n- 一线城市集中\n\n三、就业建议\n1、夯实基础\n* 参与开源\n";
        let a = parse_analysis(text);
        assert_eq!(a.summary, "当前市场需求旺盛。 薪资水平较高。");
        assert_eq!(a.insights, vec!["Java 岗位最多", "Python 增长快", "一线城市集中"]);
        assert_eq!(a.recommendations, vec!["夯实基础", "参与开源"]);
    }

    #[test]
    fn unstructured_text_yields_empty_analysis() {
        assert!(parse_analysis("抱歉，我无法回答").is_empty());
    }
}
