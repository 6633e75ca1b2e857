use crate::normalize::vocabulary::Vocabulary;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const MAX_SKILLS: usize = 15;
const KEYWORD_TOP_K: usize = 10;

fn term_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z][a-z0-9+#./\-]*").expect("term pattern"))
}

/// 关键词初筛：按词频取前 `top_k` 个技术词，同频按首次出现排序
pub fn extract_keywords(lowered: &str, top_k: usize) -> Vec<String> {
    let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, m) in term_re().find_iter(lowered).enumerate() {
        let term = m.as_str().trim_end_matches(['.', '/', '-']);
        if term.is_empty() {
            continue;
        }
        let entry = freq.entry(term).or_insert((0, order));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> =
        freq.into_iter().map(|(t, (n, first))| (t, n, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(top_k)
        .map(|(t, _, _)| t.to_string())
        .collect()
}

/// 从职位描述提取技能：关键词与技能表取交集，再用技能表对全文做子串补扫。
/// 结果去重、保留首次出现顺序，最多 `MAX_SKILLS` 个。
pub fn extract_skills(description: &str, vocab: &Vocabulary) -> Vec<String> {
    let lowered = description.to_lowercase();
    if lowered.trim().is_empty() {
        return Vec::new();
    }

    let mut skills: Vec<String> = Vec::new();
    for kw in extract_keywords(&lowered, KEYWORD_TOP_K) {
        if vocab.is_skill(&kw) && !skills.contains(&kw) {
            skills.push(kw);
        }
    }

    for skill in &vocab.skills {
        if lowered.contains(skill.as_str()) && !skills.contains(skill) {
            skills.push(skill.clone());
        }
    }

    skills.truncate(MAX_SKILLS);
    skills
}
