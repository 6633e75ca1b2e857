use crate::normalize::vocabulary::Vocabulary;

/// 职位归一。
///
/// 小写去空格后按规则表顺序匹配；没有命中时原样返回输入（不是"未知"），
/// 与学历归一的兜底行为不同，这是有意保留的。
pub fn normalize_position(text: &str, vocab: &Vocabulary) -> String {
    let lowered = text.trim().to_lowercase();
    match vocab.canonical_position(&lowered) {
        Some(label) => label.to_string(),
        None => text.to_string(),
    }
}
