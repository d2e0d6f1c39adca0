//! Keyword and extractive text assistance.

/// Texts up to this many words are returned as their own summary
const SHORT_TEXT_WORDS: usize = 30;
/// Summaries of texts longer than this get a trailing ellipsis
const LONG_TEXT_WORDS: usize = 100;
const MAX_SUMMARY_SENTENCES: usize = 4;
const MAX_TAGS: usize = 5;

const TAG_KEYWORDS: &[(&str, &[&str])] = &[
    ("work", &["work", "meeting", "project", "office", "task"]),
    ("personal", &["personal", "private", "family", "friend"]),
    ("shopping", &["shopping", "buy", "list", "market"]),
    ("important", &["important", "urgent", "attention", "remind"]),
];

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("work", &["work", "meeting", "project", "task"]),
    ("shopping", &["shopping", "buy", "list", "market"]),
    ("personal", &["personal", "private", "family"]),
];

const FALLBACK_LABEL: &str = "general";

/// Extractive summary: the longest sentences in their original order.
pub fn summarize(text: &str) -> String {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect();
    let word_count = text.split_whitespace().count();

    if word_count <= SHORT_TEXT_WORDS || sentences.len() <= 2 {
        return text.to_string();
    }

    let mut by_length = sentences.clone();
    by_length.sort_by_key(|sentence| std::cmp::Reverse(sentence.chars().count()));
    by_length.truncate(MAX_SUMMARY_SENTENCES);

    let mut picked: Vec<&str> = Vec::new();
    for &sentence in &sentences {
        if by_length.contains(&sentence) && !picked.contains(&sentence) {
            picked.push(sentence);
        }
    }
    if picked.len() < 2 {
        picked = sentences
            .first()
            .into_iter()
            .chain(sentences.last())
            .copied()
            .collect();
    }

    let mut summary = picked
        .into_iter()
        .take(MAX_SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(". ");
    if word_count > LONG_TEXT_WORDS {
        summary.push_str("...");
    }
    summary
}

/// Category tags whose keywords appear in the text, or `general`.
pub fn generate_tags(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    let mut tags: Vec<String> = TAG_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(tag, _)| (*tag).to_string())
        .take(MAX_TAGS)
        .collect();
    if tags.is_empty() {
        tags.push(FALLBACK_LABEL.to_string());
    }
    tags
}

/// First matching category in priority order, or `general`.
pub fn classify(text: &str) -> &'static str {
    let text = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map_or(FALLBACK_LABEL, |(category, _)| *category)
}
