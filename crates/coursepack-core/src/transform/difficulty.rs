//! Two-threshold difficulty heuristic and keyword extraction for the
//! translation modes. Deliberately crude: word count and average word
//! length only, not a learned model.

use crate::model::Difficulty;

const EASY_MAX_WORDS: usize = 8;
const HARD_MIN_WORDS: usize = 16;
const EASY_MAX_AVG_LEN: f64 = 4.5;
const HARD_MIN_AVG_LEN: f64 = 6.0;

pub fn classify(sentence: &str) -> Difficulty {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    if words.is_empty() {
        return Difficulty::Easy;
    }
    let avg_len = words
        .iter()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).count())
        .sum::<usize>() as f64
        / words.len() as f64;

    if words.len() > HARD_MIN_WORDS || avg_len > HARD_MIN_AVG_LEN {
        Difficulty::Hard
    } else if words.len() <= EASY_MAX_WORDS && avg_len <= EASY_MAX_AVG_LEN {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "had", "has", "have",
    "he", "her", "his", "i", "in", "is", "it", "its", "my", "not", "of", "on", "or", "she",
    "that", "the", "their", "them", "they", "this", "to", "was", "we", "were", "will", "with",
    "you", "your",
];

/// Content words of `sentence`, lowercased and deduplicated in order of
/// first appearance, capped at five.
pub fn keywords(sentence: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in sentence.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if word.len() < 3 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        if !out.contains(&word) {
            out.push(word);
        }
        if out.len() == 5 {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_plain_sentence_is_easy() {
        assert_eq!(classify("I like tea."), Difficulty::Easy);
    }

    #[test]
    fn long_sentence_is_hard() {
        let long = "The committee unanimously recommended postponing the infrastructure \
                    modernization initiative until preliminary environmental assessments \
                    conclusively demonstrated negligible ecological impact overall";
        assert_eq!(classify(long), Difficulty::Hard);
    }

    #[test]
    fn keywords_skip_stopwords_and_dedupe() {
        let kws = keywords("I hated English in middle school, and English again.");
        assert_eq!(kws, vec!["hated", "english", "middle", "school", "again"]);
    }
}
