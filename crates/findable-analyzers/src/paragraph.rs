//! Paragraph-length analysis. Paragraphs of up to 4 sentences / 100 words
//! are the most scannable and extractable unit for AI systems; longer ones
//! are penalized.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

const OPTIMAL_MAX_SENTENCES: usize = 4;
const OPTIMAL_MAX_WORDS: usize = 100;
const OPTIMAL_MIN_WORDS: usize = 20;

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CONTENT_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#content").unwrap());
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

static ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(Mr|Mrs|Ms|Dr|Prof|Inc|Ltd|Jr|Sr)\.").unwrap());
static NUMERIC_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)\.").unwrap());
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphInfo {
    pub word_count: usize,
    pub sentence_count: usize,
    pub is_optimal: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParagraphAnalysis {
    pub total_paragraphs: usize,
    pub optimal_paragraphs: usize,
    pub long_paragraphs: usize,
    pub short_paragraphs: usize,
    pub avg_sentence_count: f64,
    pub avg_word_count: f64,
    pub optimal_ratio: f64,
    pub score: f64,
    pub level: String,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn analyze_paragraphs(html: &str) -> ParagraphAnalysis {
    let doc = Html::parse_document(html);
    let mut result = ParagraphAnalysis::default();

    let main = doc
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| doc.select(&ARTICLE_SELECTOR).next())
        .or_else(|| doc.select(&CONTENT_ID_SELECTOR).next())
        .or_else(|| doc.select(&BODY_SELECTOR).next());

    let Some(main) = main else {
        result.level = "partial".to_string();
        result.issues.push("No content area found".to_string());
        return result;
    };

    let paragraphs: Vec<String> = main
        .select(&P_SELECTOR)
        .map(|p| p.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|t| t.len() >= 10)
        .collect();

    if paragraphs.is_empty() {
        result.level = "partial".to_string();
        result.issues.push("No paragraphs found in content".to_string());
        return result;
    }

    let mut total_sentences = 0usize;
    let mut total_words = 0usize;
    let mut infos = Vec::new();

    for text in &paragraphs {
        let info = analyze_one(text);
        total_sentences += info.sentence_count;
        total_words += info.word_count;
        if info.is_optimal {
            result.optimal_paragraphs += 1;
        } else if info.sentence_count > OPTIMAL_MAX_SENTENCES {
            result.long_paragraphs += 1;
        } else if info.sentence_count < 2 && info.word_count >= OPTIMAL_MIN_WORDS {
            result.short_paragraphs += 1;
        }
        infos.push(info);
    }

    result.total_paragraphs = paragraphs.len();
    result.avg_sentence_count = total_sentences as f64 / result.total_paragraphs as f64;
    result.avg_word_count = total_words as f64 / result.total_paragraphs as f64;
    result.optimal_ratio = result.optimal_paragraphs as f64 / result.total_paragraphs as f64;

    result.score = score(&result);
    result.level = if result.score >= 80.0 {
        "full".to_string()
    } else if result.score >= 50.0 {
        "partial".to_string()
    } else {
        "limited".to_string()
    };

    recommendations(&mut result);
    result
}

fn analyze_one(text: &str) -> ParagraphInfo {
    let word_count = text.split_whitespace().count();
    let sentence_count = count_sentences(text);
    let mut issues = Vec::new();
    let mut is_optimal = true;

    if sentence_count > OPTIMAL_MAX_SENTENCES {
        is_optimal = false;
        issues.push(format!(
            "Too long ({} sentences, max {})",
            sentence_count, OPTIMAL_MAX_SENTENCES
        ));
    }
    if word_count > OPTIMAL_MAX_WORDS {
        is_optimal = false;
        issues.push(format!("Too many words ({}, max {})", word_count, OPTIMAL_MAX_WORDS));
    }

    ParagraphInfo {
        word_count,
        sentence_count,
        is_optimal,
        issues,
    }
}

fn count_sentences(text: &str) -> usize {
    let guarded = ABBREVIATION.replace_all(text, "$1<PERIOD>");
    let guarded = NUMERIC_PERIOD.replace_all(&guarded, "$1<PERIOD>");
    let count = SENTENCE_SPLIT
        .split(&guarded)
        .filter(|s| !s.trim().is_empty())
        .count();
    count.max(1)
}

fn score(result: &ParagraphAnalysis) -> f64 {
    if result.total_paragraphs == 0 {
        return 50.0;
    }
    let mut score = 100.0;
    let long_ratio = result.long_paragraphs as f64 / result.total_paragraphs as f64;
    score -= long_ratio * 40.0;

    if result.avg_sentence_count > 5.0 {
        score -= ((result.avg_sentence_count - 5.0) * 5.0).min(20.0);
    } else if result.avg_sentence_count > 4.0 {
        score -= ((result.avg_sentence_count - 4.0) * 5.0).min(10.0);
    }
    score += result.optimal_ratio * 10.0;
    score.clamp(0.0, 100.0)
}

fn recommendations(result: &mut ParagraphAnalysis) {
    if result.long_paragraphs > 0 {
        let pct = result.long_paragraphs as f64 / result.total_paragraphs as f64 * 100.0;
        result.issues.push(format!(
            "{} paragraph(s) ({:.0}%) have more than {} sentences. Long paragraphs are harder for AI to extract.",
            result.long_paragraphs, pct, OPTIMAL_MAX_SENTENCES
        ));
        result.recommendations.push(format!(
            "Break long paragraphs into shorter ones (max {} sentences). Each paragraph should cover one main point.",
            OPTIMAL_MAX_SENTENCES
        ));
    }
    if result.avg_sentence_count > 4.0 {
        result.issues.push(format!(
            "Average paragraph length is {:.1} sentences. Optimal is 2-4 sentences for AI extraction.",
            result.avg_sentence_count
        ));
    }
    if result.avg_word_count > 100.0 {
        result.recommendations.push(format!(
            "Average paragraph has {:.0} words. Consider keeping paragraphs under 100 words for better scannability.",
            result.avg_word_count
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_paragraphs_score_high() {
        let html = "<html><body><main><p>This is short. It has two sentences.</p></main></body></html>";
        let r = analyze_paragraphs(html);
        assert_eq!(r.total_paragraphs, 1);
        assert!(r.score >= 80.0);
    }

    #[test]
    fn abbreviations_do_not_split_sentences() {
        let text = "Dr. Smith works at Acme Inc. He started in 2020.";
        assert_eq!(count_sentences(text), 2);
    }

    #[test]
    fn no_content_area_is_partial() {
        let r = analyze_paragraphs("<html></html>");
        assert_eq!(r.level, "partial");
    }
}
