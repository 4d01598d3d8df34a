//! Structure: the composite analyzer combining heading hierarchy, the
//! answer-first/AI-answer-block opening, readability, FAQ presence, link
//! quality and content formats into one weighted score.
//!
//! Sub-weights are fixed and sum to 1.0: headings 0.20, answer-first 0.15,
//! AI-answer-block 0.15, readability 0.15, FAQ 0.15, links 0.10, formats
//! 0.10.

use crate::heading::{analyze_headings, HeadingAnalysis};
use crate::links::{analyze_links, LinkAnalysis};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

const WEIGHT_HEADINGS: f64 = 0.20;
const WEIGHT_ANSWER_FIRST: f64 = 0.15;
const WEIGHT_AI_ANSWER_BLOCK: f64 = 0.15;
const WEIGHT_READABILITY: f64 = 0.15;
const WEIGHT_FAQ: f64 = 0.15;
const WEIGHT_LINKS: f64 = 0.10;
const WEIGHT_FORMATS: f64 = 0.10;

const ANSWER_BLOCK_MIN_WORDS: usize = 40;
const ANSWER_BLOCK_MAX_WORDS: usize = 80;

const READABLE_MIN_SENTENCE_WORDS: f64 = 15.0;
const READABLE_MAX_SENTENCE_WORDS: f64 = 22.0;
const READABLE_MAX_PARAGRAPH_WORDS: usize = 150;

const GENERIC_OPENERS: &[&str] = &[
    "welcome to",
    "in this article",
    "in this post",
    "in this guide",
    "this page",
    "this article",
];

const DEFINITION_PATTERNS: &[&str] =
    &[" is a ", " is an ", " are a ", " refers to ", " means ", " is the ", " is defined as "];

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CONTENT_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#content").unwrap());
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static FORMAT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul, ol, table, pre, code, dl").unwrap());
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(Mr|Mrs|Ms|Dr|Prof|Inc|Ltd|Jr|Sr)\.").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubScore {
    pub score: f64,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub headings: SubScore,
    pub answer_first: SubScore,
    pub ai_answer_block: SubScore,
    pub readability: SubScore,
    pub faq: SubScore,
    pub links: SubScore,
    pub formats: SubScore,
    pub score: f64,
    pub level: String,
    pub issues: Vec<String>,
}

pub fn analyze_structure(html: &str, page_url: &str, heading_analysis: &HeadingAnalysis) -> StructureAnalysis {
    let doc = Html::parse_document(html);
    let main_text = main_content_text(&doc);
    let word_count = main_text.split_whitespace().count();

    let headings = SubScore {
        score: heading_analysis.score,
        issues: Vec::new(),
    };

    let opening = first_substantive_paragraph(&doc);
    let answer_first = score_answer_first(opening.as_deref());
    let ai_answer_block = score_ai_answer_block(opening.as_deref(), heading_analysis);
    let readability = score_readability(&doc);
    let faq = score_faq(&doc, heading_analysis);
    let link_analysis: LinkAnalysis = analyze_links(html, page_url, word_count);
    let links = SubScore {
        score: link_analysis.score,
        issues: link_analysis.issues.clone(),
    };
    let formats = score_formats(&doc);

    let score = headings.score * WEIGHT_HEADINGS
        + answer_first.score * WEIGHT_ANSWER_FIRST
        + ai_answer_block.score * WEIGHT_AI_ANSWER_BLOCK
        + readability.score * WEIGHT_READABILITY
        + faq.score * WEIGHT_FAQ
        + links.score * WEIGHT_LINKS
        + formats.score * WEIGHT_FORMATS;

    let level = if score >= 80.0 {
        "full".to_string()
    } else if score >= 50.0 {
        "partial".to_string()
    } else {
        "limited".to_string()
    };

    let mut issues = Vec::new();
    for sub in [&headings, &answer_first, &ai_answer_block, &readability, &faq, &links, &formats] {
        issues.extend(sub.issues.iter().cloned());
    }

    StructureAnalysis {
        headings,
        answer_first,
        ai_answer_block,
        readability,
        faq,
        links,
        formats,
        score,
        level,
        issues,
    }
}

fn main_content_text(doc: &Html) -> String {
    let main = doc
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| doc.select(&ARTICLE_SELECTOR).next())
        .or_else(|| doc.select(&CONTENT_ID_SELECTOR).next())
        .or_else(|| doc.select(&BODY_SELECTOR).next());
    main.map(|el| el.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn first_substantive_paragraph(doc: &Html) -> Option<String> {
    let scope = doc
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| doc.select(&ARTICLE_SELECTOR).next())
        .or_else(|| doc.select(&CONTENT_ID_SELECTOR).next())
        .or_else(|| doc.select(&BODY_SELECTOR).next())?;
    scope
        .select(&P_SELECTOR)
        .map(|p| p.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .find(|t| t.split_whitespace().count() >= 10)
}

fn score_answer_first(opening: Option<&str>) -> SubScore {
    let Some(text) = opening else {
        return SubScore {
            score: 0.0,
            issues: vec!["No opening paragraph found near the top of the page".to_string()],
        };
    };
    let words = text.split_whitespace().count();
    let mut issues = Vec::new();
    let score = if (ANSWER_BLOCK_MIN_WORDS..=ANSWER_BLOCK_MAX_WORDS).contains(&words) {
        100.0
    } else if words < ANSWER_BLOCK_MIN_WORDS {
        issues.push(format!(
            "Opening paragraph is only {words} words; aim for {ANSWER_BLOCK_MIN_WORDS}-{ANSWER_BLOCK_MAX_WORDS} to directly answer the likely query."
        ));
        (words as f64 / ANSWER_BLOCK_MIN_WORDS as f64 * 100.0).min(100.0)
    } else {
        issues.push(format!(
            "Opening paragraph is {words} words, longer than the {ANSWER_BLOCK_MIN_WORDS}-{ANSWER_BLOCK_MAX_WORDS} word target."
        ));
        (100.0 - (words - ANSWER_BLOCK_MAX_WORDS) as f64 * 2.0).max(30.0)
    };
    SubScore { score, issues }
}

fn score_ai_answer_block(opening: Option<&str>, heading_analysis: &HeadingAnalysis) -> SubScore {
    let Some(text) = opening else {
        return SubScore {
            score: 0.0,
            issues: vec!["No AI-answer block detected after the H1".to_string()],
        };
    };
    let lower = text.to_ascii_lowercase();
    let mut issues = Vec::new();
    let mut score = 100.0;

    let words = text.split_whitespace().count();
    if !(ANSWER_BLOCK_MIN_WORDS..=ANSWER_BLOCK_MAX_WORDS).contains(&words) {
        score -= 30.0;
    }

    let starts_generic = GENERIC_OPENERS.iter().any(|o| lower.starts_with(o));
    if starts_generic {
        score -= 30.0;
        issues.push("Opening paragraph starts with a generic intro instead of the topic itself".to_string());
    }

    let has_topic_lead = heading_analysis
        .headings
        .first()
        .map(|h1| {
            let first_word = h1.text.split_whitespace().next().unwrap_or("").to_ascii_lowercase();
            !first_word.is_empty() && lower.contains(&first_word)
        })
        .unwrap_or(false);
    if !has_topic_lead {
        score -= 10.0;
    }

    let has_definition = DEFINITION_PATTERNS.iter().any(|p| lower.contains(p));
    if !has_definition {
        score -= 30.0;
        issues.push("Opening paragraph has no definition pattern (e.g. 'is a', 'refers to')".to_string());
    }

    SubScore {
        score: score.clamp(0.0, 100.0),
        issues,
    }
}

fn score_readability(doc: &Html) -> SubScore {
    let scope = doc
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| doc.select(&ARTICLE_SELECTOR).next())
        .or_else(|| doc.select(&CONTENT_ID_SELECTOR).next())
        .or_else(|| doc.select(&BODY_SELECTOR).next());

    let Some(scope) = scope else {
        return SubScore {
            score: 50.0,
            issues: Vec::new(),
        };
    };

    let paragraphs: Vec<String> = scope
        .select(&P_SELECTOR)
        .map(|p| p.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|t| t.len() >= 10)
        .collect();

    if paragraphs.is_empty() {
        return SubScore {
            score: 50.0,
            issues: Vec::new(),
        };
    }

    let mut issues = Vec::new();
    let mut over_long_paragraphs = 0usize;
    let mut sentence_word_lengths = Vec::new();

    for p in &paragraphs {
        let word_count = p.split_whitespace().count();
        if word_count > READABLE_MAX_PARAGRAPH_WORDS {
            over_long_paragraphs += 1;
        }
        let guarded = ABBREVIATION.replace_all(p, "$1<PERIOD>");
        let sentences: Vec<&str> = SENTENCE_SPLIT.split(&guarded).filter(|s| !s.trim().is_empty()).collect();
        if !sentences.is_empty() {
            let avg_sentence_words = word_count as f64 / sentences.len() as f64;
            sentence_word_lengths.push(avg_sentence_words);
        }
    }

    let avg_sentence_len = if sentence_word_lengths.is_empty() {
        0.0
    } else {
        sentence_word_lengths.iter().sum::<f64>() / sentence_word_lengths.len() as f64
    };

    let mut score = 100.0;
    if over_long_paragraphs > 0 {
        let ratio = over_long_paragraphs as f64 / paragraphs.len() as f64;
        score -= ratio * 40.0;
        issues.push(format!(
            "{over_long_paragraphs} paragraph(s) exceed {READABLE_MAX_PARAGRAPH_WORDS} words"
        ));
    }
    if !(READABLE_MIN_SENTENCE_WORDS..=READABLE_MAX_SENTENCE_WORDS).contains(&avg_sentence_len)
        && avg_sentence_len > 0.0
    {
        let distance = if avg_sentence_len < READABLE_MIN_SENTENCE_WORDS {
            READABLE_MIN_SENTENCE_WORDS - avg_sentence_len
        } else {
            avg_sentence_len - READABLE_MAX_SENTENCE_WORDS
        };
        score -= (distance * 3.0).min(30.0);
        issues.push(format!(
            "Average sentence length is {avg_sentence_len:.1} words, outside the {READABLE_MIN_SENTENCE_WORDS}-{READABLE_MAX_SENTENCE_WORDS} word target"
        ));
    }

    SubScore {
        score: score.clamp(0.0, 100.0),
        issues,
    }
}

fn score_faq(doc: &Html, heading_analysis: &HeadingAnalysis) -> SubScore {
    if !heading_analysis.has_faq_heading && heading_analysis.question_headings == 0 {
        return SubScore {
            score: 0.0,
            issues: vec!["No FAQ section or question-style headings detected".to_string()],
        };
    }
    let mut score = 50.0;
    let mut issues = Vec::new();
    if heading_analysis.has_faq_heading {
        score += 25.0;
    }
    if heading_analysis.question_headings >= 3 {
        score += 25.0;
    } else if heading_analysis.question_headings > 0 {
        score += 10.0;
        issues.push("Few question-style headings; AI systems favor pages with multiple Q&A pairs".to_string());
    }
    let _ = doc;
    SubScore {
        score: score.clamp(0.0, 100.0),
        issues,
    }
}

fn score_formats(doc: &Html) -> SubScore {
    let mut tag_counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for el in doc.select(&FORMAT_SELECTOR) {
        *tag_counts.entry(el.value().name()).or_insert(0) += 1;
    }
    if tag_counts.is_empty() {
        return SubScore {
            score: 0.0,
            issues: vec!["No lists, tables or code blocks found; content is a wall of prose".to_string()],
        };
    }
    let distinct_formats = tag_counts.len();
    let total_elements: usize = tag_counts.values().sum();
    let score = (40.0 + distinct_formats as f64 * 15.0 + (total_elements as f64).min(10.0) * 2.0).min(100.0);
    SubScore { score, issues: Vec::new() }
}

#[allow(dead_code)]
fn is_in_main(_el: ElementRef) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_answer_first_block_scores_high() {
        let html = r#"<html><body><h1>Findable Score</h1><main>
            <p>A findable score is a metric that measures how easily an AI answer engine can locate, parse and cite a
            page's content when responding to a related query from a user, combining technical and structural signals.</p>
        </main></body></html>"#;
        let doc = Html::parse_document(html);
        let heading_analysis = analyze_headings(html);
        let opening = first_substantive_paragraph(&doc);
        let answer_first = score_answer_first(opening.as_deref());
        let ai_block = score_ai_answer_block(opening.as_deref(), &heading_analysis);
        assert!(answer_first.score > 50.0);
        assert!(ai_block.score > 50.0);
    }

    #[test]
    fn generic_opener_penalized() {
        let html = "<html><body><h1>Widgets</h1><main><p>Welcome to our site, the best place for everything widget related and more, with lots of extra padding words included here to hit the word count target for this particular test case scenario today.</p></main></body></html>";
        let doc = Html::parse_document(html);
        let heading_analysis = analyze_headings(html);
        let opening = first_substantive_paragraph(&doc);
        let ai_block = score_ai_answer_block(opening.as_deref(), &heading_analysis);
        assert!(ai_block.issues.iter().any(|i| i.contains("generic")));
    }

    #[test]
    fn no_formats_scores_zero() {
        let html = "<html><body><p>plain text only</p></body></html>";
        let doc = Html::parse_document(html);
        let r = score_formats(&doc);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn full_structure_analysis_combines_subscores() {
        let html = r#"<html><body>
            <h1>Widgets</h1>
            <main>
                <p>A widget is a small mechanical device that performs a specific, well defined task within a larger machine or system for users.</p>
                <h2>Frequently Asked Questions</h2>
                <p>What is a widget?</p>
                <p>A widget is a small part.</p>
                <ul><li>one</li><li>two</li></ul>
                <a href="/other">Related widget guide</a>
            </main>
        </body></html>"#;
        let heading_analysis = analyze_headings(html);
        let r = analyze_structure(html, "https://example.com/widgets", &heading_analysis);
        assert!(r.score > 0.0);
        assert!(!r.level.is_empty());
    }
}
