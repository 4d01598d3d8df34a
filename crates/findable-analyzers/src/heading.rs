//! Heading hierarchy analysis.
//!
//! Validates H1→H2→H3 structure, which AI extraction relies on to build a
//! document outline. Analyzers never raise; a page with no headings simply
//! scores zero with an issue recorded.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

const FAQ_PATTERNS: &[&str] = &[
    "faq",
    "frequently asked",
    "common questions",
    "questions and answers",
    "q&a",
    "q & a",
];

const HOW_TO_PATTERNS: &[&str] = &[
    "how to",
    "how do",
    "step by step",
    "steps to",
    "guide to",
    "tutorial",
    "instructions",
];

const MAX_HEADING_LENGTH: usize = 200;
const PENALIZE_MISSING_H1: f64 = 20.0;
const PENALIZE_MULTIPLE_H1: f64 = 10.0;
const PENALIZE_SKIP: f64 = 5.0;
const PENALIZE_DUPLICATE: f64 = 2.0;
const PENALIZE_EMPTY: f64 = 2.0;
const PENALIZE_TOO_LONG: f64 = 1.0;

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1,h2,h3,h4,h5,h6").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingIssueType {
    MissingH1,
    MultipleH1,
    SkipLevel,
    EmptyHeading,
    TooLong,
    Duplicate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingIssue {
    pub issue_type: HeadingIssueType,
    pub level: u8,
    pub text: String,
    pub position: usize,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingNode {
    pub level: u8,
    pub text: String,
    pub position: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadingAnalysis {
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub h4_count: usize,
    pub h5_count: usize,
    pub h6_count: usize,
    pub total_headings: usize,
    pub hierarchy_valid: bool,
    pub issues: Vec<HeadingIssue>,
    pub score: f64,
    pub skip_count: usize,
    pub duplicate_count: usize,
    pub max_depth: u8,
    pub avg_heading_length: f64,
    pub headings: Vec<HeadingNode>,
    pub has_faq_heading: bool,
    pub has_how_to_heading: bool,
    pub question_headings: usize,
}

/// Exactly one `<h1>` expected; skipped levels, duplicates, empties and
/// overlong headings are each penalized. FAQ/how-to/question headings are
/// flagged for downstream structure/FAQ analysis.
pub fn analyze_headings(html: &str) -> HeadingAnalysis {
    let doc = Html::parse_document(html);
    let mut result = HeadingAnalysis {
        score: 100.0,
        ..Default::default()
    };

    let headings: Vec<HeadingNode> = doc
        .select(&HEADING_SELECTOR)
        .enumerate()
        .map(|(position, el)| {
            let level: u8 = el.value().name()[1..].parse().unwrap_or(1);
            let text: String = el.text().collect::<Vec<_>>().join("").trim().to_string();
            HeadingNode {
                level,
                text,
                position,
            }
        })
        .collect();

    result.total_headings = headings.len();

    if headings.is_empty() {
        result.hierarchy_valid = false;
        result.score = 0.0;
        result.issues.push(HeadingIssue {
            issue_type: HeadingIssueType::MissingH1,
            level: 1,
            text: String::new(),
            position: 0,
            details: "Page has no headings at all".to_string(),
        });
        return result;
    }

    for h in &headings {
        match h.level {
            1 => result.h1_count += 1,
            2 => result.h2_count += 1,
            3 => result.h3_count += 1,
            4 => result.h4_count += 1,
            5 => result.h5_count += 1,
            _ => result.h6_count += 1,
        }
    }
    result.max_depth = headings.iter().map(|h| h.level).max().unwrap_or(0);
    result.avg_heading_length =
        headings.iter().map(|h| h.text.len()).sum::<usize>() as f64 / headings.len() as f64;

    let mut penalties = 0.0;
    let mut issues = Vec::new();

    if result.h1_count == 0 {
        issues.push(HeadingIssue {
            issue_type: HeadingIssueType::MissingH1,
            level: 1,
            text: String::new(),
            position: 0,
            details: "Page is missing an H1 heading".to_string(),
        });
        penalties += PENALIZE_MISSING_H1;
    }
    if result.h1_count > 1 {
        for (i, h) in headings.iter().filter(|h| h.level == 1).skip(1).enumerate() {
            issues.push(HeadingIssue {
                issue_type: HeadingIssueType::MultipleH1,
                level: 1,
                text: truncate(&h.text, 100),
                position: h.position,
                details: format!("Multiple H1 headings found (this is #{})", i + 2),
            });
        }
        penalties += PENALIZE_MULTIPLE_H1;
    }

    let mut prev_level = 0u8;
    for h in &headings {
        if prev_level > 0 && h.level > prev_level + 1 {
            issues.push(HeadingIssue {
                issue_type: HeadingIssueType::SkipLevel,
                level: h.level,
                text: truncate(&h.text, 100),
                position: h.position,
                details: format!("Skips from H{} to H{}", prev_level, h.level),
            });
            result.skip_count += 1;
            penalties += PENALIZE_SKIP;
        }
        prev_level = h.level;
    }

    let mut seen = std::collections::HashSet::new();
    for h in &headings {
        let normalized = h.text.to_ascii_lowercase();
        if !normalized.is_empty() && !seen.insert(normalized.clone()) {
            issues.push(HeadingIssue {
                issue_type: HeadingIssueType::Duplicate,
                level: h.level,
                text: truncate(&h.text, 100),
                position: h.position,
                details: "Duplicate heading text".to_string(),
            });
            result.duplicate_count += 1;
            penalties += PENALIZE_DUPLICATE;
        }
    }

    for h in &headings {
        if h.text.trim().is_empty() {
            issues.push(HeadingIssue {
                issue_type: HeadingIssueType::EmptyHeading,
                level: h.level,
                text: String::new(),
                position: h.position,
                details: "Empty heading found".to_string(),
            });
            penalties += PENALIZE_EMPTY;
        }
    }

    for h in &headings {
        if h.text.len() > MAX_HEADING_LENGTH {
            issues.push(HeadingIssue {
                issue_type: HeadingIssueType::TooLong,
                level: h.level,
                text: truncate(&h.text, 100),
                position: h.position,
                details: format!("Heading too long ({} chars)", h.text.len()),
            });
            penalties += PENALIZE_TOO_LONG;
        }
    }

    for h in &headings {
        let lower = h.text.to_ascii_lowercase();
        if FAQ_PATTERNS.iter().any(|p| lower.contains(p)) {
            result.has_faq_heading = true;
        }
        if HOW_TO_PATTERNS.iter().any(|p| lower.contains(p)) {
            result.has_how_to_heading = true;
        }
        if h.text.trim().ends_with('?') {
            result.question_headings += 1;
        }
    }

    result.headings = headings;
    result.issues = issues;
    result.hierarchy_valid = result.issues.is_empty();
    result.score = (100.0 - penalties).max(0.0);
    result
}

fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
