//! Robots-AI: scores robots.txt across two distinct access pipelines.
//!
//! Search-indexed discovery (Googlebot, Bingbot) and direct AI crawling
//! (GPTBot, ClaudeBot, PerplexityBot, Google-Extended) fail independently:
//! a site can be fully indexed by Google while blocking every AI crawler
//! outright, or vice versa. Each pipeline is scored on its own, then
//! combined 60/40 in favor of search-indexed, since most AI answer engines
//! still lean on a search index rather than crawling directly.

use findable_url::RobotsParser;
use serde::{Deserialize, Serialize};

const SEARCH_INDEXED_AGENTS: &[&str] = &["Googlebot", "Bingbot"];
const DIRECT_CRAWL_AGENTS: &[&str] = &["GPTBot", "ClaudeBot", "PerplexityBot", "Google-Extended"];

const SEARCH_INDEXED_WEIGHT: f64 = 0.6;
const DIRECT_CRAWL_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RobotsAiAnalysis {
    pub blocked_search_agents: Vec<String>,
    pub blocked_direct_agents: Vec<String>,
    pub search_indexed_score: f64,
    pub direct_crawl_score: f64,
    pub score: f64,
    pub level: String,
    pub summary: String,
    pub issues: Vec<String>,
}

/// `robots_txt` is the raw fetched content, or empty if the fetch failed
/// (per `findable_url`'s permissive-fallback convention, an empty file
/// blocks nothing and both pipelines score full).
pub fn analyze_robots_ai(robots_txt: &str) -> RobotsAiAnalysis {
    let mut result = RobotsAiAnalysis::default();

    for agent in SEARCH_INDEXED_AGENTS {
        if RobotsParser::blocks_agent(robots_txt, agent) {
            result.blocked_search_agents.push((*agent).to_string());
        }
    }
    for agent in DIRECT_CRAWL_AGENTS {
        if RobotsParser::blocks_agent(robots_txt, agent) {
            result.blocked_direct_agents.push((*agent).to_string());
        }
    }

    result.search_indexed_score = pipeline_score(
        SEARCH_INDEXED_AGENTS.len(),
        result.blocked_search_agents.len(),
    );
    result.direct_crawl_score = pipeline_score(
        DIRECT_CRAWL_AGENTS.len(),
        result.blocked_direct_agents.len(),
    );
    result.score =
        result.search_indexed_score * SEARCH_INDEXED_WEIGHT + result.direct_crawl_score * DIRECT_CRAWL_WEIGHT;

    result.level = if !result.blocked_search_agents.is_empty() {
        "critical".to_string()
    } else if !result.blocked_direct_agents.is_empty() {
        "warning".to_string()
    } else {
        "good".to_string()
    };

    result.summary = summarize(&result);

    if !result.blocked_search_agents.is_empty() {
        result.issues.push(format!(
            "robots.txt blocks search-indexing bot(s): {}. Your site may not appear in web search at all.",
            result.blocked_search_agents.join(", ")
        ));
    }
    if !result.blocked_direct_agents.is_empty() {
        result.issues.push(format!(
            "robots.txt blocks direct AI-crawl bot(s): {}. Answer engines that crawl directly cannot read your content.",
            result.blocked_direct_agents.join(", ")
        ));
    }
    result
}

fn pipeline_score(total_agents: usize, blocked: usize) -> f64 {
    if total_agents == 0 {
        return 100.0;
    }
    let allowed = total_agents.saturating_sub(blocked);
    (allowed as f64 / total_agents as f64) * 100.0
}

fn summarize(result: &RobotsAiAnalysis) -> String {
    if result.blocked_search_agents.is_empty() && result.blocked_direct_agents.is_empty() {
        "Visible via search indexes and open to direct AI crawling.".to_string()
    } else if !result.blocked_search_agents.is_empty() {
        "Blocked from one or more search indexes; AI answer engines relying on search results will miss this site."
            .to_string()
    } else {
        "Visible via search indexes, but one or more AI crawlers are blocked from direct access."
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_robots_scores_perfect() {
        let r = analyze_robots_ai("");
        assert_eq!(r.score, 100.0);
        assert_eq!(r.level, "good");
    }

    #[test]
    fn blocking_search_bot_is_critical() {
        let content = "User-agent: Googlebot\nDisallow: /\n";
        let r = analyze_robots_ai(content);
        assert_eq!(r.level, "critical");
        assert!(r.blocked_search_agents.contains(&"Googlebot".to_string()));
    }

    #[test]
    fn blocking_only_direct_crawl_is_warning() {
        let content = "User-agent: GPTBot\nDisallow: /\nUser-agent: ClaudeBot\nDisallow: /\n";
        let r = analyze_robots_ai(content);
        assert_eq!(r.level, "warning");
        assert!(r.search_indexed_score > r.direct_crawl_score);
        assert!(r.summary.contains("Visible"));
    }
}
