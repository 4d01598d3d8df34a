//! robots.txt parsing: per-agent Allow/Disallow rules, crawl-delay and
//! sitemap discovery. Callers that fail to fetch robots.txt should fall back
//! to an empty, allow-everything `RobotsParser::default()` rather than
//! denying by default.

use regex::Regex;

/// A single Allow/Disallow rule parsed from one robots.txt agent block.
#[derive(Debug, Clone)]
pub struct RobotsRule {
    pub path: String,
    pub allowed: bool,
    pattern: Option<Regex>,
}

impl RobotsRule {
    pub fn new(path: impl Into<String>, allowed: bool) -> Self {
        let path = path.into();
        let pattern = if path.contains('*') || path.ends_with('$') {
            build_wildcard_regex(&path)
        } else {
            None
        };
        Self {
            path,
            allowed,
            pattern,
        }
    }

    /// Whether this rule's path matches `url_path`. Plain paths match as a
    /// prefix; wildcard (`*`) and end-anchored (`$`) paths compile to a
    /// regex.
    pub fn matches(&self, url_path: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(url_path),
            None => url_path.starts_with(&self.path),
        }
    }
}

fn build_wildcard_regex(path: &str) -> Option<Regex> {
    let has_end_anchor = path.ends_with('$');
    let core = if has_end_anchor {
        &path[..path.len() - 1]
    } else {
        path
    };
    let mut pattern = String::from("^");
    for (i, part) in core.split('*').enumerate() {
        if i > 0 {
            pattern.push_str(".*");
        }
        pattern.push_str(&regex::escape(part));
    }
    if has_end_anchor {
        pattern.push('$');
    }
    Regex::new(&pattern).ok()
}

/// The parsed robots.txt policy applying to our user agent.
#[derive(Debug, Clone, Default)]
pub struct RobotsParser {
    pub rules: Vec<RobotsRule>,
    pub crawl_delay: Option<f64>,
    pub sitemaps: Vec<String>,
}

impl RobotsParser {
    /// Parse robots.txt content for `user_agent`. An agent block applies
    /// when its declared user-agent is `*` or the configured bot name
    /// (everything before an optional `/version`) is a case-insensitive
    /// substring of it.
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let mut parser = RobotsParser::default();
        let mut applies_to_us = false;
        let mut any_agent_seen = false;

        let ua_lower = user_agent.to_ascii_lowercase();
        let ua_name = ua_lower.split('/').next().unwrap_or(&ua_lower).to_string();

        for raw_line in content.lines() {
            let line = strip_inline_comment(raw_line.trim());
            if line.is_empty() {
                continue;
            }
            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_ascii_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    if any_agent_seen && value.is_empty() {
                        applies_to_us = false;
                    } else {
                        any_agent_seen = true;
                        let value_lower = value.to_ascii_lowercase();
                        if value == "*" || value_lower.contains(&ua_name) {
                            applies_to_us = true;
                        }
                    }
                }
                "disallow" if applies_to_us => {
                    if !value.is_empty() {
                        parser.rules.push(RobotsRule::new(value, false));
                    }
                }
                "allow" if applies_to_us => {
                    if !value.is_empty() {
                        parser.rules.push(RobotsRule::new(value, true));
                    }
                }
                "crawl-delay" if applies_to_us => {
                    if let Ok(delay) = value.parse::<f64>() {
                        parser.crawl_delay = Some(delay);
                    }
                }
                "sitemap" => {
                    if value.starts_with("http") {
                        parser.sitemaps.push(value.to_string());
                    }
                }
                _ => {}
            }
        }

        parser
    }

    /// Allowed iff the longest matching rule (by path length) says so, or
    /// there is no matching rule at all (default allow).
    pub fn is_allowed(&self, path: &str) -> bool {
        let mut best: Option<&RobotsRule> = None;
        for rule in &self.rules {
            if rule.matches(path)
                && best
                    .map(|b| rule.path.len() > b.path.len())
                    .unwrap_or(true)
            {
                best = Some(rule);
            }
        }
        best.map(|r| r.allowed).unwrap_or(true)
    }

    /// Whether a given bot's access is blocked by any Disallow rule on `/`
    /// that applies to it specifically (used by the robots-AI analyzer,
    /// to test GPTBot/ClaudeBot/etc individually).
    pub fn blocks_agent(content: &str, agent: &str) -> bool {
        let parser = RobotsParser::parse(content, agent);
        !parser.is_allowed("/")
    }
}

fn strip_inline_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_robots_allows_everything() {
        let parser = RobotsParser::parse("", "FindableBot");
        assert!(parser.is_allowed("/anything"));
    }

    #[test]
    fn longest_matching_rule_wins() {
        let content = "User-agent: *\nDisallow: /private\nAllow: /private/public\n";
        let parser = RobotsParser::parse(content, "FindableBot");
        assert!(!parser.is_allowed("/private/secret"));
        assert!(parser.is_allowed("/private/public/page"));
    }

    #[test]
    fn wildcard_and_end_anchor() {
        let content = "User-agent: *\nDisallow: /*.pdf$\n";
        let parser = RobotsParser::parse(content, "FindableBot");
        assert!(!parser.is_allowed("/reports/q1.pdf"));
        assert!(parser.is_allowed("/reports/q1.pdf.html"));
    }

    #[test]
    fn agent_specific_block() {
        let content = "User-agent: Googlebot\nDisallow: /\n";
        assert!(RobotsParser::blocks_agent(content, "Googlebot"));
        assert!(!RobotsParser::blocks_agent(content, "GPTBot"));
    }

    #[test]
    fn crawl_delay_and_sitemaps_parsed() {
        let content = "User-agent: *\nCrawl-delay: 2.5\nSitemap: https://example.com/sitemap.xml\n";
        let parser = RobotsParser::parse(content, "FindableBot");
        assert_eq!(parser.crawl_delay, Some(2.5));
        assert_eq!(parser.sitemaps, vec!["https://example.com/sitemap.xml".to_string()]);
    }

    #[test]
    fn empty_disallow_means_allow_all() {
        let content = "User-agent: *\nDisallow:\n";
        let parser = RobotsParser::parse(content, "FindableBot");
        assert!(parser.is_allowed("/anything"));
    }
}
