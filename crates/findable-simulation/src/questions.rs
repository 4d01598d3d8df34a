//! Question generator (C11): a pure function of `SiteContext` producing a
//! deterministic question bank partitioned by category. No randomness, no
//! LLM calls — unlike `worker/testing/queries.py`'s `TestQuery` bank (which
//! exists to probe live AI engines and is out of scope here, §1 Non-goals),
//! this bank exists to probe *our own* retrieval index, so its categories
//! follow `findable_types::question::QuestionCategory` instead of the
//! Python original's provider-facing `informational`/`tool_comparison`/
//! `brand` split.

use findable_types::question::{Difficulty, Question, QuestionCategory, SiteContext};

fn signal(base: &str) -> String {
    base.to_lowercase()
}

fn bare_domain(domain: &str) -> String {
    domain.trim_start_matches("www.").to_string()
}

/// Pick the first heading matching any of `patterns` (case-insensitive
/// substring), used to seed how-to/FAQ questions from the site's own
/// heading text rather than a generic template when one is available.
fn first_matching_heading<'a>(headings: &'a [String], patterns: &[&str]) -> Option<&'a str> {
    headings.iter().find_map(|h| {
        let lower = h.to_lowercase();
        patterns.iter().any(|p| lower.contains(p)).then_some(h.as_str())
    })
}

/// Generate the deterministic question bank for `ctx`. Order is fixed:
/// identity, offerings, how_to, comparison, faq, technical — each category
/// contributing 2 questions, for a fixed-size bank of 12.
pub fn generate_questions(ctx: &SiteContext) -> Vec<Question> {
    let name = if ctx.company_name.trim().is_empty() {
        bare_domain(&ctx.domain)
    } else {
        ctx.company_name.clone()
    };
    let domain = bare_domain(&ctx.domain);

    let mut questions = Vec::with_capacity(12);
    let mut push = |id: &str, text: String, category: QuestionCategory, difficulty: Difficulty, mut signals: Vec<String>| {
        signals.push(signal(&name));
        signals.push(signal(&domain));
        signals.dedup();
        questions.push(Question {
            id: id.to_string(),
            text,
            category,
            difficulty,
            expected_signals: signals,
        });
    };

    // Identity
    push(
        "identity-1",
        format!("What is {name}?"),
        QuestionCategory::Identity,
        Difficulty::Easy,
        vec![],
    );
    push(
        "identity-2",
        format!("Who is behind {name}?"),
        QuestionCategory::Identity,
        Difficulty::Easy,
        vec!["about".to_string()],
    );

    // Offerings
    let has_product_schema = ctx.schema_types.iter().any(|t| t == "Product" || t == "SoftwareApplication" || t == "Service");
    push(
        "offerings-1",
        format!("What does {name} offer?"),
        QuestionCategory::Offerings,
        Difficulty::Easy,
        vec!["product".to_string(), "service".to_string()],
    );
    push(
        "offerings-2",
        if has_product_schema {
            format!("What products does {name} sell?")
        } else {
            format!("What features does {name} provide?")
        },
        QuestionCategory::Offerings,
        Difficulty::Medium,
        vec!["feature".to_string(), "pricing".to_string()],
    );

    // How-to
    let how_to_heading = first_matching_heading(&ctx.headings, &["how to", "how do", "getting started", "quickstart", "tutorial"]);
    push(
        "how_to-1",
        match how_to_heading {
            Some(h) => format!("How do I {}?", h.to_lowercase().trim_start_matches("how to ").trim_start_matches("how do i ")),
            None => format!("How do I get started with {name}?"),
        },
        QuestionCategory::HowTo,
        Difficulty::Medium,
        vec!["getting started".to_string(), "setup".to_string()],
    );
    push(
        "how_to-2",
        format!("How do I install or set up {name}?"),
        QuestionCategory::HowTo,
        Difficulty::Medium,
        vec!["install".to_string(), "setup".to_string()],
    );

    // Comparison
    push(
        "comparison-1",
        format!("How does {name} compare to alternatives?"),
        QuestionCategory::Comparison,
        Difficulty::Hard,
        vec!["alternative".to_string(), "compare".to_string()],
    );
    push(
        "comparison-2",
        format!("What makes {name} different from competitors?"),
        QuestionCategory::Comparison,
        Difficulty::Hard,
        vec!["different".to_string(), "unique".to_string()],
    );

    // FAQ
    let has_faq_schema = ctx.schema_types.iter().any(|t| t == "FAQPage");
    push(
        "faq-1",
        if has_faq_schema {
            format!("What are the frequently asked questions about {name}?")
        } else {
            format!("What do customers commonly ask about {name}?")
        },
        QuestionCategory::Faq,
        Difficulty::Medium,
        vec!["faq".to_string(), "question".to_string()],
    );
    push(
        "faq-2",
        format!("What is {name}'s pricing or refund policy?"),
        QuestionCategory::Faq,
        Difficulty::Medium,
        vec!["pricing".to_string(), "refund".to_string()],
    );

    // Technical
    let has_api_schema = ctx.schema_types.iter().any(|t| t.contains("API") || t == "SoftwareApplication");
    push(
        "technical-1",
        if has_api_schema {
            format!("How do I integrate with {name}'s API?")
        } else {
            format!("What are the technical requirements for using {name}?")
        },
        QuestionCategory::Technical,
        Difficulty::Hard,
        vec!["api".to_string(), "integration".to_string()],
    );
    push(
        "technical-2",
        format!("What technologies or platforms does {name} support?"),
        QuestionCategory::Technical,
        Difficulty::Hard,
        vec!["platform".to_string(), "technology".to_string()],
    );

    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SiteContext {
        SiteContext {
            company_name: "Findable".to_string(),
            domain: "www.findable.ai".to_string(),
            schema_types: vec!["Organization".to_string(), "FAQPage".to_string()],
            headings: vec!["Getting Started".to_string(), "How to audit your site".to_string()],
        }
    }

    #[test]
    fn generates_fixed_size_bank_in_deterministic_order() {
        let a = generate_questions(&ctx());
        let b = generate_questions(&ctx());
        let ids_a: Vec<&str> = a.iter().map(|q| q.id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a.len(), 12);
        assert_eq!(ids_a[0], "identity-1");
    }

    #[test]
    fn every_question_carries_company_and_domain_signals() {
        for q in generate_questions(&ctx()) {
            assert!(q.expected_signals.contains(&"findable".to_string()));
            assert!(q.expected_signals.contains(&"findable.ai".to_string()));
        }
    }

    #[test]
    fn faq_schema_presence_changes_the_faq_question_text() {
        let questions = generate_questions(&ctx());
        let faq = questions.iter().find(|q| q.id == "faq-1").unwrap();
        assert!(faq.text.contains("frequently asked"));
    }
}
