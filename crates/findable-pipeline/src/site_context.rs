//! Builds the `SiteContext` the question generator (C11) is a pure
//! function of, from whatever the crawl+extraction phases already
//! gathered — no extra fetch, no extra parsing.

use findable_types::extraction::ExtractedPage;
use findable_types::question::SiteContext;
use std::collections::BTreeSet;

/// `homepage` is the extracted page matching the crawl's `start_url`, when
/// one was successfully extracted (a start URL redirecting to an error page
/// or blocked by robots leaves this `None`, and the context falls back to
/// the bare domain for a name).
pub fn build_site_context(domain: &str, homepage: Option<&ExtractedPage>, pages: &[ExtractedPage]) -> SiteContext {
    let company_name = homepage
        .and_then(|p| p.metadata.og.site_name.clone())
        .or_else(|| homepage.and_then(|p| p.title.clone()))
        .unwrap_or_else(|| domain.to_string());

    let mut schema_types: BTreeSet<String> = BTreeSet::new();
    for page in pages {
        schema_types.extend(page.metadata.schema_types.iter().cloned());
    }

    let headings = homepage
        .map(|p| {
            p.metadata
                .headings
                .h1
                .iter()
                .chain(p.metadata.headings.h2.iter())
                .cloned()
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    SiteContext {
        company_name,
        domain: domain.to_string(),
        schema_types: schema_types.into_iter().collect(),
        headings,
    }
}
