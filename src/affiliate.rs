//! Affiliate call-to-action links.
//!
//! Each article carries a short list of marketplace search links chosen from
//! its keyword. Selection is a priority-ordered classifier: the rules in
//! [`CTA_RULES`] are tried top to bottom against the lowercased keyword and the
//! first rule with a matching substring wins. A keyword that mentions both a
//! grinder and a brewing method ("moedor para cafeteira italiana") therefore
//! gets grinder links, because the grinder rule comes first.
//!
//! Links are recomputed every run; nothing here is cached.

use crate::config::AffiliateConfig;
use crate::types::CtaLink;
use url::form_urlencoded;

/// Tag used when the configured referral tag is blank.
pub const PLACEHOLDER_TAG: &str = "SEU_TAG-20";

/// One classifier rule: any needle found in the keyword selects `terms`.
#[derive(Debug)]
pub struct CtaRule {
    pub name: &'static str,
    pub needles: &'static [&'static str],
    pub terms: &'static [&'static str],
}

/// Evaluation order is part of the contract.
pub const CTA_RULES: &[CtaRule] = &[
    CtaRule {
        name: "grinder",
        needles: &["moedor", "moer", "grão", "grao", "moinho"],
        terms: &["moedor de café", "moedor elétrico", "moedor manual"],
    },
    CtaRule {
        name: "method",
        needles: &["cafeteira", "método", "metodo", "preparo", "espresso", "expresso"],
        terms: &["cafeteira italiana", "prensa francesa", "aeropress"],
    },
    CtaRule {
        name: "filter",
        needles: &["filtro"],
        terms: &["filtro de papel", "filtro de metal", "coador de café"],
    },
    CtaRule {
        name: "scale",
        needles: &["balança", "balanca", "escala"],
        terms: &["balança de café", "balança de precisão"],
    },
];

/// Returned when no rule matches.
pub const DEFAULT_TERMS: &[&str] = &["cafeteira", "moedor de café", "balança de café"];

/// Pick the product-search terms for a keyword.
pub fn pick_cta_terms(keyword: &str) -> &'static [&'static str] {
    let k = keyword.to_lowercase();
    CTA_RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|n| k.contains(n)))
        .map(|rule| rule.terms)
        .unwrap_or(DEFAULT_TERMS)
}

/// Marketplace search URL for `query`, carrying the referral tag.
pub fn marketplace_search_url(query: &str, config: &AffiliateConfig) -> String {
    let tag = match config.amazon_tag.trim() {
        "" => PLACEHOLDER_TAG,
        tag => tag,
    };
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("k", query)
        .append_pair("tag", tag)
        .append_pair("i", &config.category)
        .finish();
    format!("{}?{}", config.marketplace_url, params)
}

/// Build the CTA links for a keyword: one per picked term, in order.
pub fn render_cta_links(keyword: &str, config: &AffiliateConfig) -> Vec<CtaLink> {
    pick_cta_terms(keyword)
        .iter()
        .map(|term| CtaLink {
            label: crate::naming::capitalize_first(term),
            url: marketplace_search_url(term, config),
        })
        .collect()
}
