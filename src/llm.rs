//! Article text generation.
//!
//! Two requests per article go to an OpenRouter-compatible chat-completions
//! endpoint: one for a title and meta description (asked for as JSON), one
//! for the article body. Both sit behind [`attempt_or`], so every failure
//! (no credential, HTTP error, timeout, bad JSON, empty answer) degrades to
//! deterministic local text and never stops the run.
//!
//! The service is reached through the [`TextBackend`] trait; the production
//! implementation is [`OpenRouterText`]. Passing `None` as the backend means
//! "no service configured" and goes straight to the fallback without any
//! network traffic.

use crate::config::SiteConfig;
use crate::fallback::{ServiceError, attempt_or};
use crate::naming::{capitalize_first, truncate_with_ellipsis, wrap_words};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Titles longer than this are cut with an ellipsis.
pub const TITLE_MAX_CHARS: usize = 62;

const TITLE_SYSTEM: &str = "Você é um especialista em SEO e copywriting em português do Brasil.";
const BODY_SYSTEM: &str = "Você é um redator especialista em café em casa e métodos de preparo.";

const FALLBACK_TIP: &str = "Foque no básico primeiro: qualidade da água, proporção café/água, \
moagem adequada e constância no método. Ajuste um fator de cada vez para evoluir rapidamente.";

/// A chat-completion style text service.
pub trait TextBackend {
    /// Send one system/user message pair and return the generated text.
    fn complete(&self, system: &str, user: &str) -> Result<String, ServiceError>;
}

/// Where a body came from. Only service output is worth caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Service,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBody {
    pub text: String,
    pub origin: Origin,
}

// ============================================================================
// OpenRouter client
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Blocking client for OpenRouter chat completions.
pub struct OpenRouterText {
    client: reqwest::blocking::Client,
    endpoint: String,
    bearer: String,
    model: String,
    temperature: f32,
    referer: String,
    site_name: String,
}

impl std::fmt::Debug for OpenRouterText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterText")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenRouterText {
    /// Build a client from config. `Ok(None)` when generation is disabled or
    /// no credential is set.
    pub fn from_config(config: &SiteConfig) -> Result<Option<Self>, ServiceError> {
        let Some(key) = config.llm.active_key() else {
            return Ok(None);
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;
        Ok(Some(Self {
            client,
            endpoint: config.llm.endpoint.clone(),
            bearer: format!("Bearer {key}"),
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            referer: config.site.url.clone(),
            site_name: config.site.name.clone(),
        }))
    }
}

impl TextBackend for OpenRouterText {
    fn complete(&self, system: &str, user: &str) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.bearer)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.site_name)
            .json(&request)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        let text = resp.text()?;
        extract_content(&text)
    }
}

/// Pull `choices[0].message.content` out of a chat-completion response body.
fn extract_content(raw: &str) -> Result<String, ServiceError> {
    let parsed: ChatResponse = serde_json::from_str(raw)?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    if content.is_empty() {
        return Err(ServiceError::Malformed("empty completion".into()));
    }
    Ok(content)
}

// ============================================================================
// Title and description
// ============================================================================

#[derive(Deserialize)]
struct TitleReply {
    title: Option<String>,
    description: Option<String>,
}

fn title_prompt(keyword: &str) -> String {
    format!(
        "Gere um título forte (no máximo {TITLE_MAX_CHARS} caracteres) e uma meta description \
         (no máximo 150 caracteres) para um artigo em PT-BR sobre: \"{keyword}\". \
         Responda em JSON com chaves title e description."
    )
}

/// Generate `(title, description)` for a keyword. Always returns a usable pair.
pub fn gen_title_and_description(
    backend: Option<&dyn TextBackend>,
    keyword: &str,
) -> (String, String) {
    let Some(backend) = backend else {
        return fallback_title_and_description(keyword);
    };
    attempt_or(
        &format!("title for {keyword:?}"),
        || {
            let content = backend.complete(TITLE_SYSTEM, &title_prompt(keyword))?;
            parse_title_reply(&content, keyword)
        },
        || fallback_title_and_description(keyword),
    )
}

/// Parse the JSON title reply. A single missing field is filled from the
/// fallback; a reply with neither field is malformed.
fn parse_title_reply(content: &str, keyword: &str) -> Result<(String, String), ServiceError> {
    let reply: TitleReply = serde_json::from_str(strip_code_fence(content))?;
    let clean = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let (title, description) = (clean(reply.title), clean(reply.description));
    if title.is_none() && description.is_none() {
        return Err(ServiceError::Malformed("reply has no title or description".into()));
    }
    let (fallback_title, fallback_desc) = fallback_title_and_description(keyword);
    Ok((
        title
            .map(|t| truncate_with_ellipsis(&t, TITLE_MAX_CHARS))
            .unwrap_or(fallback_title),
        description.unwrap_or(fallback_desc),
    ))
}

/// Models often wrap JSON in a Markdown code fence; drop it.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (`json`) on the opening fence line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

pub fn fallback_title_and_description(keyword: &str) -> (String, String) {
    let base = capitalize_first(keyword.trim());
    let title = truncate_with_ellipsis(&base, TITLE_MAX_CHARS);
    let description = format!("Guia prático para {} em casa.", keyword.trim());
    (title, description)
}

// ============================================================================
// Article body
// ============================================================================

fn body_prompt(keyword: &str, outline: &[String]) -> String {
    let outline = outline
        .iter()
        .map(|h| format!("- {h}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Escreva um artigo objetivo em PT-BR para iniciantes, sobre \"{keyword}\".\n\
         Estruture com seções claras (H2/H3), listas quando útil e sem enrolação.\n\
         Use tom de voz claro e prático. Evite jargões. Evite redundância.\n\
         Cubra este outline sugerido (ajuste se necessário):\n\
         {outline}\n\n\
         Regras:\n\
         - Abertura curta (2-3 linhas) com o benefício prático.\n\
         - Cada H2 com 2-4 parágrafos e, se fizer sentido, 1 lista curta.\n\
         - Finalize com um resumo prático (bullet points).\n\
         - Não invente dados. Não inclua links."
    )
}

/// Generate the article body, falling back to [`fallback_body`].
pub fn gen_article_body(
    backend: Option<&dyn TextBackend>,
    keyword: &str,
    outline: &[String],
) -> GeneratedBody {
    let fallback = || GeneratedBody {
        text: fallback_body(keyword, outline),
        origin: Origin::Fallback,
    };
    let Some(backend) = backend else {
        return fallback();
    };
    attempt_or(
        &format!("article body for {keyword:?}"),
        || {
            let text = backend.complete(BODY_SYSTEM, &body_prompt(keyword, outline))?;
            Ok(GeneratedBody {
                text,
                origin: Origin::Service,
            })
        },
        fallback,
    )
}

/// Deterministic body: an opening line, one section per outline entry with a
/// tip paragraph and three bullets, then a bullet summary.
pub fn fallback_body(keyword: &str, outline: &[String]) -> String {
    let mut blocks = vec![format!(
        "{} pode parecer complexo, mas com algumas escolhas simples você consegue \
         resultados consistentes em casa.",
        capitalize_first(keyword.trim())
    )];
    for heading in outline {
        blocks.push(format!("## {heading}"));
        blocks.push(wrap_words(FALLBACK_TIP, 90));
        blocks.push("- Dica 1 prática\n- Dica 2 rápida\n- Dica 3 econômica".to_string());
    }
    blocks.push(
        "### Resumo prático\n- Comece simples\n- Padronize medidas\n- Ajuste moagem\n- Anote o que funcionou"
            .to_string(),
    );
    let mut body = blocks.join("\n\n");
    body.push('\n');
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockText;

    fn outline() -> Vec<String> {
        vec!["Materiais".to_string(), "Passo a passo".to_string()]
    }

    #[test]
    fn no_backend_gives_bounded_fallback_title() {
        let (title, desc) = gen_title_and_description(None, "café gelado");
        assert_eq!(title, "Café gelado");
        assert!(title.chars().count() <= TITLE_MAX_CHARS);
        assert_eq!(desc, "Guia prático para café gelado em casa.");
    }

    #[test]
    fn long_keyword_title_is_truncated() {
        let keyword = "como escolher ".repeat(10);
        let (title, _) = gen_title_and_description(None, &keyword);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn service_title_json_is_used() {
        let backend = MockText::replying([Some(
            r#"{"title": "Café gelado perfeito", "description": "Receita fácil."}"#,
        )]);
        let (title, desc) = gen_title_and_description(Some(&backend), "café gelado");
        assert_eq!(title, "Café gelado perfeito");
        assert_eq!(desc, "Receita fácil.");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn fenced_json_is_accepted() {
        let backend = MockText::replying([Some(
            "```json\n{\"title\": \"T\", \"description\": \"D\"}\n```",
        )]);
        assert_eq!(
            gen_title_and_description(Some(&backend), "x"),
            ("T".to_string(), "D".to_string())
        );
    }

    #[test]
    fn missing_description_is_filled_from_fallback() {
        let backend = MockText::replying([Some(r#"{"title": "Só título"}"#)]);
        let (title, desc) = gen_title_and_description(Some(&backend), "aeropress");
        assert_eq!(title, "Só título");
        assert_eq!(desc, "Guia prático para aeropress em casa.");
    }

    #[test]
    fn malformed_title_reply_falls_back() {
        let backend = MockText::replying([Some("Claro! Aqui está um título ótimo.")]);
        let pair = gen_title_and_description(Some(&backend), "aeropress");
        assert_eq!(pair, fallback_title_and_description("aeropress"));

        let backend = MockText::replying([Some("{}")]);
        let pair = gen_title_and_description(Some(&backend), "aeropress");
        assert_eq!(pair, fallback_title_and_description("aeropress"));
    }

    #[test]
    fn service_failure_falls_back() {
        let backend = MockText::replying([None]);
        let pair = gen_title_and_description(Some(&backend), "aeropress");
        assert_eq!(pair, fallback_title_and_description("aeropress"));
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn body_from_service_is_tagged() {
        let backend = MockText::replying([Some("## Seção\n\nTexto.")]);
        let body = gen_article_body(Some(&backend), "aeropress", &outline());
        assert_eq!(body.origin, Origin::Service);
        assert_eq!(body.text, "## Seção\n\nTexto.");
        assert!(backend.last_user_prompt().unwrap().contains("- Passo a passo"));
    }

    #[test]
    fn body_failure_uses_fallback() {
        let backend = MockText::replying([None]);
        let body = gen_article_body(Some(&backend), "aeropress", &outline());
        assert_eq!(body.origin, Origin::Fallback);
        assert_eq!(body.text, fallback_body("aeropress", &outline()));
    }

    #[test]
    fn fallback_body_has_one_section_per_outline_entry() {
        let body = fallback_body("café gelado", &outline());
        assert!(body.starts_with("Café gelado pode parecer complexo"));
        assert_eq!(body.matches("\n## ").count(), 2);
        assert!(body.contains("## Materiais"));
        assert!(body.contains("### Resumo prático"));
        assert_eq!(body.matches("- Dica 1 prática").count(), 2);
        assert!(body.lines().all(|l| l.chars().count() <= 120));
    }

    #[test]
    fn fallback_body_is_deterministic() {
        assert_eq!(fallback_body("x", &outline()), fallback_body("x", &outline()));
    }

    #[test]
    fn extract_content_reads_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"  olá \n"}}]}"#;
        assert_eq!(extract_content(raw).unwrap(), "olá");
    }

    #[test]
    fn extract_content_rejects_empty_or_missing() {
        assert!(matches!(
            extract_content(r#"{"choices":[]}"#),
            Err(ServiceError::Malformed(_))
        ));
        assert!(matches!(
            extract_content(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(ServiceError::Malformed(_))
        ));
        assert!(matches!(extract_content("<html>"), Err(ServiceError::Json(_))));
    }

    #[test]
    fn strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
    }

    #[test]
    fn client_requires_credential() {
        let config = SiteConfig::default();
        assert!(OpenRouterText::from_config(&config).unwrap().is_none());
    }
}
