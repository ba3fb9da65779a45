//! Informational pages published alongside the articles.
//!
//! Three fixed pages: about (`sobre`), privacy (`privacidade`), and the
//! affiliate disclosure (`afiliados`). Their bodies are trusted HTML authored
//! here; only config values interpolated into them are escaped.

use crate::config::SiteConfig;
use crate::types::StaticPage;
use maud::html;

/// `(slug, footer label)` for every static page, in footer order.
pub const PAGE_LINKS: [(&str, &str); 3] = [
    ("sobre", "Sobre"),
    ("privacidade", "Privacidade"),
    ("afiliados", "Afiliados"),
];

pub fn static_pages(config: &SiteConfig) -> Vec<StaticPage> {
    let email = &config.site.contact_email;
    let about = html! {
        p {
            "Publicamos guias práticos e selecionamos produtos úteis para café em casa. "
            "Conteúdo sem enrolação, com foco no que realmente ajuda você a fazer um café melhor."
        }
        p { "Contato: " a href={ "mailto:" (email) } { (email) } }
    };

    vec![
        StaticPage {
            slug: "sobre".to_string(),
            title: format!("Sobre o {}", config.site.name),
            description: "Quem somos e nossa missão.".to_string(),
            body_html: about.into_string(),
        },
        StaticPage {
            slug: "privacidade".to_string(),
            title: "Política de Privacidade".to_string(),
            description: "Como tratamos dados e cookies.".to_string(),
            body_html: "<p>Usamos ferramentas de analytics e afiliados. Não vendemos seus dados. \
                        Consulte esta página periodicamente para atualizações.</p>"
                .to_string(),
        },
        StaticPage {
            slug: "afiliados".to_string(),
            title: "Aviso de Afiliados".to_string(),
            description: "Links podem gerar comissões sem custo extra.".to_string(),
            body_html: "<p>Participamos de programas de afiliados. Ao comprar por nossos links, \
                        podemos ganhar uma comissão que nos ajuda a manter o conteúdo gratuito.</p>"
                .to_string(),
        },
    ]
}
