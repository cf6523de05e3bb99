use crate::config::SelectorConfig;
use crate::error::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break regex must be valid"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex must be valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Image,
    Caption,
    BigCollection,
    Name,
    RegionPeriod,
    Link,
    Detail,
}

impl Role {
    // emission order for a page
    pub const ALL: [Role; 7] = [
        Role::Image,
        Role::Caption,
        Role::BigCollection,
        Role::Name,
        Role::RegionPeriod,
        Role::Link,
        Role::Detail,
    ];

    fn selector<'a>(&self, selectors: &'a SelectorConfig) -> &'a str {
        match self {
            Role::Image => &selectors.image,
            Role::Caption => &selectors.caption,
            Role::BigCollection => &selectors.big_collection,
            Role::Name => &selectors.name,
            Role::RegionPeriod => &selectors.region_period,
            Role::Link => &selectors.link,
            Role::Detail => &selectors.detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Image { src: String, alt: String },
    Text(String),
    Markup { html: String, text: String },
}

impl Content {
    pub fn text(&self) -> &str {
        match self {
            Content::Image { alt, .. } => alt,
            Content::Text(text) => text,
            Content::Markup { text, .. } => text,
        }
    }

    pub fn markup(&self) -> &str {
        match self {
            Content::Markup { html, .. } => html,
            other => other.text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub role: Role,
    // position among fragments of the same role
    pub ordinal: usize,
    pub content: Content,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFragments {
    fragments: Vec<Fragment>,
}

impl PageFragments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: Content) -> &mut Self {
        let ordinal = self.fragments.iter().filter(|f| f.role == role).count();
        self.fragments.push(Fragment {
            role,
            ordinal,
            content,
        });
        self
    }

    pub fn push_text(&mut self, role: Role, text: impl Into<String>) -> &mut Self {
        self.push(role, Content::Text(text.into()))
    }

    pub fn push_image(&mut self, src: impl Into<String>, alt: impl Into<String>) -> &mut Self {
        self.push(
            Role::Image,
            Content::Image {
                src: src.into(),
                alt: alt.into(),
            },
        )
    }

    pub fn push_markup(&mut self, role: Role, html: impl Into<String>) -> &mut Self {
        let html = html.into();
        let text = strip_tags(&html);
        self.push(role, Content::Markup { html, text })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }
}

impl<'a> IntoIterator for &'a PageFragments {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::Selector {
        selector: selector.to_string(),
        reason: format!("{err:?}"),
    })
}

pub fn extract_fragments(
    html: &str,
    selectors: &SelectorConfig,
) -> Result<PageFragments, ExtractError> {
    let document = Html::parse_document(html);
    let mut page = PageFragments::new();

    for role in Role::ALL {
        let selector = parse_selector(role.selector(selectors))?;
        for element in document.select(&selector) {
            page.push(role, element_content(role, element));
        }
    }

    debug!(fragments = page.len(), "extracted page fragments");
    Ok(page)
}

fn element_content(role: Role, element: ElementRef<'_>) -> Content {
    match role {
        Role::Image => Content::Image {
            src: element.value().attr("src").unwrap_or_default().trim().to_string(),
            alt: element.value().attr("alt").unwrap_or_default().trim().to_string(),
        },
        Role::Detail => Content::Markup {
            html: element.inner_html(),
            text: element_text(element),
        },
        _ => Content::Text(element_text(element)),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn extract_listing_links(
    html: &str,
    page_url: &str,
    card_selector: &str,
    link_selector: &str,
) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);
    let cards = parse_selector(card_selector)?;
    let link = parse_selector(link_selector)?;
    let base = Url::parse(page_url).ok();

    let mut links = Vec::new();
    for card in document.select(&cards) {
        let Some(href) = card
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
        else {
            continue;
        };
        links.push(absolutize_url(base.as_ref(), href));
    }

    Ok(links)
}

fn absolutize_url(base: Option<&Url>, value: &str) -> String {
    if Url::parse(value).is_ok() {
        return value.to_string();
    }
    base.and_then(|b| b.join(value).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| value.to_string())
}

pub fn normalize_markup(html: &str) -> String {
    let spaced = join_line_breaks(html);
    WHITESPACE_RUN.replace_all(&spaced, " ").into_owned()
}

/// Line-break tags become spaces; other whitespace, newlines included, is kept
/// so length checks see the markup as served.
pub fn join_line_breaks(html: &str) -> String {
    LINE_BREAK.replace_all(html, " ").trim().to_string()
}

fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_markup_collapses_line_breaks() {
        assert_eq!(normalize_markup("Oro <br> tumbaga"), "Oro tumbaga");
        assert_eq!(normalize_markup(" Oro<br/>cobre<BR />plata\n"), "Oro cobre plata");
    }

    #[test]
    fn joined_line_breaks_keep_indentation() {
        assert_eq!(
            join_line_breaks("\n  Martillado<br>\n    repujado  "),
            "Martillado \n    repujado"
        );
    }

    #[test]
    fn ordinals_count_per_role() {
        let mut page = PageFragments::new();
        page.push_text(Role::Link, "a")
            .push_markup(Role::Detail, "b")
            .push_text(Role::Link, "c");
        let ordinals: Vec<(Role, usize)> = page.iter().map(|f| (f.role, f.ordinal)).collect();
        assert_eq!(
            ordinals,
            vec![(Role::Link, 0), (Role::Detail, 0), (Role::Link, 1)]
        );
    }

    #[test]
    fn relative_links_are_resolved() {
        let base = Url::parse("https://example.org/page/list?pgn=1").ok();
        assert_eq!(
            absolutize_url(base.as_ref(), "/objeto/42"),
            "https://example.org/objeto/42"
        );
        assert_eq!(
            absolutize_url(base.as_ref(), "https://other.org/x"),
            "https://other.org/x"
        );
    }
}
