use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::http::HttpClient;

use super::{SearchCandidate, SearchError, SearchSource};

/// Recipe detail pages live under `/recipe/<numeric id>/`.
static RECIPE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/recipe/\d+/").expect("Invalid recipe path regex"));

/// Rating counts rendered inside result cards, e.g. "1,234 Ratings" or "2.1K ratings".
static RATINGS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d[\d,.]*\s*k?\s*ratings?\b").expect("Invalid ratings regex")
});

/// Trailing attribution such as "Apple Pie by Jane Doe": a lowercase "by"
/// followed by one to four capitalised name words at the end of the text.
static TRAILING_BYLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+by\s+\p{Lu}[\p{L}'.\-]*(?:\s+\p{Lu}[\p{L}'.\-]*){0,3}$")
        .expect("Invalid byline regex")
});

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Invalid selector"));

/// Searches a recipe site's `/search?q=` page and keeps links to detail pages.
pub struct AllRecipesSearch<C> {
    client: C,
    base_url: Url,
}

impl<C: HttpClient> AllRecipesSearch<C> {
    pub fn new(client: C, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The search page URL for `query`.
    pub fn search_url(&self, query: &str) -> String {
        let mut url = self.base_url.clone();
        url.set_path("/search");
        url.set_fragment(None);
        url.query_pairs_mut().clear().append_pair("q", query.trim());
        url.to_string()
    }
}

#[async_trait]
impl<C: HttpClient> SearchSource for AllRecipesSearch<C> {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        let html = self.client.fetch_html(&self.search_url(query)).await?;
        let candidates = parse_search_results(&html, &self.base_url);
        tracing::debug!(query, found = candidates.len(), "search: parsed results");
        Ok(candidates)
    }
}

/// Extract recipe detail links from a search results page, in document order.
///
/// Relative links are resolved against `base` and lose their query and
/// fragment, so tracking parameters never make one page look like two.
/// Links to other sites, other paths and repeated URLs are skipped; a repeat
/// with text fills in an earlier empty title.
pub fn parse_search_results(html: &str, base: &Url) -> Vec<SearchCandidate> {
    let document = Html::parse_document(html);
    let mut candidates: Vec<SearchCandidate> = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut url) = base.join(href.trim()) else {
            continue;
        };
        if !is_recipe_detail(&url, base) {
            continue;
        }
        url.set_fragment(None);
        url.set_query(None);

        let title = clean_title(&card_text(anchor));

        match candidates.iter_mut().find(|c| c.url == url.as_str()) {
            Some(existing) => {
                if existing.title.is_empty() {
                    existing.title = title;
                }
            }
            None => candidates.push(SearchCandidate {
                title,
                url: url.to_string(),
            }),
        }
    }

    candidates
}

fn is_recipe_detail(url: &Url, base: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
        && same_site(url, base)
        && RECIPE_PATH_REGEX.is_match(url.path())
}

fn same_site(url: &Url, base: &Url) -> bool {
    let strip = |host: &str| host.trim_start_matches("www.").to_ascii_lowercase();
    match (url.host_str(), base.host_str()) {
        (Some(a), Some(b)) => strip(a) == strip(b),
        _ => false,
    }
}

/// Text of a result card, leaving out author byline elements.
fn card_text(anchor: ElementRef<'_>) -> String {
    anchor
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != anchor.id())
                .any(|ancestor| is_byline_element(ancestor.value()))
        })
        .map(|(_, text)| &**text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_byline_element(node: &Node) -> bool {
    node.as_element()
        .and_then(|element| element.attr("class"))
        .map(|class| {
            let class = class.to_ascii_lowercase();
            class.contains("byline") || class.contains("author")
        })
        .unwrap_or(false)
}

/// Turn a result card's text into a display title.
///
/// Cards read "<title> <rating count> <meta>", so the title is whatever
/// precedes the first rating count. Without a rating count only a trailing
/// lowercase "by <Name>" attribution is removed; a capitalised "By" inside
/// title-case text belongs to the title.
pub fn clean_title(raw: &str) -> String {
    let text = WHITESPACE_REGEX.replace_all(raw, " ");
    let text = text.trim();

    if let Some(rating) = RATINGS_REGEX.find(text) {
        let head = text[..rating.start()].trim();
        if !head.is_empty() {
            return head.to_string();
        }
        let tail = RATINGS_REGEX.replace_all(&text[rating.end()..], " ");
        return strip_byline(&tail);
    }

    strip_byline(text)
}

fn strip_byline(text: &str) -> String {
    let text = text.trim();
    let title = match TRAILING_BYLINE_REGEX.find(text) {
        Some(byline) => &text[..byline.start()],
        None => text,
    };
    WHITESPACE_REGEX.replace_all(title, " ").trim().to_string()
}
