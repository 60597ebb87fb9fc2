use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::error::ApiError;

const NEWS_CATEGORY: &str = "Automotive";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub imagelink: String,
    pub desc: String,
    pub newslink: String,
    pub time: String,
    pub cat: String,
}

/// Fetches the configured news page and scrapes its article list.
pub async fn fetch_news(client: &Client, url: &str) -> Result<Vec<NewsItem>, ApiError> {
    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|err| ApiError::from_upstream("news source", err))?
        .error_for_status()
        .map_err(|err| ApiError::from_upstream("news source", err))?;
    let body = response
        .text()
        .await
        .map_err(|err| ApiError::from_upstream("news source", err))?;

    let items = scrape_news(&body, url);
    tracing::debug!(count = items.len(), "scraped news items");
    Ok(items)
}

/// Extracts article entries from a news listing page.
///
/// Articles without both a title and a link are dropped; relative links are
/// resolved against the page they were scraped from.
pub fn scrape_news(html: &str, base_url: &str) -> Vec<NewsItem> {
    let document = Html::parse_document(html);
    let article_sel = Selector::parse("article, .story-box, .eachStory").unwrap();
    let title_sel = Selector::parse("h2, h3, .title").unwrap();
    let link_sel = Selector::parse("a").unwrap();
    let image_sel = Selector::parse("img").unwrap();
    let desc_sel = Selector::parse("p, .summary").unwrap();
    let time_sel = Selector::parse(".time, .date, time").unwrap();
    let whitespace = Regex::new(r"\s+").unwrap();

    let mut items = Vec::new();
    for article in document.select(&article_sel) {
        let title = article
            .select(&title_sel)
            .next()
            .map(|node| collapse(&whitespace, &node.text().collect::<String>()))
            .unwrap_or_default();
        let link = article
            .select(&link_sel)
            .find_map(|node| node.value().attr("href"))
            .unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            continue;
        }

        let image = article
            .select(&image_sel)
            .next()
            .and_then(|node| node.value().attr("src").or_else(|| node.value().attr("data-src")))
            .unwrap_or_default();
        let desc = article
            .select(&desc_sel)
            .next()
            .map(|node| collapse(&whitespace, &node.text().collect::<String>()))
            .unwrap_or_default();
        let time = article
            .select(&time_sel)
            .next()
            .map(|node| collapse(&whitespace, &node.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "Recently".to_string());

        items.push(NewsItem {
            title,
            imagelink: resolve_link(base_url, image),
            desc,
            newslink: resolve_link(base_url, link),
            time,
            cat: NEWS_CATEGORY.to_string(),
        });
    }
    items
}

fn collapse(whitespace: &Regex, text: &str) -> String {
    whitespace.replace_all(text.trim(), " ").to_string()
}

fn resolve_link(base: &str, link: &str) -> String {
    if link.is_empty() || link.starts_with("http") {
        link.to_string()
    } else {
        format!("{base}{link}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <article>
            <h2> Natural gas prices
                dip again </h2>
            <a href="https://example.com/story-1">read</a>
            <img src="https://example.com/img-1.jpg">
            <p>Prices fell for a third week.</p>
            <span class="time">2 hours ago</span>
          </article>
          <div class="eachStory">
            <h3>New CNG corridor announced</h3>
            <a href="/story-2">read</a>
            <img data-src="/img-2.jpg">
            <p>Seventeen new stations planned.</p>
          </div>
          <article>
            <h2>Headline without a link</h2>
          </article>
          <article>
            <a href="/no-title">read</a>
          </article>
        </body></html>
    "#;

    #[test]
    fn scrapes_titled_linked_articles_only() {
        let items = scrape_news(PAGE, "https://news.example.com");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].newslink, "https://example.com/story-1");
        assert_eq!(items[1].title, "New CNG corridor announced");
    }

    #[test]
    fn relative_links_resolve_against_the_source() {
        let items = scrape_news(PAGE, "https://news.example.com");
        assert_eq!(items[1].newslink, "https://news.example.com/story-2");
        assert_eq!(items[1].imagelink, "https://news.example.com/img-2.jpg");
    }

    #[test]
    fn data_src_is_the_image_fallback() {
        let items = scrape_news(PAGE, "https://news.example.com");
        assert_eq!(items[0].imagelink, "https://example.com/img-1.jpg");
        assert!(items[1].imagelink.ends_with("/img-2.jpg"));
    }

    #[test]
    fn missing_time_falls_back_to_recently() {
        let items = scrape_news(PAGE, "https://news.example.com");
        assert_eq!(items[0].time, "2 hours ago");
        assert_eq!(items[1].time, "Recently");
    }

    #[test]
    fn titles_are_whitespace_collapsed() {
        let items = scrape_news(PAGE, "https://news.example.com");
        assert_eq!(items[0].title, "Natural gas prices dip again");
        assert_eq!(items[0].cat, "Automotive");
    }

    #[test]
    fn empty_page_scrapes_to_nothing() {
        assert!(scrape_news("<html></html>", "https://news.example.com").is_empty());
    }
}
