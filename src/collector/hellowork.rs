use crate::config::CollectorConfig;
use crate::error::Result;
use crate::types::{ListingSource, RawListing};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const HELLOWORK_SOURCE: &str = "hellowork";

const SEARCH_URL: &str = "https://www.hellowork.com/fr-fr/emploi/recherche.html";

// A browser User-Agent keeps the basic bot filter quiet
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// First run of digits (with grouping spaces) up to the € sign and the rest
// of the line
static SALARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9][0-9\s]*€[^\n]*").unwrap());

static CARD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-cy='serpCard']").unwrap());
static H3_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static H3_P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h3 p").unwrap());
static LOCATION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-cy='localisationCard']").unwrap());
static CONTRACT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-cy='contractCard']").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

pub struct HelloWorkCrawler {
    client: reqwest::Client,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl HelloWorkCrawler {
    pub fn new() -> Self {
        Self::with_config(&CollectorConfig::default())
    }

    pub fn with_config(config: &CollectorConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("reqwest client with static configuration");
        Self {
            client,
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    async fn fetch_page(&self, query: &str, page: usize) -> Result<(String, String)> {
        let request = self
            .client
            .get(SEARCH_URL)
            .query(&[("k", query), ("p", &page.to_string())])
            .build()?;
        let page_url = request.url().to_string();
        let response = self.client.execute(request).await?.error_for_status()?;
        let html = response.text().await?;
        Ok((html, page_url))
    }

    // Randomized pause between pages, the site blocks hammering IPs
    async fn pause(&self) {
        let delay_ms = rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

impl Default for HelloWorkCrawler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ListingSource for HelloWorkCrawler {
    fn source_name(&self) -> &'static str {
        HELLOWORK_SOURCE
    }

    #[instrument(skip(self))]
    async fn fetch_listings(&self, query: &str, target: usize) -> Result<Vec<RawListing>> {
        let scraped_at = chrono::Utc::now().to_rfc3339();
        let mut listings: Vec<RawListing> = Vec::new();
        let mut page = 1;

        while listings.len() < target {
            info!("Page {} | {} listings collected so far", page, listings.len());

            let (html, page_url) = match self.fetch_page(query, page).await {
                Ok(fetched) => fetched,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    warn!("Stopping at page {}: {}", page, e);
                    break;
                }
            };

            let page_listings = parse_cards(&html, &page_url, &scraped_at);
            if page_listings.is_empty() {
                warn!("No job cards on page {} - end of results or layout change", page);
                break;
            }

            listings.extend(page_listings);
            if listings.len() >= target {
                break;
            }

            page += 1;
            self.pause().await;
        }

        listings.truncate(target);
        info!("Fetched {} listings from HelloWork", listings.len());
        Ok(listings)
    }
}

/// Extracts every job card from a results page. Cards without a title are
/// dropped, matching the raw listing invariant.
fn parse_cards(html: &str, page_url: &str, scraped_at: &str) -> Vec<RawListing> {
    let document = Html::parse_document(html);
    let mut listings = Vec::new();

    for card in document.select(&CARD_SELECTOR) {
        match extract_card(&card, page_url, scraped_at) {
            Some(listing) => listings.push(listing),
            None => debug!("Skipping card without a title"),
        }
    }

    listings
}

fn extract_card(card: &ElementRef, page_url: &str, scraped_at: &str) -> Option<RawListing> {
    let (title, company) = extract_title_company(card)?;

    let location = select_text(card, &LOCATION_SELECTOR).unwrap_or_else(|| "France".to_string());
    let contract =
        select_text(card, &CONTRACT_SELECTOR).unwrap_or_else(|| "Non spécifié".to_string());

    let card_text: String = card.text().collect();
    let salary = extract_salary(&card_text);

    let url = card
        .select(&LINK_SELECTOR)
        .find_map(|a| a.value().attr("href"))
        .map(absolute_url)
        .unwrap_or_else(|| page_url.to_string());

    Some(RawListing {
        title,
        company,
        location,
        contract,
        salary,
        url,
        scraped_at: scraped_at.to_string(),
    })
}

// Title and company are the first two <p> inside the card's <h3>; if the
// markup shifts, fall back to splitting the whole h3 text on newlines
fn extract_title_company(card: &ElementRef) -> Option<(String, String)> {
    let paragraphs: Vec<String> = card
        .select(&H3_P_SELECTOR)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .collect();

    let (title, company) = if paragraphs.len() >= 2 {
        (paragraphs[0].clone(), paragraphs[1].clone())
    } else {
        let h3 = card.select(&H3_SELECTOR).next()?;
        let full_text: String = h3.text().collect();
        let mut lines = full_text.lines().map(str::trim).filter(|l| !l.is_empty());
        (
            lines.next().unwrap_or("").to_string(),
            lines.next().unwrap_or("Inconnu").to_string(),
        )
    };

    if title.is_empty() {
        return None;
    }
    Some((title, company))
}

// The salary never has a dedicated element; grab the first €-bearing run
// of the card text
fn extract_salary(card_text: &str) -> String {
    if !card_text.contains('€') {
        return "Non affiché".to_string();
    }
    if let Some(found) = SALARY_RE.find(card_text) {
        return found.as_str().trim().to_string();
    }
    card_text
        .lines()
        .find(|line| line.contains('€'))
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "Non affiché".to_string())
}

// First non-empty text of the first element matching `selector`
fn select_text(card: &ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("https://www.hellowork.com{href}")
    }
}
