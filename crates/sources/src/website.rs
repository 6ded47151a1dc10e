//! Website source reader.
//!
//! Extraction is a chain of pluggable strategies tried in order: a
//! conventional JSON product feed derived from the collection URL
//! first, then a best-effort scrape of the raw page (JSON-LD product
//! blocks, then storefront meta tags). Partial extraction is tolerated;
//! only when every strategy comes back empty-handed does the read fail
//! for the session.

use async_trait::async_trait;
use outfred_core::candidate::CandidateProduct;
use serde_json::Value;

use crate::api::{map_object, price_value};
use crate::client::SourceClient;
use crate::error::SourceError;

/// Conventional product-feed file name appended to the collection path.
const FEED_SUFFIX: &str = "products.json";

// ── Strategy chain ───────────────────────────────────────────────────

/// One way of turning a storefront URL into candidates.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(
        &self,
        client: &SourceClient,
        url: &str,
    ) -> Result<Vec<CandidateProduct>, SourceError>;
}

/// Reads a storefront URL by trying each strategy until one yields
/// candidates.
pub struct WebsiteReader {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for WebsiteReader {
    fn default() -> Self {
        Self {
            strategies: vec![Box::new(JsonFeedStrategy), Box::new(HtmlScrapeStrategy)],
        }
    }
}

impl WebsiteReader {
    /// Build a reader with a custom strategy chain.
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Try each strategy in order.
    ///
    /// The first strategy producing candidates wins. A strategy that
    /// succeeds but finds nothing keeps the result at "empty, not an
    /// error"; if every strategy errors, the last error stands for the
    /// session.
    pub async fn read(
        &self,
        client: &SourceClient,
        url: &str,
    ) -> Result<Vec<CandidateProduct>, SourceError> {
        let mut last_error: Option<SourceError> = None;
        let mut saw_empty_success = false;

        for strategy in &self.strategies {
            match strategy.extract(client, url).await {
                Ok(candidates) if !candidates.is_empty() => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        count = candidates.len(),
                        "Website extraction succeeded"
                    );
                    return Ok(candidates);
                }
                Ok(_) => {
                    tracing::debug!(strategy = strategy.name(), "Strategy found no products");
                    saw_empty_success = true;
                }
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "Strategy failed");
                    last_error = Some(e);
                }
            }
        }

        if saw_empty_success {
            return Ok(Vec::new());
        }
        Err(last_error.unwrap_or_else(|| {
            SourceError::FormatInvalid("no extraction strategy is configured".to_string())
        }))
    }
}

// ── JSON feed strategy ───────────────────────────────────────────────

/// Fetches the machine-readable product feed conventionally exposed
/// next to a storefront collection.
pub struct JsonFeedStrategy;

#[async_trait]
impl ExtractionStrategy for JsonFeedStrategy {
    fn name(&self) -> &'static str {
        "json-feed"
    }

    async fn extract(
        &self,
        client: &SourceClient,
        url: &str,
    ) -> Result<Vec<CandidateProduct>, SourceError> {
        let feed_url = feed_url_for(url)?;
        let payload = client.get_json(&feed_url, None).await?;
        parse_feed(&payload).ok_or_else(|| {
            SourceError::FormatInvalid(format!("{feed_url}: payload has no product list"))
        })
    }
}

/// Derive the feed URL: append the feed file to the collection path,
/// or to the site root when the URL has no collection segment. Query
/// strings are dropped.
pub fn feed_url_for(url: &str) -> Result<String, SourceError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| SourceError::FormatInvalid(format!("invalid source URL '{url}': {e}")))?;

    let path = parsed.path().trim_end_matches('/');
    let feed_path = match path.find("/collections/") {
        Some(idx) => {
            let prefix = &path[..idx];
            let slug = path[idx + "/collections/".len()..]
                .split('/')
                .next()
                .unwrap_or("");
            if slug.is_empty() {
                format!("/{FEED_SUFFIX}")
            } else {
                format!("{prefix}/collections/{slug}/{FEED_SUFFIX}")
            }
        }
        None => format!("/{FEED_SUFFIX}"),
    };

    let mut feed = parsed;
    feed.set_path(&feed_path);
    feed.set_query(None);
    feed.set_fragment(None);
    Ok(feed.to_string())
}

/// Decode a product-feed payload (`{"products": [...]}`).
///
/// Returns `None` when the payload has no product list, which sends
/// the reader to the next strategy.
pub fn parse_feed(payload: &Value) -> Option<Vec<CandidateProduct>> {
    let products = payload.get("products")?.as_array()?;
    Some(products.iter().map(feed_product).collect())
}

/// Feed entries mostly look like API products, but price and SKU often
/// live on the first variant and the image under `images[0].src`.
fn feed_product(value: &Value) -> CandidateProduct {
    let mut candidate = map_object(value);
    let Some(obj) = value.as_object() else {
        return candidate;
    };

    let first_variant = obj
        .get("variants")
        .and_then(Value::as_array)
        .and_then(|variants| variants.first());

    if candidate.price.is_none() {
        candidate.price = first_variant
            .and_then(|variant| variant.get("price"))
            .and_then(price_value);
    }
    if candidate.sku.is_none() {
        candidate.sku = first_variant
            .and_then(|variant| variant.get("sku"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|sku| !sku.is_empty())
            .map(String::from);
    }
    if candidate.image_url.is_none() {
        candidate.image_url = obj
            .get("images")
            .and_then(Value::as_array)
            .and_then(|images| images.first())
            .and_then(|image| image.get("src"))
            .and_then(Value::as_str)
            .map(String::from);
    }

    candidate
}

// ── HTML scrape strategy ─────────────────────────────────────────────

/// Heuristic fallback: fetch the raw page and pull product-like
/// structures out of it.
pub struct HtmlScrapeStrategy;

#[async_trait]
impl ExtractionStrategy for HtmlScrapeStrategy {
    fn name(&self) -> &'static str {
        "html-scrape"
    }

    async fn extract(
        &self,
        client: &SourceClient,
        url: &str,
    ) -> Result<Vec<CandidateProduct>, SourceError> {
        let html = client.get_text(url).await?;
        Ok(extract_from_html(&html))
    }
}

/// Pull candidates from raw page HTML.
///
/// Tries JSON-LD `Product` blocks first; when the page has none, falls
/// back to the storefront meta tags describing a single product.
pub fn extract_from_html(html: &str) -> Vec<CandidateProduct> {
    let mut candidates = Vec::new();

    let script_re = regex::Regex::new(
        r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("static regex");

    for block in script_re.captures_iter(html) {
        if let Ok(value) = serde_json::from_str::<Value>(block[1].trim()) {
            collect_ld_products(&value, &mut candidates);
        }
    }

    if candidates.is_empty() {
        if let Some(candidate) = candidate_from_meta_tags(html) {
            candidates.push(candidate);
        }
    }

    candidates
}

/// Walk a JSON-LD document collecting every `Product` node, including
/// ones nested under `@graph` or list wrappers.
fn collect_ld_products(value: &Value, out: &mut Vec<CandidateProduct>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_ld_products(item, out);
            }
        }
        Value::Object(obj) => {
            if is_ld_product(obj.get("@type")) {
                out.push(candidate_from_ld(value));
            }
            for key in ["@graph", "itemListElement", "item"] {
                if let Some(nested) = obj.get(key) {
                    collect_ld_products(nested, out);
                }
            }
        }
        _ => {}
    }
}

fn is_ld_product(type_field: Option<&Value>) -> bool {
    match type_field {
        Some(Value::String(s)) => s == "Product",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Product")),
        _ => false,
    }
}

fn candidate_from_ld(value: &Value) -> CandidateProduct {
    let mut candidate = map_object(value);

    // JSON-LD images may be a string, an array, or an ImageObject.
    if candidate.image_url.is_none() {
        candidate.image_url = match value.get("image") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(images)) => images.first().and_then(|image| match image {
                Value::String(s) => Some(s.clone()),
                other => other.get("url").and_then(Value::as_str).map(String::from),
            }),
            Some(other) => other.get("url").and_then(Value::as_str).map(String::from),
            None => None,
        };
    }

    // Price sits under offers (object or array; AggregateOffer uses
    // lowPrice).
    if candidate.price.is_none() {
        let offer = match value.get("offers") {
            Some(Value::Array(offers)) => offers.first(),
            Some(offer) => Some(offer),
            None => None,
        };
        candidate.price = offer.and_then(|offer| {
            offer
                .get("price")
                .or_else(|| offer.get("lowPrice"))
                .and_then(price_value)
        });
    }

    candidate
}

/// Single-product fallback from `og:` / `product:` meta tags.
fn candidate_from_meta_tags(html: &str) -> Option<CandidateProduct> {
    let name = meta_content(html, "og:title")?;
    Some(CandidateProduct {
        name,
        price: meta_content(html, "product:price:amount").and_then(|raw| raw.parse().ok()),
        image_url: meta_content(html, "og:image"),
        ..Default::default()
    })
}

fn meta_content(html: &str, property: &str) -> Option<String> {
    let escaped = regex::escape(property);
    // Attribute order varies between storefronts.
    let patterns = [
        format!(
            r#"(?is)<meta[^>]*property\s*=\s*["']{escaped}["'][^>]*content\s*=\s*["']([^"']*)["']"#
        ),
        format!(
            r#"(?is)<meta[^>]*content\s*=\s*["']([^"']*)["'][^>]*property\s*=\s*["']{escaped}["']"#
        ),
    ];

    patterns.iter().find_map(|pattern| {
        regex::Regex::new(pattern)
            .ok()
            .and_then(|re| re.captures(html))
            .map(|caps| caps[1].trim().to_string())
            .filter(|content| !content.is_empty())
    })
}

// ── Tests ────────────────────────────────────────────────────────────
