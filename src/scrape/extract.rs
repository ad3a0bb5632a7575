// src/scrape/extract.rs
//! Listing page -> `Book` records. Every field access has a fallback; nothing here fails.

use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::scrape::types::{Book, PRICE_SENTINEL, TITLE_SENTINEL};

const CURRENCY_SYMBOL: char = '£';

static ENTRY: Lazy<Selector> = Lazy::new(|| Selector::parse(".product_pod").unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static PRICE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".product_price .price_color").unwrap());

/// Remove the currency symbol and surrounding whitespace.
pub fn normalize_price(raw: &str) -> String {
    raw.replace(CURRENCY_SYMBOL, "").trim().to_string()
}

fn entry_title(entry: &ElementRef) -> String {
    entry
        .select(&HEADING)
        .next()
        .and_then(|h3| h3.select(&LINK).next())
        .and_then(|a| a.value().attr("title"))
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| TITLE_SENTINEL.to_string())
}

fn entry_price(entry: &ElementRef) -> String {
    let raw = entry
        .select(&PRICE)
        .next()
        .map(|p| p.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| PRICE_SENTINEL.to_string());
    normalize_price(&raw)
}

/// Extract one `Book` per `.product_pod`, in document order.
pub fn extract_books(html: &str) -> Vec<Book> {
    let t0 = std::time::Instant::now();
    let doc = Html::parse_document(html);

    let books: Vec<Book> = doc
        .select(&ENTRY)
        .map(|entry| Book {
            title: entry_title(&entry),
            price: entry_price(&entry),
        })
        .collect();

    histogram!("scrape_extract_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("scrape_books_extracted_total").increment(books.len() as u64);
    books
}
