//! Product feed import.
//!
//! Parses a small XML feed of products using a streaming reader. The
//! reader never resolves external entities, and any document carrying a
//! DOCTYPE is rejected outright before the first element is examined.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

/// Hard cap on items per feed.
const MAX_FEED_ITEMS: usize = 100;

/// Errors from feed parsing.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The document declares a DOCTYPE.
    #[error("DOCTYPE declarations are not accepted")]
    DoctypeForbidden,

    /// The XML is malformed.
    #[error("malformed feed: {0}")]
    Malformed(String),

    /// More items than the cap.
    #[error("feed exceeds {MAX_FEED_ITEMS} items")]
    TooManyItems,

    /// An item is missing a required field or has a bad value.
    #[error("invalid item at position {position}: {reason}")]
    InvalidItem { position: usize, reason: String },
}

/// One product parsed from a feed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FeedProduct {
    pub title: String,
    pub sku: String,
    pub price_cents: i64,
}

/// Parse a product feed document.
///
/// Expects `<feed><product><title/><sku/><price_cents/></product>…</feed>`.
/// Unknown elements are skipped.
///
/// # Errors
///
/// Returns `FeedError::DoctypeForbidden` for any document with a DTD,
/// `FeedError::Malformed` for XML errors, and `FeedError::InvalidItem`
/// for products with missing or unparseable fields.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedProduct>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut products = Vec::new();
    let mut current: Option<PartialProduct> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Err(err) => return Err(FeedError::Malformed(err.to_string())),
            Ok(Event::DocType(_)) => return Err(FeedError::DoctypeForbidden),
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => match start.name().as_ref() {
                b"product" => {
                    if products.len() >= MAX_FEED_ITEMS {
                        return Err(FeedError::TooManyItems);
                    }
                    current = Some(PartialProduct::default());
                }
                b"title" => field = Some(Field::Title),
                b"sku" => field = Some(Field::Sku),
                b"price_cents" => field = Some(Field::PriceCents),
                _ => field = None,
            },
            Ok(Event::Text(text)) => {
                if let (Some(partial), Some(field)) = (current.as_mut(), field) {
                    let value = text
                        .unescape()
                        .map_err(|err| FeedError::Malformed(err.to_string()))?;
                    match field {
                        Field::Title => partial.title = Some(value.into_owned()),
                        Field::Sku => partial.sku = Some(value.into_owned()),
                        Field::PriceCents => partial.price_cents = Some(value.into_owned()),
                    }
                }
            }
            Ok(Event::End(end)) => match end.name().as_ref() {
                b"product" => {
                    if let Some(partial) = current.take() {
                        products.push(partial.finish(products.len() + 1)?);
                    }
                }
                _ => field = None,
            },
            Ok(_) => {}
        }
    }

    Ok(products)
}

#[derive(Clone, Copy)]
enum Field {
    Title,
    Sku,
    PriceCents,
}

#[derive(Default)]
struct PartialProduct {
    title: Option<String>,
    sku: Option<String>,
    price_cents: Option<String>,
}

impl PartialProduct {
    fn finish(self, position: usize) -> Result<FeedProduct, FeedError> {
        let title = self.title.filter(|t| !t.is_empty()).ok_or_else(|| {
            FeedError::InvalidItem {
                position,
                reason: "missing title".to_string(),
            }
        })?;
        let sku = self.sku.filter(|s| !s.is_empty()).ok_or_else(|| {
            FeedError::InvalidItem {
                position,
                reason: "missing sku".to_string(),
            }
        })?;
        let price_cents = self
            .price_cents
            .as_deref()
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 0)
            .ok_or_else(|| FeedError::InvalidItem {
                position,
                reason: "missing or invalid price_cents".to_string(),
            })?;

        Ok(FeedProduct {
            title,
            sku,
            price_cents,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_feed() {
        let xml = r"
            <feed>
              <product>
                <title>Field Mug</title>
                <sku>MUG-01</sku>
                <price_cents>1499</price_cents>
              </product>
              <product>
                <title>T-Shirt</title>
                <sku>TEE-02</sku>
                <price_cents>2399</price_cents>
              </product>
            </feed>";

        let products = parse_feed(xml).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(
            products[0],
            FeedProduct {
                title: "Field Mug".to_string(),
                sku: "MUG-01".to_string(),
                price_cents: 1499,
            }
        );
    }

    #[test]
    fn test_doctype_rejected() {
        let xml = r#"<?xml version="1.0"?>
            <!DOCTYPE feed [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
            <feed><product><title>&xxe;</title><sku>X</sku><price_cents>1</price_cents></product></feed>"#;

        assert!(matches!(parse_feed(xml), Err(FeedError::DoctypeForbidden)));
    }

    #[test]
    fn test_doctype_without_entities_still_rejected() {
        let xml = "<!DOCTYPE feed><feed></feed>";
        assert!(matches!(parse_feed(xml), Err(FeedError::DoctypeForbidden)));
    }

    #[test]
    fn test_entity_escapes_are_decoded() {
        let xml = "<feed><product><title>Mug &amp; Co</title><sku>MUG</sku><price_cents>100</price_cents></product></feed>";
        let products = parse_feed(xml).unwrap();
        assert_eq!(products[0].title, "Mug & Co");
    }

    #[test]
    fn test_missing_field_rejected() {
        let xml = "<feed><product><title>Mug</title><price_cents>100</price_cents></product></feed>";
        let err = parse_feed(xml).unwrap_err();
        assert!(matches!(err, FeedError::InvalidItem { position: 1, .. }));
    }

    #[test]
    fn test_negative_price_rejected() {
        let xml = "<feed><product><title>Mug</title><sku>MUG</sku><price_cents>-5</price_cents></product></feed>";
        assert!(matches!(
            parse_feed(xml),
            Err(FeedError::InvalidItem { .. })
        ));
    }

    #[test]
    fn test_malformed_xml_rejected() {
        assert!(matches!(
            parse_feed("<feed><product>"),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn test_item_cap_enforced() {
        let mut xml = String::from("<feed>");
        for i in 0..=MAX_FEED_ITEMS {
            xml.push_str(&format!(
                "<product><title>P{i}</title><sku>S{i}</sku><price_cents>1</price_cents></product>"
            ));
        }
        xml.push_str("</feed>");

        assert!(matches!(parse_feed(&xml), Err(FeedError::TooManyItems)));
    }
}
