//! Detail page dispatch
//!
//! Extracts vitals and evolutions from an entry's detail page, computes its
//! effectiveness profile and decides whether the entry is complete or needs
//! sub-resource fetches first.

use crate::effectiveness;
use crate::error::Result;
use crate::extract::{self, first_links, selector, Link, LinkStrategy};
use crate::listing::IdentityLookup;
use dex_common::types::{EntityKey, EntityRecord, EntityStub, Evolution};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Outcome of dispatching one detail page
#[derive(Debug)]
pub enum Dispatch {
    /// No sub-resources: the record goes straight to the final store
    Complete(EntityRecord),
    /// One fetch per link must arrive before the record is complete
    Pending {
        record: EntityRecord,
        requests: Vec<SubResourceRequest>,
    },
}

/// Continuation context carried by one sub-resource fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubResourceRequest {
    pub key: EntityKey,
    pub name: String,
    pub url: Url,
}

/// Parser for detail pages
pub struct DetailParser {
    vitals_row: Selector,
    header: Selector,
    cell: Selector,
    evo_card: Selector,
    evo_name: Selector,
    evo_anchor: Selector,
    evo_small: Selector,
    evo_item: Selector,
    height: Regex,
    weight: Regex,
    level: Regex,
    link_strategies: Vec<Box<dyn LinkStrategy>>,
}

impl DetailParser {
    pub fn new() -> Result<Self> {
        Self::with_link_strategies(extract::ability_link_strategies()?)
    }

    pub fn with_link_strategies(link_strategies: Vec<Box<dyn LinkStrategy>>) -> Result<Self> {
        Ok(Self {
            vitals_row: selector(".vitals-table tr")?,
            header: selector("th")?,
            cell: selector("td")?,
            evo_card: selector(".infocard-list-evo .infocard")?,
            evo_name: selector(".ent-name")?,
            evo_anchor: selector("a")?,
            evo_small: selector(".infocard-lg-data small")?,
            evo_item: selector(".infocard-lg-data small a")?,
            height: Regex::new(r"([\d.]+)\s*m")?,
            weight: Regex::new(r"([\d.]+)\s*kg")?,
            level: Regex::new(r"Level (\d+)")?,
            link_strategies,
        })
    }

    /// Build the record for `stub` from its detail page and decide what is left to fetch
    pub fn dispatch(&self, stub: EntityStub, html: &str, lookup: &IdentityLookup) -> Dispatch {
        let document = Html::parse_document(html);
        let page_url = stub.url.clone();
        let mut record = EntityRecord::from_stub(stub);

        let (height_cm, weight_kg) = self.vitals(&document);
        record.height_cm = height_cm;
        record.weight_kg = weight_kg;
        record.evolutions = self.evolutions(&document, &page_url, record.name(), lookup);
        record.type_effectiveness = effectiveness::profile_for(&record.stub.types);

        let links = first_links(&self.link_strategies, &document, &page_url);
        if links.is_empty() {
            debug!(name = %record.name(), "No sub-resources, entry complete");
            return Dispatch::Complete(record);
        }

        let key = record.key();
        let requests = links
            .into_iter()
            .map(|Link { name, url }| SubResourceRequest {
                key: key.clone(),
                name,
                url,
            })
            .collect();

        Dispatch::Pending { record, requests }
    }

    /// Height in centimeters and weight in kilograms from the first matching rows
    fn vitals(&self, document: &Html) -> (Option<f64>, Option<f64>) {
        let mut height_cm = None;
        let mut weight_kg = None;

        for row in document.select(&self.vitals_row) {
            let (Some(label), Some(value)) = (
                first_text(row, &self.header),
                first_text(row, &self.cell),
            ) else {
                continue;
            };

            if height_cm.is_none() && label.contains("Height") {
                height_cm = capture_number(&self.height, &value).map(|m| m * 100.0);
            } else if weight_kg.is_none() && label.contains("Weight") {
                weight_kg = capture_number(&self.weight, &value);
            }

            if height_cm.is_some() && weight_kg.is_some() {
                break;
            }
        }

        (height_cm, weight_kg)
    }

    fn evolutions(
        &self,
        document: &Html,
        page_url: &Url,
        own_name: &str,
        lookup: &IdentityLookup,
    ) -> Vec<Evolution> {
        let mut evolutions = Vec::new();

        for card in document.select(&self.evo_card) {
            let Some(name) = first_text(card, &self.evo_name) else {
                continue;
            };
            if name == own_name {
                continue;
            }

            let url = card
                .select(&self.evo_anchor)
                .find_map(|a| a.value().attr("href"))
                .and_then(|href| page_url.join(href).ok());

            let level = card
                .select(&self.evo_small)
                .map(|small| small.text().collect::<String>())
                .find_map(|text| self.level.captures(&text).map(|c| c[1].to_string()));

            let item = first_text(card, &self.evo_item);

            let number = lookup.resolve(&name);
            if number.is_none() {
                debug!(name = %name, "Unresolved evolution reference");
            }

            evolutions.push(Evolution {
                number,
                name,
                url,
                level,
                item,
            });
        }

        evolutions
    }
}

/// Trimmed text of the first element matching `selector` under `scope`
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let text = scope.select(selector).next()?.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn capture_number(pattern: &Regex, value: &str) -> Option<f64> {
    pattern.captures(value)?[1].parse().ok()
}
