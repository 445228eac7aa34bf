//! Extraction strategies
//!
//! A strategy is one way of locating links or text fragments in a parsed
//! document. Strategies are tried in priority order and the first one that
//! yields something wins; results are never merged across strategies.

use crate::error::{HarvestError, Result};
use scraper::{ElementRef, Html, Selector};
use std::fmt::Debug;
use url::Url;

/// Fragments must be longer than this (after trimming) to count as a description.
pub const MIN_DESCRIPTION_CHARS: usize = 15;

/// Compile a CSS selector
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvestError::selector(css, e))
}

/// A named link found in a document, already resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub url: Url,
}

/// Locates links in a document
pub trait LinkStrategy: Send + Sync + Debug {
    fn links(&self, document: &Html, base: &Url) -> Vec<Link>;
}

/// Locates text fragments in a document, in document order
pub trait TextStrategy: Send + Sync + Debug {
    fn fragments(&self, document: &Html) -> Vec<String>;
}

/// Anchors inside the cell right after a header cell whose text contains `label`
#[derive(Debug)]
pub struct LabeledCellLinks {
    label: String,
    header: Selector,
    anchor: Selector,
}

impl LabeledCellLinks {
    pub fn new(label: impl Into<String>) -> Result<Self> {
        Ok(Self {
            label: label.into(),
            header: selector("th")?,
            anchor: selector("a")?,
        })
    }
}

impl LinkStrategy for LabeledCellLinks {
    fn links(&self, document: &Html, base: &Url) -> Vec<Link> {
        let mut links = Vec::new();

        for header in document.select(&self.header) {
            if !header.text().collect::<String>().contains(&self.label) {
                continue;
            }

            let Some(cell) = header.next_siblings().find_map(ElementRef::wrap) else {
                continue;
            };
            if cell.value().name() != "td" {
                continue;
            }

            links.extend(cell.select(&self.anchor).filter_map(|a| to_link(a, base)));
        }

        links
    }
}

/// Anchors matched directly by a CSS selector
#[derive(Debug)]
pub struct SelectorLinks {
    selector: Selector,
}

impl SelectorLinks {
    pub fn new(css: &str) -> Result<Self> {
        Ok(Self {
            selector: selector(css)?,
        })
    }
}

impl LinkStrategy for SelectorLinks {
    fn links(&self, document: &Html, base: &Url) -> Vec<Link> {
        document
            .select(&self.selector)
            .filter_map(|a| to_link(a, base))
            .collect()
    }
}

/// Direct text children of every element matched by a CSS selector
#[derive(Debug)]
pub struct OwnText {
    selector: Selector,
}

impl OwnText {
    pub fn new(css: &str) -> Result<Self> {
        Ok(Self {
            selector: selector(css)?,
        })
    }
}

impl TextStrategy for OwnText {
    fn fragments(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.selector)
            .flat_map(own_text_nodes)
            .collect()
    }
}

fn own_text_nodes(element: ElementRef<'_>) -> Vec<String> {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| String::from(&**t)))
        .collect()
}

/// Links without a usable name or href are not links
fn to_link(anchor: ElementRef<'_>, base: &Url) -> Option<Link> {
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let own = own_text_nodes(anchor).concat();
    let name = if own.trim().is_empty() {
        anchor.text().collect::<String>()
    } else {
        own
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let url = base.join(href).ok()?;
    Some(Link {
        name: name.to_string(),
        url,
    })
}

/// Links from the first strategy that yields any
pub fn first_links(strategies: &[Box<dyn LinkStrategy>], document: &Html, base: &Url) -> Vec<Link> {
    strategies
        .iter()
        .map(|s| s.links(document, base))
        .find(|links| !links.is_empty())
        .unwrap_or_default()
}

/// Whether a fragment reads like a description
pub fn accept_description(fragment: &str) -> Option<&str> {
    let trimmed = fragment.trim();
    let long_enough = trimmed.chars().count() > MIN_DESCRIPTION_CHARS;
    let has_letters = trimmed.chars().any(char::is_alphabetic);
    (long_enough && has_letters).then_some(trimmed)
}

/// First accepted fragment of the first strategy that has one
pub fn first_description(strategies: &[Box<dyn TextStrategy>], document: &Html) -> Option<String> {
    strategies.iter().find_map(|strategy| {
        strategy
            .fragments(document)
            .iter()
            .find_map(|f| accept_description(f).map(str::to_string))
    })
}

/// Default link strategies for a detail page's ability links
pub fn ability_link_strategies() -> Result<Vec<Box<dyn LinkStrategy>>> {
    Ok(vec![
        Box::new(LabeledCellLinks::new("Abilities")?),
        Box::new(LabeledCellLinks::new("Ability")?),
        Box::new(SelectorLinks::new(r#"a[href*="/ability/"].ent-name"#)?),
    ])
}

/// Default text strategies for an ability page's description
pub fn description_strategies() -> Result<Vec<Box<dyn TextStrategy>>> {
    Ok(vec![
        Box::new(OwnText::new("main .grid-col p")?),
        Box::new(OwnText::new(".grid-col p")?),
        Box::new(OwnText::new("main p")?),
        Box::new(OwnText::new("p")?),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://pokemondb.net/pokedex/bulbasaur").unwrap()
    }

    #[test]
    fn test_labeled_cell_links() {
        let html = Html::parse_document(
            r#"<table class="vitals-table">
                <tr><th>Species</th><td><a href="/x">Seed</a></td></tr>
                <tr><th>Abilities</th><td>1. <a href="/ability/overgrow">Overgrow</a><br>
                    <small><a href="/ability/chlorophyll">Chlorophyll</a> (hidden ability)</small></td></tr>
            </table>"#,
        );

        let links = LabeledCellLinks::new("Abilities").unwrap().links(&html, &base());
        let names: Vec<_> = links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Overgrow", "Chlorophyll"]);
        assert_eq!(links[0].url.as_str(), "https://pokemondb.net/ability/overgrow");
    }

    #[test]
    fn test_first_links_does_not_merge() {
        let html = Html::parse_document(
            r#"<table><tr><th>Ability</th><td><a href="/ability/levitate">Levitate</a></td></tr></table>
               <a class="ent-name" href="/ability/cursed-body">Cursed Body</a>"#,
        );

        let links = first_links(&ability_link_strategies().unwrap(), &html, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Levitate");
    }

    #[test]
    fn test_falls_back_to_selector_strategy() {
        let html = Html::parse_document(
            r#"<div><a class="ent-name" href="/ability/stench">Stench</a>
               <a class="ent-name" href="/pokedex/grimer">Grimer</a></div>"#,
        );

        let links = first_links(&ability_link_strategies().unwrap(), &html, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url.as_str(), "https://pokemondb.net/ability/stench");
    }

    #[test]
    fn test_links_without_name_or_href_are_dropped() {
        let html = Html::parse_document(
            r#"<table><tr><th>Abilities</th><td><a href="/ability/blaze"> </a><a>Solar Power</a></td></tr></table>"#,
        );
        assert!(first_links(&ability_link_strategies().unwrap(), &html, &base()).is_empty());
    }

    #[test]
    fn test_accept_description() {
        assert_eq!(accept_description("  Short text  "), None);
        assert_eq!(accept_description("1234567890123456789"), None);
        assert_eq!(
            accept_description("  Powers up Grass-type moves.  "),
            Some("Powers up Grass-type moves.")
        );
        // exactly 15 characters is not enough
        assert_eq!(accept_description("abcdefghijklmno"), None);
        assert!(accept_description("abcdefghijklmnop").is_some());
    }

    #[test]
    fn test_description_prefers_earlier_strategy() {
        let html = Html::parse_document(
            r#"<main><p>Site-wide paragraph that is long enough.</p>
               <div class="grid-col"><p>Powers up Grass-type moves when HP is low.</p></div></main>"#,
        );

        let description = first_description(&description_strategies().unwrap(), &html);
        assert_eq!(
            description.as_deref(),
            Some("Powers up Grass-type moves when HP is low.")
        );
    }

    #[test]
    fn test_description_skips_short_fragments_within_strategy() {
        let html = Html::parse_document(
            r#"<main><div class="grid-col"><p>Gen 3</p><p>   </p>
               <p>Boosts the power of Fire-type moves in a pinch.</p></div></main>"#,
        );

        let description = first_description(&description_strategies().unwrap(), &html);
        assert_eq!(
            description.as_deref(),
            Some("Boosts the power of Fire-type moves in a pinch.")
        );
    }

    #[test]
    fn test_description_uses_own_text_only() {
        let html = Html::parse_document(
            r#"<p><a href="/x">A link text that is quite long</a> ok</p>"#,
        );
        assert_eq!(first_description(&description_strategies().unwrap(), &html), None);
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(selector("p[["), Err(HarvestError::Selector { .. })));
    }
}
