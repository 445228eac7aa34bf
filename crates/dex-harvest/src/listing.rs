//! Listing extraction
//!
//! Turns the catalog listing page into entity stubs plus the name → identity
//! lookup table used to resolve evolution cross-references. The table is
//! complete before any stub is dispatched.

use crate::error::{HarvestError, Result};
use crate::extract::selector;
use dex_common::document;
use dex_common::types::EntityStub;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Display name → normalized identity
#[derive(Debug, Clone, Default)]
pub struct IdentityLookup {
    by_name: HashMap<String, String>,
}

impl IdentityLookup {
    /// Build from stubs; the first stub carrying a name wins
    pub fn build(stubs: &[EntityStub]) -> Self {
        let mut by_name = HashMap::new();
        for stub in stubs {
            if let Some(number) = &stub.number {
                by_name
                    .entry(stub.name.clone())
                    .or_insert_with(|| number.clone());
            }
        }
        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<String> {
        self.by_name.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Parsed listing page
#[derive(Debug, Clone)]
pub struct Listing {
    pub stubs: Vec<EntityStub>,
    pub lookup: IdentityLookup,
}

impl Listing {
    /// Wrap stubs loaded from elsewhere (e.g. a previously exported listing)
    pub fn from_stubs(stubs: Vec<EntityStub>) -> Self {
        let lookup = IdentityLookup::build(&stubs);
        Self { stubs, lookup }
    }

    /// Load a listing document previously written by [`Listing::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut stubs: Vec<EntityStub> = document::read_json(path.as_ref())?;
        if stubs.is_empty() {
            return Err(HarvestError::Listing(format!(
                "listing document {} has no entries",
                path.as_ref().display()
            )));
        }

        // exported listings may carry "" or a "#" prefix
        for stub in &mut stubs {
            stub.number = stub.number.as_deref().and_then(normalize_identity);
        }

        info!(path = %path.as_ref().display(), stubs = stubs.len(), "Loaded listing");
        Ok(Self::from_stubs(stubs))
    }

    /// Write the stubs as a JSON array of `number, name, url, types`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        document::write_json_pretty(path.as_ref(), &self.stubs)?;
        info!(path = %path.as_ref().display(), stubs = self.stubs.len(), "Wrote listing");
        Ok(())
    }
}

/// Strip everything before the first digit; empty means no identity
pub fn normalize_identity(raw: &str) -> Option<String> {
    let digits = raw.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
    (!digits.is_empty()).then(|| digits.trim().to_string())
}

/// Parser for the listing table
pub struct ListingExtractor {
    row: Selector,
    number_cell: Selector,
    name_link: Selector,
    type_links: Selector,
}

impl ListingExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            row: selector("table#pokedex tr")?,
            number_cell: selector("td:nth-child(1)")?,
            name_link: selector("td:nth-child(2) a")?,
            type_links: selector("td:nth-child(3) a")?,
        })
    }

    /// Parse the listing page fetched from `page_url`
    pub fn parse(&self, html: &str, page_url: &Url) -> Result<Listing> {
        let document = Html::parse_document(html);

        let stubs: Vec<EntityStub> = document
            .select(&self.row)
            .skip(1)
            .filter_map(|row| self.parse_row(row, page_url))
            .collect();

        if stubs.is_empty() {
            return Err(HarvestError::Listing(format!(
                "no entries found in listing at {}",
                page_url
            )));
        }

        let listing = Listing::from_stubs(stubs);

        info!(
            stubs = listing.stubs.len(),
            names = listing.lookup.len(),
            "Parsed listing"
        );

        Ok(listing)
    }

    fn parse_row(&self, row: ElementRef<'_>, page_url: &Url) -> Option<EntityStub> {
        let number = row
            .select(&self.number_cell)
            .next()
            .and_then(|cell| normalize_identity(&cell.text().collect::<String>()));

        let link = row.select(&self.name_link).next()?;
        let name = link.text().collect::<String>().trim().to_string();
        let href = link.value().attr("href").map(str::trim).unwrap_or_default();

        if name.is_empty() || href.is_empty() {
            debug!(name = %name, "Dropping listing row without name or location");
            return None;
        }

        let url = match page_url.join(href) {
            Ok(url) => url,
            Err(e) => {
                debug!(name = %name, href = %href, error = %e, "Dropping listing row with bad location");
                return None;
            },
        };

        let types = row
            .select(&self.type_links)
            .map(|a| a.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Some(EntityStub {
            number,
            name,
            url,
            types,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LISTING: &str = r##"<html><body>
<table id="pokedex">
  <thead><tr><th>#</th><th>Name</th><th>Type</th><th>Total</th></tr></thead>
  <tbody>
    <tr>
      <td class="cell-num"><span class="infocard-cell-data">0001</span></td>
      <td class="cell-name"><a class="ent-name" href="/pokedex/bulbasaur">Bulbasaur</a></td>
      <td class="cell-icon"><a class="type-icon type-grass" href="/type/grass">Grass</a><br><a class="type-icon type-poison" href="/type/poison">Poison</a></td>
      <td>318</td>
    </tr>
    <tr>
      <td class="cell-num">#0003</td>
      <td class="cell-name"><a class="ent-name" href="/pokedex/venusaur">Venusaur</a></td>
      <td class="cell-icon"><a href="/type/grass">Grass</a><a href="/type/poison">Poison</a></td>
      <td>525</td>
    </tr>
    <tr>
      <td class="cell-num">0003</td>
      <td class="cell-name"><a class="ent-name" href="/pokedex/venusaur">Venusaur</a><br><small>Mega Venusaur</small></td>
      <td class="cell-icon"><a href="/type/grass">Grass</a><a href="/type/poison">Poison</a></td>
      <td>625</td>
    </tr>
    <tr>
      <td class="cell-num">0004</td>
      <td class="cell-name">Charmander</td>
      <td class="cell-icon"><a href="/type/fire">Fire</a></td>
      <td>309</td>
    </tr>
    <tr>
      <td class="cell-num"></td>
      <td class="cell-name"><a class="ent-name" href="/pokedex/missingno">MissingNo.</a></td>
      <td class="cell-icon"><a href="/type/normal">Normal</a></td>
      <td>0</td>
    </tr>
  </tbody>
</table>
</body></html>"##;

    fn page() -> Url {
        Url::parse("https://pokemondb.net/pokedex/all").unwrap()
    }

    #[test]
    fn test_normalize_identity() {
        assert_eq!(normalize_identity("#0001").as_deref(), Some("0001"));
        assert_eq!(normalize_identity("  No. 25 ").as_deref(), Some("25"));
        assert_eq!(normalize_identity("#"), None);
        assert_eq!(normalize_identity(""), None);
    }

    #[test]
    fn test_parse_listing() {
        let listing = ListingExtractor::new().unwrap().parse(LISTING, &page()).unwrap();

        // Charmander has no link and is dropped; the header row is skipped
        assert_eq!(listing.stubs.len(), 4);

        let bulbasaur = &listing.stubs[0];
        assert_eq!(bulbasaur.number.as_deref(), Some("0001"));
        assert_eq!(bulbasaur.name, "Bulbasaur");
        assert_eq!(bulbasaur.url.as_str(), "https://pokemondb.net/pokedex/bulbasaur");
        assert_eq!(bulbasaur.types, vec!["Grass", "Poison"]);

        assert_eq!(listing.stubs[1].number.as_deref(), Some("0003"));
        assert_eq!(listing.stubs[3].number, None);
        assert_eq!(listing.stubs[3].name, "MissingNo.");
    }

    #[test]
    fn test_lookup_table() {
        let listing = ListingExtractor::new().unwrap().parse(LISTING, &page()).unwrap();

        assert_eq!(listing.lookup.resolve("Bulbasaur").as_deref(), Some("0001"));
        assert_eq!(listing.lookup.resolve("Venusaur").as_deref(), Some("0003"));
        assert_eq!(listing.lookup.resolve("Charmander"), None);
        assert_eq!(listing.lookup.resolve("MissingNo."), None);
        assert_eq!(listing.lookup.len(), 2);
    }

    #[test]
    fn test_saved_listing_reloads_with_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pokemons.json");

        let listing = ListingExtractor::new().unwrap().parse(LISTING, &page()).unwrap();
        listing.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["number"], "0001");
        assert_eq!(raw[0]["types"][0], "Grass");

        let reloaded = Listing::load(&path).unwrap();
        assert_eq!(reloaded.stubs, listing.stubs);
        assert_eq!(reloaded.lookup.resolve("Venusaur").as_deref(), Some("0003"));
    }

    #[test]
    fn test_loaded_listing_normalizes_identities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pokemons.json");
        std::fs::write(
            &path,
            r##"[
  {"number": "", "name": "Alpha", "url": "https://pokemondb.net/pokedex/alpha", "types": ["Normal"]},
  {"number": "", "name": "Beta", "url": "https://pokemondb.net/pokedex/beta", "types": ["Normal"]},
  {"number": "#0007", "name": "Squirtle", "url": "https://pokemondb.net/pokedex/squirtle", "types": ["Water"]}
]"##,
        )
        .unwrap();

        let listing = Listing::load(&path).unwrap();
        let numbers: Vec<_> = listing.stubs.iter().map(|s| s.number.as_deref()).collect();
        assert_eq!(numbers, vec![None, None, Some("0007")]);
        assert_eq!(listing.lookup.resolve("Squirtle").as_deref(), Some("0007"));
        assert_eq!(listing.lookup.resolve("Alpha"), None);

        // unnumbered entries stay distinct in the final store
        let mut store = crate::store::FinalStore::new();
        for stub in listing.stubs {
            assert_eq!(
                store.put(dex_common::types::EntityRecord::from_stub(stub)),
                crate::store::PutOutcome::Stored
            );
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_empty_listing_is_an_error() {
        let err = ListingExtractor::new()
            .unwrap()
            .parse("<html><body><p>Maintenance</p></body></html>", &page())
            .unwrap_err();
        assert!(matches!(err, HarvestError::Listing(_)));
    }
}
