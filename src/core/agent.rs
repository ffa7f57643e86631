//! Agent - one line of text in, one reply out
//!
//! Ties the intent router to the stock and query resolvers for a single
//! shop. The only error that escapes is the store being unavailable;
//! everything else becomes reply text.

use serde::Serialize;

use super::error::Result;
use super::fuzzy;
use super::intent::{self, Intent};
use super::query::find_medicine;
use super::stock::update_stock;
use super::store::{EntityKind, InventoryRow, ShopId, Store};

pub const HELP_MESSAGE: &str =
    "❓ I didn't understand that. Try 'Where is Crocin?' or 'Add 10 Aspirin to Box A'.";

pub const EMPTY_INVENTORY: &str = "Inventory is empty.";

/// Agent knobs, filled from the `[agent]` config section
#[derive(Debug, Clone, Copy)]
pub struct AgentSettings {
    pub fuzzy_threshold: u8,
    pub suggest_on_miss: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: fuzzy::DEFAULT_THRESHOLD,
            suggest_on_miss: true,
        }
    }
}

/// What the presentation layer gets back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Reply {
    /// Markdown-ish text
    Text(String),
    /// Inventory rows to render as a table
    Table(Vec<InventoryRow>),
}

impl Reply {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            Reply::Table(_) => None,
        }
    }
}

/// Command processor bound to one authenticated shop
pub struct Agent<'s> {
    store: &'s mut Store,
    shop_id: ShopId,
    settings: AgentSettings,
}

impl<'s> Agent<'s> {
    pub fn new(store: &'s mut Store, shop_id: ShopId, settings: AgentSettings) -> Self {
        Self {
            store,
            shop_id,
            settings,
        }
    }

    /// Classify `text` and run it against this shop's inventory
    pub fn process_query(&mut self, text: &str) -> Result<Reply> {
        let intent = intent::classify(text);
        tracing::debug!(shop = %self.shop_id, intent = intent.name(), "classified input");

        match intent {
            Intent::AddStock {
                quantity,
                medicine,
                location,
            } => {
                let update =
                    update_stock(self.store, self.shop_id, &medicine, &location, quantity, None)?;
                Ok(Reply::Text(format!("✅ {}", update)))
            }
            Intent::Search { term } => self.search(&term),
            Intent::List => {
                let rows = self.store.list_inventory(self.shop_id)?;
                if rows.is_empty() {
                    Ok(Reply::Text(EMPTY_INVENTORY.to_string()))
                } else {
                    Ok(Reply::Table(rows))
                }
            }
            Intent::Unknown => Ok(Reply::Text(HELP_MESSAGE.to_string())),
        }
    }

    fn search(&self, term: &str) -> Result<Reply> {
        let rows = find_medicine(&*self.store, self.shop_id, term)?;

        if rows.is_empty() {
            let mut message = format!("❌ I couldn't find any medicine matching '{}'.", term);
            if let Some(name) = self.suggest(term)? {
                message.push_str(&format!(" Did you mean '{}'?", name));
            }
            return Ok(Reply::Text(message));
        }

        let mut message = format!("🔍 **Found '{}':**\n\n", term);
        for row in &rows {
            message.push_str(&format!(
                "- **{}**: {} units at *{}*\n",
                row.medicine, row.quantity, row.location
            ));
        }
        Ok(Reply::Text(message))
    }

    /// Closest known medicine name for a failed lookup
    fn suggest(&self, term: &str) -> Result<Option<String>> {
        if !self.settings.suggest_on_miss || term.is_empty() {
            return Ok(None);
        }

        let names = self.store.entity_names(self.shop_id, EntityKind::Medicine)?;
        Ok(fuzzy::extract_best_match(term, &names, self.settings.fuzzy_threshold)
            .map(str::to_string))
    }
}
