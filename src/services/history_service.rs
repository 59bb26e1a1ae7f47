//! Calculation history kept as one JSON array under a single store key,
//! newest entry first.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::HistoryEntry;
use crate::infrastructure::{SafeStore, StoreBackend};

pub const HISTORY_KEY: &str = "levcalc_history_v1";
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

const CSV_HEADER: [&str; 13] = [
    "time",
    "coin",
    "side",
    "entry",
    "margin",
    "leverage",
    "notional",
    "qty",
    "liq",
    "feesEstimated",
    "funding",
    "targets",
    "note",
];

/// Change notification for subscribers of the history.
#[derive(Debug, Clone)]
pub enum HistoryEvent {
    Recorded(HistoryEntry),
    Deleted(Uuid),
    Cleared,
}

pub struct HistoryService {
    store: Arc<SafeStore>,
    capacity: usize,
    /// Serializes read-modify-write cycles on the history key.
    write_lock: Mutex<()>,
    event_tx: broadcast::Sender<HistoryEvent>,
}

impl HistoryService {
    pub fn new(store: Arc<SafeStore>, capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(100);

        Self {
            store,
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
            event_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.event_tx.subscribe()
    }

    pub fn backend(&self) -> StoreBackend {
        self.store.backend()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entries, newest first. Unreadable history reads as empty.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.store.get(HISTORY_KEY).await else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding unreadable history: {}", e);
                Vec::new()
            }
        }
    }

    async fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let json = serde_json::to_string(entries).context("Failed to serialize history")?;
        let durable = self.store.set(HISTORY_KEY, &json).await;
        debug!("Saved {} history entries (durable: {})", entries.len(), durable);
        Ok(())
    }

    /// Prepend `entry`, dropping the oldest entries beyond capacity.
    pub async fn push(&self, entry: HistoryEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.list().await;
        entries.insert(0, entry.clone());
        entries.truncate(self.capacity);
        self.save(&entries).await?;

        info!(
            "Recorded calculation {} ({} {} @ {})",
            entry.id, entry.coin, entry.side, entry.entry_price
        );

        let _ = self.event_tx.send(HistoryEvent::Recorded(entry));
        Ok(())
    }

    /// Returns `false` when no entry has this id.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.list().await;
        let Some(position) = entries.iter().position(|entry| entry.id == id) else {
            return Ok(false);
        };
        entries.remove(position);
        self.save(&entries).await?;

        info!("Deleted history entry {}", id);

        let _ = self.event_tx.send(HistoryEvent::Deleted(id));
        Ok(true)
    }

    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;

        self.store.remove(HISTORY_KEY).await;
        info!("History cleared");

        let _ = self.event_tx.send(HistoryEvent::Cleared);
    }

    /// CSV of the whole history, `None` when there is nothing to export.
    pub async fn export_csv(&self) -> Option<String> {
        let entries = self.list().await;
        if entries.is_empty() {
            return None;
        }
        Some(to_csv(&entries))
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

pub fn to_csv(entries: &[HistoryEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for entry in entries {
        let targets = entry
            .targets
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join("|");

        let row = [
            quote(&entry.time.to_rfc3339()),
            quote(&entry.coin),
            quote(entry.side.as_str()),
            number(entry.entry_price),
            number(entry.margin),
            number(entry.leverage),
            number(entry.notional),
            number(entry.quantity),
            entry.liquidation_price.map(number).unwrap_or_default(),
            number(entry.fees_estimated),
            number(entry.funding),
            quote(&targets),
            quote(&entry.note),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}
