//! Color -> visual mapping state owned by a single piece.
//!
//! Holds the asset table, the current color and the handle last applied to the
//! visual target. Resolution failures never clear what is displayed.

use crate::core::color::ColorType;

use super::fetch::{AssetNameColors, FetchStatus, FetchTicket, NamedAsset};
use super::table::{ColorAsset, ColorAssetTable, DuplicatePolicy};

/// Result of re-resolving the current color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualUpdate {
    Applied,
    /// Color not mapped (or table not built yet); previous visual retained.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSkip {
    UnknownName,
    Wildcard,
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged {
        color: ColorType,
        replaced: bool,
        reapplied: bool,
    },
    Skipped(MergeSkip),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchCompletion {
    /// Ticket does not match the live subscription; nothing touched.
    Stale,
    Failed(String),
    Merged {
        merged: usize,
        skipped: Vec<(String, MergeSkip)>,
    },
}

#[derive(Debug, Clone)]
pub struct ColorMapping<H> {
    table: Option<ColorAssetTable<H>>,
    color: ColorType,
    displayed: Option<H>,
    subscription: Option<FetchTicket>,
    next_ticket: u64,
}

impl<H: Clone> Default for ColorMapping<H> {
    fn default() -> Self {
        Self::new(ColorType::default())
    }
}

impl<H: Clone> ColorMapping<H> {
    pub fn new(color: ColorType) -> Self {
        Self {
            table: None,
            color,
            displayed: None,
            subscription: None,
            next_ticket: 0,
        }
    }

    /// Builds the table from configuration and re-applies the current color.
    /// Returns how many entries were discarded (duplicates or wildcard).
    pub fn configure<I>(&mut self, entries: I, policy: DuplicatePolicy) -> usize
    where
        I: IntoIterator<Item = ColorAsset<H>>,
    {
        let (table, discarded) = ColorAssetTable::from_entries(entries, policy);
        self.table = Some(table);
        self.refresh();
        discarded
    }

    pub fn is_configured(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&ColorAssetTable<H>> {
        self.table.as_ref()
    }

    pub fn configured_colors(&self) -> usize {
        self.table.as_ref().map_or(0, ColorAssetTable::len)
    }

    #[inline]
    pub fn color(&self) -> ColorType {
        self.color
    }

    pub fn displayed(&self) -> Option<&H> {
        self.displayed.as_ref()
    }

    pub fn set_color(&mut self, color: ColorType) -> VisualUpdate {
        self.color = color;
        self.refresh()
    }

    /// Re-resolve the current color against the table.
    pub fn refresh(&mut self) -> VisualUpdate {
        match self.table.as_ref().and_then(|t| t.get(self.color)) {
            Some(handle) => {
                self.displayed = Some(handle.clone());
                VisualUpdate::Applied
            }
            None => VisualUpdate::Unchanged,
        }
    }

    pub fn merge_async_result(
        &mut self,
        name: &str,
        handle: H,
        names: &AssetNameColors,
    ) -> MergeOutcome {
        let Some(color) = names.resolve(name) else {
            return MergeOutcome::Skipped(MergeSkip::UnknownName);
        };
        if color.is_wildcard() {
            return MergeOutcome::Skipped(MergeSkip::Wildcard);
        }
        let Some(table) = self.table.as_mut() else {
            return MergeOutcome::Skipped(MergeSkip::NotConfigured);
        };
        let replaced = match table.insert(color, handle) {
            Ok(prev) => prev.is_some(),
            Err(_) => return MergeOutcome::Skipped(MergeSkip::Wildcard),
        };
        let reapplied = color == self.color && self.refresh() == VisualUpdate::Applied;
        MergeOutcome::Merged {
            color,
            replaced,
            reapplied,
        }
    }

    /// Start listening for a new fetch. Any earlier subscription is replaced.
    pub fn subscribe(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        self.subscription = Some(ticket);
        ticket
    }

    pub fn unsubscribe(&mut self) -> Option<FetchTicket> {
        self.subscription.take()
    }

    pub fn subscription(&self) -> Option<FetchTicket> {
        self.subscription
    }

    pub fn is_subscribed(&self, ticket: FetchTicket) -> bool {
        self.subscription == Some(ticket)
    }

    /// Deliver a finished fetch. `Pending` is treated as not finished and keeps
    /// the subscription alive.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        status: FetchStatus<H>,
        names: &AssetNameColors,
    ) -> FetchCompletion {
        if !self.is_subscribed(ticket) || status.is_pending() {
            return FetchCompletion::Stale;
        }
        self.subscription = None;
        match status {
            FetchStatus::Pending => FetchCompletion::Stale,
            FetchStatus::Failed(reason) => {
                self.refresh();
                FetchCompletion::Failed(reason)
            }
            FetchStatus::Succeeded(batch) => {
                let mut merged = 0;
                let mut skipped = Vec::new();
                for NamedAsset { name, handle } in batch {
                    match self.merge_async_result(&name, handle, names) {
                        MergeOutcome::Merged { .. } => merged += 1,
                        MergeOutcome::Skipped(why) => skipped.push((name, why)),
                    }
                }
                self.refresh();
                FetchCompletion::Merged { merged, skipped }
            }
        }
    }
}
