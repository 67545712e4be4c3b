use bevy::prelude::*;

use crate::core::color::ColorType;
use crate::pieces::fetch::{AssetNameColors, FetchStatus, FetchTicket};
use crate::pieces::mapping::{ColorMapping, FetchCompletion, MergeOutcome, VisualUpdate};
use crate::pieces::table::{ColorAsset, DuplicatePolicy};

/// A tile-matching piece whose sprite follows its logical color.
#[derive(Component, Debug, Clone, Default)]
#[require(Transform, Visibility)]
pub struct ColorPiece {
    mapping: ColorMapping<Handle<Image>>,
    active: bool,
}

impl ColorPiece {
    pub fn new(color: ColorType) -> Self {
        Self {
            mapping: ColorMapping::new(color),
            active: false,
        }
    }

    /// Build the sprite table and mark the piece active. Returns the number of
    /// discarded entries.
    pub fn initialize<I>(&mut self, entries: I, policy: DuplicatePolicy) -> usize
    where
        I: IntoIterator<Item = ColorAsset<Handle<Image>>>,
    {
        self.active = true;
        self.mapping.configure(entries, policy)
    }

    /// Deactivate and stop listening for outstanding sprite fetches.
    pub fn shutdown(&mut self) -> Option<FetchTicket> {
        self.active = false;
        self.mapping.unsubscribe()
    }

    /// Reactivate after `shutdown`. Returns `false` when the piece is already
    /// active or was never initialized.
    pub fn resume(&mut self) -> bool {
        if self.active || !self.mapping.is_configured() {
            return false;
        }
        self.active = true;
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn color(&self) -> ColorType {
        self.mapping.color()
    }

    pub fn set_color(&mut self, color: ColorType) -> VisualUpdate {
        self.mapping.set_color(color)
    }

    pub fn num_colors(&self) -> usize {
        self.mapping.configured_colors()
    }

    pub fn is_initialized(&self) -> bool {
        self.mapping.is_configured()
    }

    pub fn displayed(&self) -> Option<&Handle<Image>> {
        self.mapping.displayed()
    }

    pub fn sprite_for(&self, color: ColorType) -> Option<&Handle<Image>> {
        self.mapping.table().and_then(|t| t.get(color))
    }

    pub fn merge_async_result(
        &mut self,
        name: &str,
        handle: Handle<Image>,
        names: &AssetNameColors,
    ) -> MergeOutcome {
        self.mapping.merge_async_result(name, handle, names)
    }

    pub fn subscribe(&mut self) -> FetchTicket {
        self.mapping.subscribe()
    }

    pub fn subscription(&self) -> Option<FetchTicket> {
        self.mapping.subscription()
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        status: FetchStatus<Handle<Image>>,
        names: &AssetNameColors,
    ) -> FetchCompletion {
        self.mapping.complete_fetch(ticket, status, names)
    }
}

/// Initial color -> sprite entries, consumed when the piece activates.
#[derive(Component, Debug, Clone, Default)]
pub struct ColorSprites(pub Vec<ColorAsset<Handle<Image>>>);

/// Child entity whose `Sprite` displays the piece.
#[derive(Component, Debug, Clone, Copy)]
pub struct PieceVisualTarget(pub Entity);

/// Tag for the sprite child of a piece.
#[derive(Component)]
pub struct PieceSprite;

/// Live subscription to a sprite fetch. Removing it cancels delivery.
#[derive(Component, Debug)]
pub struct PendingSpriteFetch<P: Send + Sync + 'static> {
    pub ticket: FetchTicket,
    pub request: P,
}
