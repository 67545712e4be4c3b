//! Async sprite fetch contract. Pieces only see the completion side; how assets
//! are actually fetched is up to the `SpriteSource` resource installed in the app.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::core::color::ColorType;
use crate::core::config::PieceConfig;

/// Identifies the one outstanding fetch a piece listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct NamedAsset<H> {
    pub name: String,
    pub handle: H,
}

impl<H> NamedAsset<H> {
    pub fn new(name: impl Into<String>, handle: H) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus<H> {
    Pending,
    Succeeded(Vec<NamedAsset<H>>),
    Failed(String),
}

impl<H> FetchStatus<H> {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchStatus::Pending => "Pending",
            FetchStatus::Succeeded(_) => "Succeeded",
            FetchStatus::Failed(_) => "Failed",
        }
    }
}

/// Resolves fetched asset names to the color they override.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AssetNameColors(pub BTreeMap<String, ColorType>);

impl Default for AssetNameColors {
    fn default() -> Self {
        Self(BTreeMap::from([
            ("YellowFish".to_string(), ColorType::Yellow),
            ("PurpleFish".to_string(), ColorType::Purple),
        ]))
    }
}

impl From<&PieceConfig> for AssetNameColors {
    fn from(cfg: &PieceConfig) -> Self {
        Self(cfg.remote.name_colors.clone())
    }
}

impl AssetNameColors {
    pub fn resolve(&self, name: &str) -> Option<ColorType> {
        self.0.get(name).copied()
    }
}

/// Injected fetch capability.
///
/// `fetch` issues one request covering every sprite registered under `labels`;
/// `poll` is called once per frame until it stops returning `Pending`.
pub trait SpriteSource: Resource {
    type Pending: Send + Sync + 'static;

    fn fetch(&mut self, labels: &[String]) -> Self::Pending;

    fn poll(&self, pending: &Self::Pending) -> FetchStatus<Handle<Image>>;
}
