//! `SpriteSource` over Bevy's `AssetServer`. A label names a group of image paths
//! from `PieceConfig.remote.groups`; the fetched asset name is the file stem.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::core::config::PieceConfig;

use super::fetch::{FetchStatus, NamedAsset, SpriteSource};

#[derive(Debug, Clone)]
pub struct AssetServerFetch {
    assets: Vec<NamedAsset<Handle<Image>>>,
    /// Set when the request could not be issued at all.
    rejected: Option<String>,
}

#[derive(Resource, Clone)]
pub struct AssetServerSpriteSource {
    server: AssetServer,
    groups: BTreeMap<String, Vec<String>>,
}

impl FromWorld for AssetServerSpriteSource {
    fn from_world(world: &mut World) -> Self {
        let server = world.resource::<AssetServer>().clone();
        let groups = world
            .get_resource::<PieceConfig>()
            .map(|cfg| cfg.remote.groups.clone())
            .unwrap_or_default();
        Self { server, groups }
    }
}

/// Union of every path registered under `labels`, deduplicated, in label order.
pub fn resolve_paths(
    groups: &BTreeMap<String, Vec<String>>,
    labels: &[String],
) -> Result<Vec<String>, String> {
    let mut paths: Vec<String> = Vec::new();
    for label in labels {
        let Some(group) = groups.get(label) else {
            return Err(format!("no sprite group registered for label '{label}'"));
        };
        for p in group {
            if !paths.contains(p) {
                paths.push(p.clone());
            }
        }
    }
    if paths.is_empty() {
        return Err(format!("labels {labels:?} resolve to no sprites"));
    }
    Ok(paths)
}

pub fn asset_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

impl SpriteSource for AssetServerSpriteSource {
    type Pending = AssetServerFetch;

    fn fetch(&mut self, labels: &[String]) -> AssetServerFetch {
        match resolve_paths(&self.groups, labels) {
            Ok(paths) => {
                debug!(
                    target: "pieces",
                    "sprite fetch issued labels={labels:?} paths={}",
                    paths.len()
                );
                let assets = paths
                    .into_iter()
                    .map(|p| {
                        let handle: Handle<Image> = self.server.load(p.clone());
                        NamedAsset::new(asset_name(&p), handle)
                    })
                    .collect();
                AssetServerFetch {
                    assets,
                    rejected: None,
                }
            }
            Err(e) => AssetServerFetch {
                assets: Vec::new(),
                rejected: Some(e),
            },
        }
    }

    fn poll(&self, pending: &AssetServerFetch) -> FetchStatus<Handle<Image>> {
        if let Some(reason) = &pending.rejected {
            return FetchStatus::Failed(reason.clone());
        }
        let mut all_loaded = true;
        for asset in &pending.assets {
            match self.server.get_load_state(asset.handle.id()) {
                Some(LoadState::Loaded) => {}
                Some(LoadState::Failed(e)) => {
                    return FetchStatus::Failed(format!("{}: {e}", asset.name));
                }
                _ => all_loaded = false,
            }
        }
        if all_loaded {
            FetchStatus::Succeeded(pending.assets.clone())
        } else {
            FetchStatus::Pending
        }
    }
}
