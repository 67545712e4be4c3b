//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. Lifecycle (activation, enable / disable requests)
//! 2. Fetch (async sprite completions merged into piece tables)
//! 3. Apply (displayed handles copied onto sprites)
//! 4. Rendering (implicit)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum PieceSet {
    Lifecycle,
    Fetch,
    Apply,
}

/// Gameplay systems that recolor pieces run here, before visuals are applied.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct GameplaySet;
