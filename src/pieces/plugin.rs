//! Wires `ColorPiece` into the schedule:
//! 1. Lifecycle (activation on spawn, enable/disable events)
//! 2. Fetch (poll outstanding sprite fetches, deliver completions)
//! 3. Apply (push the displayed handle to the sprite child)
use std::marker::PhantomData;

use bevy::prelude::*;

use crate::core::components::{
    ColorPiece, ColorSprites, PendingSpriteFetch, PieceSprite, PieceVisualTarget,
};
use crate::core::config::PieceConfig;
use crate::core::system::system_order::PieceSet;

use super::asset_source::AssetServerSpriteSource;
use super::fetch::{AssetNameColors, SpriteSource};
use super::mapping::{FetchCompletion, MergeSkip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleChange {
    Enable,
    Disable,
}

/// Explicit activation / deactivation request for a piece.
#[derive(Event, Debug, Clone, Copy)]
pub struct PieceLifecycle {
    pub entity: Entity,
    pub change: LifecycleChange,
}

impl PieceLifecycle {
    pub fn enable(entity: Entity) -> Self {
        Self { entity, change: LifecycleChange::Enable }
    }
    pub fn disable(entity: Entity) -> Self {
        Self { entity, change: LifecycleChange::Disable }
    }
}

pub struct PiecesPlugin<S = AssetServerSpriteSource> {
    _source: PhantomData<fn() -> S>,
}

impl<S> Default for PiecesPlugin<S> {
    fn default() -> Self {
        Self { _source: PhantomData }
    }
}

impl<S: SpriteSource + FromWorld> Plugin for PiecesPlugin<S> {
    fn build(&self, app: &mut App) {
        app.init_resource::<PieceConfig>();
        if !app.world().contains_resource::<AssetNameColors>() {
            let names = AssetNameColors::from(app.world().resource::<PieceConfig>());
            app.insert_resource(names);
        }
        app.init_resource::<S>()
            .add_event::<PieceLifecycle>()
            .configure_sets(
                Update,
                (PieceSet::Lifecycle, PieceSet::Fetch, PieceSet::Apply).chain(),
            )
            .add_systems(
                Update,
                (
                    (activate_new_pieces::<S>, handle_piece_lifecycle::<S>)
                        .chain()
                        .in_set(PieceSet::Lifecycle),
                    poll_sprite_fetches::<S>.in_set(PieceSet::Fetch),
                    apply_piece_visuals.in_set(PieceSet::Apply),
                ),
            );
    }
}

fn request_fetch<S: SpriteSource>(
    commands: &mut Commands,
    entity: Entity,
    piece: &mut ColorPiece,
    source: &mut S,
    cfg: &PieceConfig,
) {
    if !cfg.remote.enabled {
        return;
    }
    let ticket = piece.subscribe();
    let request = source.fetch(&cfg.remote.labels);
    commands
        .entity(entity)
        .insert(PendingSpriteFetch::<S::Pending> { ticket, request });
}

pub fn activate_new_pieces<S: SpriteSource>(
    mut commands: Commands,
    cfg: Res<PieceConfig>,
    mut source: ResMut<S>,
    mut q: Query<(Entity, &mut ColorPiece, Option<&ColorSprites>), Added<ColorPiece>>,
) {
    for (entity, mut piece, sprites) in &mut q {
        let entries = sprites.map(|s| s.0.clone()).unwrap_or_default();
        let discarded = piece.initialize(entries, cfg.initial_duplicates);
        if discarded > 0 {
            debug!(
                target: "pieces",
                "piece {entity}: {discarded} color sprite entries discarded ({:?})",
                cfg.initial_duplicates
            );
        }
        request_fetch(&mut commands, entity, &mut piece, &mut *source, &cfg);
    }
}

pub fn handle_piece_lifecycle<S: SpriteSource>(
    mut commands: Commands,
    mut events: EventReader<PieceLifecycle>,
    cfg: Res<PieceConfig>,
    mut source: ResMut<S>,
    mut q: Query<(&mut ColorPiece, &mut Visibility)>,
) {
    for ev in events.read() {
        let Ok((mut piece, mut visibility)) = q.get_mut(ev.entity) else {
            warn!(
                target: "pieces",
                "lifecycle {:?} for unknown piece {}",
                ev.change,
                ev.entity
            );
            continue;
        };
        match ev.change {
            LifecycleChange::Disable => {
                if let Some(ticket) = piece.shutdown() {
                    debug!(
                        target: "pieces",
                        "piece {}: unsubscribed from fetch {:?}",
                        ev.entity,
                        ticket
                    );
                }
                commands.entity(ev.entity).remove::<PendingSpriteFetch<S::Pending>>();
                *visibility = Visibility::Hidden;
            }
            LifecycleChange::Enable => {
                if !piece.resume() {
                    continue;
                }
                *visibility = Visibility::Inherited;
                request_fetch(&mut commands, ev.entity, &mut piece, &mut *source, &cfg);
            }
        }
    }
}

pub fn poll_sprite_fetches<S: SpriteSource>(
    mut commands: Commands,
    source: Res<S>,
    names: Res<AssetNameColors>,
    mut q: Query<(Entity, &mut ColorPiece, &PendingSpriteFetch<S::Pending>)>,
) {
    for (entity, mut piece, pending) in &mut q {
        let status = source.poll(&pending.request);
        if status.is_pending() {
            continue;
        }
        info!(target: "pieces", "piece {entity}: sprite fetch status={}", status.label());
        match piece.complete_fetch(pending.ticket, status, &names) {
            FetchCompletion::Stale => {
                debug!(
                    target: "pieces",
                    "piece {entity}: dropped stale fetch {:?}",
                    pending.ticket
                );
            }
            FetchCompletion::Failed(reason) => {
                warn!(target: "pieces", "piece {entity}: sprite fetch failed: {reason}");
            }
            FetchCompletion::Merged { merged, skipped } => {
                debug!(target: "pieces", "piece {entity}: merged {merged} fetched sprites");
                for (name, why) in skipped {
                    match why {
                        MergeSkip::UnknownName => {
                            warn!(target: "pieces", "fetched sprite '{name}' has no color mapping")
                        }
                        MergeSkip::Wildcard | MergeSkip::NotConfigured => {
                            debug!(target: "pieces", "fetched sprite '{name}' skipped ({why:?})")
                        }
                    }
                }
            }
        }
        commands.entity(entity).remove::<PendingSpriteFetch<S::Pending>>();
    }
}

pub fn apply_piece_visuals(
    cfg: Res<PieceConfig>,
    q: Query<(&ColorPiece, &PieceVisualTarget), Changed<ColorPiece>>,
    mut sprites: Query<&mut Sprite, With<PieceSprite>>,
) {
    for (piece, target) in &q {
        let Ok(mut sprite) = sprites.get_mut(target.0) else {
            continue;
        };
        if let Some(handle) = piece.displayed() {
            if sprite.image != *handle {
                sprite.image = handle.clone();
            }
        }
        if cfg.tint_pieces {
            sprite.color = piece.color().tint();
        }
    }
}
