use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::color::ColorType;
use crate::core::components::{ColorPiece, ColorSprites, PieceSprite, PieceVisualTarget};
use crate::core::config::PieceConfig;
use crate::core::system::system_order::GameplaySet;
use crate::pieces::mapping::VisualUpdate;
use crate::pieces::plugin::PieceLifecycle;
use crate::pieces::table::ColorAsset;

/// Grid cell of a spawned piece.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCell {
    pub column: u32,
    pub row: u32,
}

#[derive(Resource, Debug)]
pub struct BoardState {
    pub enabled: bool,
    recolor: Option<Timer>,
}

pub struct BoardPlugin;

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, spawn_board))
            .add_systems(
                Update,
                (recolor_random_piece, toggle_pieces).in_set(GameplaySet),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Requests every configured sprite from the asset server.
pub fn color_sprites_from_config(cfg: &PieceConfig, server: &AssetServer) -> ColorSprites {
    ColorSprites(
        cfg.color_sprites
            .iter()
            .map(|e| ColorAsset::new(e.color, server.load(e.path.clone())))
            .collect(),
    )
}

/// Spawns a piece with its sprite child. The sprite shows the configured image
/// once the piece activates.
pub fn spawn_piece(
    commands: &mut Commands,
    color: ColorType,
    sprites: ColorSprites,
    position: Vec2,
    size: f32,
) -> Entity {
    let visual = commands
        .spawn((
            Name::new("piece"),
            PieceSprite,
            Sprite {
                custom_size: Some(Vec2::splat(size)),
                ..default()
            },
        ))
        .id();
    commands
        .spawn((
            ColorPiece::new(color),
            sprites,
            PieceVisualTarget(visual),
            Transform::from_translation(position.extend(0.0)),
        ))
        .add_child(visual)
        .id()
}

fn spawn_board(mut commands: Commands, cfg: Res<PieceConfig>, server: Res<AssetServer>) {
    let b = &cfg.board;
    let sprites = color_sprites_from_config(&cfg, &server);
    let mut rng = rand::thread_rng();
    let origin = Vec2::new(
        -(b.columns.saturating_sub(1) as f32) * b.spacing * 0.5,
        -(b.rows.saturating_sub(1) as f32) * b.spacing * 0.5,
    );
    for row in 0..b.rows {
        for column in 0..b.columns {
            let color = *ColorType::CONCRETE.choose(&mut rng).unwrap_or(&ColorType::Yellow);
            let pos = origin + Vec2::new(column as f32, row as f32) * b.spacing;
            let piece = spawn_piece(&mut commands, color, sprites.clone(), pos, b.piece_size);
            commands.entity(piece).insert(BoardCell { column, row });
        }
    }
    info!(
        target: "pieces",
        "Board: spawned {}x{} pieces ({} sprite entries, remote={})",
        b.columns,
        b.rows,
        sprites.0.len(),
        cfg.remote.enabled
    );
    let recolor = (b.recolor_interval > 0.0)
        .then(|| Timer::from_seconds(b.recolor_interval, TimerMode::Repeating));
    commands.insert_resource(BoardState { enabled: true, recolor });
}

fn recolor_random_piece(
    time: Res<Time>,
    state: Option<ResMut<BoardState>>,
    mut pieces: Query<(Entity, &mut ColorPiece), With<BoardCell>>,
) {
    let Some(mut state) = state else { return };
    if !state.enabled {
        return;
    }
    let Some(timer) = state.recolor.as_mut() else { return };
    if !timer.tick(time.delta()).just_finished() {
        return;
    }
    let count = pieces.iter().count();
    if count == 0 {
        return;
    }
    let mut rng = rand::thread_rng();
    let pick = rng.gen_range(0..count);
    if let Some((entity, mut piece)) = pieces.iter_mut().nth(pick) {
        let next = piece.color().next_concrete();
        if piece.set_color(next) == VisualUpdate::Unchanged {
            debug!(target: "pieces", "piece {entity}: no sprite for {next:?}; visual kept");
        }
    }
}

fn toggle_pieces(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    state: Option<ResMut<BoardState>>,
    pieces: Query<Entity, With<BoardCell>>,
    mut lifecycle: EventWriter<PieceLifecycle>,
) {
    let (Some(keys), Some(mut state)) = (keys, state) else { return };
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    state.enabled = !state.enabled;
    for entity in &pieces {
        lifecycle.write(if state.enabled {
            PieceLifecycle::enable(entity)
        } else {
            PieceLifecycle::disable(entity)
        });
    }
    info!(target: "pieces", "Board: pieces {}", if state.enabled { "enabled" } else { "disabled" });
}
