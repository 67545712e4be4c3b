use std::collections::HashMap;

use bevy::asset::uuid::Uuid;
use bevy::prelude::*;
use match_pieces::core::components::PendingSpriteFetch;
use match_pieces::pieces::{ColorAsset, FetchStatus, NamedAsset, SpriteSource};
use match_pieces::{
    ColorPiece, ColorSprites, ColorType, PieceConfig, PieceLifecycle, PieceSprite,
    PieceVisualTarget, PiecesPlugin,
};

/// Fetches resolve only when the test says so.
#[derive(Resource, Default)]
struct ScriptedSource {
    issued: Vec<Vec<String>>,
    outcomes: HashMap<usize, FetchStatus<Handle<Image>>>,
}

impl SpriteSource for ScriptedSource {
    type Pending = usize;

    fn fetch(&mut self, labels: &[String]) -> usize {
        self.issued.push(labels.to_vec());
        self.issued.len() - 1
    }

    fn poll(&self, pending: &usize) -> FetchStatus<Handle<Image>> {
        self.outcomes
            .get(pending)
            .cloned()
            .unwrap_or(FetchStatus::Pending)
    }
}

fn h(id: u128) -> Handle<Image> {
    Handle::Weak(AssetId::Uuid {
        uuid: Uuid::from_u128(id),
    })
}

const YELLOW: u128 = 1;
const PURPLE: u128 = 2;
const YELLOW_FISH: u128 = 10;
const PURPLE_FISH: u128 = 11;

fn test_app(cfg: PieceConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(cfg)
        .add_plugins(PiecesPlugin::<ScriptedSource>::default());
    app
}

fn spawn_piece(app: &mut App, color: ColorType) -> (Entity, Entity) {
    let visual = app.world_mut().spawn((PieceSprite, Sprite::default())).id();
    let piece = app
        .world_mut()
        .spawn((
            ColorPiece::new(color),
            ColorSprites(vec![
                ColorAsset::new(ColorType::Yellow, h(YELLOW)),
                ColorAsset::new(ColorType::Purple, h(PURPLE)),
            ]),
            PieceVisualTarget(visual),
        ))
        .id();
    (piece, visual)
}

fn shown(app: &App, visual: Entity) -> Handle<Image> {
    app.world().get::<Sprite>(visual).unwrap().image.clone()
}

fn resolve(app: &mut App, request: usize, status: FetchStatus<Handle<Image>>) {
    app.world_mut()
        .resource_mut::<ScriptedSource>()
        .outcomes
        .insert(request, status);
}

fn fish_batch() -> FetchStatus<Handle<Image>> {
    FetchStatus::Succeeded(vec![
        NamedAsset::new("YellowFish", h(YELLOW_FISH)),
        NamedAsset::new("PurpleFish", h(PURPLE_FISH)),
    ])
}

#[test]
fn spawned_piece_shows_configured_sprite_and_requests_fetch() {
    let mut app = test_app(PieceConfig::default());
    let (piece, visual) = spawn_piece(&mut app, ColorType::Yellow);
    app.update();

    assert_eq!(shown(&app, visual), h(YELLOW));
    let p = app.world().get::<ColorPiece>(piece).unwrap();
    assert_eq!(p.num_colors(), 2);
    assert!(p.subscription().is_some());
    let source = app.world().resource::<ScriptedSource>();
    assert_eq!(source.issued, vec![vec!["Fish_Icons".to_string()]]);
}

#[test]
fn fetch_success_overrides_current_sprite() {
    let mut app = test_app(PieceConfig::default());
    let (piece, visual) = spawn_piece(&mut app, ColorType::Yellow);
    app.update();
    resolve(&mut app, 0, fish_batch());
    app.update();

    assert_eq!(shown(&app, visual), h(YELLOW_FISH));
    assert!(app.world().get::<PendingSpriteFetch<usize>>(piece).is_none());
    let p = app.world().get::<ColorPiece>(piece).unwrap();
    assert_eq!(p.sprite_for(ColorType::Purple), Some(&h(PURPLE_FISH)));
    assert!(p.subscription().is_none());
}

#[test]
fn set_color_updates_sprite_and_unknown_color_keeps_it() {
    let mut app = test_app(PieceConfig::default());
    let (piece, visual) = spawn_piece(&mut app, ColorType::Yellow);
    app.update();

    app.world_mut()
        .get_mut::<ColorPiece>(piece)
        .unwrap()
        .set_color(ColorType::Purple);
    app.update();
    assert_eq!(shown(&app, visual), h(PURPLE));

    app.world_mut()
        .get_mut::<ColorPiece>(piece)
        .unwrap()
        .set_color(ColorType::Green);
    app.update();
    assert_eq!(shown(&app, visual), h(PURPLE));
    assert_eq!(
        app.world().get::<ColorPiece>(piece).unwrap().color(),
        ColorType::Green
    );
}

#[test]
fn disabled_piece_ignores_late_completion() {
    let mut app = test_app(PieceConfig::default());
    let (piece, visual) = spawn_piece(&mut app, ColorType::Yellow);
    app.update();

    app.world_mut().send_event(PieceLifecycle::disable(piece));
    app.update();
    assert!(app.world().get::<PendingSpriteFetch<usize>>(piece).is_none());
    assert_eq!(
        app.world().get::<Visibility>(piece),
        Some(&Visibility::Hidden)
    );

    resolve(&mut app, 0, fish_batch());
    app.update();
    assert_eq!(shown(&app, visual), h(YELLOW));
    let p = app.world().get::<ColorPiece>(piece).unwrap();
    assert_eq!(p.sprite_for(ColorType::Yellow), Some(&h(YELLOW)));
}

#[test]
fn re_enabling_issues_a_fresh_fetch() {
    let mut app = test_app(PieceConfig::default());
    let (piece, visual) = spawn_piece(&mut app, ColorType::Purple);
    app.update();
    app.world_mut().send_event(PieceLifecycle::disable(piece));
    app.update();
    app.world_mut().send_event(PieceLifecycle::enable(piece));
    app.update();

    assert_eq!(app.world().resource::<ScriptedSource>().issued.len(), 2);
    assert_eq!(
        app.world().get::<Visibility>(piece),
        Some(&Visibility::Inherited)
    );

    // The first request resolving late must not leak into the new subscription.
    resolve(&mut app, 0, fish_batch());
    app.update();
    assert_eq!(shown(&app, visual), h(PURPLE));

    resolve(&mut app, 1, fish_batch());
    app.update();
    assert_eq!(shown(&app, visual), h(PURPLE_FISH));
}

#[test]
fn enable_on_active_piece_is_a_no_op() {
    let mut app = test_app(PieceConfig::default());
    let (piece, visual) = spawn_piece(&mut app, ColorType::Yellow);
    app.update();
    resolve(&mut app, 0, FetchStatus::Failed("unreachable host".into()));
    app.update();

    for _ in 0..3 {
        app.world_mut().send_event(PieceLifecycle::enable(piece));
        app.update();
    }
    assert_eq!(app.world().resource::<ScriptedSource>().issued.len(), 1);
    assert!(app.world().get::<PendingSpriteFetch<usize>>(piece).is_none());
    assert!(app.world().get::<ColorPiece>(piece).unwrap().is_active());
    assert_eq!(shown(&app, visual), h(YELLOW));
}

#[test]
fn failed_fetch_keeps_table() {
    let mut app = test_app(PieceConfig::default());
    let (piece, visual) = spawn_piece(&mut app, ColorType::Yellow);
    app.update();
    resolve(&mut app, 0, FetchStatus::Failed("unreachable host".into()));
    app.update();

    assert_eq!(shown(&app, visual), h(YELLOW));
    assert!(app.world().get::<PendingSpriteFetch<usize>>(piece).is_none());
    let p = app.world().get::<ColorPiece>(piece).unwrap();
    assert_eq!(p.sprite_for(ColorType::Yellow), Some(&h(YELLOW)));
    assert!(p.subscription().is_none());
}

#[test]
fn remote_disabled_issues_no_fetch() {
    let mut cfg = PieceConfig::default();
    cfg.remote.enabled = false;
    let mut app = test_app(cfg);
    let (piece, visual) = spawn_piece(&mut app, ColorType::Purple);
    app.update();

    assert!(app.world().resource::<ScriptedSource>().issued.is_empty());
    assert!(app.world().get::<ColorPiece>(piece).unwrap().subscription().is_none());
    assert_eq!(shown(&app, visual), h(PURPLE));
}

#[test]
fn last_wins_policy_applies_to_initial_table() {
    let mut cfg = PieceConfig::default();
    cfg.initial_duplicates = match_pieces::pieces::DuplicatePolicy::LastWins;
    cfg.remote.enabled = false;
    let mut app = test_app(cfg);
    let visual = app.world_mut().spawn((PieceSprite, Sprite::default())).id();
    app.world_mut().spawn((
        ColorPiece::new(ColorType::Red),
        ColorSprites(vec![
            ColorAsset::new(ColorType::Red, h(100)),
            ColorAsset::new(ColorType::Red, h(101)),
        ]),
        PieceVisualTarget(visual),
    ));
    app.update();
    assert_eq!(shown(&app, visual), h(101));
}

#[test]
fn tinting_follows_color_when_enabled() {
    let mut cfg = PieceConfig::default();
    cfg.tint_pieces = true;
    cfg.remote.enabled = false;
    let mut app = test_app(cfg);
    let (piece, visual) = spawn_piece(&mut app, ColorType::Yellow);
    app.update();
    assert_eq!(
        app.world().get::<Sprite>(visual).unwrap().color,
        ColorType::Yellow.tint()
    );
    app.world_mut()
        .get_mut::<ColorPiece>(piece)
        .unwrap()
        .set_color(ColorType::Pink);
    app.update();
    assert_eq!(
        app.world().get::<Sprite>(visual).unwrap().color,
        ColorType::Pink.tint()
    );
}
