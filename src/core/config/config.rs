use bevy::prelude::*;
use serde::Deserialize;
use ron::extensions::Extensions;
use std::{collections::BTreeMap, fs, path::Path};

use crate::core::color::ColorType;
use crate::pieces::table::DuplicatePolicy;

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Match Pieces".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub columns: u32,
    pub rows: u32,
    pub spacing: f32,
    pub piece_size: f32,
    /// Seconds between random recolors in the demo board (0 disables).
    pub recolor_interval: f32,
}
impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            spacing: 72.0,
            piece_size: 64.0,
            recolor_interval: 1.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ColorSpriteConfig {
    pub color: ColorType,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RemoteSpritesConfig {
    pub enabled: bool,
    /// Labels requested together, once per piece activation.
    pub labels: Vec<String>,
    /// Label -> asset paths registered under it.
    pub groups: BTreeMap<String, Vec<String>>,
    /// Fetched asset name (file stem) -> color it overrides.
    pub name_colors: BTreeMap<String, ColorType>,
}
impl Default for RemoteSpritesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            labels: vec!["Fish_Icons".into()],
            groups: BTreeMap::from([(
                "Fish_Icons".to_string(),
                vec![
                    "sprites/fish/YellowFish.png".to_string(),
                    "sprites/fish/PurpleFish.png".to_string(),
                ],
            )]),
            name_colors: BTreeMap::from([
                ("YellowFish".to_string(), ColorType::Yellow),
                ("PurpleFish".to_string(), ColorType::Purple),
            ]),
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct PieceConfig {
    pub window: WindowConfig,
    pub board: BoardConfig,
    pub color_sprites: Vec<ColorSpriteConfig>,
    pub initial_duplicates: DuplicatePolicy,
    /// Multiply sprites by the color's tint (useful when sprite images are missing).
    pub tint_pieces: bool,
    pub remote: RemoteSpritesConfig,
}
impl Default for PieceConfig {
    fn default() -> Self {
        let color_sprites = ColorType::CONCRETE
            .iter()
            .map(|c| ColorSpriteConfig {
                color: *c,
                path: format!("sprites/pieces/{}.png", format!("{c:?}").to_lowercase()),
            })
            .collect();
        Self {
            window: WindowConfig::default(),
            board: BoardConfig::default(),
            color_sprites,
            initial_duplicates: DuplicatePolicy::FirstWins,
            tint_pieces: false,
            remote: RemoteSpritesConfig::default(),
        }
    }
}

impl PieceConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load RON files in order, each overriding only the keys it sets.
    /// Returns (config, used paths, errors). Missing or broken files are reported,
    /// never fatal.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let opts = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
        let mut cfg = Self::default();
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match opts.from_str::<PieceConfigLayer>(&txt) {
                    Ok(layer) => {
                        layer.apply(&mut cfg);
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        (cfg, used, errors)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.board.columns == 0 || self.board.rows == 0 {
            w.push("board has zero columns or rows; no pieces will spawn".into());
        }
        if self.board.piece_size <= 0.0 {
            w.push(format!("board.piece_size {} must be > 0", self.board.piece_size));
        }
        if self.board.spacing < self.board.piece_size {
            w.push(format!(
                "board.spacing {} smaller than piece_size {}; pieces overlap",
                self.board.spacing, self.board.piece_size
            ));
        }
        if self.board.recolor_interval < 0.0 {
            w.push("board.recolor_interval negative -> recolor disabled".into());
        }

        let mut seen = [false; ColorType::COUNT];
        for entry in &self.color_sprites {
            if entry.color.is_wildcard() {
                w.push(format!(
                    "color_sprites: '{}' bound to wildcard color Any; entry ignored",
                    entry.path
                ));
                continue;
            }
            if entry.path.trim().is_empty() {
                w.push(format!("color_sprites: empty path for {:?}", entry.color));
            }
            if std::mem::replace(&mut seen[entry.color.ordinal()], true) {
                let kept = match self.initial_duplicates {
                    DuplicatePolicy::FirstWins => "first",
                    DuplicatePolicy::LastWins => "last",
                };
                w.push(format!(
                    "color_sprites: duplicate entry for {:?}; {kept} entry kept",
                    entry.color
                ));
            }
        }
        for c in ColorType::CONCRETE {
            if !seen[c.ordinal()] {
                w.push(format!(
                    "color_sprites: no sprite for {c:?}; pieces of that color keep their previous visual"
                ));
            }
        }

        if self.remote.enabled {
            if self.remote.labels.is_empty() {
                w.push("remote.enabled but no labels requested".into());
            }
            for label in &self.remote.labels {
                match self.remote.groups.get(label) {
                    None => w.push(format!("remote label '{label}' has no group; fetch will fail")),
                    Some(paths) if paths.is_empty() => {
                        w.push(format!("remote label '{label}' group is empty; fetch will fail"))
                    }
                    Some(_) => {}
                }
            }
            for (name, color) in &self.remote.name_colors {
                if color.is_wildcard() {
                    w.push(format!(
                        "remote.name_colors: '{name}' maps to Any; fetched asset will be skipped"
                    ));
                }
            }
        }
        w
    }
}

// One config file in a layered load: every key optional, set keys override.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct WindowLayer {
    width: Option<f32>,
    height: Option<f32>,
    title: Option<String>,
    #[serde(rename = "autoClose")]
    auto_close: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BoardLayer {
    columns: Option<u32>,
    rows: Option<u32>,
    spacing: Option<f32>,
    piece_size: Option<f32>,
    recolor_interval: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RemoteLayer {
    enabled: Option<bool>,
    labels: Option<Vec<String>>,
    groups: Option<BTreeMap<String, Vec<String>>>,
    name_colors: Option<BTreeMap<String, ColorType>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PieceConfigLayer {
    window: Option<WindowLayer>,
    board: Option<BoardLayer>,
    color_sprites: Option<Vec<ColorSpriteConfig>>,
    initial_duplicates: Option<DuplicatePolicy>,
    tint_pieces: Option<bool>,
    remote: Option<RemoteLayer>,
}

fn set<T>(dst: &mut T, src: Option<T>) {
    if let Some(v) = src {
        *dst = v;
    }
}

impl PieceConfigLayer {
    fn apply(self, cfg: &mut PieceConfig) {
        if let Some(w) = self.window {
            set(&mut cfg.window.width, w.width);
            set(&mut cfg.window.height, w.height);
            set(&mut cfg.window.title, w.title);
            set(&mut cfg.window.auto_close, w.auto_close);
        }
        if let Some(b) = self.board {
            set(&mut cfg.board.columns, b.columns);
            set(&mut cfg.board.rows, b.rows);
            set(&mut cfg.board.spacing, b.spacing);
            set(&mut cfg.board.piece_size, b.piece_size);
            set(&mut cfg.board.recolor_interval, b.recolor_interval);
        }
        set(&mut cfg.color_sprites, self.color_sprites);
        set(&mut cfg.initial_duplicates, self.initial_duplicates);
        set(&mut cfg.tint_pieces, self.tint_pieces);
        if let Some(r) = self.remote {
            set(&mut cfg.remote.enabled, r.enabled);
            set(&mut cfg.remote.labels, r.labels);
            set(&mut cfg.remote.groups, r.groups);
            set(&mut cfg.remote.name_colors, r.name_colors);
        }
    }
}
