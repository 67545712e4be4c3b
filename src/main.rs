use std::path::PathBuf;

use anyhow::{bail, Result};
use bevy::prelude::*;
use clap::Parser;

use match_pieces::interaction::session::auto_close::AutoCloseOverride;
use match_pieces::{GamePlugin, PieceConfig};

#[derive(Parser, Debug)]
#[command(about = "Tile-matching pieces whose sprites follow their color", version)]
struct Args {
    /// RON config files, merged in order (later files override earlier keys).
    #[arg(long = "config")]
    configs: Vec<PathBuf>,
    /// Skip the async sprite override fetch.
    #[arg(long)]
    no_remote: bool,
    /// Exit after this many seconds (overrides window.autoClose).
    #[arg(long)]
    auto_close: Option<f32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = if args.configs.is_empty() {
        vec![
            PathBuf::from("assets/config/pieces.ron"),
            PathBuf::from("assets/config/pieces.local.ron"),
        ]
    } else {
        args.configs.clone()
    };
    let (mut cfg, used, errors) = PieceConfig::load_layered(&paths);
    if used.is_empty() && !args.configs.is_empty() {
        bail!("none of the config files could be loaded: {}", errors.join("; "));
    }
    if args.no_remote {
        cfg.remote.enabled = false;
    }
    let warnings = cfg.validate();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: cfg.window.title.clone(),
                    resolution: (cfg.window.width, cfg.window.height).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );
    // Logging is available once LogPlugin is installed by DefaultPlugins.
    info!(target: "config", "Config layers used: {:?}", used);
    for e in &errors {
        // Optional local overlay is allowed to be missing.
        if e.contains("pieces.local.ron") && e.contains("read error") {
            debug!(target: "config", "{e}");
        } else {
            warn!(target: "config", "{e}");
        }
    }
    for w in &warnings {
        warn!(target: "config", "{w}");
    }
    app.insert_resource(cfg)
        .insert_resource(AutoCloseOverride(args.auto_close))
        .add_plugins(GamePlugin)
        .run();
    Ok(())
}
