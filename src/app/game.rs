// This file is part of Match Pieces.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::system::system_order::{GameplaySet, PieceSet};
use crate::gameplay::board::BoardPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::pieces::asset_source::AssetServerSpriteSource;
use crate::pieces::plugin::PiecesPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            PiecesPlugin::<AssetServerSpriteSource>::default(),
            BoardPlugin,
            AutoClosePlugin,
        ))
        .configure_sets(
            Update,
            GameplaySet.after(PieceSet::Fetch).before(PieceSet::Apply),
        );
    }
}
