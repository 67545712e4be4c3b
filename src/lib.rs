pub mod app;
pub mod core;
pub mod gameplay;
pub mod interaction;
pub mod pieces;

// Curated re-exports
pub use crate::app::game::GamePlugin;
pub use crate::core::color::ColorType;
pub use crate::core::components::{ColorPiece, ColorSprites, PieceSprite, PieceVisualTarget};
pub use crate::core::config::{PieceConfig, WindowConfig};
pub use crate::pieces::plugin::{PieceLifecycle, PiecesPlugin};
