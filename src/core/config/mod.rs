pub mod config;

pub use config::{BoardConfig, ColorSpriteConfig, PieceConfig, RemoteSpritesConfig, WindowConfig};
