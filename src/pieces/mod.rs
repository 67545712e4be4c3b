//! Color -> sprite mapping for tile-matching pieces, with async sprite overrides.

pub mod asset_source;
pub mod fetch;
pub mod mapping;
pub mod plugin;
pub mod table;

pub use asset_source::AssetServerSpriteSource;
pub use fetch::{AssetNameColors, FetchStatus, FetchTicket, NamedAsset, SpriteSource};
pub use mapping::{ColorMapping, FetchCompletion, MergeOutcome, MergeSkip, VisualUpdate};
pub use plugin::{LifecycleChange, PieceLifecycle, PiecesPlugin};
pub use table::{ColorAsset, ColorAssetTable, DuplicatePolicy};
