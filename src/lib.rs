#![forbid(unsafe_code)]

pub mod core;
pub mod error;
pub mod extract;
pub mod grid;
pub mod playback;
pub mod sheet;
pub mod store;

pub use self::core::{PixelRect, Speed, StripDirection};
pub use error::{SpriteError, SpriteResult};
pub use extract::{extract_frames, extract_frames_with_direction, tight_crop};
pub use grid::{GridDescriptor, auto_detect_grid, compute_grid};
pub use playback::{AnimationSettings, Direction, PlayState, PlaybackEvent, Player};
pub use sheet::{Frame, SheetImage};
pub use store::{AnimationRecord, AnimationStore, MemoryStore, RecordId};
