//! Moonlake renders a procedurally generated moonlit-lake scene on the CPU
//! and keeps a small dream journal alongside it.
//!
//! # Pipeline overview
//!
//! 1. **Compose**: [`SceneParams`] -> [`Scene`] (every layer generated once,
//!    deterministically, from seeded sequences)
//! 2. **Advance**: elapsed seconds -> animated uniforms (water ripple phase,
//!    moon-shimmer phase, star twinkle opacity)
//! 3. **Render**: `Scene` -> [`FrameRGBA`] through a [`RenderBackend`]
//!
//! The journal ([`JournalStore`]) and its calendar projection are independent
//! of the scene; the two meet only in the letter-to-moon [`Flight`], which
//! targets the moon's screen projection.
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: identical params and time produce an
//!   identical frame; the lake reflections rebuild the forest from the same
//!   seed and must match it draw for draw.
//! - **Premultiplied RGBA8** out of the renderer.
#![forbid(unsafe_code)]

pub mod calendar;
pub mod compose;
pub mod core;
pub mod ease;
pub mod error;
pub mod flight;
pub mod flora;
pub mod journal;
pub mod lake;
pub mod palette;
pub mod render;
pub mod render_cpu;
pub mod rng;
pub mod scene;
pub mod shading;
pub mod terrain;
pub mod ticker;

pub use calendar::{CalendarCell, MONTH_NAMES, month_grid};
pub use compose::{MOON_POSITION, SceneParams, build_scene};
pub use core::{Affine, BezPath, HORIZON, OrthoCamera, Point, Rect, Rgba, Vec2, Viewport};
pub use ease::Ease;
pub use error::{MoonlakeError, MoonlakeResult};
pub use flight::{Flight, FlightSample, FlightStatus};
pub use journal::{
    COMPANIONS, Companion, DraftForm, FileStore, InvalidField, JournalEntry, JournalStore,
    KeyValueStore, MemoryStore, Mood, SaveOutcome,
};
pub use palette::Palette;
pub use render::{BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend};
pub use render_cpu::CpuBackend;
pub use rng::SeededRng;
pub use scene::{Layer, LayerId, Scene, TwinkleEntry};
pub use shading::{ShadeInput, Shading};
pub use ticker::RenderLoop;
