//! Domain types shared by the loader and the renderer.
//!
//! - series vocabulary and curve shapes (`SeriesName`, `CurveShape`)
//! - the loaded curve itself (`CurveRecord`)

pub mod record;
pub mod types;

pub use record::*;
pub use types::*;
