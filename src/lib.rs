//! # ASS Processor: Styled Subtitle Document Compiler and Preset Store
//!
//! This crate turns a subtitle style configuration plus an ordered sequence of
//! timed text segments into a complete ASS (Advanced SubStation Alpha)
//! document, and manages named style presets on disk.
//!
//! The three entry points you will use are:
//! - [`generate_ass`]: Compiles segments and a [`SubtitleStyle`] into ASS markup text.
//! - [`validate`]: Structurally validates a raw style value and reports every
//!   violation at once.
//! - [`PresetStore`]: Saves, lists, loads and imports named presets under a
//!   `(scope, kind)` namespace without ever overwriting an existing file.
//!
//! ## ⚠️ Important: Not a Renderer
//!
//! This library only produces the *markup text* handed to an external renderer
//! (e.g. an `ffmpeg` `ass` filter). It never runs media binaries, performs
//! speech alignment, or drives a UI; those belong to the calling layer.
//!
//! ## Example
//!
//! ```rust
//! use ass_processor::{AssGenerationOptions, SubtitleStyle, TimedSegment, generate_ass};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let style = SubtitleStyle::default();
//!     let segments = vec![TimedSegment {
//!         start: 0.0,
//!         end: 5.0,
//!         text: "こんにちは".to_string(),
//!     }];
//!
//!     let document = generate_ass(&segments, &style, &AssGenerationOptions::default())?;
//!
//!     assert!(document.starts_with("[Script Info]"));
//!     assert!(document.contains("Dialogue: 0,0:00:00.00,0:00:05.00,DEF,,0,0,0,,こんにちは"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod generator;
pub mod preset;
pub mod style;

pub use error::{GenerateError, PresetError};
pub use generator::{
    AssGenerationOptions, AssGenerationOptionsBuilder, LineBreakPolicy, TimedSegment,
    color::{Rgb, parse_web_color, to_ass_color, web_color_to_ass},
    generate_ass,
    time::format_ass_time,
};
pub use preset::{PresetDocument, PresetStore, SavedPreset};
pub use style::{
    config::{AVAILABLE_FONTS, PresetKind, SubtitleStyle},
    validator::{ValidationReport, validate},
};
