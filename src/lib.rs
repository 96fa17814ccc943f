//! A mid-level, opinionated library for laying out formatted text boxes.
//!
//! Text with lightweight inline markup (`**bold**`, `*italic*`,
//! `_underline_`, `#`/`##` headings, backslash escapes) is tokenized and
//! run through a line-breaking state machine that wraps, justifies and
//! paginates it within a bounding box. The result is a resolved stream of
//! positioned spans: every word and space knows its exact position, size
//! and style before anything is drawn. Replaying that stream onto a host
//! (a PDF page, a canvas) is a separate, thin step.
//!
//! The crate does not rasterize glyphs or own pages. It asks the host for
//! measurements through [`MetricsProvider`] and hands drawing back to the
//! host through [`RenderSurface`].
//!
//! # Example
//!
//! ```
//! use textbox::pagesize::LETTER;
//! use textbox::{layout_text, ApproximateMetrics, Margins, Pt, TextBoxOptions};
//!
//! let mut metrics = ApproximateMetrics::new(LETTER, Pt(12.0));
//! let options = TextBoxOptions {
//!     margin: Margins::all(Pt(72.0)),
//!     ..TextBoxOptions::default()
//! };
//!
//! let layout = layout_text("# Hello\nSome **bold** text.", &options, &mut metrics);
//! assert_eq!(layout.summary.pages, 1);
//! ```

mod error;
pub use error::*;

mod geometry;
pub use geometry::*;

mod justify;
pub use justify::*;

mod layout;
pub use layout::*;

mod margins;
pub use margins::*;

mod metrics;
pub use metrics::*;

/// Standard page sizes and orientation helpers
pub mod pagesize;

mod render;
pub use render::*;

mod style;
pub use style::*;

mod token;
pub use token::*;

mod units;
pub use units::*;
