//! Ingot composites engraved text or logos onto product images.
//!
//! A render takes a base image and either text or a logo, places the content in an engraving
//! area derived from where the base image lands on the canvas, and stacks depth layers and
//! surface gradients on top so the content reads as carved into metal:
//!
//! - [`ImageLoader`] resolves URLs, data URLs and paths into [`Bitmap`]s
//! - [`SurfaceMapper`] computes the [`SurfaceArea`] for a [`MappingMode`]
//! - [`EngravingCompositor`] draws everything and returns a [`RenderResult`]
//!
//! [`render_engraving`] and [`RenderSession`] tie the three together.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod config;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod request;
pub(crate) mod surface;

pub use crate::foundation::core::{
    Affine, Bound, ENGRAVING_COLOR, PlacementBounds, PlacementSettings, Point, Rect, Rgb8, Vec2,
};
pub use crate::foundation::error::{IngotError, IngotResult};
pub use crate::foundation::math::fingerprint_rgba8;

pub use crate::assets::bitmap::Bitmap;
pub use crate::assets::decode::decode_image;
pub use crate::assets::loader::{ImageLoader, ImageRef, LoaderOpts};
pub use crate::assets::text::{EngravingFont, TextBrushRgba8, TextLayoutEngine};

pub use crate::config::CompositorConfig;
pub use crate::pipeline::{
    LoadedInputs, RenderFailure, RenderSession, RenderState, load_inputs, render_engraving,
};
pub use crate::render::blend::BlendMode;
pub use crate::render::compositor::{EngravingCompositor, draw_letterboxed, letterbox_bounds};
pub use crate::render::content::{FontSizing, LOGO_FIT_RATIO};
pub use crate::render::layers::{ContentKind, DepthLayer, depth_layers};
pub use crate::render::output::{RenderMetadata, RenderResult, download_file_name};
pub use crate::request::{Content, EngravingRequest};
pub use crate::surface::mapper::{
    AreaRatios, MappingMode, Quad, QuadRatios, RectRatios, SurfaceArea, SurfaceMapper,
};
pub use crate::surface::raster::{CpuSurface, RasterSurface, encode_premul_rgba8};
