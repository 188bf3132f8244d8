//! View state for the linked dual raster viewer.
//!
//! Each map pane owns a [`ViewContext`]: the active raster handle, the
//! selected band, the display range used for contrast stretching, the
//! palette and the last sampled point. All data access goes through a
//! [`RasterProvider`](raster_provider::RasterProvider).
//!
//! Provider calls can be slow and can resolve out of order. Every request
//! takes a ticket from the context's [`RequestSequencer`] and its result is
//! applied only while that ticket is still the newest of its kind:
//!
//! ```text
//! begin_*() ──► ticket + request ──► request.run(provider).await
//!                                           │
//!                          finish_*(ticket, result)
//!                                           │
//!                   newest ticket? ──yes──► state updated (Update::Applied)
//!                         │
//!                         no ─────────────► dropped (Update::Stale)
//! ```
//!
//! The async helpers on [`ViewContext`] chain the three steps for callers
//! that do not interleave requests. [`DualView`] pairs two contexts behind
//! one shared viewport.

pub mod config;
pub mod context;
pub mod dual;
pub mod range;
pub mod request;

pub use config::ViewerConfig;
pub use context::{
    LoadRequest, LoadedRaster, PointMarker, PointSample, RangeRequest, SampleRequest, ViewContext,
    VisParams,
};
pub use dual::{DualView, Side};
pub use range::{sync_range, DisplayRange};
pub use request::{RequestKind, RequestSequencer, RequestTicket, Update};
