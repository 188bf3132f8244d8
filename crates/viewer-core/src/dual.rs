//! Two linked view contexts side by side.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use climate_common::{BoundingBox, ClimateResult, GeoPoint};
use raster_provider::RasterProvider;

use crate::config::ViewerConfig;
use crate::context::{PointSample, ViewContext};
use crate::range::sync_range;

/// Which pane of the split view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Left and right panes sharing one linked viewport.
#[derive(Debug, Clone)]
pub struct DualView {
    pub left: ViewContext,
    pub right: ViewContext,
}

impl DualView {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            left: ViewContext::new(Side::Left.to_string(), config),
            right: ViewContext::new(Side::Right.to_string(), config),
        }
    }

    pub fn context(&self, side: Side) -> &ViewContext {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn context_mut(&mut self, side: Side) -> &mut ViewContext {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Pan or zoom both panes together.
    pub fn set_viewport(&mut self, bounds: BoundingBox) {
        self.left.set_bounds(bounds);
        self.right.set_bounds(bounds);
    }

    /// Copy the display range of `source` into the other pane.
    pub fn sync_range_from(&mut self, source: Side) {
        let (from, to) = match source {
            Side::Left => (&self.left, &mut self.right),
            Side::Right => (&self.right, &mut self.left),
        };
        sync_range(from, to);
        debug!(source = %source, min = from.range().min, max = from.range().max, "Synced range");
    }

    pub fn copy_left_to_right(&mut self) {
        self.sync_range_from(Side::Left);
    }

    pub fn copy_right_to_left(&mut self) {
        self.sync_range_from(Side::Right);
    }

    /// Sample both panes at a clicked point, concurrently.
    ///
    /// A pane without a raster is skipped and reports `None`. One pane
    /// failing does not affect the other.
    pub async fn sample_both<P>(
        &mut self,
        provider: &P,
        point: GeoPoint,
    ) -> (
        Option<ClimateResult<PointSample>>,
        Option<ClimateResult<PointSample>>,
    )
    where
        P: RasterProvider + ?Sized,
    {
        tokio::join!(
            sample_if_active(&mut self.left, provider, point),
            sample_if_active(&mut self.right, provider, point),
        )
    }
}

async fn sample_if_active<P>(
    ctx: &mut ViewContext,
    provider: &P,
    point: GeoPoint,
) -> Option<ClimateResult<PointSample>>
where
    P: RasterProvider + ?Sized,
{
    if !ctx.has_raster() {
        return None;
    }
    Some(ctx.sample_at_point(provider, point).await)
}
