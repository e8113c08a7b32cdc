//! Highlight renderer.
//!
//! This module provides:
//! - Band planning from locator output and config (`plan`)
//! - Inline styles for bands, headers and containers (`style`)
//! - The element pool that recycles overlay nodes (`pool`)
//! - Color parsing (`colors`)
//!
//! The renderer owns two containers: the band container, positioned over the
//! host's sheet container, and the full-viewport header container. It only
//! ever writes inline styles of nodes it created.

pub mod colors;
pub mod plan;
pub mod pool;
pub mod style;

pub use colors::{normalize_color, CssColor, Rgb, DEFAULT_COLOR};
pub use plan::{band_task, desired_bands, plan_full_bands, plan_segments, BandTask, FrameInput, Length, TaskKind};
pub use pool::{ElementPool, PoolChange};

use serde::Serialize;

use crate::config::{RenderConfig, RenderPolicy};
use crate::dom::OverlaySurface;
use crate::error::Result;

/// Id of the band container.
pub const APP_CONTAINER_ID: &str = "rh-app-container";
/// Id of the header container.
pub const HEADER_CONTAINER_ID: &str = "rh-header-container";

/// What one render cycle drew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub policy: RenderPolicy,
    pub bands: Vec<BandTask>,
    pub headers: usize,
    /// Elements created this cycle, bands and headers together
    pub created: usize,
    /// Surplus elements hidden this cycle
    pub hidden: usize,
}

pub struct HighlightRenderer<S: OverlaySurface> {
    surface: S,
    band_container: S::Node,
    header_container: S::Node,
    bands: ElementPool<S::Node>,
    headers: ElementPool<S::Node>,
}

impl<S: OverlaySurface> HighlightRenderer<S> {
    /// Create both containers on `surface`.
    pub fn new(mut surface: S) -> Result<Self> {
        let band_container = surface.create_node(None, Some(APP_CONTAINER_ID))?;
        let header_container = surface.create_node(None, Some(HEADER_CONTAINER_ID))?;
        Ok(Self {
            bands: ElementPool::new(band_container.clone()),
            headers: ElementPool::new(header_container.clone()),
            surface,
            band_container,
            header_container,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Elements in the band and header pools.
    pub fn pool_sizes(&self) -> (usize, usize) {
        (self.bands.size(), self.headers.size())
    }

    /// Apply one cycle: position the containers, size both pools and style
    /// every visible element.
    pub fn render(&mut self, frame: &FrameInput, config: &RenderConfig) -> Result<RenderSummary> {
        self.surface.apply_style(
            &self.band_container,
            &style::band_container_style(&frame.container_style),
        )?;

        let tasks = frame.plan_bands(config);
        let band_change = self.bands.reconcile(&mut self.surface, tasks.len())?;
        for (node, task) in self.bands.active(tasks.len()).zip(&tasks) {
            self.surface
                .apply_style(node, &style::band_style(task, config))?;
        }

        self.surface
            .apply_style(&self.header_container, &style::header_container_style())?;

        let headers = frame.plan_headers(config);
        let header_change = self.headers.reconcile(&mut self.surface, headers.len())?;
        for (node, header) in self.headers.active(headers.len()).zip(&headers) {
            self.surface
                .apply_style(node, &style::header_style(&header.rect, config))?;
        }

        let summary = RenderSummary {
            policy: config.render_policy,
            headers: headers.len(),
            created: band_change.created + header_change.created,
            hidden: band_change.hidden + header_change.hidden,
            bands: tasks,
        };
        tracing::debug!(
            bands = summary.bands.len(),
            headers = summary.headers,
            created = summary.created,
            hidden = summary.hidden,
            "rendered highlight"
        );
        Ok(summary)
    }
}
