//! Update scheduler.
//!
//! `HighlighterApp` owns the locator, the renderer and the current config,
//! and runs the whole Locator → Reconciler → Renderer pipeline synchronously
//! on every trigger. It is generic over the DOM so the browser build
//! ([`web`]) and the native tests drive the same code.

#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
pub mod web;

use serde_json::{Map, Value};

use crate::commands::{Command, CommandOutcome};
use crate::config::{DocumentTable, Enablement, LoadedSettings, RenderConfig};
use crate::dom::{HostDocument, OverlaySurface};
use crate::error::Result;
use crate::locator::{ActiveCellLocator, HostKind, Locator};
use crate::messages::{RuntimeMessage, SheetKeyResponse};
use crate::render::{FrameInput, HighlightRenderer, RenderSummary};
use crate::zoom::ZoomDirection;

/// Side effects a command leaves for the embedding layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEffect {
    /// Write these items to the store and broadcast the message
    Persist {
        items: Map<String, Value>,
        broadcast: RuntimeMessage,
    },
    /// Hand the step to the zoom driver
    Zoom(ZoomDirection),
    /// Nothing to do (zoom on a host without zoom support)
    None,
}

/// What the embedding layer must do after a runtime message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageEffect {
    /// Already redrawn
    Redrawn,
    /// Redrawn; write these items to the store
    Persist(Map<String, Value>),
    /// Re-read the settings store, then redraw
    Reload,
    /// Send this reply
    Reply(SheetKeyResponse),
    /// Hand the step to the zoom driver
    Zoom(ZoomDirection),
}

pub struct HighlighterApp<D: HostDocument, S: OverlaySurface> {
    locator: Locator<D>,
    renderer: HighlightRenderer<S>,
    config: RenderConfig,
    documents: DocumentTable,
}

impl<D: HostDocument, S: OverlaySurface> HighlighterApp<D, S> {
    /// Pick the locator from the page's host and create the overlay containers.
    pub fn new(document: D, surface: S) -> Result<Self> {
        Self::with_locator(Locator::for_host(document), surface)
    }

    pub fn with_locator(locator: Locator<D>, surface: S) -> Result<Self> {
        tracing::info!(host = ?locator.host_kind(), "highlighter attached");
        Ok(Self {
            locator,
            renderer: HighlightRenderer::new(surface)?,
            config: RenderConfig::default(),
            documents: DocumentTable::default(),
        })
    }

    pub fn locator(&self) -> &Locator<D> {
        &self.locator
    }

    pub fn locator_mut(&mut self) -> &mut Locator<D> {
        &mut self.locator
    }

    pub fn renderer(&self) -> &HighlightRenderer<S> {
        &self.renderer
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn sheet_key(&self) -> String {
        self.locator.sheet_key()
    }

    /// Run one cycle against the current DOM and config.
    pub fn update(&mut self) -> Result<RenderSummary> {
        let frame = FrameInput::capture(&self.locator);
        self.renderer.render(&frame, &self.config)
    }

    /// Replace the config and redraw.
    pub fn apply_config(&mut self, config: RenderConfig) -> Result<RenderSummary> {
        self.config = config;
        self.update()
    }

    /// Apply a fresh read of the store.
    ///
    /// Returns the pruned `documents` table when stale entries were dropped,
    /// so the caller can write it back.
    pub fn apply_store_items(&mut self, items: &Map<String, Value>, now_ms: f64) -> Result<Option<Value>> {
        let loaded = LoadedSettings::load(items, &self.sheet_key(), now_ms);
        let write_back = loaded.pruned.then(|| loaded.documents.to_value());
        self.documents = loaded.documents;
        self.apply_config(loaded.config)?;
        Ok(write_back)
    }

    /// Overlay a partial settings object on the current config. Keys present
    /// inline win, including `row`/`column` over per-document overrides.
    fn apply_inline_settings(&mut self, settings: &Map<String, Value>) -> Result<()> {
        let mut items = match serde_json::to_value(&self.config)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        items.extend(settings.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.apply_config(RenderConfig::from_items(&items))?;
        Ok(())
    }

    fn set_enablement(&mut self, enablement: Enablement) -> Result<()> {
        let config = self.config.clone().with_enablement(enablement);
        self.apply_config(config)?;
        Ok(())
    }

    /// Apply a new enablement and record it for the current document.
    /// Returns the store items that persist it.
    fn record_enablement(&mut self, enablement: Enablement, now_ms: f64) -> Result<Map<String, Value>> {
        self.set_enablement(enablement)?;
        self.documents.record(&self.sheet_key(), enablement, now_ms);

        let mut items = Map::new();
        items.insert("row".to_string(), Value::Bool(enablement.row));
        items.insert("column".to_string(), Value::Bool(enablement.column));
        items.insert("documents".to_string(), self.documents.to_value());
        Ok(items)
    }

    /// Run a shortcut command.
    pub fn handle_command(&mut self, command: Command, now_ms: f64) -> Result<CommandEffect> {
        tracing::debug!(%command, "command");
        match command.apply(self.config.enablement()) {
            CommandOutcome::Enablement(enablement) => Ok(CommandEffect::Persist {
                items: self.record_enablement(enablement, now_ms)?,
                broadcast: RuntimeMessage::Commands {
                    row: enablement.row,
                    column: enablement.column,
                },
            }),
            CommandOutcome::Zoom(direction) => Ok(self.zoom_effect(direction)),
        }
    }

    fn zoom_effect(&self, direction: ZoomDirection) -> CommandEffect {
        if self.locator.host_kind() == HostKind::Sheets {
            CommandEffect::Zoom(direction)
        } else {
            tracing::debug!("zoom is only supported on Google Sheets");
            CommandEffect::None
        }
    }

    /// React to a runtime message.
    pub fn handle_message(&mut self, message: RuntimeMessage, now_ms: f64) -> Result<MessageEffect> {
        match message {
            RuntimeMessage::SettingsUpdated { settings: None } => Ok(MessageEffect::Reload),
            RuntimeMessage::SettingsUpdated {
                settings: Some(settings),
            } => {
                self.apply_inline_settings(&settings)?;
                Ok(MessageEffect::Redrawn)
            }
            RuntimeMessage::Commands { row, column } => Ok(MessageEffect::Persist(
                self.record_enablement(Enablement { row, column }, now_ms)?,
            )),
            RuntimeMessage::GetSheetKey => Ok(MessageEffect::Reply(SheetKeyResponse {
                sheet_key: self.sheet_key(),
            })),
            RuntimeMessage::Zoom { direction } => match self.zoom_effect(direction) {
                CommandEffect::Zoom(direction) => Ok(MessageEffect::Zoom(direction)),
                _ => Ok(MessageEffect::Redrawn),
            },
        }
    }
}
