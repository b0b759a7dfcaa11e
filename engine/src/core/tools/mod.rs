//! Tool Registry
//!
//! Fixed catalogue of editor tools plus the user-customizable floating palette.
//! The registry never tracks an "active" tool; selecting one only notifies the
//! host shell through the registered handler.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{CoreError, CoreResult, Point2D, ToolId};

/// Maximum number of tools on the floating palette
pub const MAX_PALETTE_TOOLS: usize = 12;

/// Palette contents after a reset
pub const DEFAULT_PALETTE: [&str; 6] = ["cut", "text", "audio", "transitions", "speed", "ai"];

/// Initial top-left anchor of the floating palette (near bottom center)
pub const DEFAULT_TOOLBAR_POSITION: Point2D = Point2D { x: 350.0, y: 480.0 };

// =============================================================================
// Catalogue
// =============================================================================

/// Palette grouping of a tool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolCategory {
    Essentials,
    Insert,
    Adjust,
    Enhance,
}

/// Read-only tool definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub id: &'static str,
    pub label: &'static str,
    /// Icon reference resolved by the host shell
    pub icon: &'static str,
    pub category: ToolCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<char>,
}

const fn tool(
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    category: ToolCategory,
    shortcut: Option<char>,
) -> ToolDefinition {
    ToolDefinition {
        id,
        label,
        icon,
        category,
        shortcut,
    }
}

static CATALOGUE: &[ToolDefinition] = &[
    tool("select", "Select", "mouse-pointer-2", ToolCategory::Essentials, None),
    tool("split", "Split", "scissors", ToolCategory::Essentials, None),
    tool("cut", "Cut", "scissors", ToolCategory::Essentials, Some('C')),
    tool("delete", "Delete", "trash-2", ToolCategory::Essentials, None),
    tool("text", "Text", "type", ToolCategory::Insert, Some('T')),
    tool("audio", "Audio", "music", ToolCategory::Insert, Some('A')),
    tool("image", "Image", "image", ToolCategory::Insert, None),
    tool("video", "Video", "monitor", ToolCategory::Insert, None),
    tool("shapes", "Shapes", "layers", ToolCategory::Insert, None),
    tool("speed", "Speed", "zap", ToolCategory::Adjust, Some('D')),
    tool("crop", "Crop", "crop", ToolCategory::Adjust, None),
    tool("rotate", "Rotate", "rotate-cw", ToolCategory::Adjust, None),
    tool("volume", "Volume", "volume-2", ToolCategory::Adjust, None),
    tool("color-grade", "Color Grade", "palette", ToolCategory::Adjust, None),
    tool("transitions", "Transition", "film", ToolCategory::Enhance, Some('R')),
    tool("effects", "Effects", "wand-2", ToolCategory::Enhance, Some('E')),
    tool("ai", "AI Subtitle", "sparkles", ToolCategory::Enhance, Some('I')),
    tool("bg-remove", "Remove BG", "eraser", ToolCategory::Enhance, None),
];

/// Full tool catalogue in display order
pub fn all_tools() -> &'static [ToolDefinition] {
    CATALOGUE
}

/// Looks up a tool definition by id
pub fn find_tool(id: &str) -> Option<&'static ToolDefinition> {
    CATALOGUE.iter().find(|t| t.id == id)
}

/// Tools of one category, in catalogue order
pub fn tools_in_category(category: ToolCategory) -> impl Iterator<Item = &'static ToolDefinition> {
    CATALOGUE.iter().filter(move |t| t.category == category)
}

// =============================================================================
// Palette Configuration
// =============================================================================

/// User-customized floating palette: which tools, and where it sits on screen
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPalette {
    selected_tool_ids: Vec<ToolId>,
    /// Top-left anchor in screen pixels. Not clamped to the window.
    pub toolbar_position: Point2D,
}

impl Default for ToolPalette {
    fn default() -> Self {
        Self {
            selected_tool_ids: DEFAULT_PALETTE.iter().map(|id| id.to_string()).collect(),
            toolbar_position: DEFAULT_TOOLBAR_POSITION,
        }
    }
}

impl ToolPalette {
    pub fn selected_tool_ids(&self) -> &[ToolId] {
        &self.selected_tool_ids
    }

    pub fn contains(&self, tool_id: &str) -> bool {
        self.selected_tool_ids.iter().any(|id| id == tool_id)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Handler fired with the tool id whenever a tool is activated
pub type ToolSelectHandler = Box<dyn FnMut(&str) + Send>;

/// Tool registry owning the palette configuration and the host callback
#[derive(Default)]
pub struct ToolRegistry {
    palette: ToolPalette,
    on_select: Option<ToolSelectHandler>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("palette", &self.palette)
            .field("has_handler", &self.on_select.is_some())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from a saved palette, dropping unknown or duplicate ids
    pub fn with_palette(palette: ToolPalette) -> Self {
        let mut registry = Self::new();
        registry.palette.toolbar_position = palette.toolbar_position;
        registry.palette.selected_tool_ids.clear();
        for id in palette.selected_tool_ids {
            if let Err(e) = registry.add_to_selection(&id) {
                debug!("Dropping palette entry {}: {}", id, e);
            }
        }
        registry
    }

    /// Registers the host callback fired on tool activation
    pub fn set_select_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_select = Some(Box::new(handler));
    }

    pub fn palette(&self) -> &ToolPalette {
        &self.palette
    }

    pub fn selected_tool_ids(&self) -> &[ToolId] {
        self.palette.selected_tool_ids()
    }

    pub fn toolbar_position(&self) -> Point2D {
        self.palette.toolbar_position
    }

    pub fn set_toolbar_position(&mut self, position: Point2D) {
        self.palette.toolbar_position = position;
    }

    /// Appends a tool to the palette
    pub fn add_to_selection(&mut self, tool_id: &str) -> CoreResult<()> {
        if find_tool(tool_id).is_none() {
            return Err(CoreError::ToolNotFound(tool_id.to_string()));
        }
        if self.palette.selected_tool_ids.len() >= MAX_PALETTE_TOOLS {
            return Err(CoreError::CapacityExceeded {
                capacity: MAX_PALETTE_TOOLS,
            });
        }
        if self.palette.contains(tool_id) {
            return Err(CoreError::AlreadyPresent(tool_id.to_string()));
        }
        self.palette.selected_tool_ids.push(tool_id.to_string());
        Ok(())
    }

    /// Removes a tool from the palette; absent ids are a no-op
    pub fn remove_from_selection(&mut self, tool_id: &str) -> bool {
        let before = self.palette.selected_tool_ids.len();
        self.palette.selected_tool_ids.retain(|id| id != tool_id);
        before != self.palette.selected_tool_ids.len()
    }

    /// Restores the default palette contents (position is kept)
    pub fn reset_to_default(&mut self) {
        self.palette.selected_tool_ids = DEFAULT_PALETTE.iter().map(|id| id.to_string()).collect();
        info!("Tool palette reset to default");
    }

    /// Replaces the whole palette at once; nothing changes if any id is rejected
    pub fn set_selection(&mut self, tool_ids: &[&str]) -> CoreResult<()> {
        let mut candidate = ToolRegistry::new();
        candidate.palette.selected_tool_ids.clear();
        for id in tool_ids {
            candidate.add_to_selection(id)?;
        }
        self.palette.selected_tool_ids = candidate.palette.selected_tool_ids;
        Ok(())
    }

    /// Activates a tool: the host handler receives its id
    pub fn select_tool(&mut self, tool_id: &str) -> CoreResult<()> {
        if find_tool(tool_id).is_none() {
            return Err(CoreError::ToolNotFound(tool_id.to_string()));
        }
        debug!("Tool selected: {}", tool_id);
        if let Some(handler) = self.on_select.as_mut() {
            handler(tool_id);
        }
        Ok(())
    }

    /// Activates the tool bound to a keyboard shortcut (case-insensitive)
    pub fn activate_shortcut(&mut self, key: char) -> Option<&'static str> {
        let key = key.to_ascii_uppercase();
        let tool = CATALOGUE.iter().find(|t| t.shortcut == Some(key))?;
        self.select_tool(tool.id).ok()?;
        Some(tool.id)
    }
}
