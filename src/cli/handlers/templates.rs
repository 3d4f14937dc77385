//! Preset template handler
//!
//! This module handles listing the preset catalog and displaying a single
//! preset in full.

use anyhow::Result;
use promo_footer_bar::notifications::presets;

/// Handler for preset template operations
pub struct TemplateHandler;

impl TemplateHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_templates(&self, show: Option<String>) -> Result<()> {
        if let Some(name) = show {
            let preset = presets::find(&name)?;
            println!("Template: {}", preset.name);
            println!("---");
            println!("{}", serde_json::to_string_pretty(&preset.to_record())?);
            return Ok(());
        }

        println!("Available templates:");
        for category in presets::catalog() {
            println!("\n{}:", category.label);
            for preset in &category.presets {
                println!("  - {:<28} {}", preset.name, preset.mobile_title);
            }
        }
        println!("\nUse 'promo-footer-bar templates --show <name>' to view a template");

        Ok(())
    }
}

super::traits::impl_stateless_handler!(TemplateHandler);
