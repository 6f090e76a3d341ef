use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ratatui::style::Color;

use crate::model::UiConfig;
use crate::model::task::Priority;

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Colors by role. Every field can be overridden from `[ui.colors]` using
/// its name as the key.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub error: Color,
    pub warning: Color,
    /// Started tasks
    pub active: Color,
    pub urgent: Color,
    pub tag: Color,
    pub priority_high: Color,
    pub priority_mid: Color,
    pub priority_low: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Projects are hashed onto these
    pub project_palette: Vec<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: rgb(0x0C001B),
            text: rgb(0xB0AAFF),
            text_bright: rgb(0xFFFFFF),
            highlight: rgb(0xFB4196),
            dim: rgb(0x7D78BF),
            error: rgb(0xFF4444),
            warning: rgb(0xFFD700),
            active: rgb(0x44FF88),
            urgent: rgb(0xFF4444),
            tag: rgb(0x44DDFF),
            priority_high: rgb(0xFF4444),
            priority_mid: rgb(0xFFD700),
            priority_low: rgb(0x44FF88),
            selection_bg: rgb(0x3D1438),
            selection_border: rgb(0xFB4196),
            project_palette: [
                0x4488FF, 0x44DDFF, 0xCC66FF, 0xFF9E64, 0x9ECE6A, 0xF7768E, 0x7DCFFF, 0xE0AF68,
            ]
            .into_iter()
            .map(rgb)
            .collect(),
        }
    }
}

/// `#RRGGBB` only
fn parse_hex_color(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb)
}

impl Theme {
    /// Defaults with `[ui.colors]` applied. Unknown keys and malformed
    /// values are skipped.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            if let Some(slot) = theme.slot_mut(key) {
                *slot = color;
            }
        }
        theme
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "error" => &mut self.error,
            "warning" => &mut self.warning,
            "active" => &mut self.active,
            "urgent" => &mut self.urgent,
            "tag" => &mut self.tag,
            "priority_high" => &mut self.priority_high,
            "priority_mid" => &mut self.priority_mid,
            "priority_low" => &mut self.priority_low,
            "selection_bg" => &mut self.selection_bg,
            "selection_border" => &mut self.selection_border,
            _ => return None,
        })
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.priority_high,
            Priority::Mid => self.priority_mid,
            Priority::Low => self.priority_low,
            Priority::None => self.dim,
        }
    }

    /// Same project name, same color (within one process)
    pub fn project_color(&self, project: &str) -> Color {
        if project.is_empty() || self.project_palette.is_empty() {
            return self.text;
        }
        let mut hasher = DefaultHasher::new();
        project.hash(&mut hasher);
        let idx = (hasher.finish() % self.project_palette.len() as u64) as usize;
        self.project_palette[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#FB4196"), Some(Color::Rgb(0xFB, 0x41, 0x96)));
        assert_eq!(parse_hex_color("#0c001b"), Some(Color::Rgb(0x0C, 0x00, 0x1B)));
        assert_eq!(parse_hex_color("FB4196"), None);
        assert_eq!(parse_hex_color("#FB41"), None);
        assert_eq!(parse_hex_color("#+B4196"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn config_overrides_by_field_name() {
        let mut ui = UiConfig::default();
        ui.colors.insert("priority_high".into(), "#000000".into());
        ui.colors.insert("error".into(), "crimson".into());
        ui.colors.insert("no_such_role".into(), "#FFFFFF".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.priority_high, Color::Rgb(0, 0, 0));
        assert_eq!(theme.priority_color(Priority::High), Color::Rgb(0, 0, 0));
        assert_eq!(theme.error, Theme::default().error);
    }

    #[test]
    fn unprioritized_tasks_are_dim() {
        let theme = Theme::default();
        assert_eq!(theme.priority_color(Priority::None), theme.dim);
        assert_eq!(theme.priority_color(Priority::Low), theme.priority_low);
    }

    #[test]
    fn project_colors_are_stable() {
        let theme = Theme::default();
        let first = theme.project_color("home.garden");
        assert_eq!(theme.project_color("home.garden"), first);
        assert!(theme.project_palette.contains(&first));
        assert_eq!(theme.project_color(""), theme.text);
    }
}
