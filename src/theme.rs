use crate::store::{ErrorKind, Severity};
use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_primary: Color32,
    pub accent_muted: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_faint: Color32,
    pub border_subtle: Color32,
    pub live_badge: Color32,
    pub critical: Color32,
    pub high: Color32,
    pub medium: Color32,
    pub low: Color32,
    pub frontend: Color32,
    pub backend: Color32,
    pub confidence_good: Color32,
    pub confidence_warn: Color32,
    pub confidence_bad: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub radius_8: u8,
    pub radius_12: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0x0A, 0x0A, 0x0C),
            surface_1: Color32::from_rgb(0x12, 0x13, 0x17),
            surface_2: Color32::from_rgb(0x1A, 0x1C, 0x22),
            surface_3: Color32::from_rgb(0x23, 0x26, 0x2E),
            accent_primary: Color32::from_rgb(0x7B, 0x68, 0xEE),
            accent_muted: Color32::from_rgb(0x5A, 0x4C, 0xC0),
            text_primary: Color32::from_rgb(0xE8, 0xE8, 0xED),
            text_muted: Color32::from_rgb(0x8B, 0x94, 0x9E),
            text_faint: Color32::from_rgb(0x5C, 0x62, 0x6B),
            border_subtle: Color32::from_rgba_premultiplied(255, 255, 255, 13),
            live_badge: Color32::from_rgb(0x00, 0xD4, 0xAA),
            critical: Color32::from_rgb(0xFF, 0x2D, 0x55),
            high: Color32::from_rgb(0xFF, 0x95, 0x00),
            medium: Color32::from_rgb(0xFF, 0xCC, 0x00),
            low: Color32::from_rgb(0x34, 0xC7, 0x59),
            frontend: Color32::from_rgb(0x7B, 0x68, 0xEE),
            backend: Color32::from_rgb(0x00, 0xD4, 0xAA),
            confidence_good: Color32::from_rgb(0x00, 0xD4, 0xAA),
            confidence_warn: Color32::from_rgb(0xFF, 0xCC, 0x00),
            confidence_bad: Color32::from_rgb(0xFF, 0x2D, 0x55),
            spacing_4: 4.0,
            spacing_8: 8.0,
            spacing_12: 12.0,
            radius_8: 8,
            radius_12: 12,
        }
    }
}

impl Theme {
    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn kind_color(&self, kind: ErrorKind) -> Color32 {
        match kind {
            ErrorKind::Frontend => self.frontend,
            ErrorKind::Backend => self.backend,
        }
    }

    /// Color band for a confidence percentage: >90 good, >80 warn, else bad.
    pub fn confidence_color(&self, confidence: u8) -> Color32 {
        if confidence > 90 {
            self.confidence_good
        } else if confidence > 80 {
            self.confidence_warn
        } else {
            self.confidence_bad
        }
    }

    /// Translucent tag background derived from the tag's foreground color.
    pub fn tag_fill(&self, color: Color32) -> Color32 {
        color.gamma_multiply(0.15)
    }

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.surface_1;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;
        visuals.widgets.noninteractive.bg_fill = self.surface_2;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_2;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.fg_stroke.color = self.text_muted;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.surface_3;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.fg_stroke.color = self.text_primary;
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.widgets.active.fg_stroke.color = self.text_primary;
        visuals.widgets.open.bg_fill = self.surface_3;
        visuals.widgets.open.bg_stroke = Stroke::NONE;
        visuals.selection.bg_fill = self.accent_muted;
        visuals.hyperlink_color = self.accent_primary;
        visuals.window_fill = self.surface_1;
        visuals.window_stroke = Stroke::NONE;
        visuals.window_corner_radius = CornerRadius::same(self.radius_8);

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(17.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(12.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(11.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self, fill: Color32, inner_padding: i8) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(inner_padding))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn card_frame(&self) -> Frame {
        self.panel_frame(self.surface_2, self.spacing_12 as i8)
    }
}
