use crate::analysis::AnalysisEngine;
use crate::event::AppEvent;
use crate::session::{self, SessionState};
use crate::store::{ErrorKind, ErrorRecord, ErrorStore, Severity};
use crate::theme::Theme;
use chrono::{DateTime, Duration, Utc};
use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Sense, Stroke};
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::debug;

pub struct FaultlineApp {
    rx: Receiver<AppEvent>,
    engine: AnalysisEngine,
    store: ErrorStore,
    session: SessionState,
    theme: Theme,
    diagnostics_log: Vec<String>,
}

impl FaultlineApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        engine: AnalysisEngine,
        store: ErrorStore,
        warnings: Vec<String>,
    ) -> Self {
        let mut app = Self {
            rx,
            engine,
            store,
            session: SessionState::default(),
            theme: Theme::default(),
            diagnostics_log: Vec::new(),
        };

        for warning in warnings {
            app.apply_event(AppEvent::DatasetWarning(warning), None);
        }

        app
    }

    pub fn apply_theme(&self, ctx: &egui::Context) {
        self.theme.apply_visuals(ctx);
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{message}");
        self.diagnostics_log
            .push(format!("[{}] {message}", Utc::now().format("%H:%M:%S")));
    }

    fn select_error(&mut self, error_id: u32) {
        let request = self.session.begin_analysis(error_id);
        self.engine.request(request);
        self.log_diagnostic(format!("analysis started for error #{error_id}"));
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, Some(ctx)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: Option<&egui::Context>) {
        match event {
            AppEvent::AnalysisReady {
                generation,
                error_id,
                analysis,
            } => {
                let missing = analysis.is_none();
                if self.session.apply_analysis(generation, analysis) {
                    if missing {
                        self.log_diagnostic(format!("no analysis available for error #{error_id}"));
                    } else {
                        self.log_diagnostic(format!("analysis revealed for error #{error_id}"));
                    }
                } else {
                    self.log_diagnostic(format!(
                        "dropped superseded analysis for error #{error_id}"
                    ));
                }
                if let Some(ctx) = ctx {
                    ctx.request_repaint();
                }
            }
            AppEvent::DatasetWarning(warning) => {
                self.log_diagnostic(format!("dataset warning: {warning}"));
            }
        }
    }

    fn tag(&self, ui: &mut egui::Ui, text: &str, color: Color32) {
        egui::Frame::new()
            .fill(self.theme.tag_fill(color))
            .corner_radius(egui::CornerRadius::same(self.theme.radius_8 / 2))
            .inner_margin(egui::Margin::symmetric(6, 2))
            .show(ui, |ui| {
                ui.label(RichText::new(text).color(color).small());
            });
    }

    fn stat_card(
        &self,
        ui: &mut egui::Ui,
        label: &str,
        value: String,
        sub: &str,
        accent: Option<Color32>,
    ) {
        self.theme.card_frame().show(ui, |ui| {
            ui.set_min_width(140.0);
            ui.label(RichText::new(label).color(self.theme.text_faint).small());
            ui.label(
                RichText::new(value)
                    .color(accent.unwrap_or(self.theme.text_primary))
                    .strong()
                    .size(26.0),
            );
            ui.label(RichText::new(sub).color(self.theme.text_faint).small());
        });
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Faultline");
                ui.separator();
                ui.label(
                    RichText::new("Frontend & backend error tracking · AI-assisted root cause")
                        .color(self.theme.text_muted)
                        .small(),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(
                        RichText::new("LIVE MONITORING")
                            .color(self.theme.live_badge)
                            .small(),
                    );
                });
            });
        });
    }

    fn render_stats(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            self.stat_card(
                ui,
                "TOTAL ERRORS",
                self.store.len().to_string(),
                &format!("{} occurrences", self.store.total_occurrences()),
                None,
            );
            self.stat_card(
                ui,
                "CRITICAL",
                self.store.critical_count().to_string(),
                "needs attention",
                Some(self.theme.critical),
            );
            self.stat_card(
                ui,
                "FRONTEND",
                self.store.frontend_count().to_string(),
                "client-side",
                Some(self.theme.frontend),
            );
            self.stat_card(
                ui,
                "BACKEND",
                self.store.backend_count().to_string(),
                "server-side",
                Some(self.theme.backend),
            );
        });
    }

    fn render_filters(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.add(
                egui::TextEdit::singleline(self.session.search_query_mut())
                    .desired_width(200.0)
                    .hint_text("Search errors..."),
            );
            ui.separator();

            let mut kind_filter = self.session.kind_filter();
            if ui.selectable_label(kind_filter.is_none(), "All").clicked() {
                kind_filter = None;
            }
            for kind in ErrorKind::ALL {
                let active = kind_filter == Some(kind);
                if ui.selectable_label(active, kind.label()).clicked() {
                    kind_filter = Some(kind);
                }
            }
            self.session.set_kind_filter(kind_filter);
            ui.separator();

            let mut severity_filter = self.session.severity_filter();
            if ui
                .selectable_label(severity_filter.is_none(), "All severities")
                .clicked()
            {
                severity_filter = None;
            }
            for severity in Severity::ALL {
                let active = severity_filter == Some(severity);
                let label =
                    RichText::new(severity.label()).color(self.theme.severity_color(severity));
                if ui.selectable_label(active, label).clicked() {
                    severity_filter = Some(severity);
                }
            }
            self.session.set_severity_filter(severity_filter);
        });
    }

    fn render_error_row(&self, ui: &mut egui::Ui, record: &ErrorRecord) -> bool {
        let selected = self.session.selected() == Some(record.id);
        let severity_color = self.theme.severity_color(record.severity);
        let fill = if selected {
            self.theme.surface_3
        } else {
            self.theme.surface_2
        };
        let stroke = if selected {
            Stroke::new(1.0, severity_color)
        } else {
            Stroke::new(1.0, self.theme.border_subtle)
        };

        let response = egui::Frame::new()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(egui::CornerRadius::same(self.theme.radius_8))
            .inner_margin(egui::Margin::same(self.theme.spacing_12 as i8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    self.tag(ui, record.kind.label(), self.theme.kind_color(record.kind));
                    self.tag(ui, record.severity.label(), severity_color);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("×{}", record.count))
                                .color(self.theme.text_faint)
                                .monospace(),
                        );
                    });
                });
                ui.add(
                    egui::Label::new(RichText::new(&record.message).monospace()).truncate(),
                );
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(&record.source)
                            .color(self.theme.text_faint)
                            .small(),
                    );
                    ui.label(
                        RichText::new(time_ago(record.timestamp))
                            .color(self.theme.text_faint)
                            .small(),
                    );
                    if let Some(url) = &record.url {
                        ui.label(RichText::new(url).color(self.theme.text_faint).small());
                    }
                    if let Some(endpoint) = &record.endpoint {
                        ui.label(RichText::new(endpoint).color(self.theme.text_faint).small());
                    }
                });
            })
            .response;

        response.interact(Sense::click()).clicked()
    }

    fn render_center(&mut self, ctx: &egui::Context) {
        let mut clicked: Option<u32> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_stats(ui);
            ui.add_space(self.theme.spacing_8);
            self.render_filters(ui);
            ui.add_space(self.theme.spacing_8);

            let view = self.session.filtered_view(&self.store);
            ui.label(
                RichText::new(format!("{} errors shown", view.len()))
                    .color(self.theme.text_muted)
                    .small(),
            );

            let list_height = (ui.available_height() - 140.0).max(160.0);
            ScrollArea::vertical()
                .id_salt("error_list")
                .max_height(list_height)
                .show(ui, |ui| {
                    for record in &view {
                        if self.render_error_row(ui, record) {
                            clicked = Some(record.id);
                        }
                        ui.add_space(self.theme.spacing_4);
                    }
                });

            ui.separator();
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(RichText::new(entry).small());
                            }
                        });
                });
        });

        if let Some(error_id) = clicked {
            self.select_error(error_id);
        }
    }

    fn render_analysis_panel(&mut self, ctx: &egui::Context) {
        let mut follow_related: Option<u32> = None;

        egui::SidePanel::right("analysis_panel")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("AI Error Analysis");
                });
                ui.separator();

                let selected = self.session.selected().and_then(|id| self.store.get(id));

                if self.session.is_analyzing() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.add(egui::Spinner::new().size(32.0));
                        ui.add_space(self.theme.spacing_8);
                        ui.label(
                            RichText::new("Analyzing error...")
                                .color(self.theme.text_muted)
                                .small(),
                        );
                    });
                    return;
                }

                let Some(record) = selected else {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.label(
                            RichText::new("Select an error to start AI analysis")
                                .color(self.theme.text_muted),
                        );
                    });
                    return;
                };

                let Some(analysis) = self.session.revealed() else {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.label(
                            RichText::new("No analysis available for this error")
                                .color(self.theme.text_muted),
                        );
                    });
                    return;
                };

                ScrollArea::vertical().id_salt("analysis_body").show(ui, |ui| {
                    self.theme.card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            RichText::new("SELECTED ERROR")
                                .color(self.theme.text_faint)
                                .small(),
                        );
                        ui.label(RichText::new(&record.message).monospace());
                    });
                    ui.add_space(self.theme.spacing_8);

                    ui.label(RichText::new("CATEGORY").color(self.theme.text_faint).small());
                    ui.horizontal(|ui| {
                        self.tag(ui, &analysis.category, self.theme.accent_primary);
                    });
                    ui.add_space(self.theme.spacing_8);

                    ui.label(
                        RichText::new("CONFIDENCE")
                            .color(self.theme.text_faint)
                            .small(),
                    );
                    ui.add(
                        egui::ProgressBar::new(f32::from(analysis.confidence) / 100.0)
                            .fill(self.theme.confidence_color(analysis.confidence))
                            .text(
                                RichText::new(format!("{}%", analysis.confidence))
                                    .small()
                                    .color(self.theme.text_primary),
                            ),
                    );
                    ui.add_space(self.theme.spacing_8);

                    ui.label(
                        RichText::new("ROOT CAUSE")
                            .color(self.theme.text_faint)
                            .small(),
                    );
                    self.theme.card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(&analysis.root_cause);
                    });
                    ui.add_space(self.theme.spacing_8);

                    ui.label(
                        RichText::new("SUGGESTED FIXES")
                            .color(self.theme.text_faint)
                            .small(),
                    );
                    for (index, suggestion) in analysis.suggestions.iter().enumerate() {
                        self.theme.card_frame().show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal_wrapped(|ui| {
                                ui.label(
                                    RichText::new(format!("{}.", index + 1))
                                        .color(self.theme.backend)
                                        .strong(),
                                );
                                ui.label(suggestion);
                            });
                        });
                    }
                    ui.add_space(self.theme.spacing_8);

                    ui.label(
                        RichText::new("STACK TRACE")
                            .color(self.theme.text_faint)
                            .small(),
                    );
                    self.theme
                        .panel_frame(self.theme.surface_0, self.theme.spacing_12 as i8)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(
                                RichText::new(&record.stack)
                                    .monospace()
                                    .color(self.theme.text_muted),
                            );
                        });

                    let related = session::resolve_related(&self.store, &analysis.related_errors);
                    if !related.is_empty() {
                        ui.add_space(self.theme.spacing_8);
                        ui.label(
                            RichText::new("RELATED ERRORS")
                                .color(self.theme.text_faint)
                                .small(),
                        );
                        for related_record in related {
                            let label = format!(
                                "#{} · {}",
                                related_record.id, related_record.message
                            );
                            if ui
                                .add(
                                    egui::Button::new(
                                        RichText::new(label)
                                            .color(self.theme.text_muted)
                                            .small(),
                                    )
                                    .wrap_mode(egui::TextWrapMode::Truncate),
                                )
                                .clicked()
                            {
                                follow_related = Some(related_record.id);
                            }
                        }
                    }
                });
            });

        if let Some(error_id) = follow_related {
            self.select_error(error_id);
        }
    }
}

impl eframe::App for FaultlineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.render_header(ctx);
        self.render_analysis_panel(ctx);
        self.render_center(ctx);

        // The reveal arrives on a channel, not through input; keep polling
        // while a request is pending so it is picked up promptly.
        if self.session.is_analyzing() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

fn format_age(age: Duration) -> String {
    let mins = age.num_minutes();
    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if age.num_hours() < 24 {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}d ago", age.num_days())
    }
}

fn time_ago(timestamp: DateTime<Utc>) -> String {
    format_age(Utc::now() - timestamp)
}
