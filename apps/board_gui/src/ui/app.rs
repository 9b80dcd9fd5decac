use std::time::Duration;

use board_core::{
    view::{BoardRow, ClaimCell, ClaimDetail, ClockFace, NotificationToast, StatusCategory},
    BoardSession,
};
use eframe::egui;
use tokio::runtime::Runtime;
use tracing::info;

use crate::controller::events::{
    apply_action, describe_update, StatusLine, StatusSeverity, UiAction,
};

const TABLE_HEADERS: [&str; 10] = [
    "Policy No.",
    "Travellers",
    "Flight",
    "Route",
    "Status",
    "Expected",
    "Actual",
    "Claim No.",
    "Claim Status",
    "Paid",
];

const HIGHLIGHT_FILL: egui::Color32 = egui::Color32::from_rgb(37, 45, 86);

pub fn status_color(category: StatusCategory) -> egui::Color32 {
    match category {
        StatusCategory::OnTime => egui::Color32::from_rgb(35, 165, 90),
        StatusCategory::Delayed => egui::Color32::from_rgb(214, 142, 36),
        StatusCategory::Cancelled => egui::Color32::from_rgb(240, 71, 71),
        StatusCategory::Default => egui::Color32::from_rgb(110, 115, 125),
    }
}

pub struct FlightBoardApp {
    session: BoardSession,
    status: Option<StatusLine>,
    // Dropped after the session so its timer tasks are aborted first.
    _runtime: Runtime,
}

impl FlightBoardApp {
    pub fn new(session: BoardSession, runtime: Runtime) -> Self {
        info!("ui: flight board ready");
        Self {
            session,
            status: None,
            _runtime: runtime,
        }
    }

    fn process_session_updates(&mut self) {
        for update in self.session.pump() {
            if let Some(line) = describe_update(&update) {
                self.status = Some(line);
            }
        }
    }

    fn show_header(&self, ui: &mut egui::Ui, clock: &ClockFace) {
        ui.horizontal(|ui| {
            ui.heading("Claim Command Center");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&clock.time).monospace().size(22.0));
                    ui.small(format!("{} | {}", clock.date, clock.caption));
                });
            });
        });
    }

    fn show_status_line(&self, ui: &mut egui::Ui) {
        match &self.status {
            Some(line) => {
                let color = match line.severity {
                    StatusSeverity::Info => ui.visuals().weak_text_color(),
                    StatusSeverity::Warning => egui::Color32::from_rgb(214, 142, 36),
                };
                ui.label(egui::RichText::new(&line.message).color(color));
            }
            None => {
                ui.small(egui::RichText::new("Waiting for claim activity").weak());
            }
        }
    }

    fn show_table(&self, ui: &mut egui::Ui, rows: &[BoardRow], actions: &mut Vec<UiAction>) {
        // Grid row 0 is the header.
        let highlighted = rows.iter().position(|row| row.highlighted).map(|i| i + 1);

        egui::Grid::new("flight_board")
            .striped(true)
            .spacing(egui::vec2(16.0, 8.0))
            .with_row_color(move |row, _style| (Some(row) == highlighted).then_some(HIGHLIGHT_FILL))
            .show(ui, |ui| {
                for header in TABLE_HEADERS {
                    ui.label(egui::RichText::new(header).strong());
                }
                ui.end_row();

                for row in rows {
                    ui.label(&row.policy_number);
                    ui.label(&row.travellers);
                    ui.label(egui::RichText::new(&row.flight_number).monospace());
                    ui.label(&row.route);
                    status_badge(ui, &row.status_label, row.status_category);
                    ui.label(&row.expected_departure);
                    ui.label(&row.actual_departure);
                    match &row.claim_number {
                        ClaimCell::Link(number) => {
                            if ui.link(number).clicked() {
                                actions.push(UiAction::OpenClaim(row.id));
                            }
                        }
                        ClaimCell::Sentinel => {
                            ui.label(row.claim_number.text());
                        }
                    }
                    ui.label(&row.claim_status);
                    ui.label(&row.claim_paid_amount);
                    ui.end_row();
                }
            });
    }

    fn show_claim_detail(
        &self,
        ctx: &egui::Context,
        detail: &ClaimDetail,
        actions: &mut Vec<UiAction>,
    ) {
        let mut open = true;
        egui::Window::new("Claim Details")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("claim_detail_fields")
                    .num_columns(2)
                    .spacing(egui::vec2(12.0, 6.0))
                    .show(ui, |ui| {
                        for (label, value) in [
                            ("Claim No.", &detail.claim_number),
                            ("Flight", &detail.flight_number),
                            ("Status", &detail.status),
                            ("Amount", &detail.amount),
                        ] {
                            ui.label(egui::RichText::new(label).strong());
                            ui.label(value);
                            ui.end_row();
                        }
                    });
                ui.separator();
                ui.label(detail.message());
                ui.add_space(6.0);
                if ui.button("Close").clicked() {
                    actions.push(UiAction::CloseClaimDialog);
                }
            });
        if !open {
            actions.push(UiAction::CloseClaimDialog);
        }
    }

    fn show_notification(
        &self,
        ctx: &egui::Context,
        toast: &NotificationToast,
        actions: &mut Vec<UiAction>,
    ) {
        let frame = egui::Frame::NONE
            .fill(ctx.style().visuals.window_fill)
            .stroke(egui::Stroke::new(1.0, status_color(StatusCategory::OnTime)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 10));

        egui::Window::new("claim_notification")
            .title_bar(false)
            .resizable(false)
            .frame(frame)
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&toast.sender).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            actions.push(UiAction::DismissNotification);
                        }
                    });
                });
                ui.label(&toast.body);
            });
    }
}

fn status_badge(ui: &mut egui::Ui, label: &str, category: StatusCategory) {
    egui::Frame::NONE
        .fill(status_color(category))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(label)
                    .small()
                    .color(egui::Color32::WHITE),
            );
        });
}

impl eframe::App for FlightBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_session_updates();

        let view = self.session.view();
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("board_header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.show_header(ui, &view.clock);
            ui.add_space(6.0);
        });
        egui::TopBottomPanel::bottom("board_status").show(ctx, |ui| {
            self.show_status_line(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.show_table(ui, &view.rows, &mut actions);
            });
        });

        if let Some(detail) = &view.claim_detail {
            self.show_claim_detail(ctx, detail, &mut actions);
        }
        if let Some(toast) = &view.notification {
            self.show_notification(ctx, toast, &mut actions);
        }

        for action in actions {
            apply_action(&mut self.session, action);
        }

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
