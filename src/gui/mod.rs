use std::time::{Duration, Instant};

use crate::notification::NotificationKind;
use crate::routes::Route;

mod chart;
mod group;
mod guest;
mod host;
pub mod state;

use state::{AppState, Page};

pub fn ui_main(ctx: &egui::Context, state: &mut AppState) {
    ctx.set_visuals(egui::Visuals::light());

    state.pump();
    state.notifications.prune(Instant::now());

    let mut navigate_to = None;
    let mut group_action = None;

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        egui::Frame::default()
            .outer_margin(egui::vec2(0.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                        ui.heading("Live Poll");
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Join a room").clicked() {
                            navigate_to = Some(Route::default());
                        }
                    });
                });
            });
    });

    egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Status: {}",
                if state.is_connected() {
                    "Connected"
                } else {
                    "Not Connected"
                }
            ));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(&state.status_message);
            });
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| match &mut state.page {
        Page::Guest(view) => guest::show(ui, view, &state.channel, &mut state.code_input),
        Page::Host(page) => host::show(ui, page, &mut state.notifications),
        Page::Group(header) => {
            group_action = group::show(ctx, ui, header, &mut state.notifications);
        }
    });

    if let Some(action) = group_action {
        group::perform(action, state);
    }

    show_notifications(ctx, state);

    if let Some(route) = navigate_to {
        state.navigate(route);
    }
}

fn show_notifications(ctx: &egui::Context, state: &mut AppState) {
    if state.notifications.items().is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 48.0))
        .show(ctx, |ui| {
            for (position, notification) in state.notifications.items().iter().enumerate() {
                let color = match notification.kind {
                    NotificationKind::Success => egui::Color32::from_rgb(0x2f, 0x9e, 0x44),
                    NotificationKind::Failure => egui::Color32::from_rgb(0xe0, 0x31, 0x31),
                };
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            if let Some(title) = &notification.title {
                                ui.strong(title);
                            }
                            if let Some(message) = &notification.message {
                                ui.colored_label(color, message);
                            }
                        });
                        if ui.small_button("x").clicked() {
                            dismissed = Some(position);
                        }
                    });
                });
            }
        });

    if let Some(position) = dismissed {
        state.notifications.dismiss(position);
    }
    ctx.request_repaint_after(Duration::from_millis(250));
}
