use super::chart;
use super::state::HostPage;
use crate::flow::HostScreen;
use crate::notification::Notifications;

pub fn show(ui: &mut egui::Ui, page: &HostPage, notifications: &mut Notifications) {
    let view = match page {
        HostPage::Fetching { presentation_id } => {
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label(format!("Loading presentation {}...", presentation_id));
            });
            return;
        }
        HostPage::Failed { presentation_id } => {
            ui.vertical_centered(|ui| {
                ui.label(format!("Presentation {} could not be loaded.", presentation_id));
            });
            return;
        }
        HostPage::Live(view) => view,
    };

    match view.screen() {
        HostScreen::Loading => {
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label("Creating room...");
            });
        }
        HostScreen::Ready {
            room_id,
            invitation_link,
            chart: model,
            time,
        } => {
            ui.horizontal_wrapped(|ui| {
                ui.label("Copy the code");
                if ui.button(&room_id).clicked() {
                    ui.ctx().copy_text(room_id.clone());
                    notifications.show_success(None, Some("Copy to clipboard"));
                }
                ui.label("or the link");
                if ui.button(&invitation_link).clicked() {
                    ui.ctx().copy_text(invitation_link.clone());
                    notifications.show_success(None, Some("Copy to clipboard"));
                }
            });
            ui.label(format!("{} seconds per question", time));
            ui.separator();
            chart::show(ui, &model);
        }
    }
}
