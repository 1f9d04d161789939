use super::state::{AppState, Page};
use crate::group::GroupHeader;
use crate::notification::Notifications;

/// Header interactions that need a background request.
pub enum GroupAction {
    RequestInvitationLink,
    SendInvite(String),
}

pub fn show(
    ctx: &egui::Context,
    ui: &mut egui::Ui,
    header: &mut GroupHeader,
    notifications: &mut Notifications,
) -> Option<GroupAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        let crumbs = header.breadcrumbs();
        for (position, crumb) in crumbs.iter().enumerate() {
            if position > 0 {
                ui.label("/");
            }
            ui.label(&crumb.title);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.menu_button("Invite people", |ui| {
                if ui.button("Get invitation link").clicked() {
                    action = Some(GroupAction::RequestInvitationLink);
                    ui.close_menu();
                }
                if ui.button("Send invitation via email").clicked() {
                    header.open_invite_form();
                    ui.close_menu();
                }
            });
        });
    });

    if let Some(group) = header.group() {
        ui.separator();
        ui.heading(&group.name);
        if let Some(description) = &group.description {
            ui.label(description);
        }
    }

    if header.invitation_open {
        let mut open = true;
        let mut copied = None;
        egui::Window::new("Invitation link")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let mut link = header.invitation_link().unwrap_or_default().to_string();
                ui.add_enabled(false, egui::TextEdit::singleline(&mut link));
                ui.vertical_centered(|ui| {
                    if ui.button("Copy link").clicked() {
                        copied = header.copy_invitation_link(notifications);
                    }
                });
            });
        if let Some(link) = copied {
            ctx.copy_text(link);
        }
        if !open {
            header.close_invitation();
        }
    }

    if header.invite_form.open {
        let mut open = true;
        let mut submit = false;
        egui::Window::new("Invite via email")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Email");
                ui.add(
                    egui::TextEdit::singleline(&mut header.invite_form.email)
                        .hint_text("Email you want invite"),
                );
                if let Some(error) = header.invite_form.error {
                    ui.colored_label(egui::Color32::RED, error);
                }
                ui.vertical_centered(|ui| {
                    let send = egui::Button::new(if header.invite_form.submitting {
                        "Sending..."
                    } else {
                        "Send link"
                    });
                    if ui.add_enabled(!header.invite_form.submitting, send).clicked() {
                        submit = true;
                    }
                });
            });
        if submit {
            if let Some(email) = header.begin_invite() {
                action = Some(GroupAction::SendInvite(email));
            }
        }
        if !open {
            header.close_invite_form();
        }
    }

    action
}

pub fn perform(action: GroupAction, state: &mut AppState) {
    let Page::Group(header) = &state.page else {
        return;
    };
    let group_id = header.group_id().to_string();
    match action {
        GroupAction::RequestInvitationLink => state.fetch_invitation_link(group_id),
        GroupAction::SendInvite(email) => state.send_invite(group_id, email),
    }
}
