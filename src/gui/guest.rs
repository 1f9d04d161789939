use crate::channel::Channel;
use crate::flow::{GuestScreen, GuestView};

pub fn show(ui: &mut egui::Ui, view: &GuestView, channel: &dyn Channel, code_input: &mut String) {
    match view.screen() {
        GuestScreen::EnterCode => {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading("Join");
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    let input = ui.add(
                        egui::TextEdit::singleline(code_input).hint_text("Enter room id here"),
                    );
                    let submitted =
                        input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Join").clicked() || submitted {
                        view.join(channel, code_input);
                    }
                });
            });
        }
        GuestScreen::Waiting { room_id } => {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.spinner();
                ui.label(format!("Joined room {}, waiting for the question...", room_id));
            });
        }
        GuestScreen::Voting { title, options } => {
            ui.vertical_centered(|ui| {
                ui.heading(title);
            });
            ui.add_space(12.0);

            let columns = match ui.available_width() {
                w if w > 980.0 => 4,
                w if w > 755.0 => 3,
                w if w > 600.0 => 2,
                _ => 1,
            };
            egui::Grid::new("vote_options")
                .num_columns(columns)
                .spacing(egui::vec2(12.0, 12.0))
                .show(ui, |ui| {
                    for (position, option) in options.iter().enumerate() {
                        if ui.button(&option.value).clicked() {
                            view.vote(channel, position);
                        }
                        if (position + 1) % columns == 0 {
                            ui.end_row();
                        }
                    }
                });
        }
        GuestScreen::Voted { title, choice } => {
            ui.vertical_centered(|ui| {
                ui.heading(title);
                ui.add_space(12.0);
                ui.label(format!("You voted for {}", choice));
            });
        }
    }
}
