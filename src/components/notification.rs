use eframe::egui;

/// Blocking message box.  The app disables the page underneath while a
/// message is showing.
#[derive(Default)]
pub struct Notification {
    message: Option<String>,
}

impl Notification {
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log_info!("Notify: {}", message);
        self.message = Some(message);
    }

    pub fn is_open(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(message) = self.message().map(str::to_owned) else {
            return;
        };

        let enter = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));
        let esc = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));
        let mut should_close = enter || esc;

        egui::Window::new("notification_internal")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new(message).size(15.0));
                    ui.add_space(12.0);
                    if ui.button("   OK   ").clicked() {
                        should_close = true;
                    }
                    ui.add_space(4.0);
                });
            });

        if should_close {
            self.dismiss();
        }
    }
}
