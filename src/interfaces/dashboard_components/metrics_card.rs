use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::MetricView;
use eframe::egui;

/// Renders one headline metric: title and icon, large value, optional delta line.
pub fn render_metric_card(ui: &mut egui::Ui, metric: &MetricView) {
    let card_size = egui::vec2(220.0, 100.0);

    ui.allocate_ui_with_layout(card_size, egui::Layout::top_down(egui::Align::LEFT), |ui| {
        egui::Frame::NONE
            .fill(DesignSystem::BG_CARD)
            .inner_margin(egui::Margin::same(12))
            .corner_radius(8)
            .shadow(egui::epaint::Shadow {
                offset: [0, 4],
                blur: 16,
                spread: 0,
                color: egui::Color32::from_black_alpha(100),
            })
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(10)))
            .show(ui, |ui| {
                ui.set_width(196.0);
                ui.set_height(76.0);

                // Row 1: Title (Left) + Icon (Right)
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(metric.title.to_uppercase())
                            .size(10.0)
                            .color(egui::Color32::from_gray(140))
                            .strong(),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(metric.icon)
                                .size(14.0)
                                .color(DesignSystem::ACCENT_SECONDARY.linear_multiply(0.8)),
                        );
                    });
                });

                ui.add_space(6.0);

                // Row 2: Value
                ui.label(
                    egui::RichText::new(&metric.value)
                        .size(24.0)
                        .strong()
                        .color(DesignSystem::TEXT_PRIMARY),
                );

                // Row 3: Delta
                if let Some(sub) = &metric.subtitle {
                    ui.add_space(4.0);
                    let arrow = if sub.starts_with('-') { "↘" } else { "↗" };
                    ui.label(
                        egui::RichText::new(format!("{} {}", arrow, sub))
                            .size(11.0)
                            .color(metric.color),
                    );
                }
            });
    });
}
