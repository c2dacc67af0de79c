use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::SignalTableView;
use eframe::egui;

/// One side's trade table under its "execute" / "refrain" heading.
pub fn render_signal_table(ui: &mut egui::Ui, id: &str, table: &SignalTableView) {
    DesignSystem::card_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        let heading_color = if table.rows.is_empty() {
            DesignSystem::TEXT_SECONDARY
        } else {
            DesignSystem::SUCCESS
        };
        ui.label(
            egui::RichText::new(table.heading)
                .strong()
                .size(15.0)
                .color(heading_color),
        );
        ui.add_space(DesignSystem::SPACING_SMALL);

        egui::ScrollArea::vertical()
            .id_salt(id)
            .max_height(220.0)
            .show(ui, |ui| {
                egui::Grid::new(id)
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([20.0, 8.0])
                    .show(ui, |ui| {
                        // Header
                        ui.label(egui::RichText::new("TIME").strong());
                        ui.label(egui::RichText::new("STRIKE PRICE").strong());
                        ui.label(egui::RichText::new("STOPLOSS").strong());
                        ui.end_row();

                        for row in &table.rows {
                            ui.label(&row.time);
                            ui.label(
                                egui::RichText::new(&row.strike_price)
                                    .strong()
                                    .color(egui::Color32::GOLD),
                            );
                            ui.label(&row.stop_loss);
                            ui.end_row();
                        }
                    });
            });
    });
}
