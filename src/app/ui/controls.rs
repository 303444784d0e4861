use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::util::{format_currency, format_percent};

use super::super::ViewModel;

const GAIN_TEXT: Color32 = Color32::from_rgb(74, 222, 128);
const LOSS_TEXT: Color32 = Color32::from_rgb(248, 113, 113);

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.add_space(4.0);
        ui.heading("Filters");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Search");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("symbol or name")
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                self.mark_filters_dirty();
            }
        });

        ui.horizontal(|ui| {
            ui.label("Sector");
            let mut selection = self.selected_sector.clone();
            let changed = egui::ComboBox::from_id_salt("sector_filter")
                .selected_text(selection.clone())
                .show_ui(ui, |ui| {
                    let mut changed = false;
                    for sector in &self.sectors {
                        changed |= ui
                            .selectable_value(&mut selection, sector.clone(), sector)
                            .changed();
                    }
                    changed
                })
                .inner
                .unwrap_or(false);
            if changed {
                self.selected_sector = selection;
                self.mark_filters_dirty();
            }
        });

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Refresh");
        ui.add_space(4.0);

        ui.checkbox(&mut self.auto_refresh, "Auto refresh");
        ui.add_enabled(
            self.auto_refresh,
            Slider::new(&mut self.refresh_secs, 2.0..=60.0)
                .suffix(" s")
                .text("interval"),
        );

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Layout");
        ui.add_space(4.0);

        if ui.button("Re-settle layout").clicked() {
            self.resettle_requested = true;
        }

        egui::CollapsingHeader::new("Physics tuning")
            .default_open(false)
            .show(ui, |ui| {
                let config = &mut self.sim_config;
                ui.add(
                    Slider::new(&mut config.center_pull, 0.0..=0.2)
                        .text("center pull"),
                );
                ui.add(
                    Slider::new(&mut config.repulsion, 0.0..=8000.0)
                        .text("repulsion"),
                );
                ui.add(
                    Slider::new(&mut config.collision_padding, 0.0..=16.0)
                        .suffix(" px")
                        .text("padding"),
                );
                ui.add(
                    Slider::new(&mut config.damping, 0.5..=0.99)
                        .text("damping"),
                );
                ui.add(
                    Slider::new(&mut config.max_settle_secs, 1.0..=20.0)
                        .suffix(" s")
                        .text("settle budget"),
                );
                ui.add(
                    Slider::new(&mut config.nudge_temperature, 0.05..=1.0)
                        .text("nudge heat"),
                );

                let mut filler_floor = config.filler_floor;
                ui.add(
                    Slider::new(&mut filler_floor, 0..=80)
                        .text("filler bodies"),
                );
                if filler_floor != config.filler_floor {
                    config.filler_floor = filler_floor;
                    // Fillers only change population on reconcile.
                    self.mark_filters_dirty();
                }
            });

        ui.checkbox(&mut self.show_table, "Show table");
        ui.checkbox(&mut self.show_fps_bar, "Show FPS");

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Sectors");
        ui.add_space(4.0);

        ScrollArea::vertical()
            .id_salt("sector_perf")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for sector in &self.sector_perf {
                    ui.horizontal(|ui| {
                        ui.label(&sector.name);
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                let color = if sector.average_change_percent >= 0.0 {
                                    GAIN_TEXT
                                } else {
                                    LOSS_TEXT
                                };
                                ui.label(
                                    RichText::new(format_percent(
                                        sector.average_change_percent,
                                    ))
                                    .color(color),
                                );
                                ui.label(
                                    RichText::new(format_currency(sector.total_market_cap))
                                        .weak(),
                                );
                            },
                        );
                    });
                }
            });
    }
}
