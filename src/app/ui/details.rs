use eframe::egui::{Align, Color32, Grid, Layout, RichText, Ui};

use crate::util::{format_compact, format_currency, format_percent, format_price};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(stock) = self
            .selected
            .as_deref()
            .and_then(|id| self.stocks.iter().find(|stock| stock.id == id))
        else {
            self.selected = None;
            return;
        };

        let mut close = false;
        let mut focus_sector = None;

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading(&stock.symbol);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });
        ui.label(RichText::new(&stock.name).weak());
        ui.add_space(8.0);

        let change_color = if stock.is_gaining() {
            Color32::from_rgb(74, 222, 128)
        } else {
            Color32::from_rgb(248, 113, 113)
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(format_price(stock.price)).size(22.0).strong());
            ui.label(
                RichText::new(format_percent(stock.change_percent))
                    .size(16.0)
                    .color(change_color),
            );
        });
        ui.add_space(8.0);
        ui.separator();

        Grid::new("stock_details")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Change");
                ui.label(RichText::new(format_price(stock.change.abs())).color(change_color));
                ui.end_row();

                ui.label("Previous close");
                ui.label(format_price(stock.previous_price));
                ui.end_row();

                ui.label("Market cap");
                ui.label(format_currency(stock.market_cap));
                ui.end_row();

                ui.label("Volume");
                ui.label(format_compact(stock.volume as f64));
                ui.end_row();

                ui.label("Sector");
                if ui.link(&stock.sector).clicked() {
                    focus_sector = Some(stock.sector.clone());
                }
                ui.end_row();
            });

        if let Some(sector) = focus_sector {
            self.selected_sector = sector;
            self.mark_filters_dirty();
        }
        if close {
            self.selected = None;
        }
    }
}
