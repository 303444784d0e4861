use eframe::egui::{Color32, Grid, RichText, ScrollArea, Ui};

use crate::market::{SortDirection, SortKey};
use crate::util::{format_compact, format_currency, format_percent, format_price};

use super::super::ViewModel;

const COLUMNS: [SortKey; 4] = [
    SortKey::Name,
    SortKey::Price,
    SortKey::ChangePercent,
    SortKey::MarketCap,
];

impl ViewModel {
    pub(in crate::app) fn draw_table(&mut self, ui: &mut Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for key in COLUMNS {
                let active = self.sort_key == key;
                let label = if active {
                    format!("{} {}", key.label(), self.sort_direction.arrow())
                } else {
                    key.label().to_string()
                };
                if ui.selectable_label(active, label).clicked() {
                    if active {
                        self.sort_direction = self.sort_direction.flipped();
                    } else {
                        self.sort_key = key;
                        self.sort_direction = SortDirection::Descending;
                    }
                    self.mark_filters_dirty();
                }
            }
        });
        ui.separator();

        let mut clicked = None;
        ScrollArea::vertical()
            .id_salt("stock_table")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Grid::new("stock_rows")
                    .num_columns(7)
                    .striped(true)
                    .min_col_width(90.0)
                    .show(ui, |ui| {
                        for stock in &self.filtered {
                            let selected = self.selected.as_deref() == Some(stock.id.as_str());
                            if ui.selectable_label(selected, &stock.symbol).clicked() {
                                clicked = Some(stock.id.clone());
                            }
                            ui.label(RichText::new(&stock.name).weak());
                            ui.label(format_price(stock.price));
                            let color = if stock.is_gaining() {
                                Color32::from_rgb(74, 222, 128)
                            } else {
                                Color32::from_rgb(248, 113, 113)
                            };
                            ui.label(RichText::new(format_percent(stock.change_percent)).color(color));
                            ui.label(format_currency(stock.market_cap));
                            ui.label(format_compact(stock.volume as f64));
                            ui.label(RichText::new(&stock.sector).weak());
                            ui.end_row();
                        }
                    });
            });

        if let Some(id) = clicked {
            // Clicking the selected row again deselects it.
            if self.selected.as_deref() == Some(id.as_str()) {
                self.set_selected(None);
            } else {
                self.set_selected(Some(id));
            }
        }
    }
}
