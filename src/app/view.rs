use std::collections::HashMap;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::market::Stock;
use crate::sim::{Instrument, Simulation};
use crate::util::{format_currency, format_percent, format_price};

use super::ViewModel;
use super::render_utils::{
    FILLER_COLOR, blend_color, bucket_color, bucket_text_color, dim_color, draw_background,
};

const SELECTED_RING: Color32 = Color32::from_rgb(245, 206, 93);

impl ViewModel {
    pub(in crate::app) fn instruments(&self) -> Vec<Instrument> {
        self.filtered
            .iter()
            .map(|stock| Instrument {
                id: stock.id.clone(),
                weight: stock.market_cap,
                performance: stock.change_percent,
            })
            .collect()
    }

    pub(in crate::app) fn draw_bubbles(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);

        if rect.width() <= 1.0 || rect.height() <= 1.0 {
            return;
        }

        if self.sim.is_none() {
            self.sim = Some(Simulation::new(rect.width(), rect.height(), self.sim_config));
            self.filters_dirty = true;
        }
        let instruments = if self.filters_dirty {
            self.filters_dirty = false;
            Some(self.instruments())
        } else {
            None
        };

        let Some(sim) = self.sim.as_mut() else {
            return;
        };
        *sim.config_mut() = self.sim_config;
        sim.set_container(rect.width(), rect.height());
        if let Some(instruments) = instruments {
            sim.queue_refresh(instruments);
        }
        if self.resettle_requested {
            self.resettle_requested = false;
            sim.reheat(1.0);
        }

        // One logical tick per frame; a queued refresh is folded in at the
        // start of the step, never mid-step.
        let dt = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        if sim.has_pending() || !sim.is_settled() {
            sim.step(dt);
            if !sim.is_settled() {
                ui.ctx().request_repaint();
            }
        }

        if sim.instrument_count() == 0 {
            let message = if self.stocks.is_empty() {
                "No market data available."
            } else {
                "No stocks found. Try adjusting your filters."
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            if self.stocks.is_empty() {
                return;
            }
        }

        let stock_by_id: HashMap<&str, &Stock> = self
            .filtered
            .iter()
            .map(|stock| (stock.id.as_str(), stock))
            .collect();

        let frames = sim.frames();
        let pointer = ui.input(|input| input.pointer.hover_pos());

        // Hit-test against instrument bubbles only; fillers ignore the
        // pointer entirely.
        let hovered = pointer.and_then(|pointer| {
            frames
                .iter()
                .filter(|frame| !frame.filler)
                .filter_map(|frame| {
                    let center = rect.min + vec2(frame.x, frame.y);
                    let distance = center.distance(pointer);
                    (distance <= frame.radius).then_some((frame.id, distance))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
        });
        let hovered_id = hovered.map(|(id, _)| id);

        if hovered_id.is_some() {
            ui.ctx()
                .output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        // Large bubbles first so small ones stay visible and clickable on
        // top of them.
        let mut draw_order = (0..frames.len()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| frames[*b].radius.total_cmp(&frames[*a].radius));

        for index in draw_order {
            let frame = &frames[index];
            let center = rect.min + vec2(frame.x, frame.y);

            let Some(bucket) = frame.bucket else {
                painter.circle_filled(center, frame.radius, FILLER_COLOR);
                painter.circle_stroke(
                    center,
                    frame.radius,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 120)),
                );
                continue;
            };

            let is_selected = self.selected.as_deref() == Some(frame.id);
            let is_hovered = hovered_id == Some(frame.id);
            let dim_others = self.selected.is_some() && !is_selected && !is_hovered;

            let mut fill = bucket_color(bucket);
            if dim_others {
                fill = dim_color(fill, 0.62);
            } else if is_hovered {
                fill = blend_color(fill, Color32::WHITE, 0.14);
            }

            painter.circle_filled(center, frame.radius, fill);
            painter.circle_stroke(
                center,
                frame.radius,
                Stroke::new(1.2, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
            if is_selected {
                painter.circle_stroke(
                    center,
                    frame.radius + 3.0,
                    Stroke::new(2.0, SELECTED_RING),
                );
            } else if is_hovered {
                painter.circle_stroke(
                    center,
                    frame.radius + 2.0,
                    Stroke::new(1.5, Color32::from_rgba_unmultiplied(255, 255, 255, 160)),
                );
            }

            let Some(stock) = stock_by_id.get(frame.id) else {
                continue;
            };

            let text_color = if dim_others {
                Color32::from_gray(170)
            } else {
                bucket_text_color(bucket)
            };

            if frame.radius >= 18.0 {
                painter.text(
                    center - vec2(0.0, if frame.radius >= 30.0 { 9.0 } else { 0.0 }),
                    Align2::CENTER_CENTER,
                    &stock.symbol,
                    FontId::proportional((frame.radius * 0.34).clamp(10.0, 16.0)),
                    text_color,
                );
            }
            if frame.radius >= 30.0 {
                painter.text(
                    center + vec2(0.0, 7.0),
                    Align2::CENTER_CENTER,
                    format_percent(stock.change_percent),
                    FontId::proportional((frame.radius * 0.26).clamp(9.0, 13.0)),
                    text_color,
                );
            }
            if frame.radius >= 46.0 {
                painter.text(
                    center + vec2(0.0, 21.0),
                    Align2::CENTER_CENTER,
                    format_price(stock.price),
                    FontId::proportional(10.0),
                    text_color,
                );
            }
        }

        if let Some(id) = hovered_id
            && let Some(stock) = stock_by_id.get(id)
        {
            let status = format!(
                "{}  |  {}  |  {}  |  mcap {}",
                stock.symbol,
                format_price(stock.price),
                format_percent(stock.change_percent),
                format_currency(stock.market_cap),
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                status,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked() {
            let clicked = hovered_id.map(str::to_owned);
            self.set_selected(clicked);
        }
    }
}
