use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout};

use crate::market::{
    ALL_SECTORS, SortDirection, SortKey, Stock, filter_by_search, filter_by_sector,
    sector_performance, sectors_of, sort_stocks,
};
use crate::sim::SimConfig;
use crate::util::format_compact;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(
        stocks: Vec<Stock>,
        feed_name: &'static str,
        refresh_secs: f32,
        filler_floor: usize,
    ) -> Self {
        let sectors = sectors_of(&stocks);
        let sector_perf = sector_performance(&stocks);
        let sim_config = SimConfig {
            filler_floor,
            ..SimConfig::default()
        };

        Self {
            stocks,
            filtered: Vec::new(),
            sectors,
            sector_perf,
            search: String::new(),
            selected_sector: ALL_SECTORS.to_string(),
            sort_key: SortKey::MarketCap,
            sort_direction: SortDirection::Descending,
            selected: None,
            filters_dirty: true,
            sim: None,
            sim_config,
            resettle_requested: false,
            feed_name,
            auto_refresh: true,
            refresh_secs: refresh_secs.max(1.0),
            last_refresh_at: None,
            refresh_count: 0,
            show_table: true,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        refresh_requested: &mut bool,
        is_refreshing: bool,
    ) {
        self.update_fps_counter(ctx);
        if self.filters_dirty {
            self.rebuild_filtered();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("marketmap");
                    ui.separator();
                    ui.label(format!("feed: {}", self.feed_name));
                    ui.label(format!(
                        "showing {} of {} stocks",
                        self.filtered.len(),
                        self.stocks.len()
                    ));
                    let refresh_button = ui.add_enabled(
                        !is_refreshing,
                        egui::Button::new(if is_refreshing {
                            "Refreshing..."
                        } else {
                            "Refresh"
                        }),
                    );
                    if refresh_button.clicked() {
                        *refresh_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                        if self.refresh_count > 0 {
                            ui.label(format!("refreshes: {}", format_compact(self.refresh_count as f64)));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(290.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        if self.show_table {
            egui::TopBottomPanel::bottom("table")
                .resizable(true)
                .default_height(210.0)
                .show(ctx, |ui| self.draw_table(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_bubbles(ui));
    }

    /// Sector filter narrows first, fuzzy search narrows further, then the
    /// table ordering is applied. The bubble canvas consumes `filters_dirty`
    /// afterwards to stage the matching refresh.
    fn rebuild_filtered(&mut self) {
        let by_sector = filter_by_sector(&self.stocks, &self.selected_sector);
        let mut filtered = filter_by_search(&by_sector, &self.search);
        sort_stocks(&mut filtered, self.sort_key, self.sort_direction);
        self.filtered = filtered;
    }

    pub(in crate::app) fn apply_snapshot(&mut self, ctx: &Context, stocks: Vec<Stock>) {
        self.stocks = stocks;
        self.sectors = sectors_of(&self.stocks);
        self.sector_perf = sector_performance(&self.stocks);

        if !self.sectors.iter().any(|name| *name == self.selected_sector) {
            self.selected_sector = ALL_SECTORS.to_string();
        }
        if let Some(id) = &self.selected
            && !self.stocks.iter().any(|stock| stock.id == *id)
        {
            self.selected = None;
        }

        self.filters_dirty = true;
        self.refresh_count += 1;
        self.last_refresh_at = Some(ctx.input(|input| input.time));
        ctx.request_repaint();
    }

    pub(in crate::app) fn auto_refresh_due(&mut self, ctx: &Context) -> bool {
        if !self.auto_refresh {
            return false;
        }

        let now = ctx.input(|input| input.time);
        match self.last_refresh_at {
            None => {
                self.last_refresh_at = Some(now);
                false
            }
            Some(last) if now - last >= f64::from(self.refresh_secs) => {
                // Reset on trigger, not on completion, so a slow or failed
                // refresh does not re-fire every frame.
                self.last_refresh_at = Some(now);
                true
            }
            Some(_) => {
                ctx.request_repaint_after(std::time::Duration::from_millis(250));
                false
            }
        }
    }

    pub(in crate::app) fn set_selected(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub(in crate::app) fn mark_filters_dirty(&mut self) {
        self.filters_dirty = true;
    }
}
