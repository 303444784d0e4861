use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};

use eframe::egui::{self, Context};
use log::{info, warn};

use crate::market::{SectorPerformance, SharedFeed, SortDirection, SortKey, Stock, spawn_snapshot};
use crate::sim::{SimConfig, Simulation};

mod render_utils;
mod ui;
mod view;

pub struct MarketMapApp {
    feed: SharedFeed,
    feed_name: &'static str,
    refresh_secs: f32,
    filler_floor: usize,
    state: AppState,
    refresh_rx: Option<Receiver<Result<Vec<Stock>, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Vec<Stock>, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// All per-session UI state, including the one simulation owned by the
/// bubble canvas. Dropped wholesale when the session ends, which tears the
/// simulation down with it.
struct ViewModel {
    stocks: Vec<Stock>,
    filtered: Vec<Stock>,
    sectors: Vec<String>,
    sector_perf: Vec<SectorPerformance>,
    search: String,
    selected_sector: String,
    sort_key: SortKey,
    sort_direction: SortDirection,
    selected: Option<String>,
    filters_dirty: bool,
    sim: Option<Simulation>,
    sim_config: SimConfig,
    resettle_requested: bool,
    feed_name: &'static str,
    auto_refresh: bool,
    refresh_secs: f32,
    last_refresh_at: Option<f64>,
    refresh_count: u64,
    show_table: bool,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl MarketMapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        feed: SharedFeed,
        refresh_secs: f32,
        filler_floor: usize,
    ) -> Self {
        let feed_name = feed.lock().map(|feed| feed.name()).unwrap_or("unavailable");
        let state = AppState::Loading {
            rx: spawn_snapshot(feed.clone()),
        };

        Self {
            feed,
            feed_name,
            refresh_secs,
            filler_floor,
            state,
            refresh_rx: None,
        }
    }

}

impl eframe::App for MarketMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(stocks) => {
                            info!("loaded {} stocks from {} feed", stocks.len(), self.feed_name);
                            AppState::Ready(Box::new(ViewModel::new(
                                stocks,
                                self.feed_name,
                                self.refresh_secs,
                                self.filler_floor,
                            )))
                        }
                        Err(error) => AppState::Error(error),
                    });
                } else {
                    ctx.request_repaint_after(std::time::Duration::from_millis(100));
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading market snapshot...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load market data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(AppState::Loading {
                            rx: spawn_snapshot(self.feed.clone()),
                        });
                    }
                });
            }
            AppState::Ready(model) => {
                let mut refresh_requested = false;
                let is_refreshing = self.refresh_rx.is_some();
                model.show(ctx, &mut refresh_requested, is_refreshing);

                if model.auto_refresh_due(ctx) {
                    refresh_requested = true;
                }

                if refresh_requested && self.refresh_rx.is_none() {
                    self.refresh_rx = Some(spawn_snapshot(self.feed.clone()));
                }

                if let Some(rx) = self.refresh_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(stocks)) => {
                            model.apply_snapshot(ctx, stocks);
                        }
                        Ok(Err(error)) => {
                            // A failed refresh keeps the last good snapshot
                            // on screen rather than tearing the view down.
                            warn!("market refresh failed: {error}");
                        }
                        Err(TryRecvError::Empty) => {
                            self.refresh_rx = Some(rx);
                            ctx.request_repaint_after(std::time::Duration::from_millis(100));
                        }
                        Err(TryRecvError::Disconnected) => {
                            warn!("market refresh worker disconnected");
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.refresh_rx = None;
            self.state = next_state;
        }
    }
}
