use std::collections::{HashMap, HashSet};

use eframe::egui::vec2;
use log::debug;

use crate::util::stable_pair;

use super::{Body, Instrument, Simulation, clamp_axis};

impl Simulation {
    /// Matches the incoming snapshot against the live body set by id.
    /// Survivors keep their position and velocity (the property that stops
    /// bubbles from jumping on refresh); newcomers spawn near the current
    /// centroid; departed ids are dropped. The amount of churn decides
    /// between a gentle nudge and a full re-settle.
    pub fn reconcile(&mut self, instruments: &[Instrument]) {
        let prev_live = self.instrument_count();
        let spawn_origin = self.centroid();

        let max_weight = instruments
            .iter()
            .map(|instrument| instrument.weight)
            .filter(|weight| weight.is_finite())
            .fold(0.0_f64, f64::max);

        let mut prior = std::mem::take(&mut self.bodies)
            .into_iter()
            .map(|body| (body.id.clone(), body))
            .collect::<HashMap<_, _>>();

        let mut next = Vec::with_capacity(instruments.len());
        let mut seen = HashSet::with_capacity(instruments.len());
        let mut added = 0usize;
        let mut radius_changed = false;

        for instrument in instruments {
            // Snapshots should never repeat an id; drop duplicates instead
            // of spawning two bodies that fight over one identity.
            if !seen.insert(instrument.id.clone()) {
                continue;
            }

            let radius =
                self.config
                    .radius
                    .radius_of(instrument.weight, max_weight, &instrument.id);

            if let Some(mut body) = prior.remove(&instrument.id) {
                if (body.radius - radius).abs() > 0.5 {
                    radius_changed = true;
                }
                body.radius = radius;
                body.payload = Some(instrument.clone());
                next.push(body);
            } else {
                added += 1;
                next.push(self.spawn_body(instrument.clone(), radius, spawn_origin));
            }
        }

        let removed = prior.values().filter(|body| !body.is_filler()).count();
        let filler_changed = self.top_up_fillers(&mut next, &mut prior);
        self.bodies = next;

        // An empty body set has nothing to settle; marking it settled keeps
        // the canvas from spinning on repaints.
        if self.bodies.is_empty() {
            self.temperature = 0.0;
            self.settled = true;
            return;
        }

        if added == 0 && removed == 0 {
            // Identical snapshot: the settled layout stays exactly where it
            // is. Radius drift alone only warrants a nudge.
            if radius_changed || filler_changed {
                self.reheat(self.config.nudge_temperature);
            }
            return;
        }

        let total = self.instrument_count().max(prev_live).max(1);
        let churn = (added + removed) as f32 / total as f32;

        if prev_live == 0 || churn >= self.config.full_restart_churn {
            debug!("reconcile: +{added}/-{removed} (churn {churn:.2}), full re-settle");
            self.reheat(1.0);
        } else {
            debug!("reconcile: +{added}/-{removed} (churn {churn:.2}), nudge");
            self.reheat(self.config.nudge_temperature);
        }
    }

    /// New bodies arrive near the crowd, not at a corner: centroid plus a
    /// stable per-id offset, clamped into the container.
    fn spawn_body(&self, instrument: Instrument, radius: f32, origin: eframe::egui::Vec2) -> Body {
        let (jx, jy) = stable_pair(&instrument.id);
        let mut direction = vec2(jx, jy);
        if direction.length_sq() <= 0.0001 {
            direction = vec2(1.0, 0.0);
        } else {
            direction = direction.normalized();
        }

        let mut position = origin + vec2(jx, jy) * self.config.spawn_spread;
        position.x = clamp_axis(position.x, radius, self.container.x);
        position.y = clamp_axis(position.y, radius, self.container.y);

        Body {
            id: instrument.id.clone(),
            radius,
            position,
            velocity: direction * (1.15 + radius * 0.022),
            payload: Some(instrument),
        }
    }

    /// Pads the canvas with inert filler bodies up to the configured floor.
    /// Fillers reuse a synthetic id namespace so they too keep their spot
    /// across refreshes; they never participate in instrument identity.
    fn top_up_fillers(
        &self,
        next: &mut Vec<Body>,
        prior: &mut HashMap<String, Body>,
    ) -> bool {
        let shortfall = self.config.filler_floor.saturating_sub(next.len());
        let mut changed = false;

        for index in 0..shortfall {
            let id = format!("pad-{index}");
            if let Some(body) = prior.remove(&id) {
                next.push(body);
            } else {
                next.push(self.spawn_filler(id));
                changed = true;
            }
        }

        // Fillers beyond the floor are simply dropped with the rest of
        // `prior`; that counts as a visual change but not as churn.
        changed |= prior.values().any(|body| body.is_filler());
        changed
    }

    fn spawn_filler(&self, id: String) -> Body {
        let radius = self.config.radius.min_radius * 0.8;
        let (jx, jy) = stable_pair(&id);
        let half = self.container * 0.5;
        let mut position = half + vec2(jx * half.x, jy * half.y);
        position.x = clamp_axis(position.x, radius, self.container.x);
        position.y = clamp_axis(position.y, radius, self.container.y);

        Body {
            id,
            radius,
            position,
            velocity: eframe::egui::Vec2::ZERO,
            payload: None,
        }
    }
}
