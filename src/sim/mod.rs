mod forces;
mod reconcile;
mod visual;

use eframe::egui::{Vec2, vec2};
use log::debug;

pub use visual::{PerfBucket, RadiusScale};

use crate::util::stable_pair;

/// Engine-facing view of one instrument: identity, a non-negative weight
/// (market cap) and a signed performance metric (percent change). The engine
/// never learns where the data came from.
#[derive(Clone, Debug)]
pub struct Instrument {
    pub id: String,
    pub weight: f64,
    pub performance: f32,
}

/// One simulated disk. Filler bodies carry no payload and are pure
/// background decoration: they never match an instrument id and never react
/// to the pointer.
#[derive(Clone, Debug)]
pub struct Body {
    pub id: String,
    pub radius: f32,
    pub position: Vec2,
    pub(crate) velocity: Vec2,
    pub payload: Option<Instrument>,
}

impl Body {
    pub fn is_filler(&self) -> bool {
        self.payload.is_none()
    }
}

/// Per-tick output consumed by the render adapter. `bucket` is `None` for
/// filler bodies.
#[derive(Clone, Copy, Debug)]
pub struct BodyFrame<'a> {
    pub id: &'a str,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub bucket: Option<PerfBucket>,
    pub filler: bool,
}

/// All tunables of the layout engine in one place. The force constants are
/// configuration, not per-call literals, so there is exactly one engine to
/// tune rather than many diverging copies.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    pub radius: RadiusScale,
    /// Extra clearance demanded between disk rims, in pixels.
    pub collision_padding: f32,
    pub repulsion: f32,
    pub repulsion_softening: f32,
    pub collision_strength: f32,
    /// Fraction of residual overlap removed per step by direct position
    /// correction.
    pub separation_relax: f32,
    pub center_pull: f32,
    pub damping: f32,
    pub accel_gain: f32,
    pub max_speed: f32,
    pub sleep_speed: f32,
    pub cooling: f32,
    /// Per-step position change (in pixels per frame unit) below which the
    /// layout counts as motionless.
    pub settle_motion: f32,
    /// Hard ceiling on accumulated simulated seconds per settle phase.
    /// Residual overlap past this point is an accepted degraded outcome.
    pub max_settle_secs: f32,
    pub nudge_temperature: f32,
    /// Added+removed fraction at or above which a refresh triggers a full
    /// re-settle instead of a gentle nudge.
    pub full_restart_churn: f32,
    pub spawn_spread: f32,
    /// Pad the canvas with inert filler bodies up to this population.
    pub filler_floor: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            radius: RadiusScale::default(),
            collision_padding: 4.0,
            repulsion: 2600.0,
            repulsion_softening: 900.0,
            collision_strength: 0.6,
            separation_relax: 0.35,
            center_pull: 0.045,
            damping: 0.88,
            accel_gain: 0.055,
            max_speed: 26.0,
            sleep_speed: 0.05,
            cooling: 0.975,
            settle_motion: 0.05,
            max_settle_secs: 6.0,
            nudge_temperature: 0.35,
            full_restart_churn: 0.35,
            spawn_spread: 48.0,
            filler_floor: 0,
        }
    }
}

/// Force-directed bubble layout for one container. Owned exclusively by its
/// view; every mutation happens either in `step` or in `reconcile`, both on
/// the same logical thread of control.
pub struct Simulation {
    bodies: Vec<Body>,
    container: Vec2,
    config: SimConfig,
    temperature: f32,
    active_secs: f32,
    settled: bool,
    stopped: bool,
    pending: Option<Vec<Instrument>>,
    forces: Vec<Vec2>,
}

impl Simulation {
    /// Empty state for a container of known dimensions. Population happens
    /// through the first `reconcile`/`queue_refresh`.
    pub fn new(width: f32, height: f32, config: SimConfig) -> Self {
        Self {
            bodies: Vec::new(),
            container: vec2(width, height),
            config,
            temperature: 0.0,
            active_secs: 0.0,
            settled: true,
            stopped: false,
            pending: None,
            forces: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    pub fn container(&self) -> Vec2 {
        self.container
    }

    /// Resizing re-clamps bodies on the next step and wakes the layout so
    /// they can redistribute.
    pub fn set_container(&mut self, width: f32, height: f32) {
        let next = vec2(width, height);
        if (next - self.container).length_sq() <= 1.0 {
            return;
        }

        self.container = next;
        if self.container_valid() && !self.bodies.is_empty() {
            self.reheat(self.config.nudge_temperature);
        }
    }

    fn container_valid(&self) -> bool {
        self.container.x > 0.0
            && self.container.y > 0.0
            && self.container.x.is_finite()
            && self.container.y.is_finite()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Non-filler bodies only.
    pub fn instrument_count(&self) -> usize {
        self.bodies.iter().filter(|body| !body.is_filler()).count()
    }

    pub fn frames(&self) -> Vec<BodyFrame<'_>> {
        self.bodies
            .iter()
            .map(|body| BodyFrame {
                id: &body.id,
                x: body.position.x,
                y: body.position.y,
                radius: body.radius,
                bucket: body
                    .payload
                    .as_ref()
                    .map(|instrument| PerfBucket::of(instrument.performance)),
                filler: body.is_filler(),
            })
            .collect()
    }

    /// Stages a refresh to be applied atomically at the start of the next
    /// step. A later call supersedes an earlier one that has not been
    /// applied yet; refreshes are never applied mid-step.
    pub fn queue_refresh(&mut self, instruments: Vec<Instrument>) {
        if self.pending.is_some() {
            debug!("superseding pending refresh with a newer snapshot");
        }
        self.pending = Some(instruments);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True once the layout has come to rest, the settle budget has run out,
    /// or the simulation was stopped.
    pub fn is_settled(&self) -> bool {
        self.stopped || self.settled
    }

    /// Halts the simulation: positions freeze at their last values and every
    /// further `step` is a no-op. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn reheat(&mut self, temperature: f32) {
        self.temperature = self.temperature.max(temperature.clamp(0.0, 1.0));
        self.active_secs = 0.0;
        self.settled = false;
    }

    pub(crate) fn centroid(&self) -> Vec2 {
        let live = self
            .bodies
            .iter()
            .filter(|body| !body.is_filler())
            .collect::<Vec<_>>();
        if live.is_empty() {
            return self.container * 0.5;
        }

        let mut sum = Vec2::ZERO;
        for body in &live {
            sum += body.position;
        }
        sum / live.len() as f32
    }

    /// One iteration of the force loop: accumulate forces, integrate with
    /// damping, clamp into the container, then relax residual overlap by
    /// direct position correction. Returns whether anything moved.
    ///
    /// Degenerate containers make this a no-op rather than an error; the
    /// visualization degrades instead of crashing.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.stopped {
            return false;
        }

        if let Some(instruments) = self.pending.take() {
            self.reconcile(&instruments);
        }

        if !self.container_valid() || self.bodies.is_empty() || self.settled {
            return false;
        }

        let ts = (dt * 60.0).clamp(0.25, 3.0);
        self.active_secs += dt.clamp(0.0, 1.0);

        forces::accumulate(
            &self.bodies,
            self.container,
            &self.config,
            self.temperature,
            &mut self.forces,
        );

        let damping_factor = self.config.damping.powf(ts);
        let mut max_speed_sq = 0.0_f32;
        for (body, force) in self.bodies.iter_mut().zip(self.forces.iter()) {
            let mut velocity = (body.velocity + (*force * (self.config.accel_gain * ts)))
                * damping_factor;

            let speed_sq = velocity.length_sq();
            if speed_sq > self.config.max_speed * self.config.max_speed {
                velocity *= self.config.max_speed / speed_sq.sqrt();
            }
            if velocity.length_sq() < self.config.sleep_speed * self.config.sleep_speed {
                velocity = Vec2::ZERO;
            }

            body.velocity = velocity;
            body.position += velocity * ts;
            max_speed_sq = max_speed_sq.max(velocity.length_sq());
        }

        self.sanitize_bodies();
        let max_correction = forces::separate_overlaps(
            &mut self.bodies,
            self.config.collision_padding,
            self.config.separation_relax,
        );
        self.clamp_to_container();

        self.temperature = (self.temperature * self.config.cooling.powf(ts)).max(0.0);

        let moving = max_speed_sq > 0.0 || max_correction > self.config.settle_motion;
        if !moving || self.active_secs >= self.config.max_settle_secs {
            self.settled = true;
        }
        moving && !self.settled
    }

    /// Coincident or exploded states are repaired in place; corrupt numbers
    /// must never survive into the next tick.
    fn sanitize_bodies(&mut self) {
        let center = self.container * 0.5;
        for body in &mut self.bodies {
            if !body.position.x.is_finite() || !body.position.y.is_finite() {
                let (jx, jy) = stable_pair(&body.id);
                body.position = center + vec2(jx, jy) * self.config.spawn_spread;
                body.velocity = Vec2::ZERO;
            }
            if !body.velocity.x.is_finite() || !body.velocity.y.is_finite() {
                body.velocity = Vec2::ZERO;
            }
        }
    }

    fn clamp_to_container(&mut self) {
        let size = self.container;
        for body in &mut self.bodies {
            body.position.x = clamp_axis(body.position.x, body.radius, size.x);
            body.position.y = clamp_axis(body.position.y, body.radius, size.y);
        }
    }
}

/// Keeps a disk inside `[radius, dim - radius]`; a container narrower than
/// one diameter pins the body to the middle instead of inverting the range.
fn clamp_axis(value: f32, radius: f32, dim: f32) -> f32 {
    if dim >= radius * 2.0 {
        value.clamp(radius, dim - radius)
    } else {
        dim * 0.5
    }
}
