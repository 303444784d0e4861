use marketmap::sim::{Instrument, SimConfig, Simulation};

const STEP: f32 = 1.0 / 60.0;
const MAX_STEPS: usize = 20_000;

fn instrument(id: &str, weight: f64, performance: f32) -> Instrument {
    Instrument {
        id: id.to_string(),
        weight,
        performance,
    }
}

fn roster(count: usize) -> Vec<Instrument> {
    (0..count)
        .map(|index| {
            instrument(
                &format!("SYM{index:03}"),
                1e9 * ((index + 1) as f64),
                (index as f32 % 17.0) - 8.0,
            )
        })
        .collect()
}

fn settle(sim: &mut Simulation) -> usize {
    for step in 0..MAX_STEPS {
        sim.step(STEP);
        if sim.is_settled() && !sim.has_pending() {
            return step + 1;
        }
    }
    panic!("simulation did not settle within {MAX_STEPS} steps");
}

fn positions(sim: &Simulation) -> Vec<(String, f32, f32)> {
    sim.bodies()
        .iter()
        .map(|body| (body.id.clone(), body.position.x, body.position.y))
        .collect()
}

#[test]
fn settles_without_overlap() {
    let config = SimConfig {
        max_settle_secs: 60.0,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(1200.0, 800.0, config);
    sim.queue_refresh(roster(30));
    settle(&mut sim);

    let bodies = sim.bodies();
    let epsilon = 1.5;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let delta = bodies[i].position - bodies[j].position;
            let distance = delta.length();
            let min_distance = bodies[i].radius + bodies[j].radius;
            assert!(
                distance >= min_distance - epsilon,
                "{} and {} overlap by {:.2}px after settling",
                bodies[i].id,
                bodies[j].id,
                min_distance - distance,
            );
        }
    }
}

#[test]
fn bodies_stay_inside_container_every_step() {
    let mut sim = Simulation::new(900.0, 600.0, SimConfig::default());
    sim.queue_refresh(roster(40));

    for _ in 0..600 {
        sim.step(STEP);
        for body in sim.bodies() {
            assert!(
                body.position.x >= body.radius - 0.001
                    && body.position.x <= 900.0 - body.radius + 0.001,
                "{} escaped horizontally: x={}",
                body.id,
                body.position.x,
            );
            assert!(
                body.position.y >= body.radius - 0.001
                    && body.position.y <= 600.0 - body.radius + 0.001,
                "{} escaped vertically: y={}",
                body.id,
                body.position.y,
            );
        }
    }
}

#[test]
fn identical_snapshot_does_not_disturb_a_settled_layout() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    let instruments = roster(20);
    sim.queue_refresh(instruments.clone());
    settle(&mut sim);

    let before = positions(&sim);
    sim.queue_refresh(instruments);
    sim.step(STEP);

    assert!(sim.is_settled(), "identical snapshot re-woke the layout");
    assert_eq!(before, positions(&sim), "positions moved on identical data");
}

#[test]
fn survivors_keep_position_and_velocity_across_reconcile() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    let mut instruments = roster(20);
    sim.queue_refresh(instruments.clone());
    settle(&mut sim);

    let before = positions(&sim);
    instruments.push(instrument("NEWCO", 3e9, 1.2));
    sim.reconcile(&instruments);

    // Immediately after reconcile, before any step, every survivor is
    // exactly where it was.
    for (id, x, y) in &before {
        let body = sim
            .bodies()
            .iter()
            .find(|body| body.id == *id)
            .expect("survivor vanished");
        assert_eq!((body.position.x, body.position.y), (*x, *y));
    }
    assert!(!sim.is_settled(), "adding a body should wake the layout");
}

#[test]
fn small_addition_only_nudges_the_layout() {
    let mut sim = Simulation::new(1200.0, 800.0, SimConfig::default());
    let mut instruments = roster(24);
    sim.queue_refresh(instruments.clone());
    settle(&mut sim);

    let before = positions(&sim);
    instruments.push(instrument("NEWCO", 3e9, 1.2));
    sim.queue_refresh(instruments);
    settle(&mut sim);

    for (id, x, y) in &before {
        let body = sim
            .bodies()
            .iter()
            .find(|body| body.id == *id)
            .expect("survivor vanished");
        let drift = ((body.position.x - x).powi(2) + (body.position.y - y).powi(2)).sqrt();
        assert!(
            drift < 160.0,
            "{id} drifted {drift:.1}px after a single addition"
        );
    }
}

#[test]
fn removed_instruments_disappear_and_the_rest_survive() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    let mut instruments = roster(20);
    sim.queue_refresh(instruments.clone());
    settle(&mut sim);

    let removed = instruments.remove(3);
    sim.reconcile(&instruments);

    assert_eq!(sim.instrument_count(), 19);
    assert!(
        sim.bodies().iter().all(|body| body.id != removed.id),
        "removed instrument still present"
    );
}

#[test]
fn first_population_spawns_near_the_container_center() {
    let config = SimConfig::default();
    let spread = config.spawn_spread;
    let mut sim = Simulation::new(1000.0, 700.0, config);
    sim.reconcile(&roster(12));

    let center = sim.container() * 0.5;
    for body in sim.bodies() {
        let offset = (body.position - center).length();
        assert!(
            offset <= spread * 2.0 + body.radius,
            "{} spawned {offset:.1}px from center",
            body.id,
        );
    }
    assert!(!sim.is_settled(), "first population should start a settle");
}

#[test]
fn pathological_start_still_terminates() {
    // Equal weights put every spawn in a tight knot around the centroid;
    // the settle budget guarantees the loop still ends.
    let config = SimConfig {
        spawn_spread: 0.0,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(800.0, 600.0, config);
    sim.queue_refresh(
        (0..40)
            .map(|index| instrument(&format!("KNOT{index}"), 1e9, 0.0))
            .collect(),
    );

    let steps = settle(&mut sim);
    assert!(steps < MAX_STEPS);
    assert!(sim.is_settled());
}

#[test]
fn stop_freezes_the_simulation_permanently() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    sim.queue_refresh(roster(10));
    for _ in 0..30 {
        sim.step(STEP);
    }

    sim.stop();
    let frozen = positions(&sim);

    sim.queue_refresh(roster(15));
    for _ in 0..30 {
        assert!(!sim.step(STEP), "stopped simulation reported motion");
    }
    assert_eq!(frozen, positions(&sim), "stopped simulation moved");
    assert!(sim.is_settled());
    assert!(sim.is_stopped());
}

#[test]
fn resize_wakes_a_settled_layout() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    sim.queue_refresh(roster(15));
    settle(&mut sim);

    sim.set_container(640.0, 480.0);
    assert!(!sim.is_settled(), "resize should wake the layout");

    settle(&mut sim);
    for body in sim.bodies() {
        assert!(body.position.x <= 640.0 - body.radius + 0.001);
        assert!(body.position.y <= 480.0 - body.radius + 0.001);
    }
}

#[test]
fn filler_bodies_pad_the_canvas_but_are_not_instruments() {
    let config = SimConfig {
        filler_floor: 10,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(1000.0, 700.0, config);
    sim.reconcile(&roster(3));

    assert_eq!(sim.body_count(), 10);
    assert_eq!(sim.instrument_count(), 3);

    let frames = sim.frames();
    assert_eq!(frames.iter().filter(|frame| frame.filler).count(), 7);
    assert!(
        frames
            .iter()
            .filter(|frame| frame.filler)
            .all(|frame| frame.bucket.is_none()),
        "filler frames must not carry a performance bucket"
    );
}

#[test]
fn later_queued_snapshot_supersedes_an_earlier_one() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    sim.queue_refresh(roster(5));
    sim.queue_refresh(roster(9));
    assert!(sim.has_pending());

    sim.step(STEP);
    assert_eq!(sim.instrument_count(), 9);
    assert!(!sim.has_pending());
}

#[test]
fn duplicate_ids_in_a_snapshot_collapse_to_one_body() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    let mut instruments = roster(5);
    instruments.push(instruments[0].clone());
    sim.reconcile(&instruments);

    assert_eq!(sim.instrument_count(), 5);
}

#[test]
fn emptying_the_roster_settles_immediately() {
    let mut sim = Simulation::new(1000.0, 700.0, SimConfig::default());
    sim.queue_refresh(roster(12));
    settle(&mut sim);

    sim.reconcile(&[]);
    assert_eq!(sim.instrument_count(), 0);
    assert!(sim.is_settled(), "an empty layout has nothing left to settle");
    assert!(!sim.step(STEP));
}

#[test]
fn degenerate_container_is_a_no_op() {
    let mut sim = Simulation::new(0.0, 0.0, SimConfig::default());
    sim.queue_refresh(roster(5));
    assert!(!sim.step(STEP));

    // Bodies exist but stay put until the container becomes drawable.
    assert_eq!(sim.instrument_count(), 5);
    let before = positions(&sim);
    sim.step(STEP);
    assert_eq!(before, positions(&sim));
}
