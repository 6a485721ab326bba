mod blackboard;   // latest simulation snapshot shared with the window
mod bus;          // command / event topics
mod config;       // `config/default.toml` + environment overrides
mod graphics;     // macroquad drawing and input
mod input;        // key and form parsing
mod simulation;   // robot, controller and route orchestration

use blackboard::{Blackboard, publish, raise_fault, snapshot};
use bus::{Command, SimEvent, Topic};
use crate::config::LoopConfig;
use graphics::window_conf;
use simulation::Simulation;

use spin_sleep::SpinSleeper;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{self, EnvFilter};

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("diffbot simulator starting. Loading configuration...");

    let config = match crate::config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot start without a valid configuration: {}", e);
            return;
        }
    };
    let sim = match Simulation::new(&config) {
        Ok(sim) => sim,
        Err(e) => {
            error!("Failed to build simulation: {:?}", e);
            return;
        }
    };
    let tokio_rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start Tokio runtime: {}", e);
            return;
        }
    };

    let bb: Blackboard = Arc::default();
    publish(&bb, sim.snapshot());

    let command_topic: Topic<Command> = Topic::new(64);
    let event_topic: Topic<SimEvent> = Topic::new(16);
    let command_rx = command_topic.subscribe();
    let event_rx = event_topic.subscribe();

    info!("Spawning simulation thread...");
    let spawned = std::thread::Builder::new().name("sim".into()).spawn({
        let bb = Arc::clone(&bb);
        let loop_config = config.sim;
        move || {
            info!("Simulation thread started.");
            if let Err(e) = run_simulation(sim, loop_config, command_rx, event_topic, &bb) {
                error!("Simulation stopped: {:?}", e);
                raise_fault(&bb, "simulation stopped, see log");
            }
        }
    });
    if let Err(e) = spawned {
        error!("Failed to spawn simulation thread: {}", e);
        return;
    }

    tokio_rt.spawn({
        let bb = Arc::clone(&bb);
        async move {
            if let Err(e) = status_task(bb, event_rx).await {
                error!("Status task failed: {:?}", e);
            }
        }
    });

    graphics::run_visualization_loop(bb, command_topic).await;
}

/// Fixed-rate loop owning the simulation: drain commands, tick, publish.
fn run_simulation(
    mut sim: Simulation,
    loop_config: LoopConfig,
    mut commands: broadcast::Receiver<Arc<Command>>,
    events: Topic<SimEvent>,
    bb: &Blackboard,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        loop_config.tick_hz.is_finite() && loop_config.tick_hz > 0.0,
        "tick_hz must be positive, got {}",
        loop_config.tick_hz
    );
    anyhow::ensure!(
        loop_config.max_dt > 0.0,
        "max_dt must be positive, got {}",
        loop_config.max_dt
    );

    let sleeper = SpinSleeper::new(10_000);
    let period = Duration::from_secs_f64(1.0 / loop_config.tick_hz);
    let mut last = Instant::now();

    loop {
        let tick_start = Instant::now();
        if !bus::drain(&mut commands, |cmd| sim.apply(cmd)) {
            info!("Command topic closed, stopping simulation.");
            return Ok(());
        }

        let dt = (tick_start - last).as_secs_f64().min(loop_config.max_dt);
        last = tick_start;

        for event in sim.tick(dt)? {
            events.publish(event);
        }
        publish(bb, sim.snapshot());

        sleeper.sleep(period.saturating_sub(tick_start.elapsed()));
    }
}

/// Logs simulation events and watches the snapshot age.
async fn status_task(
    bb: Blackboard,
    mut events: broadcast::Receiver<Arc<SimEvent>>,
) -> anyhow::Result<()> {
    info!("Status task started.");
    let mut tick = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let snap = snapshot(&bb);
                let age = snap.updated_at.elapsed();
                if age > Duration::from_millis(500) {
                    warn!(?age, "Simulation snapshot is stale.");
                    raise_fault(&bb, "simulation stalled");
                }
                debug!(
                    pose = %snap.pose,
                    v = snap.linear_velocity,
                    voltages = %snap.voltages,
                    mode = ?snap.mode,
                    "Status"
                );
            }
            event = events.recv() => match event {
                Ok(event) => match &*event {
                    SimEvent::GoalReached { index, goal } => {
                        info!(index = index + 1, %goal, "Goal reached");
                    }
                    SimEvent::RouteFinished { visited } => {
                        info!(visited, "Route finished, back to manual control");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Status task lagged behind simulation events.");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Event topic closed, status task exiting.");
                    return Ok(());
                }
            },
        }
    }
}
