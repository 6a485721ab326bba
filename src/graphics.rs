use macroquad::prelude::*;
use macroquad::ui::{hash, root_ui, widgets};
use tracing::{info, warn};

use diffbot_kinematics::{Boundary, MotionHistory, Point, Pose, Signal};

use crate::blackboard::{Blackboard, Snapshot, snapshot};
use crate::bus::{Command, Topic};
use crate::input::{DriveKeys, GoalForm};
use crate::simulation::DriveMode;

// World units are drawn one per pixel; the simulation area is the left part of the window.
const SIM_WIDTH: f32 = 700.0;
const SIM_HEIGHT: f32 = 600.0;
const SIDEBAR_WIDTH: f32 = 220.0;

const GRID_SPACING: f32 = 25.0;
const ROBOT_SIZE: f32 = 18.0;

const FORM_HEIGHT: f32 = 150.0;
const CHART_WIDTH: f32 = 180.0;
const CHART_HEIGHT: f32 = 60.0;
const CHART_STRIDE: f32 = 80.0;

const AREA_FILL: Color = Color::new(0.90, 0.90, 0.90, 1.0);
const GRID_LINE: Color = Color::new(0.82, 0.82, 0.82, 1.0);
const SHADOW: Color = Color::new(0.78, 0.78, 0.78, 1.0);
const CHART_PURPLE: Color = Color::new(0.59, 0.0, 0.59, 1.0);

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "diffbot".to_string(),
        window_width: (SIM_WIDTH + SIDEBAR_WIDTH) as i32,
        window_height: SIM_HEIGHT as i32,
        high_dpi: true,
        window_resizable: false,
        ..Default::default()
    }
}

pub async fn run_visualization_loop(bb: Blackboard, commands: Topic<Command>) {
    let mut form = GoalForm::default();

    info!("Visualization loop starting inside graphics module...");

    loop {
        let snap = snapshot(&bb);

        commands.publish(Command::Manual(held_keys()));
        if is_mouse_button_pressed(MouseButton::Left) {
            let (mx, my) = mouse_position();
            if mx < SIM_WIDTH {
                commands.publish(Command::AddGoal(Point::new(mx as f64, my as f64)));
            }
        }

        clear_background(WHITE);
        draw_area(&snap.boundary);
        draw_trajectory(&snap.trajectory);
        draw_route(&snap.route);
        if let Some(goal) = snap.goal {
            if snap.boundary.contains(goal) {
                draw_circle(goal.x as f32, goal.y as f32, 5.0, BLUE);
            }
        }
        draw_robot(&snap.pose);
        draw_info(&snap);
        draw_charts(&snap.history);

        if draw_form(&mut form) {
            match form.to_command(snap.units_per_meter) {
                Ok(cmd) => commands.publish(cmd),
                Err(e) => warn!("Rejected goal input: {}", e),
            }
        }

        next_frame().await
    }
}

fn held_keys() -> DriveKeys {
    DriveKeys {
        up: is_key_down(KeyCode::Up),
        down: is_key_down(KeyCode::Down),
        left: is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::Right),
    }
}

fn draw_area(boundary: &Boundary) {
    let (left, top) = (boundary.left as f32, boundary.top as f32);
    let (right, bottom) = (boundary.right as f32, boundary.bottom as f32);
    draw_rectangle(left, top, right - left, bottom - top, AREA_FILL);

    let mut x = left;
    while x < right {
        draw_line(x, top, x, bottom, 1.0, GRID_LINE);
        x += GRID_SPACING;
    }
    let mut y = top;
    while y < bottom {
        draw_line(left, y, right, y, 1.0, GRID_LINE);
        y += GRID_SPACING;
    }

    draw_rectangle_lines(left, top, right - left, bottom - top, 2.0, BLACK);
}

fn draw_trajectory(points: &[Point]) {
    for pair in points.windows(2) {
        draw_line(
            pair[0].x as f32,
            pair[0].y as f32,
            pair[1].x as f32,
            pair[1].y as f32,
            2.0,
            BLUE,
        );
    }
}

fn draw_route(goals: &[Point]) {
    for (i, goal) in goals.iter().enumerate() {
        let (x, y) = (goal.x as f32, goal.y as f32);
        draw_circle(x, y, 5.0, RED);
        draw_text(&(i + 1).to_string(), x + 6.0, y - 6.0, 16.0, BLACK);
    }
}

fn draw_robot(pose: &Pose) {
    let x = pose.x as f32;
    let y = pose.y as f32;
    // y grows downward on screen and in the world, so the heading is used as is.
    let th = pose.theta as f32;

    let corner = |offset: f32| {
        Vec2::new(
            x + ROBOT_SIZE * (th + offset).cos(),
            y + ROBOT_SIZE * (th + offset).sin(),
        )
    };
    let p1 = corner(0.0);
    let p2 = corner(2.0 * std::f32::consts::PI / 3.0);
    let p3 = corner(-2.0 * std::f32::consts::PI / 3.0);
    draw_triangle(p1, p2, p3, BLUE);
    draw_line(x, y, p1.x, p1.y, 2.0, DARKBLUE);
}

fn draw_info(snap: &Snapshot) {
    let upm = snap.units_per_meter;
    draw_text(
        &format!(
            "Position: ({:.2}, {:.2}) m",
            snap.pose.x / upm,
            snap.pose.y / upm
        ),
        10.0,
        18.0,
        18.0,
        BLACK,
    );
    draw_text(
        &format!("Velocity: {:.2} m/s", snap.linear_velocity),
        10.0,
        36.0,
        18.0,
        BLACK,
    );
    let mode = match (snap.mode, snap.goal_reached) {
        (DriveMode::Manual, _) => "manual (arrow keys)",
        (DriveMode::Route, false) => "route",
        (DriveMode::Route, true) => "route (goal reached)",
    };
    draw_text(&format!("Mode: {}", mode), 250.0, 18.0, 18.0, BLACK);
    draw_text(&format!("Voltages: {}", snap.voltages), 250.0, 36.0, 18.0, BLACK);

    for (i, fault) in snap.faults.iter().enumerate() {
        draw_text(fault, 10.0, SIM_HEIGHT - 10.0 - 18.0 * i as f32, 18.0, RED);
    }
}

fn draw_charts(history: &MotionHistory) {
    let x = SIM_WIDTH + 20.0;
    let colors = [RED, BLUE, BLACK, DARKGREEN, CHART_PURPLE];

    for (i, (signal, color)) in Signal::ALL.iter().zip(colors).enumerate() {
        let y = FORM_HEIGHT + 25.0 + i as f32 * CHART_STRIDE;
        draw_rectangle(x + 2.0, y + 2.0, CHART_WIDTH, CHART_HEIGHT, SHADOW);
        draw_rectangle(x, y, CHART_WIDTH, CHART_HEIGHT, WHITE);
        draw_rectangle_lines(x, y, CHART_WIDTH, CHART_HEIGHT, 1.0, BLACK);

        let series = history.series(*signal);
        if series.len() > 1 {
            let max = series.max_abs();
            let max = if max > 0.0 { max } else { 1.0 };
            let scale_y = CHART_HEIGHT / (2.0 * max as f32);
            let scale_x = CHART_WIDTH / series.len() as f32;
            let mid = y + CHART_HEIGHT / 2.0;

            let points: Vec<Vec2> = series
                .iter()
                .enumerate()
                .map(|(j, v)| Vec2::new(x + j as f32 * scale_x, mid - v as f32 * scale_y))
                .collect();
            for pair in points.windows(2) {
                draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, 1.5, color);
            }
        }

        draw_text(signal.label(), x + 5.0, y - 5.0, 16.0, BLACK);
    }
}

/// Draws the "drive to" form. Returns `true` when the button was pressed.
fn draw_form(form: &mut GoalForm) -> bool {
    let mut submitted = false;
    widgets::Window::new(
        hash!(),
        vec2(SIM_WIDTH + 10.0, 10.0),
        vec2(SIDEBAR_WIDTH - 20.0, FORM_HEIGHT - 10.0),
    )
    .label("Drive to")
    .titlebar(true)
    .movable(false)
    .ui(&mut *root_ui(), |ui| {
        ui.input_text(hash!(), "x (m)", &mut form.x);
        ui.input_text(hash!(), "y (m)", &mut form.y);
        ui.input_text(hash!(), "heading (deg)", &mut form.theta);
        if ui.button(None, "Go") {
            submitted = true;
        }
    });
    submitted
}
