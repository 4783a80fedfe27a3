use ggez::event::{self, EventHandler};
use ggez::glam::Vec2 as GVec2;
use ggez::graphics::{self, Color, DrawParam, Mesh};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::{Context, GameError, GameResult};
use toi_solver::*;

use crate::scenes;

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
// Pixels per world unit.
const SCALE: f32 = 40.0;
// Frame hitches are clamped before they reach the solver.
const MAX_FRAME_TIME: f64 = 0.066;
const STEER_SPEED: f64 = 3.0;

struct MainState {
    solver: Solver,
    lines: LineRecorder,
    steered: BodyHandle,
}

impl MainState {
    fn new(scene: &str) -> GameResult<MainState> {
        let solver = scenes::build(scene)
            .map_err(|e| GameError::CustomError(e.to_string()))?
            .ok_or_else(|| GameError::CustomError(format!("unknown scene {scene}")))?;
        let steered = solver
            .handles()
            .next()
            .ok_or_else(|| GameError::CustomError(format!("scene {scene} has no bodies")))?;

        Ok(MainState {
            solver,
            lines: LineRecorder::new(),
            steered,
        })
    }
}

// World is y-up around the window center; screen is y-down.
fn to_screen(point: Vec2) -> GVec2 {
    GVec2::new(
        WIDTH / 2.0 + point.x as f32 * SCALE,
        HEIGHT / 2.0 - point.y as f32 * SCALE,
    )
}

fn to_color(color: DebugColor) -> Color {
    Color::from_rgba(color.r, color.g, color.b, color.a)
}

impl EventHandler for MainState {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        let dt = ctx.time.delta().as_secs_f64().clamp(0.0, MAX_FRAME_TIME);
        self.solver
            .advance(dt)
            .map_err(|e| GameError::CustomError(e.to_string()))
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, Color::BLACK);

        self.lines.clear();
        self.solver.debug_draw(&mut self.lines);
        for line in &self.lines.lines {
            let (start, end) = (to_screen(line.start), to_screen(line.end));
            // Zero-length segments cannot be meshed.
            if start.distance_squared(end) < f32::EPSILON {
                continue;
            }
            let mesh = Mesh::new_line(ctx, &[start, end], 2.0, to_color(line.color))?;
            canvas.draw(&mesh, DrawParam::new());
        }

        canvas.finish(ctx)?;
        Ok(())
    }

    fn key_down_event(&mut self, ctx: &mut Context, input: KeyInput, _repeated: bool) -> GameResult {
        let velocity = match input.keycode {
            Some(KeyCode::Escape) => {
                ctx.request_quit();
                return Ok(());
            }
            Some(KeyCode::Left) => Vec2::new(-STEER_SPEED, 0.0),
            Some(KeyCode::Right) => Vec2::new(STEER_SPEED, 0.0),
            Some(KeyCode::Up) => Vec2::new(0.0, STEER_SPEED),
            Some(KeyCode::Down) => Vec2::new(0.0, -STEER_SPEED),
            Some(KeyCode::Space) => Vec2::ZERO,
            _ => return Ok(()),
        };
        self.solver
            .set_velocity(self.steered, velocity)
            .map_err(|e| GameError::CustomError(e.to_string()))
    }
}

pub fn run_visual(scene: &str) -> GameResult {
    let state = MainState::new(scene)?;

    let cb = ggez::ContextBuilder::new("physics_examples", "author")
        .window_setup(ggez::conf::WindowSetup::default().title("TOI Solver"))
        .window_mode(ggez::conf::WindowMode::default().dimensions(WIDTH, HEIGHT));

    let (ctx, event_loop) = cb.build()?;
    event::run(ctx, event_loop, state)
}
