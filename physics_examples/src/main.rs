use std::env;

use tracing::{error, info};

mod scenes;
mod visual;

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    // Check if first arg is "visual"
    if args.len() > 1 && args[1] == "visual" {
        let scene = if args.len() > 2 { &args[2] } else { "billiards" };
        info!("running scene {scene} in a window");

        if let Err(e) = visual::run_visual(scene) {
            error!("visual scene failed: {e}");
        }
        return;
    }

    let scene = if args.len() > 1 { &args[1] } else { "head_on" };
    if let Err(e) = run_headless(scene) {
        error!("scene {scene} failed: {e}");
    }
}

fn run_headless(scene: &str) -> toi_solver::Result<()> {
    let Some(mut solver) = scenes::build(scene)? else {
        println!("Unknown scene: {}. Available scenes: {}", scene, scenes::SCENES.join(", "));
        return Ok(());
    };

    println!("Simulating {} with {} bodies", scene, solver.body_count());
    let dt = 1.0 / 60.0;
    for frame in 0..600 {
        solver.advance(dt)?;
        for event in solver.collision_events() {
            println!(
                "t={:.4}: {} hit {} (closing speed {:.3}, normal {})",
                event.time, event.first, event.second, event.closing_speed, event.normal
            );
        }
        if frame % 120 == 0 {
            let positions: Vec<String> = solver
                .bodies()
                .iter()
                .map(|body| body.center_of_mass().to_string())
                .collect();
            println!("Frame {}: {}", frame, positions.join(" "));
        }
    }
    println!("Finished at t={:.3}", solver.time());
    Ok(())
}
