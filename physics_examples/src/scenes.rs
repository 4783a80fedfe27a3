use toi_solver::*;

pub const SCENES: [&str; 3] = ["head_on", "cradle", "billiards"];

fn square(side: f64, position: Vec2, velocity: Vec2) -> Result<ConvexBody> {
    let polygon = ConvexPolygon::rectangle(side, side)?;
    Ok(ConvexBody::from_polygon(polygon, Transform::from_translation(position)).with_velocity(velocity))
}

/// Builds one of the named scenes. World units, y up, origin at the center.
pub fn build(name: &str) -> Result<Option<Solver>> {
    let mut solver = Solver::new();
    match name {
        "head_on" => {
            solver.add_body(square(2.0, Vec2::new(-5.0, 0.0), Vec2::new(1.0, 0.0))?);
            solver.add_body(square(2.0, Vec2::new(5.0, 0.0), Vec2::new(-1.0, 0.0))?);
        }
        "cradle" => {
            solver.add_body(square(1.0, Vec2::new(-6.0, 0.0), Vec2::new(2.0, 0.0))?);
            for i in 0..4 {
                solver.add_body(square(1.0, Vec2::new(i as f64 * 1.25, 0.0), Vec2::ZERO)?);
            }
        }
        "billiards" => {
            // Cue piece: a rotated square hitting a loose rack.
            let cue = ConvexBody::with_transform(
                ConvexPolygon::rectangle(0.8, 0.8)?.vertices().to_vec(),
                Transform::new(Vec2::new(-7.0, 0.3), std::f64::consts::FRAC_PI_4),
            )?
            .with_velocity(Vec2::new(3.0, 0.0));
            solver.add_body(cue);

            for row in 0..4 {
                for slot in 0..=row {
                    let x = 1.0 + row as f64 * 1.1;
                    let y = (slot as f64 - row as f64 / 2.0) * 1.2;
                    solver.add_body(square(0.8, Vec2::new(x, y), Vec2::ZERO)?);
                }
            }
        }
        _ => return Ok(None),
    }
    Ok(Some(solver))
}
