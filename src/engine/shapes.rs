//! Built-in demo drawings. Plain consumers of the turtle API.

use std::time::Duration;

use anyhow::Result;

use crate::clock::FrameClock;
use crate::surface::Surface;
use crate::turtle::Turtle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Circle,
    Square,
    Rays,
    Branch,
    Polyspi,
    Dragon,
    Triangles,
}

impl Demo {
    pub const ALL: [Demo; 7] = [
        Demo::Circle,
        Demo::Square,
        Demo::Rays,
        Demo::Branch,
        Demo::Polyspi,
        Demo::Dragon,
        Demo::Triangles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Circle => "circle",
            Demo::Square => "square",
            Demo::Rays => "rays",
            Demo::Branch => "branch",
            Demo::Polyspi => "polyspi",
            Demo::Dragon => "dragon",
            Demo::Triangles => "triangles",
        }
    }

    pub fn by_name(name: &str) -> Option<Demo> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Per-segment animation speed; demos made of many tiny steps move faster.
    pub fn animation_speed(self) -> Duration {
        let ms = match self {
            Demo::Circle | Demo::Rays => 5,
            Demo::Polyspi | Demo::Triangles => 40,
            Demo::Square => 250,
            Demo::Branch | Demo::Dragon => 20,
        };
        Duration::from_millis(ms)
    }

    /// Draw the demo from wherever the turtle currently stands.
    pub fn draw<S: Surface, C: FrameClock>(self, t: &mut Turtle<S, C>) -> Result<()> {
        match self {
            Demo::Circle => circle(t, 3.0),
            Demo::Square => square(t, 200.0),
            Demo::Rays => {
                for _ in 0..9 {
                    ray(t, 120)?;
                    t.right(200.0)?;
                }
                Ok(())
            }
            Demo::Branch => {
                t.go_to(400.0, 780.0);
                branch(t, 200.0, 0.7, 10.0, 50.0)
            }
            Demo::Polyspi => polyspi(t, 15.0, 72.0),
            Demo::Dragon => dragon(t, 10.0, 10, false),
            Demo::Triangles => {
                t.go_to(200.0, 600.0).set_heading(90.0);
                t.right(30.0)?;
                nested_triangle(t, 400.0)
            }
        }
    }
}

pub fn circle<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, step: f64) -> Result<()> {
    for _ in 0..360 {
        t.right(1.0)?.forward(step)?;
    }
    Ok(())
}

pub fn square<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, side: f64) -> Result<()> {
    for _ in 0..4 {
        t.forward(side)?.right(90.0)?;
    }
    Ok(())
}

pub fn arc_right<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, step: f64, degrees: u32) -> Result<()> {
    for _ in 0..degrees {
        t.forward(step)?.right(1.0)?;
    }
    Ok(())
}

pub fn arc_left<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, step: f64, degrees: u32) -> Result<()> {
    for _ in 0..degrees {
        t.forward(step)?.left(1.0)?;
    }
    Ok(())
}

/// Two S-bends, ending where a straight ray of the same sweep would.
pub fn ray<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, degrees: u32) -> Result<()> {
    for _ in 0..2 {
        arc_right(t, 1.0, degrees)?;
        arc_left(t, 1.0, degrees)?;
    }
    Ok(())
}

/// Binary tree; the turtle is back at the root when it returns.
pub fn branch<S: Surface, C: FrameClock>(
    t: &mut Turtle<S, C>,
    size: f64,
    scale: f64,
    left_angle: f64,
    right_angle: f64,
) -> Result<()> {
    if size < 3.0 {
        return Ok(());
    }
    t.forward(size)?;
    t.left(left_angle)?;
    branch(t, size * scale, scale, left_angle, right_angle)?;
    t.right(left_angle)?;
    t.right(right_angle)?;
    branch(t, size * scale, scale, left_angle, right_angle)?;
    t.left(right_angle)?;
    t.back(size)?;
    Ok(())
}

pub fn polyspi<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, size: f64, angle: f64) -> Result<()> {
    let mut size = size;
    while size <= 400.0 {
        t.forward(size)?.right(angle)?;
        size += 1.0;
    }
    Ok(())
}

pub fn dragon<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, size: f64, level: u32, right: bool) -> Result<()> {
    if level == 0 {
        t.forward(size)?;
        return Ok(());
    }
    dragon(t, size, level - 1, false)?;
    if right {
        t.right(90.0)?;
    } else {
        t.left(90.0)?;
    }
    dragon(t, size, level - 1, true)
}

pub fn nested_triangle<S: Surface, C: FrameClock>(t: &mut Turtle<S, C>, size: f64) -> Result<()> {
    if size < 10.0 {
        return Ok(());
    }
    for _ in 0..3 {
        t.forward(size)?;
        t.right(120.0)?;
        nested_triangle(t, size / 2.0)?;
    }
    Ok(())
}
