//! Turtle programs: the human-authored drawing format.
//!
//! A program is a flat list of turtle calls, with `repeat` as the only
//! control structure. The engine plays it against a turtle; it never
//! talks to a surface itself.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::clock::FrameClock;
use crate::surface::Surface;
use crate::turtle::Turtle;
use crate::types::Point;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurtleProgram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen_color: Option<String>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Forward(f64),
    Back(f64),
    Right(f64),
    Left(f64),
    PenColor(String),
    Clear,
    GoTo(Point),
    SetHeading(f64),
    /// Without `speed_ms` the turtle keeps its current speed.
    Animate {
        enabled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed_ms: Option<u64>,
    },
    Repeat {
        times: u32,
        body: Vec<Command>,
    },
}

impl TurtleProgram {
    /// Apply the program's own start state, then run every command.
    pub fn run<S: Surface, C: FrameClock>(&self, turtle: &mut Turtle<S, C>) -> Result<()> {
        if let Some(start) = self.start {
            turtle.go_to(start.x, start.y);
        }
        if let Some(heading) = self.heading {
            turtle.set_heading(heading);
        }
        if let Some(color) = &self.pen_color {
            turtle.pen_color(color.as_str());
        }
        for command in &self.commands {
            command.apply(turtle)?;
        }
        Ok(())
    }
}

impl Command {
    pub fn apply<S: Surface, C: FrameClock>(&self, turtle: &mut Turtle<S, C>) -> Result<()> {
        match self {
            Command::Forward(length) => {
                turtle.forward(*length)?;
            }
            Command::Back(length) => {
                turtle.back(*length)?;
            }
            Command::Right(angle) => {
                turtle.right(*angle)?;
            }
            Command::Left(angle) => {
                turtle.left(*angle)?;
            }
            Command::PenColor(color) => {
                turtle.pen_color(color.as_str());
            }
            Command::Clear => {
                turtle.clear()?;
            }
            Command::GoTo(p) => {
                turtle.go_to(p.x, p.y);
            }
            Command::SetHeading(angle) => {
                turtle.set_heading(*angle);
            }
            Command::Animate { enabled, speed_ms } => {
                let speed = speed_ms.map_or(turtle.animation_speed(), Duration::from_millis);
                turtle.set_animation(*enabled, speed);
            }
            Command::Repeat { times, body } => {
                for _ in 0..*times {
                    for command in body {
                        command.apply(turtle)?;
                    }
                }
            }
        }
        Ok(())
    }
}
