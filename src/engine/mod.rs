//! Engine: runs turtle drawing headlessly and records what it looks like.
//!
//! Drawing code runs to completion first, exactly as a caller would issue
//! it. The engine then plays the display loop by hand: every frame it moves
//! the canvas tweens, reports finished ones to the turtle, delivers any
//! requested tick, and rasterizes the canvas into a `ResolvedScene`.
//!
//! Each scene is handed on as soon as it is rasterized and then dropped;
//! `compile` feeds them straight into a `Renderer`.

pub mod program;
pub mod shapes;

use anyhow::Result;

use crate::clock::FrameLatch;
use crate::config::TurtleConfig;
use crate::renderer::Renderer;
use crate::surface::Canvas;
use crate::turtle::Turtle;
use crate::types::{PlayablePresentation, ResolvedScene};
use program::TurtleProgram;

/// The turtle the engine drives: a terminal canvas and a hand-stepped clock.
pub type CanvasTurtle = Turtle<Canvas, FrameLatch>;

pub struct Engine;

impl Engine {
    /// Run a program and render every frame until drawing settles.
    pub fn compile(program: &TurtleProgram, config: &TurtleConfig) -> Result<PlayablePresentation> {
        Self::compile_with(config, |turtle| program.run(turtle))
    }

    /// Like [`Engine::compile`], for drawing code written against the API.
    pub fn compile_with<F>(config: &TurtleConfig, draw: F) -> Result<PlayablePresentation>
    where
        F: FnOnce(&mut CanvasTurtle) -> Result<()>,
    {
        let mut renderer = Renderer::new(config.contract(), config.frame_interval());
        Self::run_with(config, draw, |scene| renderer.push(scene))?;
        Ok(renderer.finish())
    }

    /// Run a program and pass each frame's scene to `on_frame`.
    pub fn run<V>(program: &TurtleProgram, config: &TurtleConfig, on_frame: V) -> Result<usize>
    where
        V: FnMut(&ResolvedScene),
    {
        Self::run_with(config, |turtle| program.run(turtle), on_frame)
    }

    /// Run drawing code, then pass each frame's scene to `on_frame` in
    /// order. Returns the number of frames.
    ///
    /// The turtle starts at `config.start`, facing up, with `config.pen_color`
    /// and `config.animation_speed_ms`, animation off. Frame 0 is the canvas
    /// as the drawing code left it.
    pub fn run_with<F, V>(config: &TurtleConfig, draw: F, mut on_frame: V) -> Result<usize>
    where
        F: FnOnce(&mut CanvasTurtle) -> Result<()>,
        V: FnMut(&ResolvedScene),
    {
        let canvas = Canvas::new(config.contract(), config.viewport());
        let mut turtle =
            Turtle::with_position(canvas, FrameLatch::new(), config.start.x, config.start.y);
        turtle.pen_color(config.pen_color.as_str());
        turtle.set_animation(false, config.animation_speed());

        draw(&mut turtle)?;

        on_frame(&turtle.surface().rasterize());
        let mut frames = 1;
        while !Self::settled(&turtle) {
            if frames >= config.max_frames {
                log::warn!("stopped after {frames} frames with drawing still pending");
                break;
            }
            Self::step(&mut turtle, config)?;
            on_frame(&turtle.surface().rasterize());
            frames += 1;
        }

        log::debug!("ran {frames} frames");
        Ok(frames)
    }

    fn step(turtle: &mut CanvasTurtle, config: &TurtleConfig) -> Result<()> {
        for handle in turtle.surface_mut().advance(config.frame_interval()) {
            turtle.animation_finished(handle);
        }
        if turtle.clock_mut().take() {
            turtle.tick()?;
        }
        Ok(())
    }

    fn settled(turtle: &CanvasTurtle) -> bool {
        turtle.is_idle() && !turtle.surface().is_animating() && !turtle.clock().is_pending()
    }
}
