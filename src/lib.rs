//! Turtle graphics for the terminal.
//!
//! A [`turtle::Turtle`] turns movement commands into line segments on a
//! [`surface::Surface`], either right away or paced by an injected
//! [`clock::FrameClock`]. Around it sit a terminal canvas, a headless
//! engine that records frames, a renderer that diffs them, and a player
//! that shows them.

pub mod clock;
pub mod config;
pub mod engine;
pub mod player;
pub mod renderer;
pub mod surface;
pub mod turtle;
pub mod types;
