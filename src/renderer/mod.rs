//! Renderer: turns rasterized canvas scenes into a playable presentation.
//!
//! Takes `ResolvedScene`s one at a time, in frame order, and produces a
//! `PlayablePresentation` (serializable, for the player). Only the previous
//! grid is kept between scenes, so a long run costs one grid plus its diffs.
//!
//! The renderer knows nothing about turtles, queues or tweens; it only
//! paints cells and diffs grids.

use std::time::Duration;

use crate::types::{Cell, CellChange, Frame, PlayablePresentation, ResolvedScene, TerminalContract};

pub struct Renderer {
    contract: TerminalContract,
    frame_interval: Duration,
    prev_grid: Option<Vec<Vec<Cell>>>,
    frames: Vec<Frame>,
}

impl Renderer {
    pub fn new(contract: TerminalContract, frame_interval: Duration) -> Self {
        Renderer {
            contract,
            frame_interval,
            prev_grid: None,
            frames: Vec::new(),
        }
    }

    /// Append the next scene. The first becomes a full frame, every later
    /// one a diff against the scene before it.
    pub fn push(&mut self, scene: &ResolvedScene) {
        let grid = Self::rasterize(scene, &self.contract);
        let frame = match &self.prev_grid {
            None => Frame::Full {
                cells: grid.clone(),
            },
            Some(prev) => Frame::Diff {
                changes: Self::diff(prev, &grid),
            },
        };
        self.frames.push(frame);
        self.prev_grid = Some(grid);
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn finish(self) -> PlayablePresentation {
        PlayablePresentation {
            contract: self.contract,
            frame_interval_ms: self.frame_interval.as_millis() as u64,
            frames: self.frames,
        }
    }

    /// Render a whole sequence of scenes at once.
    pub fn render(
        scenes: &[ResolvedScene],
        contract: TerminalContract,
        frame_interval: Duration,
    ) -> PlayablePresentation {
        let mut renderer = Renderer::new(contract, frame_interval);
        for scene in scenes {
            renderer.push(scene);
        }
        renderer.finish()
    }

    /// Paint draw operations onto a fixed-size cell grid. Later operations
    /// paint over earlier ones, so newer lines win where they cross.
    fn rasterize(scene: &ResolvedScene, contract: &TerminalContract) -> Vec<Vec<Cell>> {
        let w = contract.width as usize;
        let h = contract.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        for op in &scene.ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    fg: Some(op.fg.clone()),
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        prev.iter()
            .zip(next)
            .enumerate()
            .flat_map(|(y, (prev_row, next_row))| {
                prev_row
                    .iter()
                    .zip(next_row)
                    .enumerate()
                    .filter(|(_, (p, n))| p != n)
                    .map(move |(x, (_, n))| CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: n.clone(),
                    })
            })
            .collect()
    }
}
