//! Terminal canvas: a vector surface backed by a character grid.
//!
//! Lines are kept as vector objects in surface coordinates so that tweens
//! can move their endpoints smoothly. They are only turned into cells when
//! a frame is rasterized.

use std::time::Duration;

use anyhow::Result;

use crate::types::{Color, DrawOp, Point, ResolvedScene, TerminalContract};

use super::{LineHandle, Surface, SurfaceError};

/// Maps surface coordinates onto grid cells.
///
/// Terminal cells are roughly twice as tall as they are wide, so rows
/// usually cover more surface units than columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Point,
    pub units_per_column: f64,
    pub units_per_row: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            origin: Point::new(0.0, 0.0),
            units_per_column: 10.0,
            units_per_row: 20.0,
        }
    }
}

impl Viewport {
    /// Fractional cell coordinates of a surface point.
    fn to_cells(&self, p: Point) -> (f64, f64) {
        (
            (p.x - self.origin.x) / self.units_per_column,
            (p.y - self.origin.y) / self.units_per_row,
        )
    }
}

#[derive(Debug, Clone)]
struct LineObject {
    handle: LineHandle,
    from: Point,
    to: Point,
    stroke: Color,
}

#[derive(Debug, Clone)]
struct Tween {
    handle: LineHandle,
    start: Point,
    target: Point,
    duration: Duration,
    elapsed: Duration,
}

pub struct Canvas {
    contract: TerminalContract,
    viewport: Viewport,
    lines: Vec<LineObject>,
    tweens: Vec<Tween>,
    next_id: u64,
}

impl Canvas {
    pub fn new(contract: TerminalContract, viewport: Viewport) -> Self {
        Canvas {
            contract,
            viewport,
            lines: Vec::new(),
            tweens: Vec::new(),
            next_id: 0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Current endpoints of a line, if it has not been cleared.
    pub fn line(&self, handle: LineHandle) -> Option<(Point, Point)> {
        self.lines
            .iter()
            .find(|l| l.handle == handle)
            .map(|l| (l.from, l.to))
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Move every running tween forward by `elapsed`.
    ///
    /// Returns the handles whose tween finished during this step, in the
    /// order the tweens were started. A finished line sits exactly on its
    /// target. Tweens outlive `clear_all`, so their completion is still
    /// reported even when the line itself is gone.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<LineHandle> {
        let mut finished = Vec::new();

        for tween in &mut self.tweens {
            tween.elapsed += elapsed;
            let done = tween.elapsed >= tween.duration;
            let end = if done {
                tween.target
            } else {
                let progress = tween.elapsed.as_secs_f64() / tween.duration.as_secs_f64();
                tween.start.lerp(tween.target, progress)
            };
            if let Some(line) = self.lines.iter_mut().find(|l| l.handle == tween.handle) {
                line.to = end;
            }
            if done {
                finished.push(tween.handle);
            }
        }

        self.tweens.retain(|t| !finished.contains(&t.handle));
        finished
    }

    /// Rasterize every line, in drawing order, onto the grid.
    pub fn rasterize(&self) -> ResolvedScene {
        let mut ops = Vec::new();
        for line in &self.lines {
            self.plot(line, &mut ops);
        }
        ResolvedScene {
            width: self.contract.width,
            height: self.contract.height,
            ops,
        }
    }

    fn plot(&self, line: &LineObject, ops: &mut Vec<DrawOp>) {
        let w = self.contract.width as i64;
        let h = self.contract.height as i64;
        if w == 0 || h == 0 {
            return;
        }

        let a = self.viewport.to_cells(line.from);
        let b = self.viewport.to_cells(line.to);
        if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
            return;
        }

        let ch = stroke_char(b.0 - a.0, b.1 - a.1);
        let Some((a, b)) = clip(a, b, w as f64, h as f64) else {
            return;
        };

        let cell = |v: f64, max: i64| (v.floor() as i64).clamp(0, max - 1);
        let (mut x, mut y) = (cell(a.0, w), cell(a.1, h));
        let (x1, y1) = (cell(b.0, w), cell(b.1, h));

        // Bresenham
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            ops.push(DrawOp {
                x: x as u16,
                y: y as u16,
                ch,
                fg: line.stroke.clone(),
            });
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

impl Surface for Canvas {
    fn draw_line(&mut self, from: Point, to: Point, stroke: &str) -> Result<LineHandle> {
        let stroke =
            Color::parse(stroke).ok_or_else(|| SurfaceError::InvalidColor(stroke.to_string()))?;
        self.next_id += 1;
        let handle = LineHandle::new(self.next_id);
        self.lines.push(LineObject {
            handle,
            from,
            to,
            stroke,
        });
        Ok(handle)
    }

    fn animate_line_endpoint(
        &mut self,
        handle: LineHandle,
        to: Point,
        duration: Duration,
    ) -> Result<()> {
        let (_, start) = self.line(handle).ok_or(SurfaceError::UnknownLine(handle))?;
        self.tweens.retain(|t| t.handle != handle);
        self.tweens.push(Tween {
            handle,
            start,
            target: to,
            duration,
            elapsed: Duration::ZERO,
        });
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.lines.clear();
        Ok(())
    }
}

/// Pick a glyph from the on-screen slope, in cell units with y downward.
fn stroke_char(dx: f64, dy: f64) -> char {
    if dx == 0.0 && dy == 0.0 {
        '*'
    } else if dy.abs() * 2.0 <= dx.abs() {
        '-'
    } else if dx.abs() * 2.0 <= dy.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Liang–Barsky clip of segment `a`→`b` against `[0, w] x [0, h]`.
fn clip(a: (f64, f64), b: (f64, f64), w: f64, h: f64) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [(-dx, a.0), (dx, w - a.0), (-dy, a.1), (dy, h - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NamedColor;

    fn canvas() -> Canvas {
        // One surface unit per cell keeps the arithmetic readable.
        Canvas::new(
            TerminalContract {
                width: 10,
                height: 5,
            },
            Viewport {
                origin: Point::new(0.0, 0.0),
                units_per_column: 1.0,
                units_per_row: 1.0,
            },
        )
    }

    fn cells(scene: &ResolvedScene) -> Vec<(u16, u16, char)> {
        scene.ops.iter().map(|op| (op.x, op.y, op.ch)).collect()
    }

    #[test]
    fn horizontal_line_fills_its_row() {
        let mut c = canvas();
        c.draw_line(Point::new(1.0, 2.0), Point::new(4.0, 2.0), "red")
            .unwrap();
        let scene = c.rasterize();
        assert_eq!(
            cells(&scene),
            vec![(1, 2, '-'), (2, 2, '-'), (3, 2, '-'), (4, 2, '-')]
        );
        assert!(scene
            .ops
            .iter()
            .all(|op| op.fg == Color::Named(NamedColor::Red)));
    }

    #[test]
    fn slope_picks_glyph() {
        let mut c = canvas();
        c.draw_line(Point::new(0.0, 0.0), Point::new(2.0, 2.0), "white")
            .unwrap();
        c.draw_line(Point::new(5.0, 3.0), Point::new(7.0, 1.0), "white")
            .unwrap();
        c.draw_line(Point::new(9.0, 0.0), Point::new(9.0, 4.0), "white")
            .unwrap();
        let glyphs: Vec<char> = c.rasterize().ops.iter().map(|op| op.ch).collect();
        assert_eq!(glyphs[..3], ['\\', '\\', '\\']);
        assert_eq!(glyphs[3..6], ['/', '/', '/']);
        assert!(glyphs[6..].iter().all(|&ch| ch == '|'));
    }

    #[test]
    fn clips_to_the_grid() {
        let mut c = canvas();
        c.draw_line(Point::new(-100.0, 1.0), Point::new(100.0, 1.0), "white")
            .unwrap();
        let scene = c.rasterize();
        assert_eq!(scene.ops.len(), 10);
        assert!(scene.ops.iter().all(|op| op.y == 1 && op.x < 10));

        let mut c = canvas();
        c.draw_line(Point::new(20.0, 20.0), Point::new(30.0, 30.0), "white")
            .unwrap();
        assert!(c.rasterize().ops.is_empty());
    }

    #[test]
    fn non_finite_lines_are_not_plotted() {
        let mut c = canvas();
        c.draw_line(Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0), "white")
            .unwrap();
        c.draw_line(Point::new(0.0, 0.0), Point::new(f64::INFINITY, 1.0), "white")
            .unwrap();
        assert_eq!(c.line_count(), 2);
        assert!(c.rasterize().ops.is_empty());
    }

    #[test]
    fn tween_moves_endpoint_and_reports_completion() {
        let mut c = canvas();
        let start = Point::new(0.0, 0.0);
        let h = c.draw_line(start, start, "white").unwrap();
        c.animate_line_endpoint(h, Point::new(8.0, 0.0), Duration::from_millis(100))
            .unwrap();
        assert!(c.is_animating());
        assert_eq!(cells(&c.rasterize()), vec![(0, 0, '*')]);

        assert!(c.advance(Duration::from_millis(50)).is_empty());
        let (_, mid) = c.line(h).unwrap();
        assert!((mid.x - 4.0).abs() < 1e-9);

        assert_eq!(c.advance(Duration::from_millis(50)), vec![h]);
        assert_eq!(c.line(h), Some((start, Point::new(8.0, 0.0))));
        assert!(!c.is_animating());
        assert!(c.advance(Duration::from_millis(50)).is_empty());
    }

    #[test]
    fn zero_duration_tween_finishes_on_next_step() {
        let mut c = canvas();
        let h = c
            .draw_line(Point::new(1.0, 1.0), Point::new(1.0, 1.0), "white")
            .unwrap();
        c.animate_line_endpoint(h, Point::new(3.0, 1.0), Duration::ZERO)
            .unwrap();
        assert_eq!(c.advance(Duration::ZERO), vec![h]);
        assert_eq!(c.line(h).unwrap().1, Point::new(3.0, 1.0));
    }

    #[test]
    fn clear_keeps_tween_timers() {
        let mut c = canvas();
        let h = c
            .draw_line(Point::new(0.0, 0.0), Point::new(0.0, 0.0), "white")
            .unwrap();
        c.animate_line_endpoint(h, Point::new(5.0, 0.0), Duration::from_millis(10))
            .unwrap();
        c.clear_all().unwrap();
        assert_eq!(c.line_count(), 0);
        assert_eq!(c.advance(Duration::from_millis(10)), vec![h]);
        assert!(c.rasterize().ops.is_empty());
    }

    #[test]
    fn rejects_bad_stroke_and_unknown_handle() {
        let mut c = canvas();
        let err = c
            .draw_line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), "mauve")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<SurfaceError>(),
            Some(&SurfaceError::InvalidColor("mauve".into()))
        );

        let ghost = LineHandle::new(42);
        let err = c
            .animate_line_endpoint(ghost, Point::new(1.0, 1.0), Duration::ZERO)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<SurfaceError>(),
            Some(&SurfaceError::UnknownLine(ghost))
        );
    }
}
