use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use crossterm::{cursor, queue, style, terminal};
use slider_graph::{GraphNode, LayoutGraph, Vec3};

const NODE: char = 'o';
const ROOT: char = '@';
const EDGE: char = '.';

/// Rasterize `graph` into `rows` lines of `cols` characters.
pub fn project(graph: &LayoutGraph, cols: usize, rows: usize) -> Vec<String> {
    let mut canvas = vec![vec![' '; cols]; rows];
    if cols == 0 || rows == 0 || graph.node_count() == 0 {
        return canvas.into_iter().map(|row| row.into_iter().collect()).collect();
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for node in graph.nodes().filter(|node| node.position.is_finite()) {
        min_x = min_x.min(node.position.x);
        max_x = max_x.max(node.position.x);
        min_y = min_y.min(node.position.y);
        max_y = max_y.max(node.position.y);
    }
    let span_x = (max_x - min_x).max(f64::EPSILON);
    let span_y = (max_y - min_y).max(f64::EPSILON);

    let to_cell = |p: Vec3| -> Option<(f64, f64)> {
        if !p.is_finite() {
            return None;
        }
        let col = (p.x - min_x) / span_x * (cols - 1) as f64;
        // Screen rows grow downwards.
        let row = (max_y - p.y) / span_y * (rows - 1) as f64;
        Some((col, row))
    };

    for (a, b) in graph.edge_segments() {
        let (Some((c0, r0)), Some((c1, r1))) = (to_cell(a), to_cell(b)) else {
            continue;
        };
        let steps = (c1 - c0).abs().max((r1 - r0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let col = (c0 + (c1 - c0) * t).round() as usize;
            let row = (r0 + (r1 - r0) * t).round() as usize;
            if let Some(cell) = canvas.get_mut(row).and_then(|line| line.get_mut(col)) {
                *cell = EDGE;
            }
        }
    }

    let root = graph.root().map(|node| node.id.clone());
    for node in graph.nodes() {
        let Some((col, row)) = to_cell(node.position) else {
            continue;
        };
        let glyph = if Some(&node.id) == root.as_ref() {
            ROOT
        } else {
            NODE
        };
        if let Some(cell) = canvas
            .get_mut(row.round() as usize)
            .and_then(|line| line.get_mut(col.round() as usize))
        {
            *cell = glyph;
        }
    }

    canvas.into_iter().map(|row| row.into_iter().collect()).collect()
}

pub fn status_line(graph: &LayoutGraph, frame: u64) -> String {
    let root = graph.root().map(GraphNode::label).unwrap_or_default();
    format!(
        "{root}  frame {frame}  states {}  moves {}  energy {:.3e}  (q to quit)",
        graph.node_count(),
        graph.edge_count(),
        graph.kinetic_energy()
    )
}

/// Owns the terminal while the layout is on screen; restores it on drop.
pub struct TerminalView {
    stdout: Stdout,
}

impl TerminalView {
    pub fn open() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");
        crossterm::execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self { stdout })
    }

    pub fn draw(&mut self, graph: &LayoutGraph, frame: u64) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let lines = project(graph, cols as usize, rows.saturating_sub(1) as usize);
        for (row, line) in lines.iter().enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, row as u16), style::Print(line))?;
        }

        queue!(
            self.stdout,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(status_line(graph, frame))
        )?;
        self.stdout.flush()
    }

    /// Wait up to `timeout` for input; `true` once the user asks to quit.
    pub fn quit_requested(&self, timeout: Duration) -> io::Result<bool> {
        if !event::poll(timeout)? {
            return Ok(false);
        }
        Ok(matches!(
            event::read()?,
            Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        ))
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        let _ = crossterm::execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        tracing::info!("terminal restored");
    }
}

#[cfg(test)]
mod tests {
    use slider_graph::{Block, StateId};

    use super::*;

    fn id(x: usize) -> StateId {
        slider_graph::codec::encode(&[Block::horizontal(x, 0, 1)], 3)
    }

    #[test]
    fn empty_graph_is_blank() {
        let lines = project(&LayoutGraph::new(), 4, 2);
        assert_eq!(lines, vec!["    ", "    "]);
    }

    #[test]
    fn corners_and_edge() {
        let mut graph = LayoutGraph::new();
        graph.add_node(id(0), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        graph.add_node(id(1), Vec3::new(1.0, 0.0, 5.0)).unwrap();
        graph.add_edge(&id(0), &id(1)).unwrap();

        let lines = project(&graph, 5, 3);
        assert_eq!(lines, vec!["@    ", " ..  ", "   .o"]);
    }

    #[test]
    fn status_names_the_root() {
        let mut graph = LayoutGraph::new();
        graph.add_node(id(2), Vec3::ZERO).unwrap();
        graph.add_node(id(0), Vec3::X).unwrap();
        graph.add_edge(&id(2), &id(0)).unwrap();

        let status = status_line(&graph, 7);
        assert!(status.starts_with("Node ..A......  frame 7  states 2  moves 1"));
    }

    #[test]
    fn single_node_fits() {
        let mut graph = LayoutGraph::new();
        graph.add_node(id(0), Vec3::new(3.0, 3.0, 3.0)).unwrap();
        let lines = project(&graph, 3, 2);
        assert_eq!(lines, vec!["@  ", "   "]);
    }
}
