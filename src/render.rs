//! Projection of the task list into visible rows.
//!
//! Rows come out newest first. Each row keeps the storage index of its task
//! so a click on the row can be mapped back to the right task.

use std::io::{self, Write};

use crate::format::DateFormatter;
use crate::models::Task;

const DONE: &str = "[x]";
const PENDING: &str = "[ ]";

/// One visible line of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Position of the task in storage order, not display order.
    pub index: usize,
    pub done: bool,
    pub text: String,
    /// Formatted creation time.
    pub time: String,
}

/// Build the rows for a list, newest task first.
pub fn project_rows(tasks: &[Task], formatter: &DateFormatter) -> Vec<Row> {
    tasks
        .iter()
        .enumerate()
        .rev()
        .map(|(index, task)| Row {
            index,
            done: task.done,
            text: task.text.clone(),
            time: formatter.format(task.created_at),
        })
        .collect()
}

/// A surface that shows rows. Each call replaces whatever was shown before.
pub trait Renderer {
    fn render(&mut self, rows: &[Row]) -> io::Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, rows: &[Row]) -> io::Result<()> {
        (**self).render(rows)
    }
}

/// Writes rows as numbered lines.
///
/// Example output:
/// ```text
/// 1. [ ] Call the plumber  (02/03/24, 18:40)
/// 2. [x] Buy milk  (01/03/24, 09:05)
/// ```
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, rows: &[Row]) -> io::Result<()> {
        if rows.is_empty() {
            writeln!(self.out, "No tasks.")?;
            return self.out.flush();
        }

        for (position, row) in rows.iter().enumerate() {
            let mark = if row.done { DONE } else { PENDING };
            writeln!(
                self.out,
                "{}. {} {}  ({})",
                position + 1,
                mark,
                row.text,
                row.time
            )?;
        }
        self.out.flush()
    }
}

/// Keeps the last rendered rows in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRenderer {
    rows: Vec<Row>,
    renders: usize,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// How many times `render` has been called.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Renderer for MemoryRenderer {
    fn render(&mut self, rows: &[Row]) -> io::Result<()> {
        self.rows = rows.to_vec();
        self.renders += 1;
        Ok(())
    }
}
