use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::Serialize;

use crate::view::GraphView;

/// One recorded checkpoint of an algorithm run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step<V, W> {
    number: usize,
    title: String,
    snapshot: GraphView<V, W>,
    detail: String,
}

impl<V, W> Step<V, W> {
    /// 1-based position of the step within its trace.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn snapshot(&self) -> &GraphView<V, W> {
        &self.snapshot
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl<V, W> fmt::Display for Step<V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.title)
    }
}

/// Append-only log a solver writes its checkpoints to.
#[derive(Debug)]
pub struct TraceRecorder<V, W> {
    steps: Vec<Step<V, W>>,
}

impl<V, W> Default for TraceRecorder<V, W> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<V, W> TraceRecorder<V, W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        title: impl Into<String>,
        snapshot: GraphView<V, W>,
        detail: impl Into<String>,
    ) {
        let number = self.steps.len() + 1;
        let title = title.into();
        log::trace!("step {number}: {title}");

        self.steps.push(Step {
            number,
            title,
            snapshot,
            detail: detail.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Freeze the log. The returned trace can be navigated but not extended.
    pub fn finish(self) -> Trace<V, W> {
        Trace {
            steps: self.steps,
            cursor: 0,
        }
    }
}

/// A finished run log together with its replay cursor.
///
/// The cursor always stays within `[0, len - 1]`. Moving past either end is a
/// no-op.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace<V, W> {
    steps: Vec<Step<V, W>>,
    cursor: usize,
}

impl<V, W> Trace<V, W> {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step<V, W>] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step<V, W>> {
        self.steps.get(index)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The step under the cursor; `None` only when the trace is empty.
    pub fn current(&self) -> Option<&Step<V, W>> {
        self.steps.get(self.cursor)
    }

    /// Advance by one step. Returns `false` if the cursor was already at the end.
    pub fn cursor_next(&mut self) -> bool {
        if self.cursor + 1 < self.steps.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Go back by one step. Returns `false` if the cursor was already at the start.
    pub fn cursor_prev(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.steps.len().saturating_sub(1));
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Rebuild every snapshot with its vertices passed through `f`. Titles,
    /// details and the cursor position are kept.
    pub fn try_map_vertices<U, E, F>(self, mut f: F) -> Result<Trace<U, W>, E>
    where
        F: FnMut(V) -> Result<U, E>,
    {
        let steps = self
            .steps
            .into_iter()
            .map(|step| {
                Ok(Step {
                    number: step.number,
                    title: step.title,
                    snapshot: step.snapshot.try_map_vertices(&mut f)?,
                    detail: step.detail,
                })
            })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Trace {
            steps,
            cursor: self.cursor,
        })
    }
}
