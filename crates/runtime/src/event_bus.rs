use std::collections::VecDeque;
use std::fmt;

use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Redraw,
    FieldToggle,
    ObservationToggle,
    Drag,
}

impl EventKind {
    const fn slot(self) -> usize {
        match self {
            EventKind::Redraw => 0,
            EventKind::FieldToggle => 1,
            EventKind::ObservationToggle => 2,
            EventKind::Drag => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EventKind::Redraw => "redraw",
            EventKind::FieldToggle => "field-toggle",
            EventKind::ObservationToggle => "observation-toggle",
            EventKind::Drag => "drag",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the renderer's trace, stamped with the redraw it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub detail: String,
}

/// Most recent events the renderer produced, bounded to `capacity`.
///
/// The oldest entry is evicted once full. Per-kind totals keep counting past
/// evictions.
#[derive(Debug)]
pub struct EventBus {
    log: VecDeque<Event>,
    capacity: usize,
    totals: [u64; 4],
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            log: VecDeque::with_capacity(capacity),
            capacity,
            totals: [0; 4],
        }
    }

    pub fn record(&mut self, frame: Frame, kind: EventKind, detail: impl Into<String>) {
        if self.log.len() == self.capacity {
            self.log.pop_front();
        }
        self.log.push_back(Event {
            frame_index: frame.index,
            kind,
            detail: detail.into(),
        });
        self.totals[kind.slot()] += 1;
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.log.iter()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Events of `kind` recorded since creation, including evicted ones.
    pub fn count(&self, kind: EventKind) -> u64 {
        self.totals[kind.slot()]
    }

    pub fn last(&self, kind: EventKind) -> Option<&Event> {
        self.log.iter().rev().find(|e| e.kind == kind)
    }

    /// Takes the retained events, leaving the totals untouched.
    pub fn drain(&mut self) -> Vec<Event> {
        self.log.drain(..).collect()
    }
}
