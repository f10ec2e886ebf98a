use std::fmt;

use uuid::Uuid;

use super::path::NavigationPath;

/// Stable identity of a presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(Uuid);

impl FrameId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One presented destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<D> {
    pub id: FrameId,
    pub destination: D,
}

impl<D> Frame<D> {
    fn new(destination: D) -> Self {
        Self {
            id: FrameId::new(),
            destination,
        }
    }
}

/// Operations a host applies to bring its stack in line with the path.
///
/// `popped` lists frames top-most first; `pushed` is in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDiff<D> {
    pub popped: Vec<FrameId>,
    pub pushed: Vec<Frame<D>>,
}

impl<D> Default for StackDiff<D> {
    fn default() -> Self {
        Self {
            popped: Vec::new(),
            pushed: Vec::new(),
        }
    }
}

impl<D> StackDiff<D> {
    pub fn is_empty(&self) -> bool {
        self.popped.is_empty() && self.pushed.is_empty()
    }
}

/// The stack of frames as the host presents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformStack<D> {
    frames: Vec<Frame<D>>,
}

impl<D> Default for PlatformStack<D> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<D: Clone + PartialEq> PlatformStack<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path → stack: a fresh frame per destination.
    pub fn from_path(path: &NavigationPath<D>) -> Self {
        Self {
            frames: path.iter().cloned().map(Frame::new).collect(),
        }
    }

    /// Stack → path.
    pub fn to_path(&self) -> NavigationPath<D> {
        self.frames
            .iter()
            .map(|frame| frame.destination.clone())
            .collect()
    }

    /// Make this stack render exactly `path`.
    ///
    /// Frames on the common prefix keep their identity; everything above it
    /// is popped and the remaining destinations are pushed as new frames.
    pub fn reconcile(&mut self, path: &NavigationPath<D>) -> StackDiff<D> {
        let keep = self
            .frames
            .iter()
            .zip(path.iter())
            .take_while(|(frame, destination)| &frame.destination == *destination)
            .count();

        let popped = self.frames.drain(keep..).rev().map(|frame| frame.id).collect();
        let pushed: Vec<Frame<D>> = path.as_slice()[keep..]
            .iter()
            .cloned()
            .map(Frame::new)
            .collect();
        self.frames.extend(pushed.iter().cloned());

        StackDiff { popped, pushed }
    }

    /// Drop frames above `len`, returning their ids top-most first.
    pub fn truncate(&mut self, len: usize) -> Vec<FrameId> {
        if len >= self.frames.len() {
            return Vec::new();
        }
        self.frames.drain(len..).rev().map(|frame| frame.id).collect()
    }

    pub fn frames(&self) -> &[Frame<D>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
