//! Per-overlay visibility flags

use super::content::OverlayKind;

/// One flag per [`OverlayKind`], set while that overlay's modal loop runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityGuard {
    visible: [bool; OverlayKind::ALL.len()],
}

impl VisibilityGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, kind: OverlayKind) -> bool {
        self.visible[kind.index()]
    }

    /// Sets the flag; false if it was already set
    pub fn try_acquire(&mut self, kind: OverlayKind) -> bool {
        let slot = &mut self.visible[kind.index()];
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    pub fn release(&mut self, kind: OverlayKind) {
        self.visible[kind.index()] = false;
    }

    pub fn any_visible(&self) -> bool {
        self.visible.iter().any(|&v| v)
    }
}
