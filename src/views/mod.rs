//! View modules
//!
//! Three sibling controllers selected by a top-level navigation switch.
//! Each owns its form state, a result slot and one [`RequestSlot`]; leaving
//! a view cancels whatever it still has in flight.

pub mod clinical;
pub mod operational;
pub mod search;
pub mod slot;

pub use clinical::{ClinicalState, ClinicalTab, ClinicalView};
pub use operational::OperationalView;
pub use search::{SearchState, SearchView};
pub use slot::{RequestSlot, SubmitPolicy, Ticket};

use crate::gateway::ModelGateway;
use std::fmt;

/// Navigable screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewKind {
    #[default]
    Clinical,
    Operations,
    Search,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Clinical, ViewKind::Operations, ViewKind::Search];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "clinical" | "clinic" => Some(ViewKind::Clinical),
            "operations" | "operational" | "ops" | "finance" => Some(ViewKind::Operations),
            "search" | "records" | "fhir" => Some(ViewKind::Search),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Clinical => "clinical",
            ViewKind::Operations => "operations",
            ViewKind::Search => "search",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Clinical => "Clinical Assistant",
            ViewKind::Operations => "Operational & Financial Management",
            ViewKind::Search => "FHIR Data Search",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three views plus the navigation switch
#[derive(Clone)]
pub struct Workspace {
    active: ViewKind,
    pub clinical: ClinicalView,
    pub operations: OperationalView,
    pub search: SearchView,
}

impl Workspace {
    /// All views share one gateway; each gets its own slot
    pub fn new(gateway: ModelGateway, start: ViewKind, policy: SubmitPolicy) -> Self {
        Self {
            active: start,
            clinical: ClinicalView::new(gateway.clone(), RequestSlot::new(policy)),
            operations: OperationalView::new(gateway.clone(), RequestSlot::new(policy)),
            search: SearchView::new(gateway, RequestSlot::new(policy)),
        }
    }

    pub fn active(&self) -> ViewKind {
        self.active
    }

    /// Switch views, cancelling the outstanding call of the view being left.
    ///
    /// Returns whether a call was cancelled.
    pub fn navigate(&mut self, to: ViewKind) -> bool {
        if to == self.active {
            return false;
        }
        let cancelled = self.cancel(self.active);
        if cancelled {
            tracing::debug!(from = %self.active, %to, "cancelled in-flight request on navigation");
        }
        self.active = to;
        cancelled
    }

    pub fn cancel(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::Clinical => self.clinical.cancel(),
            ViewKind::Operations => self.operations.cancel(),
            ViewKind::Search => self.search.cancel(),
        }
    }

    pub fn cancel_active(&self) -> bool {
        self.cancel(self.active)
    }

    pub fn is_busy(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::Clinical => self.clinical.is_busy(),
            ViewKind::Operations => self.operations.is_busy(),
            ViewKind::Search => self.search.is_busy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_kind_parse() {
        assert_eq!(ViewKind::parse("ops"), Some(ViewKind::Operations));
        assert_eq!(ViewKind::parse(" Search "), Some(ViewKind::Search));
        assert_eq!(ViewKind::parse("billing"), None);
    }

    #[test]
    fn test_view_kind_round_trip_names() {
        for kind in ViewKind::ALL {
            assert_eq!(ViewKind::parse(kind.as_str()), Some(kind));
        }
    }
}
