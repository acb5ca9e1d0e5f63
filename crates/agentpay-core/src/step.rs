//! Checkout flow steps.

use std::fmt;

/// Progress of a single checkout request.
///
/// The flow is linear: `Start → Authenticated → PlanResolved →
/// CustomerResolved → SessionCreated`. `Failed` is reachable from any
/// non-terminal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Request received, nothing verified yet.
    Start,
    /// Bearer credential verified and email present.
    Authenticated,
    /// Plan tier resolved from the request body.
    PlanResolved,
    /// Billing customer found or marked for creation.
    CustomerResolved,
    /// Hosted checkout session created.
    SessionCreated,
    /// The request failed.
    Failed,
}

impl CheckoutStep {
    /// The step that follows this one on success, `None` when terminal.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::Authenticated),
            Self::Authenticated => Some(Self::PlanResolved),
            Self::PlanResolved => Some(Self::CustomerResolved),
            Self::CustomerResolved => Some(Self::SessionCreated),
            Self::SessionCreated | Self::Failed => None,
        }
    }

    /// Advance to the next step.
    ///
    /// Terminal steps stay where they are.
    #[must_use]
    pub fn advance(self) -> Self {
        self.next().unwrap_or(self)
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::SessionCreated | Self::Failed)
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::Authenticated => "authenticated",
            Self::PlanResolved => "plan_resolved",
            Self::CustomerResolved => "customer_resolved",
            Self::SessionCreated => "session_created",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
