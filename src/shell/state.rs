//! Lifecycle state machine for the supervised shell.

use std::fmt;

/// Lifecycle of a single supervised shell.
///
/// Advances strictly `NotStarted → Booting → Ready → Destroying → Destroyed`.
/// `Destroyed` is terminal and no state ever regresses. The only shortcut
/// is [`LifecycleEvent::StreamClosed`], which forces `Destroyed` when the
/// shell hangs up before announcing its own shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LifecycleState {
    #[default]
    NotStarted = 0,
    Booting = 2,
    Ready = 3,
    Destroying = 5,
    Destroyed = 7,
}

/// Events that drive the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The process was spawned.
    Launched,
    /// A boot line contained the ready sentinel.
    BootSentinel,
    /// A caller asked the shell to shut down.
    TerminateRequested,
    /// A shutdown line contained the destroyed sentinel.
    DestroyedSentinel,
    /// The output stream ended (or failed) before `Destroyed`.
    StreamClosed,
}

impl LifecycleState {
    /// Pure transition function.
    ///
    /// Returns `None` when `event` is not permitted in `self`; the caller
    /// decides whether that is an error or a no-op.
    pub fn next(self, event: LifecycleEvent) -> Option<LifecycleState> {
        use LifecycleEvent::*;
        use LifecycleState::*;

        match (self, event) {
            (NotStarted, Launched) => Some(Booting),
            (Booting, BootSentinel) => Some(Ready),
            (Ready, TerminateRequested) => Some(Destroying),
            (Destroying, DestroyedSentinel) => Some(Destroyed),
            (Booting | Ready | Destroying, StreamClosed) => Some(Destroyed),
            _ => None,
        }
    }

    /// Commands may be written only while the shell is listening.
    pub fn accepts_commands(self) -> bool {
        matches!(self, Self::Ready | Self::Destroying)
    }

    /// Shutdown has started or finished.
    pub fn is_shutting_down(self) -> bool {
        matches!(self, Self::Destroying | Self::Destroyed)
    }

    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Booting => "booting",
            Self::Ready => "ready",
            Self::Destroying => "destroying",
            Self::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
