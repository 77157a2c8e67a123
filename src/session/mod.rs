//! Tracking-session lifecycle.
//!
//! A state machine wrapping the opaque tracking engine: capability
//! detection, session creation and configuration, pause/resume, and the
//! recoverable-vs-fatal error split. One `SessionLifecycle` governs one
//! session instance at a time; `Stopped` and `Failed` are terminal for
//! that instance, and a fresh `start()` creates a new one.

pub mod backend;
pub mod notice;

pub use backend::{RuntimeProbe, SessionFactory, TrackingSession};
pub use notice::{NoticeChannel, NoticeSender, ServiceNotice, StatusSink};

use crate::error::SessionError;
use crate::tracking::FrameSnapshot;

/// Lifecycle position of the current session instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    CapabilityChecking,
    AwaitingInstall,
    Configuring,
    Resumed,
    Paused,
    Stopped,
    Failed(SessionError),
}

/// What a `start()` call achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Session configured, camera acquired, frames flowing.
    Running,
    /// The runtime is absent; the user was redirected to its install
    /// flow. Not an error.
    InstallRedirect,
    /// Terminal failure; the reason's `Display` text is the one
    /// user-visible message, surfaced exactly once through this outcome.
    /// The machine has already torn down to `Stopped`.
    Failed(SessionError),
    /// `start()` was called in a state where it does not apply.
    Ignored,
}

/// State machine governing one tracking session at a time.
pub struct SessionLifecycle {
    factory: Box<dyn SessionFactory>,
    session: Option<Box<dyn TrackingSession>>,
    state: SessionState,
    /// Whether the install flow was already offered for this lifecycle.
    /// Explicit per-instance state, so parallel lifecycles (tests) do not
    /// interfere.
    install_prompted: bool,
    /// Every state this machine has been in, in order.
    history: Vec<SessionState>,
    /// Last surface size, replayed onto newly created sessions.
    display_size: Option<(u32, u32)>,
}

impl SessionLifecycle {
    pub fn new(factory: Box<dyn SessionFactory>) -> Self {
        Self {
            factory,
            session: None,
            state: SessionState::Uninitialized,
            install_prompted: false,
            history: vec![SessionState::Uninitialized],
            display_size: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Every state the machine has passed through, oldest first.
    pub fn state_history(&self) -> &[SessionState] {
        &self.history
    }

    /// Check capability, create and configure a session, and acquire the
    /// camera. Configuration is attempted at most once per call; a
    /// failure tears the machine down to `Stopped` and surfaces its
    /// reason once through the returned outcome.
    pub fn start(&mut self) -> StartOutcome {
        match self.state {
            SessionState::Uninitialized | SessionState::Stopped | SessionState::AwaitingInstall => {}
            SessionState::Resumed => return StartOutcome::Running,
            _ => {
                log::warn!(
                    "[SessionLifecycle::start] ignored in state {:?}",
                    self.state
                );
                return StartOutcome::Ignored;
            }
        }

        self.transition(SessionState::CapabilityChecking);
        if !self.factory.is_available() {
            if self.install_prompted {
                // The user was already redirected once and the runtime is
                // still absent.
                log::warn!("[SessionLifecycle::start] runtime still missing after install prompt");
                return StartOutcome::Failed(self.fail(SessionError::RuntimeMissing));
            }
            log::info!("[SessionLifecycle::start] runtime missing, redirecting to install");
            self.factory.request_install();
            self.install_prompted = true;
            self.transition(SessionState::AwaitingInstall);
            return StartOutcome::InstallRedirect;
        }

        self.transition(SessionState::Configuring);
        let mut session = match self.factory.create_session() {
            Ok(session) => session,
            Err(reason) => return StartOutcome::Failed(self.fail(reason)),
        };
        if let Some((width, height)) = self.display_size {
            session.set_display_size(width, height);
        }
        if let Err(reason) = session.resume() {
            session.stop();
            return StartOutcome::Failed(self.fail(reason));
        }

        self.session = Some(session);
        self.transition(SessionState::Resumed);
        log::info!("[SessionLifecycle::start] session resumed");
        StartOutcome::Running
    }

    /// Re-acquire the camera after a `pause()`. Configuration is not
    /// re-run. A camera failure here is terminal rather than retried.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Paused => {}
            SessionState::Resumed => return Ok(()),
            _ => {
                log::debug!(
                    "[SessionLifecycle::resume] no-op in state {:?}",
                    self.state
                );
                return Ok(());
            }
        }

        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        match session.resume() {
            Ok(()) => {
                self.transition(SessionState::Resumed);
                Ok(())
            }
            Err(reason) => Err(self.fail(reason)),
        }
    }

    /// Release the camera and synchronously stop frame production. Safe
    /// to call from the host's pause callback at any point; the render
    /// loop observes the state change at the top of its next tick.
    pub fn pause(&mut self) {
        if self.state != SessionState::Resumed {
            log::debug!("[SessionLifecycle::pause] no-op in state {:?}", self.state);
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.pause();
        }
        self.transition(SessionState::Paused);
        log::info!("[SessionLifecycle::pause] session paused");
    }

    /// Release the underlying session unconditionally. Idempotent:
    /// stopping an already-stopped lifecycle is a no-op.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            log::debug!("[SessionLifecycle::stop] already stopped");
            return;
        }
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.transition(SessionState::Stopped);
        log::info!("[SessionLifecycle::stop] session stopped");
    }

    /// Latest frame snapshot, or `None` when the session is not resumed
    /// or has produced nothing new since the last call. Never blocks.
    pub fn latest_frame(&mut self) -> Option<FrameSnapshot> {
        if self.state != SessionState::Resumed {
            return None;
        }
        self.session.as_mut()?.latest_frame()
    }

    /// Record the surface size and forward it to the live session, if
    /// any. Replayed onto sessions created by later `start()` calls.
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_size = Some((width, height));
        if let Some(session) = self.session.as_mut() {
            session.set_display_size(width, height);
        }
    }

    /// Terminal failure path: pass through `Failed(reason)`, tear the
    /// session down, land in `Stopped`. Returns the reason so callers
    /// can surface it exactly once.
    fn fail(&mut self, reason: SessionError) -> SessionError {
        log::error!("[SessionLifecycle] session failed: {}", reason);
        self.transition(SessionState::Failed(reason.clone()));
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.transition(SessionState::Stopped);
        reason
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("[SessionLifecycle] {:?} -> {:?}", self.state, next);
        self.state = next.clone();
        self.history.push(next);
    }
}
