//! Hover lifecycle: pointer hover drives whether the preview panel is mounted
//!
//! ```text
//! Unmounted --enter--> Visible --leave--> Fading --timeout--> Unmounted
//!                         ^                  |
//!                         +------enter-------+
//! ```
//!
//! The machine is pure. Leaving hands out a [`TimerToken`]; the caller runs
//! the countdown and reports back with [`HoverLifecycle::expire`]. Only the
//! token of the latest countdown can unmount the panel.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverPhase {
    /// No panel in the render tree
    #[default]
    Unmounted,
    /// Pointer over the link, panel shown
    Visible,
    /// Pointer gone, panel kept for the exit transition
    Fading,
}

/// Identifies one unmount countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// What the caller has to do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEffect {
    None,
    /// Drop the running countdown
    CancelUnmount(TimerToken),
    /// Start a countdown; report back with this token when it elapses
    ScheduleUnmount(TimerToken),
}

#[derive(Debug, Clone, Default)]
pub struct HoverLifecycle {
    phase: HoverPhase,
    pending: Option<TimerToken>,
    issued: u64,
}

impl HoverLifecycle {
    pub fn phase(&self) -> HoverPhase {
        self.phase
    }

    pub fn hovered(&self) -> bool {
        self.phase == HoverPhase::Visible
    }

    pub fn mounted(&self) -> bool {
        self.phase != HoverPhase::Unmounted
    }

    /// Countdown currently allowed to unmount the panel
    pub fn pending_unmount(&self) -> Option<TimerToken> {
        self.pending
    }

    /// Pointer entered the link
    pub fn enter(&mut self) -> HoverEffect {
        match self.phase {
            HoverPhase::Visible => HoverEffect::None,
            HoverPhase::Unmounted => {
                self.phase = HoverPhase::Visible;
                HoverEffect::None
            }
            HoverPhase::Fading => {
                self.phase = HoverPhase::Visible;
                match self.pending.take() {
                    Some(token) => HoverEffect::CancelUnmount(token),
                    None => HoverEffect::None,
                }
            }
        }
    }

    /// Pointer left the link
    pub fn leave(&mut self) -> HoverEffect {
        if self.phase != HoverPhase::Visible {
            return HoverEffect::None;
        }

        self.issued += 1;
        let token = TimerToken(self.issued);
        self.phase = HoverPhase::Fading;
        self.pending = Some(token);
        HoverEffect::ScheduleUnmount(token)
    }

    /// A countdown elapsed; returns whether the panel was unmounted
    pub fn expire(&mut self, token: TimerToken) -> bool {
        if self.phase != HoverPhase::Fading || self.pending != Some(token) {
            return false;
        }

        self.phase = HoverPhase::Unmounted;
        self.pending = None;
        true
    }

    /// Forget any countdown, returning it so the caller can cancel it
    pub fn teardown(&mut self) -> Option<TimerToken> {
        self.pending.take()
    }
}
