//! GPS acquisition state machine
//!
//! Two states share one [`SessionState`]:
//!
//! - **Idle**: no acquisition work
//! - **Polling**: periodically queries the modem for a location fix
//!
//! ## Transitions
//!
//! | From    | Event      | To      |
//! |---------|------------|---------|
//! | Idle    | EnableGps  | Polling |
//! | Polling | DisableGps | Idle    |
//! | Polling | EnableGps  | Polling (re-entry: exit then enter) |
//!
//! Any other (state, event) pair is ignored. Transitions run
//! exit → switch → enter, in that order, to completion.
//!
//! ## Radio priority
//!
//! GNSS is favored while a fix is being acquired and handed back to WWAN
//! as soon as one is captured, so the link is available to publish it.

use super::priority::PriorityArbiter;
use super::session::{Event, Fix, SessionState};
use crate::devices::modem::commands::{GPS_LOCATION, GPS_SESSION_BEGIN, GPS_SESSION_END, LOCATION_MATCHER};
use crate::devices::modem::{AtChannel, CommandOutcome};
use crate::parameters::TrackerParams;
use crate::platform::traits::GpioInterface;

/// State identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollStateId {
    Idle,
    Polling,
}

/// Transition table lookup
///
/// Returns `None` for pairs the machine ignores.
pub fn next_state(from: PollStateId, event: Event) -> Option<PollStateId> {
    match (from, event) {
        (PollStateId::Idle, Event::EnableGps) => Some(PollStateId::Polling),
        (PollStateId::Polling, Event::DisableGps) => Some(PollStateId::Idle),
        (PollStateId::Polling, Event::EnableGps) => Some(PollStateId::Polling),
        _ => None,
    }
}

/// Everything a state handler may touch
pub struct PollContext<'a, C, G: GpioInterface> {
    pub channel: &'a mut C,
    pub arbiter: &'a mut PriorityArbiter<G>,
    pub session: &'a mut SessionState,
    pub fix: &'a mut Option<Fix>,
    pub poll_interval_ms: u64,
    pub location_timeout_ms: u32,
}

/// State lifecycle
///
/// - `enter()`: called once on transition into the state
/// - `update()`: called on every main loop iteration
/// - `exit()`: called once on transition out of the state
pub trait PollState {
    fn enter<C: AtChannel, G: GpioInterface>(&self, ctx: &mut PollContext<'_, C, G>);

    fn update<C: AtChannel, G: GpioInterface>(&self, ctx: &mut PollContext<'_, C, G>);

    fn exit<C: AtChannel, G: GpioInterface>(&self, ctx: &mut PollContext<'_, C, G>);

    fn name(&self) -> &'static str;
}

/// No acquisition work
pub struct IdleState;

impl PollState for IdleState {
    fn enter<C: AtChannel, G: GpioInterface>(&self, _ctx: &mut PollContext<'_, C, G>) {}

    fn update<C: AtChannel, G: GpioInterface>(&self, _ctx: &mut PollContext<'_, C, G>) {}

    fn exit<C: AtChannel, G: GpioInterface>(&self, _ctx: &mut PollContext<'_, C, G>) {}

    fn name(&self) -> &'static str {
        "Idle"
    }
}

/// Periodic location queries
pub struct PollingState;

impl PollState for PollingState {
    fn enter<C: AtChannel, G: GpioInterface>(&self, ctx: &mut PollContext<'_, C, G>) {
        if ctx.session.lock_count > 0 {
            // Session already running; priority is switched per query
            crate::log_debug!("GPS: resuming session (lock count {})", ctx.session.lock_count);
            return;
        }

        match ctx
            .channel
            .send(GPS_SESSION_BEGIN.command, GPS_SESSION_BEGIN.timeout_ms, None)
        {
            CommandOutcome::Ok(_) => crate::log_info!("GPS: session started"),
            _other => crate::log_warn!("GPS: session start not confirmed: {:?}", _other),
        }
        ctx.arbiter.set_priority(ctx.channel, true);
    }

    fn update<C: AtChannel, G: GpioInterface>(&self, ctx: &mut PollContext<'_, C, G>) {
        let now = ctx.channel.now_ms();
        if now.saturating_sub(ctx.session.last_check_at) < ctx.poll_interval_ms {
            return;
        }

        if ctx.session.lock_count > 0 {
            ctx.arbiter.set_priority(ctx.channel, true);
        }

        let outcome = ctx.channel.send(
            GPS_LOCATION.command,
            ctx.location_timeout_ms,
            Some(&LOCATION_MATCHER),
        );
        let checked_at = ctx.channel.now_ms();
        ctx.session.last_check_at = checked_at;

        match outcome {
            CommandOutcome::Ok(raw_location) => {
                crate::log_info!("GPS: fix {}", raw_location.as_str());
                *ctx.fix = Some(Fix {
                    raw_location,
                    captured_at: checked_at,
                });
                ctx.session.last_update_at = Some(checked_at);
                ctx.session.lock_count = ctx.session.lock_count.saturating_add(1);
                ctx.arbiter.set_priority(ctx.channel, false);
            }
            _other => {
                ctx.session.last_update_at = None;
                crate::log_warn!(
                    "GPS: no fix ({:?}), lock count {}",
                    _other,
                    ctx.session.lock_count
                );
            }
        }
    }

    fn exit<C: AtChannel, G: GpioInterface>(&self, ctx: &mut PollContext<'_, C, G>) {
        if ctx.session.lock_count == 0 {
            ctx.arbiter.set_priority(ctx.channel, false);
        }
    }

    fn name(&self) -> &'static str {
        "Polling"
    }
}

/// Acquisition state machine
///
/// Owns the session data, the captured fix and the priority arbiter. The
/// machine starts Idle and does nothing until the first `EnableGps`.
pub struct GpsPoller<G: GpioInterface> {
    state: PollStateId,
    session: SessionState,
    fix: Option<Fix>,
    arbiter: PriorityArbiter<G>,
    poll_interval_ms: u64,
    location_timeout_ms: u32,
}

impl<G: GpioInterface> GpsPoller<G> {
    /// Create an Idle poller driving the priority `indicator`
    pub fn new(indicator: G, params: &TrackerParams) -> Self {
        Self {
            state: PollStateId::Idle,
            session: SessionState::default(),
            fix: None,
            arbiter: PriorityArbiter::new(indicator, params.settle_ms),
            poll_interval_ms: params.poll_interval_ms,
            location_timeout_ms: params.location_timeout_ms,
        }
    }

    /// Current state
    pub fn state(&self) -> PollStateId {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == PollStateId::Idle
    }

    /// Session bookkeeping
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Radio priority arbiter
    pub fn arbiter(&self) -> &PriorityArbiter<G> {
        &self.arbiter
    }

    /// Fix awaiting publication, if any
    pub fn pending_fix(&self) -> Option<&Fix> {
        self.session.last_update_at.and(self.fix.as_ref())
    }

    pub fn has_pending_fix(&self) -> bool {
        self.pending_fix().is_some()
    }

    /// Hand the radio to WWAN outside of any transition (boot setup)
    pub fn favor_wwan<C: AtChannel>(&mut self, channel: &mut C) {
        self.arbiter.set_priority(channel, false);
    }

    /// Dispatch an event
    ///
    /// Returns `true` if a transition ran.
    pub fn handle_event<C: AtChannel>(&mut self, channel: &mut C, event: Event) -> bool {
        let from = self.state;
        let Some(to) = next_state(from, event) else {
            crate::log_debug!("GPS: {:?} ignored in {}", event, Self::state_name(from));
            return false;
        };

        crate::log_info!(
            "GPS transition: {} -> {} ({:?})",
            Self::state_name(from),
            Self::state_name(to),
            event
        );

        self.exit_state(channel);
        self.state = to;
        self.enter_state(channel);
        true
    }

    /// Run the current state's update
    pub fn update<C: AtChannel>(&mut self, channel: &mut C) {
        let state = self.state;
        let mut ctx = self.context(channel);
        match state {
            PollStateId::Idle => IdleState.update(&mut ctx),
            PollStateId::Polling => PollingState.update(&mut ctx),
        }
    }

    /// Publish acknowledged: drop the fix and restart polling
    pub fn complete_publish<C: AtChannel>(&mut self, channel: &mut C) {
        self.clear_fix();
        self.handle_event(channel, Event::EnableGps);
    }

    /// Publish failed: drop the fix and end the modem session
    ///
    /// The lock count is reset so the next Polling entry starts a fresh
    /// session and re-prioritizes GNSS.
    pub fn abort_session<C: AtChannel>(&mut self, channel: &mut C) {
        self.clear_fix();
        self.handle_event(channel, Event::DisableGps);

        match channel.send(GPS_SESSION_END.command, GPS_SESSION_END.timeout_ms, None) {
            CommandOutcome::Ok(_) => crate::log_info!("GPS: session ended"),
            _other => crate::log_warn!("GPS: session end not confirmed: {:?}", _other),
        }
        self.session.lock_count = 0;
    }

    fn clear_fix(&mut self) {
        self.fix = None;
        self.session.last_update_at = None;
    }

    fn enter_state<C: AtChannel>(&mut self, channel: &mut C) {
        let state = self.state;
        let mut ctx = self.context(channel);
        match state {
            PollStateId::Idle => IdleState.enter(&mut ctx),
            PollStateId::Polling => PollingState.enter(&mut ctx),
        }
    }

    fn exit_state<C: AtChannel>(&mut self, channel: &mut C) {
        let state = self.state;
        let mut ctx = self.context(channel);
        match state {
            PollStateId::Idle => IdleState.exit(&mut ctx),
            PollStateId::Polling => PollingState.exit(&mut ctx),
        }
    }

    fn context<'a, C: AtChannel>(&'a mut self, channel: &'a mut C) -> PollContext<'a, C, G> {
        PollContext {
            channel,
            arbiter: &mut self.arbiter,
            session: &mut self.session,
            fix: &mut self.fix,
            poll_interval_ms: self.poll_interval_ms,
            location_timeout_ms: self.location_timeout_ms,
        }
    }

    fn state_name(id: PollStateId) -> &'static str {
        match id {
            PollStateId::Idle => IdleState.name(),
            PollStateId::Polling => PollingState.name(),
        }
    }
}
