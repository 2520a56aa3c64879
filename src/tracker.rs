//! Tracker main loop
//!
//! Single cooperative loop. Each [`Tracker::tick`]:
//!
//! 1. Disconnected: probe the connectivity provider, back off, return
//! 2. First connected tick: one-time modem setup, then `EnableGps`
//! 3. Otherwise: step the acquisition state machine, then publish any
//!    pending fix (or re-arm acquisition if the machine went Idle)
//!
//! Every call blocks for at most the sum of its command timeouts. Exactly
//! one modem command is in flight at any time.

use crate::communication::{Connectivity, PublishGateway, PublishOutcome, Publisher};
use crate::devices::modem::commands::{self, AtStep};
use crate::devices::modem::{AtChannel, ModemIdentity};
use crate::parameters::TrackerParams;
use crate::platform::traits::GpioInterface;
use crate::subsystems::gps::{Event, GpsPoller};

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickReport {
    /// Link down; probed and backed off
    Disconnected,
    /// One-time modem setup ran
    SetupComplete,
    /// State machine stepped; carries the publish outcome if one was attempted
    Stepped(Option<PublishOutcome>),
}

/// Tracker application
pub struct Tracker<C, G, N, P>
where
    C: AtChannel,
    G: GpioInterface,
    N: Connectivity,
    P: Publisher,
{
    channel: C,
    connectivity: N,
    poller: GpsPoller<G>,
    gateway: PublishGateway<P>,
    identity: ModemIdentity,
    params: TrackerParams,
    setup_done: bool,
}

impl<C, G, N, P> Tracker<C, G, N, P>
where
    C: AtChannel,
    G: GpioInterface,
    N: Connectivity,
    P: Publisher,
{
    /// Create a tracker
    ///
    /// # Arguments
    ///
    /// * `channel` - Modem command channel (also the board clock)
    /// * `indicator` - Radio priority status pin
    /// * `connectivity` - Cloud link status provider
    /// * `publisher` - Acknowledged publish transport
    /// * `params` - Timing parameters and event name
    pub fn new(
        channel: C,
        indicator: G,
        connectivity: N,
        publisher: P,
        params: TrackerParams,
    ) -> Self {
        Self {
            channel,
            connectivity,
            poller: GpsPoller::new(indicator, &params),
            gateway: PublishGateway::new(publisher, params.event_name),
            identity: ModemIdentity::default(),
            params,
            setup_done: false,
        }
    }

    /// Run one loop iteration
    pub fn tick(&mut self) -> TickReport {
        if !self.connectivity.is_connected() {
            self.connectivity.probe();
            self.channel.delay_ms(self.params.connect_backoff_ms);
            return TickReport::Disconnected;
        }

        if !self.setup_done {
            self.setup();
            return TickReport::SetupComplete;
        }

        self.poller.update(&mut self.channel);

        if self.poller.has_pending_fix() {
            let outcome = self.gateway.publish_pending(&mut self.poller, &mut self.channel);
            return TickReport::Stepped(outcome);
        }

        if self.poller.is_idle() {
            self.poller.handle_event(&mut self.channel, Event::EnableGps);
        }
        TickReport::Stepped(None)
    }

    /// One-time modem setup
    ///
    /// Every step is fire-and-forget: failures are logged and setup carries
    /// on. Acquisition then starts regardless.
    fn setup(&mut self) {
        crate::log_info!("Modem setup");

        self.identity = ModemIdentity::identify(&mut self.channel);
        match self.identity.antenna_sequence() {
            Some(steps) => run_sequence(&mut self.channel, steps),
            None => crate::log_warn!("No antenna sequence for model '{}'", self.identity.model()),
        }

        // Clear any session left over from before the reset
        run_step(&mut self.channel, &commands::GPS_SESSION_END);
        run_sequence(&mut self.channel, commands::MODEM_CONFIG_SEQUENCE);

        self.poller.favor_wwan(&mut self.channel);
        self.setup_done = true;
        self.poller.handle_event(&mut self.channel, Event::EnableGps);
    }

    pub fn is_setup_done(&self) -> bool {
        self.setup_done
    }

    /// Modem identity resolved during setup
    pub fn identity(&self) -> &ModemIdentity {
        &self.identity
    }

    pub fn poller(&self) -> &GpsPoller<G> {
        &self.poller
    }

    pub fn gateway(&self) -> &PublishGateway<P> {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut PublishGateway<P> {
        &mut self.gateway
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn connectivity_mut(&mut self) -> &mut N {
        &mut self.connectivity
    }
}

fn run_step<C: AtChannel>(channel: &mut C, step: &AtStep) {
    if let Err(_e) = channel
        .send(step.command, step.timeout_ms, None)
        .into_result()
    {
        crate::log_warn!("Setup: {} failed: {}", step.command, _e);
    }
}

fn run_sequence<C: AtChannel>(channel: &mut C, steps: &[AtStep]) {
    for step in steps {
        run_step(channel, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::mock::{MockConnectivity, MockPublisher};
    use crate::core::TrackerError;
    use crate::devices::modem::commands::{
        ANTENNA_POWER_SEQUENCES, GPS_LOCATION, GPS_SESSION_BEGIN, GPS_SESSION_END, IDENTIFY,
        PRIORITY_GNSS, PRIORITY_WWAN,
    };
    use crate::devices::modem::CommandChannel;
    use crate::platform::mock::{MockGpio, MockTimer, MockUart};
    use crate::subsystems::gps::PollStateId;

    type TestTracker =
        Tracker<CommandChannel<MockUart, MockTimer>, MockGpio, MockConnectivity, MockPublisher>;

    fn tracker(connected: bool, model: &str) -> TestTracker {
        let mut uart = MockUart::new(Default::default());
        uart.reply_to(
            IDENTIFY.command,
            &format!("\r\nQuectel\r\n{}\r\nRevision: {}LAR02A04\r\n\r\nOK\r\n", model, model),
        );
        for (_, steps) in ANTENNA_POWER_SEQUENCES {
            for step in *steps {
                uart.reply_to(step.command, "\r\nOK\r\n");
            }
        }
        for step in commands::MODEM_CONFIG_SEQUENCE {
            uart.reply_to(step.command, "\r\nOK\r\n");
        }
        for cmd in [
            GPS_SESSION_BEGIN.command,
            GPS_SESSION_END.command,
            PRIORITY_GNSS.command,
            PRIORITY_WWAN.command,
        ] {
            uart.reply_to(cmd, "\r\nOK\r\n");
        }
        uart.reply_to(
            GPS_LOCATION.command,
            "\r\n+QGPSLOC: 142008.000,37.87498,-122.29064,1.0,19.4,2,0.00,0.0,0.0,040821,06\r\n\r\nOK\r\n",
        );

        Tracker::new(
            CommandChannel::new(uart, MockTimer::starting_at_ms(30_000)),
            MockGpio::new_output(),
            MockConnectivity::new(connected),
            MockPublisher::new(),
            TrackerParams::default(),
        )
    }

    fn sent(t: &TestTracker) -> Vec<String> {
        t.channel().uart().sent_commands()
    }

    #[test]
    fn test_disconnected_tick_only_probes() {
        let mut t = tracker(false, "BG77");
        let start = t.channel().now_ms();

        assert_eq!(t.tick(), TickReport::Disconnected);
        assert_eq!(t.tick(), TickReport::Disconnected);

        assert!(sent(&t).is_empty());
        assert_eq!(t.connectivity_mut().probe_count(), 2);
        assert_eq!(t.channel().now_ms() - start, 2_000);
        assert!(!t.is_setup_done());
    }

    #[test]
    fn test_setup_sequence_for_bg77() {
        let mut t = tracker(true, "BG77");
        assert_eq!(t.tick(), TickReport::SetupComplete);

        let mut expected = vec![IDENTIFY.command.to_string()];
        expected.push("AT+QCFG=\"gpio\",1,26,1,0,0,1".to_string());
        expected.push("AT+QCFG=\"gpio\",3,26,1,1".to_string());
        expected.push(GPS_SESSION_END.command.to_string());
        expected.extend(
            commands::MODEM_CONFIG_SEQUENCE
                .iter()
                .map(|s| s.command.to_string()),
        );
        expected.push(PRIORITY_WWAN.command.to_string());
        expected.push(GPS_SESSION_BEGIN.command.to_string());
        expected.push(PRIORITY_GNSS.command.to_string());

        assert_eq!(sent(&t), expected);
        assert!(t.identity().model().starts_with("BG77"));
        assert_eq!(t.poller().state(), PollStateId::Polling);
    }

    #[test]
    fn test_setup_runs_once() {
        let mut t = tracker(true, "BG95");
        t.tick();
        t.channel_mut().uart_mut().clear_sent_commands();

        t.tick();
        assert_eq!(
            sent(&t)
                .iter()
                .filter(|c| c.as_str() == IDENTIFY.command)
                .count(),
            0
        );
    }

    #[test]
    fn test_setup_survives_silent_modem() {
        let mut t = tracker(true, "BG77");
        t.channel_mut().uart_mut().clear_reply(IDENTIFY.command);

        assert_eq!(t.tick(), TickReport::SetupComplete);
        assert_eq!(t.identity().model(), "");
        assert!(!sent(&t).iter().any(|c| c.starts_with("AT+QCFG")));
        assert_eq!(t.poller().state(), PollStateId::Polling);
    }

    #[test]
    fn test_fix_is_published_and_acquisition_restarts() {
        let mut t = tracker(true, "BG77");
        t.tick();

        assert_eq!(t.tick(), TickReport::Stepped(Some(PublishOutcome::Acked)));
        let published = t.gateway().publisher().published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, crate::parameters::tracker::EVENT_NAME);
        assert!(published[0]
            .1
            .contains(r#""gpsloc":"142008.000,37.87498,-122.29064,1.0,19.4,2,0.00,0.0,0.0,040821,06""#));
        assert_eq!(t.poller().state(), PollStateId::Polling);
        assert!(!t.poller().has_pending_fix());
    }

    #[test]
    fn test_nack_aborts_and_next_tick_restarts_session() {
        let mut t = tracker(true, "BG77");
        t.tick();
        t.gateway_mut()
            .publisher_mut()
            .queue(Err(TrackerError::PublishNack));

        assert_eq!(t.tick(), TickReport::Stepped(Some(PublishOutcome::Nacked)));
        assert_eq!(t.poller().state(), PollStateId::Idle);
        assert_eq!(t.poller().session().lock_count, 0);
        assert_eq!(sent(&t).last().map(String::as_str), Some(GPS_SESSION_END.command));

        t.channel_mut().uart_mut().clear_sent_commands();
        assert_eq!(t.tick(), TickReport::Stepped(None));
        assert_eq!(t.poller().state(), PollStateId::Polling);
        assert_eq!(
            sent(&t),
            vec![
                GPS_SESSION_BEGIN.command.to_string(),
                PRIORITY_GNSS.command.to_string()
            ]
        );
    }
}
