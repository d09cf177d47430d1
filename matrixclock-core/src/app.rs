//! Application context and run loop
//!
//! [`App`] owns the shared state, the scheduler and the collaborators.
//! The firmware calls [`App::start`] once and then [`App::service`] from a
//! fast periodic loop. Each service pass either drives the broker
//! connection (while it is down) or ticks the scheduler, runs every due
//! task to completion, and delivers pending inbound messages one at a time.

use heapless::Vec;

use crate::config::DisplayConfig;
use crate::inbound;
use crate::link::{Connection, LinkStatus};
use crate::render::draw_status;
use crate::scheduler::{Scheduler, SchedulerError, TaskId};
use crate::state::SharedState;
use crate::tasks::{
    fallback_brightness, BlinkTask, ClockTask, SensorTask, TaskKind, TimeSyncTask, TASK_COUNT,
};
use crate::traits::{DisplaySurface, LightSensor, TimeSource, Transport};

/// Inbound messages delivered per service pass at most
pub const MAX_MESSAGES_PER_PASS: usize = 8;

/// What one service pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceReport {
    /// Tasks run, in dispatch order
    pub tasks: Vec<TaskKind, TASK_COUNT>,
    /// Inbound messages delivered to the handler
    pub messages: usize,
    /// Connection milestone reached during the pass
    pub link: Option<LinkStatus>,
}

/// Application context
pub struct App<D, S, T, N>
where
    D: DisplaySurface,
    S: LightSensor,
    T: TimeSource,
    N: Transport,
{
    state: SharedState,
    config: DisplayConfig,
    scheduler: Scheduler<TaskKind, TASK_COUNT>,
    task_ids: [TaskId; TASK_COUNT],
    link: Connection,
    clock: ClockTask,
    blink: BlinkTask,
    sensor_task: SensorTask,
    time_sync: TimeSyncTask,
    /// Boot-time sync requested
    synced: bool,
    display: D,
    sensor: S,
    time: T,
    transport: N,
}

impl<D, S, T, N> App<D, S, T, N>
where
    D: DisplaySurface,
    S: LightSensor,
    T: TimeSource,
    N: Transport,
{
    /// Build the application and register its tasks
    ///
    /// `client_suffix` becomes the hex tail of the broker client id.
    pub fn new(
        config: DisplayConfig,
        display: D,
        sensor: S,
        time: T,
        transport: N,
        client_suffix: u16,
    ) -> Result<Self, SchedulerError> {
        let mut scheduler: Scheduler<TaskKind, TASK_COUNT> = Scheduler::new();
        let mut register = |kind: TaskKind| scheduler.register(kind, period_of(&config, kind));
        let task_ids = [
            register(TaskKind::Clock)?,
            register(TaskKind::Blink)?,
            register(TaskKind::Sensor)?,
            register(TaskKind::TimeSync)?,
        ];

        Ok(Self {
            state: SharedState::new(config.minimal_brightness),
            link: Connection::new(config.client_id_prefix.as_str(), client_suffix),
            config,
            scheduler,
            task_ids,
            clock: ClockTask::new(),
            blink: BlinkTask::new(),
            sensor_task: SensorTask::new(),
            time_sync: TimeSyncTask::new(),
            synced: false,
            display,
            sensor,
            time,
            transport,
        })
    }

    /// Probe hardware, set the initial brightness and arm every task
    pub fn start(&mut self, now_ms: u32) {
        let available = self.sensor.probe();
        self.state.sensor_available = available;

        let (status, brightness) = if available {
            info!("light sensor connected");
            ("Sensor connected.", self.config.startup_brightness)
        } else {
            warn!("light sensor missing, brightness fixed");
            (
                "Sensor failed.",
                fallback_brightness(self.state.minimal_brightness),
            )
        };
        self.show_status(status);

        self.state.brightness = brightness;
        self.display.set_brightness(brightness);

        for id in self.task_ids {
            // Ids come from this scheduler
            let _ = self.scheduler.arm(id, now_ms);
        }
    }

    /// Run one pass of the outer loop
    pub fn service(&mut self, now_ms: u32) -> ServiceReport {
        let mut report = ServiceReport::default();

        // A pass that moves the link along is spent on the link alone
        if let Some(status) = self.link.poll(&mut self.transport, &self.config, now_ms) {
            report.link = Some(status);
            self.show_status(status.text());
            // Local time is unknown until the first sync
            if status == LinkStatus::Subscribed && !self.synced {
                self.synced = true;
                self.run_task(TaskKind::TimeSync);
            }
            return report;
        }
        if !self.link.is_online() {
            return report;
        }

        for kind in self.scheduler.tick(now_ms) {
            self.run_task(kind);
            // Capacity matches the task table
            let _ = report.tasks.push(kind);
        }

        while report.messages < MAX_MESSAGES_PER_PASS {
            let Some(msg) = self.transport.poll() else {
                break;
            };
            inbound::handle(
                &mut self.state,
                &mut self.display,
                &self.config.topics,
                msg.topic(),
                msg.payload(),
            );
            report.messages += 1;
        }

        report
    }

    /// Change a task's period at runtime
    pub fn set_task_period(&mut self, kind: TaskKind, period_ms: u32) -> Result<(), SchedulerError> {
        self.scheduler.set_period(self.task_id(kind), period_ms)
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn transport_mut(&mut self) -> &mut N {
        &mut self.transport
    }

    pub fn time_mut(&mut self) -> &mut T {
        &mut self.time
    }

    fn task_id(&self, kind: TaskKind) -> TaskId {
        match kind {
            TaskKind::Clock => self.task_ids[0],
            TaskKind::Blink => self.task_ids[1],
            TaskKind::Sensor => self.task_ids[2],
            TaskKind::TimeSync => self.task_ids[3],
        }
    }

    fn run_task(&mut self, kind: TaskKind) {
        trace!("run {}", kind);
        match kind {
            TaskKind::Clock => self
                .clock
                .run(&mut self.state, &mut self.display, &mut self.time),
            TaskKind::Blink => self.blink.run(&mut self.state, &mut self.display),
            TaskKind::Sensor => self.sensor_task.run(
                &mut self.state,
                &mut self.sensor,
                &mut self.display,
                &mut self.transport,
                &self.config.topics,
            ),
            TaskKind::TimeSync => {
                self.time_sync
                    .run(&mut self.time, &mut self.transport, &self.config)
            }
        }
    }

    fn show_status(&mut self, text: &str) {
        if let Err(err) = draw_status(&mut self.display, text) {
            warn!("status draw failed: {}", err);
        }
    }
}

fn period_of(config: &DisplayConfig, kind: TaskKind) -> u32 {
    match kind {
        TaskKind::Clock => config.clock_period_ms,
        TaskKind::Blink => config.blink_period_ms,
        TaskKind::Sensor => config.sensor_period_ms,
        TaskKind::TimeSync => config.time_sync_period_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HvacMode;
    use crate::testing::{MockDisplay, MockSensor, MockTime, MockTransport};
    use crate::traits::{Color565, ConnectProgress};

    type TestApp = App<MockDisplay, MockSensor, MockTime, MockTransport>;

    fn app_with(sensor: MockSensor, transport: MockTransport) -> TestApp {
        App::new(
            DisplayConfig::default(),
            MockDisplay::new(),
            sensor,
            MockTime::at(12, 34),
            transport,
            0xABCD,
        )
        .unwrap()
    }

    /// Start and bring the link up; returns the time it went online.
    /// No task has run yet at that point.
    fn online(app: &mut TestApp) -> u32 {
        app.start(0);
        app.service(0);
        app.service(1_000);
        let report = app.service(2_000);
        assert_eq!(report.link, Some(LinkStatus::Subscribed));
        2_000
    }

    #[test]
    fn test_zero_period_rejected_at_construction() {
        let config = DisplayConfig {
            sensor_period_ms: 0,
            ..Default::default()
        };
        let result = App::new(
            config,
            MockDisplay::new(),
            MockSensor::new(true),
            MockTime::at(0, 0),
            MockTransport::new(),
            1,
        );
        assert!(matches!(result, Err(SchedulerError::InvalidPeriod)));
    }

    #[test]
    fn test_start_with_sensor() {
        let mut app = app_with(MockSensor::new(true), MockTransport::new());
        app.start(0);

        assert!(app.state().sensor_available());
        assert_eq!(app.state().brightness(), 255);
        assert_eq!(app.display().last_brightness(), Some(255));
        assert_eq!(app.display().text_at(0, 10).unwrap().text, "Sensor connected.");
    }

    #[test]
    fn test_start_without_sensor_uses_fallback() {
        let mut app = app_with(MockSensor::new(false), MockTransport::new());
        app.start(0);

        assert!(!app.state().sensor_available());
        assert_eq!(app.state().brightness(), 4);
        assert_eq!(app.display().last_brightness(), Some(4));
        assert_eq!(app.display().text_at(0, 10).unwrap().text, "Sensor failed.");
    }

    #[test]
    fn test_scheduler_paused_while_link_down() {
        let mut app = app_with(MockSensor::new(true), MockTransport::new());
        app.start(0);

        let report = app.service(0);
        assert_eq!(report.link, Some(LinkStatus::Connecting));
        assert_eq!(app.display().text_at(0, 10).unwrap().text, "MQTT connecting ...");

        let report = app.service(1_000);
        assert_eq!(report.link, Some(LinkStatus::Failed));
        let report = app.service(4_000);
        assert!(report.tasks.is_empty());
        assert_eq!(app.display().text_at(0, 10).unwrap().text, "MQTT failed, retrying...");
    }

    #[test]
    fn test_tasks_run_once_online() {
        let mut app = app_with(MockSensor::new(true), MockTransport::accepting());
        let t = online(&mut app);

        // Every task is overdue by now; all fire in registration order
        let report = app.service(t + 14_400_000);
        assert_eq!(report.tasks.as_slice(), &TaskKind::ALL);
        // Boot sync plus the periodic one
        assert_eq!(app.time_mut().syncs, 2);
    }

    #[test]
    fn test_time_synced_when_first_online() {
        let mut app = app_with(MockSensor::new(true), MockTransport::accepting());
        app.start(0);
        app.service(0);
        app.service(1_000);
        assert_eq!(app.time_mut().syncs, 0);

        let report = app.service(2_000);
        assert_eq!(report.link, Some(LinkStatus::Subscribed));
        assert_eq!(app.time_mut().syncs, 1);

        // An hour of service passes adds no further requests
        for step in 1..=720u32 {
            app.service(2_000 + step * 5_000);
        }
        assert_eq!(app.time_mut().syncs, 1);
    }

    #[test]
    fn test_reconnect_does_not_resync() {
        let mut app = app_with(MockSensor::new(true), MockTransport::accepting());
        let t = online(&mut app);
        assert_eq!(app.time_mut().syncs, 1);

        app.transport_mut().connected = false;
        app.transport_mut()
            .connect_script
            .push_back(Ok(ConnectProgress::Connected));
        assert_eq!(app.service(t + 10).link, Some(LinkStatus::Connecting));
        let mut now = t + 10;
        let mut subscribed = false;
        for _ in 0..10 {
            now += 1_000;
            if app.service(now).link == Some(LinkStatus::Subscribed) {
                subscribed = true;
                break;
            }
        }
        assert!(subscribed);
        assert_eq!(app.time_mut().syncs, 1);
    }

    #[test]
    fn test_blink_cadence() {
        let mut app = app_with(MockSensor::new(true), MockTransport::accepting());
        let t = online(&mut app);
        app.service(t + 14_400_000);

        let base = t + 14_400_000;
        let mut blinks = 0;
        for step in 1..=100u32 {
            let report = app.service(base + step * 5);
            blinks += report.tasks.iter().filter(|k| **k == TaskKind::Blink).count();
        }
        // 500 ms at a 20 ms period
        assert_eq!(blinks, 25);
    }

    #[test]
    fn test_inbound_delivered_after_tasks() {
        let mut transport = MockTransport::accepting();
        transport.deliver("home/display/heat", b"1");
        transport.deliver("home/display/tempOut", b"24.5");
        transport.deliver("unknown/topic", b"1");
        let mut app = app_with(MockSensor::new(true), transport);
        let t = online(&mut app);

        let report = app.service(t + 1);
        assert_eq!(report.messages, 3);
        assert_eq!(app.state().hvac_mode(), HvacMode::Heating);
        assert_eq!(app.state().temp_out(), 24.5);
    }

    #[test]
    fn test_message_burst_spread_over_passes() {
        let mut transport = MockTransport::accepting();
        for _ in 0..(MAX_MESSAGES_PER_PASS + 3) {
            transport.deliver("home/display/tempIn", b"20");
        }
        let mut app = app_with(MockSensor::new(true), transport);
        let t = online(&mut app);

        assert_eq!(app.service(t + 1).messages, MAX_MESSAGES_PER_PASS);
        assert_eq!(app.service(t + 2).messages, 3);
    }

    #[test]
    fn test_separator_survives_same_pass_redraw() {
        let mut app = app_with(MockSensor::new(true), MockTransport::accepting());
        let t = online(&mut app);
        app.display_mut().fill(Color565::BLACK);

        // Clock (2 s) and blink (20 ms) both due at 2 s
        let report = app.service(t + 2_000);
        assert!(report.tasks.contains(&TaskKind::Clock));
        assert!(report.tasks.contains(&TaskKind::Blink));
        assert_ne!(app.display().pixel(29, 14), Color565::BLACK);
    }

    #[test]
    fn test_sensor_overrides_network_brightness() {
        let sensor = MockSensor::new(true).with_readings(&[Ok(10.0)]);
        let mut transport = MockTransport::accepting();
        transport.deliver("home/display/brightness", b"200");
        let mut app = app_with(sensor, transport);
        let t = online(&mut app);

        app.service(t + 1);
        assert_eq!(app.state().brightness(), 200);

        app.service(t + 5_000);
        assert_eq!(app.state().brightness(), 54);
    }

    #[test]
    fn test_set_task_period() {
        let mut app = app_with(MockSensor::new(true), MockTransport::accepting());
        assert_eq!(
            app.set_task_period(TaskKind::Blink, 0),
            Err(SchedulerError::InvalidPeriod)
        );
        assert_eq!(app.set_task_period(TaskKind::Blink, 40), Ok(()));
    }

    #[test]
    fn test_lost_session_pauses_tasks() {
        let mut app = app_with(MockSensor::new(true), MockTransport::accepting());
        let t = online(&mut app);

        app.transport_mut().connected = false;
        let report = app.service(t + 14_400_000);
        assert_eq!(report.link, Some(LinkStatus::Connecting));
        assert!(report.tasks.is_empty());
    }
}
