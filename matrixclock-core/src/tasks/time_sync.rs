//! Network time resync task

use crate::config::DisplayConfig;
use crate::traits::{TimeError, TimeSource, Transport};

/// Status payload published after a sync request
pub const SYNC_STATUS: &[u8] = b"synced";

/// Periodically asks the time source to resynchronize
#[derive(Debug, Default)]
pub struct TimeSyncTask {
    last_error: Option<TimeError>,
}

impl TimeSyncTask {
    pub const fn new() -> Self {
        Self { last_error: None }
    }

    /// Error from the most recent sync request, if it failed
    pub fn last_error(&self) -> Option<TimeError> {
        self.last_error
    }

    pub fn run<T, N>(&mut self, time: &mut T, transport: &mut N, config: &DisplayConfig)
    where
        T: TimeSource,
        N: Transport,
    {
        self.last_error = time.request_sync().err();
        match self.last_error {
            None => {
                debug!("time sync requested");
                if config.report_time_sync {
                    if let Err(err) = transport.publish(config.topics.status.as_str(), SYNC_STATUS) {
                        debug!("sync status not published: {}", err);
                    }
                }
            }
            Some(err) => warn!("time sync request failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTime, MockTransport};

    #[test]
    fn test_requests_sync_silently_by_default() {
        let mut time = MockTime::at(0, 0);
        let mut transport = MockTransport::new();
        let mut task = TimeSyncTask::new();

        task.run(&mut time, &mut transport, &DisplayConfig::default());

        assert_eq!(time.syncs, 1);
        assert!(transport.published.is_empty());
        assert_eq!(task.last_error(), None);
    }

    #[test]
    fn test_reports_when_configured() {
        let mut time = MockTime::at(0, 0);
        let mut transport = MockTransport::new();
        let config = DisplayConfig {
            report_time_sync: true,
            ..Default::default()
        };
        let mut task = TimeSyncTask::new();

        task.run(&mut time, &mut transport, &config);

        assert_eq!(
            transport.published,
            vec![("home/display/status".to_string(), b"synced".to_vec())]
        );
    }

    #[test]
    fn test_failed_sync_not_reported() {
        let mut time = MockTime::at(0, 0);
        time.sync_result = Err(TimeError::Unavailable);
        let mut transport = MockTransport::new();
        let config = DisplayConfig {
            report_time_sync: true,
            ..Default::default()
        };
        let mut task = TimeSyncTask::new();

        task.run(&mut time, &mut transport, &config);

        assert_eq!(task.last_error(), Some(TimeError::Unavailable));
        assert!(transport.published.is_empty());
    }
}
