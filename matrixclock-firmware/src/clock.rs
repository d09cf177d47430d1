//! RTC-backed local time source
//!
//! The RP2040 RTC keeps local time between syncs. A sync request asks the
//! bridge for network time; the RX task posts the answer to
//! [`TIME_UPDATE`], which is applied on the next read.

use defmt::*;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};

use matrixclock_core::traits::{LocalTime, TimeError, TimeSource};
use matrixclock_protocol::LocalDateTime;

use crate::bridge::{enqueue, Outbound};
use crate::channels::TIME_UPDATE;

/// Map a Monday-based weekday to the RTC's day of week
fn day_of_week(weekday: u8) -> DayOfWeek {
    match weekday % 7 {
        0 => DayOfWeek::Monday,
        1 => DayOfWeek::Tuesday,
        2 => DayOfWeek::Wednesday,
        3 => DayOfWeek::Thursday,
        4 => DayOfWeek::Friday,
        5 => DayOfWeek::Saturday,
        _ => DayOfWeek::Sunday,
    }
}

fn to_rtc(time: &LocalDateTime) -> DateTime {
    DateTime {
        year: time.year,
        month: time.month,
        day: time.day,
        day_of_week: day_of_week(time.weekday),
        hour: time.hour,
        minute: time.minute,
        second: time.second,
    }
}

/// Local time from the on-chip RTC
pub struct RtcTimeSource {
    rtc: Rtc<'static, embassy_rp::peripherals::RTC>,
    set: bool,
}

impl RtcTimeSource {
    pub fn new(rtc: Rtc<'static, embassy_rp::peripherals::RTC>) -> Self {
        Self { rtc, set: false }
    }

    fn apply_pending_update(&mut self) {
        let Some(update) = TIME_UPDATE.try_take() else {
            return;
        };
        match self.rtc.set_datetime(to_rtc(&update)) {
            Ok(()) => {
                info!(
                    "RTC set to {}:{}:{}",
                    update.hour, update.minute, update.second
                );
                self.set = true;
            }
            Err(e) => warn!("RTC rejected time: {:?}", Debug2Format(&e)),
        }
    }
}

impl TimeSource for RtcTimeSource {
    fn local_time(&mut self) -> Result<LocalTime, TimeError> {
        self.apply_pending_update();
        if !self.set {
            return Err(TimeError::NotSet);
        }

        let now = self.rtc.now().map_err(|_| TimeError::Unavailable)?;
        Ok(LocalTime {
            hour: now.hour,
            minute: now.minute,
            second: now.second,
        })
    }

    fn request_sync(&mut self) -> Result<(), TimeError> {
        enqueue(Outbound::SyncTime).map_err(|_| TimeError::Unavailable)
    }
}
