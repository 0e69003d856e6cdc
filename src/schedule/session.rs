use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid session time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    Start,
    End,
}

//a daily wall-clock time at which the session opens or closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTime {
    pub hour: u32,
    pub minute: u32,
    pub kind: SessionEventKind,
}

impl SessionTime {
    pub fn start(hour: u32, minute: u32) -> Self {
        SessionTime {
            hour,
            minute,
            kind: SessionEventKind::Start,
        }
    }

    pub fn end(hour: u32, minute: u32) -> Self {
        SessionTime {
            hour,
            minute,
            kind: SessionEventKind::End,
        }
    }

    pub fn naive_time(&self) -> Result<NaiveTime, ScheduleError> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or(ScheduleError::InvalidTime {
            hour: self.hour,
            minute: self.minute,
        })
    }
}

//one firing of a session time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEvent {
    pub time: DateTime<Utc>,
    pub kind: SessionEventKind,
}

//session times that fire every calendar day in one time zone
#[derive(Debug, Clone)]
pub struct SessionSchedule {
    time_zone: Tz,
    entries: Vec<(NaiveTime, SessionEventKind)>,
}

impl SessionSchedule {
    pub fn new(time_zone: &str, times: &[SessionTime]) -> Result<Self, ScheduleError> {
        let time_zone: Tz = time_zone
            .parse()
            .map_err(|_| ScheduleError::UnknownTimeZone(time_zone.to_string()))?;

        let entries = times
            .iter()
            .map(|t| Ok((t.naive_time()?, t.kind)))
            .collect::<Result<Vec<_>, ScheduleError>>()?;

        Ok(SessionSchedule { time_zone, entries })
    }

    //pacific time: open 06:30-08:00 and 10:30-12:00
    pub fn default_times() -> Vec<SessionTime> {
        vec![
            SessionTime::start(6, 30),
            SessionTime::end(8, 0),
            SessionTime::start(10, 30),
            SessionTime::end(12, 0),
        ]
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    //utc instants spanning the local calendar days [first, last]
    pub fn local_window(&self, first: NaiveDate, last: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = self.start_of_day(first);
        let to = match last.succ_opt() {
            Some(next) => self.start_of_day(next) - Duration::seconds(1),
            None => DateTime::<Utc>::MAX_UTC,
        };
        (from, to)
    }

    //first existing local instant of a day; midnight can fall in a dst gap
    fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let midnight = day.and_time(NaiveTime::MIN);
        (0..=3)
            .find_map(|hours| {
                self.time_zone
                    .from_local_datetime(&(midnight + Duration::hours(hours)))
                    .earliest()
            })
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc())
    }

    //every firing with from <= time <= to, in time order
    pub fn events_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<SessionEvent> {
        if to < from {
            return Vec::new();
        }

        let first_day = from.with_timezone(&self.time_zone).date_naive();
        let last_day = to.with_timezone(&self.time_zone).date_naive();

        let mut events = Vec::new();
        let mut day = first_day;
        while day <= last_day {
            events.extend(
                self.events_on(day)
                    .into_iter()
                    .filter(|e| e.time >= from && e.time <= to),
            );
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        //stable: equal instants keep their configured order
        events.sort_by_key(|e| e.time);
        events
    }

    //firings on one local calendar day; nonexistent local times are skipped,
    //ambiguous ones fire at the earliest instant
    fn events_on(&self, day: NaiveDate) -> Vec<SessionEvent> {
        self.entries
            .iter()
            .filter_map(|(time, kind)| {
                self.time_zone
                    .from_local_datetime(&day.and_time(*time))
                    .earliest()
                    .map(|local| SessionEvent {
                        time: local.with_timezone(&Utc),
                        kind: *kind,
                    })
            })
            .collect()
    }
}

//the in-session flag, flipped only by session events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionGate {
    in_session: bool,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.in_session = true;
    }

    pub fn close(&mut self) {
        self.in_session = false;
    }

    pub fn apply(&mut self, kind: SessionEventKind) {
        match kind {
            SessionEventKind::Start => self.open(),
            SessionEventKind::End => self.close(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.in_session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pacific() -> SessionSchedule {
        SessionSchedule::new("America/Los_Angeles", &SessionSchedule::default_times()).unwrap()
    }

    #[test]
    fn winter_day_fires_four_events_in_utc() {
        let from = Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2022, 12, 1, 23, 59, 0).unwrap();

        let events = pacific().events_between(from, to);
        let got: Vec<_> = events
            .iter()
            .map(|e| (e.time.format("%H:%M").to_string(), e.kind))
            .collect();

        assert_eq!(
            got,
            vec![
                ("14:30".to_string(), SessionEventKind::Start),
                ("16:00".to_string(), SessionEventKind::End),
                ("18:30".to_string(), SessionEventKind::Start),
                ("20:00".to_string(), SessionEventKind::End),
            ]
        );
    }

    #[test]
    fn summer_day_shifts_with_dst() {
        let from = Utc.with_ymd_and_hms(2023, 7, 3, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2023, 7, 3, 23, 59, 0).unwrap();

        let events = pacific().events_between(from, to);
        assert_eq!(
            events[0].time,
            Utc.with_ymd_and_hms(2023, 7, 3, 13, 30, 0).unwrap()
        );
    }

    #[test]
    fn fires_every_calendar_day_including_weekends() {
        //2022-12-03 and 04 are a weekend
        let from = Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2022, 12, 5, 23, 59, 0).unwrap();
        assert_eq!(pacific().events_between(from, to).len(), 20);
    }

    #[test]
    fn bounds_are_inclusive() {
        let at = Utc.with_ymd_and_hms(2022, 12, 1, 14, 30, 0).unwrap();
        let events = pacific().events_between(at, at);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SessionEventKind::Start);
    }

    #[test]
    fn local_window_follows_time_zone() {
        let day = NaiveDate::from_ymd_opt(2022, 12, 1).unwrap();

        let (from, to) = pacific().local_window(day, day);
        assert_eq!(from, Utc.with_ymd_and_hms(2022, 12, 1, 8, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2022, 12, 2, 7, 59, 59).unwrap());

        let tokyo = SessionSchedule::new("Asia/Tokyo", &SessionSchedule::default_times()).unwrap();
        let (from, to) = tokyo.local_window(day, day);
        assert_eq!(from, Utc.with_ymd_and_hms(2022, 11, 30, 15, 0, 0).unwrap());
        assert_eq!(tokyo.events_between(from, to).len(), 4);
    }

    #[test]
    fn local_window_skips_midnight_dst_gap() {
        //sao paulo sprang forward at midnight on 2018-11-04
        let sao_paulo = SessionSchedule::new("America/Sao_Paulo", &[]).unwrap();
        let day = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();
        let (from, _) = sao_paulo.local_window(day, day);
        assert_eq!(from, Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap());
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            SessionSchedule::new("Mars/Olympus", &[]).unwrap_err(),
            ScheduleError::UnknownTimeZone("Mars/Olympus".to_string())
        );
        assert_eq!(
            SessionSchedule::new("UTC", &[SessionTime::start(24, 0)]).unwrap_err(),
            ScheduleError::InvalidTime {
                hour: 24,
                minute: 0
            }
        );
    }

    #[test]
    fn gate_starts_closed() {
        assert!(!SessionGate::new().is_open());
    }

    proptest! {
        #[test]
        fn gate_tracks_most_recent_event(kinds in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut gate = SessionGate::new();
            let mut expected = false;
            for is_start in kinds {
                let kind = if is_start { SessionEventKind::Start } else { SessionEventKind::End };
                gate.apply(kind);
                expected = is_start;
                prop_assert_eq!(gate.is_open(), expected);
            }
            prop_assert_eq!(gate.is_open(), expected);
        }
    }
}
