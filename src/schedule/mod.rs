pub mod session;

pub use session::{
    ScheduleError, SessionEvent, SessionEventKind, SessionGate, SessionSchedule, SessionTime,
};
