//! Time source for task timestamps and date filtering.

use chrono::{DateTime, Duration, Local, TimeZone};
use std::cell::RefCell;
use std::rc::Rc;

/// Supplies "now" in the calendar time zone used for filtering.
pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Wall clock in the process-local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock<Z: TimeZone> {
    now: Rc<RefCell<DateTime<Z>>>,
}

impl<Z: TimeZone> ManualClock<Z> {
    pub fn new(now: DateTime<Z>) -> Self {
        Self {
            now: Rc::new(RefCell::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Z>) {
        *self.now.borrow_mut() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.borrow_mut();
        *now = now.clone() + by;
    }
}

impl<Z: TimeZone> Clock for ManualClock<Z> {
    type Tz = Z;

    fn now(&self) -> DateTime<Z> {
        self.now.borrow().clone()
    }
}
