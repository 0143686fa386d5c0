//! Time source for appointment date validation
//!
//! Services take an `Arc<dyn Clock>`; production wires [`DefaultClock`],
//! tests freeze time with `FixedClock`.

pub use mockable::{Clock, DefaultClock};

#[cfg(test)]
pub use fixed::FixedClock;

#[cfg(test)]
mod fixed {
    use chrono::{DateTime, Local, Utc};
    use mockable::Clock;

    /// Clock frozen at a given instant
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_fixed_clock_is_frozen() {
        let instant = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.utc(), instant);
        assert_eq!(clock.utc(), clock.utc());
    }
}
