//! Horloge de lecture partagée
//!
//! La position de lecture n'est jamais stockée : elle est recalculée à chaque
//! lecture à partir de l'instant où l'horloge du morceau courant a été remise
//! à zéro (`started_at`) et de l'instant présent fourni par un [`Clock`].

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// Source de l'instant présent
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Horloge murale du système
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Horloge pilotée à la main (tests, simulations)
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Démarre à l'instant présent du système
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    /// Avance l'horloge d'un nombre (éventuellement fractionnaire) de secondes
    pub fn advance_secs(&self, secs: f64) {
        let delta = TimeDelta::microseconds((secs * 1_000_000.0) as i64);
        let mut now = self.lock();
        *now += delta;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// Secondes écoulées entre `started_at` et `now`
///
/// Fonction pure. Un `now` antérieur à `started_at` donne 0.
pub fn elapsed_secs(started_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = now.signed_duration_since(started_at);
    if delta <= TimeDelta::zero() {
        return 0.0;
    }
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

/// Vrai quand le temps écoulé atteint la durée du morceau
pub fn is_finished(elapsed: f64, duration: u64) -> bool {
    elapsed >= duration.max(1) as f64
}

/// Sémantique de la position rapportée aux clients
///
/// La détection de fin de morceau se fait toujours sur le temps écoulé brut,
/// quel que soit le mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    /// `position = elapsed`, non borné
    #[default]
    Clamped,
    /// `position = elapsed mod max(duration, 1)`, toujours dans `[0, duration)`
    Wrapping,
}

impl PositionMode {
    pub fn position(self, elapsed: f64, duration: u64) -> f64 {
        match self {
            PositionMode::Clamped => elapsed,
            PositionMode::Wrapping => elapsed.rem_euclid(duration.max(1) as f64),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionMode::Clamped => "clamped",
            PositionMode::Wrapping => "wrapping",
        }
    }
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_elapsed_is_zero_before_start() {
        let start = t0();
        let before = start - TimeDelta::seconds(3);
        assert_eq!(elapsed_secs(start, before), 0.0);
        assert_eq!(elapsed_secs(start, start), 0.0);
    }

    #[test]
    fn test_elapsed_sub_second_precision() {
        let start = t0();
        let now = start + TimeDelta::milliseconds(2_500);
        assert!((elapsed_secs(start, now) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(t0());
        clock.advance_secs(6.0);
        assert!((elapsed_secs(t0(), clock.now()) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_finished_treats_zero_duration_as_one_second() {
        assert!(!is_finished(0.5, 0));
        assert!(is_finished(1.0, 0));
        assert!(!is_finished(3.0, 5));
        assert!(is_finished(5.0, 5));
    }

    proptest! {
        #[test]
        fn clamped_position_is_elapsed(e in 0.0f64..1e7, d in 1u64..100_000) {
            prop_assert_eq!(PositionMode::Clamped.position(e, d), e);
        }

        #[test]
        fn wrapping_position_stays_in_range(e in 0.0f64..1e7, d in 1u64..100_000) {
            let p = PositionMode::Wrapping.position(e, d);
            prop_assert!(p >= 0.0);
            prop_assert!(p < d as f64);
            prop_assert_eq!(p, e % d as f64);
        }

        #[test]
        fn elapsed_is_monotonic(a in 0i64..1_000_000, b in 0i64..1_000_000) {
            let start = t0();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let e_lo = elapsed_secs(start, start + TimeDelta::milliseconds(lo));
            let e_hi = elapsed_secs(start, start + TimeDelta::milliseconds(hi));
            prop_assert!(e_lo <= e_hi);
        }
    }
}
