//! Time-driven controllers attached to scene objects.

use super::ControllerError;
use serde::{Deserialize, Serialize};

/// Behaviour that modifies an object once per update.
pub trait Controller<T: ?Sized> {
    /// Advance to `application_time` and modify `object`. Returns true when
    /// the object changed.
    fn update(&mut self, application_time: f64, object: &mut T) -> bool;

    /// Whether this controller is itself driven by other controllers. Such
    /// controllers cannot be attached to an object.
    fn is_controlled(&self) -> bool {
        false
    }
}

/// Ordered list of controllers owned by one object.
pub struct ControllerList<T: ?Sized> {
    controllers: Vec<Box<dyn Controller<T>>>,
}

impl<T: ?Sized> Default for ControllerList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> ControllerList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            controllers: Vec::new(),
        }
    }

    /// Number of attached controllers.
    #[inline]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Check if no controllers are attached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Attach a controller at the end of the list and return its index.
    pub fn attach(&mut self, controller: Box<dyn Controller<T>>) -> Result<usize, ControllerError> {
        if controller.is_controlled() {
            return Err(ControllerError::ControlledController);
        }
        self.controllers.push(controller);
        Ok(self.controllers.len() - 1)
    }

    /// Detach the controller at `index`.
    pub fn detach(&mut self, index: usize) -> Option<Box<dyn Controller<T>>> {
        if index < self.controllers.len() {
            Some(self.controllers.remove(index))
        } else {
            None
        }
    }

    /// Detach every controller.
    pub fn detach_all(&mut self) {
        self.controllers.clear();
    }

    /// Move every controller of `other` to the end of this list.
    pub fn append(&mut self, other: &mut ControllerList<T>) {
        self.controllers.append(&mut other.controllers);
    }

    /// Run every controller in order. Returns true if any of them changed
    /// the object.
    pub fn update(&mut self, application_time: f64, object: &mut T) -> bool {
        let mut any_changed = false;
        for controller in &mut self.controllers {
            any_changed |= controller.update(application_time, object);
        }
        any_changed
    }
}

impl<T: ?Sized> std::fmt::Debug for ControllerList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerList")
            .field("len", &self.controllers.len())
            .finish()
    }
}

/// How controller time behaves outside `[min_time, max_time]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatType {
    /// Hold the end values.
    #[default]
    Clamp,
    /// Jump back to the start.
    Wrap,
    /// Alternate forward and backward.
    Cycle,
}

/// Mapping from application time to a controller's local time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerTiming {
    /// Out-of-range behaviour.
    pub repeat: RepeatType,
    /// Start of the controller's time range.
    pub min_time: f64,
    /// End of the controller's time range.
    pub max_time: f64,
    /// Offset added after scaling.
    pub phase: f64,
    /// Application-time scale.
    pub frequency: f64,
    /// Inactive controllers skip their updates.
    pub active: bool,
}

impl Default for ControllerTiming {
    fn default() -> Self {
        Self {
            repeat: RepeatType::Clamp,
            min_time: 0.0,
            max_time: 0.0,
            phase: 0.0,
            frequency: 1.0,
            active: true,
        }
    }
}

impl ControllerTiming {
    /// Timing over `[min_time, max_time]` with the given repeat type.
    pub fn new(repeat: RepeatType, min_time: f64, max_time: f64) -> Self {
        Self {
            repeat,
            min_time,
            max_time,
            ..Self::default()
        }
    }

    /// Controller time for `application_time`.
    pub fn control_time(&self, application_time: f64) -> f64 {
        let control_time = self.frequency * application_time + self.phase;

        if self.repeat == RepeatType::Clamp {
            return control_time.clamp(self.min_time, self.max_time.max(self.min_time));
        }

        let range = self.max_time - self.min_time;
        if range <= 0.0 {
            return self.min_time;
        }

        let multiples = (control_time - self.min_time) / range;
        let integer_time = multiples.floor();
        let frac_time = multiples - integer_time;

        if self.repeat == RepeatType::Wrap {
            return self.min_time + frac_time * range;
        }

        // Odd periods run backward.
        if (integer_time as i64) & 1 != 0 {
            self.max_time - frac_time * range
        } else {
            self.min_time + frac_time * range
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        changes: bool,
    }

    impl Controller<Vec<f64>> for Counter {
        fn update(&mut self, application_time: f64, object: &mut Vec<f64>) -> bool {
            object.push(application_time);
            self.changes
        }
    }

    struct Driven;

    impl Controller<Vec<f64>> for Driven {
        fn update(&mut self, _application_time: f64, _object: &mut Vec<f64>) -> bool {
            true
        }

        fn is_controlled(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_update_runs_all_in_order() {
        let mut list: ControllerList<Vec<f64>> = ControllerList::new();
        assert_eq!(list.attach(Box::new(Counter { changes: false })).unwrap(), 0);
        assert_eq!(list.attach(Box::new(Counter { changes: true })).unwrap(), 1);

        let mut log = Vec::new();
        assert!(list.update(2.5, &mut log));
        assert_eq!(log, vec![2.5, 2.5]);

        list.detach(1);
        assert!(!list.update(3.0, &mut log));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_controlled_controller_rejected() {
        let mut list: ControllerList<Vec<f64>> = ControllerList::new();
        assert_eq!(
            list.attach(Box::new(Driven)).unwrap_err(),
            ControllerError::ControlledController
        );
        assert!(list.is_empty());
    }

    #[test]
    fn test_detach() {
        let mut list: ControllerList<Vec<f64>> = ControllerList::new();
        list.attach(Box::new(Counter { changes: true })).unwrap();
        list.attach(Box::new(Counter { changes: true })).unwrap();
        assert!(list.detach(5).is_none());
        assert!(list.detach(0).is_some());
        assert_eq!(list.len(), 1);
        list.detach_all();
        assert!(list.is_empty());
    }

    #[test]
    fn test_timing_clamp() {
        let timing = ControllerTiming::new(RepeatType::Clamp, 1.0, 3.0);
        assert_eq!(timing.control_time(0.0), 1.0);
        assert_eq!(timing.control_time(2.0), 2.0);
        assert_eq!(timing.control_time(9.0), 3.0);
    }

    #[test]
    fn test_timing_wrap() {
        let timing = ControllerTiming::new(RepeatType::Wrap, 0.0, 2.0);
        assert!((timing.control_time(2.5) - 0.5).abs() < 1e-12);
        assert!((timing.control_time(-0.5) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_timing_cycle() {
        let timing = ControllerTiming::new(RepeatType::Cycle, 0.0, 2.0);
        assert!((timing.control_time(0.5) - 0.5).abs() < 1e-12);
        assert!((timing.control_time(2.5) - 1.5).abs() < 1e-12);
        assert!((timing.control_time(4.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_timing_frequency_and_phase() {
        let timing = ControllerTiming {
            frequency: 2.0,
            phase: 1.0,
            max_time: 100.0,
            ..ControllerTiming::default()
        };
        assert_eq!(timing.control_time(3.0), 7.0);
    }
}
