//! Keyframe animation of a spatial's local transform.

use super::{Controller, ControllerError, ControllerTiming, Spatial};
use crate::math::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Sorted key times with one value per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawKeyChannel<T>",
    bound(deserialize = "T: Deserialize<'de> + Copy")
)]
struct KeyChannel<T> {
    times: Vec<f32>,
    values: Vec<T>,
    #[serde(skip)]
    last_index: usize,
}

/// Unvalidated channel as read from a description.
#[derive(Deserialize)]
struct RawKeyChannel<T> {
    times: Vec<f32>,
    values: Vec<T>,
}

impl<T: Copy> TryFrom<RawKeyChannel<T>> for KeyChannel<T> {
    type Error = ControllerError;

    fn try_from(raw: RawKeyChannel<T>) -> Result<Self, Self::Error> {
        Self::new(raw.times, raw.values)
    }
}

impl<T: Copy> KeyChannel<T> {
    fn new(times: Vec<f32>, values: Vec<T>) -> Result<Self, ControllerError> {
        if times.len() != values.len() {
            return Err(ControllerError::KeyCountMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ControllerError::UnsortedKeyTimes);
        }
        Ok(Self {
            times,
            values,
            last_index: 0,
        })
    }

    /// Keys bracketing `time` and the normalized position between them.
    /// The search starts from the previous hit, since time usually moves a
    /// little per frame.
    fn sample(&mut self, time: f32) -> Option<(f32, T, T)> {
        let last = self.times.len().checked_sub(1)?;
        self.last_index = self.last_index.min(last);

        if time <= self.times[0] {
            self.last_index = 0;
            let v = self.values[0];
            return Some((0.0, v, v));
        }
        if time >= self.times[last] {
            self.last_index = last;
            let v = self.values[last];
            return Some((0.0, v, v));
        }

        let (i0, i1) = if time > self.times[self.last_index] {
            let mut next = self.last_index + 1;
            while time >= self.times[next] {
                self.last_index = next;
                next += 1;
            }
            (self.last_index, next)
        } else if time < self.times[self.last_index] {
            let mut prev = self.last_index - 1;
            while time <= self.times[prev] {
                self.last_index = prev;
                prev -= 1;
            }
            (prev, self.last_index)
        } else {
            let v = self.values[self.last_index];
            return Some((0.0, v, v));
        };

        let t0 = self.times[i0];
        let t1 = self.times[i1];
        Some(((time - t0) / (t1 - t0), self.values[i0], self.values[i1]))
    }
}

/// Animates translation (linear), rotation (slerp) and uniform scale
/// (linear) of a spatial's local transform from keyframes.
///
/// Scale keys only apply to a rotation-scale local transform. On a general
/// linear block they are skipped with a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeController {
    /// Mapping from application time to key time.
    #[serde(default)]
    pub timing: ControllerTiming,
    #[serde(default)]
    translations: KeyChannel<Vector3>,
    #[serde(default)]
    rotations: KeyChannel<Quaternion>,
    #[serde(default)]
    scales: KeyChannel<f32>,
    #[serde(skip)]
    last_application_time: Option<f64>,
}

impl KeyframeController {
    /// Create a controller with no keys.
    pub fn new(timing: ControllerTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    /// Set the translation keys.
    pub fn with_translations(mut self, times: Vec<f32>, values: Vec<Vector3>) -> Result<Self, ControllerError> {
        self.translations = KeyChannel::new(times, values)?;
        Ok(self)
    }

    /// Set the rotation keys.
    pub fn with_rotations(mut self, times: Vec<f32>, values: Vec<Quaternion>) -> Result<Self, ControllerError> {
        self.rotations = KeyChannel::new(times, values)?;
        Ok(self)
    }

    /// Set the uniform scale keys.
    pub fn with_scales(mut self, times: Vec<f32>, values: Vec<f32>) -> Result<Self, ControllerError> {
        self.scales = KeyChannel::new(times, values)?;
        Ok(self)
    }

    /// Check if the controller animates scale.
    #[inline]
    pub fn has_scale_keys(&self) -> bool {
        !self.scales.times.is_empty()
    }

    /// Number of translation, rotation and scale keys.
    pub fn key_counts(&self) -> (usize, usize, usize) {
        (
            self.translations.times.len(),
            self.rotations.times.len(),
            self.scales.times.len(),
        )
    }
}

impl Controller<Spatial> for KeyframeController {
    fn update(&mut self, application_time: f64, object: &mut Spatial) -> bool {
        if !self.timing.active || self.last_application_time == Some(application_time) {
            return false;
        }
        self.last_application_time = Some(application_time);

        let time = self.timing.control_time(application_time) as f32;

        if let Some((t, v0, v1)) = self.translations.sample(time) {
            object.local_mut().set_translate(v0.lerp(&v1, t));
        }
        if let Some((t, q0, q1)) = self.rotations.sample(time) {
            object
                .local_mut()
                .set_rotate(Quaternion::slerp(t, &q0, &q1).to_rotation_matrix());
        }
        if let Some((t, s0, s1)) = self.scales.sample(time) {
            if object.local().is_rs_matrix() {
                object.local_mut().set_uniform_scale(s0 + (s1 - s0) * t);
            } else {
                log::warn!("KeyframeController: scale keys skipped on '{}', general local transform", object.name());
            }
        }
        true
    }
}
