//! Readings - every sensor value reported by one poll of the monitor.

use alloc::vec::Vec;

use crate::Reading;

/// Find the first reading whose original label is exactly `label`.
///
/// Sensors differ between machines, so a missing label is expected: it
/// resolves to [`Reading::zero`] with `fallback_unit` rather than an error.
pub fn find_reading(readings: &[Reading], label: &str, fallback_unit: &str) -> Reading {
    readings
        .iter()
        .find(|r| r.label_original.as_deref() == Some(label))
        .cloned()
        .unwrap_or_else(|| Reading::zero(fallback_unit))
}

/// The ordered readings produced by a single poll.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Readings {
    readings: Vec<Reading>,
}

impl Readings {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection and assign each reading its position as index.
    pub fn indexed(readings: impl IntoIterator<Item = Reading>) -> Self {
        readings
            .into_iter()
            .enumerate()
            .map(|(idx, reading)| reading.with_index(idx))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// Borrow the first reading with the given original label.
    pub fn get(&self, label: &str) -> Option<&Reading> {
        self.readings
            .iter()
            .find(|r| r.label_original.as_deref() == Some(label))
    }

    /// See [`find_reading`].
    pub fn find_or_default(&self, label: &str, fallback_unit: &str) -> Reading {
        find_reading(&self.readings, label, fallback_unit)
    }

    /// Value of the reading with the given label, or 0.
    pub fn value_of(&self, label: &str) -> f64 {
        self.get(label).map_or(0.0, |r| r.value)
    }
}

impl FromIterator<Reading> for Readings {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self {
            readings: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Reading>> for Readings {
    fn from(readings: Vec<Reading>) -> Self {
        Self { readings }
    }
}

impl IntoIterator for Readings {
    type Item = Reading;
    type IntoIter = alloc::vec::IntoIter<Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.into_iter()
    }
}

impl<'a> IntoIterator for &'a Readings {
    type Item = &'a Reading;
    type IntoIter = core::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
