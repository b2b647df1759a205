//! A single sensor data point reported by the hardware monitor.

use alloc::string::String;
use core::fmt;

/// The kind of quantity a reading measures.
///
/// The hardware monitor tags every reading with an integer code; the
/// mapping is fixed by the monitor and covers codes 0 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadingKind {
    #[default]
    None,
    Temp,
    Voltage,
    Fan,
    Current,
    Power,
    Clock,
    Usage,
    Other,
}

impl ReadingKind {
    /// Every kind, ordered by its wire code.
    pub const ALL: [ReadingKind; 9] = [
        ReadingKind::None,
        ReadingKind::Temp,
        ReadingKind::Voltage,
        ReadingKind::Fan,
        ReadingKind::Current,
        ReadingKind::Power,
        ReadingKind::Clock,
        ReadingKind::Usage,
        ReadingKind::Other,
    ];

    /// Display name used by the monitor for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ReadingKind::None => "None",
            ReadingKind::Temp => "Temp",
            ReadingKind::Voltage => "Voltage",
            ReadingKind::Fan => "Fan",
            ReadingKind::Current => "Current",
            ReadingKind::Power => "Power",
            ReadingKind::Clock => "Clock",
            ReadingKind::Usage => "Usage",
            ReadingKind::Other => "Other",
        }
    }

    /// The wire code for this kind.
    pub fn code(&self) -> i64 {
        *self as i64
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for ReadingKind {
    type Error = UnknownReadingType;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(UnknownReadingType(code))
    }
}

/// A `readingType` code outside the known 0-8 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownReadingType(pub i64);

impl fmt::Display for UnknownReadingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown reading type code {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownReadingType {}

/// One sensor reading from a single poll.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Stable label assigned by the monitor. `None` for synthetic readings.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub label_original: Option<String>,

    /// Label as renamed by the user in the monitor.
    pub label_user: String,

    pub kind: ReadingKind,

    pub value: f64,

    pub unit: String,

    /// Position in the monitor's reading list, assigned at normalization.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub index: Option<usize>,
}

impl Reading {
    /// Create a reading whose display label matches its original label.
    pub fn new(label: impl Into<String>, kind: ReadingKind, value: f64, unit: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            label_user: label.clone(),
            label_original: Some(label),
            kind,
            value,
            unit: unit.into(),
            index: None,
        }
    }

    /// A zero-valued stand-in for a sensor that is not present.
    pub fn zero(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            ..Default::default()
        }
    }

    /// Set the display label.
    pub fn with_user_label(mut self, label: impl Into<String>) -> Self {
        self.label_user = label.into();
        self
    }

    /// Set the position of this reading in the source sequence.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Whether this reading was synthesized rather than reported.
    pub fn is_synthetic(&self) -> bool {
        self.label_original.is_none()
    }
}
