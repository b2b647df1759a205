//! State updates - derived metrics addressed to a state store entity.

use alloc::string::{String, ToString};

/// A single derived metric, tagged with the entity it updates.
///
/// Each update is delivered to the state store on its own; nothing
/// batches or orders them beyond the order they are produced in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateUpdate {
    /// Target entity, e.g. `main_pc_total_power`.
    pub entity_id: String,

    /// Human friendly name, e.g. `Main Pc Total Power`.
    pub friendly_name: String,

    pub value: f64,

    pub unit: String,
}

impl StateUpdate {
    pub fn new(
        entity_id: impl Into<String>,
        friendly_name: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            friendly_name: friendly_name.into(),
            value,
            unit: unit.into(),
        }
    }

    /// The value rendered the way the state store expects it.
    ///
    /// Whole numbers render without a fractional part and negative zero
    /// renders as `0`.
    pub fn state(&self) -> String {
        if self.value == 0.0 {
            return "0".to_string();
        }
        self.value.to_string()
    }
}
