//! Process records and lenient input coercion.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Process identifier. Assigned monotonically from 1, restarted by reset.
pub type Pid = u64;

/// A numeric input accepted from loosely typed sources.
///
/// Deserializes from any JSON value: numbers, numeric strings, booleans and
/// null all produce a value, everything else becomes NaN. Nothing is rejected;
/// [`Quantity::normalize`] folds bad input to the nearest valid value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quantity(f64);

impl Quantity {
    /// Wrap a raw value.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Raw value as received.
    #[must_use]
    pub const fn raw(self) -> f64 {
        self.0
    }

    /// Parse text the way a numeric form field is read: trimmed, empty is
    /// zero, garbage is NaN.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self(0.0);
        }
        Self(trimmed.parse().unwrap_or(f64::NAN))
    }

    /// Coerce to an integer `>= 1`. NaN, zero and negatives become 1,
    /// fractions are truncated, huge values saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn normalize(self) -> u64 {
        if self.0.is_nan() {
            return 1;
        }
        let floored = self.0.floor();
        if floored < 1.0 {
            1
        } else {
            floored as u64
        }
    }

    /// Interpret as a pid. Only finite non-negative integers qualify.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_pid(self) -> Option<Pid> {
        let v = self.0;
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Some(v as Pid)
        } else {
            None
        }
    }
}

impl From<u64> for Quantity {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Self(value as f64)
    }
}

impl From<i64> for Quantity {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self(value as f64)
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value convertible to a number")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Quantity, E> {
        Ok(Quantity(if v { 1.0 } else { 0.0 }))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        Ok(Quantity(v as f64))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        Ok(Quantity(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        Ok(Quantity(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
        Ok(Quantity::parse(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Quantity, E> {
        Ok(Quantity(0.0))
    }

    fn visit_none<E: de::Error>(self) -> Result<Quantity, E> {
        Ok(Quantity(0.0))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Quantity, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Quantity, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Quantity(f64::NAN))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Quantity, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Quantity(f64::NAN))
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// Caller-supplied description of a process to create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Display label; blank falls back to `Process-<pid>`.
    #[serde(default)]
    pub name: Option<String>,
    /// Requested memory reservation.
    #[serde(rename = "memoryMB", default)]
    pub memory_mb: Quantity,
    /// Requested runtime in seconds.
    #[serde(rename = "durationSec", default)]
    pub duration_sec: Quantity,
}

impl ProcessSpec {
    /// Build a spec from loosely typed parts.
    pub fn new(
        name: Option<&str>,
        memory_mb: impl Into<Quantity>,
        duration_sec: impl Into<Quantity>,
    ) -> Self {
        Self {
            name: name.map(str::to_owned),
            memory_mb: memory_mb.into(),
            duration_sec: duration_sec.into(),
        }
    }

    /// Unnamed spec.
    pub fn anonymous(memory_mb: impl Into<Quantity>, duration_sec: impl Into<Quantity>) -> Self {
        Self::new(None, memory_mb, duration_sec)
    }
}

/// A submitted process with normalized fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Identity, unique within a run.
    pub pid: Pid,
    /// Display label.
    pub name: String,
    /// Memory held while running.
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    /// Runtime once admitted.
    #[serde(rename = "durationSec")]
    pub duration_sec: u64,
    /// Submission time.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Process {
    /// Normalize `spec` into a process record.
    #[must_use]
    pub fn from_spec(pid: Pid, spec: &ProcessSpec, created_at: DateTime<Utc>) -> Self {
        Self {
            pid,
            name: normalize_name(spec.name.as_deref(), pid),
            memory_mb: spec.memory_mb.normalize(),
            duration_sec: spec.duration_sec.normalize(),
            created_at,
        }
    }
}

/// Lifecycle position of a live process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
    /// Waiting for memory.
    Queued,
    /// Holding memory and counting down.
    Running {
        /// Admission time.
        started_at: DateTime<Utc>,
        /// Whole seconds left.
        remaining_sec: u64,
    },
}

fn normalize_name(raw: Option<&str>, pid: Pid) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => format!("Process-{pid}"),
    }
}
