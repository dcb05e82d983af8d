// Battery level domain models
use serde::ser::{Serialize, SerializeTuple, Serializer};

/// One battery state-of-charge reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySample {
    pub time_ms: i64,
    pub percent: f64,
}

impl BatterySample {
    pub fn new(time_ms: i64, percent: f64) -> Self {
        Self { time_ms, percent }
    }
}

/// Serialized as a `[time_ms, percent]` pair, the shape a datetime axis expects.
impl Serialize for BatterySample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.time_ms)?;
        pair.serialize_element(&self.percent)?;
        pair.end()
    }
}

/// Battery samples ordered by timestamp, oldest first.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct BatterySeries {
    samples: Vec<BatterySample>,
}

impl BatterySeries {
    pub fn new(mut samples: Vec<BatterySample>) -> Self {
        samples.sort_by_key(|s| s.time_ms);
        Self { samples }
    }

    pub fn samples(&self) -> &[BatterySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&BatterySample> {
        self.samples.last()
    }

    /// JSON array of `[time_ms, percent]` pairs for template substitution.
    pub fn to_graph_data(&self) -> String {
        serde_json::to_string(&self.samples).unwrap_or_else(|_| "[]".to_string())
    }
}
