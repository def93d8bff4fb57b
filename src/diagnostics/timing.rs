use serde::{Deserialize, Serialize};

/// Wall-clock time spent in one extraction stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Stage timings of a single extraction call, in execution order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Elapsed time of the first stage named `label`.
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_camel_case() {
        let mut t = TimingBreakdown::default();
        t.push("histogram", 1.5);
        t.total_ms = 2.0;
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(
            json,
            r#"{"totalMs":2.0,"stages":[{"label":"histogram","elapsedMs":1.5}]}"#
        );
        assert_eq!(t.stage_ms("histogram"), Some(1.5));
        assert_eq!(t.stage_ms("channels"), None);
    }
}
