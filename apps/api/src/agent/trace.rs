use serde::{Deserialize, Serialize};

/// Ordered, human-readable record of the steps the agent took during one turn.
/// Observability only: nothing in the pipeline branches on its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTrace(Vec<String>);

impl ActionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<String>) {
        self.0.push(step.into());
    }

    /// Appends every step of `other`, preserving its order.
    pub fn extend(&mut self, other: ActionTrace) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn steps(&self) -> &[String] {
        &self.0
    }

    pub fn into_steps(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_preserves_order() {
        let mut trace = ActionTrace::new();
        trace.push("a");
        let mut other = ActionTrace::new();
        other.push("b");
        other.push("c");
        trace.extend(other);
        assert_eq!(trace.steps(), ["a", "b", "c"]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut trace = ActionTrace::new();
        trace.push("step");
        assert_eq!(serde_json::to_string(&trace).unwrap(), r#"["step"]"#);
    }
}
