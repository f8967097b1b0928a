use crate::io::filename::LogFileIdentity;
use crate::metrics::Summary;
use crate::task::{LogFormat, TaskId};
use crate::value::Value;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

static NULL: Value = Value::Null;

/// Ordered field-name to value mapping for one trial (or one block).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialRecord {
    fields: Vec<(String, Value)>,
}

impl TrialRecord {
    /// Pair headers with values positionally; the shorter side wins.
    pub fn from_values(headers: &[&str], values: Vec<Value>) -> Self {
        Self {
            fields: headers
                .iter()
                .zip(values)
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Field value, `Value::Null` when the field is absent.
    pub fn get(&self, name: &str) -> &Value {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
            .unwrap_or(&NULL)
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for TrialRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct TrialRecordVisitor;

impl<'de> Visitor<'de> for TrialRecordVisitor {
    type Value = TrialRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of trial fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            fields.push((name, value));
        }
        Ok(TrialRecord { fields })
    }
}

impl<'de> Deserialize<'de> for TrialRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TrialRecordVisitor)
    }
}

/// Everything extracted from one log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskData {
    pub identity: LogFileIdentity,
    pub format: LogFormat,
    pub practice: Vec<TrialRecord>,
    pub trials: Vec<TrialRecord>,
    pub summary: Summary,
}

impl TaskData {
    pub fn task(&self) -> TaskId {
        self.identity.task
    }

    /// Column names of the task-trial records, in file order.
    pub fn task_headers(&self) -> &'static [&'static str] {
        self.format.grammar().task_headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zips_headers_with_values() {
        let record = TrialRecord::from_values(
            &["TrialNum", "Score", "Extra"],
            vec![Value::Int(3), Value::Float(1.5)],
        );
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Score"), &Value::Float(1.5));
        assert_eq!(record.get("Extra"), &Value::Null);
        assert_eq!(record.names().collect::<Vec<_>>(), ["TrialNum", "Score"]);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut record = TrialRecord::from_values(&["Zed", "Alpha"], vec![1i64.into(), "left".into()]);
        record.push("Rank", Value::Int(2));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Zed":1,"Alpha":"left","Rank":2}"#);
        let back: TrialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
