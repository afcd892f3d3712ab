//! Output shapes of the extractor.
//!
//! On the wire an extraction is a list of clusters, a cluster is a list of
//! records, and a record is a single-key map from operation to operands:
//! `[[{"product":["3","4"]},{"sum":["5","6"]}],[{"subtract":[]}]]`.

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One extracted operation and its direct operands. Empty operands mean the
/// operation consumes the results of the previous cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub name: String,
    pub operands: Vec<String>,
}

impl OperationRecord {
    pub fn new(name: impl Into<String>, operands: Vec<String>) -> Self {
        Self {
            name: name.into(),
            operands,
        }
    }
}

impl Serialize for OperationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.operands)?;
        map.end()
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.operands.join(", "))
    }
}

/// Records that can be evaluated together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cluster(Vec<OperationRecord>);

impl Cluster {
    pub fn new(records: Vec<OperationRecord>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[OperationRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}

/// The ordered clusters for one sentence, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Extraction(Vec<Cluster>);

impl Extraction {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self(clusters)
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every record in evaluation order.
    pub fn records(&self) -> impl Iterator<Item = &OperationRecord> {
        self.0.iter().flat_map(|c| c.records().iter())
    }

    pub fn to_json(&self) -> serde_json::Value {
        // A map with string keys and string arrays always serializes.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cluster) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", cluster)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Extraction {
        Extraction::new(vec![
            Cluster::new(vec![
                OperationRecord::new("product", vec!["3".into(), "4".into()]),
                OperationRecord::new("sum", vec!["5".into(), "6".into()]),
            ]),
            Cluster::new(vec![OperationRecord::new("subtract", vec![])]),
        ])
    }

    #[test]
    fn records_serialize_as_single_key_maps() {
        assert_eq!(
            sample().to_json(),
            json!([[{"product": ["3", "4"]}, {"sum": ["5", "6"]}], [{"subtract": []}]])
        );
    }

    #[test]
    fn display_is_one_cluster_per_line() {
        assert_eq!(
            sample().to_string(),
            "product(3, 4); sum(5, 6)\nsubtract()"
        );
    }

    #[test]
    fn records_flatten_in_order() {
        let extraction = sample();
        let names: Vec<_> = extraction.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["product", "sum", "subtract"]);
    }

    #[test]
    fn empty_extraction_is_an_empty_list() {
        assert_eq!(Extraction::default().to_json(), json!([]));
    }
}
