//! Element namespace table.
//!
//! The table is configuration, not logic: every valid element name with its
//! access mode, data type and default. Names may contain `n` segments that
//! match a non-negative array index, e.g. `cmi.objectives.n.id` matches
//! `cmi.objectives.3.id`. Indices are written without leading zeros, so
//! `cmi.objectives.03.id` is not an element name.

mod scorm12;

use crate::datatype::DataType;
use crate::error::{ErrorKind, Fault, ScormError};
use crate::types::DataMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Placeholder segment matching an array index
const INDEX_SEGMENT: &str = "n";

/// Access mode of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn is_readable(&self) -> bool {
        !matches!(self, AccessMode::WriteOnly)
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, AccessMode::ReadOnly)
    }
}

/// Definition of one data model element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ElementDef {
    pub name: String,
    pub access: AccessMode,
    pub data_type: DataType,
    #[serde(default)]
    pub default: String,
}

impl ElementDef {
    pub fn new(name: impl Into<String>, access: AccessMode, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            access,
            data_type,
            default: String::new(),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// `_count` keywords are computed from the store rather than stored
    pub fn is_count(&self) -> bool {
        self.name.ends_with("._count")
    }

    /// `_version`, `_children` and `_count` describe the data model itself
    pub fn is_keyword(&self) -> bool {
        self.name
            .rsplit('.')
            .next()
            .is_some_and(|last| last.starts_with('_'))
    }

    fn is_pattern(&self) -> bool {
        self.name.split('.').any(|s| s == INDEX_SEGMENT)
    }
}

/// A concrete element name resolved against its definition
#[derive(Debug, Clone)]
pub struct ElementRef<'t> {
    pub def: &'t ElementDef,
    /// Array prefix and index for every `n` segment, outermost first
    pub indices: Vec<(String, usize)>,
    /// For `_count` keywords: the array whose entries are counted
    pub counted_array: Option<String>,
}

impl<'t> ElementRef<'t> {
    /// Arrays must be filled in order: writing index `i` requires `i <= _count`.
    pub fn check_sequence(&self, data: &DataMap) -> Result<(), Fault> {
        for (array, index) in &self.indices {
            let count = array_count(data, array);
            if *index > count {
                return Err(Fault::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "index {} of {} skips ahead of _count {}",
                        index, array, count
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Number of distinct indices stored under `array`
pub fn array_count(data: &DataMap, array: &str) -> usize {
    let prefix = format!("{}.", array);
    data.range(prefix.clone()..)
        .take_while(|(key, _)| key.starts_with(&prefix))
        .filter_map(|(key, _)| {
            let rest = &key[prefix.len()..];
            parse_index(rest.split('.').next()?)
        })
        .collect::<BTreeSet<_>>()
        .len()
}

/// Parse an array index segment in canonical form: digits only, no leading zeros
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

/// Static table of valid elements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct NamespaceTable {
    elements: Vec<ElementDef>,
    #[serde(skip)]
    exact: HashMap<String, usize>,
    #[serde(skip)]
    patterns: Vec<usize>,
}

impl NamespaceTable {
    /// Build a table from element definitions
    pub fn new(elements: Vec<ElementDef>) -> Self {
        let mut table = Self {
            elements,
            exact: HashMap::new(),
            patterns: Vec::new(),
        };
        table.reindex();
        table
    }

    /// Built-in SCORM 1.2 data model
    pub fn scorm12() -> Self {
        scorm12::TABLE.clone()
    }

    /// Load a table from JSON, e.g. to describe the SCORM 2004 data model.
    ///
    /// Accepts `{"elements": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, ScormError> {
        let table: NamespaceTable = serde_json::from_str(json)?;
        if table.elements.is_empty() {
            return Err(ScormError::configuration("namespace table has no elements"));
        }
        Ok(Self::new(table.elements))
    }

    /// Add or replace an element definition
    pub fn insert(&mut self, def: ElementDef) {
        match self.elements.iter_mut().find(|e| e.name == def.name) {
            Some(existing) => *existing = def,
            None => self.elements.push(def),
        }
        self.reindex();
    }

    pub fn elements(&self) -> &[ElementDef] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn reindex(&mut self) {
        self.exact.clear();
        self.patterns.clear();
        for (i, def) in self.elements.iter().enumerate() {
            if def.is_pattern() {
                self.patterns.push(i);
            } else {
                self.exact.insert(def.name.clone(), i);
            }
        }
    }

    /// Resolve a concrete element name
    pub fn lookup(&self, name: &str) -> Option<ElementRef<'_>> {
        if let Some(&i) = self.exact.get(name) {
            let def = &self.elements[i];
            let counted_array = def
                .is_count()
                .then(|| name.trim_end_matches("._count").to_string());
            return Some(ElementRef {
                def,
                indices: Vec::new(),
                counted_array,
            });
        }

        let segments: Vec<&str> = name.split('.').collect();
        self.patterns.iter().find_map(|&i| {
            let def = &self.elements[i];
            match_pattern(&def.name, &segments).map(|indices| {
                let counted_array = def
                    .is_count()
                    .then(|| name.trim_end_matches("._count").to_string());
                ElementRef {
                    def,
                    indices,
                    counted_array,
                }
            })
        })
    }
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<Vec<(String, usize)>> {
    let pattern: Vec<&str> = pattern.split('.').collect();
    if pattern.len() != segments.len() {
        return None;
    }

    let mut indices = Vec::new();
    for (pos, (p, s)) in pattern.iter().zip(segments).enumerate() {
        if *p == INDEX_SEGMENT {
            let index = parse_index(s)?;
            indices.push((segments[..pos].join("."), index));
        } else if p != s {
            return None;
        }
    }
    Some(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        let table = NamespaceTable::scorm12();
        let found = table.lookup("cmi.core.lesson_status").unwrap();
        assert_eq!(found.def.access, AccessMode::ReadWrite);
        assert_eq!(found.def.default, "not attempted");
        assert!(found.indices.is_empty());
        assert!(table.lookup("cmi.core.nonsense").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_pattern_lookup() {
        let table = NamespaceTable::scorm12();
        let found = table.lookup("cmi.objectives.2.score.raw").unwrap();
        assert_eq!(found.def.name, "cmi.objectives.n.score.raw");
        assert_eq!(found.indices, vec![("cmi.objectives".to_string(), 2)]);

        let nested = table
            .lookup("cmi.interactions.0.correct_responses.1.pattern")
            .unwrap();
        assert_eq!(
            nested.indices,
            vec![
                ("cmi.interactions".to_string(), 0),
                ("cmi.interactions.0.correct_responses".to_string(), 1),
            ]
        );

        assert!(table.lookup("cmi.objectives.x.id").is_none());
        assert!(table.lookup("cmi.objectives.-1.id").is_none());
    }

    #[test]
    fn test_indices_without_leading_zeros() {
        let table = NamespaceTable::scorm12();
        assert!(table.lookup("cmi.objectives.0.id").is_some());
        assert!(table.lookup("cmi.objectives.10.id").is_some());
        assert!(table.lookup("cmi.objectives.01.id").is_none());
        assert!(table.lookup("cmi.objectives.00.id").is_none());
        assert!(table
            .lookup("cmi.interactions.0.correct_responses.007.pattern")
            .is_none());

        let mut data = DataMap::new();
        data.insert("cmi.objectives.0.id".into(), "a".into());
        data.insert("cmi.objectives.01.id".into(), "stale".into());
        assert_eq!(array_count(&data, "cmi.objectives"), 1);
    }

    #[test]
    fn test_keyword_elements() {
        let table = NamespaceTable::scorm12();
        for name in [
            "cmi._version",
            "cmi.core._children",
            "cmi.objectives._count",
            "cmi.interactions.2.objectives._count",
        ] {
            assert!(table.lookup(name).unwrap().def.is_keyword(), "{name}");
        }
        assert!(!table.lookup("cmi.core.credit").unwrap().def.is_keyword());
        assert!(!table.lookup("cmi.objectives.0.id").unwrap().def.is_keyword());
    }

    #[test]
    fn test_count_keywords() {
        let table = NamespaceTable::scorm12();
        let count = table.lookup("cmi.objectives._count").unwrap();
        assert_eq!(count.counted_array.as_deref(), Some("cmi.objectives"));

        let nested = table.lookup("cmi.interactions.4.objectives._count").unwrap();
        assert_eq!(
            nested.counted_array.as_deref(),
            Some("cmi.interactions.4.objectives")
        );
    }

    #[test]
    fn test_array_count_and_sequence() {
        let table = NamespaceTable::scorm12();
        let mut data = DataMap::new();
        assert_eq!(array_count(&data, "cmi.objectives"), 0);

        data.insert("cmi.objectives.0.id".into(), "a".into());
        data.insert("cmi.objectives.0.status".into(), "passed".into());
        data.insert("cmi.objectives.1.id".into(), "b".into());
        data.insert("cmi.objectivesx.7.id".into(), "noise".into());
        assert_eq!(array_count(&data, "cmi.objectives"), 2);

        let next = table.lookup("cmi.objectives.2.id").unwrap();
        assert!(next.check_sequence(&data).is_ok());

        let skip = table.lookup("cmi.objectives.5.id").unwrap();
        assert_eq!(
            skip.check_sequence(&data).unwrap_err().kind,
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "elements": [
                {"name": "cmi.completion_status", "access": "read_write",
                 "data_type": {"type": "vocabulary", "values": ["completed", "incomplete"]},
                 "default": "unknown"},
                {"name": "cmi.score.scaled", "access": "read_write",
                 "data_type": {"type": "decimal", "min": -1.0, "max": 1.0}}
            ]
        }"#;
        let table = NamespaceTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        let scaled = table.lookup("cmi.score.scaled").unwrap();
        assert_eq!(scaled.def.default, "");
        assert!(scaled.def.data_type.validate("0.5").is_ok());

        assert!(NamespaceTable::from_json(r#"{"elements": []}"#).is_err());
        assert!(NamespaceTable::from_json("not json").is_err());
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut table = NamespaceTable::scorm12();
        let before = table.len();
        table.insert(
            ElementDef::new("cmi.core.lesson_location", AccessMode::ReadOnly, DataType::Any)
                .with_default("start"),
        );
        assert_eq!(table.len(), before);
        let loc = table.lookup("cmi.core.lesson_location").unwrap();
        assert_eq!(loc.def.access, AccessMode::ReadOnly);

        table.insert(ElementDef::new(
            "cmi.custom.n.flag",
            AccessMode::ReadWrite,
            DataType::Any,
        ));
        assert!(table.lookup("cmi.custom.0.flag").is_some());
    }
}
