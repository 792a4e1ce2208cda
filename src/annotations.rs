//! Per-cell annotations owned by the rendering and practice layers.
//!
//! The maze engine never reads these; they ride along with each cell and are dropped with
//! the grid when a new maze is created.

use std::collections::hash_map;

use fnv::FnvHashMap;

/// The closed set of things a collaborator may stash on a cell.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum AnnotationKind {
    RenderHint,
    Highlight,
    Label,
    DetectionConfidence,
    Visited,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValue {
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotations {
    values: FnvHashMap<AnnotationKind, AnnotationValue>,
}

impl Default for Annotations {
    fn default() -> Self {
        Annotations { values: FnvHashMap::default() }
    }
}

impl Annotations {
    /// Stores `value` under `kind`, returning what was there before.
    pub fn insert(&mut self, kind: AnnotationKind, value: AnnotationValue) -> Option<AnnotationValue> {
        self.values.insert(kind, value)
    }

    pub fn get(&self, kind: AnnotationKind) -> Option<&AnnotationValue> {
        self.values.get(&kind)
    }

    pub fn remove(&mut self, kind: AnnotationKind) -> Option<AnnotationValue> {
        self.values.remove(&kind)
    }

    pub fn contains(&self, kind: AnnotationKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<AnnotationKind, AnnotationValue> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut annotations = Annotations::default();
        assert!(annotations.is_empty());

        let previous = annotations.insert(AnnotationKind::Label, AnnotationValue::Text("start".into()));
        assert_eq!(previous, None);
        assert!(annotations.contains(AnnotationKind::Label));
        assert_eq!(annotations.get(AnnotationKind::Label),
                   Some(&AnnotationValue::Text("start".into())));

        let previous = annotations.insert(AnnotationKind::Label, AnnotationValue::Integer(7));
        assert_eq!(previous, Some(AnnotationValue::Text("start".into())));
        assert_eq!(annotations.len(), 1);

        assert_eq!(annotations.remove(AnnotationKind::Label), Some(AnnotationValue::Integer(7)));
        assert!(!annotations.contains(AnnotationKind::Label));
        assert_eq!(annotations.remove(AnnotationKind::Label), None);
    }

    #[test]
    fn kinds_are_independent() {
        let mut annotations = Annotations::default();
        annotations.insert(AnnotationKind::Highlight, AnnotationValue::Flag(true));
        annotations.insert(AnnotationKind::DetectionConfidence, AnnotationValue::Number(0.75));
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations.get(AnnotationKind::Visited), None);

        let mut kinds = annotations.iter().map(|(kind, _)| *kind).collect::<Vec<_>>();
        kinds.sort();
        assert_eq!(kinds, vec![AnnotationKind::Highlight, AnnotationKind::DetectionConfidence]);

        annotations.clear();
        assert!(annotations.is_empty());
    }
}
