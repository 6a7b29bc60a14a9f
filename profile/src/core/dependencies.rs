//! Cross-field revalidation graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::core::types::Field;

/// Edges `source -> dependents`: when `source` changes, each dependent must
/// be validated again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDependencies {
    edges: BTreeMap<Field, Vec<Field>>,
}

impl FieldDependencies {
    /// The profile form graph: experience depends on birth date.
    pub fn standard() -> Self {
        Self::default().with_edge(Field::BirthDate, Field::Experience)
    }

    pub fn with_edge(mut self, source: Field, dependent: Field) -> Self {
        let dependents = self.edges.entry(source).or_default();
        if !dependents.contains(&dependent) {
            dependents.push(dependent);
        }
        self
    }

    /// Direct dependents of `source`.
    pub fn dependents(&self, source: Field) -> &[Field] {
        self.edges.get(&source).map(Vec::as_slice).unwrap_or_default()
    }

    /// `changed` followed by its transitive dependents, breadth-first, without repeats.
    pub fn revalidation_set(&self, changed: Field) -> Vec<Field> {
        let mut order = vec![changed];
        let mut seen = BTreeSet::from([changed]);
        let mut queue = VecDeque::from([changed]);
        while let Some(field) = queue.pop_front() {
            for &dependent in self.dependents(field) {
                if seen.insert(dependent) {
                    order.push(dependent);
                    queue.push_back(dependent);
                }
            }
        }
        order
    }
}
