use std::collections::{HashMap, HashSet};

use super::columns::FIXED_COLUMNS;

/// Header of a match table: the fixed columns followed by one column per
/// sample attribute name, in first-seen order.
///
/// An attribute name that is already taken by another column is renamed by
/// appending `_1`, `_2`, ... until it is free. The same attribute name always
/// maps to the same column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<String>,
    taken: HashSet<String>,
    attributes: HashMap<String, usize>,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnSchema {
    /// Schema with only the fixed columns
    pub fn new() -> Self {
        let columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let taken = columns.iter().cloned().collect();
        Self {
            columns,
            taken,
            attributes: HashMap::new(),
        }
    }

    /// Column index for an attribute name, adding a column on first sight
    pub fn register_attribute(&mut self, name: &str) -> usize {
        if let Some(index) = self.attributes.get(name) {
            return *index;
        }

        let mut column = name.to_string();
        let mut suffix = 0;
        while self.taken.contains(&column) {
            suffix += 1;
            column = format!("{name}_{suffix}");
        }

        let index = self.columns.len();
        self.taken.insert(column.clone());
        self.columns.push(column);
        self.attributes.insert(name.to_string(), index);
        index
    }

    /// Column index of an already registered attribute
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.get(name).copied()
    }

    /// Column names in output order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`; the fixed columns are always present
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
