//! Filter tree definitions.
//!
//! A [`FilterNode`] tree is built once per filter-resolution call, serialized
//! to engine XML immediately, and then discarded.

/// A node in a resolved filter tree.
///
/// ## Notes
/// - Leaf values are never empty.
/// - `regex: true` leaves carry text that is already regex-escaped when the
///   leaf was built from a contains-operator on literal input; the XML
///   emitter only applies entity escaping on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    /// `<cat>` — category match.
    Category { value: String, regex: bool },
    /// `<prop name='…'>` — named property match.
    Property {
        name: String,
        value: String,
        regex: bool,
    },
    /// `<name>` — display-name match.
    Name { value: String, regex: bool },
    /// `<test>` — full-name match.
    FullName { value: String, regex: bool },
}

impl FilterNode {
    /// Build a disjunction of full-name equality leaves, the shape produced
    /// for "run these N selected tests".
    ///
    /// Returns `None` for an empty name list.
    pub fn full_name_list<I, S>(names: I) -> Option<FilterNode>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut leaves: Vec<FilterNode> = names
            .into_iter()
            .map(|n| FilterNode::FullName {
                value: n.into(),
                regex: false,
            })
            .collect();
        match leaves.len() {
            0 => None,
            1 => leaves.pop(),
            _ => Some(FilterNode::Or(leaves)),
        }
    }

    /// Return `true` if the tree selects by name anywhere (a `Name` or
    /// `FullName` leaf). A tree without name clauses is a bare
    /// category/property filter, which is what the explicit-run policy
    /// combines with the exclude-explicit sub-filter.
    pub fn has_name_clause(&self) -> bool {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().any(FilterNode::has_name_clause)
            }
            FilterNode::Not(child) => child.has_name_clause(),
            FilterNode::Name { .. } | FilterNode::FullName { .. } => true,
            FilterNode::Category { .. } | FilterNode::Property { .. } => false,
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().map(FilterNode::leaf_count).sum()
            }
            FilterNode::Not(child) => child.leaf_count(),
            _ => 1,
        }
    }
}
