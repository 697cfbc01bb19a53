use crate::common::{Document, Value};
use crate::filter::{CompareOp, LogicalOp};

/// One node of a parsed filter expression.
///
/// A node is either a property clause carrying the operator map written for
/// that property, or a logical composer carrying its nested filter groups.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// A property name with its comparison operators, in wire order.
    Property {
        name: String,
        ops: Vec<(CompareOp, Value)>,
    },
    /// A logical composer over nested filter groups.
    Logical {
        op: LogicalOp,
        groups: Vec<FilterGroup>,
    },
}

/// One nesting level of a filter expression.
///
/// Holds the level's entries in wire order. At most one logical composer is
/// honored per level; parsing keeps the last one written and warns about
/// the overwrite. Property clauses and a composer may coexist at the same
/// level and combine conjunctively after translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    exprs: Vec<FilterExpr>,
}

impl FilterGroup {
    /// Creates an empty group, which translates to criteria matching every
    /// document.
    pub fn new() -> FilterGroup {
        FilterGroup { exprs: Vec::new() }
    }

    /// Creates a group from already-built nodes.
    ///
    /// Mostly useful in tests and for callers that assemble filters
    /// programmatically instead of parsing them off the wire.
    pub fn from_exprs(exprs: Vec<FilterExpr>) -> FilterGroup {
        FilterGroup { exprs }
    }

    /// Parses a wire filter document into a group.
    ///
    /// The parse never fails. Malformed or unrecognized input degrades with
    /// a warning instead of an error:
    ///
    /// - an operator token outside the supported set is dropped;
    /// - a property whose value is not an operator map is dropped;
    /// - a composer whose value is not a sequence is dropped;
    /// - a composer member that is not a document is dropped;
    /// - a second composer at the same level replaces the first.
    pub fn parse(filters: &Document) -> FilterGroup {
        let mut exprs: Vec<FilterExpr> = Vec::new();

        for (key, value) in filters.iter() {
            if let Some(op) = LogicalOp::from_token(key) {
                let members = match value.as_array() {
                    Some(members) => members,
                    None => {
                        log::warn!(
                            "Dropping composer [{}]: value is not a sequence of filters",
                            key
                        );
                        continue;
                    }
                };

                let mut groups = Vec::with_capacity(members.len());
                for member in members {
                    match member.as_document() {
                        Some(doc) => groups.push(FilterGroup::parse(doc)),
                        None => {
                            log::warn!(
                                "Dropping non-document member of composer [{}]: {}",
                                key,
                                member
                            );
                        }
                    }
                }

                // only one composer is honored per level
                if let Some(pos) = exprs
                    .iter()
                    .position(|e| matches!(e, FilterExpr::Logical { .. }))
                {
                    if let FilterExpr::Logical { op: prior, .. } = &exprs[pos] {
                        log::warn!(
                            "Composer [{}] overwrites composer [{}] at the same filter level",
                            op.token(),
                            prior.token()
                        );
                    }
                    exprs.remove(pos);
                }
                exprs.push(FilterExpr::Logical { op, groups });
            } else {
                let operator_map = match value.as_document() {
                    Some(map) => map,
                    None => {
                        log::warn!(
                            "Dropping filter for property [{}]: value is not an operator map",
                            key
                        );
                        continue;
                    }
                };

                let mut ops = Vec::with_capacity(operator_map.len());
                for (token, operand) in operator_map.iter() {
                    match CompareOp::from_token(token) {
                        Some(op) => ops.push((op, operand.clone())),
                        None => {
                            log::warn!(
                                "Dropping unrecognized filter operator [{}] for property [{}]",
                                token,
                                key
                            );
                        }
                    }
                }
                exprs.push(FilterExpr::Property {
                    name: key.clone(),
                    ops,
                });
            }
        }

        FilterGroup { exprs }
    }

    /// The nodes of this level, in wire order.
    pub fn exprs(&self) -> &[FilterExpr] {
        &self.exprs
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_parse_empty() {
        let group = FilterGroup::parse(&doc! {});
        assert!(group.is_empty());
    }

    #[test]
    fn test_parse_single_property() {
        let filters = doc! { "age": doc! { "GT": 18i64 } };
        let group = FilterGroup::parse(&filters);
        assert_eq!(group.exprs().len(), 1);
        match &group.exprs()[0] {
            FilterExpr::Property { name, ops } => {
                assert_eq!(name, "age");
                assert_eq!(ops, &vec![(CompareOp::Gt, Value::I64(18))]);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_parse_multiple_operators_preserve_order() {
        let filters = doc! { "age": doc! { "GTE": 18i64, "LT": 65i64 } };
        let group = FilterGroup::parse(&filters);
        match &group.exprs()[0] {
            FilterExpr::Property { ops, .. } => {
                assert_eq!(ops[0].0, CompareOp::Gte);
                assert_eq!(ops[1].0, CompareOp::Lt);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_parse_drops_unrecognized_operator() {
        let filters = doc! { "name": doc! { "NOT_LIKE": "bob", "EQ": "alice" } };
        let group = FilterGroup::parse(&filters);
        match &group.exprs()[0] {
            FilterExpr::Property { ops, .. } => {
                assert_eq!(ops, &vec![(CompareOp::Eq, Value::String("alice".to_string()))]);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_parse_drops_non_map_property_value() {
        let filters = doc! { "age": 18i64 };
        let group = FilterGroup::parse(&filters);
        assert!(group.is_empty());
    }

    #[test]
    fn test_parse_composer() {
        let filters = doc! {
            "AND": vec![
                Value::Document(doc! { "age": doc! { "GT": 18i64 } }),
                Value::Document(doc! { "age": doc! { "LT": 65i64 } }),
            ],
        };
        let group = FilterGroup::parse(&filters);
        assert_eq!(group.exprs().len(), 1);
        match &group.exprs()[0] {
            FilterExpr::Logical { op, groups } => {
                assert_eq!(*op, LogicalOp::And);
                assert_eq!(groups.len(), 2);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_parse_second_composer_overwrites_first() {
        let filters = doc! {
            "AND": vec![Value::Document(doc! { "a": doc! { "EQ": 1i64 } })],
            "OR": vec![Value::Document(doc! { "b": doc! { "EQ": 2i64 } })],
        };
        let group = FilterGroup::parse(&filters);
        let logicals: Vec<_> = group
            .exprs()
            .iter()
            .filter(|e| matches!(e, FilterExpr::Logical { .. }))
            .collect();
        assert_eq!(logicals.len(), 1);
        match logicals[0] {
            FilterExpr::Logical { op, .. } => assert_eq!(*op, LogicalOp::Or),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_parse_drops_non_sequence_composer_value() {
        let filters = doc! { "AND": doc! { "age": doc! { "GT": 1i64 } } };
        let group = FilterGroup::parse(&filters);
        assert!(group.is_empty());
    }

    #[test]
    fn test_parse_drops_non_document_composer_member() {
        let filters = doc! {
            "OR": vec![
                Value::I64(42),
                Value::Document(doc! { "a": doc! { "EQ": 1i64 } }),
            ],
        };
        let group = FilterGroup::parse(&filters);
        match &group.exprs()[0] {
            FilterExpr::Logical { groups, .. } => assert_eq!(groups.len(), 1),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_parse_composer_and_property_coexist() {
        let filters = doc! {
            "status": doc! { "EQ": "active" },
            "OR": vec![
                Value::Document(doc! { "age": doc! { "LT": 18i64 } }),
                Value::Document(doc! { "age": doc! { "GT": 65i64 } }),
            ],
        };
        let group = FilterGroup::parse(&filters);
        assert_eq!(group.exprs().len(), 2);
    }

    #[test]
    fn test_parse_nested_composers() {
        let filters = doc! {
            "AND": vec![Value::Document(doc! {
                "OR": vec![
                    Value::Document(doc! { "a": doc! { "EQ": 1i64 } }),
                    Value::Document(doc! { "b": doc! { "EQ": 2i64 } }),
                ],
            })],
        };
        let group = FilterGroup::parse(&filters);
        match &group.exprs()[0] {
            FilterExpr::Logical { op, groups } => {
                assert_eq!(*op, LogicalOp::And);
                match &groups[0].exprs()[0] {
                    FilterExpr::Logical { op, groups } => {
                        assert_eq!(*op, LogicalOp::Or);
                        assert_eq!(groups.len(), 2);
                    }
                    other => panic!("unexpected node {:?}", other),
                }
            }
            other => panic!("unexpected node {:?}", other),
        }
    }
}
