/// Comparison operators accepted in a filter expression.
///
/// Each operator has a wire token (the key callers write in a filter's
/// operator map) and a criteria key (the backend-native operator it
/// translates to).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equals.
    Eq,
    /// Not equals.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equals.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equals.
    Lte,
    /// Pattern match against a regular expression.
    Like,
    /// Membership in a set of values.
    In,
    /// Exclusion from a set of values.
    NotIn,
}

impl CompareOp {
    /// Parses a wire token into an operator.
    ///
    /// Returns `None` for tokens outside the supported set; the caller
    /// decides whether to drop or reject them.
    pub fn from_token(token: &str) -> Option<CompareOp> {
        match token {
            "EQ" => Some(CompareOp::Eq),
            "NE" => Some(CompareOp::Ne),
            "GT" => Some(CompareOp::Gt),
            "GTE" => Some(CompareOp::Gte),
            "LT" => Some(CompareOp::Lt),
            "LTE" => Some(CompareOp::Lte),
            "LIKE" => Some(CompareOp::Like),
            "IN" => Some(CompareOp::In),
            "NOT_IN" => Some(CompareOp::NotIn),
            _ => None,
        }
    }

    /// The wire token of this operator.
    pub fn token(&self) -> &'static str {
        match self {
            CompareOp::Eq => "EQ",
            CompareOp::Ne => "NE",
            CompareOp::Gt => "GT",
            CompareOp::Gte => "GTE",
            CompareOp::Lt => "LT",
            CompareOp::Lte => "LTE",
            CompareOp::Like => "LIKE",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT_IN",
        }
    }

    /// The backend-native criteria key this operator translates to.
    pub fn criteria_key(&self) -> &'static str {
        match self {
            CompareOp::Eq => "$eq",
            CompareOp::Ne => "$ne",
            CompareOp::Gt => "$gt",
            CompareOp::Gte => "$gte",
            CompareOp::Lt => "$lt",
            CompareOp::Lte => "$lte",
            CompareOp::Like => "$regex",
            CompareOp::In => "$in",
            CompareOp::NotIn => "$nin",
        }
    }
}

/// Logical composers accepted at any level of a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// All sub-filters must match.
    And,
    /// At least one sub-filter must match.
    Or,
    /// No sub-filter may match.
    Nor,
}

impl LogicalOp {
    /// Parses a wire token into a logical composer.
    pub fn from_token(token: &str) -> Option<LogicalOp> {
        match token {
            "AND" => Some(LogicalOp::And),
            "OR" => Some(LogicalOp::Or),
            "NOR" => Some(LogicalOp::Nor),
            _ => None,
        }
    }

    /// The wire token of this composer.
    pub fn token(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Nor => "NOR",
        }
    }

    /// The backend-native criteria key this composer translates to.
    pub fn criteria_key(&self) -> &'static str {
        match self {
            LogicalOp::And => "$and",
            LogicalOp::Or => "$or",
            LogicalOp::Nor => "$nor",
        }
    }
}
