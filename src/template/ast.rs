use std::fmt;

/// Direct element fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Id,
    Name,
    Tag,
    Type,
}

impl Keyword {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "id" => Some(Keyword::Id),
            "name" => Some(Keyword::Name),
            "tag" => Some(Keyword::Tag),
            "type" => Some(Keyword::Type),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKey {
    Step,
    Length,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Keyword(Keyword),
    Attribute(String),
    Path(PathKey),
    /// Edge templates only: selector applied to the edge's source node.
    Source(Box<Selector>),
    Target(Box<Selector>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    Compare {
        selector: Selector,
        operator: ComparisonOperator,
        literal: String,
    },
    Exists(Selector),
    NotExists(Selector),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Replacement {
    Selector(Selector),
    Literal(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(Selector),
    Conditional {
        condition: Condition,
        replacement: Vec<Replacement>,
    },
}
