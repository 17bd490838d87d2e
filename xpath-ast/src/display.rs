//! Source rendering with normalized whitespace

use crate::expression::{
    Expr, ExprNode, LocationPath, NodeTest, SequenceTypeElement, Step, StepKind,
};
use std::fmt;

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(lit) => write!(f, "{}", lit.text),
            Expr::Literal(lit) => write!(f, "{}", lit.raw),
            Expr::Binary { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Negation { operand } => write!(f, "-{}", operand),
            Expr::Parenthesized { inner } => write!(f, "({})", inner),
            Expr::Filter {
                primary,
                predicates,
            } => {
                write!(f, "{}", primary)?;
                for predicate in predicates {
                    write!(f, "[{}]", predicate)?;
                }
                Ok(())
            }
            Expr::FunctionCall { name, arguments } => {
                write!(f, "{}(", name)?;
                write_comma_separated(f, arguments)?;
                write!(f, ")")
            }
            Expr::Path(path) => write!(f, "{}", path),
            Expr::VariableReference { name } => write!(f, "${}", name),
            Expr::For { bindings, body } => {
                write!(f, "for ")?;
                write_bindings(f, bindings)?;
                write!(f, " return {}", body)
            }
            Expr::Quantified {
                quantifier,
                bindings,
                test,
            } => {
                write!(f, "{} ", quantifier.keyword())?;
                write_bindings(f, bindings)?;
                write!(f, " satisfies {}", test)
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => write!(
                f,
                "if ({}) then {} else {}",
                condition, then_branch, else_branch
            ),
            Expr::Range { from, to } => write!(f, "{} to {}", from, to),
            Expr::Sequence { items } => {
                if items.is_empty() {
                    write!(f, "()")
                } else {
                    write_comma_separated(f, items)
                }
            }
            Expr::TypeExpr {
                op,
                operand,
                target,
            } => write!(f, "{} {} {}", operand, op.keywords(), target),
            Expr::Error { .. } => Ok(()),
        }
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, items: &[ExprNode]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_bindings(
    f: &mut fmt::Formatter<'_>,
    bindings: &[crate::expression::Binding],
) -> fmt::Result {
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "${} in {}", binding.name, binding.sequence)?;
    }
    Ok(())
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute && !self.steps.first().is_some_and(|s| s.double_slash) {
            write!(f, "/")?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            if step.double_slash {
                write!(f, "//")?;
            } else if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StepKind::Axis {
                specifier, test, ..
            } => {
                if specifier.explicit {
                    write!(f, "{}::", specifier.axis)?;
                } else if specifier.axis == crate::axis::Axis::Attribute {
                    write!(f, "@")?;
                }
                write!(f, "{}", test)?;
            }
            StepKind::Current => write!(f, ".")?,
            StepKind::Parent => write!(f, "..")?,
            StepKind::Primary(primary) => write!(f, "{}", primary)?,
        }
        for predicate in &self.predicates {
            write!(f, "[{}]", predicate)?;
        }
        Ok(())
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Name(name) => write!(f, "{}", name),
            NodeTest::NodeType { kind, literal } => {
                write!(f, "{}(", kind.name())?;
                if let Some(literal) = literal {
                    write!(f, "{}", literal.raw)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for SequenceTypeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(cardinality) = self.cardinality {
            write!(f, "{}", cardinality.indicator())?;
        }
        Ok(())
    }
}
