//! Parses a `<condition>` element's text, `(op,operand)`, into a
//! [`Condition`]. Grounded on `XCSP3Constraint.h`'s `XCondition`
//! reader, which accepts the same operator keywords
//! (`lt`/`le`/`ge`/`gt`/`eq`/`ne`/`in`) and either a literal integer,
//! an interval `min,max` (only meaningful with `in`), or a variable
//! identifier as the right-hand operand.

use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::{Condition, NameInterner, Operand, OrderType};

fn syntax_error(text: &str) -> ParseError {
    ParseError::CompactSyntaxError {
        position: 0,
        fragment: text.to_string(),
    }
}

fn order_of(token: &str) -> Option<OrderType> {
    Some(match token {
        "lt" => OrderType::Lt,
        "le" => OrderType::Le,
        "ge" => OrderType::Ge,
        "gt" => OrderType::Gt,
        "eq" => OrderType::Eq,
        "ne" => OrderType::Ne,
        "in" => OrderType::In,
        _ => return None,
    })
}

/// Parses `"(op,operand)"`, interning any variable-shaped operand
/// (including group/slide placeholders, which are ordinary names at
/// this stage) against `names`.
pub fn parse_condition(names: &mut NameInterner, text: &str) -> Result<Condition> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| syntax_error(trimmed))?;
    let mut parts = inner.splitn(2, ',');
    let op_token = parts.next().ok_or_else(|| syntax_error(trimmed))?.trim();
    let operand_text = parts.next().ok_or_else(|| syntax_error(trimmed))?.trim();
    let order = order_of(op_token).ok_or_else(|| syntax_error(trimmed))?;

    let operand = if order == OrderType::In {
        parse_interval_operand(operand_text).ok_or_else(|| syntax_error(trimmed))?
    } else {
        parse_scalar_operand(names, operand_text)
    };
    Ok(Condition { order, operand })
}

fn parse_interval_operand(text: &str) -> Option<Operand> {
    let (lo, hi) = text.split_once(',')?;
    let min: i64 = lo.trim().parse().ok()?;
    let max: i64 = hi.trim().parse().ok()?;
    Some(Operand::Interval { min, max })
}

fn parse_scalar_operand(names: &mut NameInterner, text: &str) -> Operand {
    match text.parse::<i64>() {
        Ok(v) => Operand::Integer(v),
        Err(_) => Operand::Variable(names.intern(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_equality_against_constant() {
        let mut names = NameInterner::new();
        let condition = parse_condition(&mut names, "(eq,1)").unwrap();
        assert_eq!(condition.order, OrderType::Eq);
        assert!(matches!(condition.operand, Operand::Integer(1)));
    }

    #[test]
    fn parses_in_interval() {
        let mut names = NameInterner::new();
        let condition = parse_condition(&mut names, "(in,1,4)").unwrap();
        assert_eq!(condition.order, OrderType::In);
        assert!(matches!(condition.operand, Operand::Interval { min: 1, max: 4 }));
    }

    #[test]
    fn parses_variable_operand() {
        let mut names = NameInterner::new();
        let condition = parse_condition(&mut names, "(ne,y)").unwrap();
        assert!(matches!(condition.operand, Operand::Variable(_)));
    }
}
