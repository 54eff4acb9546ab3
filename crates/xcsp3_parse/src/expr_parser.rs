//! Prefix-notation expression parsing (§4.2.1): turns `op(arg1,arg2)`
//! text, or a bare constant/variable/parameter token, into an
//! [`ExprId`] tree. Grounded on `XCSP3TreeNode.cc`'s hand-rolled
//! recursive-descent reader over the same prefix syntax, rewritten
//! here as a tokenise-then-parse pair instead of parsing character by
//! character, matching the teacher workspace's own lexer/parser split.

use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::{placeholder_index, ExprArena, ExprId, ExprKind, NameInterner};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'(' => {
                out.push(Token::LParen);
                i += 1;
            }
            b')' => {
                out.push(Token::RParen);
                i += 1;
            }
            b'{' => {
                out.push(Token::LBrace);
                i += 1;
            }
            b'}' => {
                out.push(Token::RBrace);
                i += 1;
            }
            b',' => {
                out.push(Token::Comma);
                i += 1;
            }
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r' | b'(' | b')' | b'{' | b'}' | b',') {
                    i += 1;
                }
                out.push(Token::Ident(&text[start..i]));
            }
        }
    }
    out
}

struct Parser<'a, 'arena> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    arena: &'arena mut ExprArena,
    names: &'arena mut NameInterner,
    source: &'a str,
}

/// Parses `text` as a prefix-notation expression, interning any
/// variable references against `names` and inserting nodes into
/// `arena`.
pub fn parse_expr(arena: &mut ExprArena, names: &mut NameInterner, text: &str) -> Result<ExprId> {
    let tokens = tokenize(text);
    let mut parser = Parser {
        tokens,
        pos: 0,
        arena,
        names,
        source: text,
    };
    let id = parser.parse_one()?;
    if parser.pos != parser.tokens.len() {
        return Err(syntax_error(text));
    }
    Ok(id)
}

fn syntax_error(fragment: &str) -> ParseError {
    ParseError::ExpressionSyntaxError {
        message: fragment.to_string(),
    }
}

impl<'a, 'arena> Parser<'a, 'arena> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: &Token<'a>) -> Result<()> {
        match self.bump() {
            Some(tok) if &tok == expected => Ok(()),
            _ => Err(syntax_error(self.source)),
        }
    }

    fn parse_one(&mut self) -> Result<ExprId> {
        match self.bump() {
            Some(Token::LBrace) => self.parse_set_braces(),
            Some(Token::Ident(word)) => self.parse_after_ident(word),
            _ => Err(syntax_error(self.source)),
        }
    }

    fn parse_set_braces(&mut self) -> Result<ExprId> {
        let mut children = Vec::new();
        if self.peek() != Some(&Token::RBrace) {
            loop {
                children.push(self.parse_one()?);
                match self.peek() {
                    Some(Token::Comma) => {
                        self.bump();
                    }
                    _ => break,
                }
            }
        }
        self.expect(&Token::RBrace)?;
        let list = self.arena.push_list(&children);
        Ok(self.arena.insert(ExprKind::Set(list)))
    }

    fn parse_after_ident(&mut self, word: &str) -> Result<ExprId> {
        if self.peek() == Some(&Token::LParen) {
            self.bump();
            let mut args = Vec::new();
            if self.peek() != Some(&Token::RParen) {
                loop {
                    args.push(self.parse_one()?);
                    match self.peek() {
                        Some(Token::Comma) => {
                            self.bump();
                        }
                        _ => break,
                    }
                }
            }
            self.expect(&Token::RParen)?;
            return build_operator(self.arena, word, &args);
        }
        leaf(self.arena, self.names, word)
    }
}

fn leaf(arena: &mut ExprArena, names: &mut NameInterner, word: &str) -> Result<ExprId> {
    if let Some(index) = placeholder_index(word) {
        return Ok(arena.insert(ExprKind::Param(index)));
    }
    if let Ok(v) = word.parse::<i64>() {
        return Ok(arena.insert(ExprKind::Long(v)));
    }
    if let Some(dot) = word.find('.') {
        if let (Ok(integral), Ok(fraction)) = (word[..dot].parse::<i64>(), word[dot + 1..].parse::<i64>()) {
            return Ok(arena.insert(ExprKind::Decimal(integral, fraction)));
        }
    }
    Ok(arena.insert(ExprKind::Var(names.intern(word))))
}

macro_rules! unary {
    ($arena:expr, $args:expr, $variant:ident) => {{
        let [a] = require::<1>($args)?;
        Ok($arena.insert(ExprKind::$variant(a)))
    }};
}

macro_rules! binary {
    ($arena:expr, $args:expr, $variant:ident) => {{
        let [a, b] = require::<2>($args)?;
        Ok($arena.insert(ExprKind::$variant(a, b)))
    }};
}

fn require<const N: usize>(args: &[ExprId]) -> Result<[ExprId; N]> {
    <[ExprId; N]>::try_from(args).map_err(|_| ParseError::ExpressionSyntaxError {
        message: format!("expected {N} argument(s), found {}", args.len()),
    })
}

fn build_operator(arena: &mut ExprArena, op: &str, args: &[ExprId]) -> Result<ExprId> {
    match op {
        "neg" => unary!(arena, args, Neg),
        "abs" => unary!(arena, args, Abs),
        "sqr" => unary!(arena, args, Sqr),
        "not" => unary!(arena, args, Not),
        "sqrt" => unary!(arena, args, Sqrt),
        "exp" => unary!(arena, args, Exp),
        "ln" => unary!(arena, args, Ln),
        "sin" => unary!(arena, args, Sin),
        "cos" => unary!(arena, args, Cos),
        "tan" => unary!(arena, args, Tan),
        "asin" => unary!(arena, args, Asin),
        "acos" => unary!(arena, args, Acos),
        "atan" => unary!(arena, args, Atan),
        "sinh" => unary!(arena, args, Sinh),
        "cosh" => unary!(arena, args, Cosh),
        "tanh" => unary!(arena, args, Tanh),
        "card" => unary!(arena, args, Card),
        "hull" => unary!(arena, args, Hull),
        "convex" => unary!(arena, args, Convex),

        "lt" => binary!(arena, args, Lt),
        "le" => binary!(arena, args, Le),
        "ge" => binary!(arena, args, Ge),
        "gt" => binary!(arena, args, Gt),
        "sub" => binary!(arena, args, Sub),
        "div" => binary!(arena, args, Div),
        "mod" => binary!(arena, args, Mod),
        "pow" => binary!(arena, args, Pow),
        "dist" => binary!(arena, args, Dist),
        "fdiv" => binary!(arena, args, FDiv),
        "fmod" => binary!(arena, args, FMod),
        "nroot" => binary!(arena, args, NRoot),
        "log" => binary!(arena, args, Log),
        "imp" => binary!(arena, args, Imp),
        "in" => binary!(arena, args, In),
        "notin" => binary!(arena, args, NotIn),
        "subset" => binary!(arena, args, Subset),
        "subseq" => binary!(arena, args, Subseq),
        "supseq" => binary!(arena, args, Supseq),
        "supset" => binary!(arena, args, Supset),
        "diff" => binary!(arena, args, Diff),
        "sdiff" => binary!(arena, args, Sdiff),

        "if" | "ite" => {
            let [a, b, c] = require::<3>(args)?;
            Ok(arena.insert(ExprKind::If(a, b, c)))
        }

        "add" => Ok(arena.insert(ExprKind::Add(arena_list(arena, args)))),
        "mul" => Ok(arena.insert(ExprKind::Mul(arena_list(arena, args)))),
        "min" => Ok(arena.insert(ExprKind::Min(arena_list(arena, args)))),
        "max" => Ok(arena.insert(ExprKind::Max(arena_list(arena, args)))),
        "eq" => Ok(arena.insert(ExprKind::Eq(arena_list(arena, args)))),
        "ne" => Ok(arena.insert(ExprKind::Ne(arena_list(arena, args)))),
        "and" => Ok(arena.insert(ExprKind::And(arena_list(arena, args)))),
        "or" => Ok(arena.insert(ExprKind::Or(arena_list(arena, args)))),
        "xor" => Ok(arena.insert(ExprKind::Xor(arena_list(arena, args)))),
        "iff" => Ok(arena.insert(ExprKind::Iff(arena_list(arena, args)))),
        "set" => Ok(arena.insert(ExprKind::Set(arena_list(arena, args)))),
        "union" => Ok(arena.insert(ExprKind::Union(arena_list(arena, args)))),
        "inter" => Ok(arena.insert(ExprKind::Inter(arena_list(arena, args)))),
        "djoint" => Ok(arena.insert(ExprKind::Djoint(arena_list(arena, args)))),

        other => Err(ParseError::ExpressionSyntaxError {
            message: format!("unknown operator '{other}'"),
        }),
    }
}

fn arena_list(arena: &mut ExprArena, args: &[ExprId]) -> xcsp3_ir::ExprListId {
    arena.push_list(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_arithmetic_expression() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let id = parse_expr(&mut arena, &mut names, "eq(add(x,1),y)").unwrap();
        assert!(matches!(arena.get(id), ExprKind::Eq(_)));
    }

    #[test]
    fn parses_bare_variable_leaf() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let id = parse_expr(&mut arena, &mut names, "x").unwrap();
        assert_eq!(arena.get(id), ExprKind::Var(names.intern("x")));
    }

    #[test]
    fn parses_parameter_placeholder() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let id = parse_expr(&mut arena, &mut names, "%2").unwrap();
        assert_eq!(arena.get(id), ExprKind::Param(2));
    }

    #[test]
    fn rejects_wrong_arity() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        assert!(parse_expr(&mut arena, &mut names, "not(x,y)").is_err());
    }
}
