//! Recursive-descent parser producing the Coal AST.
//!
//! The grammar follows the language's surface syntax: `let` declarations,
//! keyword-selector calls in square brackets, `def`/`type` definitions
//! closed by `end`, the three loop forms, and `if`/`elif`/`else`
//! conditionals. Parse failures surface as `SyntaxError`s with
//! `[line:column]` positions.

use crate::{
    ast::{AssignMode, BinOp, Expr, FuncDecl, InitDecl, Stmt},
    error::{CoalError, Pos, RunResult},
    lexer::{tokenize, SpannedToken, Token},
};

/// Parses a whole source text into a statement list.
pub fn parse(source: &str) -> RunResult<Vec<Stmt>> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_program(mut self) -> RunResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while self.peek().is_some() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    // ---- token plumbing ----

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    fn here(&self) -> Pos {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(Pos { line: 1, column: 1 }, |t| t.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|t| t.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self) -> CoalError {
        match self.tokens.get(self.pos) {
            Some(t) => CoalError::syntax(format!("Unexpected token {}", t.token.describe())).at(t.pos),
            None => CoalError::syntax("Unexpected end of input").at(self.here()),
        }
    }

    fn expect(&mut self, expected: &Token) -> RunResult<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_name(&mut self) -> RunResult<String> {
        match self.peek() {
            Some(Token::Name(_)) => {
                let Some(Token::Name(name)) = self.advance() else { unreachable!() };
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn expect_type_name(&mut self) -> RunResult<String> {
        match self.peek() {
            Some(Token::TypeName(_)) => {
                let Some(Token::TypeName(name)) = self.advance() else { unreachable!() };
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    // ---- statements ----

    fn parse_stmt(&mut self) -> RunResult<Stmt> {
        match self.peek() {
            Some(Token::KwLet) => self.parse_let(),
            Some(Token::KwDef) => self.parse_def(),
            Some(Token::KwReturn) => {
                self.advance();
                let value = if self.at_value_start() { Some(self.parse_expr()?) } else { None };
                Ok(Stmt::FuncRet(value))
            }
            Some(Token::KwType) => self.parse_type_def(),
            Some(Token::KwIf) => self.parse_if(),
            Some(Token::KwFor) => self.parse_for(),
            Some(Token::KwEach) => self.parse_each(),
            Some(Token::KwWhile) => self.parse_while(),
            Some(Token::KwBreak) => {
                self.advance();
                Ok(Stmt::FlowBreak)
            }
            Some(Token::KwNext) => {
                self.advance();
                Ok(Stmt::FlowNext)
            }
            Some(Token::KwImport) => self.parse_import(),
            Some(Token::KwExit) => {
                self.advance();
                let value = if self.at_value_start() { Some(self.parse_expr()?) } else { None };
                Ok(Stmt::Exit(value))
            }
            Some(Token::LBracket) => {
                let call = self.parse_bracket_call()?;
                Ok(into_call_stmt(call))
            }
            Some(Token::Name(_)) => self.parse_assignment(),
            _ => Err(self.unexpected()),
        }
    }

    /// Whether the next token can start a value expression.
    fn at_value_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Int(_)
                    | Token::Float(_)
                    | Token::Str(_)
                    | Token::KwTrue
                    | Token::KwFalse
                    | Token::Name(_)
                    | Token::LParen
                    | Token::LBracket
                    | Token::Minus
            )
        )
    }

    fn parse_let(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwLet)?;
        let name = self.expect_name()?;
        self.expect(&Token::Colon)?;
        let ty = self.expect_type_name()?;
        match self.peek() {
            Some(Token::Question) => {
                self.advance();
                Ok(Stmt::NameDefEmpty { name, ty })
            }
            Some(Token::Eq) => {
                self.advance();
                let value = self.parse_expr()?;
                Ok(Stmt::NameDef { name, ty, value })
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_assignment(&mut self) -> RunResult<Stmt> {
        let name = self.expect_name()?;
        match self.peek() {
            Some(Token::LBrace) => {
                self.advance();
                let index = self.parse_expr()?;
                self.expect(&Token::RBrace)?;
                self.expect(&Token::Eq)?;
                let value = self.parse_expr()?;
                Ok(Stmt::IterableItemAssign { name, index, value })
            }
            Some(
                Token::Eq | Token::PlusEq | Token::MinusEq | Token::StarEq | Token::SlashEq,
            ) => {
                let mode = match self.advance() {
                    Some(Token::Eq) => AssignMode::Set,
                    Some(Token::PlusEq) => AssignMode::Add,
                    Some(Token::MinusEq) => AssignMode::Sub,
                    Some(Token::StarEq) => AssignMode::Mul,
                    Some(Token::SlashEq) => AssignMode::Div,
                    _ => unreachable!("matched above"),
                };
                let value = self.parse_expr()?;
                Ok(Stmt::NameAssign { name, mode, value })
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_import(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwImport)?;
        let name = self.expect_name()?;
        let alias = if self.peek() == Some(&Token::KwAs) {
            self.advance();
            Some(self.expect_name()?)
        } else {
            None
        };
        Ok(Stmt::Import { name, alias })
    }

    /// One argument definition: the keyword has been consumed, the cursor
    /// sits on its `:`. Accepts `sel: (Type)`, `sel: (Type alias)`, and
    /// the extended `sel: name: (Type)` form.
    ///
    /// Returns `(type, binding_alias)`.
    fn parse_argdef_tail(&mut self) -> RunResult<(String, Option<String>)> {
        self.expect(&Token::Colon)?;
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let ty = self.expect_type_name()?;
                let alias = if matches!(self.peek(), Some(Token::Name(_))) {
                    Some(self.expect_name()?)
                } else {
                    None
                };
                self.expect(&Token::RParen)?;
                Ok((ty, alias))
            }
            Some(Token::Name(_)) => {
                let param = self.expect_name()?;
                self.expect(&Token::Colon)?;
                self.expect(&Token::LParen)?;
                let ty = self.expect_type_name()?;
                let alias = if matches!(self.peek(), Some(Token::Name(_))) {
                    Some(self.expect_name()?)
                } else {
                    Some(param)
                };
                self.expect(&Token::RParen)?;
                Ok((ty, alias))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Whether the cursor sits on the keyword of another argument
    /// definition (`name :` ahead).
    fn at_argdef(&self) -> bool {
        matches!(self.peek(), Some(Token::Name(_))) && self.peek_at(1) == Some(&Token::Colon)
    }

    fn parse_def(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwDef)?;
        let first = self.expect_name()?;

        if self.peek() == Some(&Token::Arrow) {
            // Simple zero-argument form.
            self.advance();
            let return_type = self.expect_type_name()?;
            let suite = self.parse_suite_until(&[Token::KwEnd])?;
            self.expect(&Token::KwEnd)?;
            return Ok(Stmt::FuncDef(FuncDecl {
                selector: format!("{first}:"),
                param_names: vec![],
                param_types: vec![],
                param_aliases: vec![],
                return_type,
                suite,
                simple: true,
            }));
        }

        let mut param_names = vec![first];
        let mut param_types = Vec::new();
        let mut param_aliases = Vec::new();
        loop {
            let (ty, alias) = self.parse_argdef_tail()?;
            param_types.push(ty);
            param_aliases.push(alias);
            if self.at_argdef() {
                param_names.push(self.expect_name()?);
            } else {
                break;
            }
        }
        self.expect(&Token::Arrow)?;
        let return_type = self.expect_type_name()?;
        let suite = self.parse_suite_until(&[Token::KwEnd])?;
        self.expect(&Token::KwEnd)?;

        Ok(Stmt::FuncDef(FuncDecl {
            selector: crate::ast::selector_for(&param_names),
            param_names,
            param_types,
            param_aliases,
            return_type,
            suite,
            simple: false,
        }))
    }

    fn parse_type_def(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwType)?;
        let name = self.expect_type_name()?;
        self.expect(&Token::KwAs)?;
        let extends = self.expect_type_name()?;

        let mut inits = Vec::new();
        while self.peek() == Some(&Token::KwInit) {
            inits.push(self.parse_init()?);
        }
        self.expect(&Token::KwEnd)?;
        Ok(Stmt::TypeDef { name, extends, inits })
    }

    fn parse_init(&mut self) -> RunResult<InitDecl> {
        self.expect(&Token::KwInit)?;
        let mut param_names = vec![self.expect_name()?];
        let mut param_types = Vec::new();
        let mut param_aliases = Vec::new();
        loop {
            let (ty, alias) = self.parse_argdef_tail()?;
            param_types.push(ty);
            param_aliases.push(alias);
            if self.at_argdef() {
                param_names.push(self.expect_name()?);
            } else {
                break;
            }
        }
        let suite = self.parse_suite_until(&[Token::KwEnd])?;
        self.expect(&Token::KwEnd)?;

        Ok(InitDecl {
            selector: crate::ast::selector_for(&param_names),
            param_names,
            param_types,
            param_aliases,
            suite,
        })
    }

    fn parse_if(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwIf)?;
        let test = self.parse_expr()?;
        self.expect(&Token::KwDo)?;
        let suite = self.parse_suite_until(&[Token::KwElif, Token::KwElse, Token::KwEnd])?;

        let mut elif_blocks = Vec::new();
        while self.peek() == Some(&Token::KwElif) {
            self.advance();
            let elif_test = self.parse_expr()?;
            self.expect(&Token::KwDo)?;
            let elif_suite = self.parse_suite_until(&[Token::KwElif, Token::KwElse, Token::KwEnd])?;
            elif_blocks.push((elif_test, elif_suite));
        }

        let else_suite = if self.peek() == Some(&Token::KwElse) {
            self.advance();
            Some(self.parse_suite_until(&[Token::KwEnd])?)
        } else {
            None
        };
        self.expect(&Token::KwEnd)?;

        Ok(Stmt::If {
            test,
            suite,
            elif_blocks,
            else_suite,
        })
    }

    fn parse_for(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwFor)?;
        let start = self.parse_expr()?;
        self.expect(&Token::Comma)?;
        let end = self.parse_expr()?;
        let interval = if self.peek() == Some(&Token::Comma) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&Token::KwAs)?;
        let name = self.expect_name()?;
        let suite = self.parse_suite_until(&[Token::KwEnd])?;
        self.expect(&Token::KwEnd)?;
        Ok(Stmt::For {
            start,
            end,
            interval,
            name,
            suite,
        })
    }

    fn parse_each(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwEach)?;
        let iterable = self.parse_expr()?;
        self.expect(&Token::KwAs)?;
        let name = self.expect_name()?;
        let suite = self.parse_suite_until(&[Token::KwEnd])?;
        self.expect(&Token::KwEnd)?;
        Ok(Stmt::Each { iterable, name, suite })
    }

    fn parse_while(&mut self) -> RunResult<Stmt> {
        self.expect(&Token::KwWhile)?;
        let test = self.parse_expr()?;
        self.expect(&Token::KwDo)?;
        let suite = self.parse_suite_until(&[Token::KwEnd])?;
        self.expect(&Token::KwEnd)?;
        Ok(Stmt::While { test, suite })
    }

    fn parse_suite_until(&mut self, terminators: &[Token]) -> RunResult<Vec<Stmt>> {
        let mut suite = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.unexpected()),
                Some(token) if terminators.contains(token) => return Ok(suite),
                Some(_) => suite.push(self.parse_stmt()?),
            }
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> RunResult<Expr> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> RunResult<Expr> {
        let mut lhs = self.parse_bitor()?;
        while let Some(op) = match self.peek() {
            Some(Token::EqEq) => Some(BinOp::Eq),
            Some(Token::NotEq) => Some(BinOp::NotEq),
            Some(Token::Lt) => Some(BinOp::Lt),
            Some(Token::Gt) => Some(BinOp::Gt),
            Some(Token::Le) => Some(BinOp::Le),
            Some(Token::Ge) => Some(BinOp::Ge),
            _ => None,
        } {
            self.advance();
            let rhs = self.parse_bitor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_bitor(&mut self) -> RunResult<Expr> {
        let mut lhs = self.parse_bitxor()?;
        while self.peek() == Some(&Token::Pipe) {
            self.advance();
            let rhs = self.parse_bitxor()?;
            lhs = Expr::Binary {
                op: BinOp::BitOr,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_bitxor(&mut self) -> RunResult<Expr> {
        let mut lhs = self.parse_bitand()?;
        while self.peek() == Some(&Token::Caret) {
            self.advance();
            let rhs = self.parse_bitand()?;
            lhs = Expr::Binary {
                op: BinOp::BitXor,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_bitand(&mut self) -> RunResult<Expr> {
        let mut lhs = self.parse_shift()?;
        while self.peek() == Some(&Token::Amp) {
            self.advance();
            let rhs = self.parse_shift()?;
            lhs = Expr::Binary {
                op: BinOp::BitAnd,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_shift(&mut self) -> RunResult<Expr> {
        let mut lhs = self.parse_additive()?;
        while let Some(op) = match self.peek() {
            Some(Token::Shl) => Some(BinOp::Shl),
            Some(Token::Shr) => Some(BinOp::Shr),
            _ => None,
        } {
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> RunResult<Expr> {
        let mut lhs = self.parse_term()?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinOp::Add),
            Some(Token::Minus) => Some(BinOp::Sub),
            _ => None,
        } {
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> RunResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinOp::Mul),
            Some(Token::Slash) => Some(BinOp::Div),
            Some(Token::Percent) => Some(BinOp::Mod),
            _ => None,
        } {
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> RunResult<Expr> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(match operand {
                Expr::Int(i) => Expr::Int(-i),
                Expr::Float(f) => Expr::Float(-f),
                other => Expr::Binary {
                    op: BinOp::Sub,
                    lhs: Box::new(Expr::Int(0)),
                    rhs: Box::new(other),
                },
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> RunResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.peek() == Some(&Token::LBrace) {
            self.advance();
            let index = self.parse_expr()?;
            let end = if self.peek() == Some(&Token::Comma) {
                self.advance();
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.expect(&Token::RBrace)?;
            expr = Expr::ItemFromIterable {
                target: Box::new(expr),
                index: Box::new(index),
                end,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> RunResult<Expr> {
        match self.peek() {
            Some(Token::Int(_)) => {
                let Some(Token::Int(i)) = self.advance() else { unreachable!() };
                Ok(Expr::Int(i))
            }
            Some(Token::Float(_)) => {
                let Some(Token::Float(f)) = self.advance() else { unreachable!() };
                Ok(Expr::Float(f))
            }
            Some(Token::Str(_)) => {
                let Some(Token::Str(s)) = self.advance() else { unreachable!() };
                Ok(Expr::Str(s))
            }
            Some(Token::KwTrue) => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Some(Token::KwFalse) => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Some(Token::Name(_)) => {
                let name = self.expect_name()?;
                if name == "self" && self.peek() == Some(&Token::Dot) {
                    self.advance();
                    let attr = self.expect_name()?;
                    return Ok(Expr::NameFromSelf(attr));
                }
                Ok(Expr::Name(name))
            }
            Some(Token::LParen) => self.parse_paren(),
            Some(Token::LBracket) => self.parse_bracket_call(),
            _ => Err(self.unexpected()),
        }
    }

    /// `(...)`: empty list, grouped expression, or list literal. A single
    /// value without a comma is a group; a trailing comma forces a
    /// one-element list.
    fn parse_paren(&mut self) -> RunResult<Expr> {
        self.expect(&Token::LParen)?;
        if self.peek() == Some(&Token::RParen) {
            self.advance();
            return Ok(Expr::List(vec![]));
        }
        let first = self.parse_expr()?;
        if self.peek() != Some(&Token::Comma) {
            self.expect(&Token::RParen)?;
            return Ok(first);
        }
        let mut items = vec![first];
        while self.peek() == Some(&Token::Comma) {
            self.advance();
            if self.peek() == Some(&Token::RParen) {
                break;
            }
            items.push(self.parse_expr()?);
        }
        self.expect(&Token::RParen)?;
        Ok(Expr::List(items))
    }

    /// `[...]`: a local call, an object call, or a type call.
    fn parse_bracket_call(&mut self) -> RunResult<Expr> {
        self.expect(&Token::LBracket)?;

        if matches!(self.peek(), Some(Token::TypeName(_))) {
            let ty = self.expect_type_name()?;
            if self.peek() == Some(&Token::RBracket) {
                self.advance();
                return Ok(Expr::TypeCall {
                    ty,
                    selector: None,
                    args: vec![],
                });
            }
            let first = self.expect_name()?;
            let (selector, args) = self.parse_selector_args(first)?;
            self.expect(&Token::RBracket)?;
            return Ok(Expr::TypeCall {
                ty,
                selector: Some(selector),
                args,
            });
        }

        // `[name]` and `[name: ...]` are local calls; anything else is an
        // object call on a receiver value.
        if matches!(self.peek(), Some(Token::Name(_))) {
            match self.peek_at(1) {
                Some(Token::RBracket) => {
                    let name = self.expect_name()?;
                    self.advance();
                    return Ok(Expr::LocalCall {
                        selector: format!("{name}:"),
                        args: vec![],
                    });
                }
                Some(Token::Colon) => {
                    let name = self.expect_name()?;
                    let (selector, args) = self.parse_selector_args(name)?;
                    self.expect(&Token::RBracket)?;
                    return Ok(Expr::LocalCall { selector, args });
                }
                _ => {}
            }
        }

        let receiver = self.parse_expr()?;
        let first = self.expect_name()?;
        let (selector, args) = if self.peek() == Some(&Token::Colon) {
            self.parse_selector_args(first)?
        } else {
            (format!("{first}:"), vec![])
        };
        self.expect(&Token::RBracket)?;
        Ok(Expr::MethodCall {
            receiver: Box::new(receiver),
            selector,
            args,
        })
    }

    /// Keyword argument list: the first keyword has been consumed and the
    /// cursor sits on its `:`. Consumes `: value (kw: value)*`. A bare
    /// trailing colon (`[p x:]`) is a zero-argument call.
    fn parse_selector_args(&mut self, first: String) -> RunResult<(String, Vec<Expr>)> {
        let mut selector = format!("{first}:");
        self.expect(&Token::Colon)?;
        if !self.at_value_start() && !self.at_reference() {
            return Ok((selector, vec![]));
        }
        let mut args = vec![self.parse_call_arg()?];
        while self.at_argdef() {
            let keyword = self.expect_name()?;
            selector.push_str(&keyword);
            selector.push(':');
            self.expect(&Token::Colon)?;
            args.push(self.parse_call_arg()?);
        }
        Ok((selector, args))
    }

    /// Whether the cursor sits on a `&name` / `&TypeName` reference.
    fn at_reference(&self) -> bool {
        self.peek() == Some(&Token::Amp)
            && matches!(self.peek_at(1), Some(Token::Name(_) | Token::TypeName(_)))
    }

    /// One call argument: a value, or a `&name` reference to a registered
    /// function or user type.
    fn parse_call_arg(&mut self) -> RunResult<Expr> {
        if self.at_reference() {
            self.advance();
            return match self.peek() {
                Some(Token::Name(_)) => Ok(Expr::FuncRef(self.expect_name()?)),
                _ => Ok(Expr::TypeRef(self.expect_type_name()?)),
            };
        }
        self.parse_expr()
    }
}

/// Rewrites a parsed call into statement form: `[self name: value]`
/// becomes a `SelfAssign`.
fn into_call_stmt(call: Expr) -> Stmt {
    if let Expr::MethodCall { receiver, selector, args } = &call {
        if matches!(&**receiver, Expr::Name(name) if name == "self")
            && args.len() == 1
            && selector.matches(':').count() == 1
        {
            let name = selector.trim_end_matches(':').to_owned();
            let value = args[0].clone();
            return Stmt::SelfAssign { name, value };
        }
    }
    Stmt::Expr(call)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(source: &str) -> Stmt {
        let mut stmts = parse(source).unwrap();
        assert_eq!(stmts.len(), 1, "expected a single statement from {source:?}");
        stmts.remove(0)
    }

    #[test]
    fn parses_var_def() {
        assert_eq!(
            one("let x: Int = 3"),
            Stmt::NameDef {
                name: "x".into(),
                ty: "Int".into(),
                value: Expr::Int(3),
            }
        );
        assert_eq!(
            one("let x: Int?"),
            Stmt::NameDefEmpty {
                name: "x".into(),
                ty: "Int".into(),
            }
        );
    }

    #[test]
    fn parses_compound_assignment() {
        assert_eq!(
            one("x += 1"),
            Stmt::NameAssign {
                name: "x".into(),
                mode: AssignMode::Add,
                value: Expr::Int(1),
            }
        );
    }

    #[test]
    fn parses_indexed_assignment() {
        assert_eq!(
            one("xs{0} = 5"),
            Stmt::IterableItemAssign {
                name: "xs".into(),
                index: Expr::Int(0),
                value: Expr::Int(5),
            }
        );
    }

    #[test]
    fn parses_local_call_selectors() {
        let Stmt::Expr(Expr::LocalCall { selector, args }) = one("[print: x sep: \", \"]") else {
            panic!("expected a local call");
        };
        assert_eq!(selector, "print:sep:");
        assert_eq!(args.len(), 2);

        let Stmt::Expr(Expr::LocalCall { selector, args }) = one("[foo]") else {
            panic!("expected a local call");
        };
        assert_eq!(selector, "foo:");
        assert!(args.is_empty());
    }

    #[test]
    fn parses_object_call_with_bare_selector() {
        let Stmt::Expr(Expr::MethodCall { receiver, selector, args }) = one("[s length]") else {
            panic!("expected a method call");
        };
        assert_eq!(*receiver, Expr::Name("s".into()));
        assert_eq!(selector, "length:");
        assert!(args.is_empty());
    }

    #[test]
    fn trailing_colon_is_a_zero_argument_call() {
        let Stmt::Expr(Expr::MethodCall { selector, args, .. }) = one("[p x:]") else {
            panic!("expected a method call");
        };
        assert_eq!(selector, "x:");
        assert!(args.is_empty());
    }

    #[test]
    fn parses_multi_keyword_object_call() {
        let Stmt::Expr(Expr::MethodCall { selector, args, .. }) = one("[s replace: \"a\" with: \"b\"]") else {
            panic!("expected a method call");
        };
        assert_eq!(selector, "replace:with:");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn parses_type_call() {
        let Stmt::Expr(Expr::TypeCall { ty, selector, args }) = one("[Point x: 3 y: 4]") else {
            panic!("expected a type call");
        };
        assert_eq!(ty, "Point");
        assert_eq!(selector.as_deref(), Some("x:y:"));
        assert_eq!(args, vec![Expr::Int(3), Expr::Int(4)]);
    }

    #[test]
    fn parses_self_assign_statement() {
        assert_eq!(
            one("[self x: 3]"),
            Stmt::SelfAssign {
                name: "x".into(),
                value: Expr::Int(3),
            }
        );
    }

    #[test]
    fn parses_self_attribute_read() {
        let Stmt::NameDef { value, .. } = one("let a: Int = self.x") else {
            panic!("expected a name def");
        };
        assert_eq!(value, Expr::NameFromSelf("x".into()));
    }

    #[test]
    fn parses_def_with_aliases() {
        let Stmt::FuncDef(decl) = one("def add: (Int a) b: (Int) -> Int\n  return a + b\nend") else {
            panic!("expected a func def");
        };
        assert_eq!(decl.selector, "add:b:");
        assert_eq!(decl.param_names, vec!["add".to_owned(), "b".to_owned()]);
        assert_eq!(decl.param_types, vec!["Int".to_owned(), "Int".to_owned()]);
        assert_eq!(decl.param_aliases, vec![Some("a".to_owned()), None]);
        assert!(!decl.simple);
    }

    #[test]
    fn parses_def_extended_param_form() {
        let Stmt::FuncDef(decl) = one("def add: a: (Int) b: (Int) -> Int\n  return a + b\nend") else {
            panic!("expected a func def");
        };
        assert_eq!(decl.selector, "add:b:");
        assert_eq!(decl.param_aliases, vec![Some("a".to_owned()), None]);
    }

    #[test]
    fn parses_simple_def() {
        let Stmt::FuncDef(decl) = one("def answer -> Int\n  return 42\nend") else {
            panic!("expected a func def");
        };
        assert_eq!(decl.selector, "answer:");
        assert!(decl.simple);
        assert_eq!(decl.return_type, "Int");
    }

    #[test]
    fn parses_type_with_init() {
        let Stmt::TypeDef { name, extends, inits } =
            one("type Point as Object\n  init x: (Int) y: (Int)\n    [self x: x]\n    [self y: y]\n  end\nend")
        else {
            panic!("expected a type def");
        };
        assert_eq!(name, "Point");
        assert_eq!(extends, "Object");
        assert_eq!(inits.len(), 1);
        assert_eq!(inits[0].selector, "x:y:");
        assert_eq!(inits[0].suite.len(), 2);
    }

    #[test]
    fn parses_conditional_chain() {
        let Stmt::If {
            elif_blocks, else_suite, ..
        } = one("if a do\n  [print: 1]\nelif b do\n  [print: 2]\nelse\n  [print: 3]\nend")
        else {
            panic!("expected an if block");
        };
        assert_eq!(elif_blocks.len(), 1);
        assert!(else_suite.is_some());
    }

    #[test]
    fn parses_loops() {
        assert!(matches!(one("for 0, 4, 2 as i\n  [print: i]\nend"), Stmt::For { .. }));
        assert!(matches!(one("each xs as v\n  [print: v]\nend"), Stmt::Each { .. }));
        assert!(matches!(one("while x < 3 do\n  x += 1\nend"), Stmt::While { .. }));
    }

    #[test]
    fn parses_list_group_distinction() {
        let Stmt::NameDef { value, .. } = one("let L: List = (1, 2, 3)") else {
            panic!()
        };
        assert_eq!(value, Expr::List(vec![Expr::Int(1), Expr::Int(2), Expr::Int(3)]));

        let Stmt::NameDef { value, .. } = one("let x: Int = (1 + 2) * 3") else {
            panic!()
        };
        assert!(matches!(value, Expr::Binary { op: BinOp::Mul, .. }));

        let Stmt::NameDef { value, .. } = one("let L: List = (1,)") else {
            panic!()
        };
        assert_eq!(value, Expr::List(vec![Expr::Int(1)]));

        let Stmt::NameDef { value, .. } = one("let L: List = ()") else {
            panic!()
        };
        assert_eq!(value, Expr::List(vec![]));
    }

    #[test]
    fn parses_index_and_slice() {
        let Stmt::NameDef { value, .. } = one("let x: Int = xs{1}") else { panic!() };
        assert!(matches!(value, Expr::ItemFromIterable { end: None, .. }));

        let Stmt::NameDef { value, .. } = one("let ys: List = xs{0, 2}") else { panic!() };
        assert!(matches!(value, Expr::ItemFromIterable { end: Some(_), .. }));
    }

    #[test]
    fn negative_literals_fold() {
        let Stmt::NameDef { value, .. } = one("let x: Int = -5") else { panic!() };
        assert_eq!(value, Expr::Int(-5));
        let Stmt::NameDef { value, .. } = one("let y: Float = -2.5") else { panic!() };
        assert_eq!(value, Expr::Float(-2.5));
    }

    #[test]
    fn subtraction_is_not_a_negative_literal() {
        let Stmt::NameDef { value, .. } = one("let x: Int = a - 5") else { panic!() };
        assert!(matches!(value, Expr::Binary { op: BinOp::Sub, .. }));
    }

    #[test]
    fn parses_references_in_argument_position() {
        let Stmt::Expr(Expr::LocalCall { args, .. }) = one("[register: &double]") else {
            panic!("expected a local call");
        };
        assert_eq!(args, vec![Expr::FuncRef("double".into())]);

        let Stmt::Expr(Expr::LocalCall { args, .. }) = one("[register: &Point]") else {
            panic!("expected a local call");
        };
        assert_eq!(args, vec![Expr::TypeRef("Point".into())]);

        // A binary & between values is still a bitand.
        let Stmt::Expr(Expr::LocalCall { args, .. }) = one("[print: a & b]") else {
            panic!("expected a local call");
        };
        assert!(matches!(args[0], Expr::Binary { op: BinOp::BitAnd, .. }));
    }

    #[test]
    fn parses_import_forms() {
        assert_eq!(
            one("import math"),
            Stmt::Import {
                name: "math".into(),
                alias: None,
            }
        );
        assert_eq!(
            one("import math as m"),
            Stmt::Import {
                name: "math".into(),
                alias: Some("m".into()),
            }
        );
    }

    #[test]
    fn parses_exit_forms() {
        assert_eq!(one("exit"), Stmt::Exit(None));
        assert_eq!(one("exit 3"), Stmt::Exit(Some(Expr::Int(3))));
    }

    #[test]
    fn rejects_unclosed_block() {
        let err = parse("if x do\n  [print: 1]\n").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::SyntaxError);
    }

    #[test]
    fn rejects_try_blocks() {
        let err = parse("try\n  [print: 1]\nend").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::SyntaxError);
    }
}
