//! Recursive-descent parser producing the owned AST.
//!
//! The parser keeps a two-token buffer over the lexer (`current`/`peek`) and
//! reports the first syntax error it hits; recovery happens one level up,
//! where a failed file falls back to its original text.

pub mod ast;
pub mod error;

use crate::scanner::tokens::{CastTok, LexedPart, Token, TokenKind};
use crate::scanner::Lexer;

use ast::*;
use error::ParseError;

pub struct Parser<'a> {
    src: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Result<Parser<'a>, ParseError> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(Parser {
            src,
            lexer,
            current,
            peek,
        })
    }

    fn new_snippet(src: &'a str) -> Result<Parser<'a>, ParseError> {
        let mut lexer = Lexer::new_snippet(src);
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(Parser {
            src,
            lexer,
            current,
            peek,
        })
    }

    /// Parse a whole source file.
    pub fn parse(src: &str) -> Result<Program, ParseError> {
        let mut parser = Parser::new(src)?;
        parser.parse_program()
    }

    /// Parse a bare expression snippet (string interpolations).
    fn parse_expr_snippet(src: &str) -> Result<Expr, ParseError> {
        let mut parser = Parser::new_snippet(src)?;
        let expr = parser.parse_expression()?;
        if parser.current.kind != TokenKind::Eof {
            return Err(parser.unexpected("end of interpolated expression"));
        }
        Ok(expr)
    }

    // --- Token buffer -----------------------------------------------------

    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        let prev = std::mem::replace(&mut self.current, std::mem::replace(&mut self.peek, next));
        Ok(prev)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.current.kind == kind {
            self.bump()
        } else {
            Err(self.unexpected(what))
        }
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.current.kind == kind {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn unexpected(&self, what: &str) -> ParseError {
        ParseError::at(
            self.src,
            self.current.offset,
            format!("expected {what}, found {:?}", self.current.kind),
        )
    }

    fn is_kw(&self, word: &str) -> bool {
        self.current.is_keyword(word)
    }

    fn expect_kw(&mut self, word: &str) -> Result<(), ParseError> {
        if self.is_kw(word) {
            self.bump()?;
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{word}`")))
        }
    }

    /// Any identifier, keywords included (member names may be keywords).
    fn expect_name(&mut self, what: &str) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.bump()?;
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn expect_variable(&mut self, what: &str) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Variable(name) => {
                let name = name.clone();
                self.bump()?;
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// `;` or `?>` terminate a simple statement. A file may not simply end
    /// mid-statement, matching the host language.
    fn expect_terminator(&mut self) -> Result<(), ParseError> {
        match self.current.kind {
            TokenKind::Semicolon | TokenKind::CloseTag => {
                self.bump()?;
                Ok(())
            }
            _ => Err(self.unexpected("`;`")),
        }
    }

    // --- Statements -------------------------------------------------------

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut stmts = Vec::new();
        loop {
            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::CloseTag => {
                    self.bump()?;
                }
                _ => stmts.push(self.parse_stmt()?),
            }
        }
        Ok(Program { stmts })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let comments = std::mem::take(&mut self.current.comments);
        let kind = self.parse_stmt_kind()?;
        Ok(Stmt { kind, comments })
    }

    fn parse_stmt_kind(&mut self) -> Result<StmtKind, ParseError> {
        match &self.current.kind {
            TokenKind::InlineHtml(_) => match self.bump()?.kind {
                TokenKind::InlineHtml(text) => Ok(StmtKind::InlineHtml(text)),
                _ => unreachable!("matched InlineHtml above"),
            },
            TokenKind::Semicolon => {
                self.bump()?;
                Ok(StmtKind::Nop)
            }
            TokenKind::LBrace => Ok(StmtKind::Block(self.parse_block()?)),
            TokenKind::Identifier(_) => self.parse_keyword_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_keyword_stmt(&mut self) -> Result<StmtKind, ParseError> {
        if self.is_kw("function") && !matches!(self.peek.kind, TokenKind::LParen) {
            return Ok(StmtKind::Function(self.parse_function_decl()?));
        }
        if self.is_kw("class") {
            self.bump()?;
            return Ok(StmtKind::Class(self.parse_class_after_kw(Modifiers::empty())?));
        }
        if self.is_kw("interface") {
            return Ok(StmtKind::Class(self.parse_interface_decl()?));
        }
        if (self.is_kw("abstract") || self.is_kw("final"))
            && matches!(&self.peek.kind, TokenKind::Identifier(next)
                if next.eq_ignore_ascii_case("class")
                    || next.eq_ignore_ascii_case("abstract")
                    || next.eq_ignore_ascii_case("final"))
        {
            let modifiers = self.parse_modifiers()?;
            self.expect_kw("class")?;
            return Ok(StmtKind::Class(self.parse_class_after_kw(modifiers)?));
        }
        if self.is_kw("return") {
            self.bump()?;
            let expr = if matches!(
                self.current.kind,
                TokenKind::Semicolon | TokenKind::CloseTag | TokenKind::Eof
            ) {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.expect_terminator()?;
            return Ok(StmtKind::Return(expr));
        }
        if self.is_kw("echo") {
            self.bump()?;
            let mut exprs = vec![self.parse_expression()?];
            while self.eat(TokenKind::Comma)? {
                exprs.push(self.parse_expression()?);
            }
            self.expect_terminator()?;
            return Ok(StmtKind::Echo(exprs));
        }
        if self.is_kw("if") {
            return self.parse_if();
        }
        if self.is_kw("while") {
            self.bump()?;
            self.expect(TokenKind::LParen, "`(`")?;
            let cond = self.parse_expression()?;
            self.expect(TokenKind::RParen, "`)`")?;
            let body = self.parse_block_or_single()?;
            return Ok(StmtKind::While { cond, body });
        }
        if self.is_kw("for") {
            return self.parse_for();
        }
        if self.is_kw("foreach") {
            return self.parse_foreach();
        }
        if self.is_kw("break") {
            self.bump()?;
            self.expect_terminator()?;
            return Ok(StmtKind::Break);
        }
        if self.is_kw("continue") {
            self.bump()?;
            self.expect_terminator()?;
            return Ok(StmtKind::Continue);
        }
        self.parse_expr_stmt()
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtKind, ParseError> {
        let expr = self.parse_expression()?;
        self.expect_terminator()?;
        Ok(StmtKind::Expression(expr))
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut stmts = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::RBrace => {
                    self.bump()?;
                    return Ok(stmts);
                }
                TokenKind::Eof => return Err(self.unexpected("`}`")),
                TokenKind::CloseTag => {
                    self.bump()?;
                }
                _ => stmts.push(self.parse_stmt()?),
            }
        }
    }

    fn parse_block_or_single(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if matches!(self.current.kind, TokenKind::LBrace) {
            self.parse_block()
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        self.expect_kw("if")?;
        self.expect(TokenKind::LParen, "`(`")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen, "`)`")?;
        let then = self.parse_block_or_single()?;

        let mut elseifs = Vec::new();
        let mut r#else = None;
        loop {
            if self.is_kw("elseif") {
                self.bump()?;
                self.expect(TokenKind::LParen, "`(`")?;
                let cond = self.parse_expression()?;
                self.expect(TokenKind::RParen, "`)`")?;
                elseifs.push((cond, self.parse_block_or_single()?));
            } else if self.is_kw("else") {
                self.bump()?;
                if self.is_kw("if") {
                    // `else if` folds into the elseif chain.
                    self.bump()?;
                    self.expect(TokenKind::LParen, "`(`")?;
                    let cond = self.parse_expression()?;
                    self.expect(TokenKind::RParen, "`)`")?;
                    elseifs.push((cond, self.parse_block_or_single()?));
                } else {
                    r#else = Some(self.parse_block_or_single()?);
                    break;
                }
            } else {
                break;
            }
        }
        Ok(StmtKind::If {
            cond,
            then,
            elseifs,
            r#else,
        })
    }

    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        self.expect_kw("for")?;
        self.expect(TokenKind::LParen, "`(`")?;
        let init = self.parse_expr_list(&TokenKind::Semicolon)?;
        self.expect(TokenKind::Semicolon, "`;`")?;
        let cond = self.parse_expr_list(&TokenKind::Semicolon)?;
        self.expect(TokenKind::Semicolon, "`;`")?;
        let step = self.parse_expr_list(&TokenKind::RParen)?;
        self.expect(TokenKind::RParen, "`)`")?;
        let body = self.parse_block_or_single()?;
        Ok(StmtKind::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn parse_expr_list(&mut self, stop: &TokenKind) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = Vec::new();
        if self.current.kind == *stop {
            return Ok(exprs);
        }
        exprs.push(self.parse_expression()?);
        while self.eat(TokenKind::Comma)? {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    fn parse_foreach(&mut self) -> Result<StmtKind, ParseError> {
        self.expect_kw("foreach")?;
        self.expect(TokenKind::LParen, "`(`")?;
        let iter = self.parse_expression()?;
        self.expect_kw("as")?;
        let mut by_ref = self.eat(TokenKind::Amp)?;
        let first = self.parse_expression()?;
        let (key, value) = if self.eat(TokenKind::DoubleArrow)? {
            by_ref = self.eat(TokenKind::Amp)?;
            (Some(first), self.parse_expression()?)
        } else {
            (None, first)
        };
        self.expect(TokenKind::RParen, "`)`")?;
        let body = self.parse_block_or_single()?;
        Ok(StmtKind::Foreach {
            iter,
            key,
            by_ref,
            value,
            body,
        })
    }

    // --- Declarations -----------------------------------------------------

    fn parse_modifiers(&mut self) -> Result<Modifiers, ParseError> {
        let mut modifiers = Modifiers::empty();
        loop {
            let flag = if self.is_kw("public") {
                Modifiers::PUBLIC
            } else if self.is_kw("protected") {
                Modifiers::PROTECTED
            } else if self.is_kw("private") {
                Modifiers::PRIVATE
            } else if self.is_kw("static") {
                Modifiers::STATIC
            } else if self.is_kw("abstract") {
                Modifiers::ABSTRACT
            } else if self.is_kw("final") {
                Modifiers::FINAL
            } else if self.is_kw("readonly") {
                Modifiers::READONLY
            } else {
                return Ok(modifiers);
            };
            modifiers |= flag;
            self.bump()?;
        }
    }

    fn parse_function_decl(&mut self) -> Result<FunctionDecl, ParseError> {
        self.expect_kw("function")?;
        let by_ref = self.eat(TokenKind::Amp)?;
        let name = self.expect_name("function name")?;
        let params = self.parse_params()?;
        let return_type = self.parse_return_type()?;
        let body = self.parse_block()?;
        Ok(FunctionDecl {
            name,
            by_ref,
            params,
            return_type,
            body,
        })
    }

    fn parse_class_after_kw(&mut self, modifiers: Modifiers) -> Result<ClassDecl, ParseError> {
        let name = self.expect_name("class name")?;
        let mut extends = None;
        let mut implements = Vec::new();
        if self.is_kw("extends") {
            self.bump()?;
            extends = Some(self.expect_name("class name")?);
        }
        if self.is_kw("implements") {
            self.bump()?;
            implements.push(self.expect_name("interface name")?);
            while self.eat(TokenKind::Comma)? {
                implements.push(self.expect_name("interface name")?);
            }
        }
        let members = self.parse_class_body()?;
        Ok(ClassDecl {
            kind: ClassKind::Class,
            modifiers,
            name: Some(name),
            extends,
            implements,
            members,
        })
    }

    fn parse_interface_decl(&mut self) -> Result<ClassDecl, ParseError> {
        self.expect_kw("interface")?;
        let name = self.expect_name("interface name")?;
        // Interface parents live in the implements list; the printer labels
        // them `extends` for this kind.
        let mut implements = Vec::new();
        if self.is_kw("extends") {
            self.bump()?;
            implements.push(self.expect_name("interface name")?);
            while self.eat(TokenKind::Comma)? {
                implements.push(self.expect_name("interface name")?);
            }
        }
        let members = self.parse_class_body()?;
        Ok(ClassDecl {
            kind: ClassKind::Interface,
            modifiers: Modifiers::empty(),
            name: Some(name),
            extends: None,
            implements,
            members,
        })
    }

    fn parse_class_body(&mut self) -> Result<Vec<ClassMember>, ParseError> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut members = Vec::new();
        while !matches!(self.current.kind, TokenKind::RBrace) {
            if matches!(self.current.kind, TokenKind::Eof) {
                return Err(self.unexpected("`}`"));
            }
            members.push(self.parse_class_member()?);
        }
        self.bump()?;
        Ok(members)
    }

    fn parse_class_member(&mut self) -> Result<ClassMember, ParseError> {
        let comments = std::mem::take(&mut self.current.comments);
        let modifiers = self.parse_modifiers()?;

        let kind = if self.is_kw("const") {
            self.bump()?;
            let type_hint = self.maybe_const_type()?;
            let mut entries = Vec::new();
            loop {
                let name = self.expect_name("constant name")?;
                self.expect(TokenKind::Eq, "`=`")?;
                entries.push(ConstEntry {
                    name,
                    value: self.parse_expression()?,
                });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::Semicolon, "`;`")?;
            MemberKind::Const {
                modifiers,
                type_hint,
                entries,
            }
        } else if self.is_kw("function") {
            self.bump()?;
            let by_ref = self.eat(TokenKind::Amp)?;
            let name = self.expect_name("method name")?;
            let params = self.parse_params()?;
            let return_type = self.parse_return_type()?;
            let body = if self.eat(TokenKind::Semicolon)? {
                None
            } else {
                Some(self.parse_block()?)
            };
            MemberKind::Method(MethodDecl {
                modifiers,
                name,
                by_ref,
                params,
                return_type,
                body,
            })
        } else {
            let type_hint = if matches!(self.current.kind, TokenKind::Variable(_)) {
                None
            } else {
                Some(self.parse_type_hint()?)
            };
            let mut entries = Vec::new();
            loop {
                let name = self.expect_variable("property name")?;
                let default = if self.eat(TokenKind::Eq)? {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                entries.push(PropertyEntry { name, default });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::Semicolon, "`;`")?;
            MemberKind::Property {
                modifiers,
                type_hint,
                entries,
            }
        };
        Ok(ClassMember { kind, comments })
    }

    /// `const string NAME = ...` — an annotation is present when the token
    /// after the first identifier is not `=`.
    fn maybe_const_type(&mut self) -> Result<Option<TypeHint>, ParseError> {
        let has_type = match &self.current.kind {
            TokenKind::Question => true,
            TokenKind::Identifier(_) => {
                matches!(self.peek.kind, TokenKind::Identifier(_) | TokenKind::Pipe)
            }
            _ => false,
        };
        if has_type {
            Ok(Some(self.parse_type_hint()?))
        } else {
            Ok(None)
        }
    }

    fn parse_type_hint(&mut self) -> Result<TypeHint, ParseError> {
        let mut text = String::new();
        if self.eat(TokenKind::Question)? {
            text.push('?');
        }
        text.push_str(&self.expect_name("type name")?);
        while self.current.kind == TokenKind::Pipe
            && matches!(self.peek.kind, TokenKind::Identifier(_))
        {
            self.bump()?;
            text.push('|');
            text.push_str(&self.expect_name("type name")?);
        }
        Ok(TypeHint(text))
    }

    fn parse_return_type(&mut self) -> Result<Option<TypeHint>, ParseError> {
        if self.eat(TokenKind::Colon)? {
            Ok(Some(self.parse_type_hint()?))
        } else {
            Ok(None)
        }
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        loop {
            if self.eat(TokenKind::RParen)? {
                return Ok(params);
            }
            let modifiers = self.parse_modifiers()?;
            let type_hint = if matches!(
                self.current.kind,
                TokenKind::Variable(_) | TokenKind::Amp | TokenKind::Ellipsis
            ) {
                None
            } else {
                Some(self.parse_type_hint()?)
            };
            let by_ref = self.eat(TokenKind::Amp)?;
            let variadic = self.eat(TokenKind::Ellipsis)?;
            let var = Expr::Variable(VarName::Simple(self.expect_variable("parameter name")?));
            let default = if self.eat(TokenKind::Eq)? {
                Some(self.parse_expression()?)
            } else {
                None
            };
            params.push(Param {
                modifiers,
                type_hint,
                by_ref,
                variadic,
                var,
                default,
            });
            if !self.eat(TokenKind::Comma)? {
                self.expect(TokenKind::RParen, "`)`")?;
                return Ok(params);
            }
        }
    }

    // --- Expressions ------------------------------------------------------

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_ternary()?;
        let op = match self.current.kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::DotEq => AssignOp::Concat,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::QuestionQuestionEq => AssignOp::Coalesce,
            _ => return Ok(lhs),
        };
        if !is_assignable(&lhs) {
            return Err(self.unexpected("an assignable expression before `=`"));
        }
        self.bump()?;
        let value = self.parse_assignment()?;
        Ok(Expr::Assign {
            op,
            target: Box::new(lhs),
            value: Box::new(value),
        })
    }

    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_coalesce()?;
        if !self.eat(TokenKind::Question)? {
            return Ok(cond);
        }
        let then = if matches!(self.current.kind, TokenKind::Colon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(TokenKind::Colon, "`:`")?;
        let r#else = Box::new(self.parse_ternary()?);
        Ok(Expr::Ternary {
            cond: Box::new(cond),
            then,
            r#else,
        })
    }

    fn parse_coalesce(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_or()?;
        if self.eat(TokenKind::QuestionQuestion)? {
            let right = self.parse_coalesce()?;
            return Ok(binary(BinaryOp::Coalesce, left, right));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::PipePipe)? {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.eat(TokenKind::AmpAmp)? {
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current.kind {
                TokenKind::EqEq => BinaryOp::Equal,
                TokenKind::BangEq => BinaryOp::NotEqual,
                TokenKind::EqEqEq => BinaryOp::Identical,
                TokenKind::BangEqEq => BinaryOp::NotIdentical,
                _ => return Ok(left),
            };
            self.bump()?;
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_concat()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Lt => BinaryOp::Less,
                TokenKind::Le => BinaryOp::LessEqual,
                TokenKind::Gt => BinaryOp::Greater,
                TokenKind::Ge => BinaryOp::GreaterEqual,
                TokenKind::Spaceship => BinaryOp::Spaceship,
                _ => return Ok(left),
            };
            self.bump()?;
            let right = self.parse_concat()?;
            left = binary(op, left, right);
        }
    }

    fn parse_concat(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while self.eat(TokenKind::Dot)? {
            let right = self.parse_additive()?;
            left = binary(BinaryOp::Concat, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.bump()?;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.bump()?;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.current.kind {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            _ => None,
        };
        if let Some(op) = op {
            self.bump()?;
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
            });
        }
        match &self.current.kind {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.current.kind == TokenKind::PlusPlus {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                self.bump()?;
                let var = self.parse_unary()?;
                Ok(Expr::IncDec {
                    op,
                    prefix: true,
                    var: Box::new(var),
                })
            }
            TokenKind::Cast(cast) => {
                let kind = match cast {
                    CastTok::Int => CastKind::Int,
                    CastTok::Bool => CastKind::Bool,
                    CastTok::Double(spelling) => CastKind::Double(*spelling),
                    CastTok::String => CastKind::String,
                    CastTok::Array => CastKind::Array,
                    CastTok::Object => CastKind::Object,
                };
                self.bump()?;
                let expr = self.parse_unary()?;
                Ok(Expr::Cast {
                    kind,
                    expr: Box::new(expr),
                })
            }
            _ => self.parse_pow(),
        }
    }

    fn parse_pow(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_postfix()?;
        if self.eat(TokenKind::StarStar)? {
            let exp = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exp));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current.kind {
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    expr = match expr {
                        Expr::ConstFetch(name) => Expr::Call {
                            callee: Callee::Name(name),
                            args,
                        },
                        other => Expr::Call {
                            callee: Callee::Expr(Box::new(other)),
                            args,
                        },
                    };
                }
                TokenKind::Arrow => {
                    self.bump()?;
                    let name = self.parse_member_name()?;
                    if matches!(self.current.kind, TokenKind::LParen) {
                        let args = self.parse_args()?;
                        expr = Expr::MethodCall {
                            receiver: Box::new(expr),
                            name,
                            args,
                        };
                    } else {
                        expr = Expr::PropertyFetch {
                            receiver: Box::new(expr),
                            name,
                        };
                    }
                }
                TokenKind::DoubleColon => {
                    self.bump()?;
                    let class = match expr {
                        Expr::ConstFetch(name) => ClassRef::Name(name),
                        other => ClassRef::Expr(Box::new(other)),
                    };
                    expr = self.parse_static_member(class)?;
                }
                TokenKind::LBracket => {
                    self.bump()?;
                    let index = if self.eat(TokenKind::RBracket)? {
                        None
                    } else {
                        let idx = self.parse_expression()?;
                        self.expect(TokenKind::RBracket, "`]`")?;
                        Some(Box::new(idx))
                    };
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index,
                    };
                }
                TokenKind::PlusPlus => {
                    self.bump()?;
                    expr = Expr::IncDec {
                        op: IncDecOp::Inc,
                        prefix: false,
                        var: Box::new(expr),
                    };
                }
                TokenKind::MinusMinus => {
                    self.bump()?;
                    expr = Expr::IncDec {
                        op: IncDecOp::Dec,
                        prefix: false,
                        var: Box::new(expr),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_static_member(&mut self, class: ClassRef) -> Result<Expr, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(_) => {
                let name = self.expect_name("member name")?;
                if matches!(self.current.kind, TokenKind::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::StaticCall {
                        class,
                        name: MemberName::Name(name),
                        args,
                    })
                } else {
                    Ok(Expr::ClassConstFetch { class, name })
                }
            }
            TokenKind::Variable(_) => {
                let name = self.expect_variable("property name")?;
                Ok(Expr::StaticPropertyFetch { class, name })
            }
            TokenKind::DollarBrace | TokenKind::LBrace => {
                let name = self.parse_member_name()?;
                if matches!(self.current.kind, TokenKind::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::StaticCall { class, name, args })
                } else {
                    Err(self.unexpected("`(`"))
                }
            }
            _ => Err(self.unexpected("member name")),
        }
    }

    fn parse_member_name(&mut self) -> Result<MemberName, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(_) => Ok(MemberName::Name(self.expect_name("member name")?)),
            TokenKind::Variable(_) => {
                let name = self.expect_variable("member name")?;
                Ok(MemberName::Expr(Box::new(Expr::Variable(VarName::Simple(
                    name,
                )))))
            }
            TokenKind::DollarBrace => {
                self.bump()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RBrace, "`}`")?;
                Ok(MemberName::Expr(Box::new(Expr::Variable(VarName::Dynamic(
                    Box::new(inner),
                )))))
            }
            TokenKind::LBrace => {
                self.bump()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RBrace, "`}`")?;
                Ok(MemberName::Expr(Box::new(inner)))
            }
            _ => Err(self.unexpected("member name")),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        loop {
            if self.eat(TokenKind::RParen)? {
                return Ok(args);
            }
            args.push(self.parse_expression()?);
            if !self.eat(TokenKind::Comma)? {
                self.expect(TokenKind::RParen, "`)`")?;
                return Ok(args);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match &self.current.kind {
            TokenKind::Variable(_) => {
                let name = self.expect_variable("variable")?;
                Ok(Expr::Variable(VarName::Simple(name)))
            }
            TokenKind::DollarBrace => {
                self.bump()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RBrace, "`}`")?;
                Ok(Expr::Variable(VarName::Dynamic(Box::new(inner))))
            }
            TokenKind::IntLiteral(_) => match self.bump()?.kind {
                TokenKind::IntLiteral(text) => Ok(Expr::Int { text }),
                _ => unreachable!("matched IntLiteral above"),
            },
            TokenKind::FloatLiteral(_) => match self.bump()?.kind {
                TokenKind::FloatLiteral(text) => Ok(Expr::Float { text }),
                _ => unreachable!("matched FloatLiteral above"),
            },
            TokenKind::StringLiteral { .. } => match self.bump()?.kind {
                TokenKind::StringLiteral { value, kind } => Ok(Expr::String { value, kind }),
                _ => unreachable!("matched StringLiteral above"),
            },
            TokenKind::InterpolatedString { .. } => {
                let (parts, kind) = match self.bump()?.kind {
                    TokenKind::InterpolatedString { parts, kind } => (parts, kind),
                    _ => unreachable!("matched InterpolatedString above"),
                };
                let parts = parts
                    .into_iter()
                    .map(|part| self.convert_part(part))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::Interpolated { parts, kind })
            }
            TokenKind::LParen => {
                self.bump()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.bump()?;
                self.parse_array_items(ArrayKind::Short, TokenKind::RBracket)
            }
            TokenKind::Identifier(_) => self.parse_ident_expr(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn convert_part(&self, part: LexedPart) -> Result<InterpPart, ParseError> {
        Ok(match part {
            LexedPart::Literal(text) => InterpPart::Literal(text),
            LexedPart::Var(name) => InterpPart::Expr(Expr::Variable(VarName::Simple(name))),
            LexedPart::Expr(raw) => {
                let expr = Parser::parse_expr_snippet(&raw).map_err(|err| {
                    ParseError::at(
                        self.src,
                        self.current.offset,
                        format!("in string interpolation: {}", err.message),
                    )
                })?;
                InterpPart::Expr(expr)
            }
        })
    }

    fn parse_ident_expr(&mut self) -> Result<Expr, ParseError> {
        if self.is_kw("new") {
            return self.parse_new();
        }
        if self.is_kw("exit") || self.is_kw("die") {
            let kind = if self.is_kw("exit") {
                ExitKind::Exit
            } else {
                ExitKind::Die
            };
            self.bump()?;
            let arg = if self.eat(TokenKind::LParen)? {
                if self.eat(TokenKind::RParen)? {
                    None
                } else {
                    let expr = self.parse_expression()?;
                    self.expect(TokenKind::RParen, "`)`")?;
                    Some(Box::new(expr))
                }
            } else {
                None
            };
            return Ok(Expr::Exit { kind, arg });
        }
        if self.is_kw("static")
            && matches!(&self.peek.kind, TokenKind::Identifier(next)
                if next.eq_ignore_ascii_case("function") || next.eq_ignore_ascii_case("fn"))
        {
            // Closure static-ness does not survive representation.
            self.bump()?;
        }
        if self.is_kw("function") {
            return self.parse_closure();
        }
        if self.is_kw("fn") {
            return self.parse_arrow_fn();
        }
        if self.is_kw("array") && matches!(self.peek.kind, TokenKind::LParen) {
            self.bump()?;
            self.bump()?;
            return self.parse_array_items(ArrayKind::Long, TokenKind::RParen);
        }
        let name = self.expect_name("an expression")?;
        Ok(Expr::ConstFetch(name))
    }

    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        self.expect_kw("new")?;
        if self.is_kw("class") {
            self.bump()?;
            let args = if matches!(self.current.kind, TokenKind::LParen) {
                self.parse_args()?
            } else {
                Vec::new()
            };
            let mut extends = None;
            let mut implements = Vec::new();
            if self.is_kw("extends") {
                self.bump()?;
                extends = Some(self.expect_name("class name")?);
            }
            if self.is_kw("implements") {
                self.bump()?;
                implements.push(self.expect_name("interface name")?);
                while self.eat(TokenKind::Comma)? {
                    implements.push(self.expect_name("interface name")?);
                }
            }
            let members = self.parse_class_body()?;
            let decl = ClassDecl {
                kind: ClassKind::Class,
                modifiers: Modifiers::empty(),
                name: None,
                extends,
                implements,
                members,
            };
            return Ok(Expr::New {
                class: NewClassRef::Anonymous(Box::new(decl)),
                args,
            });
        }

        let class = match &self.current.kind {
            TokenKind::Identifier(_) => NewClassRef::Name(self.expect_name("class name")?),
            TokenKind::Variable(_) | TokenKind::DollarBrace | TokenKind::LParen => {
                NewClassRef::Expr(Box::new(self.parse_primary()?))
            }
            _ => return Err(self.unexpected("class name")),
        };
        let args = if matches!(self.current.kind, TokenKind::LParen) {
            self.parse_args()?
        } else {
            Vec::new()
        };
        Ok(Expr::New { class, args })
    }

    fn parse_closure(&mut self) -> Result<Expr, ParseError> {
        self.expect_kw("function")?;
        let by_ref = self.eat(TokenKind::Amp)?;
        let params = self.parse_params()?;
        let mut uses = Vec::new();
        if self.is_kw("use") {
            self.bump()?;
            self.expect(TokenKind::LParen, "`(`")?;
            loop {
                let by_ref = self.eat(TokenKind::Amp)?;
                let var = Expr::Variable(VarName::Simple(self.expect_variable("variable")?));
                uses.push(ClosureUse { by_ref, var });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "`)`")?;
        }
        let return_type = self.parse_return_type()?;
        let body = self.parse_block()?;
        Ok(Expr::Closure {
            by_ref,
            params,
            uses,
            return_type,
            body,
        })
    }

    fn parse_arrow_fn(&mut self) -> Result<Expr, ParseError> {
        self.expect_kw("fn")?;
        let by_ref = self.eat(TokenKind::Amp)?;
        let params = self.parse_params()?;
        let return_type = self.parse_return_type()?;
        self.expect(TokenKind::DoubleArrow, "`=>`")?;
        let body = self.parse_expression()?;
        Ok(Expr::ArrowFn {
            by_ref,
            params,
            return_type,
            body: Box::new(body),
        })
    }

    fn parse_array_items(&mut self, kind: ArrayKind, close: TokenKind) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.current.kind == close {
                self.bump()?;
                return Ok(Expr::Array { kind, items });
            }
            let by_ref = self.eat(TokenKind::Amp)?;
            let first = self.parse_expression()?;
            let item = if self.eat(TokenKind::DoubleArrow)? {
                let by_ref = self.eat(TokenKind::Amp)?;
                ArrayItem {
                    key: Some(first),
                    by_ref,
                    value: self.parse_expression()?,
                }
            } else {
                ArrayItem {
                    key: None,
                    by_ref,
                    value: first,
                }
            };
            items.push(item);
            if !self.eat(TokenKind::Comma)? {
                if self.current.kind == close {
                    self.bump()?;
                    return Ok(Expr::Array { kind, items });
                }
                return Err(self.unexpected("`,`"));
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn is_assignable(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Variable(_)
            | Expr::Index { .. }
            | Expr::PropertyFetch { .. }
            | Expr::StaticPropertyFetch { .. }
            | Expr::Array { .. }
    )
}
