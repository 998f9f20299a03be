//! Expression printing with precedence-driven parenthesization.

use super::Printer;
use crate::parser::ast::*;
use crate::scanner::tokens::StringKind;

/// Binding strengths, loosest first. Left-associative operands print their
/// right child one level tighter; `**` is the one right-associative binary.
const PREC_ASSIGN: u8 = 1;
const PREC_TERNARY: u8 = 2;
const PREC_COALESCE: u8 = 3;
const PREC_OR: u8 = 4;
const PREC_AND: u8 = 5;
const PREC_EQUALITY: u8 = 6;
const PREC_RELATIONAL: u8 = 7;
const PREC_CONCAT: u8 = 8;
const PREC_ADDITIVE: u8 = 9;
const PREC_MULTIPLICATIVE: u8 = 10;
const PREC_POW: u8 = 11;
const PREC_UNARY: u8 = 12;
const PREC_ATOM: u8 = 13;

fn binary_prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Coalesce => PREC_COALESCE,
        BinaryOp::Or => PREC_OR,
        BinaryOp::And => PREC_AND,
        BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::Identical | BinaryOp::NotIdentical => {
            PREC_EQUALITY
        }
        BinaryOp::Less
        | BinaryOp::LessEqual
        | BinaryOp::Greater
        | BinaryOp::GreaterEqual
        | BinaryOp::Spaceship => PREC_RELATIONAL,
        BinaryOp::Concat => PREC_CONCAT,
        BinaryOp::Add | BinaryOp::Sub => PREC_ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => PREC_MULTIPLICATIVE,
        BinaryOp::Pow => PREC_POW,
    }
}

fn binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Concat => ".",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "**",
        BinaryOp::Equal => "==",
        BinaryOp::NotEqual => "!=",
        BinaryOp::Identical => "===",
        BinaryOp::NotIdentical => "!==",
        BinaryOp::Less => "<",
        BinaryOp::LessEqual => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEqual => ">=",
        BinaryOp::Spaceship => "<=>",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::Coalesce => "??",
    }
}

fn assign_symbol(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::Concat => ".=",
        AssignOp::Add => "+=",
        AssignOp::Sub => "-=",
        AssignOp::Mul => "*=",
        AssignOp::Div => "/=",
        AssignOp::Mod => "%=",
        AssignOp::Coalesce => "??=",
    }
}

fn expr_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign { .. } => PREC_ASSIGN,
        Expr::Ternary { .. } => PREC_TERNARY,
        Expr::Binary { op, .. } => binary_prec(*op),
        Expr::Unary { .. } | Expr::Cast { .. } => PREC_UNARY,
        Expr::IncDec { prefix, .. } => {
            if *prefix {
                PREC_UNARY
            } else {
                PREC_ATOM
            }
        }
        _ => PREC_ATOM,
    }
}

impl Printer {
    pub(super) fn emit_expr(&mut self, expr: &Expr) {
        self.emit_expr_prec(expr, 0);
    }

    fn emit_expr_prec(&mut self, expr: &Expr, min: u8) {
        if expr_prec(expr) < min {
            self.write("(");
            self.emit_expr_inner(expr);
            self.write(")");
        } else {
            self.emit_expr_inner(expr);
        }
    }

    fn emit_expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::Variable(name) => self.emit_var_name(name),
            Expr::String { value, kind } => match kind {
                StringKind::SingleQuoted | StringKind::Nowdoc => self.write_single_quoted(value),
                StringKind::DoubleQuoted | StringKind::Heredoc => self.write_double_quoted(value),
            },
            Expr::Interpolated { parts, .. } => self.emit_interpolated(parts),
            Expr::Int { text } | Expr::Float { text } => self.write(text),
            Expr::ConstFetch(name) => self.write(name),
            Expr::ClassConstFetch { class, name } => {
                self.emit_class_ref(class);
                self.write("::");
                self.write(name);
            }
            Expr::Array { items, kind } => {
                match kind {
                    ArrayKind::Short => self.write("["),
                    ArrayKind::Long => self.write("array("),
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(key) = &item.key {
                        self.emit_expr(key);
                        self.write(" => ");
                    }
                    if item.by_ref {
                        self.write("&");
                    }
                    self.emit_expr(&item.value);
                }
                match kind {
                    ArrayKind::Short => self.write("]"),
                    ArrayKind::Long => self.write(")"),
                }
            }
            Expr::Assign { op, target, value } => {
                self.emit_expr_prec(target, PREC_ATOM);
                self.write(" ");
                self.write(assign_symbol(*op));
                self.write(" ");
                self.emit_expr_prec(value, PREC_ASSIGN);
            }
            Expr::Binary { op, left, right } => {
                let prec = binary_prec(*op);
                if *op == BinaryOp::Pow {
                    self.emit_expr_prec(left, prec + 1);
                    self.write(" ** ");
                    self.emit_expr_prec(right, prec);
                } else {
                    self.emit_expr_prec(left, prec);
                    self.write(" ");
                    self.write(binary_symbol(*op));
                    self.write(" ");
                    self.emit_expr_prec(right, prec + 1);
                }
            }
            Expr::Unary { op, expr: inner } => {
                let symbol = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                    UnaryOp::Plus => "+",
                };
                self.write(symbol);
                // `--$a` must not collide with the decrement token.
                let ambiguous = matches!(
                    (op, inner.as_ref()),
                    (
                        UnaryOp::Neg,
                        Expr::Unary {
                            op: UnaryOp::Neg,
                            ..
                        } | Expr::IncDec {
                            op: IncDecOp::Dec,
                            prefix: true,
                            ..
                        }
                    ) | (
                        UnaryOp::Plus,
                        Expr::Unary {
                            op: UnaryOp::Plus,
                            ..
                        } | Expr::IncDec {
                            op: IncDecOp::Inc,
                            prefix: true,
                            ..
                        }
                    )
                );
                if ambiguous {
                    self.write("(");
                    self.emit_expr_inner(inner);
                    self.write(")");
                } else {
                    self.emit_expr_prec(inner, PREC_UNARY);
                }
            }
            Expr::IncDec { op, prefix, var } => {
                let symbol = match op {
                    IncDecOp::Inc => "++",
                    IncDecOp::Dec => "--",
                };
                if *prefix {
                    self.write(symbol);
                    self.emit_expr_prec(var, PREC_ATOM);
                } else {
                    self.emit_expr_prec(var, PREC_ATOM);
                    self.write(symbol);
                }
            }
            Expr::Ternary { cond, then, r#else } => {
                self.emit_expr_prec(cond, PREC_COALESCE);
                match then {
                    Some(then) => {
                        self.write(" ? ");
                        self.emit_expr(then);
                        self.write(" : ");
                    }
                    None => self.write(" ?: "),
                }
                self.emit_expr_prec(r#else, PREC_TERNARY);
            }
            Expr::Cast { kind, expr: inner } => {
                let spelling = match kind {
                    CastKind::Int => "(int) ",
                    CastKind::Bool => "(bool) ",
                    CastKind::Double(DoubleCastKind::Double) => "(double) ",
                    CastKind::Double(DoubleCastKind::Float) => "(float) ",
                    CastKind::Double(DoubleCastKind::Real) => "(real) ",
                    CastKind::String => "(string) ",
                    CastKind::Array => "(array) ",
                    CastKind::Object => "(object) ",
                };
                self.write(spelling);
                self.emit_expr_prec(inner, PREC_UNARY);
            }
            Expr::Call { callee, args } => {
                match callee {
                    Callee::Name(name) => self.write(name),
                    Callee::Expr(inner) => self.emit_receiver(inner),
                }
                self.emit_args(args);
            }
            Expr::MethodCall {
                receiver,
                name,
                args,
            } => {
                self.emit_receiver(receiver);
                self.write("->");
                self.emit_object_member(name);
                self.emit_args(args);
            }
            Expr::StaticCall { class, name, args } => {
                self.emit_class_ref(class);
                self.write("::");
                self.emit_static_member(name);
                self.emit_args(args);
            }
            Expr::PropertyFetch { receiver, name } => {
                self.emit_receiver(receiver);
                self.write("->");
                self.emit_object_member(name);
            }
            Expr::StaticPropertyFetch { class, name } => {
                self.emit_class_ref(class);
                self.write("::$");
                self.write(name);
            }
            Expr::Index { target, index } => {
                self.emit_receiver(target);
                self.write("[");
                if let Some(index) = index {
                    self.emit_expr(index);
                }
                self.write("]");
            }
            Expr::New { class, args } => {
                self.write("new ");
                match class {
                    NewClassRef::Name(name) => {
                        self.write(name);
                        self.emit_args(args);
                    }
                    NewClassRef::Expr(inner) => {
                        self.emit_expr_prec(inner, PREC_ATOM);
                        self.emit_args(args);
                    }
                    NewClassRef::Anonymous(decl) => self.emit_anonymous_class(decl, args),
                }
            }
            Expr::Closure {
                by_ref,
                params,
                uses,
                return_type,
                body,
            } => {
                self.write("function ");
                if *by_ref {
                    self.write("&");
                }
                self.write("(");
                self.emit_params(params);
                self.write(")");
                if !uses.is_empty() {
                    self.write(" use (");
                    for (i, clos_use) in uses.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        if clos_use.by_ref {
                            self.write("&");
                        }
                        self.emit_expr(&clos_use.var);
                    }
                    self.write(")");
                }
                if let Some(TypeHint(text)) = return_type {
                    self.write(": ");
                    self.write(text);
                }
                self.write(" {");
                self.newline();
                self.indented(|p| p.emit_stmts(body));
                self.write_indent();
                self.write("}");
            }
            Expr::ArrowFn {
                by_ref,
                params,
                return_type,
                body,
            } => {
                self.write("fn");
                if *by_ref {
                    self.write("&");
                }
                self.write("(");
                self.emit_params(params);
                self.write(")");
                if let Some(TypeHint(text)) = return_type {
                    self.write(": ");
                    self.write(text);
                }
                self.write(" => ");
                self.emit_expr(body);
            }
            Expr::Exit { arg, .. } => {
                // Every historical spelling prints as `exit`; a missing
                // argument drops the parentheses too.
                self.write("exit");
                if let Some(arg) = arg {
                    self.write("(");
                    self.emit_expr(arg);
                    self.write(")");
                }
            }
        }
    }

    /// `new class(args) ... { members }` — the argument list sits between
    /// the keyword and the heritage clauses.
    fn emit_anonymous_class(&mut self, decl: &ClassDecl, args: &[Expr]) {
        self.write("class");
        if !args.is_empty() {
            self.emit_args(args);
        }
        if let Some(extends) = &decl.extends {
            self.write(" extends ");
            self.write(extends);
        }
        if !decl.implements.is_empty() {
            self.write(" implements ");
            for (i, name) in decl.implements.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(name);
            }
        }
        self.newline();
        self.write_indent();
        self.write("{");
        self.newline();
        self.indented(|p| p.emit_class_members(&decl.members));
        self.write_indent();
        self.write("}");
    }

    fn emit_var_name(&mut self, name: &VarName) {
        match name {
            VarName::Simple(name) => {
                self.write("$");
                self.write(name);
            }
            VarName::Dynamic(inner) => {
                self.write("${");
                self.emit_expr(inner);
                self.write("}");
            }
        }
    }

    /// A call/member-access receiver. `new` expressions are parenthesized so
    /// the printed form round-trips on every host version.
    fn emit_receiver(&mut self, receiver: &Expr) {
        if matches!(receiver, Expr::New { .. } | Expr::Closure { .. }) {
            self.write("(");
            self.emit_expr_inner(receiver);
            self.write(")");
        } else {
            self.emit_expr_prec(receiver, PREC_ATOM);
        }
    }

    /// `->name` member: computed names print inside braces.
    fn emit_object_member(&mut self, name: &MemberName) {
        match name {
            MemberName::Name(name) => self.write(name),
            MemberName::Expr(inner) => {
                self.write("{");
                self.emit_expr(inner);
                self.write("}");
            }
        }
    }

    /// `::name` member: a plain variable prints bare, other computed names
    /// print inside braces.
    fn emit_static_member(&mut self, name: &MemberName) {
        match name {
            MemberName::Name(name) => self.write(name),
            MemberName::Expr(inner) => match inner.as_ref() {
                Expr::Variable(var) => self.emit_var_name(var),
                other => {
                    self.write("{");
                    self.emit_expr(other);
                    self.write("}");
                }
            },
        }
    }

    fn emit_class_ref(&mut self, class: &ClassRef) {
        match class {
            ClassRef::Name(name) => self.write(name),
            ClassRef::Expr(inner) => self.emit_expr_prec(inner, PREC_ATOM),
        }
    }

    fn emit_args(&mut self, args: &[Expr]) {
        self.write("(");
        self.emit_comma_separated(args);
        self.write(")");
    }

    fn emit_interpolated(&mut self, parts: &[InterpPart]) {
        self.write_char('"');
        for part in parts {
            match part {
                InterpPart::Literal(text) => self.write_double_quoted_body(text),
                InterpPart::Expr(expr) => {
                    self.write("{");
                    self.emit_expr(expr);
                    self.write("}");
                }
            }
        }
        self.write_char('"');
    }
}
