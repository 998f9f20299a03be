//! The normalization pass: a single enter/leave walk over one file's AST.
//!
//! Enter-phase rules (renaming, single-node canonicalization) are safe
//! top-down; concatenation folding needs canonical children and runs at
//! leave time only. Statement-level removals (`;`, inline HTML) are applied
//! by the owner of the statement list.

use crate::mapping::{Category, Mapping};
use crate::parser::ast::*;

pub struct NormalizeVisitor<'m> {
    mapping: &'m mut Mapping,
}

impl<'m> NormalizeVisitor<'m> {
    pub fn new(mapping: &'m mut Mapping) -> NormalizeVisitor<'m> {
        NormalizeVisitor { mapping }
    }

    pub fn walk_program(&mut self, program: &mut Program) {
        self.walk_stmts(&mut program.stmts);
    }

    fn walk_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        for stmt in stmts.iter_mut() {
            self.walk_stmt(stmt);
        }
        // Empty statements and inline HTML leave no trace.
        stmts.retain(|stmt| !matches!(stmt.kind, StmtKind::Nop | StmtKind::InlineHtml(_)));
    }

    fn walk_stmt(&mut self, stmt: &mut Stmt) {
        stmt.comments.clear();
        match &mut stmt.kind {
            StmtKind::Expression(expr) => self.walk_expr(expr),
            StmtKind::Echo(exprs) => {
                for expr in exprs {
                    self.walk_expr(expr);
                }
            }
            StmtKind::Return(expr) => {
                if let Some(expr) = expr {
                    self.walk_expr(expr);
                }
            }
            StmtKind::If {
                cond,
                then,
                elseifs,
                r#else,
            } => {
                self.walk_expr(cond);
                self.walk_stmts(then);
                for (cond, body) in elseifs {
                    self.walk_expr(cond);
                    self.walk_stmts(body);
                }
                if let Some(body) = r#else {
                    self.walk_stmts(body);
                }
            }
            StmtKind::While { cond, body } => {
                self.walk_expr(cond);
                self.walk_stmts(body);
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                for expr in init.iter_mut().chain(cond.iter_mut()).chain(step.iter_mut()) {
                    self.walk_expr(expr);
                }
                self.walk_stmts(body);
            }
            StmtKind::Foreach {
                iter,
                key,
                value,
                body,
                ..
            } => {
                self.walk_expr(iter);
                if let Some(key) = key {
                    self.walk_expr(key);
                }
                self.walk_expr(value);
                self.walk_stmts(body);
            }
            StmtKind::Break | StmtKind::Continue | StmtKind::Nop | StmtKind::InlineHtml(_) => {}
            StmtKind::Block(body) => self.walk_stmts(body),
            StmtKind::Function(decl) => {
                decl.name = self.mapping.allocate(Category::Function, &decl.name);
                self.walk_params(&mut decl.params);
                self.walk_stmts(&mut decl.body);
            }
            StmtKind::Class(decl) => self.walk_class(decl),
        }
    }

    fn walk_class(&mut self, decl: &mut ClassDecl) {
        // Interfaces and anonymous classes keep their (non-)name.
        if decl.kind == ClassKind::Class {
            if let Some(name) = &decl.name {
                decl.name = Some(self.mapping.allocate(Category::Class, name));
            }
        }
        for member in &mut decl.members {
            member.comments.clear();
            match &mut member.kind {
                MemberKind::Const {
                    type_hint, entries, ..
                } => {
                    // The annotation is noise for grouping; the value is not.
                    *type_hint = None;
                    for entry in entries {
                        self.walk_expr(&mut entry.value);
                    }
                }
                MemberKind::Property { entries, .. } => {
                    for entry in entries {
                        if let Some(default) = &mut entry.default {
                            self.walk_expr(default);
                        }
                    }
                }
                MemberKind::Method(method) => {
                    method.modifiers |= Modifiers::PUBLIC;
                    method.modifiers &=
                        !(Modifiers::PRIVATE | Modifiers::PROTECTED | Modifiers::FINAL
                            | Modifiers::READONLY);
                    method.name = self.mapping.allocate(Category::Method, &method.name);
                    self.walk_params(&mut method.params);
                    if let Some(body) = &mut method.body {
                        self.walk_stmts(body);
                    }
                }
            }
        }
    }

    fn walk_params(&mut self, params: &mut [Param]) {
        for param in params {
            self.walk_expr(&mut param.var);
            if let Some(default) = &mut param.default {
                self.walk_expr(default);
            }
        }
    }

    fn walk_expr(&mut self, expr: &mut Expr) {
        // Interpolated strings rewrite to a concatenation chain first. As
        // with any replacement, the new node is not re-entered: its children
        // are walked and it is left. A one-part string therefore reduces to
        // the bare embedded expression, un-renamed.
        if let Expr::Interpolated { .. } = expr {
            let Expr::Interpolated { parts, .. } =
                std::mem::replace(expr, Expr::single_quoted(""))
            else {
                unreachable!("matched Interpolated above");
            };
            *expr = lower_interpolated(parts);
            self.walk_children(expr);
            self.leave_expr(expr);
            return;
        }

        self.enter_expr(expr);
        self.walk_children(expr);
        self.leave_expr(expr);
    }

    fn walk_children(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Variable(VarName::Dynamic(inner)) => self.walk_expr(inner),
            Expr::Variable(VarName::Simple(_))
            | Expr::String { .. }
            | Expr::Int { .. }
            | Expr::Float { .. }
            | Expr::ConstFetch(_)
            | Expr::StaticPropertyFetch { .. } => {}
            Expr::Interpolated { .. } => unreachable!("rewritten before enter"),
            Expr::ClassConstFetch { class, .. } => self.walk_class_ref(class),
            Expr::Array { items, .. } => {
                for item in items {
                    if let Some(key) = &mut item.key {
                        self.walk_expr(key);
                    }
                    self.walk_expr(&mut item.value);
                }
            }
            Expr::Assign { target, value, .. } => {
                self.walk_expr(target);
                self.walk_expr(value);
            }
            Expr::Binary { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            Expr::Unary { expr: inner, .. } | Expr::Cast { expr: inner, .. } => {
                self.walk_expr(inner)
            }
            Expr::IncDec { var, .. } => self.walk_expr(var),
            Expr::Ternary { cond, then, r#else } => {
                self.walk_expr(cond);
                if let Some(then) = then {
                    self.walk_expr(then);
                }
                self.walk_expr(r#else);
            }
            Expr::Call { callee, args } => {
                if let Callee::Expr(inner) = callee {
                    self.walk_expr(inner);
                }
                self.walk_exprs(args);
            }
            Expr::MethodCall {
                receiver,
                name,
                args,
            } => {
                self.walk_expr(receiver);
                self.walk_member_name(name);
                self.walk_exprs(args);
            }
            Expr::StaticCall { class, name, args } => {
                self.walk_class_ref(class);
                self.walk_member_name(name);
                self.walk_exprs(args);
            }
            Expr::PropertyFetch { receiver, name } => {
                self.walk_expr(receiver);
                self.walk_member_name(name);
            }
            Expr::Index { target, index } => {
                self.walk_expr(target);
                if let Some(index) = index {
                    self.walk_expr(index);
                }
            }
            Expr::New { class, args } => {
                match class {
                    NewClassRef::Name(_) => {}
                    NewClassRef::Expr(inner) => self.walk_expr(inner),
                    NewClassRef::Anonymous(decl) => self.walk_class(decl),
                }
                self.walk_exprs(args);
            }
            Expr::Closure {
                params, uses, body, ..
            } => {
                self.walk_params(params);
                for clos_use in uses {
                    self.walk_expr(&mut clos_use.var);
                }
                self.walk_stmts(body);
            }
            Expr::ArrowFn { params, body, .. } => {
                self.walk_params(params);
                self.walk_expr(body);
            }
            Expr::Exit { arg, .. } => {
                if let Some(arg) = arg {
                    self.walk_expr(arg);
                }
            }
        }
    }

    fn walk_exprs(&mut self, exprs: &mut [Expr]) {
        for expr in exprs {
            self.walk_expr(expr);
        }
    }

    /// Top-down canonicalizations: renames and spelling-kind resets.
    fn enter_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Variable(VarName::Simple(name)) => {
                *name = self.mapping.allocate(Category::Variable, name);
            }
            Expr::String { kind, .. } => *kind = StringKind::SingleQuoted,
            Expr::Array { kind, .. } => *kind = ArrayKind::Short,
            Expr::Exit { kind, .. } => *kind = ExitKind::Exit,
            Expr::Cast { kind, .. } => {
                if let CastKind::Double(spelling) = kind {
                    *spelling = DoubleCastKind::Double;
                }
            }
            Expr::Call {
                callee: Callee::Name(name),
                ..
            } => {
                *name = self.mapping.allocate(Category::Function, name);
            }
            Expr::New {
                class: NewClassRef::Name(name),
                ..
            } => {
                *name = self.mapping.allocate(Category::Class, name);
            }
            Expr::MethodCall {
                name: MemberName::Name(name),
                ..
            } => {
                *name = self.mapping.allocate(Category::Method, name);
            }
            Expr::StaticCall { class, name, .. } => {
                if let ClassRef::Name(class_name) = class {
                    *class_name = self.mapping.allocate(Category::Class, class_name);
                }
                if let MemberName::Name(method_name) = name {
                    *method_name = self.mapping.allocate(Category::Method, method_name);
                }
            }
            _ => {}
        }
    }

    /// Bottom-up canonicalization: concatenation folding.
    fn leave_expr(&mut self, expr: &mut Expr) {
        if matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Concat,
                ..
            }
        ) {
            let concat = std::mem::replace(expr, Expr::single_quoted(""));
            *expr = fold_concat(concat);
        }
    }

    fn walk_class_ref(&mut self, class: &mut ClassRef) {
        if let ClassRef::Expr(inner) = class {
            self.walk_expr(inner);
        }
    }

    fn walk_member_name(&mut self, name: &mut MemberName) {
        if let MemberName::Expr(inner) = name {
            self.walk_expr(inner);
        }
    }
}

/// Rewrite an interpolated string into an explicit left-to-right chain of
/// literal segments and embedded expressions. A one-part string reduces to
/// that part alone.
fn lower_interpolated(parts: Vec<InterpPart>) -> Expr {
    let mut operands = parts.into_iter().map(|part| match part {
        InterpPart::Literal(text) => Expr::single_quoted(text),
        InterpPart::Expr(expr) => expr,
    });
    let first = operands
        .next()
        .expect("interpolated string has at least one part");
    operands.fold(first, |left, right| Expr::Binary {
        op: BinaryOp::Concat,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Flatten an arbitrarily nested concatenation into its operand sequence,
/// merge adjacent literal runs, and rebuild left-associative. Concatenation
/// is associative for the resulting value, so the canonical form must not
/// depend on the original grouping.
fn fold_concat(concat: Expr) -> Expr {
    let mut operands = Vec::new();
    flatten_concat(concat, &mut operands);
    assert!(!operands.is_empty(), "concatenation with zero operands");

    let mut reduced: Vec<Expr> = Vec::with_capacity(operands.len());
    for operand in operands {
        match (reduced.last_mut(), operand) {
            (
                Some(Expr::String { value: merged, .. }),
                Expr::String { value, .. },
            ) => {
                merged.push_str(&value);
            }
            (_, operand) => reduced.push(operand),
        }
    }

    let mut result = reduced.remove(0);
    for right in reduced {
        result = Expr::Binary {
            op: BinaryOp::Concat,
            left: Box::new(result),
            right: Box::new(right),
        };
    }
    result
}

fn flatten_concat(expr: Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Binary {
            op: BinaryOp::Concat,
            left,
            right,
        } => {
            flatten_concat(*left, out);
            flatten_concat(*right, out);
        }
        other => out.push(other),
    }
}
