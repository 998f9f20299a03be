//! Statement and declaration printing.

use super::Printer;
use crate::parser::ast::*;

impl Printer {
    pub(super) fn emit_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.emit_stmt(stmt);
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        if matches!(stmt.kind, StmtKind::Nop) {
            return;
        }
        for comment in &stmt.comments {
            self.write_indent();
            self.write(comment);
            self.newline();
        }
        if let StmtKind::InlineHtml(text) = &stmt.kind {
            self.write(text);
            self.newline();
            return;
        }
        self.write_indent();
        self.emit_stmt_kind(&stmt.kind);
        self.newline();
    }

    fn emit_stmt_kind(&mut self, kind: &StmtKind) {
        match kind {
            StmtKind::Expression(expr) => {
                self.emit_expr(expr);
                self.write(";");
            }
            StmtKind::Echo(exprs) => {
                self.write("echo ");
                self.emit_comma_separated(exprs);
                self.write(";");
            }
            StmtKind::Return(expr) => {
                self.write("return");
                if let Some(expr) = expr {
                    self.write(" ");
                    self.emit_expr(expr);
                }
                self.write(";");
            }
            StmtKind::If {
                cond,
                then,
                elseifs,
                r#else,
            } => {
                self.write("if (");
                self.emit_expr(cond);
                self.write(") {");
                self.newline();
                self.indented(|p| p.emit_stmts(then));
                self.write_indent();
                self.write("}");
                for (cond, body) in elseifs {
                    self.write(" elseif (");
                    self.emit_expr(cond);
                    self.write(") {");
                    self.newline();
                    self.indented(|p| p.emit_stmts(body));
                    self.write_indent();
                    self.write("}");
                }
                if let Some(body) = r#else {
                    self.write(" else {");
                    self.newline();
                    self.indented(|p| p.emit_stmts(body));
                    self.write_indent();
                    self.write("}");
                }
            }
            StmtKind::While { cond, body } => {
                self.write("while (");
                self.emit_expr(cond);
                self.write(") {");
                self.newline();
                self.indented(|p| p.emit_stmts(body));
                self.write_indent();
                self.write("}");
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                self.write("for (");
                self.emit_comma_separated(init);
                self.write("; ");
                self.emit_comma_separated(cond);
                self.write("; ");
                self.emit_comma_separated(step);
                self.write(") {");
                self.newline();
                self.indented(|p| p.emit_stmts(body));
                self.write_indent();
                self.write("}");
            }
            StmtKind::Foreach {
                iter,
                key,
                by_ref,
                value,
                body,
            } => {
                self.write("foreach (");
                self.emit_expr(iter);
                self.write(" as ");
                if let Some(key) = key {
                    self.emit_expr(key);
                    self.write(" => ");
                }
                if *by_ref {
                    self.write("&");
                }
                self.emit_expr(value);
                self.write(") {");
                self.newline();
                self.indented(|p| p.emit_stmts(body));
                self.write_indent();
                self.write("}");
            }
            StmtKind::Break => self.write("break;"),
            StmtKind::Continue => self.write("continue;"),
            StmtKind::Block(body) => {
                self.write("{");
                self.newline();
                self.indented(|p| p.emit_stmts(body));
                self.write_indent();
                self.write("}");
            }
            StmtKind::Function(decl) => self.emit_function_decl(decl),
            StmtKind::Class(decl) => self.emit_class_decl(decl),
            StmtKind::Nop => {}
            StmtKind::InlineHtml(_) => unreachable!("handled in emit_stmt"),
        }
    }

    fn emit_function_decl(&mut self, decl: &FunctionDecl) {
        self.write("function ");
        if decl.by_ref {
            self.write("&");
        }
        self.write(&decl.name);
        self.write("(");
        self.emit_params(&decl.params);
        self.write(")");
        if let Some(TypeHint(text)) = &decl.return_type {
            self.write(": ");
            self.write(text);
        }
        self.newline();
        self.write_indent();
        self.write("{");
        self.newline();
        self.indented(|p| p.emit_stmts(&decl.body));
        self.write_indent();
        self.write("}");
    }

    pub(super) fn emit_class_decl(&mut self, decl: &ClassDecl) {
        self.write_modifiers(decl.modifiers);
        match decl.kind {
            ClassKind::Class => self.write("class"),
            ClassKind::Interface => self.write("interface"),
        }
        if let Some(name) = &decl.name {
            self.write(" ");
            self.write(name);
        }
        if let Some(extends) = &decl.extends {
            self.write(" extends ");
            self.write(extends);
        }
        if !decl.implements.is_empty() {
            // For interfaces the parent list is spelled `extends`.
            match decl.kind {
                ClassKind::Class => self.write(" implements "),
                ClassKind::Interface => self.write(" extends "),
            }
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

    pub(super) fn emit_class_members(&mut self, members: &[ClassMember]) {
        for member in members {
            for comment in &member.comments {
                self.write_indent();
                self.write(comment);
                self.newline();
            }
            self.write_indent();
            self.emit_member_kind(&member.kind);
            self.newline();
        }
    }

    fn emit_member_kind(&mut self, kind: &MemberKind) {
        match kind {
            MemberKind::Const {
                modifiers,
                type_hint,
                entries,
            } => {
                self.write_modifiers(*modifiers);
                self.write("const ");
                if let Some(TypeHint(text)) = type_hint {
                    self.write(text);
                    self.write(" ");
                }
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write(&entry.name);
                    self.write(" = ");
                    self.emit_expr(&entry.value);
                }
                self.write(";");
            }
            MemberKind::Property {
                modifiers,
                type_hint,
                entries,
            } => {
                self.write_modifiers(*modifiers);
                if let Some(TypeHint(text)) = type_hint {
                    self.write(text);
                    self.write(" ");
                }
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write("$");
                    self.write(&entry.name);
                    if let Some(default) = &entry.default {
                        self.write(" = ");
                        self.emit_expr(default);
                    }
                }
                self.write(";");
            }
            MemberKind::Method(method) => {
                self.write_modifiers(method.modifiers);
                self.write("function ");
                if method.by_ref {
                    self.write("&");
                }
                self.write(&method.name);
                self.write("(");
                self.emit_params(&method.params);
                self.write(")");
                if let Some(TypeHint(text)) = &method.return_type {
                    self.write(": ");
                    self.write(text);
                }
                match &method.body {
                    Some(body) => {
                        self.newline();
                        self.write_indent();
                        self.write("{");
                        self.newline();
                        self.indented(|p| p.emit_stmts(body));
                        self.write_indent();
                        self.write("}");
                    }
                    None => self.write(";"),
                }
            }
        }
    }

    pub(super) fn emit_params(&mut self, params: &[Param]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write_modifiers(param.modifiers);
            if let Some(TypeHint(text)) = &param.type_hint {
                self.write(text);
                self.write(" ");
            }
            if param.by_ref {
                self.write("&");
            }
            if param.variadic {
                self.write("...");
            }
            self.emit_expr(&param.var);
            if let Some(default) = &param.default {
                self.write(" = ");
                self.emit_expr(default);
            }
        }
    }

    pub(super) fn emit_comma_separated(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(expr);
        }
    }
}
