//! The interleaved semantic analyser.
//!
//! Owns the compile-time type stack and the lvalue/rvalue flag; the
//! declaration and label state lives in the shared pool, which every
//! method borrows from the parser.

use impi_lex::TokenKind;
use impi_util::{Pool, SemanticError, ValueKind};

/// Compile-time validator for declarations, labels, and operators.
///
/// The type stack holds one [`ValueKind`] per value the emitted program
/// will have on its operand stack at the same point. `rvalue` tracks
/// whether the most recent expression produced a computed value; only a
/// freshly referenced identifier may be assigned to.
#[derive(Debug, Default)]
pub struct Analyzer {
    type_stack: Vec<ValueKind>,
    rvalue: bool,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            type_stack: Vec::new(),
            rvalue: true,
        }
    }

    /// Records a declaration. Fails when the name was already declared.
    pub fn declare(
        &mut self,
        pool: &mut Pool,
        id: u32,
        kind: ValueKind,
        line: u32,
    ) -> Result<(), SemanticError> {
        if pool.vars.get(id).declared {
            return Err(self.variable_error(pool, id, line, "declared twice"));
        }
        let var = pool.vars.get_mut(id);
        var.declared = true;
        var.kind = Some(kind);
        Ok(())
    }

    /// Checks that `id` has been declared and returns its kind.
    pub fn check_declared(
        &self,
        pool: &Pool,
        id: u32,
        line: u32,
    ) -> Result<ValueKind, SemanticError> {
        match pool.vars.get(id).kind {
            Some(kind) if pool.vars.get(id).declared => Ok(kind),
            _ => Err(self.variable_error(pool, id, line, "is not declared")),
        }
    }

    /// Validates a declaration initialiser (`int a = 1`): the constant
    /// kind must be assignable to the declared kind. Marks the variable
    /// assigned.
    pub fn init(
        &mut self,
        pool: &mut Pool,
        id: u32,
        const_kind: ValueKind,
        line: u32,
    ) -> Result<(), SemanticError> {
        let decl_kind = self.check_declared(pool, id, line)?;
        if !assignable(decl_kind, const_kind) {
            let message = format!("cannot be initialised with a {} constant", const_kind);
            return Err(self.variable_error(pool, id, line, &message));
        }
        pool.vars.get_mut(id).assigned = true;
        Ok(())
    }

    /// Records a label definition at instruction index `target`. A label
    /// may be defined at most once.
    pub fn define_label(
        &mut self,
        pool: &mut Pool,
        id: u32,
        target: u32,
        line: u32,
    ) -> Result<(), SemanticError> {
        if pool.labels.get(id).defined {
            return Err(SemanticError {
                line,
                subject: format!("label '{}'", pool.labels.name(id)),
                message: "defined twice".to_string(),
            });
        }
        let label = pool.labels.get_mut(id);
        label.defined = true;
        label.target = target;
        Ok(())
    }

    /// Mirrors an emitted operand onto the type stack. Identifier
    /// references are lvalues; constants are not.
    pub fn push_operand(&mut self, kind: ValueKind, is_lvalue: bool) {
        self.type_stack.push(kind);
        self.rvalue = !is_lvalue;
    }

    /// Checks that the expression so far names an assignable variable.
    pub fn require_lvalue(&mut self, line: u32) -> Result<(), SemanticError> {
        if self.rvalue {
            return Err(SemanticError {
                line,
                subject: "operator '='".to_string(),
                message: "needs a variable on the left side".to_string(),
            });
        }
        Ok(())
    }

    /// Mirrors an emitted operator: pops its operand kinds, checks the
    /// combination, and pushes the result kind.
    pub fn apply(&mut self, op: TokenKind, line: u32) -> Result<(), SemanticError> {
        match op {
            TokenKind::Not => {
                self.rvalue = true;
                if self.top() != ValueKind::Int {
                    return Err(self.operator_error(op, line, "requires an int operand"));
                }
            }
            TokenKind::UnaryPlus | TokenKind::UnaryMinus => {
                self.rvalue = true;
                if self.top() == ValueKind::Str {
                    return Err(self.operator_error(op, line, "applied to a string operand"));
                }
            }
            TokenKind::FalseGo | TokenKind::TrueGo => {
                if self.top() != ValueKind::Int {
                    return Err(SemanticError {
                        line,
                        subject: "condition".to_string(),
                        message: "must have int type".to_string(),
                    });
                }
                self.pop();
            }
            TokenKind::Drop | TokenKind::Write => {
                self.pop();
            }
            TokenKind::Multiply | TokenKind::Divide | TokenKind::Minus => {
                self.rvalue = true;
                let rhs = self.pop();
                let lhs = self.pop();
                if lhs == ValueKind::Str || rhs == ValueKind::Str {
                    return Err(self.operator_error(op, line, "applied to a string operand"));
                }
                self.type_stack.push(numeric_result(lhs, rhs));
            }
            TokenKind::Plus => {
                self.rvalue = true;
                let rhs = self.pop();
                let lhs = self.pop();
                match (lhs, rhs) {
                    (ValueKind::Str, ValueKind::Str) => self.type_stack.push(ValueKind::Str),
                    (ValueKind::Str, _) | (_, ValueKind::Str) => {
                        return Err(self.operator_error(
                            op,
                            line,
                            "applied to mixed string and numeric operands",
                        ));
                    }
                    _ => self.type_stack.push(numeric_result(lhs, rhs)),
                }
            }
            kind if kind.is_comparison() => {
                self.rvalue = true;
                let rhs = self.pop();
                let lhs = self.pop();
                if (lhs == ValueKind::Str) != (rhs == ValueKind::Str) {
                    return Err(self.operator_error(
                        op,
                        line,
                        "applied to mixed string and numeric operands",
                    ));
                }
                self.type_stack.push(ValueKind::Int);
            }
            TokenKind::And | TokenKind::Or => {
                self.rvalue = true;
                let rhs = self.pop();
                let lhs = self.pop();
                if lhs != ValueKind::Int || rhs != ValueKind::Int {
                    return Err(self.operator_error(op, line, "requires int operands"));
                }
                self.type_stack.push(ValueKind::Int);
            }
            TokenKind::Assign => {
                self.rvalue = true;
                let rhs = self.pop();
                let lhs = self.pop();
                if !assignable(lhs, rhs) {
                    return Err(self.operator_error(
                        op,
                        line,
                        "assigns between string and numeric operands",
                    ));
                }
                self.type_stack.push(lhs);
            }
            other => unreachable!("{:?} is not a checkable operator", other),
        }
        Ok(())
    }

    /// Ends a statement: the stack must have drained back to empty.
    pub fn finish_statement(&mut self) {
        debug_assert!(
            self.type_stack.is_empty(),
            "type stack not empty between statements: {:?}",
            self.type_stack
        );
        self.type_stack.clear();
        self.rvalue = true;
    }

    /// Current stack height, used by parser invariant checks.
    pub fn depth(&self) -> usize {
        self.type_stack.len()
    }

    fn top(&self) -> ValueKind {
        *self.type_stack.last().expect("type stack underflow")
    }

    fn pop(&mut self) -> ValueKind {
        self.type_stack.pop().expect("type stack underflow")
    }

    fn variable_error(&self, pool: &Pool, id: u32, line: u32, message: &str) -> SemanticError {
        SemanticError {
            line,
            subject: format!("variable '{}'", pool.vars.name(id)),
            message: message.to_string(),
        }
    }

    fn operator_error(&self, op: TokenKind, line: u32, message: &str) -> SemanticError {
        SemanticError {
            line,
            subject: format!("operator {}", op.describe()),
            message: message.to_string(),
        }
    }
}

/// Result kind of an arithmetic operator on two numeric operands.
fn numeric_result(lhs: ValueKind, rhs: ValueKind) -> ValueKind {
    if lhs == ValueKind::Int && rhs == ValueKind::Int {
        ValueKind::Int
    } else {
        ValueKind::Real
    }
}

/// Assignment compatibility: strings only pair with strings, the two
/// numeric kinds convert freely (the machine widens or truncates).
fn assignable(dst: ValueKind, src: ValueKind) -> bool {
    (dst == ValueKind::Str) == (src == ValueKind::Str)
}
