//! The execution loop and instruction handlers.

use std::io::{BufRead, Write};

use impi_lex::{Token, TokenKind};
use impi_util::{Pool, RuntimeFault, ValueKind};

/// The postfix machine.
///
/// `R` supplies the program's `read` input, `W` receives its `write`
/// output. One `Vm` runs one program; the operand stack lives for the
/// whole execution and must be empty when the instruction pointer falls
/// off the end of the buffer.
pub struct Vm<R, W> {
    input: R,
    output: W,
    stack: Vec<Token>,
}

impl<R: BufRead, W: Write> Vm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            stack: Vec::new(),
        }
    }

    /// Runs `code` against `pool` until the instruction pointer reaches
    /// the end of the buffer.
    pub fn run(&mut self, code: &[Token], pool: &mut Pool) -> Result<(), RuntimeFault> {
        let mut ip = 0usize;
        while let Some(&token) = code.get(ip) {
            match token.kind {
                TokenKind::Id
                | TokenKind::IntConst
                | TokenKind::RealConst
                | TokenKind::StrConst
                | TokenKind::Label => self.stack.push(token),

                TokenKind::Go => {
                    ip = self.pop_target();
                    continue;
                }
                TokenKind::FalseGo => {
                    let target = self.pop_target();
                    let cond = resolve(pool, self.pop())?;
                    if int_val(cond) == 0 {
                        ip = target;
                        continue;
                    }
                }
                TokenKind::TrueGo => {
                    let target = self.pop_target();
                    let cond = resolve(pool, self.pop())?;
                    if int_val(cond) != 0 {
                        ip = target;
                        continue;
                    }
                }

                TokenKind::Plus => self.add(pool, token.line)?,
                TokenKind::Minus => self.numeric(pool, token.line, i32::wrapping_sub, |a, b| a - b)?,
                TokenKind::Multiply => {
                    self.numeric(pool, token.line, i32::wrapping_mul, |a, b| a * b)?
                }
                TokenKind::Divide => self.divide(pool, token.line)?,
                TokenKind::UnaryPlus => {
                    let value = resolve(pool, self.pop())?;
                    self.stack.push(value);
                }
                TokenKind::UnaryMinus => self.negate(pool, token.line)?,

                kind if kind.is_comparison() => self.compare(pool, token.line, kind)?,
                TokenKind::Not => {
                    let value = resolve(pool, self.pop())?;
                    let result = (int_val(value) == 0) as u32;
                    self.stack.push(Token::new(TokenKind::IntConst, token.line, result));
                }
                TokenKind::And | TokenKind::Or => self.logical(pool, token.line, token.kind)?,

                TokenKind::Assign => self.assign(pool)?,
                TokenKind::Drop => {
                    self.pop();
                }
                TokenKind::Read => self.read(pool)?,
                TokenKind::Write => self.write(pool)?,

                other => unreachable!("{:?} is not an executable instruction", other),
            }
            ip += 1;
        }

        debug_assert!(
            self.stack.is_empty(),
            "operand stack not empty at termination: {:?}",
            self.stack
        );
        Ok(())
    }

    // ---- handlers -------------------------------------------------------

    /// Addition: int stays int, strings concatenate, anything else
    /// widens to real.
    fn add(&mut self, pool: &mut Pool, line: u32) -> Result<(), RuntimeFault> {
        let rhs = resolve(pool, self.pop())?;
        let lhs = resolve(pool, self.pop())?;
        let result = match (lhs.kind, rhs.kind) {
            (TokenKind::IntConst, TokenKind::IntConst) => {
                let value = int_val(lhs).wrapping_add(int_val(rhs));
                Token::new(TokenKind::IntConst, line, value as u32)
            }
            (TokenKind::StrConst, TokenKind::StrConst) => {
                let joined = format!(
                    "{}{}",
                    pool.strings.get(lhs.value),
                    pool.strings.get(rhs.value)
                );
                Token::new(TokenKind::StrConst, line, pool.strings.push(joined))
            }
            _ => {
                let value = real_val(pool, lhs) + real_val(pool, rhs);
                Token::new(TokenKind::RealConst, line, pool.reals.push(value))
            }
        };
        self.stack.push(result);
        Ok(())
    }

    /// Shared path for subtraction and multiplication.
    fn numeric(
        &mut self,
        pool: &mut Pool,
        line: u32,
        int_op: fn(i32, i32) -> i32,
        real_op: fn(f64, f64) -> f64,
    ) -> Result<(), RuntimeFault> {
        let rhs = resolve(pool, self.pop())?;
        let lhs = resolve(pool, self.pop())?;
        let result = if both_int(lhs, rhs) {
            let value = int_op(int_val(lhs), int_val(rhs));
            Token::new(TokenKind::IntConst, line, value as u32)
        } else {
            let value = real_op(real_val(pool, lhs), real_val(pool, rhs));
            Token::new(TokenKind::RealConst, line, pool.reals.push(value))
        };
        self.stack.push(result);
        Ok(())
    }

    /// Division faults on a zero divisor; int division truncates.
    fn divide(&mut self, pool: &mut Pool, line: u32) -> Result<(), RuntimeFault> {
        let rhs = resolve(pool, self.pop())?;
        let lhs = resolve(pool, self.pop())?;
        let result = if both_int(lhs, rhs) {
            let divisor = int_val(rhs);
            if divisor == 0 {
                return Err(RuntimeFault::DivisionByZero { line });
            }
            let value = int_val(lhs).wrapping_div(divisor);
            Token::new(TokenKind::IntConst, line, value as u32)
        } else {
            let divisor = real_val(pool, rhs);
            if divisor == 0.0 {
                return Err(RuntimeFault::DivisionByZero { line });
            }
            let value = real_val(pool, lhs) / divisor;
            Token::new(TokenKind::RealConst, line, pool.reals.push(value))
        };
        self.stack.push(result);
        Ok(())
    }

    fn negate(&mut self, pool: &mut Pool, line: u32) -> Result<(), RuntimeFault> {
        let value = resolve(pool, self.pop())?;
        let result = if value.kind == TokenKind::IntConst {
            Token::new(TokenKind::IntConst, line, int_val(value).wrapping_neg() as u32)
        } else {
            let negated = -real_val(pool, value);
            Token::new(TokenKind::RealConst, line, pool.reals.push(negated))
        };
        self.stack.push(result);
        Ok(())
    }

    /// Comparisons: lexicographic on strings, by value on numerics.
    /// The result is 0 or 1 as an int.
    fn compare(&mut self, pool: &mut Pool, line: u32, op: TokenKind) -> Result<(), RuntimeFault> {
        let rhs = resolve(pool, self.pop())?;
        let lhs = resolve(pool, self.pop())?;
        let truth = if lhs.kind == TokenKind::StrConst && rhs.kind == TokenKind::StrConst {
            let a = pool.strings.get(lhs.value);
            let b = pool.strings.get(rhs.value);
            match op {
                TokenKind::Eq => a == b,
                TokenKind::Neq => a != b,
                TokenKind::Less => a < b,
                TokenKind::Greater => a > b,
                TokenKind::Leq => a <= b,
                TokenKind::Geq => a >= b,
                _ => unreachable!(),
            }
        } else {
            let a = real_val(pool, lhs);
            let b = real_val(pool, rhs);
            match op {
                TokenKind::Eq => a == b,
                TokenKind::Neq => a != b,
                TokenKind::Less => a < b,
                TokenKind::Greater => a > b,
                TokenKind::Leq => a <= b,
                TokenKind::Geq => a >= b,
                _ => unreachable!(),
            }
        };
        self.stack
            .push(Token::new(TokenKind::IntConst, line, truth as u32));
        Ok(())
    }

    /// `and`/`or` evaluate both operands; there is no short-circuit in
    /// the emitted code.
    fn logical(&mut self, pool: &mut Pool, line: u32, op: TokenKind) -> Result<(), RuntimeFault> {
        let rhs = resolve(pool, self.pop())?;
        let lhs = resolve(pool, self.pop())?;
        let a = int_val(lhs) != 0;
        let b = int_val(rhs) != 0;
        let truth = if op == TokenKind::And { a && b } else { a || b };
        self.stack
            .push(Token::new(TokenKind::IntConst, line, truth as u32));
        Ok(())
    }

    /// Stores the source value into the destination variable, converting
    /// per the destination's declared kind, and pushes the destination
    /// back: an assignment is an expression.
    fn assign(&mut self, pool: &mut Pool) -> Result<(), RuntimeFault> {
        let src = resolve(pool, self.pop())?;
        let dst = self.pop();
        debug_assert_eq!(dst.kind, TokenKind::Id, "assign destination must be an identifier");

        let kind = var_kind(pool, dst.value);
        let cell = match kind {
            ValueKind::Str => src.value,
            ValueKind::Real => {
                if src.kind == TokenKind::RealConst {
                    src.value
                } else {
                    pool.reals.push(int_val(src) as f64)
                }
            }
            ValueKind::Int => {
                if src.kind == TokenKind::RealConst {
                    // Truncates toward zero.
                    pool.reals.get(src.value) as i32 as u32
                } else {
                    src.value
                }
            }
        };

        let var = pool.vars.get_mut(dst.value);
        var.cell = cell;
        var.assigned = true;
        self.stack.push(dst);
        Ok(())
    }

    /// Reads one whitespace-delimited word and parses it per the
    /// destination's declared kind.
    fn read(&mut self, pool: &mut Pool) -> Result<(), RuntimeFault> {
        let dst = self.pop();
        debug_assert_eq!(dst.kind, TokenKind::Id, "read destination must be an identifier");
        let name = pool.vars.name(dst.value).to_string();

        let word = self
            .next_word()?
            .ok_or(RuntimeFault::InputExhausted { name: name.clone() })?;

        let kind = var_kind(pool, dst.value);
        let cell = match kind {
            ValueKind::Int => {
                let value: i32 = word.parse().map_err(|_| RuntimeFault::InputParse {
                    name: name.clone(),
                    kind,
                    input: word.clone(),
                })?;
                value as u32
            }
            ValueKind::Real => {
                let value: f64 = word.parse().map_err(|_| RuntimeFault::InputParse {
                    name: name.clone(),
                    kind,
                    input: word.clone(),
                })?;
                pool.reals.push(value)
            }
            ValueKind::Str => pool.strings.push(word),
        };

        let var = pool.vars.get_mut(dst.value);
        var.cell = cell;
        var.assigned = true;
        Ok(())
    }

    /// Prints one value followed by a newline.
    fn write(&mut self, pool: &mut Pool) -> Result<(), RuntimeFault> {
        let value = resolve(pool, self.pop())?;
        match value.kind {
            TokenKind::IntConst => writeln!(self.output, "{}", int_val(value))?,
            TokenKind::RealConst => writeln!(self.output, "{}", pool.reals.get(value.value))?,
            TokenKind::StrConst => writeln!(self.output, "{}", pool.strings.get(value.value))?,
            other => unreachable!("{:?} is not a printable value", other),
        }
        Ok(())
    }

    // ---- stack and input plumbing ---------------------------------------

    fn pop(&mut self) -> Token {
        self.stack.pop().expect("operand stack underflow")
    }

    /// Pops a `Label` operand and returns its jump target.
    fn pop_target(&mut self) -> usize {
        let label = self.pop();
        debug_assert_eq!(label.kind, TokenKind::Label, "jump needs a label operand");
        label.value as usize
    }

    /// Pulls the next whitespace-delimited word off the input stream.
    fn next_word(&mut self) -> Result<Option<String>, RuntimeFault> {
        let mut word = Vec::new();
        loop {
            let buffer = self.input.fill_buf()?;
            if buffer.is_empty() {
                break;
            }
            let mut consumed = 0;
            let mut done = false;
            for &byte in buffer {
                if byte.is_ascii_whitespace() {
                    consumed += 1;
                    if !word.is_empty() {
                        done = true;
                        break;
                    }
                } else {
                    word.push(byte);
                    consumed += 1;
                }
            }
            self.input.consume(consumed);
            if done {
                break;
            }
        }
        if word.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&word).into_owned()))
        }
    }
}

// ---- value helpers ------------------------------------------------------

/// Resolves an identifier token to its current value token; other tokens
/// pass through unchanged.
fn resolve(pool: &Pool, token: Token) -> Result<Token, RuntimeFault> {
    if token.kind != TokenKind::Id {
        return Ok(token);
    }
    let var = pool.vars.get(token.value);
    if !var.assigned {
        return Err(RuntimeFault::UnassignedVariable {
            name: pool.vars.name(token.value).to_string(),
            line: token.line,
        });
    }
    let kind = TokenKind::const_for(var.kind.expect("declared variable has a kind"));
    Ok(Token::new(kind, token.line, var.cell))
}

fn var_kind(pool: &Pool, id: u32) -> ValueKind {
    pool.vars.get(id).kind.expect("declared variable has a kind")
}

fn int_val(token: Token) -> i32 {
    token.value as i32
}

fn real_val(pool: &Pool, token: Token) -> f64 {
    if token.kind == TokenKind::RealConst {
        pool.reals.get(token.value)
    } else {
        f64::from(int_val(token))
    }
}

fn both_int(lhs: Token, rhs: Token) -> bool {
    lhs.kind == TokenKind::IntConst && rhs.kind == TokenKind::IntConst
}
