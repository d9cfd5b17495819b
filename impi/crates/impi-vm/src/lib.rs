//! impi-vm - Postfix Virtual Machine
//!
//! Executes the instruction buffer the parser emitted: a linear scan with
//! an instruction pointer and one operand stack of tokens. Operand kinds
//! push themselves; operator kinds pop their operands, compute, and push
//! a result or redirect the instruction pointer.
//!
//! VALUE MODEL:
//! ------------
//! Values on the operand stack are tokens. An `IntConst` carries its
//! value inline (a `u32` payload read as two's-complement `i32`); a
//! `RealConst` or `StrConst` carries a pool index. Identifier tokens stay
//! unresolved on the stack until an operator consumes them, at which
//! point they resolve through the variable table; using a variable that
//! was never assigned is a runtime fault. Arithmetic results that leave
//! the int domain append fresh pool entries, so pool indices taken
//! earlier stay valid.
//!
//! The machine is generic over its input and output endpoints. The
//! driver connects the locked stdin/stdout; tests connect byte buffers.

mod edge_cases;
mod exec;

pub use exec::Vm;
