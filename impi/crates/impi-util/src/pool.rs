//! Symbol and literal pool.
//!
//! One [`Pool`] instance owns everything the phases share: the interned
//! identifier descriptors, the interned label descriptors, and the
//! append-only real/string constant pools. Names are interned on first
//! lexical occurrence; constants are appended and addressed by index.
//! Indices never shift and pool entries are never overwritten, so a `u32`
//! taken out of a token payload remains valid for the whole run.

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::BuildHasherDefault;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// The three primitive kinds of the source language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 32-bit signed integer.
    Int,
    /// 64-bit float, stored in the real pool.
    Real,
    /// Byte string, stored in the string pool.
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Int => write!(f, "int"),
            ValueKind::Real => write!(f, "real"),
            ValueKind::Str => write!(f, "string"),
        }
    }
}

/// Descriptor for one identifier.
///
/// Created by the lexer on first occurrence of the name. The parser and
/// analyser fill in `kind` and `declared`; the machine reads and writes
/// `assigned` and `cell` while the program runs.
#[derive(Clone, Debug, Default)]
pub struct Variable {
    /// Declared kind, present once the declaration has been seen.
    pub kind: Option<ValueKind>,
    /// Whether a declaration statement has named this identifier.
    pub declared: bool,
    /// Whether the variable currently holds a value.
    pub assigned: bool,
    /// Runtime payload: the integer value itself for `int`, a real-pool
    /// index for `real`, a string-pool index for `string`.
    pub cell: u32,
}

/// Descriptor for one `goto` label.
#[derive(Clone, Debug, Default)]
pub struct Label {
    /// Whether the label statement has been seen.
    pub defined: bool,
    /// Instruction-buffer index of the statement after the label.
    pub target: u32,
}

/// Interned identifier table: name -> small index -> [`Variable`].
///
/// Backed by an insertion-ordered map so the index handed out at interning
/// time doubles as the slot index for every later lookup.
#[derive(Debug, Default)]
pub struct VarTable {
    entries: FxIndexMap<String, Variable>,
}

impl VarTable {
    /// Interns `name`, returning its stable index. Reuses the existing
    /// entry when the name has been seen before.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(index) = self.entries.get_index_of(name) {
            return index as u32;
        }
        let (index, _) = self.entries.insert_full(name.to_string(), Variable::default());
        index as u32
    }

    /// Looks up a name without interning it.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entries.get_index_of(name).map(|i| i as u32)
    }

    pub fn get(&self, id: u32) -> &Variable {
        &self.entries[id as usize]
    }

    pub fn get_mut(&mut self, id: u32) -> &mut Variable {
        &mut self.entries[id as usize]
    }

    pub fn name(&self, id: u32) -> &str {
        self.entries
            .get_index(id as usize)
            .map(|(name, _)| name.as_str())
            .expect("variable id out of range")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Interned label table: name -> small index -> [`Label`].
#[derive(Debug, Default)]
pub struct LabelTable {
    entries: FxIndexMap<String, Label>,
}

impl LabelTable {
    /// Interns `name`, returning its stable index.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(index) = self.entries.get_index_of(name) {
            return index as u32;
        }
        let (index, _) = self.entries.insert_full(name.to_string(), Label::default());
        index as u32
    }

    /// Looks up a name without interning it. The lexer uses this to
    /// recognise references to labels it has already seen defined.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entries.get_index_of(name).map(|i| i as u32)
    }

    pub fn get(&self, id: u32) -> &Label {
        &self.entries[id as usize]
    }

    pub fn get_mut(&mut self, id: u32) -> &mut Label {
        &mut self.entries[id as usize]
    }

    pub fn name(&self, id: u32) -> &str {
        self.entries
            .get_index(id as usize)
            .map(|(name, _)| name.as_str())
            .expect("label id out of range")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append-only pool of real constants.
#[derive(Debug, Default)]
pub struct RealPool {
    values: Vec<f64>,
}

impl RealPool {
    /// Appends a value and returns its index.
    pub fn push(&mut self, value: f64) -> u32 {
        self.values.push(value);
        (self.values.len() - 1) as u32
    }

    pub fn get(&self, index: u32) -> f64 {
        self.values[index as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Append-only pool of string constants.
#[derive(Debug, Default)]
pub struct StrPool {
    values: Vec<String>,
}

impl StrPool {
    /// Appends a value and returns its index.
    pub fn push(&mut self, value: String) -> u32 {
        self.values.push(value);
        (self.values.len() - 1) as u32
    }

    pub fn get(&self, index: u32) -> &str {
        &self.values[index as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The shared state of one interpreter run.
#[derive(Debug, Default)]
pub struct Pool {
    pub vars: VarTable,
    pub labels: LabelTable,
    pub reals: RealPool,
    pub strings: StrPool,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }
}
