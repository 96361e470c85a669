//! Notation tables, parsing, and writing
//!
//! Two notations are supported: **polish** (prefix, letter operators) and
//! **standard** (infix binary operators, prefix unary). Parsing is a
//! one-shot stateful read over a per-notation character table; writing is
//! the inverse, per notation and output format (ascii, unicode, html,
//! latex).

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

/// Per-notation character tables and per-format glyph tables
pub mod tables;
/// The sentence/argument parser
pub mod parser;
/// The lex-writer
pub mod writer;

pub use parser::{Parser, ParserOptions};
pub use tables::{CharInfo, Format, Notation, SymbolTable};
pub use writer::{LexWriter, WriterOptions};

use lexicon::LexError;

/// Parser error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Empty input string
    #[error("Input cannot be empty")]
    EmptyInput,

    /// A character outside the notation table, or in the wrong place
    #[error("Unexpected character {chr:?} at position {pos}")]
    UnexpectedChar {
        /// The offending character
        chr: char,
        /// Its position in the input
        pos: usize,
    },

    /// Input ended while a sentence was still open
    #[error("Unexpected end of input at position {0}")]
    UnexpectedEnd(usize),

    /// An open parenthesis was never closed
    #[error("Unterminated open parenthesis at position {0}")]
    UnterminatedParen(usize),

    /// A parenthetical expression has no top-level binary operator
    #[error("Parenthetical expression is missing a binary operator at position {0}")]
    MissingBinaryOperator(usize),

    /// A second top-level binary operator in one parenthetical
    #[error("Unexpected binary operator at position {0}")]
    ExtraBinaryOperator(usize),

    /// A binary operator used in prefix position
    #[error("Unexpected non-prefix operator symbol at position {0}")]
    NonPrefixOperator(usize),

    /// The left side of an infix expression overran its operator
    #[error("Invalid left side expression ending at position {0}")]
    InvalidLhs(usize),

    /// A variable used without a binding quantifier
    #[error("Unbound variable at position {0}")]
    UnboundVariable(usize),

    /// A quantifier rebinding an already-bound variable
    #[error("Cannot rebind variable at position {0}")]
    BoundVariable(usize),

    /// A quantifier whose variable never occurs in its body
    #[error("Unused bound variable at position {0}")]
    UnusedVariable(usize),

    /// An undeclared predicate symbol (and auto-declaration is off)
    #[error("Undefined predicate symbol at position {0}")]
    NoSuchPredicate(usize),

    /// An infix predication with a unary predicate
    #[error("Unexpected 1-ary predicate at position {0}; infix notation requires arity > 1")]
    UnaryInfixPredicate(usize),

    /// A lexicon-level construction failure
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
