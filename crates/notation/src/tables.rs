//! Per-notation character tables and per-format glyph tables
//!
//! A symbol table maps each input character to its category and payload
//! (symbol index, operator, quantifier). The writer consults the same
//! tables for ascii output and per-format glyph tables for the rest.

use std::sync::OnceLock;

use lexicon::{Operator, Quantifier};
use rustc_hash::FxHashMap;

/// A notation: the concrete grammar for reading and writing sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Notation {
    /// Prefix notation with letter operators
    #[default]
    Polish,
    /// Infix binary operators, prefix unary, parentheses
    Standard,
}

impl Notation {
    /// The notation's name.
    pub fn name(self) -> &'static str {
        match self {
            Notation::Polish => "polish",
            Notation::Standard => "standard",
        }
    }
}

/// An output format for the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Plain ascii
    #[default]
    Ascii,
    /// Unicode glyphs
    Unicode,
    /// HTML with subscript markup
    Html,
    /// LaTeX macros
    Latex,
}

/// A system predicate selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemPredicate {
    /// The binary Identity predicate
    Identity,
    /// The unary Existence predicate
    Existence,
}

impl SystemPredicate {
    /// The predicate value.
    pub fn predicate(self) -> lexicon::Predicate {
        match self {
            SystemPredicate::Identity => lexicon::Predicate::identity(),
            SystemPredicate::Existence => lexicon::Predicate::existence(),
        }
    }
}

/// What a single character means in a notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharInfo {
    /// Atomic sentence symbol with its index
    Atomic(u8),
    /// Constant symbol with its index
    Constant(u8),
    /// Variable symbol with its index
    Variable(u8),
    /// User predicate symbol with its index
    UserPredicate(u8),
    /// System predicate symbol
    SystemPredicate(SystemPredicate),
    /// Quantifier symbol
    Quantifier(Quantifier),
    /// Operator symbol
    Operator(Operator),
    /// Opening parenthesis
    ParenOpen,
    /// Closing parenthesis
    ParenClose,
    /// Whitespace
    Whitespace,
    /// Subscript digit
    Digit(u8),
}

/// Atomic symbols, by notation.
pub const POLISH_ATOMICS: &str = "abcde";
/// Constant symbols (polish).
pub const POLISH_CONSTANTS: &str = "mnopqrs";
/// Variable symbols (both notations).
pub const VARIABLES: &str = "vwxyz";
/// User predicate symbols (both notations).
pub const USER_PREDICATES: &str = "FGHO";
/// Atomic symbols (standard).
pub const STANDARD_ATOMICS: &str = "ABCDE";
/// Constant symbols (standard).
pub const STANDARD_CONSTANTS: &str = "abcdefg";

/// Polish operator letters, in operator enumeration order.
pub const POLISH_OPERATORS: [char; 10] = ['T', 'N', 'K', 'A', 'C', 'E', 'U', 'B', 'M', 'L'];
/// Standard ascii operator glyphs, in operator enumeration order.
pub const STANDARD_OPERATORS: [char; 10] = ['*', '~', '&', 'V', '>', '<', '$', '%', 'P', 'N'];

/// A notation's character table.
#[derive(Debug)]
pub struct SymbolTable {
    notation: Notation,
    chars: FxHashMap<char, CharInfo>,
}

impl SymbolTable {
    /// The shared table for a notation.
    pub fn for_notation(notation: Notation) -> &'static SymbolTable {
        static POLISH: OnceLock<SymbolTable> = OnceLock::new();
        static STANDARD: OnceLock<SymbolTable> = OnceLock::new();
        match notation {
            Notation::Polish => POLISH.get_or_init(|| SymbolTable::build(Notation::Polish)),
            Notation::Standard => STANDARD.get_or_init(|| SymbolTable::build(Notation::Standard)),
        }
    }

    fn build(notation: Notation) -> SymbolTable {
        let mut chars = FxHashMap::default();
        let (atomics, constants) = match notation {
            Notation::Polish => (POLISH_ATOMICS, POLISH_CONSTANTS),
            Notation::Standard => (STANDARD_ATOMICS, STANDARD_CONSTANTS),
        };
        for (i, c) in atomics.chars().enumerate() {
            chars.insert(c, CharInfo::Atomic(i as u8));
        }
        for (i, c) in constants.chars().enumerate() {
            chars.insert(c, CharInfo::Constant(i as u8));
        }
        for (i, c) in VARIABLES.chars().enumerate() {
            chars.insert(c, CharInfo::Variable(i as u8));
        }
        for (i, c) in USER_PREDICATES.chars().enumerate() {
            chars.insert(c, CharInfo::UserPredicate(i as u8));
        }
        match notation {
            Notation::Polish => {
                for (op, c) in Operator::ALL.iter().zip(POLISH_OPERATORS) {
                    chars.insert(c, CharInfo::Operator(*op));
                }
                chars.insert('S', CharInfo::Quantifier(Quantifier::Existential));
                chars.insert('V', CharInfo::Quantifier(Quantifier::Universal));
                chars.insert('I', CharInfo::SystemPredicate(SystemPredicate::Identity));
                chars.insert('J', CharInfo::SystemPredicate(SystemPredicate::Existence));
            }
            Notation::Standard => {
                for (op, c) in Operator::ALL.iter().zip(STANDARD_OPERATORS) {
                    chars.insert(c, CharInfo::Operator(*op));
                }
                chars.insert('X', CharInfo::Quantifier(Quantifier::Existential));
                chars.insert('L', CharInfo::Quantifier(Quantifier::Universal));
                chars.insert('=', CharInfo::SystemPredicate(SystemPredicate::Identity));
                chars.insert('!', CharInfo::SystemPredicate(SystemPredicate::Existence));
                chars.insert('(', CharInfo::ParenOpen);
                chars.insert(')', CharInfo::ParenClose);
            }
        }
        chars.insert(' ', CharInfo::Whitespace);
        for d in '0'..='9' {
            chars.insert(d, CharInfo::Digit(d as u8 - b'0'));
        }
        SymbolTable { notation, chars }
    }

    /// The notation this table belongs to.
    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Classify a character; `None` for characters outside the notation.
    pub fn info(&self, c: char) -> Option<CharInfo> {
        self.chars.get(&c).copied()
    }

    /// The ascii character for an atomic index.
    pub fn atomic_char(&self, index: u8) -> char {
        let table = match self.notation {
            Notation::Polish => POLISH_ATOMICS,
            Notation::Standard => STANDARD_ATOMICS,
        };
        table.chars().nth(index as usize).unwrap_or('?')
    }

    /// The ascii character for a constant index.
    pub fn constant_char(&self, index: u8) -> char {
        let table = match self.notation {
            Notation::Polish => POLISH_CONSTANTS,
            Notation::Standard => STANDARD_CONSTANTS,
        };
        table.chars().nth(index as usize).unwrap_or('?')
    }

    /// The ascii character for a variable index.
    pub fn variable_char(&self, index: u8) -> char {
        VARIABLES.chars().nth(index as usize).unwrap_or('?')
    }

    /// The ascii character for a user predicate index.
    pub fn user_predicate_char(&self, index: u8) -> char {
        USER_PREDICATES.chars().nth(index as usize).unwrap_or('?')
    }

    /// The ascii character for a system predicate.
    pub fn system_predicate_char(&self, p: SystemPredicate) -> char {
        match (self.notation, p) {
            (Notation::Polish, SystemPredicate::Identity) => 'I',
            (Notation::Polish, SystemPredicate::Existence) => 'J',
            (Notation::Standard, SystemPredicate::Identity) => '=',
            (Notation::Standard, SystemPredicate::Existence) => '!',
        }
    }

    /// The ascii character for an operator.
    pub fn operator_char(&self, op: Operator) -> char {
        let table = match self.notation {
            Notation::Polish => POLISH_OPERATORS,
            Notation::Standard => STANDARD_OPERATORS,
        };
        table[op as usize]
    }

    /// The ascii character for a quantifier.
    pub fn quantifier_char(&self, q: Quantifier) -> char {
        match (self.notation, q) {
            (Notation::Polish, Quantifier::Existential) => 'S',
            (Notation::Polish, Quantifier::Universal) => 'V',
            (Notation::Standard, Quantifier::Existential) => 'X',
            (Notation::Standard, Quantifier::Universal) => 'L',
        }
    }
}

/// The operator glyph for a notation and format.
pub fn operator_glyph(notation: Notation, format: Format, op: Operator) -> String {
    if notation == Notation::Polish {
        return POLISH_OPERATORS[op as usize].to_string();
    }
    match format {
        Format::Ascii => STANDARD_OPERATORS[op as usize].to_string(),
        Format::Unicode | Format::Html => match op {
            Operator::Assertion => "\u{25cb}".into(),
            Operator::Negation => "\u{00ac}".into(),
            Operator::Conjunction => "\u{2227}".into(),
            Operator::Disjunction => "\u{2228}".into(),
            Operator::MaterialConditional => "\u{2283}".into(),
            Operator::MaterialBiconditional => "\u{2261}".into(),
            Operator::Conditional => "\u{2192}".into(),
            Operator::Biconditional => "\u{2194}".into(),
            Operator::Possibility => "\u{25c7}".into(),
            Operator::Necessity => "\u{25fb}".into(),
        },
        Format::Latex => match op {
            Operator::Assertion => "\\circ{}".into(),
            Operator::Negation => "\\neg{}".into(),
            Operator::Conjunction => "\\wedge{}".into(),
            Operator::Disjunction => "\\vee{}".into(),
            Operator::MaterialConditional => "\\supset{}".into(),
            Operator::MaterialBiconditional => "\\equiv{}".into(),
            Operator::Conditional => "\\rightarrow{}".into(),
            Operator::Biconditional => "\\leftrightarrow{}".into(),
            Operator::Possibility => "\\Diamond{}".into(),
            Operator::Necessity => "\\Box{}".into(),
        },
    }
}

/// The quantifier glyph for a notation and format.
pub fn quantifier_glyph(notation: Notation, format: Format, q: Quantifier) -> String {
    if notation == Notation::Polish {
        return SymbolTable::for_notation(notation).quantifier_char(q).to_string();
    }
    match format {
        Format::Ascii => SymbolTable::for_notation(notation).quantifier_char(q).to_string(),
        Format::Unicode | Format::Html => match q {
            Quantifier::Existential => "\u{2203}".into(),
            Quantifier::Universal => "\u{2200}".into(),
        },
        Format::Latex => match q {
            Quantifier::Existential => "\\exists{}".into(),
            Quantifier::Universal => "\\forall{}".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polish_table_classifies() {
        let t = SymbolTable::for_notation(Notation::Polish);
        assert_eq!(t.info('K'), Some(CharInfo::Operator(Operator::Conjunction)));
        assert_eq!(t.info('V'), Some(CharInfo::Quantifier(Quantifier::Universal)));
        assert_eq!(t.info('m'), Some(CharInfo::Constant(0)));
        assert_eq!(t.info('x'), Some(CharInfo::Variable(2)));
        assert_eq!(t.info('('), None);
    }

    #[test]
    fn test_standard_table_classifies() {
        let t = SymbolTable::for_notation(Notation::Standard);
        assert_eq!(t.info('&'), Some(CharInfo::Operator(Operator::Conjunction)));
        assert_eq!(t.info('A'), Some(CharInfo::Atomic(0)));
        assert_eq!(t.info('a'), Some(CharInfo::Constant(0)));
        assert_eq!(
            t.info('='),
            Some(CharInfo::SystemPredicate(SystemPredicate::Identity))
        );
        assert_eq!(t.info('('), Some(CharInfo::ParenOpen));
    }

    #[test]
    fn test_tables_invert() {
        for notation in [Notation::Polish, Notation::Standard] {
            let t = SymbolTable::for_notation(notation);
            for op in Operator::ALL {
                assert_eq!(t.info(t.operator_char(op)), Some(CharInfo::Operator(op)));
            }
            for q in Quantifier::ALL {
                assert_eq!(t.info(t.quantifier_char(q)), Some(CharInfo::Quantifier(q)));
            }
        }
    }
}
