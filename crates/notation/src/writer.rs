//! The lex-writer
//!
//! Renders lexical items per notation and output format. Polish rendering
//! is prefix concatenation; standard rendering is infix for binary
//! operators and arity-2 predicates, with configurable outer-paren
//! dropping.

use lexicon::{
    Constant, LexItem, Operator, Parameter, Predicate, Quantifier, Sentence, Variable,
};

use crate::tables::{operator_glyph, quantifier_glyph, Format, Notation, SymbolTable};

/// Writer configuration.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// The output format.
    pub format: Format,
    /// Drop the outermost parens of a binary sentence (standard only).
    pub drop_parens: bool,
    /// Per-logic glyph overrides, consulted before the format tables.
    pub operator_overrides: Vec<(Operator, String)>,
}

impl Default for WriterOptions {
    fn default() -> WriterOptions {
        WriterOptions {
            format: Format::Ascii,
            drop_parens: true,
            operator_overrides: Vec::new(),
        }
    }
}

/// Renders lexical items for one notation and format.
#[derive(Debug)]
pub struct LexWriter {
    notation: Notation,
    table: &'static SymbolTable,
    format: Format,
    drop_parens: bool,
    operator_overrides: Vec<(Operator, String)>,
}

impl LexWriter {
    /// Create a writer.
    pub fn new(notation: Notation, opts: WriterOptions) -> LexWriter {
        LexWriter {
            notation,
            table: SymbolTable::for_notation(notation),
            format: opts.format,
            drop_parens: opts.drop_parens,
            operator_overrides: opts.operator_overrides,
        }
    }

    /// An ascii polish writer.
    pub fn polish() -> LexWriter {
        LexWriter::new(Notation::Polish, WriterOptions::default())
    }

    /// An ascii standard writer.
    pub fn standard() -> LexWriter {
        LexWriter::new(Notation::Standard, WriterOptions::default())
    }

    /// The notation being written.
    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Render any lexical item.
    pub fn write(&self, item: &LexItem) -> String {
        match item {
            LexItem::Predicate(p) => self.write_predicate(p),
            LexItem::Constant(c) => self.write_constant(*c),
            LexItem::Variable(v) => self.write_variable(*v),
            LexItem::Sentence(s) => self.write_sentence(s),
        }
    }

    /// Render a sentence.
    pub fn write_sentence(&self, s: &Sentence) -> String {
        if self.notation == Notation::Standard && self.drop_parens {
            if let Sentence::Operated(op) = s {
                if op.operator.arity() == 2 {
                    return self.write_operated(s, true);
                }
            }
        }
        self.write_inner(s)
    }

    fn write_inner(&self, s: &Sentence) -> String {
        match s {
            Sentence::Atomic(a) => format!(
                "{}{}",
                self.table.atomic_char(a.index()),
                self.subscript(a.subscript())
            ),
            Sentence::Predicated(_) => self.write_predicated(s),
            Sentence::Quantified(q) => format!(
                "{}{}{}",
                quantifier_glyph(self.notation, self.format, q.quantifier),
                self.write_variable(q.variable),
                self.write_inner(&q.sentence)
            ),
            Sentence::Operated(_) => self.write_operated(s, false),
        }
    }

    fn write_predicated(&self, s: &Sentence) -> String {
        let p = s.predication().expect("predicated sentence");
        if self.notation == Notation::Standard && p.predicate.arity() >= 2 {
            // Infix: first parameter, predicate, remaining parameters;
            // Identity gets surrounding spaces.
            let ws = if p.predicate.is_identity() { " " } else { "" };
            let mut out = self.write_parameter(p.params[0]);
            out.push_str(ws);
            out.push_str(&self.write_predicate(&p.predicate));
            out.push_str(ws);
            for param in &p.params[1..] {
                out.push_str(&self.write_parameter(*param));
            }
            out
        } else {
            let mut out = self.write_predicate(&p.predicate);
            for param in &p.params {
                out.push_str(&self.write_parameter(*param));
            }
            out
        }
    }

    fn write_operated(&self, s: &Sentence, drop_parens: bool) -> String {
        let operator = s.operator().expect("operated sentence");
        match self.notation {
            Notation::Polish => {
                let mut out = self.operator_str(operator);
                for operand in s.operands() {
                    out.push_str(&self.write_inner(operand));
                }
                out
            }
            Notation::Standard => match operator.arity() {
                1 => {
                    let operand = &s.operands()[0];
                    if self.format == Format::Html
                        && operator == Operator::Negation
                        && operand.predicate().is_some_and(Predicate::is_identity)
                    {
                        return self.write_negated_identity(operand);
                    }
                    format!(
                        "{}{}",
                        self.operator_str(operator),
                        self.write_inner(operand)
                    )
                }
                _ => {
                    let body = format!(
                        "{} {} {}",
                        self.write_inner(&s.operands()[0]),
                        self.operator_str(operator),
                        self.write_inner(&s.operands()[1])
                    );
                    if drop_parens {
                        body
                    } else {
                        format!("({body})")
                    }
                }
            },
        }
    }

    // Per-logic overrides win over the format tables.
    fn operator_str(&self, op: Operator) -> String {
        self.operator_overrides
            .iter()
            .find(|(o, _)| *o == op)
            .map(|(_, glyph)| glyph.clone())
            .unwrap_or_else(|| operator_glyph(self.notation, self.format, op))
    }

    fn write_negated_identity(&self, identity: &Sentence) -> String {
        let p = identity.predication().expect("identity predication");
        format!(
            "{} \u{2260} {}",
            self.write_parameter(p.params[0]),
            self.write_parameter(p.params[1])
        )
    }

    /// Render a predicate symbol.
    pub fn write_predicate(&self, p: &Predicate) -> String {
        let c = if p.is_identity() {
            self.table
                .system_predicate_char(crate::tables::SystemPredicate::Identity)
        } else if p.is_existence() {
            self.table
                .system_predicate_char(crate::tables::SystemPredicate::Existence)
        } else {
            self.table.user_predicate_char(p.index() as u8)
        };
        format!("{}{}", c, self.subscript(p.subscript()))
    }

    /// Render a parameter.
    pub fn write_parameter(&self, p: Parameter) -> String {
        match p {
            Parameter::Constant(c) => self.write_constant(c),
            Parameter::Variable(v) => self.write_variable(v),
        }
    }

    /// Render a constant.
    pub fn write_constant(&self, c: Constant) -> String {
        format!(
            "{}{}",
            self.table.constant_char(c.index()),
            self.subscript(c.subscript())
        )
    }

    /// Render a variable.
    pub fn write_variable(&self, v: Variable) -> String {
        format!(
            "{}{}",
            self.table.variable_char(v.index()),
            self.subscript(v.subscript())
        )
    }

    /// Render an operator symbol.
    pub fn write_operator(&self, op: Operator) -> String {
        self.operator_str(op)
    }

    /// Render a quantifier symbol.
    pub fn write_quantifier(&self, q: Quantifier) -> String {
        quantifier_glyph(self.notation, self.format, q)
    }

    fn subscript(&self, subscript: u32) -> String {
        if subscript == 0 {
            return String::new();
        }
        match self.format {
            Format::Ascii | Format::Unicode => subscript.to_string(),
            Format::Html => format!("<sub>{subscript}</sub>"),
            Format::Latex => format!("_{{{subscript}}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn pol(s: &str) -> Sentence {
        Parser::polish().parse(s).unwrap()
    }

    #[test]
    fn test_polish_roundtrip_chars() {
        let w = LexWriter::polish();
        assert_eq!(w.write_sentence(&pol("a")), "a");
        assert_eq!(w.write_sentence(&pol("KaNb")), "KaNb");
        assert_eq!(w.write_sentence(&pol("VxFx")), "VxFx");
    }

    #[test]
    fn test_standard_writes_parens() {
        let w = LexWriter::standard();
        assert_eq!(w.write_sentence(&pol("UUaba")), "(A $ B) $ A");
        assert_eq!(w.write_sentence(&pol("Uab")), "A $ B");
    }

    #[test]
    fn test_standard_no_drop_parens() {
        let w = LexWriter::new(
            Notation::Standard,
            WriterOptions {
                drop_parens: false,
                ..WriterOptions::default()
            },
        );
        assert_eq!(w.write_sentence(&pol("Uab")), "(A $ B)");
    }

    #[test]
    fn test_standard_identity_spacing() {
        let w = LexWriter::standard();
        assert_eq!(w.write_sentence(&pol("Imn")), "a = b");
    }

    #[test]
    fn test_html_negated_identity() {
        let w = LexWriter::new(
            Notation::Standard,
            WriterOptions {
                format: Format::Html,
                ..WriterOptions::default()
            },
        );
        assert_eq!(w.write_sentence(&pol("NImn")), "a \u{2260} b");
    }

    #[test]
    fn test_html_subscript_markup() {
        let w = LexWriter::new(
            Notation::Standard,
            WriterOptions {
                format: Format::Html,
                ..WriterOptions::default()
            },
        );
        assert_eq!(w.write_sentence(&pol("a12")), "A<sub>12</sub>");
    }

    #[test]
    fn test_latex_operators() {
        let w = LexWriter::new(
            Notation::Standard,
            WriterOptions {
                format: Format::Latex,
                ..WriterOptions::default()
            },
        );
        assert_eq!(w.write_sentence(&pol("Kab")), "A \\wedge{} B");
    }

    #[test]
    fn test_unicode_operators() {
        let w = LexWriter::new(
            Notation::Standard,
            WriterOptions {
                format: Format::Unicode,
                ..WriterOptions::default()
            },
        );
        assert_eq!(w.write_sentence(&pol("Na")), "\u{00ac}A");
    }

    #[test]
    fn test_operator_override() {
        let w = LexWriter::new(
            Notation::Standard,
            WriterOptions {
                operator_overrides: vec![(Operator::Conditional, "=>".to_string())],
                ..WriterOptions::default()
            },
        );
        assert_eq!(w.write_sentence(&pol("Uab")), "A => B");
    }
}
