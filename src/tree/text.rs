//! Plain-text form of a property tree.
//!
//! ```text
//! ; comment
//! (edit_advanced 0)
//! (keymap
//!    (zone
//!       (zone_label "Major")
//!       (volume 0.0)
//!    )
//! )
//! ```
//!
//! A node is `(key value)` where the value is a single atom or zero or more
//! nested nodes. `(key)` is an empty tree.

use std::str::FromStr;

use crate::error::{CelError, Result};

use super::node::{Node, Tree, Value};

const INDENT: &str = "   ";

impl Tree {
    /// Serialize to the plain-text form.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for node in self.iter() {
            write_node(&mut out, node, 0);
        }
        out
    }

    /// Parse the plain-text form. `Tree::from_text(&t.to_text()) == t`.
    pub fn from_text(text: &str) -> Result<Tree> {
        Parser::new(text).parse_document()
    }
}

impl FromStr for Tree {
    type Err = CelError;

    fn from_str(s: &str) -> Result<Self> {
        Tree::from_text(s)
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('(');
    write_key(out, &node.key);
    match &node.value {
        Value::Tree(tree) if tree.is_empty() => out.push(')'),
        Value::Tree(tree) => {
            out.push('\n');
            for child in tree.iter() {
                write_node(out, child, depth + 1);
            }
            for _ in 0..depth {
                out.push_str(INDENT);
            }
            out.push(')');
        }
        Value::Int(v) => {
            out.push(' ');
            out.push_str(&v.to_string());
            out.push(')');
        }
        Value::Float(v) => {
            out.push(' ');
            // Debug keeps the decimal point, so 1.0 never reads back as an int
            out.push_str(&format!("{v:?}"));
            out.push(')');
        }
        Value::String(v) => {
            out.push(' ');
            write_quoted(out, v);
            out.push(')');
        }
    }
    out.push('\n');
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | ':' | '-'))
}

fn write_key(out: &mut String, key: &str) {
    if is_bare_key(key) {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Interpret a bare atom: int first, then float when it looks like one.
fn parse_atom(token: &str) -> Value {
    if let Ok(v) = token.parse::<i32>() {
        return Value::Int(v);
    }
    let float_shaped = token.contains(|c| matches!(c, '.' | 'e' | 'E'))
        || matches!(token, "inf" | "-inf" | "+inf" | "NaN");
    if float_shaped {
        if let Ok(v) = token.parse::<f32>() {
            return Value::Float(v);
        }
    }
    Value::String(token.to_string())
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn error(&self, reason: impl Into<String>) -> CelError {
        CelError::Parse {
            line: self.line,
            column: self.column,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn parse_document(&mut self) -> Result<Tree> {
        let mut tree = Tree::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Ok(tree),
                Some('(') => {
                    self.bump();
                    tree.push(self.parse_node()?);
                }
                Some(c) => return Err(self.error(format!("expected '(', found '{c}'"))),
            }
        }
    }

    /// Parses the remainder of a node after its opening parenthesis.
    fn parse_node(&mut self) -> Result<Node> {
        self.skip_trivia();
        let key = match self.peek() {
            Some('"') => self.parse_quoted()?,
            Some('(') | Some(')') | None => return Err(self.error("expected a key")),
            Some(_) => self.parse_bare(),
        };

        self.skip_trivia();
        let value = match self.peek() {
            None => return Err(self.error(format!("unterminated node '{key}'"))),
            Some(')') | Some('(') => {
                let mut children = Tree::new();
                loop {
                    self.skip_trivia();
                    match self.peek() {
                        Some(')') => {
                            self.bump();
                            break;
                        }
                        Some('(') => {
                            self.bump();
                            children.push(self.parse_node()?);
                        }
                        Some(c) => {
                            return Err(self.error(format!(
                                "unexpected '{c}' among the children of '{key}'"
                            )))
                        }
                        None => return Err(self.error(format!("unterminated node '{key}'"))),
                    }
                }
                return Ok(Node {
                    key,
                    value: Value::Tree(children),
                });
            }
            Some('"') => Value::String(self.parse_quoted()?),
            Some(_) => parse_atom(&self.parse_bare()),
        };

        self.skip_trivia();
        match self.peek() {
            Some(')') => {
                self.bump();
                Ok(Node { key, value })
            }
            Some(c) => Err(self.error(format!("expected ')' after the value of '{key}', found '{c}'"))),
            None => Err(self.error(format!("unterminated node '{key}'"))),
        }
    }

    fn parse_bare(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';') {
                break;
            }
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn parse_quoted(&mut self) -> Result<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(c) => return Err(self.error(format!("unknown escape '\\{c}'"))),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Tree {
        let mut root = Tree::new();
        *root.get_int("edit_advanced") = 1;
        let zone = root.get_node("keymap").get_node("zone");
        *zone.get_string("zone_label") = "Keyzone \"A\"\n".to_string();
        *zone.get_int("min_note") = -1;
        *zone.get_float("volume") = -3.5;
        *zone.get_float("whole") = 2.0;
        zone.get_node("empty");
        *root.get_node("audio_labels").get_string("odd key") = "x".to_string();
        root
    }

    #[test]
    fn test_round_trip() {
        let tree = sample();
        let text = tree.to_text();
        assert_eq!(Tree::from_text(&text).unwrap(), tree);
    }

    #[test]
    fn test_non_finite_floats_round_trip() {
        let mut tree = Tree::new();
        *tree.get_float("nan") = f32::NAN;
        *tree.get_float("computed_nan") = 0.0_f32 / 0.0;
        *tree.get_float("inf") = f32::INFINITY;
        *tree.get_float("neg_inf") = f32::NEG_INFINITY;

        let text = tree.to_text();
        assert!(text.contains("(nan NaN)"));
        assert_eq!(Tree::from_text(&text).unwrap(), tree);
        assert_eq!(Tree::from_text("(v NaN)").unwrap().to_text(), "(v NaN)\n");
    }

    #[test]
    fn test_layout() {
        let mut tree = Tree::new();
        *tree.get_node("pan").get_float("position") = 0.5;
        tree.get_node("empty");
        assert_eq!(
            tree.to_text(),
            "(pan\n   (position 0.5)\n)\n(empty)\n"
        );
    }

    #[test]
    fn test_whole_float_stays_float() {
        let mut tree = Tree::new();
        *tree.get_float("volume") = 1.0;
        let mut back = Tree::from_text(&tree.to_text()).unwrap();
        assert_eq!(*back.get_float("volume"), 1.0);
    }

    #[test]
    fn test_bare_atoms_and_comments() {
        let text = "; header\n(a 12) (b 1e3) (c hello) ; trailing\n(\"d e\" \"q\")";
        let tree = Tree::from_text(text).unwrap();
        assert_eq!(tree.nodes()[0].value, Value::Int(12));
        assert_eq!(tree.nodes()[1].value, Value::Float(1000.0));
        assert_eq!(tree.nodes()[2].value, Value::String("hello".to_string()));
        assert_eq!(tree.nodes()[3].key, "d e");
    }

    #[test]
    fn test_unknown_keys_survive() {
        let text = "(vendor_field\n   (x 1)\n   (y \"z\")\n)\n";
        assert_eq!(Tree::from_text(text).unwrap().to_text(), text);
    }

    #[test]
    fn test_error_positions() {
        match Tree::from_text("(a 1)\n(b 2 3)") {
            Err(CelError::Parse { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, 6);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(Tree::from_text("(a \"open").is_err());
        assert!(Tree::from_text("(a (b 1)").is_err());
        assert!(Tree::from_text(")").is_err());
    }
}
