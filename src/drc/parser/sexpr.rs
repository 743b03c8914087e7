//! Minimal S-expression reader
//!
//! Produces atoms and lists. Quoted strings support backslash escapes (the
//! next character is taken literally); `#` starts a comment running to the
//! end of the line. Parsing stops at the first top-level token that is not a
//! list.

use std::fmt;

use crate::error::{DrcError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum SNode {
    Atom(String),
    List(Vec<SNode>),
}

impl SNode {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            SNode::Atom(value) => Some(value),
            SNode::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SNode]> {
        match self {
            SNode::List(children) => Some(children),
            SNode::Atom(_) => None,
        }
    }

    /// Leading atom of a list, `""` otherwise
    pub fn tag(&self) -> &str {
        self.as_list()
            .and_then(|c| c.first())
            .and_then(SNode::as_atom)
            .unwrap_or("")
    }

    /// Atom at `index` within a list, `""` if missing or not an atom
    pub fn atom_at(&self, index: usize) -> &str {
        self.as_list()
            .and_then(|c| c.get(index))
            .and_then(SNode::as_atom)
            .unwrap_or("")
    }

    /// Children after the tag
    pub fn args(&self) -> &[SNode] {
        match self.as_list() {
            Some(children) if !children.is_empty() => &children[1..],
            _ => &[],
        }
    }
}

impl fmt::Display for SNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SNode::Atom(value) => write!(f, "{value}"),
            SNode::List(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Parses all top-level lists in `text`
pub fn parse_sexpr(text: &str) -> Result<Vec<SNode>> {
    let mut reader = Reader {
        input: text.chars().collect(),
        pos: 0,
    };
    reader.parse_all()
}

struct Reader {
    input: Vec<char>,
    pos: usize,
}

impl Reader {
    fn parse_all(&mut self) -> Result<Vec<SNode>> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some('(') => nodes.push(self.parse_list()?),
                _ => break,
            }
        }
        Ok(nodes)
    }

    fn parse_list(&mut self) -> Result<SNode> {
        self.expect('(')?;
        let mut children = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => {
                    return Err(DrcError::parse(
                        self.pos,
                        "Unexpected end of input, expected ')'",
                    ))
                }
                Some(')') => {
                    self.pos += 1;
                    return Ok(SNode::List(children));
                }
                Some('(') => children.push(self.parse_list()?),
                Some('"') => children.push(self.parse_quoted()?),
                Some(_) => children.push(self.parse_atom()?),
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<SNode> {
        self.expect('"')?;
        let mut value = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '"' => return Ok(SNode::Atom(value)),
                '\\' if self.pos < self.input.len() => {
                    value.push(self.input[self.pos]);
                    self.pos += 1;
                }
                _ => value.push(c),
            }
        }
        Err(DrcError::parse(self.pos, "Unterminated quoted string"))
    }

    fn parse_atom(&mut self) -> Result<SNode> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '(' || c == ')' || c == '"' || c.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(DrcError::parse(
                self.pos,
                format!("Expected atom at position {}", self.pos),
            ));
        }
        Ok(SNode::Atom(self.input[start..self.pos].iter().collect()))
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == '#' {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.peek() != Some(expected) {
            return Err(DrcError::parse(
                self.pos,
                format!("Expected '{expected}' at position {}", self.pos),
            ));
        }
        self.pos += 1;
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }
}
