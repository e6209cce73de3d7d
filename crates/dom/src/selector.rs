//! Selector data model and parser for the subset the engines emit:
//! `tag`, `#id`, `.class`, `[attr]`, `[attr="value"]`, `:nth-child(n)`,
//! descendant and child combinators, and comma-separated lists.

use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SimpleSelector {
    Type(String),
    Id(String),
    Class(String),
    Universal,
    Attribute { name: String, value: Option<String> },
    NthChild(usize),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Left-to-right sequence of (compound, combinator-to-next). The last
/// combinator is `None`.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct ComplexSelector {
    pub sequence: Vec<(CompoundSelector, Option<Combinator>)>,
}

impl ComplexSelector {
    pub fn rightmost_compound(&self) -> Option<&CompoundSelector> {
        self.sequence.last().map(|(compound, _)| compound)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid selector at byte {offset}: {message}")]
pub struct SelectorParseError {
    pub offset: usize,
    pub message: String,
}

/// Parse a comma-separated selector list.
pub fn parse_selector_list(input: &str) -> Result<Vec<ComplexSelector>, SelectorParseError> {
    let mut parser = Parser::new(input);
    let mut list = Vec::new();
    loop {
        let complex = parser.parse_complex()?;
        list.push(complex);
        parser.skip_whitespace();
        if parser.eat(',') {
            continue;
        }
        break;
    }
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    if list.is_empty() {
        return Err(SelectorParseError {
            offset: 0,
            message: "empty selector".to_owned(),
        });
    }
    Ok(list)
}

struct Parser<'input> {
    bytes: &'input [u8],
    pos: usize,
}

impl<'input> Parser<'input> {
    fn new(input: &'input str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, message: &str) -> SelectorParseError {
        SelectorParseError {
            offset: self.pos,
            message: message.to_owned(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected as u8) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorParseError> {
        self.skip_whitespace();
        let mut sequence: Vec<(CompoundSelector, Option<Combinator>)> = Vec::new();
        loop {
            let compound = self.parse_compound()?;
            let had_space = self.skip_whitespace();
            if self.eat('>') {
                self.skip_whitespace();
                sequence.push((compound, Some(Combinator::Child)));
                continue;
            }
            let at_boundary =
                self.at_end() || matches!(self.peek(), Some(b',') | Some(b')'));
            if had_space && !at_boundary {
                sequence.push((compound, Some(Combinator::Descendant)));
                continue;
            }
            sequence.push((compound, None));
            break;
        }
        Ok(ComplexSelector { sequence })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorParseError> {
        let mut simples = Vec::new();
        loop {
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    simples.push(SimpleSelector::Universal);
                }
                Some(b'#') => {
                    self.pos += 1;
                    let name = self.parse_identifier()?;
                    simples.push(SimpleSelector::Id(name));
                }
                Some(b'.') => {
                    self.pos += 1;
                    let name = self.parse_identifier()?;
                    simples.push(SimpleSelector::Class(name));
                }
                Some(b'[') => {
                    self.pos += 1;
                    simples.push(self.parse_attribute()?);
                }
                Some(b':') => {
                    self.pos += 1;
                    simples.push(self.parse_pseudo_class()?);
                }
                Some(byte) if is_ident_byte(byte) => {
                    let name = self.parse_identifier()?;
                    simples.push(SimpleSelector::Type(name.to_ascii_lowercase()));
                }
                _ => break,
            }
        }
        if simples.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(CompoundSelector { simples })
    }

    fn parse_identifier(&mut self) -> Result<String, SelectorParseError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        String::from_utf8(self.bytes[start..self.pos].to_vec())
            .map_err(|_| self.error("non-ascii identifier"))
    }

    fn parse_attribute(&mut self) -> Result<SimpleSelector, SelectorParseError> {
        self.skip_whitespace();
        let name = self.parse_identifier()?.to_ascii_lowercase();
        self.skip_whitespace();
        if self.eat(']') {
            return Ok(SimpleSelector::Attribute { name, value: None });
        }
        if !self.eat('=') {
            return Err(self.error("expected '=' or ']' in attribute selector"));
        }
        self.skip_whitespace();
        let value = self.parse_attribute_value()?;
        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error("unterminated attribute selector"));
        }
        Ok(SimpleSelector::Attribute {
            name,
            value: Some(value),
        })
    }

    fn parse_attribute_value(&mut self) -> Result<String, SelectorParseError> {
        let quote = match self.peek() {
            Some(byte @ (b'"' | b'\'')) => {
                self.pos += 1;
                Some(byte)
            }
            _ => None,
        };
        let start = self.pos;
        match quote {
            Some(quote_byte) => {
                while self.peek().is_some_and(|byte| byte != quote_byte) {
                    self.pos += 1;
                }
                if self.at_end() {
                    return Err(self.error("unterminated quoted value"));
                }
                let value = String::from_utf8(self.bytes[start..self.pos].to_vec())
                    .map_err(|_| self.error("invalid quoted value"))?;
                self.pos += 1;
                Ok(value)
            }
            None => {
                while self
                    .peek()
                    .is_some_and(|byte| byte != b']' && !byte.is_ascii_whitespace())
                {
                    self.pos += 1;
                }
                String::from_utf8(self.bytes[start..self.pos].to_vec())
                    .map_err(|_| self.error("invalid attribute value"))
            }
        }
    }

    fn parse_pseudo_class(&mut self) -> Result<SimpleSelector, SelectorParseError> {
        let name = self.parse_identifier()?.to_ascii_lowercase();
        if name != "nth-child" {
            return Err(self.error("unsupported pseudo-class"));
        }
        if !self.eat('(') {
            return Err(self.error("expected '(' after :nth-child"));
        }
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an index in :nth-child"));
        }
        let digits = String::from_utf8(self.bytes[start..self.pos].to_vec())
            .map_err(|_| self.error("invalid index"))?;
        let index: usize = digits
            .parse()
            .map_err(|_| self.error("index out of range"))?;
        if index == 0 {
            return Err(self.error(":nth-child is 1-based"));
        }
        self.skip_whitespace();
        if !self.eat(')') {
            return Err(self.error("unterminated :nth-child"));
        }
        Ok(SimpleSelector::NthChild(index))
    }
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}
