//! Table-driven parser.
//!
//! A single pass walks the input one symbol at a time. Each symbol's
//! [`CharClass`](crate::charmap::CharClass) and the current state select
//! exactly one action out of a
//! `const` dispatch table; no action looks ahead further than the symbol it
//! was handed. Scalar text accumulates in a byte buffer and is materialized
//! only when a delimiter (or the end of input) forces it, so the automaton
//! itself never backtracks.
//!
//! The grammar is a permissive superset of JSON: `//` and `/* */` comments,
//! unquoted tokens, unbraced top-level documents, `;` as a separator, and
//! trailing commas inside arrays all parse. Comments are handled by
//! dedicated states and are invisible to whatever value surrounds them.
//! A repeated attribute name folds its values into an array instead of
//! overwriting.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::Path;

use crate::charmap::{classify, utf8_extra_bytes, CLASS_COUNT};
use crate::cursor::{Cursor, TextPosition};
use crate::error::{Error, Result};
use crate::node::{Document, NodeId, NodeType};
use crate::strings;

/// Parses a string into a fresh document.
pub fn parse(input: &str) -> Result<Document> {
    let mut doc = Document::new();
    doc.parse_str(input)?;
    Ok(doc)
}

impl Document {
    /// Parses `input` into this document's root object.
    pub fn parse_str(&mut self, input: &str) -> Result<()> {
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.parse_reader(input.as_bytes())
    }

    /// Parses the contents of a file into this document's root object.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::File {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_reader(BufReader::new(file))
    }

    /// Parses from any buffered reader into this document's root object.
    ///
    /// On any error the root object is cleared before the error is
    /// returned; a failed parse never leaves a partial tree behind.
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let root = self.root();
        match self.parse_inner(reader) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.clear(root);
                Err(error)
            }
        }
    }

    fn parse_inner<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut cursor = Cursor::new(reader)?;
        let root = self.root();
        let mut data = ParseData {
            doc: self,
            parent: Some(root),
            stack: Vec::new(),
            attribute: String::new(),
            buffer: Vec::new(),
            is_variable: false,
            state: State::Document,
            restore: State::Document,
            pending: Pending::None,
        };

        while cursor.valid() {
            let sym = cursor.symbol();
            let pos = cursor.position();
            let action = ACTIONS[data.state as usize][classify(sym) as usize];
            action(sym, pos, &mut data)?;
            cursor.advance()?;
        }

        // A scalar still in flight at end of input completes as if a
        // delimiter followed it, which is what lets unbraced documents and
        // trailing comments parse. Nothing to do once the root has closed.
        if !data.buffer.is_empty() && data.parent.is_some() {
            data.setup_value(0, cursor.position())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Document,
    Variable,
    QuotedString,
    EscapeChar,
    Value,
    Integer,
    Fraction,
    ExponentSign,
    Exponent,
    AttributeName,
    ObjectSeparator,
    ArraySeparator,
    AttributeOrEnd,
    CommentStart,
    LineComment,
    BlockComment,
    BlockCommentEnd,
}

const STATE_COUNT: usize = 17;

/// What the accumulated buffer will become when it flushes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Text,
    Number,
    Object,
    Array,
}

struct ParseData<'a> {
    doc: &'a mut Document,
    /// Insertion point; `None` once an explicit root brace has closed.
    parent: Option<NodeId>,
    /// Containers descended through, outermost first. Closing a container
    /// resumes at the popped entry rather than the node's own parent link:
    /// the two differ when duplicate-key folding has spliced an implicit
    /// array between a container and the object it was written under.
    stack: Vec<NodeId>,
    attribute: String,
    buffer: Vec<u8>,
    is_variable: bool,
    state: State,
    /// State to return to when the current comment ends.
    restore: State,
    pending: Pending,
}

impl ParseData<'_> {
    fn setup_attribute_name(&mut self, pos: TextPosition) -> Result<()> {
        let buffer = mem::take(&mut self.buffer);
        self.attribute = decode_text(&buffer, pos)?;
        Ok(())
    }

    /// Materializes the pending value into the current parent. Container
    /// values descend, making the new container the parent.
    fn setup_value(&mut self, sym: u8, pos: TextPosition) -> Result<()> {
        let Some(parent) = self.parent else {
            return Err(unexpected(sym, pos));
        };
        match self.doc.node_type(parent) {
            NodeType::Object => self.flush_into_object(parent, pos),
            NodeType::Array => self.flush_into_array(parent, pos),
            _ => Err(unexpected(sym, pos)),
        }
    }

    fn flush_into_object(&mut self, parent: NodeId, pos: TextPosition) -> Result<()> {
        let attribute = mem::take(&mut self.attribute);
        match mem::replace(&mut self.pending, Pending::None) {
            Pending::Text => {
                let node = self.take_text_node(pos)?;
                self.doc.insert_attribute(parent, &attribute, node, false);
            }
            Pending::Number => {
                let value = self.take_number(pos)?;
                let node = self.doc.new_number(value);
                self.doc.insert_attribute(parent, &attribute, node, false);
            }
            Pending::Object => {
                let node = self.doc.new_object();
                self.doc.insert_attribute(parent, &attribute, node, false);
                self.stack.push(parent);
                self.parent = Some(node);
            }
            Pending::Array => {
                let node = self.doc.new_array();
                self.doc.insert_attribute(parent, &attribute, node, false);
                self.stack.push(parent);
                self.parent = Some(node);
            }
            Pending::None => {}
        }
        Ok(())
    }

    fn flush_into_array(&mut self, parent: NodeId, pos: TextPosition) -> Result<()> {
        match mem::replace(&mut self.pending, Pending::None) {
            Pending::Text => {
                let node = self.take_text_node(pos)?;
                self.doc.push_value(parent, node);
            }
            Pending::Number => {
                let value = self.take_number(pos)?;
                let node = self.doc.new_number(value);
                self.doc.push_value(parent, node);
            }
            Pending::Object => {
                let node = self.doc.new_object();
                self.doc.push_value(parent, node);
                self.stack.push(parent);
                self.parent = Some(node);
            }
            Pending::Array => {
                let node = self.doc.new_array();
                self.doc.push_value(parent, node);
                self.stack.push(parent);
                self.parent = Some(node);
            }
            Pending::None => {}
        }
        Ok(())
    }

    /// Unquoted tokens that read as a boolean become one; everything else
    /// becomes a string with its escapes decoded.
    fn take_text_node(&mut self, pos: TextPosition) -> Result<NodeId> {
        let buffer = mem::take(&mut self.buffer);
        let text = decode_text(&buffer, pos)?;
        if self.is_variable {
            if let Some(value) = strings::to_bool(&text) {
                return Ok(self.doc.new_boolean(value));
            }
        }
        Ok(self.doc.new_string(text))
    }

    fn take_number(&mut self, pos: TextPosition) -> Result<f64> {
        let buffer = mem::take(&mut self.buffer);
        std::str::from_utf8(&buffer)
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or(Error::InvalidNumber {
                line: pos.line,
                column: pos.column,
            })
    }

    /// Closes the current container: flushes the pending value, pops the
    /// descent stack, and resumes in the enclosing separator state.
    fn structure_up(&mut self, sym: u8, pos: TextPosition) -> Result<()> {
        self.setup_value(sym, pos)?;
        self.parent = self.stack.pop();
        self.state = match self.parent.map(|id| self.doc.node_type(id)) {
            Some(NodeType::Array) => State::ArraySeparator,
            _ => State::ObjectSeparator,
        };
        Ok(())
    }
}

fn unexpected(sym: u8, pos: TextPosition) -> Error {
    Error::UnexpectedChar {
        symbol: char::from(sym),
        line: pos.line,
        column: pos.column,
    }
}

type Action = fn(u8, TextPosition, &mut ParseData<'_>) -> Result<()>;

fn push(sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.buffer.push(sym);
    Ok(())
}

fn skip(_sym: u8, _pos: TextPosition, _data: &mut ParseData<'_>) -> Result<()> {
    Ok(())
}

fn fail(sym: u8, pos: TextPosition, _data: &mut ParseData<'_>) -> Result<()> {
    Err(unexpected(sym, pos))
}

/// `{` at document level: the root object itself is about to be filled.
fn doc_open(_sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.state = State::AttributeName;
    Ok(())
}

fn var_begin(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    if data.parent.is_none() {
        return Err(unexpected(sym, pos));
    }
    data.pending = Pending::Text;
    data.is_variable = true;
    data.state = State::Variable;
    data.buffer.push(sym);
    Ok(())
}

fn str_begin(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    if data.parent.is_none() {
        return Err(unexpected(sym, pos));
    }
    data.pending = Pending::Text;
    data.is_variable = false;
    data.state = State::QuotedString;
    Ok(())
}

/// Ends a quoted string or unquoted token. Which separator state follows
/// depends on the parent, and on whether an attribute name is still owed.
fn str_end(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    let Some(parent) = data.parent else {
        return Err(unexpected(sym, pos));
    };
    data.state = match data.doc.node_type(parent) {
        NodeType::Array => State::ArraySeparator,
        NodeType::Object => {
            if data.attribute.is_empty() {
                State::AttributeOrEnd
            } else {
                State::ObjectSeparator
            }
        }
        _ => return Err(unexpected(sym, pos)),
    };
    Ok(())
}

fn esc_begin(_sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.buffer.push(b'\\');
    data.state = State::EscapeChar;
    Ok(())
}

fn esc_char(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    match sym {
        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' | b'u' => {
            data.buffer.push(sym);
            data.state = State::QuotedString;
            Ok(())
        }
        _ => Err(Error::InvalidEscape {
            symbol: char::from(sym),
            line: pos.line,
            column: pos.column,
        }),
    }
}

/// `:` after an attribute name.
fn attr_colon(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    match data.parent.map(|id| data.doc.node_type(id)) {
        Some(NodeType::Object) => {
            data.setup_attribute_name(pos)?;
            data.state = State::Value;
            Ok(())
        }
        _ => Err(unexpected(sym, pos)),
    }
}

fn int_begin(sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.pending = Pending::Number;
    data.state = State::Integer;
    data.buffer.push(sym);
    Ok(())
}

fn frac_begin(sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.pending = Pending::Number;
    data.state = State::Fraction;
    data.buffer.push(sym);
    Ok(())
}

fn exp_begin(sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.pending = Pending::Number;
    data.state = State::ExponentSign;
    data.buffer.push(sym);
    Ok(())
}

fn exp_digit(sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.state = State::Exponent;
    data.buffer.push(sym);
    Ok(())
}

/// Leading sign of a number. A `+` is legal but contributes nothing.
fn sign_begin(sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.pending = Pending::Number;
    data.state = State::Integer;
    if sym == b'-' {
        data.buffer.push(sym);
    }
    Ok(())
}

/// Whitespace after a number: the value stays pending until a separator
/// or closer materializes it.
fn num_end(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    let Some(parent) = data.parent else {
        return Err(unexpected(sym, pos));
    };
    data.state = match data.doc.node_type(parent) {
        NodeType::Array => State::ArraySeparator,
        NodeType::Object => State::ObjectSeparator,
        _ => return Err(unexpected(sym, pos)),
    };
    Ok(())
}

fn obj_open(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.pending = Pending::Object;
    data.setup_value(sym, pos)?;
    data.state = State::AttributeName;
    Ok(())
}

/// `{` straight after an unquoted attribute name.
fn obj_open_named(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.setup_attribute_name(pos)?;
    obj_open(sym, pos, data)
}

fn obj_close(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    match data.parent.map(|id| data.doc.node_type(id)) {
        Some(NodeType::Object) => data.structure_up(sym, pos),
        _ => Err(unexpected(sym, pos)),
    }
}

fn arr_open(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.pending = Pending::Array;
    data.setup_value(sym, pos)?;
    data.state = State::Value;
    Ok(())
}

fn arr_open_named(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.setup_attribute_name(pos)?;
    arr_open(sym, pos, data)
}

fn arr_close(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    match data.parent.map(|id| data.doc.node_type(id)) {
        Some(NodeType::Array) => data.structure_up(sym, pos),
        _ => Err(unexpected(sym, pos)),
    }
}

/// `,` or `;`: flush the pending value and expect the next one.
fn val_next(sym: u8, pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    let Some(parent) = data.parent else {
        return Err(unexpected(sym, pos));
    };
    data.setup_value(sym, pos)?;
    data.state = match data.doc.node_type(parent) {
        NodeType::Array => State::Value,
        _ => State::AttributeName,
    };
    Ok(())
}

fn com_begin(_sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.restore = data.state;
    data.state = State::CommentStart;
    Ok(())
}

fn com_line(_sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.state = State::LineComment;
    Ok(())
}

fn com_block(_sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.state = State::BlockComment;
    Ok(())
}

fn com_star(_sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.state = State::BlockCommentEnd;
    Ok(())
}

fn com_close(_sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    data.state = data.restore;
    Ok(())
}

fn com_eol(sym: u8, _pos: TextPosition, data: &mut ParseData<'_>) -> Result<()> {
    if sym == b'\n' {
        data.state = data.restore;
    }
    Ok(())
}

/// One action per `(state, class)` pair. Column order matches the
/// declaration order of `CharClass`:
///
/// ```text
/// Alpha Exponent Other Digit Dot Sign Star Space Quote Backslash
/// Slash Colon { } [ ] Comma Bad
/// ```
#[rustfmt::skip]
const ACTIONS: [[Action; CLASS_COUNT]; STATE_COUNT] = [
    // Document
    [var_begin, var_begin, fail, fail, fail, fail, fail, skip, str_begin, fail,
     com_begin, fail, doc_open, fail, fail, fail, fail, fail],
    // Variable
    [push, push, fail, push, fail, fail, push, str_end, fail, fail,
     push, attr_colon, obj_open_named, obj_close, arr_open_named, arr_close, val_next, fail],
    // QuotedString
    [push, push, push, push, push, push, push, push, str_end, esc_begin,
     push, push, push, push, push, push, push, fail],
    // EscapeChar
    [esc_char, esc_char, fail, fail, fail, fail, fail, fail, esc_char, esc_char,
     esc_char, fail, fail, fail, fail, fail, fail, fail],
    // Value
    [var_begin, var_begin, fail, int_begin, fail, sign_begin, fail, skip, str_begin, fail,
     com_begin, fail, obj_open, fail, arr_open, arr_close, val_next, fail],
    // Integer
    [fail, exp_begin, fail, push, frac_begin, fail, fail, num_end, fail, fail,
     com_begin, fail, fail, obj_close, fail, arr_close, val_next, fail],
    // Fraction
    [fail, exp_begin, fail, push, fail, fail, fail, num_end, fail, fail,
     com_begin, fail, fail, obj_close, fail, arr_close, val_next, fail],
    // ExponentSign
    [fail, fail, fail, exp_digit, fail, exp_digit, fail, fail, fail, fail,
     com_begin, fail, fail, fail, fail, fail, fail, fail],
    // Exponent
    [fail, fail, fail, push, fail, fail, fail, num_end, fail, fail,
     com_begin, fail, fail, obj_close, fail, arr_close, val_next, fail],
    // AttributeName
    [var_begin, var_begin, fail, fail, fail, fail, fail, skip, str_begin, fail,
     com_begin, fail, fail, obj_close, fail, fail, fail, fail],
    // ObjectSeparator
    [fail, fail, fail, fail, fail, fail, fail, skip, fail, fail,
     com_begin, fail, fail, obj_close, fail, fail, val_next, fail],
    // ArraySeparator
    [fail, fail, fail, fail, fail, fail, fail, skip, fail, fail,
     com_begin, fail, fail, fail, fail, arr_close, val_next, fail],
    // AttributeOrEnd
    [fail, fail, fail, fail, fail, fail, fail, skip, fail, fail,
     com_begin, attr_colon, obj_open_named, fail, arr_open_named, fail, fail, fail],
    // CommentStart
    [fail, fail, fail, fail, fail, fail, com_block, fail, fail, fail,
     com_line, fail, fail, fail, fail, fail, fail, fail],
    // LineComment
    [skip, skip, skip, skip, skip, skip, skip, com_eol, skip, skip,
     skip, skip, skip, skip, skip, skip, skip, fail],
    // BlockComment
    [skip, skip, skip, skip, skip, skip, com_star, skip, skip, skip,
     skip, skip, skip, skip, skip, skip, skip, fail],
    // BlockCommentEnd
    [com_block, com_block, com_block, com_block, com_block, com_block, skip, com_block, com_block, com_block,
     com_close, com_block, com_block, com_block, com_block, com_block, com_block, fail],
];

/// Reads the four hex digits of a `\u` escape starting at `at`.
fn hex_unit(buffer: &[u8], at: usize) -> Option<u32> {
    buffer
        .get(at..at + 4)
        .and_then(|digits| std::str::from_utf8(digits).ok())
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
}

/// Decodes accumulated raw bytes into text: escape sequences become their
/// characters and multi-byte UTF-8 sequences are validated whole.
fn decode_text(buffer: &[u8], pos: TextPosition) -> Result<String> {
    let mut out = String::with_capacity(buffer.len());
    let mut i = 0;
    while i < buffer.len() {
        let byte = buffer[i];
        if byte == b'\\' {
            let Some(&escape) = buffer.get(i + 1) else {
                return Err(Error::InvalidEscape {
                    symbol: '\\',
                    line: pos.line,
                    column: pos.column,
                });
            };
            match escape {
                b'"' => out.push('"'),
                b'\\' => out.push('\\'),
                b'/' => out.push('/'),
                b'b' => out.push('\u{8}'),
                b'f' => out.push('\u{c}'),
                b'n' => out.push('\n'),
                b'r' => out.push('\r'),
                b't' => out.push('\t'),
                b'u' => {
                    let err = || Error::InvalidUnicodeEscape {
                        line: pos.line,
                        column: pos.column,
                    };
                    let unit = hex_unit(buffer, i + 2).ok_or_else(err)?;
                    match unit {
                        // High surrogate: only valid as the first half of a
                        // pair, with the low half escaped right behind it.
                        0xD800..=0xDBFF => {
                            let next_is_escape = buffer.get(i + 6) == Some(&b'\\')
                                && buffer.get(i + 7) == Some(&b'u');
                            let low = if next_is_escape {
                                hex_unit(buffer, i + 8)
                            } else {
                                None
                            };
                            match low {
                                Some(low @ 0xDC00..=0xDFFF) => {
                                    let code =
                                        0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                                    out.push(char::from_u32(code).ok_or_else(err)?);
                                    i += 12;
                                }
                                _ => return Err(err()),
                            }
                        }
                        // A low surrogate with no high half before it.
                        0xDC00..=0xDFFF => return Err(err()),
                        code => {
                            out.push(char::from_u32(code).ok_or_else(err)?);
                            i += 6;
                        }
                    }
                    continue;
                }
                other => {
                    return Err(Error::InvalidEscape {
                        symbol: char::from(other),
                        line: pos.line,
                        column: pos.column,
                    })
                }
            }
            i += 2;
            continue;
        }
        match utf8_extra_bytes(byte) {
            Some(0) => {
                out.push(char::from(byte));
                i += 1;
            }
            Some(extra) => {
                let end = i + 1 + extra;
                let chunk = buffer.get(i..end).ok_or(Error::InvalidUtf8 {
                    line: pos.line,
                    column: pos.column,
                })?;
                let piece = std::str::from_utf8(chunk).map_err(|_| Error::InvalidUtf8 {
                    line: pos.line,
                    column: pos.column,
                })?;
                out.push_str(piece);
                i = end;
            }
            None => {
                return Err(Error::InvalidUtf8 {
                    line: pos.line,
                    column: pos.column,
                })
            }
        }
    }
    Ok(out)
}
