//! Token reader
//!
//! Pulls structural tokens out of a byte stream with exactly one token of
//! pushback.

use std::io::BufRead;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;

use crate::error::{Result, XmlRpcError};
use crate::fault::FaultCode;

/// A structural token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name>`
    Start(String),
    /// `</name>`
    End(String),
    /// Character data with references resolved
    Text(String),
    /// `<?xml ...?>` or another processing instruction
    Declaration,
}

impl Token {
    /// Character data made only of whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self, Token::Text(text) if text.trim().is_empty())
    }
}

/// Reads tokens from a markup stream
pub struct TokenReader<R> {
    reader: Reader<R>,

    /// Scratch space for quick-xml events
    buf: Vec<u8>,

    /// Token pushed back by `unread`
    peeked: Option<Token>,

    /// Markup event read past the end of a text run
    pending: Option<Token>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(input: R) -> Self {
        Self::with_buffer(input, Vec::new())
    }

    /// Create a reader that reuses an existing scratch allocation
    pub fn with_buffer(input: R, mut buf: Vec<u8>) -> Self {
        buf.clear();
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = true;
        config.trim_text(false);

        Self {
            reader,
            buf,
            peeked: None,
            pending: None,
        }
    }

    /// Give back the scratch allocation
    pub fn into_buffer(self) -> Vec<u8> {
        self.buf
    }

    /// Read the next token; `None` at end of input
    pub fn read(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.peeked.take() {
            return Ok(Some(token));
        }
        if let Some(token) = self.pending.take() {
            return Ok(Some(token));
        }
        self.next_token()
    }

    /// Push a token back so the next `read` returns it.
    ///
    /// # Panics
    /// If a token is already pushed back.
    pub fn unread(&mut self, token: Token) {
        assert!(self.peeked.is_none(), "token reader supports a single token of pushback");
        self.peeked = Some(token);
    }

    /// Skip whitespace-only character data
    pub fn trim(&mut self) -> Result<()> {
        while let Some(token) = self.read()? {
            if !token.is_blank() {
                self.unread(token);
                break;
            }
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let mut text: Option<String> = None;

        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf)? {
                Event::Text(e) => {
                    let chunk = e.decode().map_err(quick_xml::Error::from)?;
                    text.get_or_insert_with(String::new).push_str(&chunk);
                    continue;
                }
                Event::CData(e) => {
                    let chunk = e.decode().map_err(quick_xml::Error::from)?;
                    text.get_or_insert_with(String::new).push_str(&chunk);
                    continue;
                }
                Event::GeneralRef(e) => {
                    resolve_reference(&e, text.get_or_insert_with(String::new))?;
                    continue;
                }
                Event::Start(e) => Some(Token::Start(decode_name(e.local_name().as_ref())?)),
                Event::End(e) => Some(Token::End(decode_name(e.local_name().as_ref())?)),
                Event::Empty(e) => {
                    // empty elements are expanded into start/end pairs
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    return Err(FaultCode::MalformedInput
                        .fault(format!("unexpected empty element '{}'", name))
                        .into());
                }
                Event::Decl(_) | Event::PI(_) => Some(Token::Declaration),
                Event::Comment(_) | Event::DocType(_) => {
                    return Err(FaultCode::InvalidRequest
                        .fault("unsupported markup. comments and doctype are not allowed")
                        .into());
                }
                Event::Eof => None,
            };

            return Ok(match (text.take(), token) {
                (Some(text), Some(token)) => {
                    self.pending = Some(token);
                    Some(Token::Text(text))
                }
                (Some(text), None) => Some(Token::Text(text)),
                (None, token) => token,
            });
        }
    }
}

fn decode_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| FaultCode::InvalidCharacter.fault(format!("invalid element name: {}", e)).into())
}

/// Resolve `&name;` or `&#NN;` into `out`
fn resolve_reference(reference: &BytesRef<'_>, out: &mut String) -> Result<()> {
    let name = reference.decode().map_err(quick_xml::Error::from)?;

    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        };
        return match code.ok().and_then(char::from_u32) {
            Some(ch) => {
                out.push(ch);
                Ok(())
            }
            None => Err(malformed_reference(&name)),
        };
    }

    match resolve_predefined_entity(&name) {
        Some(resolved) => {
            out.push_str(resolved);
            Ok(())
        }
        None => Err(malformed_reference(&name)),
    }
}

fn malformed_reference(name: &str) -> XmlRpcError {
    FaultCode::MalformedInput
        .fault(format!("unknown character reference '&{};'", name))
        .into()
}
