//! XML-RPC decoder
//!
//! Recursive-descent reader for calls, responses and bare values.

use std::io::BufRead;
use std::mem;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Result, XmlRpcError};
use crate::fault::FaultCode;
use crate::value::{DateTime, Kind, Member, MethodCall, MethodResponse, Params, Value};

use super::{parse_date_time, Tag, Token, TokenReader, BOOLEAN_TEXT};

/// Reusable decoder state.
///
/// Holds the scratch allocation handed to each call's token reader; everything
/// else lives only for the duration of one read.
#[derive(Debug, Default)]
pub struct Decoder {
    buf: Vec<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Clear per-call state, shrinking the scratch buffer past `max_capacity`
    pub fn reset(&mut self, max_capacity: usize) {
        self.buf.clear();
        if self.buf.capacity() > max_capacity {
            self.buf.shrink_to(max_capacity);
        }
    }

    /// Decode a `methodCall` document
    pub fn read_call<R: BufRead>(&mut self, input: R) -> Result<MethodCall> {
        self.parse(input, Parser::read_call)
    }

    /// Decode a `methodResponse` document
    pub fn read_response<R: BufRead>(&mut self, input: R) -> Result<MethodResponse> {
        self.parse(input, Parser::read_response)
    }

    /// Decode a single `<value>` element
    pub fn read_value<R: BufRead>(&mut self, input: R) -> Result<Value> {
        self.parse(input, |parser| {
            parser.read_header()?;
            parser.read_value()
        })
    }

    fn parse<R, T, F>(&mut self, input: R, f: F) -> Result<T>
    where
        R: BufRead,
        F: FnOnce(&mut Parser<R>) -> Result<T>,
    {
        let mut parser = Parser {
            tokens: TokenReader::with_buffer(input, mem::take(&mut self.buf)),
        };
        let result = f(&mut parser);
        self.buf = parser.tokens.into_buffer();
        result
    }
}

struct Parser<R> {
    tokens: TokenReader<R>,
}

impl<R: BufRead> Parser<R> {
    // =========================================================================
    // Envelopes
    // =========================================================================

    /// Skip an optional leading declaration
    fn read_header(&mut self) -> Result<()> {
        self.tokens.trim()?;
        match self.tokens.read()? {
            Some(Token::Declaration) | None => Ok(()),
            Some(token) => {
                self.tokens.unread(token);
                Ok(())
            }
        }
    }

    fn read_call(&mut self) -> Result<MethodCall> {
        self.read_header()?;
        self.expect_start(Tag::MethodCall)?;

        self.expect_start(Tag::MethodName)?;
        let method = self.read_text()?.unwrap_or_default();
        self.expect_end(Tag::MethodName)?;

        let params = if self.next_start_is(Tag::Params)? {
            self.read_params()?
        } else {
            Params::default()
        };

        self.expect_end(Tag::MethodCall)?;
        Ok(MethodCall { method, params })
    }

    /// A response without `<params>` is read as a fault
    fn read_response(&mut self) -> Result<MethodResponse> {
        self.read_header()?;
        self.expect_start(Tag::MethodResponse)?;

        let mut response = MethodResponse::default();
        if self.next_start_is(Tag::Params)? {
            response.params = self.read_params()?;
        } else {
            self.expect_start(Tag::Fault)?;
            let fault = self.read_value()?;
            if fault.kind() != Kind::Struct {
                return Err(invalid(format!("fault must be a struct, got {}", fault.kind())));
            }
            response.fault = fault;
            self.expect_end(Tag::Fault)?;
        }

        self.expect_end(Tag::MethodResponse)?;
        Ok(response)
    }

    /// Reads the body of `<params>`, up to and including its end tag
    fn read_params(&mut self) -> Result<Params> {
        let mut params = Vec::new();
        while self.next_start_is(Tag::Param)? {
            params.push(self.read_value()?);
            self.expect_end(Tag::Param)?;
        }
        self.expect_end(Tag::Params)?;
        Ok(Params(params))
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn read_value(&mut self) -> Result<Value> {
        self.expect_start(Tag::Value)?;

        let text = self.read_text()?;
        match self.next()? {
            // untyped content is a string; no content at all is nil
            Token::End(name) if name == Tag::Value.name() => Ok(text.map_or(Value::Nil, Value::String)),
            Token::Start(name) => {
                if let Some(text) = text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    return Err(invalid(format!("unexpected text '{}' before <{}>", text, name)));
                }
                let tag = Tag::from_name(&name)
                    .filter(|tag| tag.is_value_type())
                    .ok_or_else(|| invalid(format!("parsing error. expected valid rpc value element got '{}'", name)))?;

                let value = match tag {
                    Tag::Array => self.read_array()?,
                    Tag::Struct => self.read_struct()?,
                    scalar => self.read_scalar(scalar)?,
                };
                self.expect_end(Tag::Value)?;
                Ok(value)
            }
            other => Err(unexpected(Tag::Value.close(), &other)),
        }
    }

    fn read_scalar(&mut self, tag: Tag) -> Result<Value> {
        let text = self.read_text()?.unwrap_or_default();
        self.expect_end(tag)?;

        match tag {
            Tag::String => Ok(Value::String(text)),
            Tag::Boolean => BOOLEAN_TEXT
                .iter()
                .find(|(body, _)| *body == text)
                .map(|(_, b)| Value::Boolean(*b))
                .ok_or_else(|| invalid(format!("error reading boolean '{}'", text))),
            Tag::Int | Tag::I4 => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| invalid(format!("error reading int '{}'", text))),
            Tag::Double => text
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| invalid(format!("error reading double '{}'", text))),
            Tag::Base64 => {
                let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                STANDARD
                    .decode(compact)
                    .map(Value::Base64)
                    .map_err(|e| invalid(format!("error reading base64: {}", e)))
            }
            Tag::DateTime => {
                let dt = match parse_date_time(&text) {
                    Some((_, dt)) => dt,
                    None => {
                        tracing::warn!(text = %text, "unrecognized dateTime.iso8601 body, using epoch");
                        DateTime::default()
                    }
                };
                Ok(Value::DateTime(dt))
            }
            other => Err(invalid(format!("unhandled tag '{}'", other.name()))),
        }
    }

    /// Reads the body of `<array>`, up to and including its end tag
    fn read_array(&mut self) -> Result<Value> {
        self.expect_start(Tag::Data)?;

        let mut items = Vec::new();
        loop {
            self.tokens.trim()?;
            match self.next()? {
                Token::Start(name) if name == Tag::Value.name() => {
                    self.tokens.unread(Token::Start(name));
                    items.push(self.read_value()?);
                }
                Token::Start(name) => {
                    return Err(invalid(format!("parsing error. invalid element '{}'", name)));
                }
                other => {
                    self.tokens.unread(other);
                    break;
                }
            }
        }

        self.expect_end(Tag::Data)?;
        self.expect_end(Tag::Array)?;
        Ok(Value::Array(items))
    }

    /// Reads the body of `<struct>`, up to and including its end tag
    fn read_struct(&mut self) -> Result<Value> {
        let mut members = Vec::new();
        while self.next_start_is(Tag::Member)? {
            self.expect_start(Tag::Name)?;
            let name = self
                .read_text()?
                .ok_or_else(|| invalid("struct member without a name"))?;
            self.expect_end(Tag::Name)?;

            let value = self.read_value()?;
            self.expect_end(Tag::Member)?;
            members.push(Member { name, value });
        }

        self.expect_end(Tag::Struct)?;
        Ok(Value::Struct(members))
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Next token; end of input is an error here
    fn next(&mut self) -> Result<Token> {
        self.tokens
            .read()?
            .ok_or_else(|| FaultCode::MalformedInput.fault("unexpected end of input").into())
    }

    /// Character data if the next token is text
    fn read_text(&mut self) -> Result<Option<String>> {
        match self.next()? {
            Token::Text(text) => Ok(Some(text)),
            other => {
                self.tokens.unread(other);
                Ok(None)
            }
        }
    }

    /// Consume the start tag `tag` if it comes next
    fn next_start_is(&mut self, tag: Tag) -> Result<bool> {
        self.tokens.trim()?;
        match self.next()? {
            Token::Start(name) if name == tag.name() => Ok(true),
            other => {
                self.tokens.unread(other);
                Ok(false)
            }
        }
    }

    fn expect_start(&mut self, tag: Tag) -> Result<()> {
        self.tokens.trim()?;
        match self.next()? {
            Token::Start(name) if name == tag.name() => Ok(()),
            other => Err(unexpected(tag.open(), &other)),
        }
    }

    fn expect_end(&mut self, tag: Tag) -> Result<()> {
        self.tokens.trim()?;
        match self.next()? {
            Token::End(name) if name == tag.name() => Ok(()),
            other => Err(unexpected(tag.close(), &other)),
        }
    }
}

fn invalid(message: impl Into<String>) -> XmlRpcError {
    FaultCode::InvalidRequest.fault(message).into()
}

fn unexpected(expected: &str, found: &Token) -> XmlRpcError {
    let found = match found {
        Token::Start(name) => format!("<{}>", name),
        Token::End(name) => format!("</{}>", name),
        Token::Text(text) => format!("text '{}'", text.trim()),
        Token::Declaration => "declaration".to_string(),
    };
    invalid(format!("parsing error. expected {} but got {}", expected, found))
}
