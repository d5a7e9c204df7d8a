//! Tag writer
//!
//! Minimal streaming emitter: open tag, body, close tag.

use std::io::{self, Write};

use quick_xml::escape::escape;

use super::{Tag, XML_HEADER};

/// Writes pre-rendered tags around raw or escaped bodies
pub struct Writer<W> {
    out: W,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the XML declaration
    pub fn declaration(&mut self) -> io::Result<()> {
        self.out.write_all(XML_HEADER.as_bytes())
    }

    /// Write `body` verbatim inside `tag`
    pub fn raw(&mut self, tag: Tag, body: &str) -> io::Result<()> {
        self.out.write_all(tag.open().as_bytes())?;
        self.out.write_all(body.as_bytes())?;
        self.out.write_all(tag.close().as_bytes())
    }

    /// Write `text` inside `tag`, escaping only when needed
    pub fn text(&mut self, tag: Tag, text: &str) -> io::Result<()> {
        if needs_escape(text) {
            self.raw(tag, &escape(text))
        } else {
            self.raw(tag, text)
        }
    }

    /// Wrap whatever `body` writes in `tag`
    pub fn element<F>(&mut self, tag: Tag, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.out.write_all(tag.open().as_bytes())?;
        body(self)?;
        self.out.write_all(tag.close().as_bytes())
    }
}

/// Whether `text` contains any of `< > & ' "`
pub fn needs_escape(text: &str) -> bool {
    text.bytes().any(|b| matches!(b, b'<' | b'>' | b'&' | b'\'' | b'"'))
}
