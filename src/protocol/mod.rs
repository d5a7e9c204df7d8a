//! Protocol Module
//!
//! The XML-RPC wire format: fixed lookup tables, the token reader, and the
//! decoder/encoder pair built on top of it.
//!
//! ## Wire Grammar
//! ```text
//! call     := <methodCall> <methodName>TEXT</methodName> params? </methodCall>
//! response := <methodResponse> (params | <fault> value </fault>) </methodResponse>
//! params   := <params> (<param> value </param>)* </params>
//! value    := <value> (TEXT | scalar | array | struct)? </value>
//! scalar   := <int>|<i4>|<boolean>|<double>|<string>|<base64>|<dateTime.iso8601>
//! array    := <array><data> value* </data></array>
//! struct   := <struct> (<member><name>TEXT</name> value </member>)* </struct>
//! ```
//!
//! ## Asymmetries
//! - boolean: `1`, `true`, `0`, `false` accepted; `1` / `0` written
//! - dateTime: four formats accepted (see [`DATE_TIME_FORMATS`]); compact
//!   ISO-8601 written

mod token;
mod decoder;
mod writer;
mod encoder;

pub use token::{Token, TokenReader};
pub use decoder::Decoder;
pub use writer::Writer;
pub use encoder::Encoder;

use chrono::{DateTime as ChronoDateTime, NaiveDateTime};

use crate::value::DateTime;

/// Declaration written at the top of every call and response
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Accepted boolean bodies
pub const BOOLEAN_TEXT: [(&str, bool); 4] = [("1", true), ("true", true), ("0", false), ("false", false)];

/// chrono pattern of the compact ISO-8601 form written by the encoder
pub const DATE_TIME_WRITE_FORMAT: &str = "%Y%m%dT%H:%M:%S";

macro_rules! wire_tags {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Element names of the wire grammar
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Tag {
            $($variant,)*
        }

        impl Tag {
            /// Element name as it appears on the wire
            pub const fn name(self) -> &'static str {
                match self {
                    $(Tag::$variant => $name,)*
                }
            }

            /// Pre-rendered start tag
            pub const fn open(self) -> &'static str {
                match self {
                    $(Tag::$variant => concat!("<", $name, ">"),)*
                }
            }

            /// Pre-rendered end tag
            pub const fn close(self) -> &'static str {
                match self {
                    $(Tag::$variant => concat!("</", $name, ">"),)*
                }
            }

            pub fn from_name(name: &str) -> Option<Tag> {
                match name {
                    $($name => Some(Tag::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

wire_tags! {
    MethodCall => "methodCall",
    MethodName => "methodName",
    MethodResponse => "methodResponse",
    Params => "params",
    Param => "param",
    Fault => "fault",
    Value => "value",
    Struct => "struct",
    Member => "member",
    Name => "name",
    Array => "array",
    Data => "data",
    Boolean => "boolean",
    Int => "int",
    I4 => "i4",
    Double => "double",
    String => "string",
    Base64 => "base64",
    DateTime => "dateTime.iso8601",
}

impl Tag {
    /// Whether this tag may appear directly inside `<value>`
    pub const fn is_value_type(self) -> bool {
        matches!(
            self,
            Tag::String
                | Tag::Boolean
                | Tag::Int
                | Tag::I4
                | Tag::Double
                | Tag::Base64
                | Tag::DateTime
                | Tag::Array
                | Tag::Struct
        )
    }
}

// =============================================================================
// Date/Time Formats
// =============================================================================

/// Accepted `dateTime.iso8601` layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeFormat {
    /// `20060102T15:04:05`
    CompactIso8601,
    /// `2006-01-02T15:04:05Z` or with a numeric offset
    Rfc3339,
    /// `2006-01-02T15:04:05-07:00`
    HyphenatedOffset,
    /// `2006-01-02T15:04:05`, read as UTC
    HyphenatedLocal,
}

/// Decode priority: the first format that parses wins
pub const DATE_TIME_FORMATS: [DateTimeFormat; 4] = [
    DateTimeFormat::CompactIso8601,
    DateTimeFormat::Rfc3339,
    DateTimeFormat::HyphenatedOffset,
    DateTimeFormat::HyphenatedLocal,
];

impl DateTimeFormat {
    pub fn parse(self, text: &str) -> Option<DateTime> {
        match self {
            DateTimeFormat::CompactIso8601 => {
                let (date, time) = text.split_once('T')?;
                if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let hyphenated = format!("{}-{}-{}T{}", &date[..4], &date[4..6], &date[6..], time);
                DateTimeFormat::HyphenatedLocal.parse(&hyphenated)
            }
            DateTimeFormat::Rfc3339 => ChronoDateTime::parse_from_rfc3339(text).ok(),
            DateTimeFormat::HyphenatedOffset => {
                ChronoDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%:z").ok()
            }
            DateTimeFormat::HyphenatedLocal => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc().fixed_offset()),
        }
    }
}

/// Try every accepted format in priority order
pub fn parse_date_time(text: &str) -> Option<(DateTimeFormat, DateTime)> {
    DATE_TIME_FORMATS
        .into_iter()
        .find_map(|format| format.parse(text).map(|dt| (format, dt)))
}

/// Render a double as fixed-point with trailing zeros trimmed, keeping at
/// least one fractional digit
pub fn format_double(d: f64) -> String {
    let mut text = format!("{:.6}", d);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    }
    text
}
