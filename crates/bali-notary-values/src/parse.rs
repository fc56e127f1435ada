//! Recursive-descent parser for the canonical text notation.
//!
//! The parser is whitespace-tolerant between tokens but otherwise accepts
//! exactly the grammar the formatter emits, so `parse(format(c)) == c`.

use crate::base32;
use crate::component::{is_symbol, Catalog, Component, Parameters, Value};
use crate::error::ValueError;
use crate::moment::Moment;
use crate::tag::Tag;
use crate::version::Version;
use crate::MAX_DEPTH;

/// Parse a component from its canonical text.
///
/// Leading and trailing whitespace (including the trailing LF on persisted
/// artifacts) is accepted; anything else after the component is an error.
pub fn parse_component(text: &str) -> Result<Component, ValueError> {
    let mut parser = Parser {
        input: text.as_bytes(),
        pos: 0,
    };
    parser.skip_whitespace();
    let component = parser.component(0)?;
    parser.skip_whitespace();
    if parser.pos != parser.input.len() {
        return Err(parser.error("trailing characters after component"));
    }
    Ok(component)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn component(&mut self, depth: usize) -> Result<Component, ValueError> {
        if depth > MAX_DEPTH {
            return Err(ValueError::TooDeep(MAX_DEPTH));
        }
        let value = self.value(depth)?;
        if self.peek() == Some(b'(') {
            let parameters = self.parameters(depth)?;
            Ok(Component::with_parameters(value, parameters))
        } else {
            Ok(Component::new(value))
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, ValueError> {
        match self.peek() {
            Some(b'n') => {
                self.literal("none")?;
                Ok(Value::None)
            }
            Some(b'"') => self.text(),
            Some(b'\'') => self.binary(),
            Some(b'#') => self.tag(),
            Some(b'v') => self.version(),
            Some(b'<') => self.moment(),
            Some(b'/') => self.name(),
            Some(b'[') => self.catalog(depth),
            _ => Err(self.error("expected a value")),
        }
    }

    fn text(&mut self) -> Result<Value, ValueError> {
        self.expect(b'"')?;
        let mut bytes = Vec::new();
        loop {
            match self.bump() {
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'"') => bytes.push(b'"'),
                    Some(b'\\') => bytes.push(b'\\'),
                    Some(b'n') => bytes.push(b'\n'),
                    Some(b'r') => bytes.push(b'\r'),
                    Some(b't') => bytes.push(b'\t'),
                    _ => return Err(self.error("invalid escape sequence")),
                },
                Some(byte) => bytes.push(byte),
                None => return Err(self.error("unterminated text string")),
            }
        }
        // The input slice is valid UTF-8 and only ASCII delimiters were
        // stripped, so the collected bytes are valid UTF-8 as well.
        let text = String::from_utf8(bytes).map_err(|_| self.error("invalid UTF-8 in text"))?;
        Ok(Value::Text(text))
    }

    fn binary(&mut self) -> Result<Value, ValueError> {
        self.expect(b'\'')?;
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte == b'\'' {
                let encoded = std::str::from_utf8(&self.input[start..self.pos])
                    .expect("base-32 text is ASCII");
                self.bump();
                return Ok(Value::Binary(base32::decode(encoded)?));
            }
            self.bump();
        }
        Err(self.error("unterminated binary string"))
    }

    fn tag(&mut self) -> Result<Value, ValueError> {
        self.expect(b'#')?;
        let encoded = self.take_while(|b| b.is_ascii_alphanumeric());
        Ok(Value::Tag(Tag::from_base32(encoded)?))
    }

    fn version(&mut self) -> Result<Value, ValueError> {
        self.expect(b'v')?;
        let digits = self.take_while(|b| b.is_ascii_digit() || b == b'.');
        if digits.is_empty() {
            return Err(self.error("expected version digits after 'v'"));
        }
        Ok(Value::Version(Version::from_text(digits)?))
    }

    fn moment(&mut self) -> Result<Value, ValueError> {
        self.expect(b'<')?;
        let inner = self.take_while(|b| b != b'>');
        let moment = Moment::from_text(inner)?;
        self.expect(b'>')?;
        Ok(Value::Moment(moment))
    }

    fn name(&mut self) -> Result<Value, ValueError> {
        let start = self.pos;
        while self.peek() == Some(b'/') {
            self.bump();
            let segment = self.take_while(|b| b.is_ascii_alphanumeric());
            if segment.is_empty() {
                return Err(self.error("empty name segment"));
            }
        }
        let name = std::str::from_utf8(&self.input[start..self.pos])
            .expect("name text is ASCII")
            .to_string();
        Ok(Value::Name(name))
    }

    fn catalog(&mut self, depth: usize) -> Result<Value, ValueError> {
        self.expect(b'[')?;
        self.skip_whitespace();
        if self.peek() == Some(b':') {
            self.bump();
            self.skip_whitespace();
            self.expect(b']')?;
            return Ok(Value::Catalog(Catalog::new()));
        }
        let mut catalog = Catalog::new();
        loop {
            let key = self.symbol()?;
            self.expect(b':')?;
            self.skip_whitespace();
            let component = self.component(depth + 1)?;
            catalog.set(&key, component);
            self.skip_whitespace();
            match self.peek() {
                Some(b']') => {
                    self.bump();
                    return Ok(Value::Catalog(catalog));
                }
                Some(b'$') => continue,
                _ => return Err(self.error("expected '$' or ']' in catalog")),
            }
        }
    }

    fn parameters(&mut self, depth: usize) -> Result<Parameters, ValueError> {
        self.expect(b'(')?;
        let mut parameters = Parameters::new();
        loop {
            self.skip_whitespace();
            let key = self.symbol()?;
            self.expect(b':')?;
            self.skip_whitespace();
            let component = self.component(depth + 1)?;
            parameters.set(&key, component);
            self.skip_whitespace();
            match self.bump() {
                Some(b',') => continue,
                Some(b')') => return Ok(parameters),
                _ => return Err(self.error("expected ',' or ')' in parameters")),
            }
        }
    }

    fn symbol(&mut self) -> Result<String, ValueError> {
        self.expect(b'$')?;
        let name = self.take_while(|b| b.is_ascii_alphanumeric()).to_string();
        if !is_symbol(&name) {
            return Err(ValueError::InvalidSymbol(name));
        }
        Ok(name)
    }

    fn literal(&mut self, literal: &str) -> Result<(), ValueError> {
        if self.input[self.pos..].starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(self.error("expected literal"))
        }
    }

    fn take_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if !predicate(byte) {
                break;
            }
            self.pos += 1;
        }
        std::str::from_utf8(&self.input[start..self.pos]).expect("matched bytes are ASCII")
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\n' | b'\r' | b'\t')) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, byte: u8) -> Result<(), ValueError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error("unexpected character"))
        }
    }

    fn error(&self, message: &str) -> ValueError {
        ValueError::Parse {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip(component: &Component) {
        let text = component.to_canonical_string();
        let parsed = parse_component(&text).unwrap();
        assert_eq!(&parsed, component, "canonical text: {text}");
    }

    #[test]
    fn test_leaves_roundtrip() {
        roundtrip(&Component::none());
        roundtrip(&Component::text("hello \"world\"\n"));
        roundtrip(&Component::binary(vec![]));
        roundtrip(&Component::binary((0..=255).collect::<Vec<u8>>()));
        roundtrip(&Component::from(Tag::random()));
        roundtrip(&Component::from(Version::from_text("1.2.3").unwrap()));
        roundtrip(&Component::from(Moment::from_millis(1736870400123).unwrap()));
        roundtrip(&Component::name("/bali/notary/Document/v1"));
    }

    #[test]
    fn test_catalog_roundtrip() {
        let mut inner = Catalog::new();
        inner.set("foo", Component::text("bar"));
        let mut catalog = Catalog::new();
        catalog.set("component", Component::from(inner));
        catalog.set("protocol", Component::from(Version::initial()));
        catalog.set("certificate", Component::none());
        catalog.set("signature", Component::binary(vec![1, 2, 3, 4, 5]));
        roundtrip(&Component::from(catalog));
    }

    #[test]
    fn test_parameterized_roundtrip() {
        let mut citation = Catalog::new();
        citation.set("protocol", Component::from(Version::initial()));
        citation.set("tag", Component::from(Tag::random()));
        citation.set("digest", Component::binary(vec![0xab; 64]));
        let mut citation_parameters = Parameters::new();
        citation_parameters.set("type", Component::name("/bali/notary/Citation/v1"));
        let citation = Component::with_parameters(Value::Catalog(citation), citation_parameters);

        let mut parameters = Parameters::new();
        parameters.set("type", Component::name("/bali/notary/Certificate/v1"));
        parameters.set("tag", Component::from(Tag::random()));
        parameters.set("version", Component::from(Version::initial()));
        parameters.set("permissions", Component::name("/bali/permissions/public/v1"));
        parameters.set("previous", citation);

        let mut catalog = Catalog::new();
        catalog.set("publicKey", Component::binary(vec![4; 65]));
        roundtrip(&Component::with_parameters(Value::Catalog(catalog), parameters));
    }

    #[test]
    fn test_trailing_newline_accepted() {
        let parsed = parse_component("none\n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(parse_component("none none").is_err());
        assert!(parse_component("[:] x").is_err());
    }

    #[test]
    fn test_malformed_inputs_are_errors_not_panics() {
        for text in [
            "", "[", "[$", "[$a:", "\"unterminated", "'AE'", "#ZZ", "v", "<>",
            "/", "none(", "none($x", "none($x: v1",
        ] {
            assert!(parse_component(text).is_err(), "accepted: {text}");
        }
    }

    proptest! {
        #[test]
        fn prop_binary_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let component = Component::binary(bytes);
            let text = component.to_canonical_string();
            prop_assert_eq!(parse_component(&text).unwrap(), component);
        }

        #[test]
        fn prop_text_roundtrip(text in "[ -~]{0,64}") {
            let component = Component::text(text);
            let rendered = component.to_canonical_string();
            prop_assert_eq!(parse_component(&rendered).unwrap(), component);
        }
    }
}
