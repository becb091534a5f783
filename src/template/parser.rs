use super::TemplateKind;
use super::ast::{
    ComparisonOperator, Condition, Keyword, PathKey, Replacement, Segment, Selector,
};
use super::TemplateError;

const ALT_ARROW: &str = "->";

/// Output of a successful parse: optional gate plus body segments.
pub(crate) type ParsedTemplate = (Option<Condition>, Vec<Segment>);

pub(crate) fn parse_template(input: &str, kind: TemplateKind) -> Result<ParsedTemplate, TemplateError> {
    let mut parser = Parser {
        input,
        pos: 0,
        kind,
    };
    parser.template()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    kind: TemplateKind,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, message: impl Into<String>) -> TemplateError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> TemplateError {
        TemplateError {
            input: self.input.to_string(),
            position,
            message: message.into(),
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), TemplateError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{token}`")))
        }
    }

    /// `->` is accepted wherever `>>` or `>>>` is.
    fn arrow(&mut self, token: &str) -> Result<(), TemplateError> {
        if self.eat(token) || self.eat(ALT_ARROW) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{token}` or `{ALT_ARROW}`")))
        }
    }

    fn at_arrow(&self) -> bool {
        self.rest().starts_with(">>") || self.rest().starts_with(ALT_ARROW)
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn template(&mut self) -> Result<ParsedTemplate, TemplateError> {
        let gate = if self.eat("@") {
            self.skip_ws();
            let condition = self.condition(self.kind)?;
            self.skip_ws();
            self.arrow(">>>")?;
            self.skip_ws();
            Some(condition)
        } else {
            None
        };
        let segments = self.segments()?;
        Ok((gate, segments))
    }

    fn segments(&mut self) -> Result<Vec<Segment>, TemplateError> {
        let mut segments = Vec::new();
        while !self.rest().is_empty() {
            if self.eat("{{") {
                segments.push(Segment::Placeholder(self.placeholder()?));
            } else if self.eat("[[") {
                segments.push(self.conditional()?);
            } else {
                let text = self.text_until(&["{{", "[["]);
                segments.push(Segment::Text(text.to_string()));
            }
        }
        Ok(segments)
    }

    /// Consumes text up to (not including) the first of `stops`.
    fn text_until(&mut self, stops: &[&str]) -> &'a str {
        let rest = self.rest();
        let end = stops
            .iter()
            .filter_map(|stop| rest.find(stop))
            .min()
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn placeholder(&mut self) -> Result<Selector, TemplateError> {
        self.skip_ws();
        let selector = self.selector(self.kind)?;
        self.skip_ws();
        self.expect("}}")?;
        Ok(selector)
    }

    fn conditional(&mut self) -> Result<Segment, TemplateError> {
        self.skip_ws();
        if self.at_arrow() {
            return Err(self.error("missing condition"));
        }
        let condition = self.condition(self.kind)?;
        self.skip_ws();
        self.arrow(">>")?;
        self.skip_ws();

        let mut replacement = Vec::new();
        loop {
            if self.rest().starts_with("]]") {
                break;
            }
            if self.rest().is_empty() {
                return Err(self.error("unterminated conditional, expected `]]`"));
            }
            if self.eat("{{") {
                replacement.push(Replacement::Selector(self.placeholder()?));
            } else {
                let text = self.text_until(&["{{", "]]"]);
                replacement.push(Replacement::Literal(text.to_string()));
            }
        }
        if let Some(Replacement::Literal(last)) = replacement.last_mut() {
            let trimmed = last.trim_end().len();
            last.truncate(trimmed);
            if last.is_empty() {
                replacement.pop();
            }
        }
        if replacement.is_empty() {
            return Err(self.error("empty replacement"));
        }
        self.expect("]]")?;
        Ok(Segment::Conditional {
            condition,
            replacement,
        })
    }

    fn condition(&mut self, kind: TemplateKind) -> Result<Condition, TemplateError> {
        let selector = self.selector(kind)?;
        if self.eat(".not.exists") {
            return Ok(Condition::NotExists(selector));
        }
        if self.eat(".exists") {
            return Ok(Condition::Exists(selector));
        }
        self.skip_ws();
        let operator = self.operator()?;
        self.skip_ws();
        let literal = self.literal()?;
        Ok(Condition::Compare {
            selector,
            operator,
            literal,
        })
    }

    fn operator(&mut self) -> Result<ComparisonOperator, TemplateError> {
        if self.at_arrow() {
            return Err(self.error("expected comparison operator"));
        }
        const OPERATORS: [(&str, ComparisonOperator); 6] = [
            ("!=", ComparisonOperator::Ne),
            ("<=", ComparisonOperator::Le),
            (">=", ComparisonOperator::Ge),
            ("=", ComparisonOperator::Eq),
            ("<", ComparisonOperator::Lt),
            (">", ComparisonOperator::Gt),
        ];
        for (symbol, operator) in OPERATORS {
            if self.eat(symbol) {
                return Ok(operator);
            }
        }
        Err(self.error("expected comparison operator"))
    }

    fn literal(&mut self) -> Result<String, TemplateError> {
        let start = self.pos;
        if self.eat("\"") {
            let rest = self.rest();
            let Some(end) = rest.find('"') else {
                return Err(self.error_at(start, "unterminated string literal"));
            };
            self.pos += end + 1;
            return Ok(rest[..end].to_string());
        }
        let rest = self.rest();
        let mut end = 0;
        for (idx, ch) in rest.char_indices() {
            let tail = &rest[idx..];
            if ch.is_whitespace()
                || tail.starts_with(">>")
                || tail.starts_with(ALT_ARROW)
                || tail.starts_with("]]")
            {
                break;
            }
            end = idx + ch.len_utf8();
        }
        if end == 0 {
            return Err(self.error("expected literal value"));
        }
        self.pos += end;
        Ok(rest[..end].to_string())
    }

    fn word(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .find(|ch: char| !(ch.is_ascii_alphabetic() || ch == '_'))
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn attribute_name(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .find(|ch: char| !(ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':')))
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn selector(&mut self, kind: TemplateKind) -> Result<Selector, TemplateError> {
        let start = self.pos;
        let word = self.word();
        match word {
            "" => Err(self.error_at(start, "expected selector")),
            "attr" => {
                self.expect(".")?;
                let name = self.attribute_name();
                if name.is_empty() {
                    return Err(self.error("expected attribute name"));
                }
                Ok(Selector::Attribute(name.to_string()))
            }
            "path" => {
                self.expect(".")?;
                let key_start = self.pos;
                match self.word() {
                    "step" => Ok(Selector::Path(PathKey::Step)),
                    "length" => Ok(Selector::Path(PathKey::Length)),
                    other => Err(self.error_at(key_start, format!("unknown path key `{other}`"))),
                }
            }
            "source" | "target" if kind == TemplateKind::Edge => {
                self.expect(".")?;
                let inner = Box::new(self.selector(TemplateKind::Node)?);
                if word == "source" {
                    Ok(Selector::Source(inner))
                } else {
                    Ok(Selector::Target(inner))
                }
            }
            other => Keyword::parse(other)
                .map(Selector::Keyword)
                .ok_or_else(|| self.error_at(start, format!("unknown selector `{other}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_placeholders() {
        let (gate, segments) = parse_template("{{id}} of {{attr.kind}}", TemplateKind::Node).unwrap();
        assert!(gate.is_none());
        assert_eq!(
            segments,
            vec![
                Segment::Placeholder(Selector::Keyword(Keyword::Id)),
                Segment::Text(" of ".into()),
                Segment::Placeholder(Selector::Attribute("kind".into())),
            ]
        );
    }

    #[test]
    fn literal_stops_before_arrow() {
        let (gate, _) = parse_template("@id=root>>>x", TemplateKind::Node).unwrap();
        assert_eq!(
            gate,
            Some(Condition::Compare {
                selector: Selector::Keyword(Keyword::Id),
                operator: ComparisonOperator::Eq,
                literal: "root".into(),
            })
        );
    }

    #[test]
    fn short_arrow_matches_long_forms() {
        assert_eq!(
            parse_template("@id=root->x", TemplateKind::Node).unwrap(),
            parse_template("@id=root>>>x", TemplateKind::Node).unwrap()
        );
        assert_eq!(
            parse_template("[[id.exists -> y]]", TemplateKind::Node).unwrap(),
            parse_template("[[id.exists >> y]]", TemplateKind::Node).unwrap()
        );
        let err = parse_template("@id = a -", TemplateKind::Node).unwrap_err();
        assert!(err.message.contains("`->`"));
    }

    #[test]
    fn quoted_literal_keeps_spaces() {
        let (_, segments) = parse_template("[[name = \"a b\" >> yes]]", TemplateKind::Node).unwrap();
        match &segments[0] {
            Segment::Conditional { condition, .. } => match condition {
                Condition::Compare { literal, .. } => assert_eq!(literal, "a b"),
                other => panic!("unexpected condition {other:?}"),
            },
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn node_templates_reject_source_selector() {
        let err = parse_template("{{source.id}}", TemplateKind::Node).unwrap_err();
        assert_eq!(err.position, 2);
        assert!(parse_template("{{source.id}}", TemplateKind::Edge).is_ok());
    }

    #[test]
    fn error_points_at_failing_offset() {
        let err = parse_template("abc {{attr.}}", TemplateKind::Node).unwrap_err();
        assert_eq!(err.position, 11);
        assert!(err.message.contains("attribute name"));
    }
}
