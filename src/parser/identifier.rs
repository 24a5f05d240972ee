use nom::bytes::complete::*;
use nom::combinator::*;
use nom::Parser;

use crate::result::{ParseResult, Span};

/// names of ini variables, e.g. `port`, `innodb_buffer_pool_size` or `loose-group_replication`
pub fn variable_name(input: Span) -> ParseResult<Span, Span> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')).parse(input)
}

/// keys of the YAML subset, anything up to the colon
pub fn yaml_key(input: Span) -> ParseResult<Span, Span> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, ':' | '#')).parse(input)
}

/// one whitespace separated word, the unit of HAProxy statements
pub fn word(input: Span) -> ParseResult<Span, Span> {
    verify(take_while1(|c: char| !c.is_whitespace()), |w: &Span| {
        !w.fragment().starts_with('#')
    })
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split<'a>(result: ParseResult<Span<'a>, Span<'a>>) -> Option<(&'a str, &'a str)> {
        result.ok().map(|(rest, name)| (*rest.fragment(), *name.fragment()))
    }

    #[test]
    fn test_variable_name() {
        assert_eq!(split(variable_name(Span::new("port=1"))), Some(("=1", "port")));
        assert_eq!(
            split(variable_name(Span::new("loose-group_replication.x = 1"))),
            Some((" = 1", "loose-group_replication.x"))
        );
        assert_eq!(split(variable_name(Span::new("=1"))), None);
        assert_eq!(split(variable_name(Span::new(" port"))), None);
    }

    #[test]
    fn test_yaml_key() {
        assert_eq!(split(yaml_key(Span::new("port: 1"))), Some((": 1", "port")));
        assert_eq!(split(yaml_key(Span::new("mysql.cnf:"))), Some((":", "mysql.cnf")));
        assert_eq!(split(yaml_key(Span::new(": 1"))), None);
    }

    #[test]
    fn test_word() {
        assert_eq!(split(word(Span::new("*:80 ssl"))), Some((" ssl", "*:80")));
        assert_eq!(split(word(Span::new("#comment"))), None);
        assert_eq!(split(word(Span::new(" x"))), None);
    }
}
