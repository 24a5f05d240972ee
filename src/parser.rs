mod comment;
mod common;
mod haproxy;
mod identifier;
mod mysql;
mod value;
mod yaml;

use crate::context::ParseContext;
use crate::error::Result;
use crate::syntax::Syntax;

use self::common::parse_lines;

pub use self::haproxy::SECTION_KEYWORDS;

/// Parses `input` written in `syntax` and appends the nodes to `context`.
///
/// The context is reset first. On error the message is also stored in the
/// context, the nodes parsed before the bad line are kept.
pub fn parse(syntax: Syntax, input: &str, context: &mut ParseContext) -> Result<()> {
    context.reset();

    let result = match syntax {
        syntax if syntax.is_ini() => parse_lines(input, mysql::line, |node| context.append(node)),
        Syntax::HaProxy => parse_lines(input, haproxy::line, |node| context.append(node)),
        Syntax::Yaml => parse_lines(input, yaml::line, |node| {
            // The section node owns the line break of its line.
            let is_section = node.is_section();
            context.append(node);
            if is_section {
                context.increment_line_number();
            }
        }),
        _ => {
            log::warn!("no grammar for syntax '{}', nothing is parsed", syntax);
            Ok(())
        }
    };

    if let Err(err) = &result {
        context.set_error(err.to_string());
    }

    result
}
