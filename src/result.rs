use nom::IResult;
use nom_language::error::VerboseError;
use nom_locate::LocatedSpan;

/// Grammar input, tracks the line and column of every token.
pub type Span<'a> = LocatedSpan<&'a str>;

pub type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;
