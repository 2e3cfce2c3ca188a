//! The hand-rolled argument grammar (component K):
//!
//! ```text
//! ilopt [help|h|?] [filter=<regex>|f=<regex>] <optimization>[=<param>] ... <assembly> ...
//! ```
//!
//! A declarative CLI-argument crate was deliberately not reached for here:
//! the grammar mixes `-`/`/` option prefixes, `=`/`:` value separators, a
//! parameterized optimization name, and unprefixed positional assembly
//! paths in a way none of those crates model directly (see the workspace
//! design notes on component K).

use std::path::PathBuf;

use ilopt::Mode;
use regex::Regex;

use crate::error::{Error, ErrorKind};

/// The single optimization this tool knows how to apply.
pub const STRIP_LOCALS_INIT: &str = "striplocalsinit";

/// The parsed command line, ready for [`crate::run`] to act on.
#[derive(Debug)]
pub struct CliArgs {
    pub help: bool,
    pub filter: Option<Regex>,
    pub mode: Option<Mode>,
    pub assemblies: Vec<PathBuf>,
}

/// Parses `args` (the program's arguments, *not* including `argv[0]`)
/// according to the grammar above.
///
/// # Errors
///
/// Returns [`ErrorKind::Argument`] for an unrecognized option, a malformed
/// `filter=` regex token is instead reported as [`ErrorKind::Filter`], and
/// an unrecognized `striplocalsinit=` parameter is an [`ErrorKind::Argument`].
pub fn parse<I, S>(args: I) -> Result<CliArgs, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = CliArgs {
        help: false,
        filter: None,
        mode: None,
        assemblies: Vec::new(),
    };

    for arg in args {
        let arg = arg.as_ref();
        match classify(arg) {
            Token::Option { key, value } => apply_option(&mut parsed, key, value)?,
            Token::Positional(path) => parsed.assemblies.push(PathBuf::from(path)),
        }
    }

    Ok(parsed)
}

enum Token<'a> {
    Option { key: &'a str, value: Option<&'a str> },
    Positional(&'a str),
}

/// Splits one raw argument into an option's `key`/`value` pair, or leaves it
/// as a positional (assembly path) token.
///
/// All option tokens begin with `-` or `/`; the value, if any, follows the
/// first `=` or `:` in the remainder.
fn classify(arg: &str) -> Token<'_> {
    let Some(body) = arg.strip_prefix('-').or_else(|| arg.strip_prefix('/')) else {
        return Token::Positional(arg);
    };
    match body.find(['=', ':']) {
        Some(at) => Token::Option {
            key: &body[..at],
            value: Some(&body[at + 1..]),
        },
        None => Token::Option {
            key: body,
            value: None,
        },
    }
}

fn apply_option(parsed: &mut CliArgs, key: &str, value: Option<&str>) -> Result<(), Error> {
    match key.to_ascii_lowercase().as_str() {
        "help" | "h" | "?" => parsed.help = true,
        "filter" | "f" => {
            let pattern = value.ok_or_else(|| {
                ErrorKind::Argument("filter= requires a regular expression value".into())
            })?;
            parsed.filter = Some(Regex::new(pattern)?);
        }
        STRIP_LOCALS_INIT => parsed.mode = Some(parse_mode(value)?),
        other => {
            return Err(ErrorKind::Argument(format!("unrecognized option `{other}`")).into())
        }
    }
    Ok(())
}

fn parse_mode(value: Option<&str>) -> Result<Mode, Error> {
    match value.unwrap_or("") {
        "" => Ok(Mode::None),
        "all" => Ok(Mode::All),
        "out" => Ok(Mode::Out),
        "stackalloc" => Ok(Mode::Stackalloc),
        "csharp" => Ok(Mode::Csharp),
        other => Err(ErrorKind::Argument(format!(
            "unrecognized {STRIP_LOCALS_INIT} parameter `{other}` (expected one of: \
             all, out, stackalloc, csharp, or no value for `none`)"
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_token_is_an_assembly_path() {
        let parsed = parse(["Foo.dll"]).unwrap();
        assert_eq!(parsed.assemblies, vec![PathBuf::from("Foo.dll")]);
    }

    #[test]
    fn dash_and_slash_prefixes_are_both_accepted() {
        assert!(parse(["-help"]).unwrap().help);
        assert!(parse(["/help"]).unwrap().help);
        assert!(parse(["/?"]).unwrap().help);
    }

    #[test]
    fn striplocalsinit_without_parameter_is_none_mode() {
        let parsed = parse(["-striplocalsinit", "Foo.dll"]).unwrap();
        assert_eq!(parsed.mode, Some(Mode::None));
    }

    #[test]
    fn striplocalsinit_parameter_uses_equals_or_colon() {
        assert_eq!(
            parse(["-striplocalsinit=out"]).unwrap().mode,
            Some(Mode::Out)
        );
        assert_eq!(
            parse(["-striplocalsinit:csharp"]).unwrap().mode,
            Some(Mode::Csharp)
        );
    }

    #[test]
    fn unrecognized_parameter_is_an_argument_error() {
        assert!(matches!(
            parse(["-striplocalsinit=bogus"]).unwrap_err().kind(),
            ErrorKind::Argument(_)
        ));
    }

    #[test]
    fn unrecognized_option_is_an_argument_error() {
        assert!(matches!(
            parse(["-bogus"]).unwrap_err().kind(),
            ErrorKind::Argument(_)
        ));
    }

    #[test]
    fn filter_compiles_a_regex() {
        let parsed = parse(["-filter=^Program"]).unwrap();
        assert!(parsed.filter.unwrap().is_match("Program"));
    }

    #[test]
    fn short_filter_alias_is_accepted() {
        let parsed = parse(["-f=^Program"]).unwrap();
        assert!(parsed.filter.unwrap().is_match("ProgramImpl"));
    }

    #[test]
    fn malformed_filter_regex_is_reported() {
        assert!(matches!(
            parse(["-filter=("]).unwrap_err().kind(),
            ErrorKind::Filter(_)
        ));
    }
}
