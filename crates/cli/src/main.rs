//! `ilopt` — strips the `init` flag from `.locals` directives of method
//! bodies whose locals are provably definitely assigned before first use.
//!
//! This binary is pure plumbing around the analysis core in the `ilopt`
//! crate: argument parsing, assembly container I/O, progress reporting, and
//! the interactive overwrite prompt. See §6 of the workspace design notes
//! for the exact CLI grammar.

mod args;
mod error;
mod output;
mod run;

/// Exit code for any error condition or an explicit `help` request, per §6:
/// "Exit code 0 on success; the minimum signed 32-bit integer on error or
/// help." `std::process::ExitCode` only carries a `u8`, so the documented
/// exit code is produced through `std::process::exit` directly rather than
/// returned from `main`.
const EXIT_FAILURE: i32 = i32::MIN;

fn main() {
    env_logger::init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match args::parse(&raw_args) {
        Ok(parsed) => parsed,
        Err(err) => {
            output::error(&err.to_string());
            print_usage();
            std::process::exit(EXIT_FAILURE);
        }
    };

    if parsed.help {
        print_usage();
        std::process::exit(EXIT_FAILURE);
    }

    let Some(mode) = parsed.mode else {
        output::error("no optimization given; expected `striplocalsinit[=<param>]`");
        print_usage();
        std::process::exit(EXIT_FAILURE);
    };

    if parsed.assemblies.is_empty() {
        output::error("no assembly paths given");
        print_usage();
        std::process::exit(EXIT_FAILURE);
    }

    if run::run(&parsed, mode).is_err() {
        std::process::exit(EXIT_FAILURE);
    }
}

fn print_usage() {
    output::line(
        "Usage: ilopt [help|h|?] [filter=<regex>|f=<regex>] striplocalsinit[=<all|out|stackalloc|csharp>] <assembly>...\n\n\
         Strips the `init` flag from `.locals` directives when every local is\n\
         provably assigned before its first use.\n\n\
         Options:\n\
         \x20 help, h, ?            show this message\n\
         \x20 filter=<regex>, f=    only process types whose name matches <regex>\n\
         \x20 striplocalsinit       enable the optimization; an empty parameter means\n\
         \x20                       mode `none` (proof from straight-line code only)\n\
         \x20 striplocalsinit=all   clear every eligible method's flag unconditionally\n\
         \x20 striplocalsinit=out   additionally trust `out`-parameter assignment\n\
         \x20 striplocalsinit=stackalloc  additionally tolerate `localloc`\n\
         \x20 striplocalsinit=csharp      `out` + `stackalloc` together",
    );
}
