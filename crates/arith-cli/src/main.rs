use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use arith_eval::{
    evaluate_to_report, evaluate_with, Limits, MAX_DEPTH_CEILING, MAX_TOKENS_CEILING,
};
use arith_types::EvalError;
use clap::builder::RangedU64ValueParser;
use clap::Parser;

/// arith evaluates infix arithmetic over `+ - * /` and parentheses.
///
/// With an expression on the command line it is evaluated once. Without one,
/// arith prompts for expressions until an empty line or end of input.
#[derive(Parser, Debug)]
#[command(name = "arith", version, about, long_about = None)]
struct Args {
    /// Print results and diagnostics as JSON.
    #[arg(long)]
    json: bool,

    /// Maximum parenthesis nesting depth.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DEPTH_CEILING)))]
    max_depth: Option<u32>,

    /// Maximum number of tokens in one expression.
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_TOKENS_CEILING as u64))]
    max_tokens: Option<usize>,

    /// Expression to evaluate; words are joined with spaces.
    expression: Vec<String>,
}

impl Args {
    fn limits(&self) -> Limits {
        let defaults = Limits::default();
        Limits {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            step_limit: defaults.step_limit,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let limits = args.limits();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let outcome = if args.expression.is_empty() {
        read_loop(io::stdin().lock(), &mut out, &mut err, &limits, args.json).map(|()| true)
    } else {
        let text = args.expression.join(" ");
        run_once(&text, &mut out, &mut err, &limits, args.json)
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let _ = writeln!(err, "arith: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prompt, read, evaluate and print until an empty line or end of input.
///
/// Errors on one line are reported to `err` and the loop continues.
fn read_loop(
    mut input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
    limits: &Limits,
    json: bool,
) -> io::Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "expr: ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let text = line.trim_end_matches(['\n', '\r']);
        if text.is_empty() {
            return Ok(());
        }
        run_once(text, out, err, limits, json)?;
    }
}

/// Evaluate `text` and print the outcome. Returns `Ok(false)` when the
/// expression fails.
fn run_once(
    text: &str,
    out: &mut impl Write,
    err: &mut impl Write,
    limits: &Limits,
    json: bool,
) -> io::Result<bool> {
    if json {
        let report = evaluate_to_report(text, limits);
        let encoded = serde_json::to_string(&report).map_err(io::Error::other)?;
        writeln!(out, "{encoded}")?;
        return Ok(report.success);
    }

    match evaluate_with(text, limits) {
        Ok(value) => {
            writeln!(out, "{value}")?;
            Ok(true)
        }
        Err(e) => {
            write!(err, "{}", render(&e))?;
            Ok(false)
        }
    }
}

/// Render an error with its source line and a caret marker under the span.
fn render(err: &EvalError) -> String {
    let line_no = err.span.start_line.to_string();
    let gutter = " ".repeat(line_no.len());
    let line_len = err.source_line.chars().count() as u32;

    let start = err.span.start_col.max(1);
    let end = match err.span.width() {
        Some(_) => err.span.end_col,
        None => line_len.max(start),
    };
    let carets = (end.saturating_sub(start) + 1) as usize;

    let mut out = format!("error[{}]: {}\n", err.code, err.message);
    out.push_str(&format!("{gutter}--> {}:{}\n", err.file, err.span));
    out.push_str(&format!("{gutter} |\n"));
    out.push_str(&format!("{line_no} | {}\n", err.source_line));
    out.push_str(&format!(
        "{gutter} | {}{}\n",
        " ".repeat((start - 1) as usize),
        "^".repeat(carets)
    ));
    if let Some(suggestion) = &err.suggestion {
        out.push_str(&format!("{gutter} = help: {suggestion}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arith_eval::evaluate;
    use std::io::Cursor;

    /// Run the read-loop over `input`, returning what went to stdout and
    /// stderr.
    fn session(input: &str, json: bool) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        read_loop(Cursor::new(input), &mut out, &mut err, &Limits::default(), json)
            .expect("in-memory session failed");
        (
            String::from_utf8(out).expect("stdout is utf-8"),
            String::from_utf8(err).expect("stderr is utf-8"),
        )
    }

    #[test]
    fn test_read_loop_stops_at_empty_line() {
        let (out, err) = session("2+3*4\r\n5/0\n\nignored\n", false);
        assert_eq!(out, "expr: 14\nexpr: expr: ");
        assert!(err.starts_with("error[E200]: division by zero\n"));
        // The line after the empty one is never evaluated.
        assert!(!err.contains("E100"));
    }

    #[test]
    fn test_read_loop_continues_after_error() {
        let (out, err) = session("2 $ 3\n7/2\n", false);
        assert_eq!(out, "expr: expr: 3.5\nexpr: \n");
        assert!(err.contains("error[E100]: unexpected character '$'"));
    }

    #[test]
    fn test_read_loop_stops_at_eof_without_newline() {
        let (out, err) = session("1+1", false);
        assert_eq!(out, "expr: 2\nexpr: \n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_read_loop_on_empty_input() {
        let (out, _) = session("", false);
        assert_eq!(out, "expr: \n");
    }

    #[test]
    fn test_read_loop_json() {
        let (out, err) = session("10/4\n", true);
        let first = out
            .strip_prefix("expr: ")
            .and_then(|rest| rest.lines().next())
            .expect("one report line");
        let report: serde_json::Value = serde_json::from_str(first).unwrap();
        assert_eq!(report["success"], true);
        assert_eq!(report["display"], "2.5");
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_once_reports_failure() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run_once("5/0", &mut out, &mut err, &Limits::default(), false).unwrap();
        assert!(!ok);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }

    #[test]
    fn test_run_once_json_failure_goes_to_stdout() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run_once("(1", &mut out, &mut err, &Limits::default(), true).unwrap();
        assert!(!ok);
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["errors"]["errors"][0]["kind"], "unbalanced_parentheses");
        assert!(err.is_empty());
    }

    #[test]
    fn test_render_division_by_zero() {
        let err = evaluate("1 + 5/0").unwrap_err();
        assert_eq!(
            render(&err),
            concat!(
                "error[E200]: division by zero\n",
                " --> <expr>:1:5\n",
                "  |\n",
                "1 | 1 + 5/0\n",
                "  |     ^^^\n",
            )
        );
    }

    #[test]
    fn test_render_includes_suggestion() {
        let err = evaluate("2 3").unwrap_err();
        let rendered = render(&err);
        assert!(rendered.starts_with("error[E102]"));
        assert!(rendered.contains("= help: insert an operator between the operands"));
    }

    #[test]
    fn test_limits_from_flags() {
        let args = Args::parse_from(["arith", "--max-depth", "3", "1+1"]);
        let limits = args.limits();
        assert_eq!(limits.max_depth, 3);
        assert_eq!(limits.max_tokens, Limits::default().max_tokens);
        assert_eq!(args.expression, vec!["1+1"]);
    }

    #[test]
    fn test_depth_flag_is_range_checked() {
        assert!(Args::try_parse_from(["arith", "--max-depth", "0"]).is_err());
        assert!(Args::try_parse_from(["arith", "--max-depth", "257"]).is_err());
    }

    #[test]
    fn test_token_flag_is_range_checked() {
        assert!(Args::try_parse_from(["arith", "--max-tokens", "0"]).is_err());
        assert!(Args::try_parse_from(["arith", "--max-tokens", "3000000"]).is_err());
        let args = Args::parse_from(["arith", "--max-tokens", "1000000", "1"]);
        assert_eq!(args.limits().max_tokens, MAX_TOKENS_CEILING);
    }

    #[test]
    fn test_expression_words_are_joined() {
        let args = Args::parse_from(["arith", "2", "+", "3"]);
        assert_eq!(args.expression.join(" "), "2 + 3");
    }

    #[test]
    fn test_negative_expression_after_separator() {
        let args = Args::parse_from(["arith", "--", "-2*3"]);
        assert_eq!(args.expression, vec!["-2*3"]);
    }
}
