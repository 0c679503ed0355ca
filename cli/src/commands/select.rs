//! Picking one program out of several search hits.

use std::io::{BufRead, Write};

use anyhow::bail;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    One(usize),
    All,
}

fn parse_choice(input: &str, count: usize) -> Option<Selection> {
    match input.trim().parse::<usize>().ok()? {
        n if n < count => Some(Selection::One(n)),
        n if n == count => Some(Selection::All),
        _ => None,
    }
}

/// Several matches can only be narrowed down by someone at a terminal.
/// Piped targets have already drained STDIN, so there is nobody to ask.
pub fn ensure_interactive(chain_mode: bool, stdin_is_terminal: bool) -> anyhow::Result<()> {
    if chain_mode {
        bail!("Unable to match the company to a single company. Please use a more exact company string.");
    }
    if !stdin_is_terminal {
        bail!(
            "Multiple companies matched but STDIN is not interactive. Please use a more exact company string."
        );
    }
    Ok(())
}

/// Lists `names` plus a "COMBINE ALL" entry and asks until a valid number is given.
pub fn prompt<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
    company: &str,
    names: &[&str],
) -> anyhow::Result<Selection> {
    loop {
        for (i, name) in names.iter().enumerate() {
            writeln!(out, "    {i} - {name}")?;
        }
        writeln!(out, "    {} - COMBINE ALL", names.len())?;
        write!(
            out,
            "\n[+] Multiple companies matched \"{company}\". Please choose one: "
        )?;
        out.flush()?;

        let mut line: String = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No company was selected");
        }

        match parse_choice(&line, names.len()) {
            Some(selection) => return Ok(selection),
            None => warn!("Invalid option selected!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const NAMES: [&str; 3] = ["Example Corp", "Example Labs", "Example Bank"];

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("0\n", 3), Some(Selection::One(0)));
        assert_eq!(parse_choice(" 2 ", 3), Some(Selection::One(2)));
        assert_eq!(parse_choice("3", 3), Some(Selection::All));
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
        assert_eq!(parse_choice("-1", 3), None);
    }

    #[test]
    fn test_prompt_lists_every_match() {
        let mut out: Vec<u8> = Vec::new();
        let selection = prompt(Cursor::new("2\n"), &mut out, "example", &NAMES).unwrap();
        assert_eq!(selection, Selection::One(2));

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("    2 - Example Bank"));
        assert!(shown.contains("    3 - COMBINE ALL"));
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let mut out: Vec<u8> = Vec::new();
        let selection = prompt(Cursor::new("nope\n9\n3\n"), &mut out, "example", &NAMES).unwrap();
        assert_eq!(selection, Selection::All);

        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches("COMBINE ALL").count(), 3);
    }

    #[test]
    fn test_prompt_fails_on_eof() {
        let mut out: Vec<u8> = Vec::new();
        assert!(prompt(Cursor::new(""), &mut out, "example", &NAMES).is_err());
    }

    #[test]
    fn test_ensure_interactive() {
        assert!(ensure_interactive(false, true).is_ok());

        let err = ensure_interactive(true, true).unwrap_err();
        assert!(err.to_string().contains("more exact company string"));

        let err = ensure_interactive(false, false).unwrap_err();
        assert!(err.to_string().contains("not interactive"));
    }
}
