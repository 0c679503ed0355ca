use std::io::{self, Write};

use crate::terminal::logging::PRINT_TARGET;
use crate::terminal::{banner, colors};
use colored::*;
use scoper_common::config::Config;
use scoper_core::engine::Classification;
use tracing::info;
use unicode_width::UnicodeWidthStr;

pub const TOTAL_WIDTH: usize = 64;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

/// Decoration on stderr. Silenced together with the logs.
pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn banner(chain_mode: bool) {
    if chain_mode {
        return;
    }

    let text_content: String = format!("⟦ SCOPER v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .bright_black();
    let output: String = format!("{}{}{}", sep, text, sep);

    print(&output);
    banner::print();
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().color(colors::PRIMARY),
        "─".repeat(right)
    )
    .color(colors::SEPARATOR);

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR);
    print(&format!("{}", sep));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

fn result_line(label: &str, entry: &str, color: Color, chain_mode: bool) -> String {
    if chain_mode {
        entry.to_string()
    } else {
        format!("[+] {label}: {entry}").color(color).to_string()
    }
}

/// Writes the result sets to `out`. Unsure entries only when asked for.
pub fn results<W: Write>(out: &mut W, result: &Classification, cfg: &Config) -> io::Result<()> {
    for entry in &result.in_scope {
        writeln!(
            out,
            "{}",
            result_line("IN-SCOPE", entry, colors::IN_SCOPE, cfg.chain_mode)
        )?;
    }

    if cfg.include_unsure {
        for entry in &result.unsure {
            writeln!(
                out,
                "{}",
                result_line("UNSURE", entry, colors::UNSURE, cfg.chain_mode)
            )?;
        }
    }

    out.flush()
}

pub fn summary(result: &Classification, targets: usize, cfg: &Config) {
    let in_scope: ColoredString = format!("{} in scope", result.in_scope.len()).bold().green();
    let mut output: String = format!("{in_scope} out of {targets} targets");
    if cfg.include_unsure {
        let unsure: ColoredString = format!("{} unsure", result.unsure.len()).bold().yellow();
        output = format!("{output}, {unsure}");
    }

    fat_separator();
    centerln(&output.color(colors::TEXT_DEFAULT).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Classification {
        Classification {
            in_scope: vec!["a.example.com".into(), "b.example.com".into()],
            unsure: vec!["other.net".into()],
            skipped_rules: 0,
        }
    }

    fn render(cfg: &Config) -> String {
        let mut out: Vec<u8> = Vec::new();
        results(&mut out, &sample(), cfg).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_chain_mode_prints_bare_lines() {
        let cfg = Config {
            chain_mode: true,
            include_unsure: true,
            ..Config::default()
        };
        assert_eq!(render(&cfg), "a.example.com\nb.example.com\nother.net\n");
    }

    #[test]
    fn test_labels_and_unsure_toggle() {
        let output = render(&Config::default());
        assert!(output.contains("[+] IN-SCOPE: a.example.com"));
        assert!(!output.contains("other.net"));

        let cfg = Config {
            include_unsure: true,
            ..Config::default()
        };
        assert!(render(&cfg).contains("[+] UNSURE: other.net"));
    }
}
