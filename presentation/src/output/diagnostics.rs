//! Colored console rendering of diagnostics

use biorun_application::{Diagnostic, DiagnosticSink};
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes diagnostics to stderr (or any writer) as `warning:` / `note:` lines.
///
/// Captured tool output attached to a failed command is indented below the
/// warning. Notices are shown only when `show_notices` is set.
pub struct ConsoleDiagnostics<W: Write + Send = io::Stderr> {
    writer: Mutex<W>,
    show_notices: bool,
}

impl ConsoleDiagnostics {
    pub fn stderr(show_notices: bool) -> Self {
        Self::new(io::stderr(), show_notices)
    }
}

impl<W: Write + Send> ConsoleDiagnostics<W> {
    pub fn new(writer: W, show_notices: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            show_notices,
        }
    }

    fn render(&self, diagnostic: &Diagnostic) -> Option<String> {
        match diagnostic {
            Diagnostic::Notice(_) if !self.show_notices => None,
            Diagnostic::Notice(_) => Some(format!("{} {}", "note:".dimmed(), diagnostic)),
            Diagnostic::CommandFailed {
                output: Some(output),
                ..
            } if !output.trim().is_empty() => Some(format!(
                "{} {}\n{}",
                "warning:".yellow().bold(),
                diagnostic,
                indent(output.trim_end(), "  | ")
            )),
            _ => Some(format!("{} {}", "warning:".yellow().bold(), diagnostic)),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> DiagnosticSink for ConsoleDiagnostics<W> {
    fn report(&self, diagnostic: Diagnostic) {
        let Some(line) = self.render(&diagnostic) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
