use anstyle::{AnsiColor, Effects, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

/// Text sink for progress reporting. The CLI prints to the terminal; an
/// embedding host or a test supplies its own sink.
pub trait Console {
    fn write_line(&mut self, line: &str);
}

#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Collects lines instead of printing them.
#[derive(Debug, Default)]
pub struct BufferConsole {
    pub lines: Vec<String>,
}

impl Console for BufferConsole {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

pub fn status_line(output: OutputStyle, message: &str) -> String {
    match output {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => colorize(status_style(), message),
    }
}

pub fn action_line(output: OutputStyle, verb: &str, name: &str, short_path: &str) -> String {
    match output {
        OutputStyle::Plain => format!("{verb} {name} ({short_path})"),
        OutputStyle::Rich => format!(
            "{verb} {} ({short_path})",
            colorize(package_style(), name)
        ),
    }
}

fn status_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::Green.into()))
        .effects(Effects::BOLD)
}

fn package_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Cyan.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
