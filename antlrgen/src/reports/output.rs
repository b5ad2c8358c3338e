//! Output trait for rendering reports to different formats.

/// Target output for reports.
///
/// Reports describe *what* to output using these semantic methods.
/// Implementations decide *how* to render.
pub trait Output {
    /// Render a title/header.
    fn title(&mut self, text: &str);

    /// Start a new section with a heading.
    fn section(&mut self, name: &str);

    /// Render a key-value pair.
    fn key_value(&mut self, key: &str, value: &str);

    /// Render a numbered list item.
    fn numbered_item(&mut self, index: usize, text: &str);

    /// Render a bullet list item.
    fn list_item(&mut self, text: &str);

    /// Render an added item (e.g., a file that will be created).
    fn added_item(&mut self, text: &str);

    /// Render a removed item (e.g., a deleted directory).
    fn removed_item(&mut self, text: &str);

    /// Render a warning message.
    fn warning(&mut self, msg: &str);

    /// Render a block of preformatted text.
    fn preformatted(&mut self, text: &str);

    /// Render a blank line.
    fn newline(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    /// Render this report to the given output.
    fn render(&self, out: &mut dyn Output);
}

/// Which standard stream a rendered line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// A destination for plain text lines.
///
/// Every `LineSink` is an [`Output`] rendering the same text, so tests that
/// capture lines see exactly what the terminal shows.
pub trait LineSink {
    fn line(&mut self, stream: Stream, text: &str);
}

impl<T: LineSink> Output for T {
    fn title(&mut self, text: &str) {
        self.line(Stream::Stdout, text);
        self.line(Stream::Stdout, &"=".repeat(text.chars().count()));
    }

    fn section(&mut self, name: &str) {
        self.line(Stream::Stdout, &format!("{}:", name));
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.line(Stream::Stdout, &format!("{}: {}", key, value));
    }

    fn numbered_item(&mut self, index: usize, text: &str) {
        self.line(Stream::Stdout, &format!("  {}. {}", index, text));
    }

    fn list_item(&mut self, text: &str) {
        self.line(Stream::Stdout, &format!("  - {}", text));
    }

    fn added_item(&mut self, text: &str) {
        self.line(Stream::Stdout, &format!("  + {}", text));
    }

    fn removed_item(&mut self, text: &str) {
        self.line(Stream::Stdout, &format!("  - {}", text));
    }

    fn warning(&mut self, msg: &str) {
        self.line(Stream::Stderr, &format!("warning: {}", msg));
    }

    fn preformatted(&mut self, text: &str) {
        self.line(Stream::Stdout, text);
    }

    fn newline(&mut self) {
        self.line(Stream::Stdout, "");
    }
}

/// Terminal output implementation.
///
/// Warnings go to stderr; everything else to stdout.
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSink for TerminalOutput {
    fn line(&mut self, stream: Stream, text: &str) {
        match stream {
            Stream::Stdout => println!("{}", text),
            Stream::Stderr => eprintln!("{}", text),
        }
    }
}

/// Collects rendered lines in memory, stdout and stderr interleaved.
#[cfg(test)]
#[derive(Default)]
pub struct BufferOutput {
    pub text: String,
}

#[cfg(test)]
impl LineSink for BufferOutput {
    fn line(&mut self, _stream: Stream, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
    }
}

/// Render `report` into a string.
#[cfg(test)]
pub fn render_to_string(report: &dyn Report) -> String {
    let mut out = BufferOutput::default();
    report.render(&mut out);
    out.text
}
