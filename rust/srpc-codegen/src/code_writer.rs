//! Go source writer with indentation tracking.
//!
//! Output follows `gofmt` layout: one tab per indentation level, `case` labels
//! at the indentation of their `switch`, and no trailing whitespace on blank
//! lines.
//!
//! ```
//! use srpc_codegen::code_writer::CodeWriter;
//! use srpc_codegen::gw_writeln;
//!
//! let mut output = String::new();
//! let mut w = CodeWriter::new(&mut output);
//!
//! w.block("func answer() int", |w| gw_writeln!(w, "return {}", 42))
//!     .unwrap();
//!
//! assert_eq!(output, "func answer() int {\n\treturn 42\n}\n");
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Writes Go source, indenting every non-blank line by the current level.
pub struct CodeWriter<W> {
    writer: W,
    indent_level: Rc<Cell<usize>>,
    at_line_start: bool,
}

impl<W: fmt::Write> CodeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            indent_level: Rc::new(Cell::new(0)),
            at_line_start: true,
        }
    }

    /// Write text without a newline, indenting first if at line start.
    pub fn write(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            return Ok(());
        }

        if self.at_line_start {
            for _ in 0..self.indent_level.get() {
                self.writer.write_char('\t')?;
            }
            self.at_line_start = false;
        }

        self.writer.write_str(text)
    }

    pub fn writeln(&mut self, text: &str) -> fmt::Result {
        self.write(text)?;
        self.newline()
    }

    /// Write an empty line. Never carries indentation.
    pub fn blank_line(&mut self) -> fmt::Result {
        self.newline()
    }

    fn newline(&mut self) -> fmt::Result {
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    /// Indentation increases while the returned guard is alive.
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// Write a `//` line comment for each line of `text`.
    pub fn comment(&mut self, text: &str) -> fmt::Result {
        for line in text.lines() {
            if line.is_empty() {
                self.writeln("//")?;
            } else {
                self.write("// ")?;
                self.writeln(line)?;
            }
        }
        Ok(())
    }

    /// Write `header {`, the indented body, and the closing brace.
    pub fn block<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.write(header)?;
        self.writeln(" {")?;
        {
            let _indent = self.indent();
            body(self)?;
        }
        self.writeln("}")
    }

    /// Write a `case`/`default` label at the enclosing `switch` level and its
    /// statements one level deeper.
    pub fn case<F>(&mut self, label: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        let level = self.indent_level.get();
        self.indent_level.set(level.saturating_sub(1));
        let written = self.writeln(label);
        self.indent_level.set(level);
        written?;
        body(self)
    }

    fn write_args(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        match args.as_str() {
            Some(text) => self.write(text),
            None => self.write(&args.to_string()),
        }
    }

    #[doc(hidden)]
    pub fn writeln_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.write_args(args)?;
        self.newline()
    }
}

/// Restores the previous indentation level on drop.
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        let current = self.indent_level.get();
        self.indent_level.set(current.saturating_sub(1));
    }
}

/// Formatted line write to a [`CodeWriter`], like `std::writeln!`.
#[macro_export]
macro_rules! gw_writeln {
    ($writer:expr, $($arg:tt)*) => {
        $writer.writeln_fmt(format_args!($($arg)*))
    };
}
