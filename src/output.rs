use std::io::Write;

/// Line-oriented destination for command output.
pub trait Sink {
  fn emit(&mut self, line: String);

  /// Show the input prompt. Sinks that are not a terminal ignore it.
  fn prompt(&mut self, _text: &str) -> std::io::Result<()> {
    Ok(())
  }
}

/// Writes each line to stdout.
pub struct Stdout;

impl Sink for Stdout {
  fn emit(&mut self, line: String) {
    println!("{}", line);
  }

  fn prompt(&mut self, text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
  }
}

/// Collects lines in memory.
impl Sink for Vec<String> {
  fn emit(&mut self, line: String) {
    self.push(line);
  }
}
