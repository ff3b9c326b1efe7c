use serde_json::ser::Formatter;
use std::io;

/// Writes every non-ASCII char of string content as `\uXXXX` UTF-16 escapes and delegates all
/// structural output to `F`.
pub(crate) struct AsciiEscapingFormatter<F> {
  inner: F,
}

impl<F: Formatter> AsciiEscapingFormatter<F> {
  pub(crate) fn new(inner: F) -> Self {
    Self { inner }
  }
}

impl<F: Formatter> Formatter for AsciiEscapingFormatter<F> {
  fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    let mut start = 0;
    for (idx, ch) in fragment.char_indices() {
      if ch.is_ascii() {
        continue;
      }
      if start < idx {
        self.inner.write_string_fragment(writer, &fragment[start..idx])?;
      }
      let mut units = [0u16; 2];
      for unit in ch.encode_utf16(&mut units) {
        write!(writer, "\\u{:04x}", unit)?;
      }
      start = idx + ch.len_utf8();
    }
    if start < fragment.len() {
      self.inner.write_string_fragment(writer, &fragment[start..])?;
    }
    Ok(())
  }

  fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.begin_array(writer)
  }

  fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.end_array(writer)
  }

  fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.begin_array_value(writer, first)
  }

  fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.end_array_value(writer)
  }

  fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.begin_object(writer)
  }

  fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.end_object(writer)
  }

  fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.begin_object_key(writer, first)
  }

  fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.end_object_key(writer)
  }

  fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.begin_object_value(writer)
  }

  fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    self.inner.end_object_value(writer)
  }
}
