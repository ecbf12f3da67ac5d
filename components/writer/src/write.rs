use std::{fmt, io};

/// Sink for already validated UTF-8 text
pub trait UnicodeWrite {
    fn write_all(&mut self, s: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    fn write_fmt(&mut self, fmt: fmt::Arguments<'_>) -> io::Result<()> {
        struct PersistErrorWrapper<'a, T: 'a + ?Sized> {
            writer: &'a mut T,
            err: Option<io::Error>,
        }

        impl<'a, T: 'a + ?Sized + UnicodeWrite> fmt::Write for PersistErrorWrapper<'a, T> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.writer.write_all(s).map_err(|err| {
                    self.err = Some(err);
                    fmt::Error
                })
            }
        }

        let mut writer = PersistErrorWrapper {
            writer: self,
            err: None,
        };
        fmt::write(&mut writer, fmt).map_err(|_| {
            if let Some(err) = writer.err {
                err
            } else {
                io::Error::new(io::ErrorKind::Other, "formatter error")
            }
        })
    }
}

impl UnicodeWrite for String {
    fn write_all(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_fmt(&mut self, fmt: fmt::Arguments<'_>) -> io::Result<()> {
        fmt::write(self, fmt).map_err(|_| io::Error::new(io::ErrorKind::Other, "formatter error"))
    }
}

impl<T: ?Sized + UnicodeWrite> UnicodeWrite for &mut T {
    fn write_all(&mut self, s: &str) -> io::Result<()> {
        (**self).write_all(s)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn write_fmt(&mut self, fmt: fmt::Arguments<'_>) -> io::Result<()> {
        (**self).write_fmt(fmt)
    }
}

/// Adapts a byte oriented [`io::Write`] to [`UnicodeWrite`] by writing UTF-8
pub struct Utf8Writer<T: io::Write>(T);

impl<T: io::Write> Utf8Writer<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: io::Write> UnicodeWrite for Utf8Writer<T> {
    fn write_all(&mut self, s: &str) -> io::Result<()> {
        self.0.write_all(s.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }

    fn write_fmt(&mut self, fmt: fmt::Arguments<'_>) -> io::Result<()> {
        self.0.write_fmt(fmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_sink() -> io::Result<()> {
        let mut out = String::new();
        out.write_all("<a>")?;
        write!(out, "{},{}", 1, "b")?;
        assert_eq!("<a>1,b", out);
        Ok(())
    }

    #[test]
    fn utf8_writer() -> io::Result<()> {
        let mut writer = Utf8Writer::new(Vec::new());
        writer.write_all("Hà Nội")?;
        write!(writer, " {}", 21.0)?;
        writer.flush()?;
        assert_eq!("Hà Nội 21".as_bytes(), &writer.into_inner()[..]);
        Ok(())
    }

    #[test]
    fn through_reference() -> io::Result<()> {
        fn emit(mut sink: impl UnicodeWrite) -> io::Result<()> {
            sink.write_all("x")
        }

        let mut out = String::new();
        emit(&mut out)?;
        emit(&mut &mut out)?;
        assert_eq!("xx", out);
        Ok(())
    }
}
