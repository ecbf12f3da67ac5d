use std::convert::Infallible;
use std::io;

use crate::UnicodeWrite;

/// Strategy to escape text placed into element content
pub trait Escape {
    fn escape_content<W: UnicodeWrite>(&self, input: &str, write: &mut W) -> io::Result<()>;
}

/// Escaper for single line labels like folder and placemark names.
///
/// `&`, `<`, `>` and `"` become entities, a tab becomes four spaces and
/// line feeds are dropped. Everything else is kept, notably `'` and `\r`.
pub struct LabelEscaper;

impl LabelEscaper {
    fn escape<E>(input: &str, mut emit: impl FnMut(&str) -> Result<(), E>) -> Result<(), E> {
        let mut p = 0;
        for (i, r) in input.match_indices(|c: char| {
            c == '&' || c == '<' || c == '>' || c == '\"' || c == '\t' || c == '\n'
        }) {
            emit(&input[p..i])?;
            match r {
                "&" => emit("&amp;")?,
                "<" => emit("&lt;")?,
                ">" => emit("&gt;")?,
                "\"" => emit("&quot;")?,
                "\t" => emit("    ")?,
                _ => {}
            }
            p = i + r.len();
        }
        emit(if p == 0 { input } else { &input[p..] })
    }
}

impl Escape for LabelEscaper {
    fn escape_content<W: UnicodeWrite>(&self, input: &str, write: &mut W) -> io::Result<()> {
        Self::escape(input, |s| write.write_all(s))
    }
}

/// Sanitize a label with [`LabelEscaper`].
///
/// Not idempotent: `&amp;` turns into `&amp;amp;`.
pub fn sanitize(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let result = LabelEscaper::escape(input, |s| -> Result<(), Infallible> {
        output.push_str(s);
        Ok(())
    });
    match result {
        Ok(()) => output,
        Err(never) => match never {},
    }
}
