//! Streaming builder for Keyhole Markup Language documents.
//!
//! A [`KmlDocument`] is filled in one pass: [`open`](KmlDocument::open),
//! any mix of folder and placemark calls, [`close`](KmlDocument::close) and
//! finally [`persist`](KmlDocument::persist). Calls out of this order are
//! rejected with a [`KmlError`] and leave the document untouched.
//!
//! The builder is a single-owner accumulator. It does no locking; share it
//! between threads only behind external synchronization.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use opsmap_writer::{Escape, LabelEscaper, UnicodeWrite, Utf8Writer};

pub use crate::description::{
    format_description, DescriptionField, DescriptionRecord, ToScalarText,
};
pub use crate::error::{ErrorKind, KmlError, Result};
pub use crate::placemark::Placemark;
pub use crate::template::DOCUMENT_TITLE;

pub mod description;
pub mod error;
mod placemark;
mod template;

/// Lifecycle of a [`KmlDocument`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing written yet
    Empty,
    /// Header written, folders and placemarks can be added
    Open,
    /// Footer written, ready to persist
    Closed,
    /// Written to the target path
    Persisted,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Empty => "empty",
            State::Open => "open",
            State::Closed => "closed",
            State::Persisted => "persisted",
        })
    }
}

pub struct KmlDocument<E: Escape = LabelEscaper> {
    state: State,
    depth: usize,
    fragments: Vec<Cow<'static, str>>,
    path: PathBuf,
    escaper: E,
}

impl KmlDocument<LabelEscaper> {
    /// Document that will be persisted to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_escaper(path, LabelEscaper)
    }

    /// Same as the free function [`format_description`]
    pub fn format_description(record: &DescriptionRecord) -> String {
        format_description(record)
    }
}

impl<E: Escape> KmlDocument<E> {
    /// Document using `escaper` for folder and placemark names
    pub fn with_escaper(path: impl Into<PathBuf>, escaper: E) -> Self {
        Self {
            state: State::Empty,
            depth: 0,
            fragments: vec![],
            path: path.into(),
            escaper,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Number of currently open folders
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    fn expect_state(&self, operation: &'static str, expected: State) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            warn!(
                "rejected `{}` on {} document {}",
                operation,
                self.state,
                self.path.display()
            );
            Err(KmlError::new_protocol(operation, self.state))
        }
    }

    fn label(&self, input: &str) -> Result<String> {
        let mut output = String::with_capacity(input.len());
        self.escaper.escape_content(input, &mut output)?;
        Ok(output)
    }

    /// Write the XML declaration and the opening `<Document>`.
    pub fn open(&mut self) -> Result<()> {
        self.expect_state("open", State::Empty)?;
        self.fragments.push(Cow::Borrowed(template::HEADER));
        self.state = State::Open;
        debug!("opened KML document {}", self.path.display());
        Ok(())
    }

    pub fn open_folder(&mut self, name: &str) -> Result<()> {
        self.expect_state("open_folder", State::Open)?;
        let mut fragment = String::new();
        template::folder_start(&mut fragment, &self.label(name)?)?;
        self.fragments.push(Cow::Owned(fragment));
        self.depth += 1;
        trace!("opened folder {:?} at depth {}", name, self.depth);
        Ok(())
    }

    /// Close the most recently opened folder.
    pub fn close_folder(&mut self) -> Result<()> {
        self.expect_state("close_folder", State::Open)?;
        if self.depth == 0 {
            warn!("rejected `close_folder` without open folder");
            return Err(KmlError::new_folder_underflow());
        }
        self.fragments.push(Cow::Borrowed(template::FOLDER_END));
        self.depth -= 1;
        trace!("closed folder, depth {}", self.depth);
        Ok(())
    }

    /// Add a placemark at altitude `0` without timestamp.
    ///
    /// Only `name` is escaped. `description` is inserted as is and should
    /// come from [`format_description`] if it carries markup.
    pub fn add_placemark(
        &mut self,
        name: &str,
        description: &str,
        longitude: &str,
        latitude: &str,
    ) -> Result<()> {
        self.append_placemark(&Placemark::new(name, description, longitude, latitude))
    }

    pub fn append_placemark(&mut self, placemark: &Placemark) -> Result<()> {
        self.expect_state("add_placemark", State::Open)?;
        let name = self.label(placemark.name())?;
        let mut fragment = String::new();
        template::placemark(
            &mut fragment,
            &template::PlacemarkFields {
                name: &name,
                description: placemark.description(),
                timestamp: placemark.timestamp(),
                longitude: placemark.longitude(),
                latitude: placemark.latitude(),
                altitude: placemark.altitude(),
            },
        )?;
        self.fragments.push(Cow::Owned(fragment));
        trace!("added placemark {:?} at depth {}", placemark.name(), self.depth);
        Ok(())
    }

    /// Write the closing `</Document></kml>`. All folders must be closed.
    pub fn close(&mut self) -> Result<()> {
        self.expect_state("close", State::Open)?;
        if self.depth != 0 {
            warn!("rejected `close` with {} open folder(s)", self.depth);
            return Err(KmlError::new_unclosed_folders(self.depth));
        }
        self.fragments.push(Cow::Borrowed(template::FOOTER));
        self.state = State::Closed;
        debug!(
            "closed KML document {} with {} fragments",
            self.path.display(),
            self.fragments.len()
        );
        Ok(())
    }

    /// Stream all fragments written so far to `write`.
    pub fn write_to<W: UnicodeWrite>(&self, write: &mut W) -> Result<()> {
        for fragment in &self.fragments {
            write.write_all(fragment)?;
        }
        write.flush()?;
        Ok(())
    }

    /// All fragments written so far as one string
    pub fn render(&self) -> String {
        self.fragments.concat()
    }

    /// Write the closed document to its target path.
    ///
    /// Can be called once. On an I/O error the document stays closed and
    /// whatever reached the file is left in place.
    pub fn persist(&mut self) -> Result<()> {
        self.expect_state("persist", State::Closed)?;
        let file = File::create(&self.path)?;
        let mut writer = Utf8Writer::new(BufWriter::new(file));
        self.write_to(&mut writer)?;
        self.state = State::Persisted;
        debug!(
            "wrote {} bytes to {}",
            self.fragments.iter().map(|f| f.len()).sum::<usize>(),
            self.path.display()
        );
        Ok(())
    }
}

impl<E: Escape> fmt::Debug for KmlDocument<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KmlDocument")
            .field("state", &self.state)
            .field("depth", &self.depth)
            .field("fragments", &self.fragments.len())
            .field("path", &self.path)
            .finish()
    }
}
