//! Fixed text of the document. Whitespace and tag order are part of the
//! output format and must not change.

use std::io;

use opsmap_writer::UnicodeWrite;

/// Title in [`HEADER`]; `concat!` cannot take a const, keep both in sync.
pub const DOCUMENT_TITLE: &str = "Operations Map";

pub const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n",
    "<Document>\n",
    "<name>Operations Map</name>\n",
    "<open>1</open>",
);

pub const FOOTER: &str = "\n</Document></kml>";

pub const FOLDER_END: &str = "\n</Folder>";

/// `name` must already be escaped.
pub fn folder_start<W: UnicodeWrite>(write: &mut W, name: &str) -> io::Result<()> {
    write!(write, "\n<Folder><name>{}</name>", name)
}

/// Field values of a placemark as they go into the document
pub struct PlacemarkFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub timestamp: &'a str,
    pub longitude: &'a str,
    pub latitude: &'a str,
    pub altitude: &'a str,
}

pub fn placemark<W: UnicodeWrite>(write: &mut W, fields: &PlacemarkFields<'_>) -> io::Result<()> {
    let PlacemarkFields {
        name,
        description,
        timestamp,
        longitude,
        latitude,
        altitude,
    } = fields;
    write!(
        write,
        concat!(
            "\n<Placemark>\n",
            "  <name>{name}</name>\n",
            "  <description>{description}</description>\n",
            "  <TimeStamp><when>{timestamp}</when></TimeStamp>\n",
            "  <LookAt>\n",
            "    <longitude>{lon}</longitude><latitude>{lat}</latitude><altitude>{alt}</altitude>\n",
            "    <heading>-0</heading><tilt>0</tilt><range>500</range>\n",
            "  </LookAt>\n",
            "  <Point><altitudeMode>absolute</altitudeMode>",
            "<coordinates>{lon},{lat},{alt}</coordinates></Point>\n",
            "</Placemark>",
        ),
        name = name,
        description = description,
        timestamp = timestamp,
        lon = longitude,
        lat = latitude,
        alt = altitude,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_document() {
        assert!(HEADER.contains(&format!("<name>{}</name>", DOCUMENT_TITLE)));
        assert!(HEADER.ends_with("<open>1</open>"));
    }

    #[test]
    fn folder() -> io::Result<()> {
        let mut out = String::new();
        folder_start(&mut out, "Strike")?;
        out.push_str(FOLDER_END);
        assert_eq!("\n<Folder><name>Strike</name>\n</Folder>", out);
        Ok(())
    }

    #[test]
    fn placemark_layout() -> io::Result<()> {
        let mut out = String::new();
        placemark(
            &mut out,
            &PlacemarkFields {
                name: "F-105D",
                description: "d",
                timestamp: "1972-12-18T00:00:00Z",
                longitude: "105.8",
                latitude: "21.0",
                altitude: "0",
            },
        )?;
        let expected = "\n<Placemark>
  <name>F-105D</name>
  <description>d</description>
  <TimeStamp><when>1972-12-18T00:00:00Z</when></TimeStamp>
  <LookAt>
    <longitude>105.8</longitude><latitude>21.0</latitude><altitude>0</altitude>
    <heading>-0</heading><tilt>0</tilt><range>500</range>
  </LookAt>
  <Point><altitudeMode>absolute</altitudeMode><coordinates>105.8,21.0,0</coordinates></Point>
</Placemark>";
        assert_eq!(expected, out);
        Ok(())
    }
}
