//! Placemark descriptions built from ordered key/value records.
//!
//! A record is rendered into a CDATA section so that the `<br  />` line
//! breaks reach the map viewer as markup. Field text is not escaped.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

/// Text shown for a missing value
pub const MISSING: &str = "None";

/// Text form of a scalar description value.
///
/// Floats always keep a fractional part (`21.0`, not `21`), non-finite
/// floats read `nan`/`inf`, booleans `True`/`False` and `None` reads
/// [`MISSING`].
pub trait ToScalarText {
    fn to_scalar_text(&self) -> String;
}

macro_rules! display_scalar {
    ($($ty:ty),*) => {
        $(
            impl ToScalarText for $ty {
                fn to_scalar_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_scalar!(str, String, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl ToScalarText for bool {
    fn to_scalar_text(&self) -> String {
        (if *self { "True" } else { "False" }).to_string()
    }
}

macro_rules! float_scalar {
    ($($ty:ty),*) => {
        $(
            impl ToScalarText for $ty {
                fn to_scalar_text(&self) -> String {
                    if self.is_nan() {
                        "nan".to_string()
                    } else if self.is_infinite() {
                        (if *self > 0.0 { "inf" } else { "-inf" }).to_string()
                    } else {
                        format!("{:?}", self)
                    }
                }
            }
        )*
    };
}

float_scalar!(f32, f64);

impl<T: ToScalarText> ToScalarText for Option<T> {
    fn to_scalar_text(&self) -> String {
        match self {
            Some(value) => value.to_scalar_text(),
            None => MISSING.to_string(),
        }
    }
}

impl<T: ?Sized + ToScalarText> ToScalarText for &T {
    fn to_scalar_text(&self) -> String {
        (**self).to_scalar_text()
    }
}

const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";
const LINE_BREAK: &str = "<br  />\n";

/// One entry of a [`DescriptionRecord`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptionField {
    Scalar { name: String, value: String },
    Group {
        name: String,
        fields: Vec<(String, String)>,
    },
}

impl DescriptionField {
    pub fn scalar(name: impl Into<String>, value: impl ToScalarText) -> Self {
        Self::Scalar {
            name: name.into(),
            value: value.to_scalar_text(),
        }
    }

    pub fn group<K, V>(name: impl Into<String>, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToScalarText,
    {
        Self::Group {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.to_scalar_text()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::Group { name, .. } => name,
        }
    }
}

/// Ordered fields shown in a placemark balloon
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DescriptionRecord {
    fields: Vec<DescriptionField>,
}

impl DescriptionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(mut self, name: impl Into<String>, value: impl ToScalarText) -> Self {
        self.fields.push(DescriptionField::scalar(name, value));
        self
    }

    pub fn group<K, V>(
        mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: ToScalarText,
    {
        self.fields.push(DescriptionField::group(name, fields));
        self
    }

    pub fn push(&mut self, field: DescriptionField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[DescriptionField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<DescriptionField> for DescriptionRecord {
    fn from_iter<T: IntoIterator<Item = DescriptionField>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Extend<DescriptionField> for DescriptionRecord {
    fn extend<T: IntoIterator<Item = DescriptionField>>(&mut self, iter: T) {
        self.fields.extend(iter)
    }
}

/// Render `record` as the CDATA block used for a placemark description.
///
/// Field and sub-field names are upper-cased, values are kept as given.
pub fn format_description(record: &DescriptionRecord) -> String {
    let mut out = String::from(CDATA_START);
    for field in &record.fields {
        match field {
            DescriptionField::Scalar { name, value } => {
                push_line(&mut out, name, value);
            }
            DescriptionField::Group { name, fields } => {
                out.push_str(LINE_BREAK);
                out.push_str(&name.to_uppercase());
                out.push_str(LINE_BREAK);
                for (name, value) in fields {
                    push_line(&mut out, name, value);
                }
            }
        }
    }
    out.push_str(CDATA_END);
    out
}

fn push_line(out: &mut String, name: &str, value: &str) {
    out.push_str(&name.to_uppercase());
    out.push_str(" - ");
    out.push_str(value);
    out.push_str(LINE_BREAK);
}

// Deserialization: a map whose values are scalars or maps of scalars.

/// Scalar value converted to its text form
struct ScalarText(String);

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = ScalarText;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_scalar_text()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_scalar_text()))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ScalarText(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarText(MISSING.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarText(MISSING.to_string()))
    }
}

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

enum FieldValue {
    Scalar(String),
    Group(Vec<(String, String)>),
}

struct FieldValueVisitor;

macro_rules! forward_scalar {
    ($($method:ident: $ty:ty),*) => {
        $(
            fn $method<E: de::Error>(self, v: $ty) -> Result<Self::Value, E> {
                ScalarVisitor.$method(v).map(|text| FieldValue::Scalar(text.0))
            }
        )*
    };
}

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar value or a map of scalar values")
    }

    forward_scalar!(
        visit_bool: bool,
        visit_i64: i64,
        visit_u64: u64,
        visit_f64: f64,
        visit_char: char,
        visit_str: &str,
        visit_string: String
    );

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Scalar(MISSING.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Scalar(MISSING.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, ScalarText>()? {
            fields.push((key, value.0));
        }
        Ok(FieldValue::Group(fields))
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = DescriptionRecord;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of description fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut record = DescriptionRecord::new();
        while let Some((name, value)) = map.next_entry::<String, FieldValue>()? {
            record.push(match value {
                FieldValue::Scalar(value) => DescriptionField::Scalar { name, value },
                FieldValue::Group(fields) => DescriptionField::Group { name, fields },
            });
        }
        Ok(record)
    }
}

/// Reads a map in document order. Values must be scalars or maps of
/// scalars; `null` becomes [`MISSING`].
impl<'de> Deserialize<'de> for DescriptionRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!("<![CDATA[]]>", format_description(&DescriptionRecord::new()));
    }

    #[test]
    fn scalars_in_order() {
        let record = DescriptionRecord::new()
            .scalar("msndate", "1972-12-18")
            .scalar("numweaponsdelivered", 24);
        assert_eq!(
            "<![CDATA[MSNDATE - 1972-12-18<br  />\nNUMWEAPONSDELIVERED - 24<br  />\n]]>",
            format_description(&record)
        );
    }

    #[test]
    fn group() {
        let record = DescriptionRecord::new()
            .scalar("UNIT", "7th AF")
            .group("WEAPON", [("TYPE", "MK82"), ("QTY", "4")]);
        assert_eq!(
            concat!(
                "<![CDATA[",
                "UNIT - 7th AF<br  />\n",
                "<br  />\n",
                "WEAPON<br  />\n",
                "TYPE - MK82<br  />\n",
                "QTY - 4<br  />\n",
                "]]>"
            ),
            format_description(&record)
        );
    }

    #[test]
    fn names_upper_cased_values_kept() {
        let record = DescriptionRecord::new()
            .scalar("callsign", "chevy 01")
            .group("weapon", [("type", "mk82 <hd>")]);
        let text = format_description(&record);
        assert!(text.contains("CALLSIGN - chevy 01<br  />\n"));
        assert!(text.contains("<br  />\nWEAPON<br  />\n"));
        assert!(text.contains("TYPE - mk82 <hd><br  />\n"));
    }

    #[test]
    fn markup_not_escaped() {
        let record = DescriptionRecord::new().scalar("target", "A&B <bridge>");
        assert!(format_description(&record).contains("TARGET - A&B <bridge>"));
    }

    #[test]
    fn floats_keep_fraction() {
        let record = DescriptionRecord::new()
            .scalar("alt", 1500.0_f64)
            .scalar("lat", 21.0_f32)
            .scalar("lon", 105.8)
            .scalar("tgtid", f64::NAN)
            .group("release", [("speed", f64::INFINITY)]);
        let text = format_description(&record);
        assert!(text.contains("ALT - 1500.0<br  />\n"));
        assert!(text.contains("LAT - 21.0<br  />\n"));
        assert!(text.contains("LON - 105.8<br  />\n"));
        assert!(text.contains("TGTID - nan<br  />\n"));
        assert!(text.contains("SPEED - inf<br  />\n"));
    }

    #[test]
    fn bool_and_missing() {
        let record = DescriptionRecord::new()
            .scalar("valid", true)
            .scalar("jettisoned", false)
            .scalar("callsign", None::<&str>)
            .scalar("squadron", Some("8th TFW"));
        assert_eq!(
            concat!(
                "<![CDATA[",
                "VALID - True<br  />\n",
                "JETTISONED - False<br  />\n",
                "CALLSIGN - None<br  />\n",
                "SQUADRON - 8th TFW<br  />\n",
                "]]>"
            ),
            format_description(&record)
        );
    }

    #[test]
    fn collect_fields() {
        let record: DescriptionRecord = vec![
            DescriptionField::scalar("a", 1.5),
            DescriptionField::group("b", Vec::<(String, String)>::new()),
        ]
        .into_iter()
        .collect();
        assert_eq!(2, record.len());
        assert_eq!("b", record.fields()[1].name());
        assert_eq!(
            "<![CDATA[A - 1.5<br  />\n<br  />\nB<br  />\n]]>",
            format_description(&record)
        );
    }
}
