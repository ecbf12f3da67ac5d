/// A point placemark as passed to
/// [`KmlDocument::append_placemark`](crate::KmlDocument::append_placemark).
///
/// All fields are text and are not validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placemark {
    name: String,
    description: String,
    longitude: String,
    latitude: String,
    altitude: String,
    timestamp: String,
}

impl Placemark {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            longitude: longitude.into(),
            latitude: latitude.into(),
            altitude: "0".to_string(),
            timestamp: String::new(),
        }
    }

    pub fn altitude(&self) -> &str {
        &self.altitude
    }

    pub fn with_altitude(mut self, altitude: impl Into<String>) -> Self {
        self.altitude = altitude.into();
        self
    }

    /// Empty unless set. Expected as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    /// `longitude,latitude,altitude` as in `<coordinates>`
    pub fn coordinates(&self) -> String {
        format!("{},{},{}", self.longitude, self.latitude, self.altitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let placemark = Placemark::new("B-52D", "", "106.7", "20.9");
        assert_eq!("0", placemark.altitude());
        assert_eq!("", placemark.timestamp());
        assert_eq!("106.7,20.9,0", placemark.coordinates());
    }

    #[test]
    fn explicit_fields() {
        let placemark = Placemark::new("B-52D", "", "106.7", "20.9")
            .with_altitude("9000")
            .with_timestamp("1972-12-18T19:45:00Z");
        assert_eq!("106.7,20.9,9000", placemark.coordinates());
        assert_eq!("1972-12-18T19:45:00Z", placemark.timestamp());
    }
}
