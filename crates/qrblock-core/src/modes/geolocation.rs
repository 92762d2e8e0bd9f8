//! Encodes a geographic position.

use crate::payload::{DisplayPayload, GeoDetails, ModeDetails};
use crate::strings::{StringSource, PLUGIN_COMPONENT};

/// Zoom level of the map link.
pub const OSM_ZOOM: u8 = 10;

/// Whether to offer a map link next to the code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkMode {
    /// Code only.
    #[default]
    NoLink,
    /// Link to OpenStreetMap.
    OpenStreetMap,
}

impl LinkMode {
    /// Reads the stored link mode; anything but `osm` means no link.
    #[must_use]
    pub fn from_config(value: Option<&str>) -> Self {
        match value {
            Some("osm") => Self::OpenStreetMap,
            _ => Self::NoLink,
        }
    }
}

/// Input for the geolocation mode. Coordinates are kept as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geolocation {
    /// Latitude.
    pub latitude: String,
    /// Longitude.
    pub longitude: String,
    /// Map link mode.
    pub link: LinkMode,
}

impl Geolocation {
    /// `geo:` URI for the position.
    #[must_use]
    pub fn geo_uri(&self) -> String {
        format!("geo:{},{}", self.latitude, self.longitude)
    }

    /// OpenStreetMap link with a marker on, and the map centred at, the position.
    #[must_use]
    pub fn osm_url(&self) -> String {
        let (lat, lng) = (&self.latitude, &self.longitude);
        format!("https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={OSM_ZOOM}/{lat}/{lng}")
    }

    /// Builds the payload.
    #[must_use]
    pub fn build(&self, strings: &dyn StringSource) -> DisplayPayload {
        let description = Some(strings.get_string("geolocation", PLUGIN_COMPONENT));
        let payload = match self.link {
            LinkMode::OpenStreetMap => {
                DisplayPayload::content_with_link(description, self.geo_uri(), self.osm_url())
            }
            LinkMode::NoLink => DisplayPayload::content(description, self.geo_uri()),
        };
        payload.with_details(ModeDetails::Geolocation(GeoDetails {
            coordinates: format!("{}, {}", self.latitude, self.longitude),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::EnglishStrings;

    fn munich(link: LinkMode) -> Geolocation {
        Geolocation {
            latitude: "48.137".into(),
            longitude: "11.575".into(),
            link,
        }
    }

    #[test]
    fn test_osm_link() {
        let payload = munich(LinkMode::OpenStreetMap).build(&EnglishStrings::new());
        assert_eq!(payload.qr_content(), "geo:48.137,11.575");
        assert!(payload.has_link());
        let link = payload.qr_link().unwrap();
        assert!(link.contains("openstreetmap.org"));
        assert!(link.contains("48.137"));
        assert!(link.contains("11.575"));
        assert!(link.ends_with("#map=10/48.137/11.575"));
    }

    #[test]
    fn test_no_link() {
        let payload = munich(LinkMode::NoLink).build(&EnglishStrings::new());
        assert!(!payload.has_link());
        assert!(payload.qr_link().is_none());
        assert_eq!(payload.description(), Some("Geolocation"));
    }

    #[test]
    fn test_coordinates_detail() {
        let payload = munich(LinkMode::NoLink).build(&EnglishStrings::new());
        assert_eq!(
            payload.details(),
            Some(&ModeDetails::Geolocation(GeoDetails {
                coordinates: "48.137, 11.575".into()
            }))
        );
    }

    #[test]
    fn test_link_mode_from_config() {
        assert_eq!(LinkMode::from_config(Some("osm")), LinkMode::OpenStreetMap);
        assert_eq!(LinkMode::from_config(Some("nolink")), LinkMode::NoLink);
        assert_eq!(LinkMode::from_config(Some("google")), LinkMode::NoLink);
        assert_eq!(LinkMode::from_config(None), LinkMode::NoLink);
    }
}
