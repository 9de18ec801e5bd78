//! Wire types for the current-conditions lookup API.
//!
//! Only the fields needed to recover per-pollutant concentrations are
//! modelled; everything else in the response is ignored.

use routerisk_core::{Pollutant, PollutantReading};
use serde::{Deserialize, Serialize};

/// Extra computations requested alongside the index.
pub(crate) const EXTRA_COMPUTATIONS: [&str; 3] = [
    "POLLUTANT_CONCENTRATION",
    "POLLUTANT_ADDITIONAL_INFO",
    "LOCAL_AQI",
];

/// Request body for a single-point lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupRequest<'a> {
    pub location: Location,
    pub extra_computations: [&'static str; 3],
    pub language_code: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response body of a lookup.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LookupResponse {
    #[serde(default)]
    pub pollutants: Vec<PollutantEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PollutantEntry {
    #[serde(default)]
    pub code: String,
    pub concentration: Option<Concentration>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Concentration {
    pub value: Option<f64>,
}

impl LookupResponse {
    /// Convert the reported pollutants into a reading.
    ///
    /// Values are kept in provider units. Unknown codes are ignored and
    /// entries without a value leave the slot missing, as does every tracked
    /// pollutant not reported.
    pub(crate) fn into_reading(self) -> PollutantReading {
        PollutantReading::from_pairs(self.pollutants.into_iter().filter_map(|entry| {
            let pollutant = entry.code.parse::<Pollutant>().ok()?;
            let value = entry.concentration.and_then(|c| c.value);
            Some((pollutant, value))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decodes_and_normalises_codes() {
        let json = r#"{
            "dateTime": "2024-01-01T00:00:00Z",
            "pollutants": [
                {"code": "pm25", "concentration": {"value": 31.5, "units": "MICROGRAMS_PER_CUBIC_METER"}},
                {"code": "CO", "concentration": {"value": 410.2, "units": "PARTS_PER_BILLION"}},
                {"code": "nh3", "concentration": {"value": 4.0}},
                {"code": "o3"}
            ]
        }"#;
        let response: LookupResponse = serde_json::from_str(json).expect("should deserialise");

        let reading = response.into_reading();

        assert_eq!(reading.get(Pollutant::Pm25), Some(31.5));
        assert_eq!(reading.get(Pollutant::Co), Some(410.2));
        assert_eq!(reading.get(Pollutant::O3), None);
        assert_eq!(reading.get(Pollutant::So2), None);
    }

    #[rstest]
    fn empty_body_yields_missing_reading() {
        let response: LookupResponse = serde_json::from_str("{}").expect("should deserialise");
        assert!(response.into_reading().is_missing());
    }

    #[rstest]
    fn request_body_uses_camel_case() {
        let body = LookupRequest {
            location: Location {
                latitude: 13.75,
                longitude: 100.5,
            },
            extra_computations: EXTRA_COMPUTATIONS,
            language_code: "en",
        };
        let value = serde_json::to_value(&body).expect("should serialise");
        assert_eq!(value["location"]["latitude"], 13.75);
        assert_eq!(value["languageCode"], "en");
        assert_eq!(value["extraComputations"][0], "POLLUTANT_CONCENTRATION");
    }
}
