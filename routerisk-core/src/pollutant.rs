//! Pollutant codes and per-coordinate enrichment readings.
//!
//! The pollutant set is fixed at six codes. A [`PollutantReading`] always
//! carries a slot for every code; absent concentrations are represented as
//! `None` rather than a numeric placeholder, so they can never leak into
//! statistics.
//!
//! # Examples
//! ```
//! use routerisk_core::{Pollutant, PollutantReading};
//!
//! let reading = PollutantReading::missing().with(Pollutant::Pm25, 12.0);
//! assert_eq!(reading.get(Pollutant::Pm25), Some(12.0));
//! assert_eq!(reading.get(Pollutant::So2), None);
//! assert_eq!("PM2.5".parse::<Pollutant>(), Ok(Pollutant::Pm25));
//! ```

/// One of the six tracked pollutants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pollutant {
    /// Fine particulate matter, diameter below 2.5 µm.
    Pm25,
    /// Coarse particulate matter, diameter below 10 µm.
    Pm10,
    /// Carbon monoxide.
    Co,
    /// Nitrogen dioxide.
    No2,
    /// Ozone.
    O3,
    /// Sulphur dioxide.
    So2,
}

impl Pollutant {
    /// Number of tracked pollutants.
    pub const COUNT: usize = 6;

    /// Every pollutant in canonical order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Pm25,
        Self::Pm10,
        Self::Co,
        Self::No2,
        Self::O3,
        Self::So2,
    ];

    /// Return the canonical lowercase code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pm25 => "pm25",
            Self::Pm10 => "pm10",
            Self::Co => "co",
            Self::No2 => "no2",
            Self::O3 => "o3",
            Self::So2 => "so2",
        }
    }

    /// Position of the pollutant within [`Pollutant::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Pm25 => 0,
            Self::Pm10 => 1,
            Self::Co => 2,
            Self::No2 => 3,
            Self::O3 => 4,
            Self::So2 => 5,
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Pollutant {
    type Err = String;

    /// Parse a provider or user supplied code.
    ///
    /// Matching is case-insensitive and accepts the `pm2.5` and `p25`
    /// spellings used by upstream providers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pm25" | "pm2.5" | "p25" => Ok(Self::Pm25),
            "pm10" => Ok(Self::Pm10),
            "co" => Ok(Self::Co),
            "no2" => Ok(Self::No2),
            "o3" => Ok(Self::O3),
            "so2" => Ok(Self::So2),
            _ => Err(format!("unknown pollutant '{s}'")),
        }
    }
}

/// Concentrations for every tracked pollutant at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollutantReading {
    values: [Option<f64>; Pollutant::COUNT],
}

impl PollutantReading {
    /// A reading in which every pollutant is missing.
    #[must_use]
    pub const fn missing() -> Self {
        Self {
            values: [None; Pollutant::COUNT],
        }
    }

    /// Build a reading from `(pollutant, value)` pairs.
    ///
    /// Later pairs overwrite earlier ones; unmentioned pollutants stay
    /// missing.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Pollutant, Option<f64>)>,
    {
        let mut reading = Self::missing();
        for (pollutant, value) in pairs {
            reading.set(pollutant, value);
        }
        reading
    }

    /// Return a copy with `pollutant` set to `value`.
    #[must_use]
    pub fn with(mut self, pollutant: Pollutant, value: f64) -> Self {
        self.set(pollutant, Some(value));
        self
    }

    /// Store a concentration, treating non-finite values as missing.
    pub fn set(&mut self, pollutant: Pollutant, value: Option<f64>) {
        if let Some(slot) = self.values.get_mut(pollutant.index()) {
            *slot = value.filter(|v| v.is_finite());
        }
    }

    /// Concentration for `pollutant`, if present.
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.values.get(pollutant.index()).copied().flatten()
    }

    /// Iterate over every pollutant slot in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, Option<f64>)> + '_ {
        Pollutant::ALL.iter().map(|&p| (p, self.get(p)))
    }

    /// Iterate over the pollutants that carry a value.
    pub fn present(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        self.iter().filter_map(|(p, v)| v.map(|value| (p, value)))
    }

    /// Report whether every pollutant is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Report whether any pollutant carries a non-zero value.
    #[must_use]
    pub fn has_signal(&self) -> bool {
        self.present().any(|(_, value)| value != 0.0)
    }

    /// Per-pollutant mean over the present values of `readings`.
    ///
    /// A pollutant missing from every reading stays missing.
    #[must_use]
    pub fn mean<'a, I>(readings: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut sums = [0.0_f64; Pollutant::COUNT];
        let mut counts = [0_u32; Pollutant::COUNT];
        for reading in readings {
            for (pollutant, value) in reading.present() {
                if let (Some(sum), Some(count)) = (
                    sums.get_mut(pollutant.index()),
                    counts.get_mut(pollutant.index()),
                ) {
                    *sum += value;
                    *count += 1;
                }
            }
        }
        Self::from_pairs(
            Pollutant::ALL
                .iter()
                .zip(sums.iter().zip(counts.iter()))
                .map(|(&p, (&sum, &count))| {
                    let mean = (count > 0).then(|| sum / f64::from(count));
                    (p, mean)
                }),
        )
    }
}

/// Relative humidity observed at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherReading {
    relative_humidity: Option<f64>,
}

impl WeatherReading {
    /// A reading without humidity.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            relative_humidity: None,
        }
    }

    /// A reading with the given humidity in percent.
    ///
    /// Non-finite values are stored as absent.
    #[must_use]
    pub fn from_humidity(percent: f64) -> Self {
        Self {
            relative_humidity: Some(percent).filter(|v| v.is_finite()),
        }
    }

    /// Relative humidity in percent, if observed.
    #[must_use]
    pub const fn humidity(&self) -> Option<f64> {
        self.relative_humidity
    }
}
