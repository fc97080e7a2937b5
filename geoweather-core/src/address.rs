use serde::Deserialize;

pub const UNKNOWN_LOCATION: &str = "Unknown location";

const SEPARATOR: &str = ", ";

/// Locality fields of a reverse-geocoded address. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Address {
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub city_district: Option<String>,
    pub district: Option<String>,
    pub borough: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Up to the two most specific locality names joined with ", ",
    /// or [`UNKNOWN_LOCATION`] when none is present.
    pub fn display_name(&self) -> String {
        let tiers: [&[&Option<String>]; 3] = [
            &[&self.neighbourhood, &self.suburb, &self.village, &self.hamlet],
            &[&self.city_district, &self.district, &self.borough],
            &[&self.city, &self.town, &self.county],
        ];

        let mut parts: Vec<&str> = Vec::with_capacity(2);
        for tier in tiers {
            let Some(name) = tier.iter().copied().find_map(non_blank) else {
                continue;
            };
            if !parts.contains(&name) {
                parts.push(name);
            }
            if parts.len() == 2 {
                break;
            }
        }

        if parts.is_empty() {
            UNKNOWN_LOCATION.to_string()
        } else {
            parts.join(SEPARATOR)
        }
    }

    pub fn country_name(&self) -> String {
        non_blank(&self.country).unwrap_or_default().to_string()
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
