//! Request bodies accepted by `POST /natal-chart`.
//!
//! Two shapes arrive on the same route. A body carrying a `birth` object is
//! the structured form; anything else is read as the flat form. Both are
//! normalized into a [`ChartRequest`].

use astro_chart::chart::parse_house_system;
use astro_chart::ephemeris::HouseSystem;
use astro_chart::{ChartRequest, MomentInput};
use serde::Deserialize;
use serde_json::Value;

/// Which form the caller used; the response mirrors it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Flat,
    Structured,
}

/// Coordinates and offsets arrive either as JSON numbers or as strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn to_f64(&self, field: &str) -> anyhow::Result<f64> {
        let value = match self {
            NumberOrText::Number(n) => *n,
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("Invalid {field} '{s}': expected a number"))?,
        };
        if !value.is_finite() {
            anyhow::bail!("Invalid {field} '{value}': expected a finite number");
        }
        Ok(value)
    }

    fn to_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumberOrText::Text(s) if s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatPayload {
    #[serde(default)]
    pub name: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub lat: Option<NumberOrText>,
    #[serde(default)]
    pub lon: Option<NumberOrText>,
    #[serde(default)]
    pub timezone: Option<NumberOrText>,
    #[serde(default)]
    pub transit_date: Option<String>,
    #[serde(default)]
    pub transit_time: Option<String>,
    #[serde(default)]
    pub transit_timezone: Option<NumberOrText>,
    #[serde(default)]
    pub hsys: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructuredPayload {
    #[serde(default)]
    pub name: Option<String>,
    pub birth: BirthPayload,
    #[serde(default)]
    pub chart_settings: Option<ChartSettingsPayload>,
    #[serde(default)]
    pub transit_chart: Option<TransitPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BirthPayload {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub timezone: Option<NumberOrText>,
    #[serde(default)]
    pub location: Option<LocationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationPayload {
    pub lat: NumberOrText,
    pub lon: NumberOrText,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartSettingsPayload {
    #[serde(default)]
    pub house_system: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitPayload {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub timezone: Option<NumberOrText>,
}

/// Decode a request body and normalize it into a [`ChartRequest`].
pub fn parse_request(
    body: &[u8],
    default_system: HouseSystem,
) -> anyhow::Result<(PayloadShape, ChartRequest)> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| anyhow::anyhow!("Invalid JSON body: {e}"))?;

    if value.get("birth").is_some() {
        let payload: StructuredPayload = serde_json::from_value(value)
            .map_err(|e| anyhow::anyhow!("Invalid chart request: {e}"))?;
        Ok((PayloadShape::Structured, payload.into_request(default_system)?))
    } else {
        let payload: FlatPayload = serde_json::from_value(value)
            .map_err(|e| anyhow::anyhow!("Invalid chart request: {e}"))?;
        Ok((PayloadShape::Flat, payload.into_request(default_system)?))
    }
}

impl FlatPayload {
    pub fn into_request(self, default_system: HouseSystem) -> anyhow::Result<ChartRequest> {
        let birth = moment(self.date, self.time, self.timezone.as_ref());
        let mut request = ChartRequest::new(birth)
            .with_house_system(house_system(self.hsys.as_deref(), default_system)?);
        request.name = non_blank(self.name);

        let lat = self.lat.filter(|v| !v.is_blank());
        let lon = self.lon.filter(|v| !v.is_blank());
        match (lat, lon) {
            (Some(lat), Some(lon)) => {
                request = request.with_location(lat.to_f64("lat")?, lon.to_f64("lon")?);
            }
            (None, None) => {}
            _ => anyhow::bail!("lat and lon must be supplied together"),
        }

        if let (Some(date), Some(time)) = (non_blank(self.transit_date), non_blank(self.transit_time)) {
            request = request.with_transit(moment(date, time, self.transit_timezone.as_ref()));
        }
        Ok(request)
    }
}

impl StructuredPayload {
    pub fn into_request(self, default_system: HouseSystem) -> anyhow::Result<ChartRequest> {
        let system = self
            .chart_settings
            .as_ref()
            .and_then(|s| s.house_system.as_deref());
        let birth = moment(self.birth.date, self.birth.time, self.birth.timezone.as_ref());
        let mut request =
            ChartRequest::new(birth).with_house_system(house_system(system, default_system)?);
        request.name = non_blank(self.name);

        if let Some(location) = self.birth.location {
            request = request.with_location(location.lat.to_f64("lat")?, location.lon.to_f64("lon")?);
            request.city = non_blank(location.city);
        }

        if let Some(transit) = self.transit_chart {
            if let (Some(date), Some(time)) = (non_blank(transit.date), non_blank(transit.time)) {
                request = request.with_transit(moment(date, time, transit.timezone.as_ref()));
            }
        }
        Ok(request)
    }
}

fn moment(date: String, time: String, timezone: Option<&NumberOrText>) -> MomentInput {
    let timezone = timezone.map(NumberOrText::to_text).filter(|tz| !tz.is_empty());
    MomentInput::new(date.trim(), time.trim(), timezone.as_deref())
}

fn house_system(code: Option<&str>, default_system: HouseSystem) -> anyhow::Result<HouseSystem> {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => Ok(parse_house_system(code)?),
        None => Ok(default_system),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astro_chart::ephemeris::GeoLocation;
    use astro_chart::ChartError;

    fn parse(body: &str) -> anyhow::Result<(PayloadShape, ChartRequest)> {
        parse_request(body.as_bytes(), HouseSystem::Placidus)
    }

    #[test]
    fn test_flat_payload_with_string_numbers() {
        let (shape, request) = parse(
            r#"{"date":"1990-04-15","time":"10:00","lat":"40.7","lon":-74.0,"timezone":-5,"hsys":"W"}"#,
        )
        .unwrap();
        assert_eq!(shape, PayloadShape::Flat);
        assert_eq!(request.location, Some(GeoLocation { lat: 40.7, lon: -74.0 }));
        assert_eq!(request.birth.timezone.as_deref(), Some("-5"));
        assert_eq!(request.house_system, HouseSystem::WholeSign);
        assert!(request.transit.is_none());
    }

    #[test]
    fn test_flat_transit_needs_date_and_time() {
        let (_, request) = parse(
            r#"{"date":"1990-04-15","time":"10:00","transit_date":"2024-01-01","transit_time":""}"#,
        )
        .unwrap();
        assert!(request.transit.is_none());
        assert!(request.location.is_none());
        assert_eq!(request.house_system, HouseSystem::Placidus);

        let (_, request) = parse(
            r#"{"date":"1990-04-15","time":"10:00","transit_date":"2024-01-01","transit_time":"08:30","transit_timezone":"+01:00"}"#,
        )
        .unwrap();
        let transit = request.transit.unwrap();
        assert_eq!(transit.date, "2024-01-01");
        assert_eq!(transit.timezone.as_deref(), Some("+01:00"));
    }

    #[test]
    fn test_structured_payload() {
        let (shape, request) = parse(
            r#"{
                "name": "Ada",
                "birth": {
                    "date": "1815-12-10",
                    "time": "13:00",
                    "timezone": "Z",
                    "location": {"lat": 51.5, "lon": "-0.12", "city": "London"}
                },
                "chart_settings": {"house_system": "koch"},
                "transit_chart": {"date": "2024-06-01", "time": "12:00"}
            }"#,
        )
        .unwrap();
        assert_eq!(shape, PayloadShape::Structured);
        assert_eq!(request.name.as_deref(), Some("Ada"));
        assert_eq!(request.city.as_deref(), Some("London"));
        assert_eq!(request.location, Some(GeoLocation { lat: 51.5, lon: -0.12 }));
        assert_eq!(request.house_system, HouseSystem::Koch);
        assert_eq!(request.transit.unwrap().time, "12:00");
    }

    #[test]
    fn test_structured_defaults() {
        let (_, request) = parse(
            r#"{"birth":{"date":"2000-01-01","time":"12:00"},"transit_chart":{"date":null,"time":null}}"#,
        )
        .unwrap();
        assert_eq!(request.house_system, HouseSystem::Placidus);
        assert!(request.location.is_none());
        assert!(request.transit.is_none());
        assert!(request.birth.timezone.is_none());
    }

    #[test]
    fn test_unknown_house_system_is_invalid_input() {
        let flat = parse(r#"{"date":"2000-01-01","time":"10:00","hsys":"Q"}"#).unwrap_err();
        let structured = parse(
            r#"{"birth":{"date":"2000-01-01","time":"10:00"},"chart_settings":{"house_system":"gauquelin"}}"#,
        )
        .unwrap_err();
        for err in [flat, structured] {
            assert!(matches!(
                err.downcast_ref::<ChartError>(),
                Some(ChartError::InvalidInput { field: "house_system", .. })
            ));
        }
    }

    #[test]
    fn test_rejected_payloads() {
        assert!(parse("not json").is_err());
        assert!(parse(r#"{"time":"10:00"}"#).is_err());
        assert!(parse(r#"{"date":"2000-01-01","time":"10:00","lat":"north","lon":1}"#).is_err());
        assert!(parse(r#"{"date":"2000-01-01","time":"10:00","lat":10}"#).is_err());
    }
}
