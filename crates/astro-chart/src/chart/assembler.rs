//! Response payloads built from a [`ChartReport`].
//!
//! Two shapes are produced: the structured one (meta, natal_chart,
//! transit_chart) answering structured requests, and the flat one answering flat requests.

use super::engine::ChartReport;
use crate::aspects::{AspectSet, AspectType};
use crate::ephemeris::{Body, HouseFrame};
use crate::western::{Distribution, Element, Modality, Placement, Sign};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct PlanetView {
    pub sign: Sign,
    pub degree: f64,
    pub house: Option<u8>,
    pub retrograde: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatPlanetView {
    pub sign: Sign,
    pub degree: f64,
    pub house: Option<u8>,
    pub retrograde: bool,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AspectView {
    pub planet1: Body,
    pub planet2: Body,
    pub aspect: AspectType,
    pub angle: f64,
    pub separation: f64,
    pub orb: f64,
    pub exact: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossAspectView {
    pub transit_planet: Body,
    pub natal_planet: Body,
    pub aspect: AspectType,
    pub angle: f64,
    pub separation: f64,
    pub orb: f64,
    pub exact: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationMeta {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BirthMeta {
    pub date: String,
    pub time: String,
    pub timezone: Option<String>,
    pub location: Option<LocationMeta>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSettingsMeta {
    pub house_system: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMeta {
    pub name: Option<String>,
    pub birth: BirthMeta,
    pub chart_settings: ChartSettingsMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct NatalChartView {
    pub ascendant: Option<f64>,
    pub midheaven: Option<f64>,
    pub houses: Option<Vec<f64>>,
    pub planets: BTreeMap<Body, PlanetView>,
    pub aspects: Vec<AspectView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitChartView {
    pub date: String,
    pub time: String,
    pub timezone: Option<String>,
    pub planets: BTreeMap<Body, PlanetView>,
    pub aspects_to_natal: Vec<CrossAspectView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuredResponse {
    pub meta: ResponseMeta,
    pub natal_chart: NatalChartView,
    pub transit_chart: Option<TransitChartView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatTransitView {
    pub date: String,
    pub time: String,
    pub planets: BTreeMap<Body, FlatPlanetView>,
    pub aspects: Vec<CrossAspectView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatResponse {
    pub planets: BTreeMap<Body, FlatPlanetView>,
    pub aspects: Vec<AspectView>,
    pub elements: Distribution<Element>,
    pub modalities: Distribution<Modality>,
    pub houses: Option<Vec<f64>>,
    pub ascendant: Option<f64>,
    pub midheaven: Option<f64>,
    pub transits: Option<FlatTransitView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Chart assembler
pub struct ChartAssembler;

impl ChartAssembler {
    pub fn structured(report: &ChartReport) -> StructuredResponse {
        let request = &report.request;
        let natal = &report.natal;

        let meta = ResponseMeta {
            name: request.name.clone(),
            birth: BirthMeta {
                date: request.birth.date.clone(),
                time: request.birth.time.clone(),
                timezone: request.birth.timezone.clone(),
                location: request.location.map(|loc| LocationMeta {
                    lat: loc.lat,
                    lon: loc.lon,
                    city: request.city.clone(),
                }),
            },
            chart_settings: ChartSettingsMeta {
                house_system: request.house_system.code().to_string(),
            },
        };

        let natal_chart = NatalChartView {
            ascendant: natal.houses.as_ref().map(|h| h.ascendant),
            midheaven: natal.houses.as_ref().map(|h| h.midheaven),
            houses: cusp_list(natal.houses.as_ref()),
            planets: planet_views(&natal.placements),
            aspects: aspect_views(&natal.aspects),
        };

        let transit_chart = report.transit.as_ref().map(|transit| TransitChartView {
            date: transit.input.date.clone(),
            time: transit.input.time.clone(),
            timezone: transit.input.timezone.clone(),
            planets: planet_views(&transit.placements),
            aspects_to_natal: cross_aspect_views(&transit.aspects_to_natal),
        });

        StructuredResponse {
            meta,
            natal_chart,
            transit_chart,
            warnings: report.warnings.clone(),
        }
    }

    pub fn flat(report: &ChartReport) -> FlatResponse {
        let natal = &report.natal;

        let transits = report.transit.as_ref().map(|transit| FlatTransitView {
            date: transit.input.date.clone(),
            time: transit.input.time.clone(),
            planets: flat_planet_views(&transit.placements),
            aspects: cross_aspect_views(&transit.aspects_to_natal),
        });

        FlatResponse {
            planets: flat_planet_views(&natal.placements),
            aspects: aspect_views(&natal.aspects),
            elements: natal.elements.clone(),
            modalities: natal.modalities.clone(),
            houses: cusp_list(natal.houses.as_ref()),
            ascendant: natal.houses.as_ref().map(|h| h.ascendant),
            midheaven: natal.houses.as_ref().map(|h| h.midheaven),
            transits,
            warnings: report.warnings.clone(),
        }
    }
}

fn cusp_list(houses: Option<&HouseFrame>) -> Option<Vec<f64>> {
    houses.map(|frame| frame.cusps.to_vec())
}

fn planet_views(placements: &BTreeMap<Body, Placement>) -> BTreeMap<Body, PlanetView> {
    placements
        .iter()
        .map(|(body, p)| {
            (
                *body,
                PlanetView {
                    sign: p.sign,
                    degree: p.degree,
                    house: p.house,
                    retrograde: p.retrograde,
                },
            )
        })
        .collect()
}

fn flat_planet_views(placements: &BTreeMap<Body, Placement>) -> BTreeMap<Body, FlatPlanetView> {
    placements
        .iter()
        .map(|(body, p)| {
            (
                *body,
                FlatPlanetView {
                    sign: p.sign,
                    degree: p.degree,
                    house: p.house,
                    retrograde: p.retrograde,
                    longitude: p.longitude,
                },
            )
        })
        .collect()
}

fn aspect_views(set: &AspectSet) -> Vec<AspectView> {
    set.matches
        .iter()
        .map(|m| AspectView {
            planet1: m.from.body,
            planet2: m.to.body,
            aspect: m.aspect,
            angle: m.angle,
            separation: m.separation,
            orb: m.orb,
            exact: m.exact,
        })
        .collect()
}

fn cross_aspect_views(set: &AspectSet) -> Vec<CrossAspectView> {
    set.matches
        .iter()
        .map(|m| CrossAspectView {
            transit_planet: m.from.body,
            natal_planet: m.to.body,
            aspect: m.aspect,
            angle: m.angle,
            separation: m.separation,
            orb: m.orb,
            exact: m.exact,
        })
        .collect()
}
