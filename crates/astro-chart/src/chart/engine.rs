use super::natal::{lookup_positions, NatalChart};
use super::request::ChartRequest;
use super::transit::{TransitChart, TransitEngine};
use crate::aspects::{AspectCalculator, AspectSettings};
use crate::ephemeris::{Body, CuspOutcome, EphemerisGateway};
use crate::error::ChartError;
use std::sync::Arc;

/// Everything computed for one request
#[derive(Debug, Clone)]
pub struct ChartReport {
    pub request: ChartRequest,
    pub natal: NatalChart,
    pub transit: Option<TransitChart>,
    /// Non-fatal problems: degraded houses, skipped transit
    pub warnings: Vec<String>,
}

/// Runs the natal pass, the optional transit pass and the aspect passes
pub struct ChartEngine {
    gateway: Arc<dyn EphemerisGateway>,
    bodies: Vec<Body>,
    calculator: AspectCalculator,
}

impl ChartEngine {
    pub fn new(gateway: Arc<dyn EphemerisGateway>) -> Self {
        Self {
            gateway,
            bodies: Body::DEFAULT_SET.to_vec(),
            calculator: AspectCalculator::new(),
        }
    }

    pub fn with_bodies(mut self, bodies: Vec<Body>) -> Self {
        self.bodies = bodies;
        self
    }

    pub fn with_aspect_settings(mut self, settings: AspectSettings) -> Self {
        self.calculator = AspectCalculator::with_settings(settings);
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Compute a chart.
    ///
    /// Natal body lookups, the house lookup and the transit lookups are
    /// issued together and joined before anything is placed. A failed natal
    /// lookup fails the request; a failed transit pass only drops the
    /// transit output.
    pub async fn compute(&self, request: &ChartRequest) -> Result<ChartReport, ChartError> {
        let natal_moment = request.birth.resolve()?;
        let natal_point = natal_moment.to_time_point();
        log::debug!(
            "Natal {} {} -> JD {:.6}",
            request.birth.date,
            request.birth.time,
            natal_point.julian_day()
        );

        let transit_engine = TransitEngine::new(Arc::clone(&self.gateway));

        let houses = async {
            match request.location {
                Some(location) => Some(
                    self.gateway
                        .house_cusps(natal_point, location, request.house_system)
                        .await,
                ),
                None => None,
            }
        };
        let natal_positions = lookup_positions(Arc::clone(&self.gateway), natal_point, &self.bodies);
        let transit_positions = async {
            match &request.transit {
                Some(input) => Some(transit_engine.lookup(input, &self.bodies).await),
                None => None,
            }
        };

        let (houses, natal_positions, transit_positions) =
            tokio::join!(houses, natal_positions, transit_positions);
        let natal_positions = natal_positions?;

        let mut warnings = Vec::new();
        let frame = match houses {
            Some(CuspOutcome::Ok(frame)) => Some(frame),
            Some(CuspOutcome::Degraded(frame, reason)) => {
                log::warn!("House cusps degraded: {}", reason);
                warnings.push(reason);
                Some(frame)
            }
            Some(CuspOutcome::Failed(reason)) => {
                log::warn!("House cusps unavailable: {}", reason);
                warnings.push(format!("houses unavailable: {}", reason));
                None
            }
            None => None,
        };

        let natal = NatalChart::build(natal_moment, &natal_positions, frame, &self.calculator);

        let transit = match transit_positions {
            Some(Ok(positions)) => Some(transit_engine.assemble(positions, &natal, &self.calculator)),
            Some(Err(e)) => {
                log::warn!("Transit pass skipped: {}", e);
                warnings.push(format!("transit skipped: {}", e));
                None
            }
            None => None,
        };

        Ok(ChartReport {
            request: request.clone(),
            natal,
            transit,
            warnings,
        })
    }
}
