//! Depth-zoned fog/background color with a persistent blend accumulator.

use crate::color::Rgb;
use crate::error::FlightError;

/// A depth range with its ambient color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereZone {
    pub max_depth: f32,
    pub color: Rgb,
    pub blend_factor: f32,
}

/// Ordered zone table; the last zone is the unbounded catch-all.
#[derive(Clone, Debug)]
pub struct AtmosphereZones {
    zones: Vec<AtmosphereZone>,
}

impl AtmosphereZones {
    pub fn new(zones: Vec<AtmosphereZone>) -> Result<Self, FlightError> {
        let last = zones.last().ok_or(FlightError::NoZones)?;
        if last.max_depth.is_finite() {
            return Err(FlightError::ZonesNotExhaustive(last.max_depth));
        }
        for (index, pair) in zones.windows(2).enumerate() {
            if pair[1].max_depth <= pair[0].max_depth {
                return Err(FlightError::ZonesOutOfOrder {
                    index: index + 1,
                    max_depth: pair[1].max_depth,
                });
            }
        }
        if let Some(z) = zones
            .iter()
            .find(|z| !(z.blend_factor > 0.0 && z.blend_factor <= 1.0))
        {
            return Err(FlightError::InvalidBlendFactor(z.blend_factor));
        }
        Ok(Self { zones })
    }

    /// London steel blue, Washington granite, Dubai bronze.
    pub fn flight_defaults() -> Self {
        Self {
            zones: vec![
                AtmosphereZone {
                    max_depth: 300.0,
                    color: Rgb::from_hex(0x0a1016),
                    blend_factor: 0.5,
                },
                AtmosphereZone {
                    max_depth: 700.0,
                    color: Rgb::from_hex(0x151515),
                    blend_factor: 0.8,
                },
                AtmosphereZone {
                    max_depth: f32::INFINITY,
                    color: Rgb::from_hex(0x1a1205),
                    blend_factor: 0.8,
                },
            ],
        }
    }

    /// Index of the first zone whose `max_depth` exceeds `depth`.
    ///
    /// A pure step function of `depth`; the catch-all zone guarantees a hit
    /// for every finite depth.
    pub fn select(&self, depth: f32) -> usize {
        let d = depth.abs();
        self.zones
            .iter()
            .position(|z| z.max_depth > d)
            .unwrap_or(self.zones.len() - 1)
    }

    pub fn zone(&self, index: usize) -> &AtmosphereZone {
        &self.zones[index.min(self.zones.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Background/fog color that eases across zone boundaries instead of popping.
#[derive(Clone, Debug)]
pub struct Atmosphere {
    zones: AtmosphereZones,
    color: Rgb,
    active: usize,
}

impl Atmosphere {
    pub fn new(zones: AtmosphereZones) -> Self {
        Self {
            zones,
            color: Rgb::BLACK,
            active: 0,
        }
    }

    /// Blend the accumulator toward the active zone for this depth.
    pub fn evaluate(&mut self, depth: f32) -> Rgb {
        let index = self.zones.select(depth);
        if index != self.active {
            log::debug!("[atmosphere] zone {} -> {} at depth {:.1}", self.active, index, depth);
            self.active = index;
        }
        let zone = self.zones.zone(index);
        self.color = self.color.lerp(zone.color, zone.blend_factor);
        self.color
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    pub fn active_zone(&self) -> usize {
        self.active
    }

    pub fn zones(&self) -> &AtmosphereZones {
        &self.zones
    }

    pub fn reset(&mut self) {
        self.color = Rgb::BLACK;
        self.active = 0;
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self::new(AtmosphereZones::flight_defaults())
    }
}
