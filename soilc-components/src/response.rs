//! Environmental response functions
//!
//! Decomposition rates are scaled by a temperature factor and a moisture
//! factor. Both are pure functions of the forcing at a single timestep, so
//! they can be evaluated for a whole forcing series up front
//! ([`EnvironmentalResponse::from_forcing`]) or one step at a time
//! ([`ResponseFactors::for_record`]) with identical results.

use crate::parameters::TwoPoolParameters;
use serde::{Deserialize, Serialize};
use soilc_core::forcing::{ForcingData, ForcingRecord};
use soilc_core::pools::PoolSlice;
use soilc_core::FloatValue;

/// Q10 temperature response.
///
/// $$f_T(T) = Q_{10}^{(T - T_{ref}) / 10}$$
///
/// Equals 1 at `T = tref`.
pub fn temperature_response(
    q10: FloatValue,
    tref: FloatValue,
    temperature: FloatValue,
) -> FloatValue {
    q10.powf((temperature - tref) / 10.0)
}

/// Floored quadratic moisture response.
///
/// $$f_W(W) = \max(W_{min}, W_{max} + m (W - x_0)^2)$$
///
/// Never drops below `wf_min` for finite inputs. A NaN anywhere in the
/// expression yields NaN rather than being masked by the floor.
pub fn moisture_response(
    wf_min: FloatValue,
    wf_max: FloatValue,
    wf_m: FloatValue,
    wf_x0: FloatValue,
    moisture: FloatValue,
) -> FloatValue {
    let deviation = moisture - wf_x0;
    let response = wf_max + wf_m * (deviation * deviation);
    if response.is_nan() || wf_min.is_nan() {
        return FloatValue::NAN;
    }
    response.max(wf_min)
}

/// Response factors for both pools at one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseFactors {
    pub temperature: PoolSlice,
    pub moisture: PoolSlice,
}

impl ResponseFactors {
    pub fn for_record(parameters: &TwoPoolParameters, record: &ForcingRecord) -> Self {
        Self {
            temperature: record
                .temperature()
                .map(|_, t| parameters.temperature_factor(t)),
            moisture: record
                .moisture()
                .map(|_, w| parameters.moisture_factor(w)),
        }
    }
}

/// Response factors precomputed over a whole forcing series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalResponse {
    factors: Vec<ResponseFactors>,
}

impl EnvironmentalResponse {
    pub fn from_forcing(parameters: &TwoPoolParameters, forcing: &ForcingData) -> Self {
        Self {
            factors: forcing
                .iter()
                .map(|record| ResponseFactors::for_record(parameters, record))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResponseFactors> {
        self.factors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResponseFactors> {
        self.factors.iter()
    }

    /// Temperature factor series for each pool.
    pub fn temperature(&self) -> Vec<PoolSlice> {
        self.factors.iter().map(|f| f.temperature).collect()
    }

    /// Moisture factor series for each pool.
    pub fn moisture(&self) -> Vec<PoolSlice> {
        self.factors.iter().map(|f| f.moisture).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_response_at_reference() {
        assert_eq!(temperature_response(2.0, 10.0, 10.0), 1.0);
        assert_eq!(temperature_response(3.5, -4.0, -4.0), 1.0);
    }

    #[test]
    fn test_temperature_response_q10() {
        // Ten degrees of warming multiplies the rate by Q10
        assert!((temperature_response(2.0, 10.0, 20.0) - 2.0).abs() < 1e-12);
        assert!((temperature_response(2.0, 10.0, 0.0) - 0.5).abs() < 1e-12);
        assert!((temperature_response(3.0, 15.0, 35.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_response_increases_with_warming() {
        let cold = temperature_response(2.0, 10.0, 5.0);
        let warm = temperature_response(2.0, 10.0, 15.0);
        assert!(warm > cold, "{} should exceed {}", warm, cold);
    }

    #[test]
    fn test_moisture_response_at_optimum() {
        assert_eq!(moisture_response(0.1, 1.0, -0.1, 0.5, 0.5), 1.0);
    }

    #[test]
    fn test_moisture_response_quadratic() {
        // 1 - 0.1 * 2^2
        let response = moisture_response(0.1, 1.0, -0.1, 0.5, 2.5);
        assert!((response - 0.6).abs() < 1e-12, "got {}", response);
    }

    #[test]
    fn test_moisture_response_floor() {
        for moisture in [-1e6, -100.0, -3.0, 0.0, 0.5, 3.0, 10.0, 1e6] {
            let response = moisture_response(0.1, 1.0, -0.1, 0.5, moisture);
            assert!(
                response >= 0.1,
                "Moisture response {} at W={} fell below the floor",
                response,
                moisture
            );
        }
        assert_eq!(moisture_response(0.1, 1.0, -0.1, 0.5, 100.0), 0.1);
    }

    #[test]
    fn test_moisture_response_propagates_nan() {
        assert!(moisture_response(0.1, 1.0, -0.1, 0.5, FloatValue::NAN).is_nan());
        assert!(moisture_response(FloatValue::NAN, 1.0, -0.1, 0.5, 0.5).is_nan());
    }

    fn parameters() -> TwoPoolParameters {
        TwoPoolParameters {
            npools: 2,
            c_litter_t0: 100.0,
            c_soil_t0: 500.0,
            dt: 1.0,
            tau_litter: 2.0,
            tau_soil: 50.0,
            q10: 2.0,
            tref: 10.0,
            wf_min: 0.1,
            wf_max: 1.0,
            wf_m: -0.1,
            wf_x0: 0.5,
            me_litter: 0.3,
            me_soil: 0.2,
        }
    }

    fn forcing() -> ForcingData {
        ForcingData::from_records(
            (0..24)
                .map(|t| {
                    let t = t as FloatValue;
                    ForcingRecord {
                        litter_temp: 10.0 + 8.0 * (t / 4.0).sin(),
                        soil_temp: 8.0 + 5.0 * (t / 4.0).cos(),
                        litter_moist: 0.2 + 0.05 * t,
                        soil_moist: 0.9 - 0.03 * t,
                        litter_input: 1.0,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn test_eager_matches_per_step() {
        let params = parameters();
        let forcing = forcing();
        let eager = EnvironmentalResponse::from_forcing(&params, &forcing);

        assert_eq!(eager.len(), forcing.len());
        for (t, record) in forcing.iter().enumerate() {
            let lazy = ResponseFactors::for_record(&params, record);
            // Bitwise equality, not just within tolerance
            assert_eq!(eager.get(t), Some(&lazy), "Mismatch at step {}", t);
        }
    }

    #[test]
    fn test_factors_per_pool() {
        let params = parameters();
        let record = ForcingRecord {
            litter_temp: 20.0,
            soil_temp: 10.0,
            litter_moist: 0.5,
            soil_moist: 2.5,
            litter_input: 0.0,
        };
        let factors = ResponseFactors::for_record(&params, &record);
        assert!((factors.temperature.litter() - 2.0).abs() < 1e-12);
        assert_eq!(factors.temperature.soil(), 1.0);
        assert_eq!(factors.moisture.litter(), 1.0);
        assert!((factors.moisture.soil() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_forcing() {
        let response = EnvironmentalResponse::from_forcing(&parameters(), &ForcingData::default());
        assert!(response.is_empty());
        assert!(response.temperature().is_empty());
        assert!(response.moisture().is_empty());
    }
}
