//! Radio link-budget calculations.
//!
//! Contains helpers for:
//! - Log-distance path loss with optional log-normal shadowing
//! - SNR thresholds and the receiving limit derived from them
//! - Effective communication distance for a given transmit power
//! - RSSI sampling
//!
//! Units:
//! - Power: dBm
//! - Distance: meters; world units are interpreted as meters

use rand::thread_rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

/// Parameters of the log-distance path loss model with log-normal shadowing.
#[derive(Debug, Deserialize, Clone)]
pub struct PathLossParameters {
    /// Path loss exponent (n).
    ///
    /// - n = 2.0: Free space
    /// - n = 2.7 to 3.5: Urban areas
    /// - n = 3.0 to 5.0: Indoor obstructed environments
    pub path_loss_exponent: f32,

    /// Standard deviation for log-normal shadowing (σ) in dB. 0.0 disables shadowing.
    pub shadowing_sigma: f32,

    /// Path loss at the reference distance d₀ = 1 m, in dB.
    pub path_loss_at_reference_distance: f32,

    /// Thermal noise floor of the receiver in dBm.
    pub noise_floor: f32,
}

/// LoRa modulation parameters relevant for the receive threshold.
#[derive(Debug, Deserialize, Clone)]
pub struct LoraParameters {
    pub bandwidth: u32,
    pub spreading_factor: u8,
    /// 1..=4, representing coding rates 4/5..4/8.
    pub coding_rate: u32,
}

/// Path loss (dB) at `distance` meters.
///
/// # Formula
///
/// ```text
/// PL(d) = PL(d₀) + 10 × n × log₁₀(d/d₀) + X_σ
/// where d₀ = 1 meter (reference distance)
/// ```
///
/// `X_σ` is sampled from Normal(0, σ) on every call when σ > 0, so repeated
/// calls with the same distance yield different results. For distances below
/// 1 m the reference loss is returned without shadowing.
pub fn calculate_path_loss(distance: f32, params: &PathLossParameters) -> f32 {
    if distance < 1.0 {
        return params.path_loss_at_reference_distance;
    }
    let path_loss = params.path_loss_at_reference_distance + 10.0 * params.path_loss_exponent * distance.log10();
    path_loss + sample_shadowing(params.shadowing_sigma)
}

fn sample_shadowing(sigma: f32) -> f32 {
    if sigma <= 0.0 {
        return 0.0;
    }
    match Normal::new(0.0_f32, sigma) {
        Ok(normal) => normal.sample(&mut thread_rng()),
        Err(err) => {
            log::warn!("Invalid shadowing sigma {}: {}", sigma, err);
            0.0
        }
    }
}

/// Instantaneous RSSI (dBm): `P_tx - PL(d)`. Stochastic when shadowing is enabled.
pub fn calculate_rssi(distance: f32, tx_power_dbm: f32, params: &PathLossParameters) -> f32 {
    tx_power_dbm - calculate_path_loss(distance, params)
}

/// Minimum SNR (dB) needed to demodulate at the given spreading factor.
pub fn calculate_snr_limit(lora_parameters: &LoraParameters) -> f32 {
    match lora_parameters.spreading_factor {
        5 => -2.5,
        6 => -5.0,
        7 => -7.5,
        8 => -10.0,
        9 => -12.5,
        10 => -15.0,
        11 => -17.5,
        12 => -20.0,
        // Out of range: assume the worst case
        _ => -20.0,
    }
}

/// Weakest receivable signal (dBm): noise floor plus the SNR limit.
pub fn calculate_receiving_limit(lora_parameters: &LoraParameters, path_loss_parameters: &PathLossParameters) -> f32 {
    path_loss_parameters.noise_floor + calculate_snr_limit(lora_parameters)
}

/// Distance at which the deterministic received power equals the receiving limit.
///
/// Solving `P_tx - (PL0 + 10n·log10 d) = RL` for d gives
/// `d = 10^((P_tx - RL - PL0) / (10n))`. Shadowing is not sampled, so the result
/// is stable across calls.
pub fn calculate_effective_distance(tx_power_dbm: f32, lora_parameters: &LoraParameters, path_loss_parameters: &PathLossParameters) -> f32 {
    let pl0 = path_loss_parameters.path_loss_at_reference_distance;
    let rl = calculate_receiving_limit(lora_parameters, path_loss_parameters);
    let numerator = tx_power_dbm - rl - pl0;
    if numerator <= 0.0 {
        return 0.0;
    }
    10.0_f32.powf(numerator / (10.0 * path_loss_parameters.path_loss_exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lora_sf(spreading_factor: u8) -> LoraParameters {
        LoraParameters {
            bandwidth: 125_000,
            spreading_factor,
            coding_rate: 1,
        }
    }

    fn default_pathloss() -> PathLossParameters {
        PathLossParameters {
            path_loss_exponent: 2.0,
            shadowing_sigma: 0.0,
            path_loss_at_reference_distance: 40.0,
            noise_floor: -120.0,
        }
    }

    #[test]
    fn snr_limits_match_expectations() {
        for (sf, expect) in [(7, -7.5), (8, -10.0), (9, -12.5), (10, -15.0), (11, -17.5), (12, -20.0), (3, -20.0)] {
            assert_eq!(calculate_snr_limit(&lora_sf(sf)), expect);
        }
    }

    #[test]
    fn path_loss_without_shadowing_is_deterministic() {
        let params = default_pathloss();
        assert_eq!(calculate_path_loss(0.5, &params), 40.0);
        assert!((calculate_path_loss(10.0, &params) - 60.0).abs() < 1e-4);
        assert!((calculate_rssi(100.0, 14.0, &params) - (14.0 - 80.0)).abs() < 1e-4);
    }

    #[test]
    fn effective_distance_monotonic_with_tx_power() {
        let lp = lora_sf(7);
        let pl = default_pathloss();
        let d_low = calculate_effective_distance(0.0, &lp, &pl);
        let d_mid = calculate_effective_distance(10.0, &lp, &pl);
        let d_high = calculate_effective_distance(20.0, &lp, &pl);
        assert!(d_low < d_mid && d_mid < d_high);
    }

    #[test]
    fn effective_distance_is_zero_without_budget() {
        let pl = default_pathloss();
        assert_eq!(calculate_effective_distance(-200.0, &lora_sf(7), &pl), 0.0);
    }

    #[test]
    fn rssi_at_effective_distance_matches_receiving_limit() {
        let lp = lora_sf(9);
        let pl = default_pathloss();
        let d = calculate_effective_distance(14.0, &lp, &pl);
        let rssi = calculate_rssi(d, 14.0, &pl);
        assert!((rssi - calculate_receiving_limit(&lp, &pl)).abs() < 0.01);
    }
}
