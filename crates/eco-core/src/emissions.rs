//! COPERT-IV speed-dependent emission model ("EmissionModel", C2).
//!
//! `EF(v) = fuel_consumption(v) × co2_per_liter(fuel)` in g CO₂/km, where
//! `fuel_consumption(v) = a + b/v + c·v²` L/km is a simplified COPERT fit.

/// Supported vehicle fuel types and their CO₂-per-liter factor (g/L).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
}

impl FuelType {
    #[inline]
    fn co2_per_liter(self) -> f64 {
        match self {
            FuelType::Petrol => 2310.0,
            FuelType::Diesel => 2680.0,
            FuelType::Hybrid => 1155.0,
            FuelType::Electric => 0.0,
        }
    }
}

impl Default for FuelType {
    fn default() -> Self {
        FuelType::Petrol
    }
}

const FUEL_A: f64 = 0.0667;
const FUEL_B: f64 = 0.0556;
const FUEL_C: f64 = 4.72e-4;
const MIN_SPEED_KMH: f64 = 5.0;
const MIN_FUEL_CONSUMPTION: f64 = 0.01;

/// Fuel consumption in L/km at the given speed (clamped from below to
/// `MIN_SPEED_KMH` to avoid the `b/v` term blowing up near a stop).
pub fn fuel_consumption(speed_kmh: f64) -> f64 {
    let v = speed_kmh.max(MIN_SPEED_KMH);
    let fc = FUEL_A + FUEL_B / v + FUEL_C * v * v;
    fc.max(MIN_FUEL_CONSUMPTION)
}

/// Emission factor in g CO₂/km for `fuel` at `speed_kmh`.
pub fn emission_factor(speed_kmh: f64, fuel: FuelType) -> f64 {
    fuel_consumption(speed_kmh) * fuel.co2_per_liter()
}

/// One leg of a ride: distance travelled and the average speed over it.
#[derive(Copy, Clone, Debug)]
pub struct RideSegment {
    pub distance_km: f64,
    pub avg_speed_kmh: f64,
}

/// Total CO₂ in grams for a ride made of the given segments.
pub fn ride_emissions_g(segments: &[RideSegment], fuel: FuelType) -> f64 {
    segments
        .iter()
        .map(|s| s.distance_km * emission_factor(s.avg_speed_kmh, fuel))
        .sum()
}

/// Carpool CO₂ savings summary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CarpoolSavings {
    pub co2_saved_g: f64,
    pub percentage_saved: f64,
    pub individual_total_g: f64,
    pub shared_total_g: f64,
}

/// `CO₂_saved = Σᵢ dᵢ·EF(vᵢ) − d_shared·EF(v_shared)`; percentage floors at 0.
pub fn carpool_savings(
    individual_trips: &[RideSegment],
    shared_trip: RideSegment,
    fuel: FuelType,
) -> CarpoolSavings {
    let individual_total_g: f64 = individual_trips
        .iter()
        .map(|t| t.distance_km * emission_factor(t.avg_speed_kmh, fuel))
        .sum();
    let shared_total_g = shared_trip.distance_km * emission_factor(shared_trip.avg_speed_kmh, fuel);

    let co2_saved = individual_total_g - shared_total_g;
    let percentage_saved = if individual_total_g > 0.0 {
        (co2_saved / individual_total_g * 100.0).max(0.0)
    } else {
        0.0
    };

    CarpoolSavings {
        co2_saved_g: co2_saved.max(0.0),
        percentage_saved,
        individual_total_g,
        shared_total_g,
    }
}

/// Convert grams of CO₂ into equivalent tree-days (a mature tree absorbs
/// ~22 kg/year ≈ 60.3 g/day).
pub fn co2_to_tree_days(co2_g: f64) -> f64 {
    const TREE_ABSORPTION_PER_DAY_G: f64 = 22_000.0 / 365.0;
    co2_g / TREE_ABSORPTION_PER_DAY_G
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_consumption_floors_at_minimum() {
        assert!((fuel_consumption(0.0) - fuel_consumption(MIN_SPEED_KMH)).abs() < 1e-12);
        assert!(fuel_consumption(1000.0) >= MIN_FUEL_CONSUMPTION);
    }

    #[test]
    fn electric_has_zero_emissions() {
        assert_eq!(emission_factor(60.0, FuelType::Electric), 0.0);
    }

    #[test]
    fn diesel_emits_more_per_liter_than_petrol() {
        assert!(emission_factor(50.0, FuelType::Diesel) > emission_factor(50.0, FuelType::Petrol));
    }

    #[test]
    fn carpool_savings_never_negative() {
        let individual = vec![
            RideSegment { distance_km: 5.0, avg_speed_kmh: 30.0 },
            RideSegment { distance_km: 5.0, avg_speed_kmh: 30.0 },
        ];
        // Shared trip much longer than either individual trip alone — no savings.
        let shared = RideSegment { distance_km: 50.0, avg_speed_kmh: 10.0 };
        let savings = carpool_savings(&individual, shared, FuelType::Petrol);
        assert_eq!(savings.co2_saved_g, 0.0);
        assert_eq!(savings.percentage_saved, 0.0);
    }

    #[test]
    fn tree_days_conversion() {
        let days = co2_to_tree_days(22_000.0);
        assert!((days - 365.0).abs() < 1e-6);
    }
}
