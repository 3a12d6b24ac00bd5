//! Combustion model: ignition, fire spread, fuel consumption, smoke
//!
//! The combustion steps couple the temperature and fuel fields on top of
//! the fluid solve. A cell burns while it holds more than
//! `min_fuel_threshold` fuel and sits at or above `ignition_temperature`;
//! burning drives temperature toward `fuel_burn_temperature`, consumes fuel
//! at a fixed rate, and emits smoke.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField};

/// Heat release in cells that are already hot enough to burn.
pub struct Ignition {
    ignition_temperature: f32,
    fuel_burn_temperature: f32,
    min_fuel_threshold: f32,
    heat_rate: f32,
}

impl Ignition {
    #[must_use]
    pub fn new(
        ignition_temperature: f32,
        fuel_burn_temperature: f32,
        min_fuel_threshold: f32,
        heat_rate: f32,
    ) -> Self {
        Self {
            ignition_temperature,
            fuel_burn_temperature,
            min_fuel_threshold,
            heat_rate,
        }
    }
}

impl SimulationStep for Ignition {
    fn name(&self) -> &'static str {
        "ignition"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let ignition = self.ignition_temperature;
        let burn = self.fuel_burn_temperature;
        let min_fuel = self.min_fuel_threshold;
        let blend = (self.heat_rate * dt).min(1.0);

        fields.update_scalar(ScalarField::Temperature, |fields, dst| {
            let temperature = fields.scalar(ScalarField::Temperature);
            let fuel = fields.scalar(ScalarField::Fuel);
            kernel::run(dst, |x, y| {
                let t = temperature.get(x, y);
                if fuel.get(x, y) > min_fuel && t >= ignition {
                    t + (burn - t) * blend
                } else {
                    t
                }
            });
        });
    }
}

/// Neighbor-to-neighbor fire propagation through contiguous fuel.
///
/// Each pass ignites fueled cells adjacent to a burning cell, so the
/// per-tick iteration count bounds how many cells fire can cross per tick.
pub struct SpreadFire {
    iterations: usize,
    ignition_temperature: f32,
    fuel_burn_temperature: f32,
    min_fuel_threshold: f32,
    heat_rate: f32,
}

impl SpreadFire {
    #[must_use]
    pub fn new(
        iterations: usize,
        ignition_temperature: f32,
        fuel_burn_temperature: f32,
        min_fuel_threshold: f32,
        heat_rate: f32,
    ) -> Self {
        Self {
            iterations,
            ignition_temperature,
            fuel_burn_temperature,
            min_fuel_threshold,
            heat_rate,
        }
    }
}

impl SimulationStep for SpreadFire {
    fn name(&self) -> &'static str {
        "spread-fire"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let ignition = self.ignition_temperature;
        let burn = self.fuel_burn_temperature;
        let min_fuel = self.min_fuel_threshold;
        let blend = (self.heat_rate * dt).min(1.0);

        for _ in 0..self.iterations {
            fields.update_scalar(ScalarField::Temperature, |fields, dst| {
                let temperature = fields.scalar(ScalarField::Temperature);
                let fuel = fields.scalar(ScalarField::Fuel);
                kernel::run(dst, |x, y| {
                    let t = temperature.get(x, y);
                    if fuel.get(x, y) <= min_fuel {
                        return t;
                    }
                    let (xi, yi) = (x as i64, y as i64);
                    let neighbor_burning = temperature.get_clamped(xi - 1, yi) >= ignition
                        || temperature.get_clamped(xi + 1, yi) >= ignition
                        || temperature.get_clamped(xi, yi - 1) >= ignition
                        || temperature.get_clamped(xi, yi + 1) >= ignition;
                    if neighbor_burning {
                        t + (burn - t) * blend
                    } else {
                        t
                    }
                });
            });
        }
    }
}

/// Fuel consumption wherever the cell is at or above ignition temperature.
///
/// Fuel is floored at zero, so once ignited a cell's fuel is strictly
/// non-increasing unless something injects more.
pub struct ConsumeFuel {
    ignition_temperature: f32,
    fuel_consumption_rate: f32,
}

impl ConsumeFuel {
    #[must_use]
    pub fn new(ignition_temperature: f32, fuel_consumption_rate: f32) -> Self {
        Self {
            ignition_temperature,
            fuel_consumption_rate,
        }
    }
}

impl SimulationStep for ConsumeFuel {
    fn name(&self) -> &'static str {
        "consume-fuel"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let ignition = self.ignition_temperature;
        let burned = self.fuel_consumption_rate * dt;

        fields.update_scalar(ScalarField::Fuel, |fields, dst| {
            let fuel = fields.scalar(ScalarField::Fuel);
            let temperature = fields.scalar(ScalarField::Temperature);
            kernel::run(dst, |x, y| {
                let f = fuel.get(x, y);
                if temperature.get(x, y) >= ignition {
                    (f - burned).max(0.0)
                } else {
                    f
                }
            });
        });
    }
}

/// Smoke emission from burning cells.
pub struct AddSmoke {
    smoke_emission_rate: f32,
    min_fuel_threshold: f32,
    ignition_temperature: f32,
}

impl AddSmoke {
    #[must_use]
    pub fn new(
        smoke_emission_rate: f32,
        min_fuel_threshold: f32,
        ignition_temperature: f32,
    ) -> Self {
        Self {
            smoke_emission_rate,
            min_fuel_threshold,
            ignition_temperature,
        }
    }
}

impl SimulationStep for AddSmoke {
    fn name(&self) -> &'static str {
        "add-smoke"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let emitted = self.smoke_emission_rate * dt;
        let min_fuel = self.min_fuel_threshold;
        let ignition = self.ignition_temperature;

        fields.update_scalar(ScalarField::Smoke, |fields, dst| {
            let smoke = fields.scalar(ScalarField::Smoke);
            let fuel = fields.scalar(ScalarField::Fuel);
            let temperature = fields.scalar(ScalarField::Temperature);
            kernel::run(dst, |x, y| {
                let s = smoke.get(x, y);
                if temperature.get(x, y) >= ignition && fuel.get(x, y) > min_fuel {
                    s + emitted
                } else {
                    s
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn seed(store: &mut FieldStore, fuel: f32, temperature: f32) {
        store.update_scalar(ScalarField::Fuel, |_, dst| dst.set(4, 4, fuel));
        store.update_scalar(ScalarField::Temperature, |_, dst| {
            dst.set(4, 4, temperature);
        });
    }

    #[test]
    fn test_ignition_heats_fueled_hot_cell() {
        let mut store = FieldStore::new(8);
        seed(&mut store, 1.0, 0.5);

        Ignition::new(0.3, 20.0, 0.01, 10.0).execute(&mut store, DT);

        let t = store.scalar(ScalarField::Temperature).get(4, 4);
        assert!(t > 0.5, "Burning cell should heat up (got {t})");
        assert!(t < 20.0, "One tick must not reach burn temperature");
    }

    #[test]
    fn test_ignition_skips_cold_and_fuelless_cells() {
        let mut store = FieldStore::new(8);
        seed(&mut store, 1.0, 0.1); // below ignition temperature
        store.scalar_mut(ScalarField::Temperature).set(2, 2, 5.0);
        // (2,2) is hot but has no fuel.

        Ignition::new(0.3, 20.0, 0.01, 10.0).execute(&mut store, DT);

        assert_eq!(store.scalar(ScalarField::Temperature).get(4, 4), 0.1);
        assert_eq!(store.scalar(ScalarField::Temperature).get(2, 2), 5.0);
    }

    #[test]
    fn test_spread_fire_ignites_fueled_neighbor() {
        let mut store = FieldStore::new(8);
        store.update_scalar(ScalarField::Fuel, |_, dst| dst.fill(1.0));
        store.update_scalar(ScalarField::Temperature, |_, dst| dst.set(4, 4, 1.0));

        SpreadFire::new(1, 0.3, 20.0, 0.01, 10.0).execute(&mut store, DT);

        let t = store.scalar(ScalarField::Temperature).get(5, 4);
        assert!(t > 0.3, "Neighbor of a burning cell should ignite (got {t})");
        let far = store.scalar(ScalarField::Temperature).get(1, 1);
        assert_eq!(far, 0.0, "Cells away from fire stay cold");
    }

    #[test]
    fn test_spread_fire_needs_fuel() {
        let mut store = FieldStore::new(8);
        store.update_scalar(ScalarField::Temperature, |_, dst| dst.set(4, 4, 1.0));

        SpreadFire::new(3, 0.3, 20.0, 0.01, 10.0).execute(&mut store, DT);

        assert_eq!(store.scalar(ScalarField::Temperature).get(5, 4), 0.0);
    }

    #[test]
    fn test_spread_fire_iterations_bound_distance() {
        let run = |iterations| {
            let mut store = FieldStore::new(16);
            store.update_scalar(ScalarField::Fuel, |_, dst| dst.fill(1.0));
            store.update_scalar(ScalarField::Temperature, |_, dst| dst.set(8, 8, 1.0));
            SpreadFire::new(iterations, 0.3, 20.0, 0.01, 60.0).execute(&mut store, DT);
            store.scalar(ScalarField::Temperature).get(11, 8)
        };

        // With a blend factor of 1, fire crosses exactly one cell per pass,
        // so two passes cannot reach a cell three columns out.
        assert_eq!(run(2), 0.0, "Fire cannot outrun its iteration count");
        assert!(run(3) > 0.3, "Three passes reach three cells out");
    }

    #[test]
    fn test_consume_fuel_floors_at_zero() {
        let mut store = FieldStore::new(8);
        seed(&mut store, 0.2, 1.0);

        // 32 fuel per second burns 0.2 away within a tick.
        ConsumeFuel::new(0.3, 32.0).execute(&mut store, DT);
        let f = store.scalar(ScalarField::Fuel).get(4, 4);
        assert!(f < 0.2, "Fuel should burn down (got {f})");

        ConsumeFuel::new(0.3, 32.0).execute(&mut store, DT);
        assert_eq!(store.scalar(ScalarField::Fuel).get(4, 4), 0.0);
    }

    #[test]
    fn test_consume_fuel_leaves_cold_cells() {
        let mut store = FieldStore::new(8);
        seed(&mut store, 1.0, 0.1);

        ConsumeFuel::new(0.3, 32.0).execute(&mut store, DT);
        assert_eq!(store.scalar(ScalarField::Fuel).get(4, 4), 1.0);
    }

    #[test]
    fn test_smoke_emitted_only_while_burning() {
        let mut store = FieldStore::new(8);
        seed(&mut store, 1.0, 1.0);

        AddSmoke::new(256.0, 0.01, 0.3).execute(&mut store, DT);

        let smoke = store.scalar(ScalarField::Smoke);
        assert!(smoke.get(4, 4) > 0.0);
        assert_eq!(smoke.get(3, 3), 0.0);
    }
}
