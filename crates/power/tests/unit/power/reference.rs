//! # Reference Oracle Tests
//!
//! Scaling behaviour of the coefficient-table model. The absolute figures are
//! coefficient choices; these tests pin how they move with voltage,
//! temperature, device flavour and activity.

use cachepower_core::common::{PowerError, Voltage};
use cachepower_core::config::{DeviceType, ReferenceModelConfig};
use cachepower_core::dvfs::OperatingPoint;
use cachepower_core::geometry::CacheGeometry;
use cachepower_core::power::{
    CacheEnergyModel, CacheModelParams, ModelOutput, PowerModelFactory, ReferenceModel,
    ReferenceModelFactory,
};
use cachepower_core::stats::AccessCounters;

use crate::common::harness::assert_close;
use crate::common::reference_geometry;

fn evaluate(geometry: &CacheGeometry, volts: f64, activity: &AccessCounters) -> ModelOutput {
    let params = CacheModelParams::new(geometry, OperatingPoint::from_registry(volts, 1.0));
    ReferenceModelFactory::default()
        .build(&params)
        .unwrap()
        .compute(activity)
        .unwrap()
}

fn busy() -> AccessCounters {
    AccessCounters {
        read_accesses: 1_000,
        write_accesses: 200,
        read_misses: 50,
        write_misses: 10,
        tag_array_reads: 1_200,
        tag_array_writes: 60,
        data_array_reads: 1_000,
        data_array_writes: 260,
    }
}

#[test]
fn test_idle_activity_has_no_dynamic_energy() {
    let out = evaluate(&reference_geometry(), 1.0, &AccessCounters::default());
    assert_eq!(out.dynamic_energy.val(), 0.0);
    assert!(out.area.0 > 0.0);
    assert!(out.subthreshold_leakage.val() > 0.0);
    assert!(out.gate_leakage.val() > 0.0);
}

#[test]
fn test_deterministic() {
    let g = reference_geometry();
    assert_eq!(evaluate(&g, 0.8, &busy()), evaluate(&g, 0.8, &busy()));
}

#[test]
fn test_area_independent_of_operating_point() {
    let g = reference_geometry();
    let idle = AccessCounters::default();
    assert_eq!(evaluate(&g, 0.8, &idle).area, evaluate(&g, 1.0, &idle).area);
}

#[test]
fn test_leakage_scales_with_voltage() {
    let g = reference_geometry();
    let idle = AccessCounters::default();
    let low = evaluate(&g, 0.8, &idle);
    let high = evaluate(&g, 1.0, &idle);
    assert_close(low.subthreshold_leakage.val() / high.subthreshold_leakage.val(), 0.8);
    assert_close(low.gate_leakage.val() / high.gate_leakage.val(), 0.8);
}

#[test]
fn test_dynamic_energy_scales_with_voltage_squared() {
    let g = reference_geometry();
    let low = evaluate(&g, 0.8, &busy());
    let high = evaluate(&g, 1.0, &busy());
    assert_close(low.dynamic_energy.val() / high.dynamic_energy.val(), 0.64);
}

#[test]
fn test_dynamic_energy_linear_in_activity() {
    let g = reference_geometry();
    let once = busy();
    let twice = AccessCounters {
        read_accesses: 2 * once.read_accesses,
        write_accesses: 2 * once.write_accesses,
        read_misses: 2 * once.read_misses,
        write_misses: 2 * once.write_misses,
        tag_array_reads: 2 * once.tag_array_reads,
        tag_array_writes: 2 * once.tag_array_writes,
        data_array_reads: 2 * once.data_array_reads,
        data_array_writes: 2 * once.data_array_writes,
    };
    assert_close(
        evaluate(&g, 1.0, &twice).dynamic_energy.val(),
        2.0 * evaluate(&g, 1.0, &once).dynamic_energy.val(),
    );
}

#[test]
fn test_long_channel_variant_uses_factor() {
    let out = evaluate(&reference_geometry(), 1.0, &AccessCounters::default());
    assert_close(
        out.longer_channel_leakage.val(),
        0.75 * out.subthreshold_leakage.val(),
    );
}

#[test]
fn test_leakage_doubles_per_doubling_interval() {
    let mut warm = reference_geometry();
    let mut hot = reference_geometry();
    warm.temperature_k = 300;
    hot.temperature_k = 325;
    let idle = AccessCounters::default();
    assert_close(
        evaluate(&hot, 1.0, &idle).subthreshold_leakage.val(),
        2.0 * evaluate(&warm, 1.0, &idle).subthreshold_leakage.val(),
    );
}

#[test]
fn test_low_standby_devices_leak_less() {
    let hp = reference_geometry();
    let mut lstp = reference_geometry();
    lstp.device_type = DeviceType::LowStandbyPower;
    let idle = AccessCounters::default();
    assert_close(
        evaluate(&lstp, 1.0, &idle).subthreshold_leakage.val(),
        0.05 * evaluate(&hp, 1.0, &idle).subthreshold_leakage.val(),
    );
}

#[test]
fn test_extra_banks_add_area() {
    let one = reference_geometry();
    let mut four = reference_geometry();
    four.banks = 4;
    let idle = AccessCounters::default();
    assert!(evaluate(&four, 1.0, &idle).area.0 > evaluate(&one, 1.0, &idle).area.0);
}

#[test]
fn test_rejects_non_positive_voltage() {
    let mut params =
        CacheModelParams::new(&reference_geometry(), OperatingPoint::from_registry(1.0, 1.0));
    params.vdd = Voltage(0.0);
    let err = ReferenceModel::new(&ReferenceModelConfig::default(), &params).unwrap_err();
    assert!(matches!(err, PowerError::InvalidParameters(_)));
}

#[test]
fn test_rejects_zero_clock() {
    let mut params =
        CacheModelParams::new(&reference_geometry(), OperatingPoint::from_registry(1.0, 1.0));
    params.clock_mhz = 0.0;
    assert!(ReferenceModelFactory::default().build(&params).is_err());
}

#[test]
fn test_rejects_zero_temperature() {
    let mut geometry = reference_geometry();
    geometry.temperature_k = 0;
    let params = CacheModelParams::new(&geometry, OperatingPoint::from_registry(1.0, 1.0));
    assert!(ReferenceModelFactory::default().build(&params).is_err());
}

#[test]
fn test_custom_coefficients_are_used() {
    let coefficients = ReferenceModelConfig {
        gate_na_per_bit: 0.0,
        ..ReferenceModelConfig::default()
    };
    let factory = ReferenceModelFactory::new(coefficients);
    assert_eq!(factory.coefficients().gate_na_per_bit, 0.0);

    let params =
        CacheModelParams::new(&reference_geometry(), OperatingPoint::from_registry(1.0, 1.0));
    let out = factory
        .build(&params)
        .unwrap()
        .compute(&AccessCounters::default())
        .unwrap();
    assert_eq!(out.gate_leakage.val(), 0.0);
}
