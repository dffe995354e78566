use crate::models::{HmpiResult, HmpiStatus, Metal, Parameter, SampleRow};
use crate::utils::constants::{HMPI_BAD_MAX, HMPI_GOOD_MAX};

/// Regulatory limit per metal, in the same unit as the sample columns.
pub static HMPI_LIMITS: &[(Metal, f64)] = &[
    (Metal::Pb, 10.0),
    (Metal::Cd, 3.0),
    (Metal::Cr, 50.0),
    (Metal::Ni, 70.0),
    (Metal::As, 10.0),
    (Metal::Fe, 300.0),
    (Metal::Mn, 100.0),
    (Metal::Cu, 2000.0),
    (Metal::Zn, 3000.0),
    (Metal::Hg, 1.0),
    (Metal::Se, 10.0),
    (Metal::U, 30.0),
];

/// Score a sample: the mean of `value / limit` over parsed metals, as a
/// percentage rounded to two decimals.
pub fn score(sample: &SampleRow) -> HmpiResult {
    let mut ratio_sum = 0.0;
    let mut counted = 0u32;

    for (metal, limit) in HMPI_LIMITS {
        if let Some(value) = sample.reading(Parameter::Metal(*metal)) {
            ratio_sum += value / limit;
            counted += 1;
        }
    }

    if counted == 0 {
        return HmpiResult {
            value: 0.0,
            status: HmpiStatus::Good,
        };
    }

    let value = round2(ratio_sum / f64::from(counted) * 100.0);

    HmpiResult {
        value,
        status: classify(value),
    }
}

/// Bands are upper-inclusive: exactly 25 is Good and exactly 75 is Bad.
pub fn classify(index: f64) -> HmpiStatus {
    if index > HMPI_BAD_MAX {
        HmpiStatus::Critical
    } else if index > HMPI_GOOD_MAX {
        HmpiStatus::Bad
    } else {
        HmpiStatus::Good
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
