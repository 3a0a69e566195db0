//! Per-method record construction.

use super::sampling::{ColumnKind, ColumnModel, lerp, numeric_scalar, sample_normal};
use crate::record::{Dataset, Record, Scalar};
use rand::Rng;
use rand::seq::SliceRandom;

/// Relative jitter applied to numeric fields by the pattern method.
const PATTERN_JITTER: f64 = 0.1;

/// Sample every column independently from its fitted distribution.
///
/// `noise` is the half-width of the uniform noise, as a fraction of the
/// column's standard deviation. `None` disables noise.
pub(crate) fn statistical_record<R: Rng + ?Sized>(
    models: &[ColumnModel],
    preserve_distribution: bool,
    noise: Option<f64>,
    index: usize,
    rng: &mut R,
) -> Record {
    let mut record = Record::with_capacity(models.len());

    for model in models {
        if preserve_distribution
            && model.missing_ratio > 0.0
            && rng.r#gen::<f64>() < model.missing_ratio
        {
            record.insert(model.name.clone(), Scalar::Null);
            continue;
        }

        let value = match &model.kind {
            ColumnKind::Numeric { stats, integer } => {
                // an overflowing spread leaves std_dev infinite
                let spread_is_finite = stats.std_dev.is_finite();
                let mut v = if preserve_distribution && spread_is_finite {
                    sample_normal(rng, stats.mean, stats.std_dev)
                } else if stats.max > stats.min {
                    lerp(stats.min, stats.max, rng.r#gen())
                } else {
                    stats.min
                };
                v = v.clamp(stats.min, stats.max);

                if let Some(factor) = noise
                    && spread_is_finite
                    && stats.std_dev > 0.0
                {
                    let noisy = v + rng.gen_range(-factor..=factor) * stats.std_dev;
                    if noisy.is_finite() {
                        v = noisy;
                    }
                }
                numeric_scalar(v, *integer)
            }
            ColumnKind::Categorical { values, .. } => match values.choose(rng) {
                Some(v) => Scalar::String(v.clone()),
                None => Scalar::String(format!("Synthetic_{}", index + 1)),
            },
        };
        record.insert(model.name.clone(), value);
    }

    record
}

/// Copy a random source record, jittering numbers and varying free text.
pub(crate) fn pattern_record<R: Rng + ?Sized>(
    dataset: &Dataset,
    models: &[ColumnModel],
    index: usize,
    rng: &mut R,
) -> Record {
    let Some(template) = dataset.records().choose(rng) else {
        return Record::new();
    };
    let mut record = Record::with_capacity(models.len());

    for model in models {
        let source = template.get(&model.name);
        if source.is_missing() {
            record.insert(model.name.clone(), Scalar::Null);
            continue;
        }

        let value = match (&model.kind, source.as_f64()) {
            (ColumnKind::Numeric { integer, .. }, Some(v)) => {
                let factor = 1.0 + rng.gen_range(-PATTERN_JITTER..=PATTERN_JITTER);
                let jittered = v * factor;
                numeric_scalar(if jittered.is_finite() { jittered } else { v }, *integer)
            }
            _ if model.is_free_text() => vary_text(source.to_text().trim(), index, rng),
            _ => source.clone(),
        };
        record.insert(model.name.clone(), value);
    }

    record
}

fn vary_text<R: Rng + ?Sized>(text: &str, index: usize, rng: &mut R) -> Scalar {
    match rng.gen_range(0..3) {
        0 => Scalar::String(text.to_string()),
        1 => Scalar::String(format!("{}_{}", text, index + 1)),
        _ => Scalar::String(format!("{} (variant)", text)),
    }
}

/// Blend two random source records with a random weight.
pub(crate) fn interpolation_record<R: Rng + ?Sized>(
    dataset: &Dataset,
    models: &[ColumnModel],
    rng: &mut R,
) -> Record {
    let records = dataset.records();
    let (Some(a), Some(b)) = (records.choose(rng), records.choose(rng)) else {
        return Record::new();
    };
    let weight: f64 = rng.r#gen();
    let mut record = Record::with_capacity(models.len());

    for model in models {
        let (left, right) = (a.get(&model.name), b.get(&model.name));

        let value = match &model.kind {
            ColumnKind::Numeric { integer, .. } => {
                match (present_number(left), present_number(right)) {
                    (Some(x), Some(y)) => numeric_scalar(lerp(x, y, weight), *integer),
                    (Some(_), None) => left.clone(),
                    (None, Some(_)) => right.clone(),
                    (None, None) => Scalar::Null,
                }
            }
            ColumnKind::Categorical { .. } => {
                if rng.r#gen::<f64>() < weight {
                    right.clone()
                } else {
                    left.clone()
                }
            }
        };
        record.insert(model.name.clone(), value);
    }

    record
}

fn present_number(value: &Scalar) -> Option<f64> {
    if value.is_missing() {
        None
    } else {
        value.as_f64()
    }
}
