use crate::types::Stats;

/// Min, max, mean and sample standard deviation (n - 1 divisor).
///
/// An empty series yields all zeros and a single value yields that value with
/// a standard deviation of 0.
pub fn min_max_mean_std(values: &[f64]) -> (f64, f64, f64, f64) {
    match values {
        [] => (0.0, 0.0, 0.0, 0.0),
        [v] => (*v, *v, *v, 0.0),
        _ => {
            let mut min = values[0];
            let mut max = values[0];
            let mut sum = 0.0;
            for &v in values {
                if v < min { min = v; }
                if v > max { max = v; }
                sum += v;
            }
            let mean = sum / values.len() as f64;
            (min, max, mean, sample_variance_around(values, mean).sqrt())
        }
    }
}

// 0 for fewer than two values
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    sample_variance_around(values, mean)
}

fn sample_variance_around(values: &[f64], mean: f64) -> f64 {
    let sq_diff_sum: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    sq_diff_sum / (values.len() as f64 - 1.0)
}

impl Stats {
    pub fn from_values(values: &[f64]) -> Self {
        let (min, max, mean, std) = min_max_mean_std(values);
        Self { min, max, mean, std }
    }
}
