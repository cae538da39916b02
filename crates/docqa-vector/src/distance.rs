use docqa_core::types::DistanceMetric;

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// `1 - cos(a, b)`. A zero vector is treated as orthogonal to everything.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}

pub fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::SquaredL2 => squared_l2(a, b),
        DistanceMetric::Cosine => cosine_distance(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_l2_on_unit_vectors_matches_cosine() {
        let a = [1.0f32, 0.0];
        let b = [0.0f32, 1.0];
        assert!((squared_l2(&a, &b) - 2.0).abs() < 1e-6);
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-6);
        assert!(squared_l2(&a, &a).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_is_orthogonal() {
        assert!((cosine_distance(&[0.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
