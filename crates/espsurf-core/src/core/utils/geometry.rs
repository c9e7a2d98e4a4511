use nalgebra::{Point3, Vector3};

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, point| acc + point.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Component-wise bounds of a set of spheres whose radii are multiplied by `scale`.
///
/// Returns `None` for an empty input.
pub fn scaled_sphere_bounds<I>(spheres: I, scale: f64) -> Option<(Point3<f64>, Point3<f64>)>
where
    I: IntoIterator<Item = (Point3<f64>, f64)>,
{
    let mut spheres = spheres.into_iter();
    let (center, radius) = spheres.next()?;
    let pad = Vector3::repeat(radius * scale);
    let (mut lower, mut upper) = (center - pad, center + pad);

    for (center, radius) in spheres {
        let pad = Vector3::repeat(radius * scale);
        lower = lower.inf(&(center - pad));
        upper = upper.sup(&(center + pad));
    }
    Some((lower, upper))
}

#[inline]
pub fn triangle_area(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}

#[inline]
pub fn triangle_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    (b - a).cross(&(c - a))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn centroid_of_empty_slice_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn centroid_is_arithmetic_mean_of_points() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(2.0, 4.0, 8.0),
        ];
        let center = centroid(&points).unwrap();
        assert_eq!(center, Point3::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn scaled_sphere_bounds_of_empty_input_is_none() {
        let spheres: Vec<(Point3<f64>, f64)> = Vec::new();
        assert!(scaled_sphere_bounds(spheres, 1.0).is_none());
    }

    #[test]
    fn scaled_sphere_bounds_pads_each_sphere_by_its_scaled_radius() {
        let spheres = vec![
            (Point3::new(0.0, 0.0, 0.0), 1.0),
            (Point3::new(5.0, -1.0, 2.0), 0.5),
        ];
        let (lower, upper) = scaled_sphere_bounds(spheres, 2.0).unwrap();
        assert_eq!(lower, Point3::new(-2.0, -2.0, -2.0));
        assert_eq!(upper, Point3::new(6.0, 2.0, 3.0));
    }

    #[test]
    fn triangle_area_of_unit_right_triangle_is_one_half() {
        let area = triangle_area(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        );
        assert!(f64_approx_equal(area, 0.5));
    }

    #[test]
    fn triangle_normal_follows_counter_clockwise_winding() {
        let normal = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(normal, Vector3::new(0.0, 0.0, 1.0));
    }
}
