use std::f64::consts::TAU;

use crate::{config, types::Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BladeSegment {
    pub index: u32,
    pub from: Vec2,
    pub to: Vec2,
    pub marked: bool,
}

/// Hub position and blade length for a surface of the given size.
pub fn fan_layout(width: f64, height: f64) -> (Vec2, f64) {
    let center = Vec2::new((width / 2.0).floor(), (height / 2.0).floor());
    let radius = width.min(height) * config::RADIUS_FRACTION;
    (center, radius)
}

/// Tip of blade `index` when the rotor sits at `angle`.
pub fn blade_endpoint(center: Vec2, radius: f64, angle: f64, index: u32, blade_count: u32) -> Vec2 {
    let offset = TAU * index as f64 / blade_count as f64;
    center + Vec2::from_angle(offset + angle) * radius
}

pub fn blade_segments(
    center: Vec2,
    radius: f64,
    blade_count: u32,
    angle: f64,
    mark_first: bool,
) -> Vec<BladeSegment> {
    (0..blade_count)
        .map(|index| BladeSegment {
            index,
            from: center,
            to: blade_endpoint(center, radius, angle, index, blade_count),
            marked: mark_first && index == 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-9
    }

    mod fan_layout_fn {
        use super::*;

        #[test]
        fn centers_on_floored_midpoint() {
            let (center, radius) = fan_layout(101.0, 60.0);
            assert_eq!(center, Vec2::new(50.0, 30.0));
            assert_eq!(radius, 24.0);
        }

        #[test]
        fn empty_surface_has_zero_radius() {
            let (center, radius) = fan_layout(0.0, 0.0);
            assert_eq!(center, Vec2::ZERO);
            assert_eq!(radius, 0.0);
        }
    }

    mod blade_endpoint_fn {
        use super::*;

        #[test]
        fn first_blade_follows_rotor_angle() {
            let tip = blade_endpoint(Vec2::ZERO, 10.0, std::f64::consts::FRAC_PI_2, 0, 3);
            assert!(close(tip, Vec2::new(0.0, 10.0)));
        }

        #[test]
        fn blades_are_evenly_spaced() {
            let center = Vec2::new(5.0, 5.0);
            let tip = blade_endpoint(center, 2.0, 0.0, 2, 4);
            assert!(close(tip, Vec2::new(3.0, 5.0)));
        }

        #[test]
        fn full_turn_is_periodic() {
            let a = blade_endpoint(Vec2::ZERO, 1.0, 0.3, 1, 5);
            let b = blade_endpoint(Vec2::ZERO, 1.0, 0.3 + TAU * 40.0, 1, 5);
            assert!(close(a, b));
        }
    }

    mod blade_segments_fn {
        use super::*;

        #[test]
        fn produces_one_segment_per_blade_from_center() {
            let center = Vec2::new(40.0, 20.0);
            let segments = blade_segments(center, 8.0, 4, 1.25, false);
            assert_eq!(segments.len(), 4);
            for (k, seg) in segments.iter().enumerate() {
                assert_eq!(seg.index, k as u32);
                assert_eq!(seg.from, center);
                assert!(((seg.to - seg.from).length() - 8.0).abs() < 1e-9);
                assert!(!seg.marked);
            }
        }

        #[test]
        fn only_first_blade_is_marked() {
            let segments = blade_segments(Vec2::ZERO, 1.0, 3, 0.0, true);
            let marked: Vec<bool> = segments.iter().map(|s| s.marked).collect();
            assert_eq!(marked, vec![true, false, false]);
        }

        #[test]
        fn zero_blades_yields_nothing() {
            assert!(blade_segments(Vec2::ZERO, 1.0, 0, 0.0, true).is_empty());
        }
    }
}
