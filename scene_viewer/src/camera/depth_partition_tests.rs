use super::*;

fn partition() -> DepthPartition {
    DepthPartition::new(0.05).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_invalid_splits_rejected() {
    assert!(DepthPartition::new(0.0).is_err());
    assert!(DepthPartition::new(1.0).is_err());
    assert!(DepthPartition::new(-0.5).is_err());
    assert!(DepthPartition::new(f32::NAN).is_err());
}

// ============================================================================
// Disjoint + covering
// ============================================================================

#[test]
fn test_ranges_cover_full_domain() {
    let p = partition();
    assert_eq!(p.skybox().min, 0.0);
    assert_eq!(p.foreground().max, 1.0);
    // Adjacent representable values: no f32 lies strictly between them
    assert_eq!(f32::from_bits(p.skybox().max.to_bits() + 1), p.foreground().min);
}

#[test]
fn test_ranges_are_disjoint() {
    let p = partition();
    assert!(p.skybox().max < p.foreground().min);
    assert!(!p.foreground().contains(p.skybox().max));
    assert!(!p.skybox().contains(p.foreground().min));
}

// ============================================================================
// No skybox/foreground depth tie under any depth
// ============================================================================

#[test]
fn test_skybox_depth_always_below_foreground_depth() {
    for split in [0.001_f32, 0.05, 0.3, 0.5, 0.999] {
        let p = DepthPartition::new(split).unwrap();
        let samples: Vec<f32> = (0..=256).map(|i| i as f32 / 256.0)
            .chain([f32::MIN_POSITIVE, 1.0 - f32::EPSILON, 0.5 + f32::EPSILON])
            .collect();

        let sky_max = samples.iter().map(|&d| p.skybox().map(d)).fold(f32::MIN, f32::max);
        let fg_min = samples.iter().map(|&d| p.foreground().map(d)).fold(f32::MAX, f32::min);

        assert!(sky_max < fg_min, "split {}: skybox {} vs foreground {}", split, sky_max, fg_min);
    }
}

#[test]
fn test_map_stays_inside_range() {
    let p = partition();
    for i in 0..=100 {
        let d = i as f32 / 100.0;
        assert!(p.skybox().contains(p.skybox().map(d)));
        assert!(p.foreground().contains(p.foreground().map(d)));
    }
    // Out-of-domain inputs are clamped
    assert_eq!(p.foreground().map(2.0), 1.0);
    assert_eq!(p.skybox().map(-1.0), 0.0);
}
