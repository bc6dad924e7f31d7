use glam::Vec3;
use crate::config::CameraConfig;
use crate::math::AABB;
use crate::uniform::ViewConstants;
use bytemuck::Zeroable;
use super::*;

fn create_camera() -> Camera {
    let mut camera = Camera::new(&CameraConfig::default());
    camera.set_viewport_size(1920, 1080).unwrap();
    camera
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn test_look_at_points_forward_at_target() {
    let mut camera = create_camera();
    camera.set_location(Vec3::new(10.0, 0.0, 0.0));

    camera.look_at(Vec3::ZERO);

    assert!((camera.forward() - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn test_look_at_same_point_keeps_orientation() {
    let mut camera = create_camera();
    camera.set_location(Vec3::new(5.0, 5.0, 5.0));
    camera.look_at(Vec3::ZERO);
    let (pitch, yaw) = (camera.pitch(), camera.yaw());
    let view = *camera.view_matrix();

    camera.look_at(Vec3::new(5.0, 5.0, 5.0));

    assert_eq!(camera.pitch(), pitch);
    assert_eq!(camera.yaw(), yaw);
    assert_eq!(*camera.view_matrix(), view);
    assert!(camera.view_matrix().is_finite());
}

#[test]
fn test_look_straight_down_stays_finite() {
    let mut camera = create_camera();
    camera.set_location(Vec3::new(0.0, 0.0, 100.0));

    camera.look_at(Vec3::ZERO);

    assert!(camera.view_matrix().is_finite());
    assert!(camera.frustum().contains_point(Vec3::new(0.0, 0.0, 50.0)));
}

// ============================================================================
// Frustum consistency
// ============================================================================

#[test]
fn test_frustum_follows_view_projection() {
    let mut camera = create_camera();
    camera.set_location(Vec3::new(0.0, -50.0, 0.0));
    camera.look_at(Vec3::ZERO);

    let expected = Frustum::from_view_projection(&camera.view_projection_matrix());
    assert!(camera.frustum().bitwise_eq(&expected));
    assert!(camera.frustum().intersects_aabb(&AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0))));
    assert!(!camera.frustum().intersects_aabb(&AABB::new(
        Vec3::new(-1.0, -200.0, -1.0), Vec3::new(1.0, -100.0, 1.0),
    )));
}

#[test]
fn test_locked_frustum_unchanged_after_move() {
    let mut camera = create_camera();
    camera.set_location(Vec3::new(0.0, -50.0, 0.0));
    camera.look_at(Vec3::ZERO);
    let locked = camera.frustum().locked();
    let before = locked.planes;

    camera.set_location(Vec3::new(300.0, 20.0, -7.0));
    camera.look_at(Vec3::new(0.0, 1000.0, 0.0));
    camera.set_viewport_size(640, 480).unwrap();

    assert!(!camera.frustum().bitwise_eq(&locked));
    for (a, b) in before.iter().zip(locked.planes.iter()) {
        for (x, y) in a.to_array().iter().zip(b.to_array().iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_projection_is_reversed_depth() {
    let camera = create_camera();
    let near = camera.projection_matrix().project_point3(Vec3::new(0.0, 0.0, -1.0));
    let far = camera.projection_matrix().project_point3(Vec3::new(0.0, 0.0, -20000.0));

    assert!((near.z - 1.0).abs() < 1e-4);
    assert!(far.z.abs() < 1e-4);
}

#[test]
fn test_scaled_projection_divides_clip_distances() {
    let mut camera = create_camera();
    camera.set_scaled_projection(16.0);

    let near = camera.projection_matrix().project_point3(Vec3::new(0.0, 0.0, -1.0 / 16.0));
    assert!((near.z - 1.0).abs() < 1e-4);
    assert_eq!(camera.scale(), 16.0);
}

#[test]
fn test_copy_from_copies_pose_not_picker() {
    let mut main = create_camera();
    main.set_location(Vec3::new(1.0, 2.0, 3.0));
    main.look_at(Vec3::new(10.0, 2.0, 3.0));
    let mut sky = Camera::new(&CameraConfig::default());

    sky.copy_from(&main);

    assert_eq!(sky.location(), main.location());
    assert_eq!(sky.viewport_size(), (1920, 1080));
    assert_eq!(*sky.view_matrix(), *main.view_matrix());
    assert_eq!(*sky.projection_matrix(), *main.projection_matrix());
    assert!(sky.picker().is_none());
}

#[test]
fn test_set_view_constants() {
    let mut camera = create_camera();
    camera.set_location(Vec3::new(4.0, 5.0, 6.0));
    let mut constants = ViewConstants::zeroed();

    camera.set_view_constants(&mut constants);

    assert_eq!(constants.world_to_projection, camera.view_projection_matrix());
    assert_eq!(constants.world_to_view, *camera.view_matrix());
    assert_eq!(constants.camera_position.truncate(), Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(constants.viewport_size.x, 1920.0);
    assert_eq!(constants.scale, 1.0);
}
