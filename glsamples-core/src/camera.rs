//! Camera and light placement for the samples.

use glam::{Mat4, Vec2, Vec3};

use crate::state::Viewport;

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Distance the spun object is pushed away from the eye.
const OBJECT_DISTANCE: f32 = 4.0;
/// Spin units per radian of orbit in the shadow sample.
const ORBIT_SCALE: f32 = 100.0;

pub fn projection(viewport: Viewport) -> Mat4 {
    Mat4::perspective_rh_gl(FOV_Y_DEGREES.to_radians(), viewport.aspect(), Z_NEAR, Z_FAR)
}

/// Model-view for an object spun by a mouse drag: pushed back, then rotated
/// about X by the vertical spin and about Y by the horizontal spin.
pub fn spin_model_view(spin: Vec2) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -OBJECT_DISTANCE))
        * Mat4::from_rotation_x((-spin.y).to_radians())
        * Mat4::from_rotation_y((-spin.x).to_radians())
}

/// Position of the orbiting light in the shadow sample.
pub fn orbit_light(spin: Vec2) -> Vec3 {
    let angle = spin.x / ORBIT_SCALE;
    Vec3::new(10.0 * angle.cos(), 10.0, 10.0 * angle.sin())
}

/// Position of the orbiting eye in the shadow sample.
pub fn orbit_eye(spin: Vec2) -> Vec3 {
    let angle = -spin.x / ORBIT_SCALE;
    Vec3::new(10.0 * angle.cos(), 5.0, 10.0 * angle.sin())
}

pub fn look_at_origin(eye: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
}

/// Maps world positions into the light's clip space and then into `[0, 1]`
/// texture space, for looking up the shadow map.
pub fn shadow_texture_matrix(light_view: Mat4, viewport: Viewport) -> Mat4 {
    Mat4::from_translation(Vec3::splat(0.5))
        * Mat4::from_scale(Vec3::splat(0.5))
        * projection(viewport)
        * light_view
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn unspun_object_sits_in_front_of_the_eye() {
        let mv = spin_model_view(Vec2::ZERO);
        assert!(close(mv.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -4.0)));
    }

    #[test]
    fn horizontal_spin_rotates_about_y() {
        let mv = spin_model_view(Vec2::new(-90.0, 0.0));
        let p = mv.transform_point3(Vec3::X);
        assert!(close(p, Vec3::new(0.0, 0.0, -5.0)), "{p}");
    }

    #[test]
    fn orbits_start_on_the_x_axis() {
        assert!(close(orbit_light(Vec2::ZERO), Vec3::new(10.0, 10.0, 0.0)));
        assert!(close(orbit_eye(Vec2::ZERO), Vec3::new(10.0, 5.0, 0.0)));

        let quarter = Vec2::new(100.0 * std::f32::consts::FRAC_PI_2, 0.0);
        assert!(close(orbit_light(quarter), Vec3::new(0.0, 10.0, 10.0)));
        assert!(close(orbit_eye(quarter), Vec3::new(0.0, 5.0, -10.0)));
    }

    #[test]
    fn shadow_matrix_maps_the_light_target_to_the_map_centre() {
        let view = look_at_origin(orbit_light(Vec2::new(-75.0, 0.0)));
        let m = shadow_texture_matrix(view, Viewport::default());
        let clip: Vec4 = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let uv = clip.truncate() / clip.w;
        assert!((uv.x - 0.5).abs() < 1e-4);
        assert!((uv.y - 0.5).abs() < 1e-4);
    }
}
