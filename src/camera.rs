use bevy::prelude::*;

use crate::constants::*;

/// Top‑left corner of the visible screen in world units (y down).
/// Owned by the simulation loop and moved by the player tick.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct Scroll {
    pub offset: Vec2,
}

impl Scroll {
    /// Dead‑zone follow: the view only moves once `pos` leaves the band
    /// between the two scroll borders, and never shows past the world edge.
    pub fn follow(&mut self, pos: Vec2, world_size: Vec2) {
        let screen = Vec2::new(SCREEN_W, SCREEN_H);
        let border = Vec2::new(SCROLL_BORDER_X, SCROLL_BORDER_Y);
        let max = (world_size - screen).max(Vec2::ZERO);

        for axis in 0..2 {
            if pos[axis] > self.offset[axis] + border[axis] {
                self.offset[axis] = (pos[axis] - border[axis]).min(max[axis]);
            }
            if pos[axis] < self.offset[axis] + (screen[axis] - border[axis]) {
                self.offset[axis] = (pos[axis] - (screen[axis] - border[axis])).max(0.0);
            }
        }
    }
}

/// pixel snapping helper – keeps the camera on whole pixels so sprites never
/// land on half‑pixels and shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale: 1.0 / WINDOW_SCALE,
            ..OrthographicProjection::default_2d()
        },
    ));
}

/// centre the camera on the scrolled screen
///
/// NOTE: runs in **PostUpdate**, after the player tick moved the scroll.
pub fn camera_follow_system(
    scroll: Res<Scroll>,
    mut cam_q: Query<&mut Transform, With<Camera>>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    cam_tf.translation.x = snap(scroll.offset.x + SCREEN_W * 0.5);
    cam_tf.translation.y = snap(-(scroll.offset.y + SCREEN_H * 0.5));
}
