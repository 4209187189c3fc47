//! Collision detection for circles and axis-aligned rectangles
//!
//! Everything here works on integer pixel coordinates and squared distances,
//! so boolean tests never need a square root.

use glam::IVec2;

/// Check collision between a circle and an axis-aligned rectangle
///
/// `rect_pos` is the rectangle's top-left corner. Half extents use integer
/// division, matching the obstacle centre used everywhere else.
pub fn circle_rect_collision(center: IVec2, radius: i32, rect_pos: IVec2, rect_size: IVec2) -> bool {
    let half = rect_size / 2;
    let dist = (center - (rect_pos + half)).abs();

    // Too far along either axis
    if dist.x > half.x + radius || dist.y > half.y + radius {
        return false;
    }

    // Inside the band spanned by one of the sides
    if dist.x <= half.x || dist.y <= half.y {
        return true;
    }

    // Corner region
    let corner = dist - half;
    corner.length_squared() <= radius * radius
}

/// Check collision between two circles
#[inline]
pub fn circle_circle_collision(a: IVec2, radius_a: i32, b: IVec2, radius_b: i32) -> bool {
    let reach = radius_a + radius_b;
    (a - b).length_squared() <= reach * reach
}

/// Check whether a bullet circle touches a rectangle
///
/// The rectangle is inflated by the bullet radius on every side and the
/// bullet centre tested against it. This is slightly generous at the corners
/// compared to [`circle_rect_collision`].
pub fn bullet_rect_collision(bullet: IVec2, radius: i32, rect_pos: IVec2, rect_size: IVec2) -> bool {
    let half = rect_size / 2;
    let dist = (bullet - (rect_pos + half)).abs();
    dist.x <= half.x + radius && dist.y <= half.y + radius
}
