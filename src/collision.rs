//! tile collision for tile‑sized boxes
//!
//! Motion is resolved one unit at a time, the vertical axis first and then
//! the horizontal axis at the already‑moved height. Whatever displacement is
//! left on an axis when the next unit would overlap rock is dropped. This
//! can't tunnel through one‑block walls, but a box blocked vertically will
//! not slide around a corner in the same tick.
use bevy::prelude::*;

use crate::constants::{BOX_EXTENT, TILE_PX};
use crate::terrain::Terrain;

/// solidity lookup; anything outside the grid is open space
#[inline]
pub fn is_solid(terrain: &Terrain, cell: IVec2) -> bool {
    terrain.material(cell).is_solid()
}

/// Inclusive block range covered by a box whose top‑left corner is `pos`.
/// The near edge is floored and the far edge ceiled, so an aligned box
/// covers exactly one block per axis and any overlap adds the neighbour.
#[inline]
pub fn covered_blocks(pos: Vec2) -> (IVec2, IVec2) {
    let min = pos.floor().as_ivec2();
    let max = pos.ceil().as_ivec2() + IVec2::splat(BOX_EXTENT as i32);
    (
        IVec2::new(min.x.div_euclid(TILE_PX), min.y.div_euclid(TILE_PX)),
        IVec2::new(max.x.div_euclid(TILE_PX), max.y.div_euclid(TILE_PX)),
    )
}

pub fn bounding_box_collides(terrain: &Terrain, pos: Vec2) -> bool {
    let (min, max) = covered_blocks(pos);
    (min.y..=max.y).any(|y| (min.x..=max.x).any(|x| is_solid(terrain, IVec2::new(x, y))))
}

/// Moves `pos` by `delta`, stopping each axis at the first blocked unit.
pub fn move_with_collision(terrain: &Terrain, pos: Vec2, delta: Vec2) -> Vec2 {
    let mut p = pos;

    /* ---------- vertical pass ---------- */
    let mut dy = delta.y;
    for _ in 0..dy.abs().ceil() as i32 {
        let step = dy.clamp(-1.0, 1.0);
        if bounding_box_collides(terrain, Vec2::new(p.x, p.y + step)) {
            break;
        }
        p.y += step;
        dy -= step;
    }

    /* ---------- horizontal pass ---------- */
    let mut dx = delta.x;
    for _ in 0..dx.abs().ceil() as i32 {
        let step = dx.clamp(-1.0, 1.0);
        if bounding_box_collides(terrain, Vec2::new(p.x + step, p.y)) {
            break;
        }
        p.x += step;
        dx -= step;
    }

    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TILE_SIZE;
    use crate::terrain::Material;
    use proptest::prelude::*;

    fn single_block(at: IVec2) -> Terrain {
        Terrain::from_fn(9, 9, |p| if p == at { Material::Stone } else { Material::Air })
    }

    /// box interiors overlap (touching edges don't count)
    fn overlaps_block(pos: Vec2, block: IVec2) -> bool {
        let b = block.as_vec2() * TILE_SIZE;
        pos.x < b.x + TILE_SIZE && pos.x + TILE_SIZE > b.x && pos.y < b.y + TILE_SIZE && pos.y + TILE_SIZE > b.y
    }

    #[test]
    fn aligned_box_covers_one_block() {
        assert_eq!(covered_blocks(Vec2::new(16.0, 8.0)), (IVec2::new(2, 1), IVec2::new(2, 1)));
        assert_eq!(covered_blocks(Vec2::new(17.0, 8.0)), (IVec2::new(2, 1), IVec2::new(3, 1)));
        assert_eq!(covered_blocks(Vec2::new(16.0, 8.5)), (IVec2::new(2, 1), IVec2::new(2, 2)));
        assert_eq!(covered_blocks(Vec2::new(-1.0, 0.0)), (IVec2::new(-1, 0), IVec2::new(0, 0)));
    }

    #[test]
    fn outside_the_grid_is_open() {
        let t = Terrain::from_fn(2, 2, |_| Material::Stone);
        assert!(!is_solid(&t, IVec2::new(-1, 0)));
        assert!(!is_solid(&t, IVec2::new(2, 5)));
        assert!(!bounding_box_collides(&t, Vec2::new(-100.0, -100.0)));
        assert_eq!(
            move_with_collision(&t, Vec2::new(40.0, 40.0), Vec2::new(-3.0, 2.0)),
            Vec2::new(37.0, 42.0)
        );
    }

    #[test]
    fn lands_flush_on_the_floor() {
        let t = Terrain::from_fn(4, 4, |p| if p.y == 3 { Material::Dirt } else { Material::Air });
        let p = move_with_collision(&t, Vec2::new(8.0, 14.0), Vec2::new(0.0, 3.0));
        assert_eq!(p, Vec2::new(8.0, 16.0));
    }

    #[test]
    fn vertical_resolves_before_horizontal() {
        // ledge at (2,0) blocks the start height but not the fallen one
        let t = Terrain::from_fn(4, 4, |p| {
            if p.y == 3 || (p.x == 2 && p.y == 0) { Material::Stone } else { Material::Air }
        });
        let p = move_with_collision(&t, Vec2::new(6.0, 2.0), Vec2::new(3.0, 6.0));
        assert_eq!(p, Vec2::new(9.0, 8.0));
    }

    #[test]
    fn fractional_remainder_is_applied() {
        let t = Terrain::new(10, 10);
        let p = move_with_collision(&t, Vec2::new(10.0, 10.0), Vec2::new(2.5, -1.25));
        assert!((p - Vec2::new(12.5, 8.75)).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn zero_displacement_is_identity(
            x in -20.0f32..100.0,
            y in -20.0f32..100.0,
            solid in prop::collection::vec(any::<bool>(), 81),
        ) {
            let t = Terrain::from_fn(9, 9, |p| {
                if solid[(p.y * 9 + p.x) as usize] { Material::Stone } else { Material::Air }
            });
            let pos = Vec2::new(x, y);
            prop_assert_eq!(move_with_collision(&t, pos, Vec2::ZERO), pos);
        }

        #[test]
        fn never_ends_inside_an_obstruction(
            dir in 0usize..4,
            offset in 0.0f32..1.0,
            lateral in -7.0f32..7.0,
            speed in 0.5f32..6.0,
            ticks in 1usize..40,
        ) {
            let block = IVec2::new(4, 4);
            let t = single_block(block);
            let b = block.as_vec2() * TILE_SIZE;
            let (start, delta) = match dir {
                0 => (Vec2::new(b.x - 20.0 - offset, b.y + lateral), Vec2::new(speed, 0.0)),
                1 => (Vec2::new(b.x + 20.0 + offset, b.y + lateral), Vec2::new(-speed, 0.0)),
                2 => (Vec2::new(b.x + lateral, b.y - 20.0 - offset), Vec2::new(0.0, speed)),
                _ => (Vec2::new(b.x + lateral, b.y + 20.0 + offset), Vec2::new(0.0, -speed)),
            };
            let mut p = start;
            for _ in 0..ticks {
                p = move_with_collision(&t, p, delta);
                prop_assert!(!overlaps_block(p, block), "ended at {:?}", p);
            }
        }
    }
}
