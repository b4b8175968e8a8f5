use super::types::{CollisionMap, TileMap, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionAttribute {
    Walkable,
    Solid,
    // TallGrass and Door are pass-through today; encounters and transitions hook in here.
    TallGrass,
    Door,
    Water,
    /// Resolver-only result for samples outside the grid. Never stored.
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPolicy {
    Allow,
    Deny,
}

impl CollisionAttribute {
    /// Decodes a stored attribute code. Unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Walkable),
            1 => Some(Self::Solid),
            2 => Some(Self::TallGrass),
            3 => Some(Self::Door),
            4 => Some(Self::Water),
            _ => None,
        }
    }

    pub fn policy(self) -> MovementPolicy {
        match self {
            Self::Walkable | Self::TallGrass | Self::Door => MovementPolicy::Allow,
            Self::Solid | Self::Water | Self::OutOfBounds => MovementPolicy::Deny,
        }
    }

    pub fn allows_movement(self) -> bool {
        self.policy() == MovementPolicy::Allow
    }
}

/// Converts a pixel point into signed tile coordinates.
pub fn world_to_tile(point: Vec2, tile_width: u32, tile_height: u32) -> (i64, i64) {
    let tile_x = (point.x / tile_width as f32).floor() as i64;
    let tile_y = (point.y / tile_height as f32).floor() as i64;
    (tile_x, tile_y)
}

/// Looks up the collision attribute under `point`.
///
/// `point` must already be in map space: any render offset is removed by the
/// caller. An absent collision layer makes every in-bounds cell walkable.
/// Codes outside the known table resolve to `Solid`.
pub fn attribute_at(
    point: Vec2,
    map: &TileMap,
    collision_map: &CollisionMap,
    tile_width: u32,
    tile_height: u32,
) -> CollisionAttribute {
    if tile_width == 0 || tile_height == 0 {
        return CollisionAttribute::OutOfBounds;
    }
    let (tile_x, tile_y) = world_to_tile(point, tile_width, tile_height);
    if tile_x < 0 || tile_y < 0 || tile_x >= map.width() as i64 || tile_y >= map.height() as i64 {
        return CollisionAttribute::OutOfBounds;
    }
    let index = tile_y as usize * map.width() as usize + tile_x as usize;
    if collision_map.is_absent() {
        return CollisionAttribute::Walkable;
    }
    match collision_map.code_at(index) {
        Some(code) => CollisionAttribute::from_code(code).unwrap_or(CollisionAttribute::Solid),
        None => CollisionAttribute::OutOfBounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strip(codes: Vec<u8>) -> (TileMap, CollisionMap) {
        let width = codes.len() as u32;
        let map = TileMap::new(width, 1, vec![1; codes.len()]);
        let collision = CollisionMap::new(codes);
        (map, collision)
    }

    #[test]
    fn decodes_every_stored_attribute() {
        let (map, collision) = strip(vec![0, 1, 2, 3, 4]);
        let found: Vec<_> = (0..5)
            .map(|x| {
                attribute_at(
                    Vec2::new(x as f32 * 16.0 + 8.0, 8.0),
                    &map,
                    &collision,
                    16,
                    16,
                )
            })
            .collect();
        assert_eq!(
            found,
            vec![
                CollisionAttribute::Walkable,
                CollisionAttribute::Solid,
                CollisionAttribute::TallGrass,
                CollisionAttribute::Door,
                CollisionAttribute::Water,
            ]
        );
    }

    #[test]
    fn policy_table_denies_solid_water_and_out_of_bounds() {
        assert!(CollisionAttribute::Walkable.allows_movement());
        assert!(CollisionAttribute::TallGrass.allows_movement());
        assert!(CollisionAttribute::Door.allows_movement());
        assert!(!CollisionAttribute::Solid.allows_movement());
        assert!(!CollisionAttribute::Water.allows_movement());
        assert!(!CollisionAttribute::OutOfBounds.allows_movement());
    }

    #[test]
    fn tile_edges_floor_toward_lower_index() {
        let (map, collision) = strip(vec![0, 1]);
        assert_eq!(
            attribute_at(Vec2::new(15.99, 0.0), &map, &collision, 16, 16),
            CollisionAttribute::Walkable
        );
        assert_eq!(
            attribute_at(Vec2::new(16.0, 0.0), &map, &collision, 16, 16),
            CollisionAttribute::Solid
        );
    }

    #[test]
    fn negative_fraction_is_out_of_bounds() {
        let (map, collision) = strip(vec![0, 0]);
        assert_eq!(
            attribute_at(Vec2::new(-0.5, 4.0), &map, &collision, 16, 16),
            CollisionAttribute::OutOfBounds
        );
        assert_eq!(
            attribute_at(Vec2::new(4.0, -0.5), &map, &collision, 16, 16),
            CollisionAttribute::OutOfBounds
        );
    }

    #[test]
    fn absent_collision_layer_is_walkable_in_bounds_only() {
        let map = TileMap::new(2, 2, vec![1; 4]);
        let collision = CollisionMap::empty();
        assert_eq!(
            attribute_at(Vec2::new(20.0, 20.0), &map, &collision, 16, 16),
            CollisionAttribute::Walkable
        );
        assert_eq!(
            attribute_at(Vec2::new(40.0, 20.0), &map, &collision, 16, 16),
            CollisionAttribute::OutOfBounds
        );
    }

    #[test]
    fn cells_past_a_short_collision_layer_are_out_of_bounds() {
        let map = TileMap::new(3, 1, Vec::new());
        let collision = CollisionMap::new(vec![0, 2]);
        assert_eq!(
            attribute_at(Vec2::new(20.0, 4.0), &map, &collision, 16, 16),
            CollisionAttribute::TallGrass
        );
        assert_eq!(
            attribute_at(Vec2::new(40.0, 4.0), &map, &collision, 16, 16),
            CollisionAttribute::OutOfBounds
        );
    }

    #[test]
    fn unknown_code_resolves_to_solid() {
        let (map, collision) = strip(vec![9]);
        let attribute = attribute_at(Vec2::new(1.0, 1.0), &map, &collision, 16, 16);
        assert_eq!(attribute, CollisionAttribute::Solid);
    }

    proptest! {
        #[test]
        fn points_outside_grid_are_out_of_bounds(
            width in 1u32..10,
            height in 1u32..10,
            tile_x in -20i64..30,
            tile_y in -20i64..30,
        ) {
            prop_assume!(
                tile_x < 0 || tile_y < 0 || tile_x >= width as i64 || tile_y >= height as i64
            );
            let cells = (width * height) as usize;
            let map = TileMap::new(width, height, vec![1; cells]);
            let collision = CollisionMap::new(vec![0; cells]);
            let point = Vec2::new(tile_x as f32 * 16.0 + 3.0, tile_y as f32 * 16.0 + 3.0);
            prop_assert_eq!(
                attribute_at(point, &map, &collision, 16, 16),
                CollisionAttribute::OutOfBounds
            );
        }
    }
}
