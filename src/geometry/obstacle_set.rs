use super::{Obstacle, Point, path_blocked};

#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    static_obstacles: Vec<Obstacle>,
    dynamic_obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(static_obstacles: Vec<Obstacle>) -> Self {
        Self {
            static_obstacles,
            dynamic_obstacles: vec![],
        }
    }

    pub fn static_obstacles(&self) -> &[Obstacle] {
        &self.static_obstacles
    }

    pub fn dynamic_obstacles(&self) -> &[Obstacle] {
        &self.dynamic_obstacles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.static_obstacles.iter().chain(self.dynamic_obstacles.iter())
    }

    pub fn to_vec(&self) -> Vec<Obstacle> {
        self.iter().copied().collect()
    }

    pub(crate) fn push_dynamic(&mut self, obstacle: Obstacle) {
        self.dynamic_obstacles.push(obstacle);
    }

    pub fn overlaps_any(&self, obstacle: &Obstacle) -> bool {
        self.iter().any(|o| o.overlaps(obstacle))
    }

    pub fn point_clear(&self, point: &Point, clearance: f64) -> bool {
        !self.iter().any(|o| o.contains(point, clearance))
    }

    pub fn segment_blocked(&self, p1: &Point, p2: &Point) -> bool {
        path_blocked(p1, p2, &self.static_obstacles) || path_blocked(p1, p2, &self.dynamic_obstacles)
    }

    pub fn segment_blocked_by_dynamic(&self, p1: &Point, p2: &Point) -> bool {
        path_blocked(p1, p2, &self.dynamic_obstacles)
    }
}
