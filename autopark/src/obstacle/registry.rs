//! Ordered obstacle registry edited between ticks.

use super::Obstacle;
use crate::core::Point2D;

/// Ordered list of obstacles.
///
/// Order matters: the sensor array tests obstacles in registry order and the
/// first hit wins. Editing needs `&mut`, so a sensing pass borrowing the
/// registry can never observe a half-applied edit.
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an obstacle, returning its index
    pub fn add(&mut self, obstacle: Obstacle) -> usize {
        self.obstacles.push(obstacle);
        self.obstacles.len() - 1
    }

    /// Remove the obstacle at `index`, shifting later ones down
    pub fn remove(&mut self, index: usize) -> Option<Obstacle> {
        if index < self.obstacles.len() {
            Some(self.obstacles.remove(index))
        } else {
            None
        }
    }

    /// Topmost (most recently added) obstacle under `point`
    pub fn pick(&self, point: Point2D) -> Option<usize> {
        self.obstacles.iter().rposition(|o| o.contains(point))
    }

    /// Move the obstacle at `index`. Returns false for a bad index.
    pub fn move_to(&mut self, index: usize, target: Point2D) -> bool {
        match self.obstacles.get_mut(index) {
            Some(obstacle) => {
                obstacle.move_to(target);
                true
            }
            None => false,
        }
    }

    /// Rotate the obstacle at `index` by degrees. Returns false for a bad index.
    pub fn rotate(&mut self, index: usize, amount_deg: f32) -> bool {
        match self.obstacles.get_mut(index) {
            Some(obstacle) => {
                obstacle.rotate(amount_deg);
                true
            }
            None => false,
        }
    }

    /// Obstacle at `index`
    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    /// All obstacles in registry order
    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Number of obstacles
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True if there are no obstacles
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Remove every obstacle
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
}

impl From<Vec<Obstacle>> for ObstacleRegistry {
    fn from(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }
}
