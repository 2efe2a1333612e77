//! Click-driven interaction state.
//!
//! Each session only calls into the calculators once every input they need
//! has been placed, so callers never handle half-filled positions.
use crate::calc::compute_distance;
use crate::error::GeoError;
use crate::jump::solve;
use crate::models::{FallStrategy, FlightPath, ImageSize, JumpResult, MapProfile, Point};

#[derive(Debug, Clone, PartialEq)]
pub enum JumpState {
    Idle,
    AwaitingPathEnd {
        start: Point,
    },
    AwaitingLanding {
        path: FlightPath,
    },
    Solved {
        path: FlightPath,
        landing: Point,
        result: JumpResult,
    },
}

/// Flight path, then landing point, then a solved jump.
#[derive(Debug, Clone)]
pub struct JumpSession {
    state: JumpState,
    strategy: FallStrategy,
}

impl JumpSession {
    pub fn new(strategy: FallStrategy) -> Self {
        JumpSession {
            state: JumpState::Idle,
            strategy,
        }
    }

    pub fn state(&self) -> &JumpState {
        &self.state
    }

    pub fn strategy(&self) -> FallStrategy {
        self.strategy
    }

    pub fn result(&self) -> Option<&JumpResult> {
        match &self.state {
            JumpState::Solved { result, .. } => Some(result),
            _ => None,
        }
    }

    fn advance_path(&self, point: Point) -> Result<Option<JumpState>, GeoError> {
        match &self.state {
            JumpState::Idle => Ok(Some(JumpState::AwaitingPathEnd { start: point })),
            JumpState::AwaitingPathEnd { start } => {
                if *start == point {
                    return Err(GeoError::DegeneratePath);
                }
                Ok(Some(JumpState::AwaitingLanding {
                    path: FlightPath {
                        start: *start,
                        end: point,
                    },
                }))
            }
            _ => Ok(None),
        }
    }

    /// Place the next flight path endpoint. Does nothing once the path is complete.
    pub fn place_path_point(&mut self, point: Point) -> Result<&JumpState, GeoError> {
        if let Some(next) = self.advance_path(point)? {
            self.state = next;
        }
        Ok(&self.state)
    }

    /// Advance with a new click. A click on a solved session moves the landing point.
    ///
    /// On error the session keeps its previous state.
    pub fn click(
        &mut self,
        point: Point,
        map: &MapProfile,
        image: ImageSize,
    ) -> Result<&JumpState, GeoError> {
        let next = match self.advance_path(point)? {
            Some(next) => next,
            None => {
                let path = match self.state {
                    JumpState::AwaitingLanding { path } | JumpState::Solved { path, .. } => path,
                    JumpState::Idle | JumpState::AwaitingPathEnd { .. } => return Ok(&self.state),
                };
                JumpState::Solved {
                    path,
                    landing: point,
                    result: solve(path, point, map, image, self.strategy)?,
                }
            }
        };
        self.state = next;
        Ok(&self.state)
    }

    /// Switch strategy, re-solving when a landing point is already placed.
    pub fn set_strategy(
        &mut self,
        strategy: FallStrategy,
        map: &MapProfile,
        image: ImageSize,
    ) -> Result<(), GeoError> {
        if let JumpState::Solved { path, landing, .. } = self.state {
            let result = solve(path, landing, map, image, strategy)?;
            self.state = JumpState::Solved {
                path,
                landing,
                result,
            };
        }
        self.strategy = strategy;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = JumpState::Idle;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeasureState {
    Empty,
    PlayerPlaced {
        player: Point,
    },
    Measured {
        player: Point,
        target: Point,
        meters: f64,
    },
}

/// Player position, then target position, then a measured distance.
#[derive(Debug, Clone)]
pub struct MeasureSession {
    state: MeasureState,
}

impl MeasureSession {
    pub fn new() -> Self {
        MeasureSession {
            state: MeasureState::Empty,
        }
    }

    pub fn state(&self) -> &MeasureState {
        &self.state
    }

    /// Place the next marker. Clicks after a measurement are ignored until [`reset`](Self::reset).
    pub fn click(
        &mut self,
        point: Point,
        map: &MapProfile,
        image: ImageSize,
    ) -> Result<&MeasureState, GeoError> {
        let next = match &self.state {
            MeasureState::Empty => MeasureState::PlayerPlaced { player: point },
            MeasureState::PlayerPlaced { player } => MeasureState::Measured {
                player: *player,
                target: point,
                meters: compute_distance(*player, point, map, image)?,
            },
            measured @ MeasureState::Measured { .. } => measured.clone(),
        };
        self.state = next;
        Ok(&self.state)
    }

    pub fn reset(&mut self) {
        self.state = MeasureState::Empty;
    }
}

impl Default for MeasureSession {
    fn default() -> Self {
        Self::new()
    }
}
