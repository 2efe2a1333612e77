use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GeoError;
use crate::models::{FallStrategy, ImageSize, JumpResult, MapProfile, Point};
use crate::session::{JumpSession, JumpState};

/// A saved drop plan, shareable by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub map_id: String,
    pub strategy: FallStrategy,
    #[serde(default)]
    pub image_size: Option<ImageSize>,
    #[serde(default)]
    pub path_start: Option<Point>,
    #[serde(default)]
    pub path_end: Option<Point>,
    #[serde(default)]
    pub landing: Option<Point>,
    pub created_at: String,
    pub updated_at: String,
}

impl Plan {
    /// Replay the saved clicks through a [`JumpSession`].
    ///
    /// Whatever is present is checked, so a zero-size image or a zero-length
    /// path fails even before a landing point is placed. Returns `Ok(None)`
    /// while the plan is missing the image size or any point.
    pub fn solve(&self, map: &MapProfile) -> Result<Option<JumpResult>, GeoError> {
        if let Some(image) = self.image_size {
            image.validate()?;
        }
        let mut session = JumpSession::new(self.strategy);
        for point in [self.path_start, self.path_end].into_iter().map_while(|p| p) {
            session.place_path_point(point)?;
        }

        let (Some(image), Some(landing)) = (self.image_size, self.landing) else {
            return Ok(None);
        };
        if !matches!(session.state(), JumpState::AwaitingLanding { .. }) {
            return Ok(None);
        }
        session.click(landing, map, image)?;
        Ok(session.result().copied())
    }
}
