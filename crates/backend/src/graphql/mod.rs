use std::sync::Arc;

use async_graphql::{Context, Enum, InputObject, Object, SimpleObject, ID};
use pubg_shared::{
    jump,
    models::{FallStrategy, FlightPath, ImageSize, JumpResult, MapProfile, Point},
    plan::Plan,
    scale,
    session::{MeasureSession, MeasureState},
    GeoError,
};

use crate::assets::Assets;
use crate::storage::Storage;

fn geo_error(e: GeoError) -> async_graphql::Error {
    async_graphql::Error::new(e.to_string())
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlStrategy {
    Dive,
    Neutral,
    Glide,
}

impl From<FallStrategy> for GqlStrategy {
    fn from(s: FallStrategy) -> Self {
        match s {
            FallStrategy::Dive => GqlStrategy::Dive,
            FallStrategy::Neutral => GqlStrategy::Neutral,
            FallStrategy::Glide => GqlStrategy::Glide,
        }
    }
}

impl From<GqlStrategy> for FallStrategy {
    fn from(s: GqlStrategy) -> Self {
        match s {
            GqlStrategy::Dive => FallStrategy::Dive,
            GqlStrategy::Neutral => FallStrategy::Neutral,
            GqlStrategy::Glide => FallStrategy::Glide,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlMapProfile {
    pub id: String,
    pub name: String,
    pub size_in_meters: f64,
    pub image: String,
    pub active: bool,
}

impl From<&MapProfile> for GqlMapProfile {
    fn from(m: &MapProfile) -> Self {
        GqlMapProfile {
            id: m.id.clone(),
            name: m.name.clone(),
            size_in_meters: m.size_in_meters,
            image: m.image.clone(),
            active: m.active,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlMapInfo {
    pub map: GqlMapProfile,
    pub meters_per_pixel: f64,
    pub description: String,
}

#[derive(SimpleObject)]
pub struct GqlStrategyParams {
    pub strategy: GqlStrategy,
    pub vertical_speed: f64,
    pub horizontal_speed: f64,
    pub max_parachute_distance: f64,
}

#[derive(SimpleObject, Clone, Copy)]
pub struct GqlPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for GqlPoint {
    fn from(p: Point) -> Self {
        GqlPoint { x: p.x, y: p.y }
    }
}

#[derive(SimpleObject)]
pub struct GqlDistance {
    pub meters: f64,
    pub formatted: String,
}

#[derive(SimpleObject)]
pub struct GqlJumpResult {
    pub distance_meters: f64,
    pub feasible: bool,
    pub deploy_height_meters: Option<f64>,
    pub deploy_label: Option<String>,
    pub exit_point: Option<GqlPoint>,
    pub exit_fraction: Option<f64>,
    pub exit_label: Option<String>,
    pub strategy: GqlStrategy,
}

impl From<JumpResult> for GqlJumpResult {
    fn from(r: JumpResult) -> Self {
        GqlJumpResult {
            distance_meters: r.distance_meters,
            feasible: r.feasible,
            deploy_height_meters: r.deploy.map(|d| d.meters),
            deploy_label: r.deploy.map(|d| d.to_string()),
            exit_point: r.exit_point.map(GqlPoint::from),
            exit_fraction: r.exit_fraction,
            exit_label: r.exit_placement.map(|p| p.to_string()),
            strategy: r.strategy.into(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlPlan {
    pub id: ID,
    pub name: String,
    pub map_id: String,
    pub strategy: GqlStrategy,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub path_start: Option<GqlPoint>,
    pub path_end: Option<GqlPoint>,
    pub landing: Option<GqlPoint>,
    /// Solved jump, present once every point and the image size are set.
    pub jump: Option<GqlJumpResult>,
    pub created_at: String,
    pub updated_at: String,
}

impl GqlPlan {
    fn build(p: Plan, assets: &Assets) -> async_graphql::Result<Self> {
        let jump = p
            .solve(&assets.map_or_default(&p.map_id))
            .map_err(geo_error)?
            .map(GqlJumpResult::from);
        Ok(GqlPlan {
            id: ID(p.id.to_string()),
            name: p.name,
            map_id: p.map_id,
            strategy: p.strategy.into(),
            image_width: p.image_size.map(|s| s.width),
            image_height: p.image_size.map(|s| s.height),
            path_start: p.path_start.map(GqlPoint::from),
            path_end: p.path_end.map(GqlPoint::from),
            landing: p.landing.map(GqlPoint::from),
            jump,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
    }
}

#[derive(SimpleObject)]
pub struct GqlStats {
    pub total_plans: u64,
    pub db_size_bytes: u64,
}

// Input types

#[derive(InputObject, Clone, Copy)]
pub struct PointInput {
    pub x: f64,
    pub y: f64,
}

impl From<PointInput> for Point {
    fn from(p: PointInput) -> Self {
        Point { x: p.x, y: p.y }
    }
}

#[derive(InputObject, Clone, Copy)]
pub struct ImageSizeInput {
    pub width: u32,
    pub height: u32,
}

impl From<ImageSizeInput> for ImageSize {
    fn from(s: ImageSizeInput) -> Self {
        ImageSize::new(s.width, s.height)
    }
}

#[derive(InputObject)]
pub struct MapInfoInput {
    pub map_id: String,
    pub image: ImageSizeInput,
}

#[derive(InputObject)]
pub struct DistanceInput {
    pub map_id: String,
    pub image: ImageSizeInput,
    pub from: PointInput,
    pub to: PointInput,
}

#[derive(InputObject)]
pub struct JumpInput {
    pub map_id: String,
    pub image: ImageSizeInput,
    pub path_start: PointInput,
    pub path_end: PointInput,
    pub landing: PointInput,
    pub strategy: GqlStrategy,
}

#[derive(InputObject)]
pub struct CreatePlanInput {
    pub name: String,
    pub map_id: String,
    pub strategy: Option<GqlStrategy>,
    pub image: Option<ImageSizeInput>,
    pub path_start: Option<PointInput>,
    pub path_end: Option<PointInput>,
    pub landing: Option<PointInput>,
}

#[derive(InputObject)]
pub struct UpdatePlanInput {
    pub id: ID,
    pub name: Option<String>,
    pub map_id: Option<String>,
    pub strategy: Option<GqlStrategy>,
    pub image: Option<ImageSizeInput>,
    pub path_start: Option<PointInput>,
    pub path_end: Option<PointInput>,
    pub landing: Option<PointInput>,
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn maps(
        &self,
        ctx: &Context<'_>,
        active_only: Option<bool>,
    ) -> async_graphql::Result<Vec<GqlMapProfile>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .maps
            .all()
            .iter()
            .filter(|m| !active_only.unwrap_or(false) || m.active)
            .map(GqlMapProfile::from)
            .collect())
    }

    /// Scale of a loaded map image, e.g. "Map: 8192×8192px (0.98m/px)".
    async fn map_info(
        &self,
        ctx: &Context<'_>,
        input: MapInfoInput,
    ) -> async_graphql::Result<GqlMapInfo> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let map = assets.map_or_default(&input.map_id);
        let image: ImageSize = input.image.into();

        Ok(GqlMapInfo {
            meters_per_pixel: scale::meters_per_pixel(&map, image).map_err(geo_error)?,
            description: scale::describe_image(&map, image).map_err(geo_error)?,
            map: GqlMapProfile::from(&map),
        })
    }

    async fn strategies(&self) -> Vec<GqlStrategyParams> {
        FallStrategy::ALL
            .iter()
            .map(|s| {
                let p = s.params();
                GqlStrategyParams {
                    strategy: (*s).into(),
                    vertical_speed: p.vertical_speed,
                    horizontal_speed: p.horizontal_speed,
                    max_parachute_distance: p.max_parachute_distance,
                }
            })
            .collect()
    }

    async fn distance(
        &self,
        ctx: &Context<'_>,
        input: DistanceInput,
    ) -> async_graphql::Result<GqlDistance> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let map = assets.map_or_default(&input.map_id);
        let image: ImageSize = input.image.into();

        let mut session = MeasureSession::new();
        session.click(input.from.into(), &map, image).map_err(geo_error)?;
        let meters = match session.click(input.to.into(), &map, image).map_err(geo_error)? {
            MeasureState::Measured { meters, .. } => *meters,
            _ => return Err(async_graphql::Error::new("Distance was not measured")),
        };

        Ok(GqlDistance {
            meters,
            formatted: scale::format_distance(meters),
        })
    }

    async fn jump(&self, ctx: &Context<'_>, input: JumpInput) -> async_graphql::Result<GqlJumpResult> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let map = assets.map_or_default(&input.map_id);
        let path = FlightPath {
            start: input.path_start.into(),
            end: input.path_end.into(),
        };
        let strategy: FallStrategy = input.strategy.into();

        let result = jump::solve(path, input.landing.into(), &map, input.image.into(), strategy)
            .map_err(geo_error)?;
        tracing::debug!(
            map = %map.id,
            %strategy,
            distance = result.distance_meters,
            feasible = result.feasible,
            "Solved jump"
        );

        Ok(result.into())
    }

    async fn plan(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<GqlPlan>> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let assets = ctx.data::<Arc<Assets>>()?;
        let plan = storage.get_plan(&id).map_err(async_graphql::Error::new)?;
        plan.map(|p| GqlPlan::build(p, assets)).transpose()
    }

    async fn stats(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlStats> {
        let storage = ctx.data::<Arc<Storage>>()?;
        Ok(GqlStats {
            total_plans: storage.count_plans().map_err(async_graphql::Error::new)?,
            db_size_bytes: storage.db_size_bytes().map_err(async_graphql::Error::new)?,
        })
    }
}

// Mutation root

pub struct MutationRoot;

/// Reject plans whose points cannot be solved before they are stored.
fn check_plan(plan: &Plan, assets: &Assets) -> async_graphql::Result<()> {
    plan.solve(&assets.map_or_default(&plan.map_id))
        .map(|_| ())
        .map_err(geo_error)
}

#[Object]
impl MutationRoot {
    async fn create_plan(
        &self,
        ctx: &Context<'_>,
        input: CreatePlanInput,
    ) -> async_graphql::Result<GqlPlan> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let assets = ctx.data::<Arc<Assets>>()?;
        let now = chrono::Utc::now().to_rfc3339();

        let plan = Plan {
            id: uuid::Uuid::new_v4(),
            name: input.name,
            map_id: input.map_id,
            strategy: input
                .strategy
                .map(FallStrategy::from)
                .unwrap_or(FallStrategy::Neutral),
            image_size: input.image.map(ImageSize::from),
            path_start: input.path_start.map(Point::from),
            path_end: input.path_end.map(Point::from),
            landing: input.landing.map(Point::from),
            created_at: now.clone(),
            updated_at: now,
        };
        check_plan(&plan, assets)?;

        storage
            .save_plan(&plan)
            .map_err(async_graphql::Error::new)?;
        tracing::info!(id = %plan.id, map = %plan.map_id, "Created plan");

        GqlPlan::build(plan, assets)
    }

    async fn update_plan(
        &self,
        ctx: &Context<'_>,
        input: UpdatePlanInput,
    ) -> async_graphql::Result<GqlPlan> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let assets = ctx.data::<Arc<Assets>>()?;

        let mut plan = storage
            .get_plan(&input.id)
            .map_err(async_graphql::Error::new)?
            .ok_or_else(|| async_graphql::Error::new("Plan not found"))?;

        if let Some(name) = input.name {
            plan.name = name;
        }
        if let Some(map_id) = input.map_id {
            plan.map_id = map_id;
        }
        if let Some(strategy) = input.strategy {
            plan.strategy = strategy.into();
        }
        if let Some(image) = input.image {
            plan.image_size = Some(image.into());
        }
        if let Some(p) = input.path_start {
            plan.path_start = Some(p.into());
        }
        if let Some(p) = input.path_end {
            plan.path_end = Some(p.into());
        }
        if let Some(p) = input.landing {
            plan.landing = Some(p.into());
        }
        check_plan(&plan, assets)?;

        plan.updated_at = chrono::Utc::now().to_rfc3339();

        storage
            .save_plan(&plan)
            .map_err(async_graphql::Error::new)?;

        GqlPlan::build(plan, assets)
    }

    async fn delete_plan(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let storage = ctx.data::<Arc<Storage>>()?;
        storage.delete_plan(&id).map_err(async_graphql::Error::new)
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>, storage: Arc<Storage>) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(assets)
        .data(storage)
        .finish()
}
