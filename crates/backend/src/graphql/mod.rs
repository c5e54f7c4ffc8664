use std::sync::Arc;

use async_graphql::{Context, Enum, InputObject, Object, SimpleObject};
use na_map_shared::{
    coords,
    journey::{self, DEFAULT_SHIP_SPEED},
    models::{Nation, PolarSpeedCurve, Position},
    position::{self, Fix},
    wind,
};

use crate::assets::Assets;

// Re-export Nation as a GraphQL enum
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlNation {
    Neutral,
    Pirates,
    Spain,
    France,
    GreatBritain,
    VerenigdeProvincien,
    Denmark,
    Sweden,
    UnitedStates,
    FreeTown,
    Russia,
    Prussia,
}

impl From<Nation> for GqlNation {
    fn from(n: Nation) -> Self {
        match n {
            Nation::Neutral => GqlNation::Neutral,
            Nation::Pirates => GqlNation::Pirates,
            Nation::Spain => GqlNation::Spain,
            Nation::France => GqlNation::France,
            Nation::GreatBritain => GqlNation::GreatBritain,
            Nation::VerenigdeProvincien => GqlNation::VerenigdeProvincien,
            Nation::Denmark => GqlNation::Denmark,
            Nation::Sweden => GqlNation::Sweden,
            Nation::UnitedStates => GqlNation::UnitedStates,
            Nation::FreeTown => GqlNation::FreeTown,
            Nation::Russia => GqlNation::Russia,
            Nation::Prussia => GqlNation::Prussia,
        }
    }
}

impl From<GqlNation> for Nation {
    fn from(n: GqlNation) -> Self {
        match n {
            GqlNation::Neutral => Nation::Neutral,
            GqlNation::Pirates => Nation::Pirates,
            GqlNation::Spain => Nation::Spain,
            GqlNation::France => Nation::France,
            GqlNation::GreatBritain => Nation::GreatBritain,
            GqlNation::VerenigdeProvincien => Nation::VerenigdeProvincien,
            GqlNation::Denmark => Nation::Denmark,
            GqlNation::Sweden => Nation::Sweden,
            GqlNation::UnitedStates => Nation::UnitedStates,
            GqlNation::FreeTown => Nation::FreeTown,
            GqlNation::Russia => Nation::Russia,
            GqlNation::Prussia => Nation::Prussia,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlPort {
    pub id: u32,
    pub name: String,
    pub nation: GqlNation,
    pub nation_name: String,
    pub nation_short_name: String,
    pub x: f64,
    pub y: f64,
    pub f11_x: f64,
    pub f11_z: f64,
}

#[derive(SimpleObject)]
pub struct GqlShip {
    pub id: u32,
    pub slug: String,
    pub name: String,
    pub class: u32,
    pub max_speed: f64,
    pub speed_degrees: Vec<f64>,
}

#[derive(SimpleObject, Clone)]
pub struct GqlPosition {
    pub x: f64,
    pub y: f64,
}

impl From<Position> for GqlPosition {
    fn from(p: Position) -> Self {
        GqlPosition { x: p.x, y: p.y }
    }
}

#[derive(SimpleObject)]
pub struct GqlPositionFix {
    pub found: bool,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub f11_x: Option<String>,
    pub f11_z: Option<String>,
    pub message: Option<String>,
}

#[derive(SimpleObject)]
pub struct GqlLeg {
    pub from: GqlPosition,
    pub to: GqlPosition,
    pub course: f64,
    pub course_compass: String,
    pub distance_k: f64,
    pub minutes: f64,
    pub start_wind: f64,
    pub end_wind: f64,
}

#[derive(SimpleObject)]
pub struct GqlJourney {
    pub ship: Option<String>,
    pub legs: Vec<GqlLeg>,
    pub total_minutes: f64,
    pub total_distance_k: f64,
    pub duration: String,
    pub ending_wind: f64,
    pub ending_wind_compass: String,
}

#[derive(SimpleObject)]
pub struct GqlWindPrediction {
    pub degrees: f64,
    pub compass: String,
}

// Input types

#[derive(InputObject)]
pub struct PositionInput {
    pub x: f64,
    pub y: f64,
}

#[derive(InputObject)]
pub struct FixInput {
    pub port: String,
    pub distance_k: f64,
}

#[derive(InputObject)]
pub struct FindPositionInput {
    pub fixes: Vec<FixInput>,
}

#[derive(InputObject)]
pub struct JourneyInput {
    /// Ship name or slug. Without one a flat speed curve is used.
    pub ship: Option<String>,
    /// Compass label (e.g. "NE⅓E") or degrees.
    pub wind_direction: String,
    pub waypoints: Vec<PositionInput>,
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn ports(
        &self,
        ctx: &Context<'_>,
        nation: Option<GqlNation>,
    ) -> async_graphql::Result<Vec<GqlPort>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .ports
            .iter()
            .filter(|p| match nation {
                Some(n) => p.nation == Nation::from(n),
                None => true,
            })
            .map(|p| {
                let f11 = coords::to_f11(p.position());
                GqlPort {
                    id: p.id,
                    name: p.name.clone(),
                    nation: p.nation.into(),
                    nation_name: p.nation.to_string(),
                    nation_short_name: p.nation.short_name().to_string(),
                    x: p.x,
                    y: p.y,
                    f11_x: f11.x,
                    f11_z: f11.z,
                }
            })
            .collect())
    }

    async fn ships(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlShip>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .ships
            .iter()
            .map(|s| GqlShip {
                id: s.id,
                slug: s.slug(),
                name: s.name.clone(),
                class: s.class as u32,
                max_speed: s.speed_curve().max_speed(),
                speed_degrees: s.speed_curve().samples().to_vec(),
            })
            .collect())
    }

    /// Locate a ship from its distances to three ports.
    async fn position(
        &self,
        ctx: &Context<'_>,
        input: FindPositionInput,
    ) -> async_graphql::Result<GqlPositionFix> {
        let assets = ctx.data::<Arc<Assets>>()?;

        let fixes = input
            .fixes
            .iter()
            .map(|f| {
                let port = assets
                    .find_port(&f.port)
                    .ok_or_else(|| async_graphql::Error::new(format!("Unknown port: {}", f.port)))?;
                Ok(Fix {
                    position: port.position(),
                    distance_k: f.distance_k,
                })
            })
            .collect::<async_graphql::Result<Vec<Fix>>>()?;
        let fixes: [Fix; 3] = fixes.try_into().map_err(|v: Vec<Fix>| {
            async_graphql::Error::new(format!(
                "Not enough data: need exactly 3 ports, got {}",
                v.len()
            ))
        })?;

        tracing::debug!(?fixes, "Finding position");

        let found = position::find_position(&fixes)
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        Ok(match found {
            Some(pos) => {
                let f11 = coords::to_f11(pos);
                GqlPositionFix {
                    found: true,
                    x: Some(pos.x),
                    y: Some(pos.y),
                    f11_x: Some(coords::format_f11(f11.x)),
                    f11_z: Some(coords::format_f11(f11.z)),
                    message: None,
                }
            }
            None => {
                tracing::info!("No intersection found for position request");
                GqlPositionFix {
                    found: false,
                    x: None,
                    y: None,
                    f11_x: None,
                    f11_z: None,
                    message: Some("No intersection found".to_string()),
                }
            }
        })
    }

    /// Sailing time along a multi-leg course.
    async fn journey(
        &self,
        ctx: &Context<'_>,
        input: JourneyInput,
    ) -> async_graphql::Result<GqlJourney> {
        let assets = ctx.data::<Arc<Assets>>()?;

        let (ship_name, curve) = match &input.ship {
            Some(name) => {
                let ship = assets
                    .find_ship(name)
                    .ok_or_else(|| async_graphql::Error::new(format!("Unknown ship: {}", name)))?;
                (Some(ship.name.clone()), *ship.speed_curve())
            }
            None => (None, PolarSpeedCurve::flat(DEFAULT_SHIP_SPEED)),
        };

        let start_wind = wind::compass_to_degrees(&input.wind_direction)
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        let waypoints: Vec<Position> = input
            .waypoints
            .iter()
            .map(|p| Position { x: p.x, y: p.y })
            .collect();

        tracing::debug!(
            ship = ship_name.as_deref().unwrap_or("default"),
            start_wind,
            waypoints = waypoints.len(),
            "Planning journey"
        );

        // The simulator steps minute by minute; keep it off the async workers
        let planned = tokio::task::spawn_blocking(move || {
            journey::plan_journey(&curve, &waypoints, start_wind)
        })
        .await
        .map_err(|e| async_graphql::Error::new(format!("Journey planning failed: {}", e)))?
        .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        Ok(GqlJourney {
            ship: ship_name,
            duration: journey::format_duration(planned.total_minutes),
            ending_wind_compass: wind::degrees_to_compass(planned.ending_wind).to_string(),
            total_minutes: planned.total_minutes,
            total_distance_k: planned.total_distance_k,
            ending_wind: planned.ending_wind,
            legs: planned
                .legs
                .into_iter()
                .map(|l| GqlLeg {
                    from: l.from.into(),
                    to: l.to.into(),
                    course: l.course,
                    course_compass: l.course_compass,
                    distance_k: l.distance_k,
                    minutes: l.minutes,
                    start_wind: l.start_wind,
                    end_wind: l.end_wind,
                })
                .collect(),
        })
    }

    /// Wind direction `minutes_ahead` from now.
    async fn wind_prediction(
        &self,
        current: String,
        minutes_ahead: f64,
    ) -> async_graphql::Result<GqlWindPrediction> {
        let current = wind::compass_to_degrees(&current)
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        let degrees = wind::predict_wind(current, minutes_ahead);
        Ok(GqlWindPrediction {
            degrees,
            compass: wind::degrees_to_compass(degrees).to_string(),
        })
    }
}

pub type Schema = async_graphql::Schema<
    QueryRoot,
    async_graphql::EmptyMutation,
    async_graphql::EmptySubscription,
>;

pub fn build_schema(assets: Arc<Assets>) -> Schema {
    async_graphql::Schema::build(
        QueryRoot,
        async_graphql::EmptyMutation,
        async_graphql::EmptySubscription,
    )
    .data(assets)
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::test_assets;
    use async_graphql::{Request, Variables};
    use na_map_shared::coords::distance_k;
    use serde_json::json;

    fn schema() -> Schema {
        build_schema(Arc::new(test_assets()))
    }

    async fn run(query: &str, vars: serde_json::Value) -> async_graphql::Response {
        schema()
            .execute(Request::new(query).variables(Variables::from_json(vars)))
            .await
    }

    const POSITION_QUERY: &str = r#"
        query($fixes: [FixInput!]!) {
            position(input: { fixes: $fixes }) { found x y f11X f11Z message }
        }"#;

    const JOURNEY_QUERY: &str = r#"
        query($ship: String, $wind: String!, $waypoints: [PositionInput!]!) {
            journey(input: { ship: $ship, windDirection: $wind, waypoints: $waypoints }) {
                ship totalMinutes totalDistanceK duration endingWind
                legs { course courseCompass distanceK minutes startWind endWind }
            }
        }"#;

    #[tokio::test]
    async fn test_ports_filtered_by_nation() {
        let res = run(
            "{ ports(nation: GREAT_BRITAIN) { name nationName nationShortName } }",
            json!({}),
        )
        .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        assert_eq!(
            data["ports"],
            json!([{ "name": "Port Royal", "nationName": "Great Britain", "nationShortName": "GB" }])
        );
    }

    #[tokio::test]
    async fn test_ships_expose_curve() {
        let res = run("{ ships { slug maxSpeed speedDegrees } }", json!({})).await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        assert_eq!(data["ships"][0]["slug"], "le-gros-ventre");
        assert_eq!(data["ships"][0]["maxSpeed"], 13.0);
        assert_eq!(data["ships"][1]["speedDegrees"].as_array().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_position_found() {
        let ship = Position { x: 48.0, y: 51.0 };
        let assets = test_assets();
        let fixes: Vec<_> = ["Port Royal", "La Habana", "Tortuga"]
            .iter()
            .map(|name| {
                let port = assets.find_port(name).unwrap();
                json!({ "port": name, "distanceK": distance_k(port.position(), ship) })
            })
            .collect();

        let res = run(POSITION_QUERY, json!({ "fixes": fixes })).await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        let pos = &data["position"];
        assert_eq!(pos["found"], true);
        assert!((pos["x"].as_f64().unwrap() - 48.0).abs() < 1e-6);
        assert!((pos["y"].as_f64().unwrap() - 51.0).abs() < 1e-6);
        assert!(pos["f11X"].is_string());
        assert!(pos["message"].is_null());
    }

    #[tokio::test]
    async fn test_position_no_intersection() {
        let fixes = json!([
            { "port": "Port Royal", "distanceK": 1.0 },
            { "port": "La Habana", "distanceK": 1.0 },
            { "port": "Tortuga", "distanceK": 1.0 },
        ]);
        let res = run(POSITION_QUERY, json!({ "fixes": fixes })).await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        assert_eq!(data["position"]["found"], false);
        assert_eq!(data["position"]["message"], "No intersection found");
    }

    #[tokio::test]
    async fn test_position_needs_three_ports() {
        let fixes = json!([
            { "port": "Port Royal", "distanceK": 50.0 },
            { "port": "La Habana", "distanceK": 50.0 },
        ]);
        let res = run(POSITION_QUERY, json!({ "fixes": fixes })).await;
        assert_eq!(res.errors.len(), 1);
        assert!(res.errors[0].message.starts_with("Not enough data"));
    }

    #[tokio::test]
    async fn test_position_unknown_port() {
        let fixes = json!([
            { "port": "Port Royal", "distanceK": 50.0 },
            { "port": "Nassau", "distanceK": 50.0 },
            { "port": "Tortuga", "distanceK": 50.0 },
        ]);
        let res = run(POSITION_QUERY, json!({ "fixes": fixes })).await;
        assert_eq!(res.errors[0].message, "Unknown port: Nassau");
    }

    #[tokio::test]
    async fn test_position_negative_distance() {
        let fixes = json!([
            { "port": "Port Royal", "distanceK": 50.0 },
            { "port": "La Habana", "distanceK": -5.0 },
            { "port": "Tortuga", "distanceK": 50.0 },
        ]);
        let res = run(POSITION_QUERY, json!({ "fixes": fixes })).await;
        assert_eq!(res.errors.len(), 1);
        assert!(res.errors[0].message.contains("non-negative"));
    }

    #[tokio::test]
    async fn test_journey_with_default_ship() {
        let vars = json!({
            "ship": null,
            "wind": "N",
            "waypoints": [{ "x": 0.0, "y": 20.0 }, { "x": 0.0, "y": 0.0 }],
        });
        let res = run(JOURNEY_QUERY, vars).await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        let j = &data["journey"];
        assert!(j["ship"].is_null());
        // 52.6k at 7.41k per minute
        let minutes = j["totalMinutes"].as_f64().unwrap();
        assert!((minutes - 52_600.0 / 7_410.0).abs() < 1e-6);
        assert_eq!(j["duration"], "7 min");
        assert_eq!(j["legs"][0]["courseCompass"], "N");
    }

    #[tokio::test]
    async fn test_journey_with_named_ship() {
        let vars = json!({
            "ship": "Cutter",
            "wind": "180",
            "waypoints": [{ "x": 0.0, "y": 20.0 }, { "x": 0.0, "y": 0.0 }, { "x": 20.0, "y": 0.0 }],
        });
        let res = run(JOURNEY_QUERY, vars).await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        let j = &data["journey"];
        assert_eq!(j["ship"], "Cutter");
        assert_eq!(j["legs"].as_array().unwrap().len(), 2);
        assert_eq!(j["legs"][0]["startWind"], 180.0);
        assert_eq!(j["legs"][1]["startWind"], j["legs"][0]["endWind"]);
    }

    #[tokio::test]
    async fn test_journey_rejects_off_map_waypoint() {
        let vars = json!({
            "ship": null,
            "wind": "N",
            "waypoints": [{ "x": 100.0, "y": 100.0 }, { "x": 1e17, "y": 0.0 }],
        });
        let res = run(JOURNEY_QUERY, vars).await;
        assert_eq!(res.errors.len(), 1);
        assert!(
            res.errors[0].message.contains("outside the map"),
            "{}",
            res.errors[0].message
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_journey_across_the_map() {
        // Corner to corner is the longest leg the planner accepts
        let vars = json!({
            "ship": null,
            "wind": "N",
            "waypoints": [{ "x": 0.0, "y": 0.0 }, { "x": 8192.0, "y": 8192.0 }],
        });
        let res = run(JOURNEY_QUERY, vars).await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        let minutes = data["journey"]["totalMinutes"].as_f64().unwrap();
        let dist = data["journey"]["totalDistanceK"].as_f64().unwrap();
        // 9.5 knots flat: 7410 units per minute
        assert!((minutes - dist * 1000.0 / 7410.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_journey_unknown_ship() {
        let vars = json!({
            "ship": "Santisima Trinidad",
            "wind": "N",
            "waypoints": [],
        });
        let res = run(JOURNEY_QUERY, vars).await;
        assert_eq!(res.errors[0].message, "Unknown ship: Santisima Trinidad");
    }

    #[tokio::test]
    async fn test_journey_bad_wind() {
        let vars = json!({ "ship": null, "wind": "NNE", "waypoints": [] });
        let res = run(JOURNEY_QUERY, vars).await;
        assert_eq!(res.errors[0].message, "unknown wind direction: NNE");
    }

    #[tokio::test]
    async fn test_wind_prediction() {
        let res = run(
            r#"{ now: windPrediction(current: "E", minutesAhead: 0) { degrees compass }
                 later: windPrediction(current: "E", minutesAhead: 2935) { degrees } }"#,
            json!({}),
        )
        .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        assert_eq!(data["now"], json!({ "degrees": 90.0, "compass": "E" }));
        // 2935 minutes is 60 full turns
        assert!((data["later"]["degrees"].as_f64().unwrap() - 90.0).abs() < 1e-6);
    }
}
