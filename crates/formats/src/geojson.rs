use foundation::math::LonLat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LonLat),
    MultiPoint(Vec<LonLat>),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Vec<LonLat>>),
    MultiPolygon(Vec<Vec<Vec<LonLat>>>),
}

impl Geometry {
    /// First coordinate in document order, if any.
    pub fn first_coordinate(&self) -> Option<LonLat> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.first().copied(),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().flatten().next().copied()
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().next().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for GeoJSON `"geometry": null`.
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry: Some(geometry),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Numeric property; numeric strings are accepted.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    /// Display name: the `name` property, if non-empty.
    pub fn name(&self) -> Option<&str> {
        self.property_str("name")
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn credible_level(&self) -> Option<f64> {
        self.property_f64("credible_level")
    }

    pub fn url(&self) -> Option<&str> {
        self.property_str("url")
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
    Json(String),
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
            GeoJsonError::Json(msg) => write!(f, "JSON parse error: {msg}"),
        }
    }
}

impl std::error::Error for GeoJsonError {}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeoJsonError::Json(e.to_string()))?;
        Self::from_geojson_value(value)
    }

    /// Accepts a `FeatureCollection`, or a bare `{ "features": [...] }`
    /// object with no `type` member.
    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        match obj.get("type").and_then(|v| v.as_str()) {
            Some("FeatureCollection") | None => {}
            Some(_) => return Err(GeoJsonError::NotAFeatureCollection),
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            features.push(parse_feature(index, feat_val)?);
        }

        Ok(Self { features })
    }

    /// Emits a GeoJSON FeatureCollection.
    /// (Property ordering may differ from the original input.)
    pub fn to_geojson_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            "type".to_string(),
            Value::String("FeatureCollection".to_string()),
        );

        let mut features: Vec<Value> = Vec::with_capacity(self.features.len());
        for feat in &self.features {
            let mut fobj = Map::new();
            fobj.insert("type".to_string(), Value::String("Feature".to_string()));
            if let Some(id) = &feat.id {
                fobj.insert("id".to_string(), Value::String(id.clone()));
            }
            fobj.insert(
                "properties".to_string(),
                Value::Object(feat.properties.clone()),
            );
            fobj.insert(
                "geometry".to_string(),
                feat.geometry
                    .as_ref()
                    .map(geometry_to_geojson_value)
                    .unwrap_or(Value::Null),
            );
            features.push(Value::Object(fobj));
        }

        root.insert("features".to_string(), Value::Array(features));
        Value::Object(root)
    }
}

impl TryFrom<Value> for FeatureCollection {
    type Error = GeoJsonError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_geojson_value(value)
    }
}

impl From<FeatureCollection> for Value {
    fn from(fc: FeatureCollection) -> Self {
        fc.to_geojson_value()
    }
}

fn parse_feature(index: usize, feat_val: &Value) -> Result<Feature, GeoJsonError> {
    let feat_obj = feat_val
        .as_object()
        .ok_or(GeoJsonError::InvalidFeature {
            index,
            reason: "feature must be an object".to_string(),
        })?;

    if let Some(feat_type) = feat_obj.get("type").and_then(|v| v.as_str())
        && feat_type != "Feature"
    {
        return Err(GeoJsonError::InvalidFeature {
            index,
            reason: format!("unexpected feature type: {feat_type}"),
        });
    }

    let id = match feat_obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry = match feat_obj.get("geometry") {
        None | Some(Value::Null) => None,
        Some(g) => Some(
            parse_geometry(g).map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?,
        ),
    };

    Ok(Feature {
        id,
        properties,
        geometry,
    })
}

fn geometry_to_geojson_value(geom: &Geometry) -> Value {
    let (ty, coords) = match geom {
        Geometry::Point(p) => ("Point", point_coords(p)),
        Geometry::MultiPoint(ps) => ("MultiPoint", points_coords(ps)),
        Geometry::LineString(ps) => ("LineString", points_coords(ps)),
        Geometry::MultiLineString(lines) => (
            "MultiLineString",
            Value::Array(lines.iter().map(|l| points_coords(l)).collect()),
        ),
        Geometry::Polygon(rings) => (
            "Polygon",
            Value::Array(rings.iter().map(|r| points_coords(r)).collect()),
        ),
        Geometry::MultiPolygon(polys) => (
            "MultiPolygon",
            Value::Array(
                polys
                    .iter()
                    .map(|rings| Value::Array(rings.iter().map(|r| points_coords(r)).collect()))
                    .collect(),
            ),
        ),
    };
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(ty.to_string()));
    obj.insert("coordinates".to_string(), coords);
    Value::Object(obj)
}

fn point_coords(p: &LonLat) -> Value {
    Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)])
}

fn points_coords(ps: &[LonLat]) -> Value {
    Value::Array(ps.iter().map(point_coords).collect())
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_rings(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<LonLat>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<LonLat>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of rings".to_string())?;
    arr.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<LonLat>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_rings).collect()
}
