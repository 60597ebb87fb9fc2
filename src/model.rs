use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::GeoPoint;

/// A CNG station record as stored.
///
/// Only `id`, `latitude` and `longitude` matter to the geo-queries; the
/// long tail of optional fields (pincode, rating, photoUrl, ...) rides along
/// in `attributes` and is echoed back to clients untouched. Coordinates are
/// kept in their raw stored form because the store mixes numbers and numeric
/// strings; [`Station::coords`] does the coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Station {
    /// The station's position, if both coordinates are present and numeric.
    ///
    /// Stations failing this are ineligible for every geo-query but are
    /// skipped silently rather than failing the request.
    pub fn coords(&self) -> Option<GeoPoint> {
        let lat = coerce_coord(self.latitude.as_ref()?)?;
        let lng = coerce_coord(self.longitude.as_ref()?)?;
        Some(GeoPoint::new(lat, lng))
    }
}

fn coerce_coord(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
