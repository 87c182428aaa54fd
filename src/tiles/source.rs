use crate::core::{
    constants::{TILE_SIZE, WMS_CRS, WMS_VERSION},
    geo::TileCoord,
};
use crate::{MapError, Result};
use reqwest::Url;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// `{x}`/`{y}`/`{z}` template source, used for the base imagery.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzSource {
    template: String,
}

impl XyzSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl TileSource for XyzSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{z}", &coord.z.to_string())
    }
}

/// WMS GetMap source that requests one EPSG:3857 tile-sized image per
/// [`TileCoord`].
#[derive(Debug, Clone, PartialEq)]
pub struct WmsSource {
    endpoint: Url,
    remote_name: String,
    tiled: bool,
}

impl WmsSource {
    pub fn new(endpoint: &str, remote_name: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| MapError::Layer(format!("invalid WMS endpoint '{}': {}", endpoint, e)))?;
        Ok(Self {
            endpoint,
            remote_name: remote_name.into(),
            tiled: true,
        })
    }

    pub fn with_tiled(mut self, tiled: bool) -> Self {
        self.tiled = tiled;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }
}

impl TileSource for WmsSource {
    fn url(&self, coord: TileCoord) -> String {
        let size = TILE_SIZE.to_string();
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("SERVICE", "WMS")
            .append_pair("VERSION", WMS_VERSION)
            .append_pair("REQUEST", "GetMap")
            .append_pair("FORMAT", "image/png")
            .append_pair("TRANSPARENT", "TRUE")
            .append_pair("LAYERS", &self.remote_name)
            .append_pair("TILED", if self.tiled { "true" } else { "false" })
            .append_pair("STYLES", "")
            .append_pair("CRS", WMS_CRS)
            .append_pair("WIDTH", &size)
            .append_pair("HEIGHT", &size)
            .append_pair("BBOX", &coord.projected_bounds().to_bbox_param());
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_xyz_template() {
        let source = XyzSource::new("http://mt0.google.com/vt/lyrs=s&hl=en&x={x}&y={y}&z={z}");
        assert_eq!(
            source.url(TileCoord::new(3, 5, 4)),
            "http://mt0.google.com/vt/lyrs=s&hl=en&x=3&y=5&z=4"
        );
    }

    #[test]
    fn test_wms_get_map_parameters() {
        let source = WmsSource::new("http://10.100.100.106:8051/geoserver/gov/wms", "gov").unwrap();
        let url = source.url(TileCoord::new(0, 0, 0));
        let pairs = query(&url);

        assert!(url.starts_with("http://10.100.100.106:8051/geoserver/gov/wms?"));
        assert_eq!(param(&pairs, "SERVICE"), Some("WMS"));
        assert_eq!(param(&pairs, "REQUEST"), Some("GetMap"));
        assert_eq!(param(&pairs, "LAYERS"), Some("gov"));
        assert_eq!(param(&pairs, "TILED"), Some("true"));
        assert_eq!(param(&pairs, "CRS"), Some("EPSG:3857"));
        assert_eq!(param(&pairs, "WIDTH"), Some("256"));

        let bbox: Vec<f64> = param(&pairs, "BBOX")
            .unwrap()
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(bbox.len(), 4);
        assert!(bbox[0] < bbox[2] && bbox[1] < bbox[3]);
    }

    #[test]
    fn test_wms_keeps_existing_query() {
        let source = WmsSource::new(
            "http://192.168.17.49:80/erdas-apollo/vector/country?service=WMS",
            "country",
        )
        .unwrap();
        let pairs = query(&source.url(TileCoord::new(1, 1, 2)));

        assert_eq!(param(&pairs, "service"), Some("WMS"));
        assert_eq!(param(&pairs, "LAYERS"), Some("country"));
    }

    #[test]
    fn test_wms_rejects_bad_endpoint() {
        assert!(matches!(
            WmsSource::new("::nope", "gov"),
            Err(MapError::Layer(_))
        ));
    }
}
