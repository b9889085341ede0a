// Candidate image list and how it is loaded

use crate::errors::{MosaicError, MosaicResult};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::PathBuf;

/// One candidate image
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ImageEntry")]
pub struct ImageRef {
    pub url: String,
    /// Relative weight from the list. Selection is uniform; the weight is kept
    /// for hosts that want to bias it.
    pub weight: f64,
    /// Natural pixel size, when the list provides it
    pub dimensions: Option<(u32, u32)>,
}

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            weight: 1.0,
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }
}

/// Accepted list entry shapes: a bare url or an object with optional extras
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ImageEntry {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        weight: Option<f64>,
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
    },
}

impl From<ImageEntry> for ImageRef {
    fn from(entry: ImageEntry) -> Self {
        match entry {
            ImageEntry::Url(url) => ImageRef::new(url),
            ImageEntry::Detailed {
                url,
                weight,
                width,
                height,
            } => ImageRef {
                url,
                weight: weight.unwrap_or(1.0),
                dimensions: width.zip(height),
            },
        }
    }
}

/// Parse a JSON image list: `["a.jpg"]` or `[{"url": "a.jpg", "weight": 2}]`
pub fn parse_image_list(json: &str) -> MosaicResult<Vec<ImageRef>> {
    let images: Vec<ImageRef> = serde_json::from_str(json)?;
    if images.is_empty() {
        return Err(MosaicError::ImageList("image list is empty".into()));
    }
    Ok(images)
}

/// Uniformly random image from the list
pub fn choose_random<'a, R: Rng + ?Sized>(images: &'a [ImageRef], rng: &mut R) -> Option<&'a ImageRef> {
    images.choose(rng)
}

/// Supplies the candidate images for a cloud
pub trait ImageSource {
    fn fetch_image_list(&mut self) -> MosaicResult<Vec<ImageRef>>;
}

/// Image list read from a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileImages {
    path: PathBuf,
}

impl JsonFileImages {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for JsonFileImages {
    fn fetch_image_list(&mut self) -> MosaicResult<Vec<ImageRef>> {
        debug!("📂 Reading image list from {}", self.path.display());
        let contents = std::fs::read_to_string(&self.path).map_err(|err| {
            MosaicError::ImageList(format!("cannot read {}: {}", self.path.display(), err))
        })?;
        let images = parse_image_list(&contents)?;
        info!("🖼️  Loaded {} images from {}", images.len(), self.path.display());
        Ok(images)
    }
}

/// Fixed in-memory image list
#[derive(Debug, Clone, Default)]
pub struct StaticImages(pub Vec<ImageRef>);

impl ImageSource for StaticImages {
    fn fetch_image_list(&mut self) -> MosaicResult<Vec<ImageRef>> {
        if self.0.is_empty() {
            return Err(MosaicError::ImageList("image list is empty".into()));
        }
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_plain_urls() {
        let images = parse_image_list(r#"["a.jpg", "b.png"]"#).unwrap();
        assert_eq!(images, vec![ImageRef::new("a.jpg"), ImageRef::new("b.png")]);
    }

    #[test]
    fn test_parse_weighted_entries() {
        let images = parse_image_list(
            r#"[{"url": "a.jpg", "weight": 3}, {"url": "b.jpg", "width": 640, "height": 480}, "c.jpg"]"#,
        )
        .unwrap();
        assert_eq!(images[0].weight, 3.0);
        assert_eq!(images[0].dimensions, None);
        assert_eq!(images[1].weight, 1.0);
        assert_eq!(images[1].dimensions, Some((640, 480)));
        assert_eq!(images[2], ImageRef::new("c.jpg"));
    }

    #[test]
    fn test_empty_or_malformed_list_is_an_error() {
        assert!(matches!(
            parse_image_list("[]"),
            Err(MosaicError::ImageList(_))
        ));
        assert!(matches!(
            parse_image_list(r#"{"url": "a.jpg"}"#),
            Err(MosaicError::Json(_))
        ));
        assert!(StaticImages::default().fetch_image_list().is_err());
    }

    #[test]
    fn test_choose_random_stays_in_list() {
        let images = vec![ImageRef::new("a"), ImageRef::new("b"), ImageRef::new("c")];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let chosen = choose_random(&images, &mut rng).unwrap();
            assert!(images.contains(chosen));
        }
        assert!(choose_random(&[], &mut rng).is_none());
    }

    #[test]
    fn test_json_file_source() {
        let path = std::env::temp_dir().join(format!("image_cloud_list_{}.json", std::process::id()));
        std::fs::write(&path, r#"["one.jpg", {"url": "two.jpg"}]"#).unwrap();

        let mut source = JsonFileImages::new(&path);
        let images = source.fetch_image_list().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].url, "two.jpg");

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            source.fetch_image_list(),
            Err(MosaicError::ImageList(_))
        ));
    }
}
