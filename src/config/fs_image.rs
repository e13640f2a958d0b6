use std::borrow::Cow;
use std::io::Cursor;
use std::path::PathBuf;

use compio::{fs::File, io::AsyncReadExt, io::BufReader};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::fs::{Dir, FsError};

/// Parsed startup image: a description of the initial tree, applied onto a
/// fresh root before the session starts.
///
/// The document is a top-level `tree` mapping. A mapping value is a
/// directory (recursively); a scalar or null value is an empty file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsImage {
    entries: Vec<(String, ImageNode)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ImageNode {
    File,
    Dir(Vec<(String, ImageNode)>),
}

impl FsImage {
    pub async fn from_path(path: PathBuf) -> Result<Self, ImageError> {
        debug!("Opening image file: {}", path.display());
        let file = File::open(&path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;

        debug!("Reading image file");
        let cursor = Cursor::new(file);
        let mut reader = BufReader::new(cursor);
        let res = reader.read_to_string(String::new()).await;
        match res.0 {
            Ok(n) => debug!("Successfully read image file: {n} bytes"),
            _ => {
                res.0.context(ReadSnafu {
                    file_path: path.display().to_string(),
                })?;
            }
        }
        res.1.as_str().try_into()
    }

    /// Builds the described entries under `root`. Collisions and invalid
    /// names surface as the tree's own errors.
    pub fn apply(&self, root: &Dir) -> Result<(), FsError> {
        Self::apply_entries(&self.entries, root)
    }

    fn apply_entries(entries: &[(String, ImageNode)], dir: &Dir) -> Result<(), FsError> {
        for (name, node) in entries {
            match node {
                ImageNode::File => {
                    crate::fs::File::new(name.clone(), dir)?;
                }
                ImageNode::Dir(children) => {
                    let child = Dir::new(name.clone(), dir)?;
                    Self::apply_entries(children, &child)?;
                }
            }
        }
        Ok(())
    }

    fn parse_entries(mapping: &LinkedHashMap<Yaml, Yaml>) -> Vec<(String, ImageNode)> {
        mapping
            .iter()
            .filter_map(|(key, value)| {
                let Yaml::Value(Scalar::String(name)) = key else {
                    debug!("Skipping non-string image entry: {:?}", key);
                    return None;
                };
                let node = match value {
                    Yaml::Mapping(children) => ImageNode::Dir(Self::parse_entries(children)),
                    Yaml::Value(_) => ImageNode::File,
                    other => {
                        debug!("Skipping unsupported image entry '{}': {:?}", name, other);
                        return None;
                    }
                };
                Some((name.to_string(), node))
            })
            .collect()
    }
}

impl TryFrom<&str> for FsImage {
    type Error = ImageError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| ImageError::ParseError { source: e })?;
        let contents = documents.get(0).ok_or(ImageError::MalformedImage)?;

        let top_level = contents.as_mapping().ok_or(ImageError::TopLevelNotMap)?;

        let empty = Yaml::Mapping(LinkedHashMap::new());
        let tree = top_level
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("tree"))))
            .unwrap_or(&empty)
            .as_mapping()
            .ok_or(ImageError::TreeNotMap)?;

        Ok(FsImage {
            entries: Self::parse_entries(tree),
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ImageError {
    #[snafu(display("Failed to read the image file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the image file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted image file"))]
    MalformedImage,
    #[snafu(display("Top level of an image should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The tree section should be a map"))]
    TreeNotMap,
}
