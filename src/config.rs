//! Project configuration (abstrakt.yaml) and run metadata.
//!
//! The config file holds defaults for the `generate` and `combine`
//! commands. Command-line flags are parsed into the same section types and
//! merged over the file, so precedence is: flag, then file, then built-in
//! default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::combine::{Combiner, CompositionSpec, CompositionType};
use crate::error::{AbstraktError, Result};
use crate::synth::{Artwork, GenerateConfig};
use crate::types::{Palette, Style};

/// Name of the project config file.
pub const CONFIG_FILENAME: &str = "abstrakt.yaml";

/// Project config loaded from abstrakt.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub generate: GenerateSection,
    pub combine: CombineSection,
}

impl ProjectConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AbstraktError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| {
            AbstraktError::config(
                format!("Invalid config: {}", e),
                Some("Check abstrakt.yaml syntax"),
            )
        })
    }

    /// Load `path` if given, else `abstrakt.yaml` in the current directory
    /// if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Path::new(CONFIG_FILENAME);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Settings for `abstrakt generate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateSection {
    pub style: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<u64>,
    pub strokes: Option<usize>,
    pub shapes: Option<usize>,
    pub flow_strength: Option<f32>,
    pub flow_blend: Option<f32>,
    pub distortion: Option<f32>,
    pub soften: Option<f32>,
    pub effects: Option<bool>,

    /// Custom palette as hex colours.
    pub palette: Option<Vec<String>>,

    pub output: Option<PathBuf>,

    /// Write a JSON sidecar next to the image.
    pub metadata: Option<bool>,
}

impl GenerateSection {
    /// Field-wise merge; values set in `over` win.
    pub fn merged(&self, over: &GenerateSection) -> GenerateSection {
        GenerateSection {
            style: over.style.clone().or_else(|| self.style.clone()),
            width: over.width.or(self.width),
            height: over.height.or(self.height),
            seed: over.seed.or(self.seed),
            strokes: over.strokes.or(self.strokes),
            shapes: over.shapes.or(self.shapes),
            flow_strength: over.flow_strength.or(self.flow_strength),
            flow_blend: over.flow_blend.or(self.flow_blend),
            distortion: over.distortion.or(self.distortion),
            soften: over.soften.or(self.soften),
            effects: over.effects.or(self.effects),
            palette: over.palette.clone().or_else(|| self.palette.clone()),
            output: over.output.clone().or_else(|| self.output.clone()),
            metadata: over.metadata.or(self.metadata),
        }
    }

    /// Resolve into a validated [`GenerateConfig`], filling defaults.
    pub fn to_config(&self) -> Result<GenerateConfig> {
        let style: Style = self
            .style
            .as_deref()
            .ok_or_else(|| {
                AbstraktError::config(
                    "No style given",
                    Some("Pass --style or set `generate.style` in abstrakt.yaml"),
                )
            })?
            .parse()?;

        let defaults = GenerateConfig::new(style);
        let palette = match &self.palette {
            Some(hexes) => Some(Palette::from_hex_list(hexes)?),
            None => None,
        };

        let config = GenerateConfig {
            style,
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            seed: self.seed,
            strokes: self.strokes,
            shapes: self.shapes,
            flow_strength: self.flow_strength.unwrap_or(defaults.flow_strength),
            flow_blend: self.flow_blend.unwrap_or(defaults.flow_blend),
            distortion: self.distortion.unwrap_or(defaults.distortion),
            soften: self.soften.unwrap_or(defaults.soften),
            effects: self.effects.unwrap_or(defaults.effects),
            palette,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Settings for `abstrakt combine`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombineSection {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub blend: Option<String>,
    pub opacity: Option<f32>,
    pub split: Option<String>,
    pub regions: Option<u32>,
    pub columns: Option<u32>,
    pub spacing: Option<u32>,

    /// Grid cell size as `WxH`.
    pub cell_size: Option<String>,

    pub tile_size: Option<u32>,
    pub tile_policy: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,

    /// Grid background as a hex colour.
    pub background: Option<String>,

    pub smooth: Option<f32>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub metadata: Option<bool>,
}

impl CombineSection {
    /// Field-wise merge; values set in `over` win.
    pub fn merged(&self, over: &CombineSection) -> CombineSection {
        CombineSection {
            kind: over.kind.clone().or_else(|| self.kind.clone()),
            blend: over.blend.clone().or_else(|| self.blend.clone()),
            opacity: over.opacity.or(self.opacity),
            split: over.split.clone().or_else(|| self.split.clone()),
            regions: over.regions.or(self.regions),
            columns: over.columns.or(self.columns),
            spacing: over.spacing.or(self.spacing),
            cell_size: over.cell_size.clone().or_else(|| self.cell_size.clone()),
            tile_size: over.tile_size.or(self.tile_size),
            tile_policy: over.tile_policy.clone().or_else(|| self.tile_policy.clone()),
            width: over.width.or(self.width),
            height: over.height.or(self.height),
            background: over.background.clone().or_else(|| self.background.clone()),
            smooth: over.smooth.or(self.smooth),
            seed: over.seed.or(self.seed),
            output: over.output.clone().or_else(|| self.output.clone()),
            metadata: over.metadata.or(self.metadata),
        }
    }

    /// Resolve into a validated [`CompositionSpec`], filling defaults.
    pub fn to_spec(&self) -> Result<CompositionSpec> {
        let kind: CompositionType = match &self.kind {
            Some(name) => name.parse()?,
            None => {
                return Err(AbstraktError::config(
                    "No composition type given",
                    Some("Pass --type or set `combine.type` in abstrakt.yaml"),
                ))
            }
        };
        let defaults = CompositionSpec::new(kind);

        let size = match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            (None, None) => None,
            _ => {
                return Err(AbstraktError::config(
                    "Width and height must be given together",
                    None,
                ))
            }
        };

        let spec = CompositionSpec {
            kind,
            blend: parse_or(&self.blend, defaults.blend)?,
            opacity: self.opacity.unwrap_or(defaults.opacity),
            split: parse_or(&self.split, defaults.split)?,
            regions: self.regions,
            columns: self.columns,
            spacing: self.spacing.unwrap_or(defaults.spacing),
            cell_size: self.cell_size.as_deref().map(parse_size).transpose()?,
            tile_size: self.tile_size.unwrap_or(defaults.tile_size),
            tile_policy: parse_or(&self.tile_policy, defaults.tile_policy)?,
            size,
            background: parse_or(&self.background, defaults.background)?,
            smooth: self.smooth.unwrap_or(defaults.smooth),
            seed: self.seed,
        };
        spec.validate()?;
        Ok(spec)
    }
}

fn parse_or<T>(value: &Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr<Err = AbstraktError>,
{
    match value {
        Some(s) => s.parse(),
        None => Ok(default),
    }
}

/// Parse a `WxH` size such as `256x128`.
pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let invalid = || {
        AbstraktError::config(
            format!("Invalid size '{}'", s),
            Some("Sizes are written WIDTHxHEIGHT, e.g. 256x256"),
        )
    };
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(AbstraktError::InvalidDimensions { width: w, height: h });
    }
    Ok((w, h))
}

/// JSON sidecar describing how an image was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// `generate` or `combine`.
    pub command: String,
    pub width: u32,
    pub height: u32,
    pub seed: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Strokes or shapes drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<PathBuf>,
}

impl RunMetadata {
    pub fn for_artwork(art: &Artwork) -> Self {
        Self {
            command: "generate".to_string(),
            width: art.canvas.width(),
            height: art.canvas.height(),
            seed: art.seed,
            style: Some(art.style.to_string()),
            count: Some(art.count),
            effects: art.effects.iter().map(|e| e.to_string()).collect(),
            composition: None,
            inputs: Vec::new(),
        }
    }

    pub fn for_composite(combiner: &Combiner, size: (u32, u32), inputs: &[PathBuf]) -> Self {
        Self {
            command: "combine".to_string(),
            width: size.0,
            height: size.1,
            seed: combiner.seed(),
            style: None,
            count: None,
            effects: Vec::new(),
            composition: Some(combiner.spec().kind.to_string()),
            inputs: inputs.to_vec(),
        }
    }

    /// Sidecar path for an image: the same path with a `.json` extension.
    pub fn sidecar_path(image: &Path) -> PathBuf {
        image.with_extension("json")
    }

    /// Write as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| AbstraktError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to serialize metadata: {}", e),
        })?;
        std::fs::write(path, json + "\n").map_err(|e| AbstraktError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write metadata: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::{SplitMode, TilePolicy};
    use crate::render::BlendMode;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty_config() {
        let config = ProjectConfig::parse("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r##"
generate:
  style: surrealist
  width: 512
  height: 256
  seed: 42
  shapes: 12
  distortion: 4.5
  effects: false
  palette: ["#FF0000", "#00FF00"]
combine:
  type: mosaic
  tile_size: 32
  tile_policy: random
  background: "#202020"
  cell_size: 64x48
"##;
        let config = ProjectConfig::parse(yaml).unwrap();
        assert_eq!(config.generate.style.as_deref(), Some("surrealist"));
        assert_eq!(config.generate.shapes, Some(12));
        assert_eq!(config.combine.kind.as_deref(), Some("mosaic"));

        let generate = config.generate.to_config().unwrap();
        assert_eq!(generate.style, Style::Surrealist);
        assert_eq!((generate.width, generate.height), (512, 256));
        assert_eq!(generate.distortion, 4.5);
        assert!(!generate.effects);
        assert_eq!(generate.palette.unwrap().len(), 2);

        let spec = config.combine.to_spec().unwrap();
        assert_eq!(spec.kind, CompositionType::Mosaic);
        assert_eq!(spec.tile_size, 32);
        assert_eq!(spec.tile_policy, TilePolicy::Random);
        assert_eq!(spec.cell_size, Some((64, 48)));
        assert_eq!(spec.background.to_rgba8(), [0x20, 0x20, 0x20, 255]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = ProjectConfig::parse("generate:\n  colour: red\n").unwrap_err();
        assert!(matches!(err, AbstraktError::Config { .. }));
    }

    #[test]
    fn test_flags_override_file() {
        let file = GenerateSection {
            style: Some("expressionist".into()),
            width: Some(800),
            strokes: Some(30),
            ..Default::default()
        };
        let flags = GenerateSection {
            width: Some(300),
            seed: Some(5),
            ..Default::default()
        };

        let config = file.merged(&flags).to_config().unwrap();
        assert_eq!(config.style, Style::Expressionist);
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 1024);
        assert_eq!(config.strokes, Some(30));
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_combine_defaults() {
        let section = CombineSection {
            kind: Some("split".into()),
            split: Some("radial".into()),
            ..Default::default()
        };
        let spec = section.to_spec().unwrap();
        assert_eq!(spec.split, SplitMode::Radial);
        assert_eq!(spec.blend, BlendMode::Normal);
        assert_eq!(spec.opacity, 0.5);
        assert_eq!(spec.spacing, 10);
        assert_eq!(spec.size, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            GenerateSection::default().to_config(),
            Err(AbstraktError::Config { .. })
        ));
        assert!(matches!(
            GenerateSection {
                style: Some("cubist".into()),
                ..Default::default()
            }
            .to_config(),
            Err(AbstraktError::InvalidStyle { .. })
        ));
        assert!(matches!(
            CombineSection {
                kind: Some("layered".into()),
                blend: Some("dodge".into()),
                ..Default::default()
            }
            .to_spec(),
            Err(AbstraktError::InvalidBlendMode { .. })
        ));
        assert!(CombineSection {
            kind: Some("grid".into()),
            width: Some(100),
            ..Default::default()
        }
        .to_spec()
        .is_err());
        assert!(matches!(
            CombineSection {
                kind: Some("mosaic".into()),
                tile_size: Some(0),
                ..Default::default()
            }
            .to_spec(),
            Err(AbstraktError::InvalidTileSize { .. })
        ));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("256x128").unwrap(), (256, 128));
        assert_eq!(parse_size(" 10 X 20 ").unwrap(), (10, 20));
        assert!(parse_size("256").is_err());
        assert!(parse_size("ax1").is_err());
        assert!(matches!(
            parse_size("0x5"),
            Err(AbstraktError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_metadata_json_shape() {
        let meta = RunMetadata {
            command: "generate".to_string(),
            width: 640,
            height: 480,
            seed: 42,
            style: Some("surrealist".to_string()),
            count: Some(8),
            effects: vec!["blur(1.50)".to_string(), "edge-enhance".to_string()],
            composition: None,
            inputs: Vec::new(),
        };
        insta::assert_json_snapshot!(meta, @r###"
        {
          "command": "generate",
          "width": 640,
          "height": 480,
          "seed": 42,
          "style": "surrealist",
          "count": 8,
          "effects": [
            "blur(1.50)",
            "edge-enhance"
          ]
        }
        "###);
    }

    #[test]
    fn test_metadata_write_and_read_back() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("art.png");
        let path = RunMetadata::sidecar_path(&image);
        assert_eq!(path, dir.path().join("art.json"));

        let combiner = Combiner::new(CompositionSpec {
            seed: Some(9),
            ..CompositionSpec::new(CompositionType::Grid)
        })
        .unwrap();
        let meta = RunMetadata::for_composite(&combiner, (100, 50), &[PathBuf::from("a.png")]);
        meta.write(&path).unwrap();

        let back: RunMetadata =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, meta);
        assert_eq!(back.composition.as_deref(), Some("grid"));
        assert_eq!(back.seed, 9);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            ProjectConfig::load(&dir.path().join(CONFIG_FILENAME)),
            Err(AbstraktError::Io { .. })
        ));
    }
}
