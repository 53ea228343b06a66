//! Style palettes.
//!
//! Each art style owns an ordered list of base colours. A run usually works
//! with a jittered copy (three variations per base colour), drawn from the
//! run's seed stream so the palette is reproducible.

use std::fmt;
use std::str::FromStr;

use crate::error::{AbstraktError, Result};
use crate::synth::SeedStream;

use super::Colour;

/// Art style of a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Bold, emotional colours and gestural brush strokes.
    Expressionist,
    /// Dreamlike colours, organic shapes and a textured background.
    Surrealist,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Expressionist, Style::Surrealist];

    pub fn name(self) -> &'static str {
        match self {
            Style::Expressionist => "expressionist",
            Style::Surrealist => "surrealist",
        }
    }
}

impl FromStr for Style {
    type Err = AbstraktError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expressionist" => Ok(Style::Expressionist),
            "surrealist" => Ok(Style::Surrealist),
            _ => Err(AbstraktError::InvalidStyle {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maximum per-channel offset applied by [`Palette::with_variations`].
const VARIATION: f32 = 0.2;

/// An ordered colour palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Style this palette was built for (`None` for custom palettes).
    pub style: Option<Style>,

    colours: Vec<Colour>,
}

impl Palette {
    /// The base colours of a style.
    pub fn for_style(style: Style) -> Self {
        let colours = match style {
            Style::Expressionist => vec![
                Colour::rgb(0.8, 0.1, 0.1), // deep red
                Colour::rgb(0.1, 0.1, 0.8), // deep blue
                Colour::rgb(0.9, 0.7, 0.1), // golden yellow
                Colour::rgb(0.1, 0.6, 0.1), // forest green
                Colour::rgb(0.6, 0.1, 0.6), // purple
                Colour::rgb(0.9, 0.4, 0.1), // orange
            ],
            Style::Surrealist => vec![
                Colour::rgb(0.7, 0.3, 0.8), // lavender
                Colour::rgb(0.3, 0.8, 0.7), // turquoise
                Colour::rgb(0.9, 0.6, 0.3), // peach
                Colour::rgb(0.4, 0.2, 0.7), // deep purple
                Colour::rgb(0.8, 0.8, 0.2), // lime
                Colour::rgb(0.2, 0.5, 0.8), // sky blue
            ],
        };
        Self {
            style: Some(style),
            colours,
        }
    }

    /// Build a custom palette from explicit colours.
    pub fn from_colours(colours: Vec<Colour>) -> Result<Self> {
        if colours.is_empty() {
            return Err(AbstraktError::config(
                "Palette must contain at least one colour",
                Some("List hex colours under `palette:`, e.g. [\"#CC1A1A\", \"#1A1ACC\"]"),
            ));
        }
        Ok(Self {
            style: None,
            colours,
        })
    }

    /// Parse a custom palette from hex strings.
    pub fn from_hex_list<S: AsRef<str>>(hexes: &[S]) -> Result<Self> {
        let colours = hexes
            .iter()
            .map(|h| Colour::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_colours(colours)
    }

    /// Jittered palette: `per_colour` variants of every base colour, each
    /// channel offset by `U(-0.2, 0.2)` and clamped.
    ///
    /// Draws `3 * per_colour * len()` floats from `rng`, in palette order.
    pub fn with_variations(&self, rng: &mut SeedStream, per_colour: usize) -> Self {
        let mut colours = Vec::with_capacity(self.colours.len() * per_colour);
        for base in &self.colours {
            for _ in 0..per_colour {
                let r = base.r + rng.range_f32(-VARIATION, VARIATION);
                let g = base.g + rng.range_f32(-VARIATION, VARIATION);
                let b = base.b + rng.range_f32(-VARIATION, VARIATION);
                colours.push(Colour::new(r, g, b, base.a));
            }
        }
        if colours.is_empty() {
            return self.clone();
        }
        Self {
            style: self.style,
            colours,
        }
    }

    /// Colour at `t ∈ [0, 1]`, linearly interpolated between adjacent entries.
    pub fn sample(&self, t: f32) -> Colour {
        let n = self.colours.len();
        if n == 1 {
            return self.colours[0];
        }
        let pos = clamp_t(t) * (n - 1) as f32;
        let i = (pos.floor() as usize).min(n - 2);
        self.colours[i].lerp(self.colours[i + 1], pos - i as f32)
    }

    /// Colour of the entry nearest to `t ∈ [0, 1]`.
    pub fn nearest(&self, t: f32) -> Colour {
        let n = self.colours.len();
        let i = (clamp_t(t) * (n - 1) as f32).round() as usize;
        self.colours[i.min(n - 1)]
    }

    /// A random entry. Draws one index from `rng`.
    pub fn pick(&self, rng: &mut SeedStream) -> Colour {
        self.colours[rng.index(self.colours.len())]
    }

    /// All colours in order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Palettes are never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

fn clamp_t(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_style_from_str() {
        assert_eq!("expressionist".parse::<Style>().unwrap(), Style::Expressionist);
        assert_eq!("Surrealist".parse::<Style>().unwrap(), Style::Surrealist);
    }

    #[test]
    fn test_unknown_style_is_rejected() {
        let err = "cubist".parse::<Style>().unwrap_err();
        assert!(matches!(err, AbstraktError::InvalidStyle { ref name } if name == "cubist"));
    }

    #[test]
    fn test_style_palettes_have_six_colours() {
        for style in Style::ALL {
            let palette = Palette::for_style(style);
            assert_eq!(palette.len(), 6);
            assert_eq!(palette.style, Some(style));
        }
    }

    #[test]
    fn test_sample_endpoints_and_midpoint() {
        let palette = Palette::from_colours(vec![Colour::BLACK, Colour::WHITE]).unwrap();
        assert_eq!(palette.sample(0.0), Colour::BLACK);
        assert_eq!(palette.sample(1.0), Colour::WHITE);
        assert_eq!(palette.sample(0.5), Colour::rgb(0.5, 0.5, 0.5));
        assert_eq!(palette.sample(-3.0), Colour::BLACK);
        assert_eq!(palette.sample(f32::NAN), Colour::BLACK);
    }

    #[test]
    fn test_nearest_picks_entries() {
        let palette = Palette::for_style(Style::Expressionist);
        let colours = palette.colours().to_vec();
        assert_eq!(palette.nearest(0.0), colours[0]);
        assert_eq!(palette.nearest(1.0), colours[5]);
        assert_eq!(palette.nearest(0.41), colours[2]);
    }

    #[test]
    fn test_single_colour_palette() {
        let red = Colour::rgb(1.0, 0.0, 0.0);
        let palette = Palette::from_colours(vec![red]).unwrap();
        assert_eq!(palette.sample(0.7), red);
        assert_eq!(palette.nearest(0.7), red);
    }

    #[test]
    fn test_variations_are_deterministic_and_bounded() {
        let base = Palette::for_style(Style::Surrealist);
        let a = base.with_variations(&mut SeedStream::new(Some(4)), 3);
        let b = base.with_variations(&mut SeedStream::new(Some(4)), 3);
        assert_eq!(a, b);
        assert_eq!(a.len(), 18);

        for (i, c) in a.colours().iter().enumerate() {
            let origin = base.colours()[i / 3];
            assert!((c.r - origin.r).abs() <= VARIATION + 1e-6);
            assert!((0.0..=1.0).contains(&c.g));
            assert_eq!(c.a, 1.0);
        }
    }

    #[test]
    fn test_empty_custom_palette_is_rejected() {
        assert!(Palette::from_colours(vec![]).is_err());
        let empty: [&str; 0] = [];
        assert!(Palette::from_hex_list(&empty).is_err());
    }

    #[test]
    fn test_hex_list() {
        let palette = Palette::from_hex_list(&["#000", "#FFFFFF"]).unwrap();
        assert_eq!(palette.colours(), &[Colour::BLACK, Colour::WHITE]);
        assert!(Palette::from_hex_list(&["#000", "nope"]).is_err());
    }
}
