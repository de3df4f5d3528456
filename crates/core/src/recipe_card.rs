//! Shareable recipe card, a 1080x1920 PNG (story format).
//!
//! Layout is computed first ([`CardLayout::for_recipe`]), drawn as SVG
//! ([`render_svg`]) and then rasterized ([`render_png`]) so the text decisions
//! (wrapping, truncation, "+N more" lines) can be tested without decoding
//! pixels.

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};

use crate::error::CoreError;
use crate::recipe::RecipeDraft;

pub const CARD_WIDTH: u32 = 1080;
pub const CARD_HEIGHT: u32 = 1920;

pub const MAX_CARD_INGREDIENTS: usize = 10;
pub const MAX_CARD_STEPS: usize = 6;
/// Steps longer than this are cut and suffixed with an ellipsis.
pub const MAX_STEP_CHARS: usize = 60;

const BACKGROUND: &str = "#FDFBF7";
const BRAND_GREEN: &str = "#4A6741";
const PALE_GREEN: &str = "#E8F0E6";
const TEXT_DARK: &str = "#2D3B29";
const TEXT_MUTED: &str = "#6B7C66";

const HEADER_HEIGHT: u32 = 400;
const IMAGE_LEFT: u32 = 40;
const IMAGE_TOP: u32 = 440;
const IMAGE_HEIGHT: u32 = 400;
const MARGIN: u32 = 60;
const TITLE_SIZE: u32 = 64;
const TITLE_TOP: u32 = 180;
const TITLE_LINE_HEIGHT: u32 = 70;
const META_Y: u32 = 340;
const INGREDIENTS_HEADING_Y: u32 = 920;
const LINE_HEIGHT: u32 = 50;
const FOOTER_HEIGHT: u32 = 100;

pub const FOOTER_TEXT: &str = "Made with Kitchenry";

/// Approximate advance width of one glyph of a proportional sans font.
fn glyph_width(font_size: u32) -> f64 {
    f64::from(font_size) * 0.55
}

/// Greedy word wrap to lines of at most `max_chars` characters. Words longer
/// than a line are kept whole on their own line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `0 min`, `45 min`, `1h`, `1h 30m`.
pub fn format_minutes(minutes: i32) -> String {
    match minutes {
        m if m <= 0 => "0 min".to_string(),
        m if m < 60 => format!("{m} min"),
        m if m % 60 == 0 => format!("{}h", m / 60),
        m => format!("{}h {}m", m / 60, m % 60),
    }
}

fn shorten(step: &str, max_chars: usize) -> String {
    if step.chars().count() > max_chars {
        let cut: String = step.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        step.to_string()
    }
}

/// Text content and positions of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub title_lines: Vec<String>,
    pub meta: String,
    pub ingredient_lines: Vec<String>,
    pub more_ingredients: Option<String>,
    pub step_lines: Vec<String>,
    pub more_steps: Option<String>,
    pub image_href: Option<String>,
}

impl CardLayout {
    pub fn for_recipe(recipe: &RecipeDraft) -> Self {
        let title_chars = (f64::from(CARD_WIDTH - 100) / glyph_width(TITLE_SIZE)) as usize;

        let ingredient_lines = recipe
            .ingredients
            .iter()
            .take(MAX_CARD_INGREDIENTS)
            .map(|i| {
                let parts = [i.amount.as_str(), i.unit.as_str(), i.name.as_str()];
                let text = parts
                    .iter()
                    .filter(|p| !p.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("\u{2022} {text}")
            })
            .collect();
        let more_ingredients = (recipe.ingredients.len() > MAX_CARD_INGREDIENTS).then(|| {
            format!(
                "+ {} more ingredients...",
                recipe.ingredients.len() - MAX_CARD_INGREDIENTS
            )
        });

        let step_lines = recipe
            .instructions
            .iter()
            .take(MAX_CARD_STEPS)
            .enumerate()
            .map(|(idx, step)| format!("{}. {}", idx + 1, shorten(step, MAX_STEP_CHARS)))
            .collect();
        let more_steps = (recipe.instructions.len() > MAX_CARD_STEPS).then(|| {
            format!(
                "+ {} more steps...",
                recipe.instructions.len() - MAX_CARD_STEPS
            )
        });

        Self {
            title_lines: wrap_text(&recipe.title, title_chars.max(1)),
            meta: format!(
                "{} \u{2022} {} servings",
                format_minutes(recipe.total_time()),
                recipe.servings
            ),
            ingredient_lines,
            more_ingredients,
            step_lines,
            more_steps,
            image_href: (!recipe.image_url.is_empty()).then(|| recipe.image_url.clone()),
        }
    }
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn text_el(out: &mut String, x: u32, y: u32, size: u32, fill: &str, extra: &str, body: &str) {
    out.push_str(&format!(
        "<text x=\"{x}\" y=\"{y}\" font-size=\"{size}\" fill=\"{fill}\"{extra}>{}</text>\n",
        escape_xml(body)
    ));
}

/// Draw the card. `image_base` is prefixed to relative image paths so the
/// SVG can reference uploads served by this server.
pub fn render_svg(layout: &CardLayout, image_base: &str) -> String {
    let w = CARD_WIDTH;
    let h = CARD_HEIGHT;
    let centered = " text-anchor=\"middle\"";
    let bold = " font-weight=\"bold\"";
    let mut out = String::new();

    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"Inter, sans-serif\">\n"
    ));
    out.push_str(&format!("<rect width=\"{w}\" height=\"{h}\" fill=\"{BACKGROUND}\"/>\n"));
    out.push_str(&format!(
        "<rect width=\"{w}\" height=\"{HEADER_HEIGHT}\" fill=\"{BRAND_GREEN}\"/>\n"
    ));

    let image_width = w - 2 * IMAGE_LEFT;
    out.push_str(&format!(
        "<rect x=\"{IMAGE_LEFT}\" y=\"{IMAGE_TOP}\" width=\"{image_width}\" height=\"{IMAGE_HEIGHT}\" fill=\"{PALE_GREEN}\"/>\n"
    ));
    if let Some(href) = &layout.image_href {
        let href = if href.starts_with("http://") || href.starts_with("https://") {
            href.clone()
        } else {
            format!("{}{}", image_base.trim_end_matches('/'), href)
        };
        out.push_str(&format!(
            "<image x=\"{IMAGE_LEFT}\" y=\"{IMAGE_TOP}\" width=\"{image_width}\" height=\"{IMAGE_HEIGHT}\" \
             preserveAspectRatio=\"xMidYMid slice\" href=\"{0}\" xlink:href=\"{0}\"/>\n",
            escape_xml(&href)
        ));
    }

    let mut y = TITLE_TOP;
    for line in &layout.title_lines {
        text_el(&mut out, w / 2, y, TITLE_SIZE, "#FFFFFF", &format!("{centered}{bold}"), line);
        y += TITLE_LINE_HEIGHT;
    }
    text_el(&mut out, w / 2, META_Y, 36, PALE_GREEN, centered, &layout.meta);

    text_el(&mut out, MARGIN, INGREDIENTS_HEADING_Y, 42, BRAND_GREEN, bold, "Ingredients");
    let mut y = INGREDIENTS_HEADING_Y + 60;
    for line in &layout.ingredient_lines {
        text_el(&mut out, MARGIN, y, 32, TEXT_DARK, "", line);
        y += LINE_HEIGHT;
    }
    if let Some(more) = &layout.more_ingredients {
        text_el(&mut out, MARGIN, y, 32, TEXT_MUTED, "", more);
    }

    text_el(&mut out, MARGIN, y + 80, 42, BRAND_GREEN, bold, "Instructions");
    let mut y = y + 140;
    for line in &layout.step_lines {
        text_el(&mut out, MARGIN, y, 30, TEXT_DARK, "", line);
        y += LINE_HEIGHT;
    }
    if let Some(more) = &layout.more_steps {
        text_el(&mut out, MARGIN, y, 30, TEXT_MUTED, "", more);
    }

    out.push_str(&format!(
        "<rect y=\"{}\" width=\"{w}\" height=\"{FOOTER_HEIGHT}\" fill=\"{BRAND_GREEN}\"/>\n",
        h - FOOTER_HEIGHT
    ));
    text_el(&mut out, w / 2, h - 40, 32, "#FFFFFF", &format!("{centered}{bold}"), FOOTER_TEXT);

    out.push_str("</svg>\n");
    out
}

// ---------------------------------------------------------------------------
// Rasterizing
// ---------------------------------------------------------------------------

/// Sans families tried in order before falling back to any installed face.
const SANS_FAMILIES: &[&str] = &[
    "Inter",
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
];

/// System fonts, loaded once per process.
fn fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            let installed = |family: &&str| {
                db.faces()
                    .any(|face| face.families.iter().any(|(name, _)| name == *family))
            };
            let sans = SANS_FAMILIES
                .iter()
                .find(|f| installed(*f))
                .map(|f| (*f).to_string())
                .or_else(|| {
                    db.faces()
                        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
                });
            match sans {
                Some(family) => db.set_sans_serif_family(family),
                None => tracing::warn!("No system fonts found, recipe cards will have no text"),
            }
            Arc::new(db)
        })
        .clone()
}

/// Rasterize the card to PNG bytes.
///
/// The SVG is drawn without its `<image>` element; `photo`, when given, is
/// cropped to fill the photo slot and composited on top.
pub fn render_png(
    layout: &CardLayout,
    photo: Option<&DynamicImage>,
) -> Result<Vec<u8>, CoreError> {
    let text_only = CardLayout {
        image_href: None,
        ..layout.clone()
    };
    let svg = render_svg(&text_only, "");

    let options = usvg::Options {
        fontdb: fonts(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&svg, &options)
        .map_err(|e| CoreError::Internal(format!("Recipe card SVG is invalid: {e}")))?;
    let mut pixmap = Pixmap::new(CARD_WIDTH, CARD_HEIGHT)
        .ok_or_else(|| CoreError::Internal("Recipe card canvas could not be allocated".into()))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let pixels: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let mut canvas = RgbaImage::from_raw(CARD_WIDTH, CARD_HEIGHT, pixels)
        .ok_or_else(|| CoreError::Internal("Recipe card buffer has the wrong size".into()))?;

    if let Some(photo) = photo {
        let fitted = photo
            .resize_to_fill(CARD_WIDTH - 2 * IMAGE_LEFT, IMAGE_HEIGHT, FilterType::Triangle)
            .to_rgba8();
        imageops::overlay(&mut canvas, &fitted, i64::from(IMAGE_LEFT), i64::from(IMAGE_TOP));
    }

    let mut png = Cursor::new(Vec::new());
    canvas
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("Recipe card PNG encoding failed: {e}")))?;
    Ok(png.into_inner())
}

/// Download filename: non-alphanumerics replaced by underscores.
pub fn card_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_recipe.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ingredient;

    fn recipe(ingredients: usize, steps: usize) -> RecipeDraft {
        RecipeDraft {
            title: "Slow Roasted Tomato & Garlic Soup With Basil Oil".into(),
            ingredients: (0..ingredients)
                .map(|i| Ingredient::new(format!("item {i}"), "1", "cup"))
                .collect(),
            instructions: (0..steps).map(|i| format!("Step number {i}")).collect(),
            prep_time: 20,
            cook_time: 70,
            servings: 6,
            ..RecipeDraft::default()
        }
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert_eq!(wrap_text("supercalifragilistic", 5), vec!["supercalifragilistic"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_minutes(0), "0 min");
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(90), "1h 30m");
    }

    #[test]
    fn long_lists_are_cut_with_more_lines() {
        let layout = CardLayout::for_recipe(&recipe(13, 8));
        assert_eq!(layout.ingredient_lines.len(), MAX_CARD_INGREDIENTS);
        assert_eq!(layout.ingredient_lines[0], "\u{2022} 1 cup item 0");
        assert_eq!(layout.more_ingredients.as_deref(), Some("+ 3 more ingredients..."));
        assert_eq!(layout.step_lines.len(), MAX_CARD_STEPS);
        assert_eq!(layout.more_steps.as_deref(), Some("+ 2 more steps..."));
        assert_eq!(layout.meta, "1h 30m \u{2022} 6 servings");
        assert!(layout.title_lines.len() > 1);
    }

    #[test]
    fn short_lists_have_no_more_lines() {
        let layout = CardLayout::for_recipe(&recipe(2, 1));
        assert!(layout.more_ingredients.is_none());
        assert!(layout.more_steps.is_none());
    }

    #[test]
    fn long_steps_are_shortened() {
        let mut r = recipe(0, 0);
        r.instructions = vec!["x".repeat(80)];
        let layout = CardLayout::for_recipe(&r);
        assert_eq!(layout.step_lines[0], format!("1. {}...", "x".repeat(60)));
    }

    #[test]
    fn svg_escapes_text_and_has_story_dimensions() {
        let mut r = recipe(1, 1);
        r.image_url = "/api/uploads/3.png".into();
        let svg = render_svg(&CardLayout::for_recipe(&r), "http://kitchen.local/");
        assert!(svg.contains("width=\"1080\" height=\"1920\""));
        assert!(svg.contains("Tomato &amp;"));
        assert!(svg.contains("href=\"http://kitchen.local/api/uploads/3.png\""));
        assert!(svg.contains(FOOTER_TEXT));
    }

    #[test]
    fn filename_is_sanitized() {
        assert_eq!(card_filename("Mac & Cheese"), "Mac___Cheese_recipe.png");
    }

    fn decode(png: &[u8]) -> RgbaImage {
        image::load_from_memory_with_format(png, ImageFormat::Png)
            .unwrap()
            .to_rgba8()
    }

    #[test]
    fn png_has_story_dimensions_and_brand_colours() {
        let png = render_png(&CardLayout::for_recipe(&recipe(3, 2)), None).unwrap();
        let card = decode(&png);

        assert_eq!(card.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
        // Header and footer corners are brand green, the photo slot pale green.
        assert_eq!(card.get_pixel(5, 5).0, [0x4A, 0x67, 0x41, 0xFF]);
        assert_eq!(card.get_pixel(5, CARD_HEIGHT - 5).0, [0x4A, 0x67, 0x41, 0xFF]);
        assert_eq!(card.get_pixel(45, IMAGE_TOP + 5).0, [0xE8, 0xF0, 0xE6, 0xFF]);
    }

    #[test]
    fn photo_fills_the_image_slot() {
        let photo = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            3,
            image::Rgb([200, 30, 30]),
        ));
        let png = render_png(&CardLayout::for_recipe(&recipe(1, 1)), Some(&photo)).unwrap();
        let card = decode(&png);

        let centre = card.get_pixel(CARD_WIDTH / 2, IMAGE_TOP + IMAGE_HEIGHT / 2);
        assert_eq!(centre.0, [200, 30, 30, 255]);
        assert_eq!(card.get_pixel(5, 5).0, [0x4A, 0x67, 0x41, 0xFF]);
    }
}
