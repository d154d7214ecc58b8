use crate::error::{PunctalyzerError, Result};
use ab_glyph::FontRef;
use log::{debug, info};
use plotters::style::{register_font, FontStyle};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Family name every chart text style asks for.
pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<PathBuf> = OnceLock::new();

/// Register the chart font for this process, once.
///
/// An explicitly configured font is the only candidate when given; otherwise
/// the well-known system locations are tried in order.
pub fn ensure_font(configured: Option<&Path>) -> Result<&'static Path> {
    if let Some(path) = REGISTERED.get() {
        return Ok(path.as_path());
    }

    let candidates: Vec<PathBuf> = match configured {
        Some(path) => vec![path.to_path_buf()],
        None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
    };

    for candidate in &candidates {
        let Ok(bytes) = std::fs::read(candidate) else {
            debug!("font candidate {} not readable", candidate.display());
            continue;
        };

        if !is_usable_font(&bytes) {
            debug!("font candidate {} is not a usable font", candidate.display());
            continue;
        }

        // plotters keeps font data for the life of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_err() {
            debug!("font candidate {} was rejected by the renderer", candidate.display());
            continue;
        }

        info!("chart font: {}", candidate.display());
        let registered = REGISTERED.get_or_init(|| candidate.clone());
        return Ok(registered.as_path());
    }

    Err(PunctalyzerError::FontUnavailable {
        searched: candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    })
}

/// Whether `bytes` parse as a TrueType or OpenType font.
fn is_usable_font(bytes: &[u8]) -> bool {
    FontRef::try_from_slice(bytes).is_ok()
}

/// Whether any system font candidate exists on this machine.
pub fn system_font_available() -> bool {
    SYSTEM_FONTS.iter().any(|p| Path::new(p).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_invalid_configured_font_reported() {
        if REGISTERED.get().is_some() {
            return;
        }

        let not_a_font = NamedTempFile::new().unwrap();
        std::fs::write(not_a_font.path(), b"definitely not a font").unwrap();

        let result = ensure_font(Some(not_a_font.path()));
        match result {
            Err(PunctalyzerError::FontUnavailable { searched }) => {
                assert_eq!(searched, vec![not_a_font.path().display().to_string()]);
            }
            // Another test registered a font first.
            Ok(_) => assert!(REGISTERED.get().is_some()),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_font_bytes_checked_before_registration() {
        assert!(!is_usable_font(b""));
        assert!(!is_usable_font(b"definitely not a font"));

        if let Some(path) = SYSTEM_FONTS.iter().map(Path::new).find(|p| p.is_file()) {
            let bytes = std::fs::read(path).unwrap();
            assert!(is_usable_font(&bytes));
        }
    }

    #[test]
    fn test_system_font_registration() {
        if !system_font_available() {
            return;
        }

        let first = ensure_font(None).unwrap();
        let second = ensure_font(None).unwrap();
        assert_eq!(first, second);
    }
}
