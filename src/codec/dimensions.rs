/// Target size for a compressed image
///
/// Two sequential downscale-only clamps, each preserving aspect ratio:
/// width first, then height using the already-clamped height. Fractional
/// results are truncated, and neither side drops below one pixel.
pub fn clamp_dimensions(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    let mut w = f64::from(width);
    let mut h = f64::from(height);

    if let Some(max_w) = max_width.map(f64::from) {
        if w > max_w {
            h = h * max_w / w;
            w = max_w;
        }
    }

    if let Some(max_h) = max_height.map(f64::from) {
        if h > max_h {
            w = w * max_h / h;
            h = max_h;
        }
    }

    ((w as u32).max(1), (h as u32).max(1))
}
