use image::Rgb;

pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Linear blue -> white -> red over [0, 1]. Masked cells are white.
pub fn score_color(value: Option<f64>) -> Rgb<u8> {
    let Some(value) = value else {
        return WHITE;
    };
    let v = value.clamp(0.0, 1.0);
    if v <= 0.5 {
        lerp(BLUE, WHITE, v / 0.5)
    } else {
        lerp(WHITE, RED, (v - 0.5) / 0.5)
    }
}

fn lerp(from: Rgb<u8>, to: Rgb<u8>, t: f64) -> Rgb<u8> {
    let Rgb([r0, g0, b0]) = from;
    let Rgb([r1, g1, b1]) = to;
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Rgb([mix(r0, r1), mix(g0, g1), mix(b0, b1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint() {
        assert_eq!(score_color(Some(0.0)), BLUE);
        assert_eq!(score_color(Some(0.5)), WHITE);
        assert_eq!(score_color(Some(1.0)), RED);
        assert_eq!(score_color(None), WHITE);
    }

    #[test]
    fn quarter_points_are_halfway_blends() {
        assert_eq!(score_color(Some(0.25)), Rgb([128, 128, 255]));
        assert_eq!(score_color(Some(0.75)), Rgb([255, 128, 128]));
    }
}
