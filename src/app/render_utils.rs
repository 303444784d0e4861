use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::sim::PerfBucket;

/// Bucket fills follow the classic market-map palette: saturated green for
/// strong gains through pale tones near zero into saturated red for losses.
pub(super) fn bucket_color(bucket: PerfBucket) -> Color32 {
    match bucket {
        PerfBucket::StrongGain => Color32::from_rgb(21, 128, 61),
        PerfBucket::Gain => Color32::from_rgb(22, 163, 74),
        PerfBucket::MildGain => Color32::from_rgb(74, 222, 128),
        PerfBucket::SlightGain => Color32::from_rgb(134, 239, 172),
        PerfBucket::SlightLoss => Color32::from_rgb(252, 165, 165),
        PerfBucket::MildLoss => Color32::from_rgb(248, 113, 113),
        PerfBucket::Loss => Color32::from_rgb(220, 38, 38),
        PerfBucket::StrongLoss => Color32::from_rgb(153, 27, 27),
    }
}

/// Pale near-zero buckets need dark text to stay legible.
pub(super) fn bucket_text_color(bucket: PerfBucket) -> Color32 {
    match bucket {
        PerfBucket::MildGain | PerfBucket::SlightGain | PerfBucket::SlightLoss => {
            Color32::from_rgb(24, 30, 26)
        }
        _ => Color32::from_gray(245),
    }
}

pub(super) const FILLER_COLOR: Color32 = Color32::from_rgb(52, 58, 66);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    // Faint grid so motion reads against a reference.
    let step = 56.0;
    let mut x = rect.left();
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 45)),
        );
        x += step;
    }

    let mut y = rect.top();
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 45)),
        );
        y += step;
    }
}
